use std::error::Error;
use std::thread::sleep;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::errors::LookupError;
use crate::relations::RelationKind;

const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

#[derive(Debug, Clone, PartialEq)]
pub enum LookupResponse {
    /// 2xx with a JSON body
    Body(Value),
    /// Any other status; the word has no usable data
    Status(u16),
}

/// Source of lexical relations for a single word.
pub trait LexiconClient {
    fn lookup(&self, word: &str) -> Result<LookupResponse, LookupError>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

fn get_error(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}

fn classify_send_error(error: &reqwest::Error) -> LookupError {
    let message = get_error(error);
    if error.is_timeout() || error.is_connect() || error.is_request() {
        LookupError::Retryable(message)
    } else {
        LookupError::Terminal(message)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

pub struct KategloClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl KategloClient {
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT_DEFAULT)
            .timeout(config.request_timeout())
            .pool_idle_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| LookupError::Terminal(get_error(&err)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
        })
    }

    fn request_once(&self, word: &str) -> Result<LookupResponse, LookupError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("phrase", word)])
            .send()
            .map_err(|err| classify_send_error(&err))?;

        let status = resp.status();
        if !status.is_success() {
            if is_retryable_status(status) {
                return Err(LookupError::Retryable(format!("status {status}")));
            }
            log::debug!("{word}: {status}");
            return Ok(LookupResponse::Status(status.as_u16()));
        }

        // a body that fails to arrive is a network problem, one that fails
        // to parse is the server's
        let bytes = resp.bytes().map_err(|err| classify_send_error(&err))?;
        let body = serde_json::from_slice::<Value>(&bytes)
            .map_err(|err| LookupError::Malformed(format!("invalid json: {err}")))?;

        Ok(LookupResponse::Body(body))
    }
}

impl LexiconClient for KategloClient {
    fn lookup(&self, word: &str) -> Result<LookupResponse, LookupError> {
        let mut attempt = 0;
        loop {
            match self.request_once(word) {
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    log::debug!("{word}: {err}, retrying ({attempt}/{})", self.max_retries);
                    sleep(self.retry_backoff * attempt);
                }
                result => return result,
            }
        }
    }

    fn name(&self) -> &'static str {
        "Kateglo"
    }
}

fn is_entry_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_digit())
}

/// Walks `kateglo.relation.<kind>`. A missing key means no data; a
/// non-object on the way is malformed.
fn relation_entries<'a>(
    body: &'a Value,
    kind: RelationKind,
) -> Result<Option<&'a serde_json::Map<String, Value>>, LookupError> {
    let mut node = body;
    for key in ["kateglo", "relation", kind.api_key()] {
        let object = node
            .as_object()
            .ok_or_else(|| LookupError::Malformed(format!("expected object above {key:?}")))?;
        match object.get(key) {
            Some(next) => node = next,
            None => return Ok(None),
        }
    }

    node.as_object()
        .map(Some)
        .ok_or_else(|| LookupError::Malformed(format!("{:?} is not an object", kind.api_key())))
}

/// Lowercased related phrases of one relation kind, in document key order.
///
/// An entry lacking `related_phrase` ends the collection: phrases before it
/// are kept, the rest are dropped. An entry that is not an object, or a
/// phrase that is not a string, is malformed.
pub fn extract_relation(body: &Value, kind: RelationKind) -> Result<Vec<String>, LookupError> {
    let Some(entries) = relation_entries(body, kind)? else {
        return Ok(Vec::new());
    };

    let mut phrases = Vec::new();
    for (key, entry) in entries.iter().filter(|(key, _)| is_entry_key(key)) {
        let entry = entry.as_object().ok_or_else(|| {
            LookupError::Malformed(format!("{}.{key} is not an object", kind.api_key()))
        })?;
        let Some(phrase) = entry.get("related_phrase") else {
            log::debug!("{}.{key} has no related_phrase", kind.api_key());
            break;
        };
        let phrase = phrase.as_str().ok_or_else(|| {
            LookupError::Malformed(format!(
                "{}.{key}.related_phrase is not a string",
                kind.api_key()
            ))
        })?;
        phrases.push(phrase.to_lowercase());
    }

    Ok(phrases)
}

/// Kateglo answers unknown phrases without a `kateglo` section.
pub fn has_kateglo_section(body: &Value) -> bool {
    body.get("kateglo").is_some()
}

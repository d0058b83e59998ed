use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use indicatif::ProgressBar;
use serde::Serialize;

use crate::config::Config;
use crate::errors::HarvestError;
use crate::lexicon::{extract_relation, has_kateglo_section, LexiconClient, LookupResponse};
use crate::relations::{RelationKind, Relations};
use crate::storage::{to_pretty_json, StorageManager};
use crate::vocabulary::Vocabulary;

/// What happened to one vocabulary word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordOutcome {
    /// Response parsed; counts are newly recorded pairs and may be zero
    Recorded { synonyms: usize, antonyms: usize },
    /// No data for this word
    Skip(String),
    /// Network or parse failure. Synonyms recorded before a malformed
    /// antonym section are kept.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    VocabularyExhausted,
    AntonymLimitReached,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestSummary {
    pub processed: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub synonyms: usize,
    pub antonyms: usize,
    pub stop_reason: StopReason,
}

pub struct Harvester<C: LexiconClient, S: StorageManager> {
    client: C,
    store: S,
    relations: Relations,
    delay: Duration,
    antonyms_file: String,
    synonyms_file: String,
    cancel: Arc<AtomicBool>,
    progress: ProgressBar,
}

impl<C: LexiconClient, S: StorageManager> Harvester<C, S> {
    pub fn new(client: C, store: S, config: &Config) -> Self {
        Self {
            client,
            store,
            relations: Relations::new(config.antonym_limit),
            delay: config.delay(),
            antonyms_file: config.antonyms_file.clone(),
            synonyms_file: config.synonyms_file.clone(),
            cancel: Arc::new(AtomicBool::new(false)),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Flag observed before every word; setting it stops the run after the
    /// word in flight has been checkpointed.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn run(&mut self, vocabulary: &Vocabulary) -> Result<HarvestSummary, HarvestError> {
        let mut summary = HarvestSummary {
            processed: 0,
            recorded: 0,
            skipped: 0,
            failed: 0,
            synonyms: 0,
            antonyms: 0,
            stop_reason: StopReason::VocabularyExhausted,
        };

        self.progress.set_length(vocabulary.len() as u64);

        for word in vocabulary.iter() {
            if self.cancel.load(Ordering::SeqCst) {
                log::info!("cancelled before {word:?}");
                summary.stop_reason = StopReason::Cancelled;
                break;
            }

            sleep(self.delay);

            if self.relations.antonyms_full() {
                log::info!(
                    "antonym limit reached ({} pairs), stopping",
                    self.relations.antonyms.len()
                );
                summary.stop_reason = StopReason::AntonymLimitReached;
                break;
            }

            let outcome = self.process_word(word);
            match &outcome {
                WordOutcome::Recorded { synonyms, antonyms } => {
                    log::debug!("word={word} outcome=recorded synonyms={synonyms} antonyms={antonyms}");
                    summary.recorded += 1;
                }
                WordOutcome::Skip(reason) => {
                    log::debug!("word={word} outcome=skip reason={reason}");
                    summary.skipped += 1;
                }
                WordOutcome::Error(err) => {
                    log::warn!("word={word} outcome=error err={err}");
                    summary.failed += 1;
                }
            }
            summary.processed += 1;

            self.checkpoint()?;
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();

        summary.synonyms = self.relations.synonyms.len();
        summary.antonyms = self.relations.antonyms.len();
        Ok(summary)
    }

    /// Looks `word` up and records every new pair. Never fails: errors become
    /// `WordOutcome::Error`.
    pub fn process_word(&mut self, word: &str) -> WordOutcome {
        let body = match self.client.lookup(word) {
            Ok(LookupResponse::Body(body)) => body,
            Ok(LookupResponse::Status(status)) => {
                return WordOutcome::Skip(format!("{} answered {status}", self.client.name()))
            }
            Err(err) => return WordOutcome::Error(err.to_string()),
        };

        if !body.is_object() {
            return WordOutcome::Error("response is not a json object".to_string());
        }
        if !has_kateglo_section(&body) {
            return WordOutcome::Skip("no kateglo section".to_string());
        }

        // each kind is recorded before the next is read, so synonyms
        // survive a malformed antonym section
        let mut counts = [0usize; 2];
        for (idx, kind) in [RelationKind::Synonym, RelationKind::Antonym]
            .into_iter()
            .enumerate()
        {
            let phrases = match extract_relation(&body, kind) {
                Ok(phrases) => phrases,
                Err(err) => return WordOutcome::Error(err.to_string()),
            };
            for related in &phrases {
                if self.relations.record(kind, word, related) {
                    counts[idx] += 1;
                }
            }
        }

        WordOutcome::Recorded {
            synonyms: counts[0],
            antonyms: counts[1],
        }
    }

    /// Rewrites both output files with the full current lists.
    pub fn checkpoint(&self) -> Result<(), HarvestError> {
        self.write_list(&self.antonyms_file, &self.relations.antonyms)?;
        self.write_list(&self.synonyms_file, &self.relations.synonyms)
    }

    fn write_list<T: Serialize>(&self, file: &str, list: &[T]) -> Result<(), HarvestError> {
        let data = to_pretty_json(list)?;
        self.store
            .write(file, &data)
            .map_err(|source| HarvestError::Checkpoint {
                file: file.to_string(),
                source,
            })
    }
}

//! Vocabulary loading from word-embedding model files.
//!
//! Three formats are understood, picked by extension:
//! - `.bin`: fastText binary model. Only the header and dictionary are read,
//!   the input/output matrices that follow are never touched.
//! - `.vec`: fastText text vectors (`<count> <dim>` header, one word per line).
//! - anything else: a plain word list, one word per line.
//!
//! Every word is lowercased on load.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::errors::VocabularyError;

const FASTTEXT_MAGIC: i32 = 793712314;
const FASTTEXT_MAX_VERSION: i32 = 12;
/// dim, ws, epoch, minCount, neg, wordNgrams, loss, model, bucket, minn, maxn, lrUpdateRate
const FASTTEXT_INT_ARGS: usize = 12;
const ENTRY_TYPE_WORD: i8 = 0;
/// Upper bound on pre-allocation from header counts, which are untrusted
const MAX_PREALLOC_WORDS: usize = 1 << 20;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let file = BufReader::new(File::open(path)?);
        let words = match ext.as_deref() {
            Some("bin") => read_fasttext_bin(file)?,
            Some("vec") => read_fasttext_vec(file)?,
            _ => read_word_list(file)?,
        };

        log::info!("loaded {} words from {}", words.len(), path.display());
        Ok(Self::new(words))
    }

    pub fn truncate(&mut self, limit: usize) {
        self.words.truncate(limit);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

fn read_exact<R: Read, const N: usize>(
    reader: &mut R,
    section: &'static str,
) -> Result<[u8; N], VocabularyError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|err| match err.kind() {
        std::io::ErrorKind::UnexpectedEof => VocabularyError::Truncated(section),
        _ => VocabularyError::IO(err),
    })?;
    Ok(buf)
}

fn read_i32<R: Read>(reader: &mut R, section: &'static str) -> Result<i32, VocabularyError> {
    Ok(i32::from_le_bytes(read_exact::<R, 4>(reader, section)?))
}

fn read_i64<R: Read>(reader: &mut R, section: &'static str) -> Result<i64, VocabularyError> {
    Ok(i64::from_le_bytes(read_exact::<R, 8>(reader, section)?))
}

/// Reads the dictionary section of a fastText `.bin` model and returns its
/// words (labels excluded) in dictionary order.
pub fn read_fasttext_bin<R: BufRead>(mut reader: R) -> Result<Vec<String>, VocabularyError> {
    let magic = read_i32(&mut reader, "header")?;
    if magic != FASTTEXT_MAGIC {
        return Err(VocabularyError::BadMagic(magic));
    }
    let version = read_i32(&mut reader, "header")?;
    if version > FASTTEXT_MAX_VERSION {
        return Err(VocabularyError::UnsupportedVersion(version));
    }

    // model args: 12 ints followed by the sampling threshold (f64)
    for _ in 0..FASTTEXT_INT_ARGS {
        read_i32(&mut reader, "args")?;
    }
    read_exact::<R, 8>(&mut reader, "args")?;

    let size = read_i32(&mut reader, "dictionary header")?;
    let nwords = read_i32(&mut reader, "dictionary header")?;
    let _nlabels = read_i32(&mut reader, "dictionary header")?;
    let _ntokens = read_i64(&mut reader, "dictionary header")?;
    let _pruneidx_size = read_i64(&mut reader, "dictionary header")?;

    if size < 0 || nwords < 0 || nwords > size {
        return Err(VocabularyError::BadHeader(format!(
            "size={size} nwords={nwords}"
        )));
    }

    let mut words = Vec::with_capacity((nwords as usize).min(MAX_PREALLOC_WORDS));
    for idx in 0..size as usize {
        let mut raw = Vec::new();
        reader.read_until(0, &mut raw)?;
        if raw.pop() != Some(0) {
            return Err(VocabularyError::Truncated("dictionary"));
        }
        let _count = read_i64(&mut reader, "dictionary")?;
        let entry_type = read_exact::<R, 1>(&mut reader, "dictionary")?[0] as i8;

        if entry_type == ENTRY_TYPE_WORD {
            let word = String::from_utf8(raw).map_err(|_| VocabularyError::InvalidUtf8(idx))?;
            words.push(word);
        }
    }

    Ok(words)
}

pub fn read_fasttext_vec<R: BufRead>(reader: R) -> Result<Vec<String>, VocabularyError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(VocabularyError::Truncated("header")),
    };
    let mut fields = header.split_whitespace();
    let count = fields
        .next()
        .and_then(|c| c.parse::<usize>().ok())
        .ok_or_else(|| VocabularyError::BadHeader(header.clone()))?;
    if fields.next().and_then(|d| d.parse::<usize>().ok()).is_none() {
        return Err(VocabularyError::BadHeader(header));
    }

    let mut words = Vec::with_capacity(count.min(MAX_PREALLOC_WORDS));
    for line in lines {
        let line = line?;
        if let Some(word) = line.split(' ').next().filter(|w| !w.is_empty()) {
            words.push(word.to_string());
        }
    }

    if words.len() != count {
        log::warn!("vec header announces {count} words, found {}", words.len());
    }

    Ok(words)
}

pub fn read_word_list<R: BufRead>(reader: R) -> Result<Vec<String>, VocabularyError> {
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Synonym,
    Antonym,
}

impl RelationKind {
    /// Key of the relation collection inside `kateglo.relation`.
    pub fn api_key(&self) -> &'static str {
        match self {
            RelationKind::Synonym => "s",
            RelationKind::Antonym => "a",
        }
    }
}

/// `[word, related]`, serialized as a two-element array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationPair(pub String, pub String);

impl RelationPair {
    pub fn new(word: &str, related: &str) -> Self {
        Self(word.to_string(), related.to_string())
    }
}

/// Words already paired with each other, in either direction. Only used for
/// deduplication and never written to disk.
#[derive(Debug, Default)]
pub struct SeenPairs {
    seen: HashMap<String, HashSet<String>>,
}

impl SeenPairs {
    pub fn contains(&self, a: &str, b: &str) -> bool {
        let forward = self.seen.get(a).is_some_and(|s| s.contains(b));
        let backward = self.seen.get(b).is_some_and(|s| s.contains(a));
        forward || backward
    }

    pub fn mark(&mut self, a: &str, b: &str) {
        self.seen
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.seen
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }
}

/// Accumulated synonym and antonym pairs. Both lists are append-only and share
/// one `SeenPairs`, so a pair never lands in both lists or twice in one.
#[derive(Debug)]
pub struct Relations {
    pub synonyms: Vec<RelationPair>,
    pub antonyms: Vec<RelationPair>,
    seen: SeenPairs,
    antonym_limit: usize,
}

impl Relations {
    pub fn new(antonym_limit: usize) -> Self {
        Self {
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            seen: SeenPairs::default(),
            antonym_limit,
        }
    }

    pub fn antonyms_full(&self) -> bool {
        self.antonyms.len() >= self.antonym_limit
    }

    /// Records `[word, related]` under `kind`. Returns false when the pair was
    /// already seen in either orientation, or when the antonym list is full.
    pub fn record(&mut self, kind: RelationKind, word: &str, related: &str) -> bool {
        if self.seen.contains(word, related) {
            return false;
        }
        if kind == RelationKind::Antonym && self.antonyms_full() {
            return false;
        }

        self.seen.mark(word, related);
        let pair = RelationPair::new(word, related);
        match kind {
            RelationKind::Synonym => self.synonyms.push(pair),
            RelationKind::Antonym => self.antonyms.push(pair),
        }
        true
    }
}

//! Per-run text dictionary
//!
//! Append-only. Indices are assigned in insertion order starting at 0 and
//! are only meaningful within the run that assigned them.

use std::collections::HashMap;
use std::sync::Arc;

/// Bidirectional `text <-> index` map
#[derive(Debug, Default)]
pub struct TextDictionary {
    indices: HashMap<Arc<str>, u32>,
    texts: Vec<Arc<str>>,
}

impl TextDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index previously assigned to `text`
    pub fn index_of(&self, text: &str) -> Option<u32> {
        self.indices.get(text).copied()
    }

    /// Text registered under `index`
    pub fn text_at(&self, index: u32) -> Option<&Arc<str>> {
        self.texts.get(index as usize)
    }

    /// Register `text` under the next index and return it.
    ///
    /// If `text` is already registered its existing index is returned.
    pub fn register(&mut self, text: Arc<str>) -> u32 {
        if let Some(index) = self.index_of(&text) {
            return index;
        }
        let index = self.texts.len() as u32;
        self.indices.insert(Arc::clone(&text), index);
        self.texts.push(text);
        index
    }

    /// Register `text` under the next index even if it is already present.
    ///
    /// Decoding follows the stream: every inline text takes the next index.
    /// Lookups by text keep returning the first index.
    pub fn append(&mut self, text: Arc<str>) -> u32 {
        let index = self.texts.len() as u32;
        self.indices.entry(Arc::clone(&text)).or_insert(index);
        self.texts.push(text);
        index
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.texts.clear();
    }
}

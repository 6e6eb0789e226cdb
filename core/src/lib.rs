//! In-memory inverted index with term-frequency ranked search.
//!
//! [`InvertedIndex`] is rebuilt wholesale from an ordered batch of texts and
//! [`SearchServer`] resolves batches of queries against its latest generation.

use std::collections::HashMap;

pub mod index;
pub mod persist;
pub mod search;
pub mod tokenizer;

pub use index::{IndexSnapshot, InvertedIndex};
pub use search::{RelativeIndex, SearchServer, DEFAULT_MAX_RESPONSES};
pub use tokenizer::{Analyzer, WhitespaceAnalyzer};

/// Position of the document in the batch handed to [`InvertedIndex::update_document_base`].
pub type DocId = usize;

/// `count` occurrences of a word in document `doc_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub doc_id: DocId,
    pub count: usize,
}

/// word -> entries, one per document containing the word, in merge order
pub type FrequencyDictionary = HashMap<String, Vec<Entry>>;

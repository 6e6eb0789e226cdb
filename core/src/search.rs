use crate::index::{IndexSnapshot, InvertedIndex};
use crate::tokenizer::unique_words;
use crate::DocId;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

pub const DEFAULT_MAX_RESPONSES: usize = 5;

/// A document's relevance to one query, relative to the best match of that query.
#[derive(Debug, Clone, Copy)]
pub struct RelativeIndex {
    pub doc_id: DocId,
    /// In `[0, 1]`, rounded to two decimals.
    pub rank: f32,
}

impl PartialEq for RelativeIndex {
    fn eq(&self, other: &Self) -> bool { self.doc_id == other.doc_id && self.rank == other.rank }
}

impl RelativeIndex {
    /// Rank descending, then doc id ascending.
    pub fn cmp_by_rank(&self, other: &Self) -> Ordering {
        other.rank.total_cmp(&self.rank).then(self.doc_id.cmp(&other.doc_id))
    }
}

/// Resolves batches of queries against an [`InvertedIndex`].
pub struct SearchServer {
    index: Arc<InvertedIndex>,
    max_responses: usize,
}

impl SearchServer {
    pub fn new(index: Arc<InvertedIndex>) -> Self { Self { index, max_responses: DEFAULT_MAX_RESPONSES } }

    pub fn set_max_responses(&mut self, max_responses: usize) { self.max_responses = max_responses; }

    pub fn max_responses(&self) -> usize { self.max_responses }

    /// One ranked, capped result list per query, in query order.
    pub fn search(&self, queries: &[String]) -> Vec<Vec<RelativeIndex>> {
        if queries.is_empty() {
            tracing::info!("requests are empty");
            return Vec::new();
        }
        queries.iter().map(|q| self.search_one(q)).collect()
    }

    fn search_one(&self, query: &str) -> Vec<RelativeIndex> {
        let words = unique_words(self.index.analyzer(), query);
        if words.is_empty() {
            tracing::info!(query, "bad request: no words");
            return Vec::new();
        }
        let Some(snapshot) = self.index.snapshot() else {
            tracing::info!(query, "index is being rebuilt, request skipped");
            return Vec::new();
        };

        let by_frequency = words_by_total_count(&snapshot, &words);
        for &(word, _) in by_frequency.iter().take_while(|&&(_, total)| total == 0) {
            tracing::debug!(query, word, "word not found");
        }
        let doc_ids = candidate_documents(&snapshot, &by_frequency);

        let absolute: Vec<(DocId, usize)> = doc_ids
            .into_iter()
            .map(|doc_id| {
                let relevance: usize = words.iter().map(|w| snapshot.word_count_in_doc(w, doc_id)).sum();
                (doc_id, relevance)
            })
            .collect();
        let max_abs = absolute.iter().map(|&(_, r)| r).max().unwrap_or(0);

        let mut results: Vec<RelativeIndex> = absolute
            .into_iter()
            .map(|(doc_id, relevance)| RelativeIndex { doc_id, rank: relative_rank(relevance, max_abs) })
            .collect();
        results.sort_by(RelativeIndex::cmp_by_rank);
        results.truncate(self.max_responses);

        tracing::debug!(query, words = words.len(), hits = results.len(), generation = snapshot.generation(), "query resolved");
        results
    }
}

/// Query words paired with their occurrence count across the whole index, rarest first.
fn words_by_total_count<'a>(snapshot: &IndexSnapshot, words: &'a BTreeSet<String>) -> Vec<(&'a str, usize)> {
    let mut pairs: Vec<(&str, usize)> = words.iter().map(|w| (w.as_str(), snapshot.total_count(w))).collect();
    pairs.sort_by_key(|&(_, total)| total);
    pairs
}

/// Every document containing at least one of the words, ascending.
fn candidate_documents(snapshot: &IndexSnapshot, words: &[(&str, usize)]) -> Vec<DocId> {
    let mut seen: HashSet<DocId> = HashSet::new();
    for (word, _) in words {
        seen.extend(snapshot.word_count(word).iter().map(|e| e.doc_id));
    }
    let mut doc_ids: Vec<DocId> = seen.into_iter().collect();
    doc_ids.sort_unstable();
    doc_ids
}

fn relative_rank(relevance: usize, max_abs: usize) -> f32 {
    if max_abs == 0 {
        return 0.0;
    }
    let rank = relevance as f32 / max_abs as f32;
    (rank * 100.0).round() / 100.0
}

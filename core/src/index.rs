use crate::tokenizer::{count_words, Analyzer, WhitespaceAnalyzer};
use crate::{DocId, Entry, FrequencyDictionary};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// One completed index generation. Immutable once published.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    generation: u64,
    documents: Vec<String>,
    dictionary: FrequencyDictionary,
}

impl IndexSnapshot {
    pub fn generation(&self) -> u64 { self.generation }
    pub fn num_docs(&self) -> usize { self.documents.len() }
    pub fn num_words(&self) -> usize { self.dictionary.len() }

    pub fn document(&self, doc_id: DocId) -> Option<&str> {
        self.documents.get(doc_id).map(String::as_str)
    }

    /// Entries for `word` in merge order; empty if the word is unknown.
    pub fn word_count(&self, word: &str) -> &[Entry] {
        self.dictionary.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn word_count_in_doc(&self, word: &str, doc_id: DocId) -> usize {
        self.word_count(word).iter().find(|e| e.doc_id == doc_id).map_or(0, |e| e.count)
    }

    pub fn contains_word(&self, word: &str) -> bool { self.dictionary.contains_key(word) }

    /// Occurrences of `word` summed over every document.
    pub fn total_count(&self, word: &str) -> usize {
        self.word_count(word).iter().map(|e| e.count).sum()
    }
}

/// Word frequency store rebuilt wholesale from a batch of documents.
///
/// Reads never block on a rebuild: while one is running they degrade to
/// empty results, otherwise they see the last fully built generation.
pub struct InvertedIndex {
    analyzer: Arc<dyn Analyzer>,
    current: RwLock<Arc<IndexSnapshot>>,
    indexing: AtomicBool,
    generation: AtomicU64,
    rebuild: Mutex<()>,
}

impl Default for InvertedIndex {
    fn default() -> Self { Self::new() }
}

impl InvertedIndex {
    pub fn new() -> Self { Self::with_analyzer(Arc::new(WhitespaceAnalyzer)) }

    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            current: RwLock::new(Arc::new(IndexSnapshot::default())),
            indexing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            rebuild: Mutex::new(()),
        }
    }

    pub fn analyzer(&self) -> &dyn Analyzer { self.analyzer.as_ref() }

    pub fn is_indexing(&self) -> bool { self.indexing.load(Ordering::Acquire) }

    /// Number of completed rebuilds.
    pub fn generation(&self) -> u64 { self.generation.load(Ordering::Acquire) }

    /// Replace the document base and rebuild the frequency dictionary from scratch.
    /// Document ids are positions in `docs`. An empty batch leaves the index untouched.
    pub fn update_document_base(&self, docs: &[String]) {
        if docs.is_empty() {
            tracing::info!("indexing: no content in document base");
            return;
        }

        // concurrent rebuilds run one after another
        let _rebuild = self.rebuild.lock();
        let _flag = IndexingFlag::raise(&self.indexing);
        let start = std::time::Instant::now();

        let dictionary: Mutex<FrequencyDictionary> = Mutex::new(HashMap::new());
        docs.par_iter().enumerate().for_each(|(doc_id, text)| {
            let counts = count_words(self.analyzer.as_ref(), text);
            merge_document(&dictionary, doc_id, counts);
        });

        let generation = self.generation.load(Ordering::Acquire) + 1;
        let snapshot = IndexSnapshot { generation, documents: docs.to_vec(), dictionary: dictionary.into_inner() };
        let num_words = snapshot.num_words();
        *self.current.write() = Arc::new(snapshot);
        self.generation.store(generation, Ordering::Release);

        tracing::info!(
            generation,
            num_docs = docs.len(),
            num_words,
            took_ms = start.elapsed().as_millis() as u64,
            "index build complete"
        );
    }

    /// Current generation, or `None` while a rebuild is running.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        if self.is_indexing() {
            tracing::debug!("index is ongoing, please repeat the request later");
            return None;
        }
        Some(self.current.read().clone())
    }

    pub fn get_word_count(&self, word: &str) -> Vec<Entry> {
        self.snapshot().map(|s| s.word_count(word).to_vec()).unwrap_or_default()
    }

    pub fn get_word_count_in_doc(&self, word: &str, doc_id: DocId) -> usize {
        let Some(snapshot) = self.snapshot() else { return 0 };
        if !snapshot.contains_word(word) {
            tracing::debug!(word, "word not found");
            return 0;
        }
        snapshot.word_count_in_doc(word, doc_id)
    }
}

// Lock held per document merge only; tokenization happens outside it.
fn merge_document(dictionary: &Mutex<FrequencyDictionary>, doc_id: DocId, counts: HashMap<String, usize>) {
    let mut dictionary = dictionary.lock();
    for (word, count) in counts {
        dictionary.entry(word).or_default().push(Entry { doc_id, count });
    }
}

/// Clears the in-progress flag even if a rebuild unwinds.
struct IndexingFlag<'a>(&'a AtomicBool);

impl<'a> IndexingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for IndexingFlag<'_> {
    fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

use crate::search::{RelativeIndex, DEFAULT_MAX_RESPONSES};
use crate::DocId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Contents of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub config: AppInfo,
    /// Document paths; a document's id is its position in this list.
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    #[serde(default = "default_max_responses")]
    pub max_responses: usize,
}

fn default_max_responses() -> usize { DEFAULT_MAX_RESPONSES }

impl Config {
    pub fn max_responses(&self) -> usize { self.config.max_responses }
}

#[derive(Debug, Serialize, Deserialize)]
struct RequestsFile {
    requests: Vec<String>,
}

/// Contents of `answers.json`, keyed `request0`, `request1`, ...
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswersFile {
    pub answers: BTreeMap<String, Answer>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub result: bool,
    // a single hit is written inline, anything else as a relevance list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docid: Option<DocId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<Vec<Relevance>>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Relevance {
    pub docid: DocId,
    pub rank: f32,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("config file not found: {}", path.display()))?;
    let config: Config = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("malformed config file: {}", path.display()))?;
    Ok(config)
}

/// Read every configured document in order. Invalid UTF-8 is replaced, not
/// rejected. Unreadable files become empty documents so the remaining ids
/// still match their positions.
pub fn read_documents(config: &Config) -> Vec<String> {
    let docs: Vec<String> = config
        .files
        .iter()
        .map(|path| match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "document not readable, indexing it as empty");
                String::new()
            }
        })
        .collect();
    tracing::info!(files = docs.len(), "input documents read");
    docs
}

pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("requests file not found: {}", path.display()))?;
    let file: RequestsFile = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("malformed requests file: {}", path.display()))?;
    tracing::info!(requests = file.requests.len(), "requests read");
    Ok(file.requests)
}

pub fn build_answers(results: &[Vec<RelativeIndex>], max_responses: usize) -> AnswersFile {
    let answers = results
        .iter()
        .enumerate()
        .map(|(i, hits)| (format!("request{i}"), answer_for(hits, max_responses)))
        .collect();
    AnswersFile { answers }
}

fn answer_for(hits: &[RelativeIndex], max_responses: usize) -> Answer {
    let mut answer = Answer { result: !hits.is_empty(), docid: None, rank: None, relevance: None };
    if let [only] = hits {
        answer.docid = Some(only.doc_id);
        answer.rank = Some(only.rank);
    } else {
        let relevance = hits.iter().take(max_responses).map(|h| Relevance { docid: h.doc_id, rank: h.rank }).collect();
        answer.relevance = Some(relevance);
    }
    answer
}

/// Write `answers.json`. An empty batch writes nothing and returns `Ok(false)`.
pub fn save_answers<P: AsRef<Path>>(path: P, results: &[Vec<RelativeIndex>], max_responses: usize) -> Result<bool> {
    let path = path.as_ref();
    if results.is_empty() {
        tracing::info!("no answers to push");
        return Ok(false);
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let f = File::create(path).with_context(|| format!("cannot create answers file: {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &build_answers(results, max_responses))?;
    w.flush()?;
    tracing::info!(path = %path.display(), answers = results.len(), "answers written");
    Ok(true)
}

pub fn load_answers<P: AsRef<Path>>(path: P) -> Result<AnswersFile> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("answers file not found: {}", path.display()))?;
    Ok(serde_json::from_reader(BufReader::new(f))?)
}

use docsearch_cli::{run, Args};
use docsearch_core::persist::load_answers;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_fixture(dir: &Path, texts: &[&str], requests: &[&str], max_responses: usize) -> Args {
    let mut files = Vec::new();
    for (i, text) in texts.iter().enumerate() {
        let p = dir.join(format!("file{i:03}.txt"));
        fs::write(&p, text).unwrap();
        files.push(p);
    }
    let config = json!({
        "config": { "name": "DocSearch", "version": "0.1", "max_responses": max_responses },
        "files": files,
    });
    fs::write(dir.join("config.json"), config.to_string()).unwrap();
    fs::write(dir.join("requests.json"), json!({ "requests": requests }).to_string()).unwrap();

    Args {
        config: dir.join("config.json"),
        requests: dir.join("requests.json"),
        answers: dir.join("out/answers.json"),
        threads: Some(2),
    }
}

#[test]
fn writes_ranked_answers() {
    let dir = tempdir().unwrap();
    let args = write_fixture(
        dir.path(),
        &["london is the capital of great britain", "big ben is in london", "paris"],
        &["london", "london ben", "tokyo", "paris"],
        5,
    );

    let summary = run(&args).unwrap();
    assert_eq!(summary.documents, 3);
    assert_eq!(summary.requests, 4);
    assert_eq!(summary.matched, 3);
    assert!(summary.answers_written);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&args.answers).unwrap()).unwrap();
    assert_eq!(
        raw["answers"]["request0"],
        json!({ "result": true, "relevance": [{ "docid": 0, "rank": 1.0 }, { "docid": 1, "rank": 1.0 }] })
    );
    assert_eq!(
        raw["answers"]["request1"],
        json!({ "result": true, "relevance": [{ "docid": 1, "rank": 1.0 }, { "docid": 0, "rank": 0.5 }] })
    );
    assert_eq!(raw["answers"]["request2"]["result"], json!(false));
    assert_eq!(raw["answers"]["request3"], json!({ "result": true, "docid": 2, "rank": 1.0 }));
}

#[test]
fn respects_configured_limit() {
    let dir = tempdir().unwrap();
    let texts: Vec<String> = (0..8).map(|i| format!("moscow {}", "snow ".repeat(i))).collect();
    let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
    let args = write_fixture(dir.path(), &texts, &["moscow snow"], 3);

    run(&args).unwrap();
    let answers = load_answers(&args.answers).unwrap();
    let relevance = answers.answers["request0"].relevance.as_ref().unwrap();
    let ids: Vec<usize> = relevance.iter().map(|r| r.docid).collect();
    assert_eq!(ids, vec![7, 6, 5]);
    assert_eq!(relevance[0].rank, 1.0);
}

#[test]
fn missing_document_keeps_positions() {
    let dir = tempdir().unwrap();
    let mut args = write_fixture(dir.path(), &["alpha", "beta"], &["beta"], 5);
    let config = json!({
        "config": { "name": "DocSearch", "version": "0.1" },
        "files": [dir.path().join("file000.txt"), dir.path().join("gone.txt"), dir.path().join("file001.txt")],
    });
    fs::write(&args.config, config.to_string()).unwrap();
    args.threads = None;

    let summary = run(&args).unwrap();
    assert_eq!(summary.documents, 3);
    let answers = load_answers(&args.answers).unwrap();
    assert_eq!(answers.answers["request0"].docid, Some(2));
}

#[test]
fn empty_request_batch_writes_nothing() {
    let dir = tempdir().unwrap();
    let args = write_fixture(dir.path(), &["alpha"], &[], 5);
    let summary = run(&args).unwrap();
    assert_eq!(summary.requests, 0);
    assert!(!summary.answers_written);
    assert!(!args.answers.exists());
}

#[test]
fn missing_config_is_an_error() {
    let dir = tempdir().unwrap();
    let args = Args {
        config: dir.path().join("config.json"),
        requests: dir.path().join("requests.json"),
        answers: dir.path().join("answers.json"),
        threads: None,
    };
    let err = run(&args).unwrap_err();
    assert!(err.to_string().contains("config file not found"));
}

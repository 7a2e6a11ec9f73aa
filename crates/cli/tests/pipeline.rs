use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::{tempdir, TempDir};

const TOPIC: &str = "We should ban homeschooling";

fn write_split(dir: &Path, split: &str, labelled: bool) {
    fs::write(
        dir.join(format!("arguments_{split}.csv")),
        format!(
            "arg_id,argument,topic,stance\n\
             a1,Homeschooled children miss out on the social skills they learn at school,{TOPIC},1\n\
             a2,Parents are not qualified teachers so their children get a worse education,{TOPIC},1\n\
             a3,Children kept at home lack contact with other kids and social skills suffer,{TOPIC},1\n\
             a4,Parents have the right to choose how their children are educated,{TOPIC},-1\n"
        ),
    )
    .unwrap();
    fs::write(
        dir.join(format!("key_points_{split}.csv")),
        format!(
            "key_point_id,key_point,topic,stance\n\
             k1,Homeschooling harms the social skills of children,{TOPIC},1\n\
             k2,Parents are not qualified to teach,{TOPIC},1\n\
             k3,Parents should have the freedom to choose education,{TOPIC},-1\n"
        ),
    )
    .unwrap();
    if labelled {
        fs::write(
            dir.join(format!("labels_{split}.csv")),
            "arg_id,key_point_id,label\n\
             a1,k1,1\n\
             a1,k2,0\n\
             a2,k1,0\n\
             a2,k2,1\n\
             a3,k1,1\n\
             a4,k3,1\n",
        )
        .unwrap();
    }
}

fn setup_data() -> TempDir {
    let temp = tempdir().unwrap();
    write_split(temp.path(), "train", true);
    write_split(temp.path(), "dev", true);
    write_split(temp.path(), "test", false);
    temp
}

#[allow(deprecated)]
fn kpm(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kpm").expect("binary");
    cmd.env_remove("KPM_DATA_DIR")
        .env_remove("KPM_DATASET_URL")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("HTTPS_PROXY")
        .env_remove("https_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let output = kpm(data_dir).args(args).output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().expect("number");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn metrics_lists_every_slug() {
    let temp = tempdir().unwrap();
    kpm(temp.path())
        .arg("metrics")
        .assert()
        .success()
        .stdout(predicate::str::contains("map"))
        .stdout(predicate::str::contains("macro-f1"));
}

#[test]
fn all_matcher_scores_every_candidate_pair() {
    let temp = setup_data();
    let root = temp.path();

    let report = run_json(root, &["run", "precision", "--json", "all"]);
    assert_eq!(report["matcher"], "all");
    assert_eq!(report["split"], "dev");
    assert_eq!(report["predicted_pairs"], 7);
    assert_close(&report["evaluation"]["strict"], 4.0 / 7.0);
    assert_close(&report["evaluation"]["relaxed"], 5.0 / 7.0);

    let predictions: Value =
        serde_json::from_str(&fs::read_to_string(root.join("out/all-dev.json")).unwrap()).unwrap();
    assert_eq!(predictions["a1"]["k1"], 1.0);
    assert!(predictions["a1"].get("k3").is_none());
}

#[test]
fn test_split_is_predicted_but_not_evaluated() {
    let temp = setup_data();
    let root = temp.path();

    let report = run_json(
        root,
        &[
            "run",
            "map",
            "--split",
            "test",
            "--json",
            "term-overlap",
            "--stemming",
            "--stop-words",
        ],
    );
    assert_eq!(report["matcher"], "term-overlap-stemming-stop-words");
    assert!(report["evaluation"].is_null());
    assert!(root
        .join("out/term-overlap-stemming-stop-words-test.json")
        .is_file());
}

#[test]
fn text_summary_shows_score_table() {
    let temp = setup_data();
    kpm(temp.path())
        .args(["run", "map", "none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matcher:     none"))
        .stdout(predicate::str::contains("| `map` |"));
}

#[test]
fn regression_model_is_cached_between_runs() {
    let temp = setup_data();
    let root = temp.path();
    let args = [
        "run",
        "map",
        "--json",
        "regression",
        "--encoding",
        "tfidf",
        "--strict",
    ];

    let first = run_json(root, &args);
    assert_eq!(first["matcher"], "regression-tfidf-strict");
    assert_eq!(first["cached_model"], false);
    assert!(root
        .join("cache/regression-tfidf-strict/model.json")
        .is_file());

    let second = run_json(root, &args);
    assert_eq!(second["cached_model"], true);
    assert_eq!(first["evaluation"], second["evaluation"]);
}

#[test]
fn ensemble_caches_each_member() {
    let temp = setup_data();
    let root = temp.path();
    let args = ["run", "map", "--json", "ensemble"];

    let first = run_json(root, &args);
    let slug = "ensemble-0.55-regression-bow-0.45-svc-bow";
    assert_eq!(first["matcher"], slug);
    assert_eq!(first["cached_model"], false);
    let cache = root.join("cache").join(slug);
    assert!(cache.join("regression-bow/model.json").is_file());
    assert!(cache.join("svc-bow/model.json").is_file());

    let second = run_json(root, &args);
    assert_eq!(second["cached_model"], true);
    assert_eq!(first["evaluation"], second["evaluation"]);

    let svc = run_json(root, &["run", "map", "--json", "svc", "--relaxed"]);
    assert_eq!(svc["matcher"], "svc-bow-relaxed");
    assert!(root.join("cache/svc-bow-relaxed/model.json").is_file());
}

#[test]
fn cascade_from_config_file() {
    let temp = setup_data();
    let root = temp.path();
    fs::write(
        root.join("cascade.toml"),
        r#"
type = "cascade"
threshold = 0.5

[first]
type = "term-overlap"
stemming = true

[second]
type = "none"
"#,
    )
    .unwrap();

    let config = root.join("cascade.toml");
    let report = run_json(
        root,
        &["run", "f1", "--json", "--config", config.to_str().unwrap()],
    );
    assert_eq!(report["matcher"], "cascade-0.5-term-overlap-stemming-none");
    assert_eq!(report["predicted_pairs"], 7);
}

#[test]
fn evaluate_scores_existing_predictions() {
    let temp = setup_data();
    let root = temp.path();
    fs::write(
        root.join("gold.json"),
        r#"{"a1": {"k1": 1.0}, "a2": {"k2": 1.0}, "a3": {"k1": 1.0}, "a4": {"k3": 1.0}}"#,
    )
    .unwrap();

    let gold = root.join("gold.json");
    let report = run_json(
        root,
        &[
            "evaluate",
            "recall",
            "--json",
            "--predictions",
            gold.to_str().unwrap(),
        ],
    );
    assert_eq!(report["evaluation"]["metric"], "recall");
    // only predicted or annotated pairs are scored, so both modes agree
    assert_close(&report["evaluation"]["strict"], 1.0);
    assert_close(&report["evaluation"]["relaxed"], 1.0);
}

#[test]
fn missing_matcher_is_an_error() {
    let temp = setup_data();
    kpm(temp.path())
        .args(["run", "map"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matcher subcommand"));
}

#[test]
fn unknown_metric_is_rejected() {
    let temp = setup_data();
    kpm(temp.path())
        .args(["run", "accuracy", "all"])
        .assert()
        .failure();
}

#[test]
fn missing_dataset_points_to_download() {
    let temp = tempdir().unwrap();
    kpm(temp.path())
        .args(["run", "map", "all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("kpm download"));
}

#[test]
fn download_skips_existing_files() {
    let temp = setup_data();
    let root = temp.path();
    fs::write(root.join("labels_test.csv"), "arg_id,key_point_id,label\n").unwrap();

    let report = run_json(
        root,
        &["download", "--json", "--base-url", "http://127.0.0.1:9"],
    );
    assert_eq!(report["downloaded"].as_array().map(Vec::len), Some(0));
    assert_eq!(report["skipped"].as_array().map(Vec::len), Some(9));
}

const DATASET_FILES: [&str; 9] = [
    "arguments_train.csv",
    "key_points_train.csv",
    "labels_train.csv",
    "arguments_dev.csv",
    "key_points_dev.csv",
    "labels_dev.csv",
    "arguments_test.csv",
    "key_points_test.csv",
    "labels_test.csv",
];

/// Serves `<dir>/<file>` for the dataset files over plain HTTP. Train and dev
/// files live under `kpm_data/`, test files under `test_data/`. The body
/// carries the current revision so re-downloads can be told apart.
fn serve_dataset(missing: Option<&'static str>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let revision = Arc::new(AtomicUsize::new(1));
    let served = Arc::clone(&revision);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Ok(read_half) = stream.try_clone() else { continue };
            let mut reader = BufReader::new(read_half);
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            let mut header = String::new();
            while matches!(reader.read_line(&mut header), Ok(n) if n > 2) {
                header.clear();
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let (dir, name) = path.rsplit_once('/').unwrap_or(("", path));
            let expected_dir = if name.ends_with("_test.csv") {
                "/test_data"
            } else {
                "/kpm_data"
            };
            let found =
                dir == expected_dir && DATASET_FILES.contains(&name) && Some(name) != missing;
            let response = if found {
                let body = format!("{name} r{}\n", served.load(Ordering::SeqCst));
                format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
            } else {
                "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    .to_string()
            };
            stream.write_all(response.as_bytes()).ok();
            stream.flush().ok();
        }
    });

    (base_url, revision)
}

fn leftover_downloads(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".download"))
        .collect()
}

fn names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|name| name.as_str().expect("string").to_string())
        .collect()
}

#[test]
fn download_fetches_every_file_and_force_replaces_them() {
    let (base_url, revision) = serve_dataset(None);
    let temp = tempdir().unwrap();
    let data_dir = temp.path().join("data");
    let download = ["download", "--json", "--base-url", base_url.as_str()];

    let report = run_json(&data_dir, &download);
    assert_eq!(names(&report["downloaded"]), DATASET_FILES.to_vec());
    assert!(names(&report["skipped"]).is_empty());
    assert_eq!(
        fs::read_to_string(data_dir.join("labels_dev.csv")).unwrap(),
        "labels_dev.csv r1\n"
    );
    assert_eq!(
        fs::read_to_string(data_dir.join("arguments_test.csv")).unwrap(),
        "arguments_test.csv r1\n"
    );
    assert!(leftover_downloads(&data_dir).is_empty());

    revision.store(2, Ordering::SeqCst);
    let report = run_json(&data_dir, &download);
    assert!(names(&report["downloaded"]).is_empty());
    assert_eq!(names(&report["skipped"]).len(), 9);
    assert_eq!(
        fs::read_to_string(data_dir.join("labels_dev.csv")).unwrap(),
        "labels_dev.csv r1\n"
    );

    let report = run_json(
        &data_dir,
        &["download", "--json", "--force", "--base-url", base_url.as_str()],
    );
    assert_eq!(names(&report["downloaded"]).len(), 9);
    assert_eq!(
        fs::read_to_string(data_dir.join("labels_dev.csv")).unwrap(),
        "labels_dev.csv r2\n"
    );
    assert!(leftover_downloads(&data_dir).is_empty());
}

#[test]
fn failed_download_leaves_no_partial_file() {
    let (base_url, _revision) = serve_dataset(Some("labels_dev.csv"));
    let temp = tempdir().unwrap();
    let root = temp.path();

    kpm(root)
        .args(["download", "--base-url", base_url.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("labels_dev.csv"));

    assert!(root.join("key_points_dev.csv").is_file());
    assert!(!root.join("labels_dev.csv").exists());
    assert!(!root.join("arguments_test.csv").exists());
    assert!(leftover_downloads(root).is_empty());
}

#[test]
fn language_accepts_iso_codes() {
    let temp = setup_data();
    let root = temp.path();

    let english = run_json(
        root,
        &["run", "map", "--json", "term-overlap", "--stemming", "--language", "en"],
    );
    assert_eq!(english["matcher"], "term-overlap-stemming");

    let german = run_json(
        root,
        &["run", "map", "--json", "term-overlap", "--stemming", "--language", "de"],
    );
    assert_eq!(german["matcher"], "term-overlap-stemming-german");
}

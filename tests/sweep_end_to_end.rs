use std::fs;
use std::path::Path;

use regex_hw_bench::engine::SweepGuard;
use regex_hw_bench::storage::{REPORT_HEADERS, read_records};
use regex_hw_bench::sweep_cmd::{self, SweepArgs};
use tempfile::tempdir;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("sweep.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn sweep_with_in_process_backends() {
    let dir = tempdir().unwrap();
    let bench = dir.path().join("tiny.regex");
    fs::write(&bench, "this|that\n[a-c]+d\nfoo.*bar\n").unwrap();
    let output = dir.path().join("out").join("report.csv");
    let jsonl = dir.path().join("out").join("runs.jsonl");

    let config = write_config(
        dir.path(),
        &format!(
            r#"
output = '{}'
jsonl = '{}'

[[backend]]
name = "alpha"
driver = "automata"

[[backend]]
name = "beta"
driver = "automata"

[[benchmark]]
name = "tiny"
path = '{}'
"#,
            output.display(),
            jsonl.display(),
            bench.display()
        ),
    );

    sweep_cmd::run(
        SweepArgs { config, yes: true, ..Default::default() },
        &SweepGuard::new(),
    )
    .unwrap();

    let mut rdr = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, REPORT_HEADERS);

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    let ids: Vec<(String, String, String)> = rows
        .iter()
        .map(|r| (r[0].to_string(), r[1].to_string(), r[2].to_string()))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("alpha".into(), "tiny".into(), "O0".into()),
            ("alpha".into(), "tiny".into(), "O1".into()),
            ("beta".into(), "tiny".into(), "O0".into()),
            ("beta".into(), "tiny".into(), "O1".into()),
        ]
    );
    for r in &rows {
        assert_eq!(r.len(), 17);
        let size_avg: f64 = r[10].parse().unwrap();
        let size_min: f64 = r[11].parse().unwrap();
        let size_max: f64 = r[12].parse().unwrap();
        assert!(size_min <= size_avg && size_avg <= size_max);
        let time_min: f64 = r[4].parse().unwrap();
        assert!(time_min >= 0.0);
        let size_sum: f64 = r[16].parse().unwrap();
        assert!(size_sum > 0.0);
    }

    let records = read_records(&jsonl).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].row.regex_count, 3);
    assert_eq!(records[0].benchmark_sha256.as_deref().map(str::len), Some(64));
    assert!(records[1].row.optimize);
}

#[test]
fn output_override_wins_over_config() {
    let dir = tempdir().unwrap();
    let bench = dir.path().join("one.regex");
    fs::write(&bench, "ab*c\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!(
            r#"
output = '{}'

[[backend]]
name = "auto"
driver = "automata"

[[benchmark]]
name = "one"
path = '{}'

[[optimization]]
name = "O1"
enabled = true
"#,
            dir.path().join("ignored.csv").display(),
            bench.display()
        ),
    );
    let output = dir.path().join("chosen.csv");

    sweep_cmd::run(
        SweepArgs {
            config,
            output: Some(output.clone()),
            yes: true,
            ..Default::default()
        },
        &SweepGuard::new(),
    )
    .unwrap();

    assert!(!dir.path().join("ignored.csv").exists());
    let s = fs::read_to_string(&output).unwrap();
    assert_eq!(s.lines().count(), 2);
    assert!(s.lines().nth(1).unwrap().starts_with("auto,one,O1,"));
}

#[test]
fn cancelled_before_sweep_writes_nothing() {
    let dir = tempdir().unwrap();
    let bench = dir.path().join("one.regex");
    fs::write(&bench, "a\n").unwrap();
    let output = dir.path().join("report.csv");
    let config = write_config(
        dir.path(),
        &format!(
            r#"
output = '{}'
confirm_delay_secs = 30

[[backend]]
name = "auto"
driver = "automata"

[[benchmark]]
name = "one"
path = '{}'
"#,
            output.display(),
            bench.display()
        ),
    );

    let guard = SweepGuard::new();
    guard.interrupt();
    let err = sweep_cmd::run(SweepArgs { config, ..Default::default() }, &guard).unwrap_err();
    assert_eq!(err.exit_code(), regex_hw_bench::EXIT_CANCELLED);
    assert!(!output.exists());
}

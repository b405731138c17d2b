use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use regex_hw_bench::BenchError;
use regex_hw_bench::backend::SearchPath;
use regex_hw_bench::core::BackendDescriptor;
use regex_hw_bench::engine::{BackendLoader, SweepGuard};
use regex_hw_bench::sweep_cmd::{self, SweepArgs};
use tempfile::tempdir;

/// Fake `re2compiler`: three artifact lines without `--O1`, two with it, and a
/// failing exit for the pattern `BAD`.
fn install_fake_compiler(dir: &Path) -> PathBuf {
    let path = dir.join("re2compiler");
    let script = r#"#!/usr/bin/env bash
if [ "$1" = "--O1" ]; then opt=1; shift; else opt=0; fi
if [ "$1" = "BAD" ]; then
  echo "cannot compile $1" >&2
  exit 3
fi
if [ "$opt" = 1 ]; then printf 'jmp\nacc\n'; else printf 'jmp\nmatch\nacc\n'; fi
"#;
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn config(dir: &Path, location: &Path, bench: &Path, output: &Path) -> PathBuf {
    let path = dir.join("sweep.toml");
    fs::write(
        &path,
        format!(
            r#"
output = '{}'

[[backend]]
name = "fake"
location = '{}'

[[benchmark]]
name = "small"
path = '{}'
"#,
            output.display(),
            location.display(),
            bench.display()
        ),
    )
    .unwrap();
    path
}

#[test]
fn sweep_with_command_backend() {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("bin");
    fs::create_dir(&bin).unwrap();
    install_fake_compiler(&bin);
    let bench = dir.path().join("small.regex");
    fs::write(&bench, "a|b\nabc\n").unwrap();
    let output = dir.path().join("report.csv");

    sweep_cmd::run(
        SweepArgs {
            config: config(dir.path(), &bin, &bench, &output),
            yes: true,
            ..Default::default()
        },
        &SweepGuard::new(),
    )
    .unwrap();

    let mut rdr = csv::Reader::from_path(&output).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "O0");
    assert_eq!(&rows[0][10], "3");
    assert_eq!(&rows[0][16], "6");
    assert_eq!(&rows[1][2], "O1");
    assert_eq!(&rows[1][10], "2");
    assert_eq!(&rows[1][16], "4");
}

#[test]
fn failing_regex_aborts_sweep() {
    let dir = tempdir().unwrap();
    install_fake_compiler(dir.path());
    let bench = dir.path().join("broken.regex");
    fs::write(&bench, "ok\nBAD\nok2\n").unwrap();
    let output = dir.path().join("report.csv");

    let err = sweep_cmd::run(
        SweepArgs {
            config: config(dir.path(), dir.path(), &bench, &output),
            yes: true,
            ..Default::default()
        },
        &SweepGuard::new(),
    )
    .unwrap_err();

    match &err {
        BenchError::Compile { backend, optimization, index, pattern, .. } => {
            assert_eq!(backend, "fake");
            assert_eq!(optimization, "O0");
            assert_eq!(*index, 1);
            assert_eq!(pattern, "BAD");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("cannot compile"));
    assert_eq!(err.exit_code(), 1);

    // header only: the failing cell produced no row
    let s = fs::read_to_string(&output).unwrap();
    assert_eq!(s.lines().count(), 1);
}

#[test]
fn missing_program_fails_preflight_without_report() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty");
    fs::create_dir(&empty).unwrap();
    let bench = dir.path().join("small.regex");
    fs::write(&bench, "a\n").unwrap();
    let output = dir.path().join("report.csv");

    let err = sweep_cmd::run(
        SweepArgs {
            config: config(dir.path(), &empty, &bench, &output),
            yes: true,
            ..Default::default()
        },
        &SweepGuard::new(),
    )
    .unwrap_err();
    assert!(matches!(err, BenchError::BackendUnavailable { .. }), "{err:?}");
    assert!(!output.exists());
}

#[test]
fn missing_benchmark_fails_preflight_without_report() {
    let dir = tempdir().unwrap();
    install_fake_compiler(dir.path());
    let output = dir.path().join("report.csv");

    let err = sweep_cmd::run(
        SweepArgs {
            config: config(dir.path(), dir.path(), &dir.path().join("nope.regex"), &output),
            yes: true,
            ..Default::default()
        },
        &SweepGuard::new(),
    )
    .unwrap_err();
    assert!(matches!(err, BenchError::MissingBenchmark { .. }), "{err:?}");
    assert!(!output.exists());
}

#[test]
fn loader_restores_search_path() {
    let dir = tempdir().unwrap();
    install_fake_compiler(dir.path());
    let base = SearchPath::new(vec![PathBuf::from("/nonexistent")]);
    let mut loader = BackendLoader::new(base.clone());

    let descriptor = BackendDescriptor::command("fake", dir.path());
    {
        let bound = loader.load(&descriptor).unwrap();
        let artifact = bound.compile("x|y", true).unwrap();
        assert_eq!(artifact, "jmp\nacc\n");
    }
    assert_eq!(loader.search_path(), &base);

    // a second bind finds the same program again
    let bound = loader.load(&descriptor).unwrap();
    assert_eq!(bound.compile("x", false).unwrap().lines().count(), 3);
    bound.unload();
    assert_eq!(loader.search_path(), &base);
}

//! Integration tests for sismo-cli.
//!
//! Tests run the `sismo` binary against synthetic text records written to a
//! temporary directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Helper to get the path to the `sismo` binary built by cargo.
fn sismo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sismo"))
}

/// Write a three-component record starting 2014-01-26 13:55:29.
///
/// Quiet noise until `onset` seconds, then a 3 Hz burst.
fn write_record(dir: &Path, name: &str, station: &str, seconds: usize, onset: f64) -> PathBuf {
    let rate = 50.0;
    let npts = seconds * 50 + 1;
    let mut text = String::from("Strong-motion record export\n");
    writeln!(text, "Station: {station}").unwrap();
    writeln!(text, "Start time: 2014-01-26 13:55:29").unwrap();
    writeln!(text, "Sampling frequency: {rate}Hz").unwrap();
    writeln!(text, "Number of samples: {npts}").unwrap();
    text.push_str("Units: m/s^2\n\n");
    text.push_str("Components: HNE HNN HNZ\n\n\n");
    for i in 0..npts {
        let t = i as f64 / rate;
        let amplitude = if t >= onset { 0.5 } else { 1e-4 };
        let phase = 2.0 * std::f64::consts::PI * 3.0 * t;
        writeln!(
            text,
            "{} {} {}",
            amplitude * phase.sin(),
            amplitude * phase.cos(),
            0.3 * amplitude * (2.0 * phase).sin()
        )
        .unwrap();
    }
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// `sismo config`
// ---------------------------------------------------------------------------

#[test]
fn config_prints_default_toml() {
    let output = sismo_bin().arg("config").output().expect("failed to run sismo config");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let config = sismo_config::PipelineConfig::from_toml(&stdout).unwrap();
    assert_eq!(config, sismo_config::PipelineConfig::default());
    assert!(stdout.contains("window_length"));
    assert!(stdout.contains("[filter]"));
    assert!(stdout.contains("# filter.freq_max must not exceed"));
}

#[test]
fn config_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("pipeline.toml");

    let output = sismo_bin()
        .args(["config", "--output"])
        .arg(&path)
        .output()
        .expect("failed to run sismo config --output");
    assert!(output.status.success());

    let loaded = sismo_config::PipelineConfig::load(&path).unwrap();
    assert_eq!(loaded, sismo_config::PipelineConfig::default());
}

// ---------------------------------------------------------------------------
// `sismo inspect`
// ---------------------------------------------------------------------------

#[test]
fn inspect_shows_header_and_record_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_record(dir.path(), "vsk1.txt", "VSK1", 60, 30.0);

    let output = sismo_bin()
        .arg("inspect")
        .arg(&path)
        .output()
        .expect("failed to run sismo inspect");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("VSK1"));
    assert!(stdout.contains("2014-01-26 13:55:29"));
    assert!(stdout.contains("50 Hz"));
    assert!(stdout.contains("3001"));
    assert!(stdout.contains("HNE HNN HNZ"));
    assert!(stdout.contains("60.000s"));
    assert!(stdout.contains("20140126_135529_VSK1"));
    assert!(stdout.contains("Validation:    ok"));
    assert!(stdout.contains("PGA"));
}

#[test]
fn inspect_fails_on_malformed_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.txt");
    std::fs::write(&path, "just one line").unwrap();

    let output = sismo_bin()
        .arg("inspect")
        .arg(&path)
        .output()
        .expect("failed to run sismo inspect");
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `sismo process`
// ---------------------------------------------------------------------------

/// Data directory with one processable record (builtin picks 18 / 23 s),
/// one record without picks and one malformed file.
fn mixed_batch(dir: &Path) -> PathBuf {
    let data = dir.join("data");
    std::fs::create_dir(&data).unwrap();
    write_record(&data, "a_vsk1.txt", "VSK1", 120, 22.0);
    write_record(&data, "b_abc1.txt", "ABC1", 120, 40.0);
    std::fs::write(data.join("c_broken.txt"), "header only\n").unwrap();
    data
}

fn run_process(data: &Path, out: &Path, extra: &[&str]) -> std::process::Output {
    sismo_bin()
        .arg("process")
        .arg(data)
        .arg("--output")
        .arg(out)
        .args(extra)
        .output()
        .expect("failed to run sismo process")
}

fn figure_lines(out: &Path) -> Vec<serde_json::Value> {
    let text = std::fs::read_to_string(out.join("figures.jsonl")).unwrap();
    text.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn process_skips_bad_records_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let data = mixed_batch(dir.path());
    let out = dir.path().join("out");

    let output = run_process(&data, &out, &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Processed: 1"), "{stdout}");
    assert!(stdout.contains("Skipped:   2"), "{stdout}");

    let figures = figure_lines(&out);
    assert_eq!(figures.len(), 8 + 3);
    assert!(figures.iter().all(|f| f["record"] == "20140126_135529_VSK1"));
    let spectra = figures.iter().filter(|f| f["kind"] == "spectra").count();
    assert_eq!(spectra, 3);
    assert_eq!(figures[0]["kind"], "waveform");

    for component in ["HNE", "HNN", "HNZ"] {
        let csv = out.join(format!("20140126_135529_VSK1_{component}.csv"));
        assert!(csv.exists(), "missing {}", csv.display());
    }
    assert!(!out.join("20140126_135529_ABC1_HNE.csv").exists());
}

#[test]
fn process_parallel_matches_sequential_counts() {
    let dir = tempfile::tempdir().unwrap();
    let data = mixed_batch(dir.path());
    let out = dir.path().join("out");

    let output = run_process(&data, &out, &["--parallel"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Processed: 1"));
    assert!(stdout.contains("Skipped:   2"));
    assert_eq!(figure_lines(&out).len(), 11);
}

#[test]
fn process_uses_extra_arrivals() {
    let dir = tempfile::tempdir().unwrap();
    let data = mixed_batch(dir.path());
    let out = dir.path().join("out");
    let arrivals = dir.path().join("arrivals.toml");
    std::fs::write(
        &arrivals,
        "[records.20140126_135529_ABC1]\np = 30.0\ns = 41.0\n",
    )
    .unwrap();

    let output = run_process(&data, &out, &["--arrivals", arrivals.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Processed: 2"), "{stdout}");
    assert!(stdout.contains("Skipped:   1"), "{stdout}");
    assert!(out.join("20140126_135529_ABC1_HNZ.csv").exists());
}

#[test]
fn process_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = mixed_batch(dir.path());
    let out = dir.path().join("out");
    let config = dir.path().join("pipeline.toml");
    std::fs::write(
        &config,
        "window_length = 4.0\n\n[filter]\nfreq_min = 0.2\nfreq_max = 20.0\n\n[spectrum.grid]\nmin_freq = 0.5\nmax_freq = 20.0\npoints = 12\n\n[response]\nperiod_count = 25\n",
    )
    .unwrap();

    let output = run_process(&data, &out, &["--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let figures = figure_lines(&out);
    let spectra: Vec<_> = figures.iter().filter(|f| f["kind"] == "spectra").collect();
    assert_eq!(spectra.len(), 3);
    for figure in spectra {
        assert_eq!(figure["masked"].as_array().unwrap().len(), 12);
        assert_eq!(figure["response"]["periods"].as_array().unwrap().len(), 25);
    }

    let csv = std::fs::read_to_string(out.join("20140126_135529_VSK1_HNE.csv")).unwrap();
    assert_eq!(csv.lines().count(), 13);
}

#[test]
fn process_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let data = mixed_batch(dir.path());
    let config = dir.path().join("pipeline.toml");
    std::fs::write(&config, "window_length = -1.0\n").unwrap();

    let output = run_process(&data, &dir.path().join("out"), &["--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn process_missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_process(&dir.path().join("nope"), &dir.path().join("out"), &[]);
    assert!(!output.status.success());
}

#[test]
fn process_empty_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();

    let output = run_process(&data, &dir.path().join("out"), &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no records found"));
}

#[test]
fn process_log_file_names_skipped_records() {
    let dir = tempfile::tempdir().unwrap();
    let data = mixed_batch(dir.path());
    let out = dir.path().join("out");
    let log = dir.path().join("run.log");

    let output = run_process(&data, &out, &["--log-file", log.to_str().unwrap()]);
    assert!(output.status.success());

    let log_text = std::fs::read_to_string(&log).unwrap();
    assert!(log_text.contains("skipping record"));
    assert!(log_text.contains("b_abc1.txt"));
    assert!(log_text.contains("arrival lookup"));
    assert!(log_text.contains("c_broken.txt"));
    assert!(log_text.contains("ingestion"));
    assert!(!log_text.contains('\u{1b}'), "log file should not contain ANSI escapes");
}

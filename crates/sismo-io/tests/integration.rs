//! Integration tests for sismo-io: ingestion from disk and file sinks.

use sismo_core::validate_waveform;
use sismo_io::{Figure, FigureSink, JsonLinesSink, export_spectra_csv, read_record};
use std::fmt::Write as _;
use std::fs;

fn record_text(station: &str, rate: f64, rows: usize) -> String {
    let mut text = String::new();
    writeln!(text, "STRONG MOTION RECORD").unwrap();
    writeln!(text, "Station: {station}").unwrap();
    writeln!(text, "Start time: 2014-01-26 13:55:37").unwrap();
    writeln!(text, "Sampling rate: {rate} Hz").unwrap();
    writeln!(text, "Number of samples: {rows}").unwrap();
    writeln!(text, "Units: m/s^2").unwrap();
    writeln!(text, "Filter: none").unwrap();
    writeln!(text, "Components: E N Z").unwrap();
    writeln!(text, "Remarks:").unwrap();
    writeln!(text, "---").unwrap();
    for i in 0..rows {
        let x = i as f64 * 0.01;
        writeln!(text, "{x} {} {}", -x, 2.0 * x).unwrap();
    }
    text
}

#[test]
fn read_record_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ARG2.txt");
    fs::write(&path, record_text("ARG2", 200.0, 400)).unwrap();

    let w = read_record(&path).unwrap();
    assert_eq!(validate_waveform(&w), Ok(()));
    assert_eq!(w.record_id().unwrap().as_str(), "20140126_135537_ARG2");
    assert_eq!(w.channel("N").unwrap().samples[2], -0.02);
    assert!((w.duration() - 399.0 / 200.0).abs() < 1e-12);
}

#[test]
fn unset_rate_record_parses_but_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ZAK2.txt");
    fs::write(&path, record_text("ZAK2", 1.0, 10)).unwrap();
    let w = read_record(&path).unwrap();
    assert!(validate_waveform(&w).is_err());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_record(dir.path().join("nope.txt")),
        Err(sismo_io::Error::Io(_))
    ));
}

#[test]
fn json_lines_and_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let text_path = dir.path().join("VSK1.txt");
    fs::write(&text_path, record_text("VSK1", 100.0, 50)).unwrap();
    let w = read_record(&text_path).unwrap();
    let id = w.record_id().unwrap();

    let jsonl = dir.path().join("figures.jsonl");
    let mut sink = JsonLinesSink::create(&jsonl).unwrap();
    sink.accept(&Figure::waveform("Initial records", &id, &w, None))
        .unwrap();
    sink.flush().unwrap();
    let content = fs::read_to_string(&jsonl).unwrap();
    assert_eq!(content.lines().count(), 1);
    let figure: Figure = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(figure.record(), &id);

    let spectrum = sismo_analysis::analyze_window(
        w.first().unwrap(),
        &sismo_analysis::FrequencyGrid {
            min_freq: 1.0,
            max_freq: 40.0,
            points: 8,
        },
        40.0,
        1,
    )
    .unwrap();
    let masked = vec![None; 8];
    let csv = dir.path().join("spectra.csv");
    export_spectra_csv(&csv, &spectrum, &spectrum, &masked).unwrap();
    let csv_text = fs::read_to_string(&csv).unwrap();
    assert_eq!(csv_text.lines().count(), 9);
    assert!(csv_text.lines().skip(1).all(|l| l.ends_with(',')));
}

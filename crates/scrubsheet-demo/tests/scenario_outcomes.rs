//! Every built-in scenario, run through the CLI entry point, ends where a
//! user would expect.

use clap::Parser;
use scrubsheet_demo::cli::{Cli, run};
use serde_json::Value;

/// The style header followed by every frame record.
fn run_jsonl_with_header(extra: &[&str]) -> (Value, Vec<Value>) {
    let mut argv = vec!["scrubsheet-demo", "run", "--format", "jsonl"];
    argv.extend_from_slice(extra);
    let cli = Cli::try_parse_from(argv).expect("parse");
    let mut out = Vec::new();
    run(cli, &mut out).expect("run");
    let mut lines = String::from_utf8(out)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).expect("json line"))
        .collect::<Vec<_>>()
        .into_iter();
    let header = lines.next().expect("style header");
    (header, lines.collect())
}

fn run_jsonl(extra: &[&str]) -> Vec<Value> {
    run_jsonl_with_header(extra).1
}

#[test]
fn scenarios_end_in_expected_state() {
    for (scenario, state, offset) in [
        ("fling-open", "open", 0.0),
        ("fling-close", "closed", 440.0),
        ("drag-half-release", "open", 0.0),
        ("tap", "open", 0.0),
        ("reverse-fling", "closed", 440.0),
    ] {
        let frames = run_jsonl(&["--scenario", scenario]);
        let last = frames.last().expect("frames");
        assert_eq!(last["state"], state, "{scenario}");
        assert_eq!(last["offset"], offset, "{scenario}");
        assert_eq!(last["transitioning"], false, "{scenario}");
    }
}

#[test]
fn frame_rate_controls_frame_count() {
    let slow = run_jsonl(&["--scenario", "tap", "--fps", "30", "--settle-ms", "500"]);
    let fast = run_jsonl(&["--scenario", "tap", "--fps", "120", "--settle-ms", "500"]);
    assert!(fast.len() > slow.len() * 3, "{} vs {}", fast.len(), slow.len());
}

#[test]
fn taller_viewport_still_grabs_the_panel() {
    let frames = run_jsonl(&["--scenario", "fling-open", "--viewport-height", "1200"]);
    assert_eq!(frames[0]["gesture"], "began");
    assert_eq!(frames.last().expect("frames")["state"], "open");
}

#[test]
fn output_opens_with_panel_style() {
    let (header, frames) = run_jsonl_with_header(&["--scenario", "tap"]);
    assert_eq!(header["style"]["masked_corners"][0], "top-left");
    assert_eq!(header["style"]["shadow_radius"], 10.0);
    assert_eq!(header["style"]["status_bar_hidden"], true);
    assert!(frames.iter().all(|f| f.get("style").is_none()));
    assert_eq!(frames[0]["frame"], 0);
}

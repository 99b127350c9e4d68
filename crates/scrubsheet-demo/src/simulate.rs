//! Headless frame loop: replays a [`Script`] through a [`PopupSheet`] and
//! records what the panel looks like on every frame.

use std::io::Write;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use web_time::Instant;

use scrubsheet_core::{Corners, PanelConfig, PanelStyle, PointerEvent, PopupSheet, Size};

use crate::error::{DemoError, Result};
use crate::script::Script;

pub const MAX_FPS: u32 = 240;

/// Longest run the loop will simulate.
const MAX_SIMULATED: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Jsonl,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationOptions {
    pub fps: u32,
    /// Time simulated after the last sample.
    pub settle: Duration,
    pub viewport: Size,
}

impl SimulationOptions {
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(DemoError::invalid(format!(
                "fps must be between 1 and {MAX_FPS}, got {}",
                self.fps
            )));
        }
        let Size { width, height } = self.viewport;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(DemoError::invalid(format!(
                "viewport must be positive and finite, got {width}x{height}"
            )));
        }
        Ok(())
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

/// The panel as presented on one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub t_ms: u64,
    pub state: &'static str,
    pub offset: f64,
    pub corner_radius: f64,
    pub transitioning: bool,
    pub gesture: String,
}

/// The panel's static look, written once ahead of the frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRecord {
    pub masked_corners: Vec<&'static str>,
    pub shadow_opacity: f32,
    pub shadow_radius: f32,
    pub status_bar_hidden: bool,
}

impl From<&PanelStyle> for StyleRecord {
    fn from(style: &PanelStyle) -> Self {
        let names = [
            (Corners::TOP_LEFT, "top-left"),
            (Corners::TOP_RIGHT, "top-right"),
            (Corners::BOTTOM_LEFT, "bottom-left"),
            (Corners::BOTTOM_RIGHT, "bottom-right"),
        ];
        Self {
            masked_corners: names
                .into_iter()
                .filter(|(corner, _)| style.masked_corners.contains(*corner))
                .map(|(_, name)| name)
                .collect(),
            shadow_opacity: style.shadow_opacity,
            shadow_radius: style.shadow_radius,
            status_bar_hidden: style.status_bar_hidden,
        }
    }
}

#[derive(Serialize)]
struct StyleHeader<'a> {
    style: &'a StyleRecord,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub style: StyleRecord,
    pub frames: Vec<FrameRecord>,
    /// No transition was left in flight on the final frame.
    pub settled: bool,
}

impl Simulation {
    #[must_use]
    pub fn last(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }
}

/// Replay `script` at `options.fps` until `options.settle` past its last sample.
///
/// Each frame first advances animations by one interval, then delivers every
/// sample due by the frame's time, then records the panel.
pub fn simulate(
    script: &Script,
    config: PanelConfig,
    options: &SimulationOptions,
) -> Result<Simulation> {
    options.validate()?;
    script.validate()?;

    let interval = options.frame_interval();
    let end = Duration::from_millis(script.duration_ms()).saturating_add(options.settle);
    if end > MAX_SIMULATED {
        return Err(DemoError::invalid(format!(
            "script plus settle time is {}s, limit is {}s",
            end.as_secs(),
            MAX_SIMULATED.as_secs()
        )));
    }
    let mut sheet = PopupSheet::with_frame_animator(config, script.start_state(), options.viewport);
    let base = Instant::now();
    let mut pending = script.samples.iter().peekable();
    let mut frames = Vec::new();
    let mut now = Duration::ZERO;
    let mut index = 0u64;

    tracing::info!(
        samples = script.samples.len(),
        start = %script.start_state(),
        fps = options.fps,
        end_ms = end.as_millis() as u64,
        "simulation started"
    );

    loop {
        if index > 0 {
            now += interval;
            sheet.advance(interval);
        }
        while let Some(sample) = pending.next_if(|s| Duration::from_millis(s.t_ms) <= now) {
            let event = PointerEvent::new(
                sample.kind.into(),
                sample.position(),
                base + Duration::from_millis(sample.t_ms),
            );
            if sheet.handle_pointer(&event).is_none() {
                tracing::debug!(
                    t_ms = sample.t_ms,
                    kind = ?sample.kind,
                    "sample produced no pan update"
                );
            }
        }

        frames.push(FrameRecord {
            frame: index,
            t_ms: now.as_millis() as u64,
            state: sheet.state().as_str(),
            offset: sheet.frame().offset,
            corner_radius: sheet.frame().corner_radius,
            transitioning: sheet.controller().is_transitioning(),
            gesture: format!("{:?}", sheet.gesture_phase()).to_lowercase(),
        });
        index += 1;

        if now >= end && pending.peek().is_none() {
            break;
        }
    }

    let settled = !sheet.controller().is_transitioning();
    if settled {
        tracing::info!(state = %sheet.state(), frames = frames.len(), "simulation finished");
    } else {
        tracing::warn!(
            state = %sheet.state(),
            offset = sheet.frame().offset,
            "simulation ended with a transition still in flight"
        );
    }
    Ok(Simulation {
        style: StyleRecord::from(sheet.style()),
        frames,
        settled,
    })
}

/// Write the style header line.
pub fn write_style<W: Write>(out: &mut W, style: &StyleRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "# style corners={} shadow_opacity={:.2} shadow_radius={:.1} status_bar_hidden={}",
            style.masked_corners.join("|"),
            style.shadow_opacity,
            style.shadow_radius,
            style.status_bar_hidden
        )?,
        OutputFormat::Jsonl => {
            serde_json::to_writer(&mut *out, &StyleHeader { style })?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Write one line per frame.
pub fn write_frames<W: Write>(
    out: &mut W,
    frames: &[FrameRecord],
    format: OutputFormat,
) -> Result<()> {
    for frame in frames {
        match format {
            OutputFormat::Text => writeln!(
                out,
                "{:>6}ms  {:<6}  offset={:>7.2}  radius={:>5.2}  {}{}",
                frame.t_ms,
                frame.state,
                frame.offset,
                frame.corner_radius,
                frame.gesture,
                if frame.transitioning { "  *" } else { "" }
            )?,
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut *out, frame)?;
                out.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Scenario;

    fn options() -> SimulationOptions {
        SimulationOptions {
            fps: 60,
            settle: Duration::from_millis(1500),
            viewport: Size::new(375.0, 812.0),
        }
    }

    fn run(scenario: Scenario) -> Simulation {
        let config = PanelConfig::default();
        let script = scenario.script(&config, options().viewport);
        simulate(&script, config, &options()).expect("simulation")
    }

    #[test]
    fn fling_open_ends_open() {
        let sim = run(Scenario::FlingOpen);
        assert!(sim.settled);
        let last = sim.last().expect("frames");
        assert_eq!(last.state, "open");
        assert_eq!(last.offset, 0.0);
        assert_eq!(last.corner_radius, 20.0);
    }

    #[test]
    fn fling_close_ends_closed() {
        let sim = run(Scenario::FlingClose);
        let last = sim.last().expect("frames");
        assert_eq!(last.state, "closed");
        assert_eq!(last.offset, 440.0);
    }

    #[test]
    fn reverse_fling_ends_closed() {
        let sim = run(Scenario::ReverseFling);
        assert_eq!(sim.last().map(|f| f.state), Some("closed"));
    }

    #[test]
    fn tap_and_held_release_settle_open() {
        for scenario in [Scenario::Tap, Scenario::DragHalfRelease] {
            let sim = run(scenario);
            assert!(sim.settled, "{scenario:?}");
            assert_eq!(sim.last().map(|f| f.state), Some("open"), "{scenario:?}");
        }
    }

    #[test]
    fn drag_is_visible_frame_by_frame() {
        let sim = run(Scenario::FlingOpen);
        let during: Vec<_> = sim.frames.iter().filter(|f| f.transitioning).collect();
        assert!(!during.is_empty());
        assert!(during.iter().any(|f| f.offset > 0.0 && f.offset < 440.0));
        assert_eq!(sim.frames[0].gesture, "began");
    }

    #[test]
    fn frames_cover_settle_window() {
        let sim = run(Scenario::Tap);
        let last = sim.last().expect("frames");
        assert!(last.t_ms >= 80 + 1500);
        assert_eq!(sim.frames.len() as u64, last.frame + 1);
    }

    #[test]
    fn rejects_bad_options() {
        let config = PanelConfig::default();
        let script = Scenario::Tap.script(&config, options().viewport);
        let bad = SimulationOptions { fps: 0, ..options() };
        assert!(matches!(
            simulate(&script, config, &bad),
            Err(DemoError::InvalidArgument { .. })
        ));
        let bad = SimulationOptions {
            viewport: Size::new(375.0, f64::NAN),
            ..options()
        };
        assert!(simulate(&script, config, &bad).is_err());
        let bad = SimulationOptions {
            settle: Duration::from_secs(3600),
            ..options()
        };
        assert!(matches!(
            simulate(&script, config, &bad),
            Err(DemoError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn default_style_is_carried_through() {
        let sim = run(Scenario::Tap);
        assert_eq!(sim.style.masked_corners, vec!["top-left", "top-right"]);
        assert_eq!(sim.style.shadow_opacity, 0.1);
        assert_eq!(sim.style.shadow_radius, 10.0);
        assert!(sim.style.status_bar_hidden);
    }

    #[test]
    fn style_header_in_both_formats() {
        let style = StyleRecord::from(&PanelStyle::default());
        let mut text = Vec::new();
        write_style(&mut text, &style, OutputFormat::Text).expect("text");
        assert_eq!(
            String::from_utf8(text).expect("utf8"),
            "# style corners=top-left|top-right shadow_opacity=0.10 shadow_radius=10.0 \
             status_bar_hidden=true\n"
        );

        let mut jsonl = Vec::new();
        write_style(&mut jsonl, &style, OutputFormat::Jsonl).expect("jsonl");
        let header: serde_json::Value = serde_json::from_slice(&jsonl).expect("json");
        assert_eq!(header["style"]["shadow_radius"], 10.0);
        assert_eq!(header["style"]["masked_corners"][1], "top-right");
        assert_eq!(header["style"]["status_bar_hidden"], true);
    }

    #[test]
    fn text_and_jsonl_output() {
        let sim = run(Scenario::Tap);
        let mut text = Vec::new();
        write_frames(&mut text, &sim.frames[..2], OutputFormat::Text).expect("text");
        let text = String::from_utf8(text).expect("utf8");
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("     0ms  closed  offset= 440.00"));

        let mut jsonl = Vec::new();
        write_frames(&mut jsonl, &sim.frames, OutputFormat::Jsonl).expect("jsonl");
        let jsonl = String::from_utf8(jsonl).expect("utf8");
        let last: serde_json::Value =
            serde_json::from_str(jsonl.lines().last().expect("line")).expect("json");
        assert_eq!(last["state"], "open");
        assert_eq!(last["transitioning"], false);
    }
}

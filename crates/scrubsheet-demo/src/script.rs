//! Pointer scripts and the built-in scenarios.
//!
//! A script is a time-ordered list of pointer samples in viewport
//! coordinates plus the state the panel starts in:
//!
//! ```json
//! { "start_open": false,
//!   "samples": [ { "t_ms": 0, "kind": "down", "x": 180, "y": 780 },
//!                { "t_ms": 16, "kind": "moved", "x": 180, "y": 740 },
//!                { "t_ms": 32, "kind": "up", "x": 180, "y": 700 } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use scrubsheet_core::{PanelConfig, PanelState, Point, PointerEventKind, Size};

use crate::error::{DemoError, Result};

/// Sample spacing used by the built-in scenarios.
const STEP_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Down,
    #[serde(alias = "move")]
    Moved,
    Up,
    #[serde(alias = "cancel")]
    Cancelled,
}

impl From<SampleKind> for PointerEventKind {
    fn from(kind: SampleKind) -> Self {
        match kind {
            SampleKind::Down => Self::Down,
            SampleKind::Moved => Self::Moved,
            SampleKind::Up => Self::Up,
            SampleKind::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t_ms: u64,
    pub kind: SampleKind,
    pub x: f64,
    pub y: f64,
}

impl Sample {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub start_open: bool,
    pub samples: Vec<Sample>,
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DemoError::MissingScript {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Samples must be finite and in non-decreasing time order.
    pub fn validate(&self) -> Result<()> {
        for (index, pair) in self.samples.windows(2).enumerate() {
            if pair[1].t_ms < pair[0].t_ms {
                return Err(DemoError::invalid(format!(
                    "sample {} at {}ms precedes sample {} at {}ms",
                    index + 1,
                    pair[1].t_ms,
                    index,
                    pair[0].t_ms
                )));
            }
        }
        if let Some(index) = self
            .samples
            .iter()
            .position(|s| !(s.x.is_finite() && s.y.is_finite()))
        {
            return Err(DemoError::invalid(format!(
                "sample {index} has a non-finite position"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn start_state(&self) -> PanelState {
        if self.start_open {
            PanelState::Open
        } else {
            PanelState::Closed
        }
    }

    /// Time of the last sample.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.samples.last().map_or(0, |s| s.t_ms)
    }
}

// ---------------------------------------------------------------------------
// Built-in scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    FlingOpen,
    FlingClose,
    DragHalfRelease,
    Tap,
    ReverseFling,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::FlingOpen,
        Scenario::FlingClose,
        Scenario::DragHalfRelease,
        Scenario::Tap,
        Scenario::ReverseFling,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FlingOpen => "fling-open",
            Self::FlingClose => "fling-close",
            Self::DragHalfRelease => "drag-half-release",
            Self::Tap => "tap",
            Self::ReverseFling => "reverse-fling",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FlingOpen => "drag the closed panel up halfway and fling it open",
            Self::FlingClose => "drag the open panel down a quarter and fling it closed",
            Self::DragHalfRelease => "drag up halfway, hold still, then let go",
            Self::Tap => "tap the closed panel without moving",
            Self::ReverseFling => "drag up most of the way, then fling back down",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| DemoError::UnknownScenario {
                name: name.to_string(),
            })
    }

    /// Build the pointer script for a panel with `config` in `viewport`.
    #[must_use]
    pub fn script(self, config: &PanelConfig, viewport: Size) -> Script {
        let x = viewport.width / 2.0;
        let offset = config.popup_offset;
        let top = |state: PanelState| {
            viewport.height - config.panel_height + config.resting_offset(state)
        };
        let closed_grip = top(PanelState::Closed) + 30.0;
        let open_grip = top(PanelState::Open) + 40.0;

        let mut b = ScriptBuilder::new(x);
        let start_open = match self {
            Self::FlingOpen => {
                b.down(closed_grip);
                b.drag_to(closed_grip - offset / 2.0, 6);
                b.release(closed_grip - offset / 2.0 - 30.0, STEP_MS);
                false
            }
            Self::FlingClose => {
                b.down(open_grip);
                b.drag_to(open_grip + offset / 4.0, 5);
                b.release(open_grip + offset / 4.0 + 30.0, STEP_MS);
                true
            }
            Self::DragHalfRelease => {
                b.down(closed_grip);
                b.drag_to(closed_grip - offset / 2.0, 8);
                b.release(closed_grip - offset / 2.0, 200);
                false
            }
            Self::Tap => {
                b.down(closed_grip);
                b.release(closed_grip, 80);
                false
            }
            Self::ReverseFling => {
                let high = closed_grip - offset * 0.7;
                b.down(closed_grip);
                b.drag_to(high, 8);
                b.drag_to(high + 60.0, 3);
                b.release(high + 90.0, STEP_MS);
                false
            }
        };
        Script {
            start_open,
            samples: b.samples,
        }
    }
}

struct ScriptBuilder {
    x: f64,
    t_ms: u64,
    y: f64,
    samples: Vec<Sample>,
}

impl ScriptBuilder {
    fn new(x: f64) -> Self {
        Self {
            x,
            t_ms: 0,
            y: 0.0,
            samples: Vec::new(),
        }
    }

    fn push(&mut self, kind: SampleKind, y: f64) {
        self.y = y;
        self.samples.push(Sample {
            t_ms: self.t_ms,
            kind,
            x: self.x,
            y,
        });
    }

    fn down(&mut self, y: f64) {
        self.push(SampleKind::Down, y);
    }

    fn drag_to(&mut self, y: f64, steps: u32) {
        let from = self.y;
        for step in 1..=steps {
            self.t_ms += STEP_MS;
            self.push(
                SampleKind::Moved,
                from + (y - from) * f64::from(step) / f64::from(steps),
            );
        }
    }

    fn release(&mut self, y: f64, after_ms: u64) {
        self.t_ms += after_ms;
        self.push(SampleKind::Up, y);
    }
}

#![forbid(unsafe_code)]

//! Panel state, geometry and configuration.

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;

use crate::animation::TimingParameters;

/// Logical position of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    Open,
    #[default]
    Closed,
}

impl PanelState {
    /// The other state.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    /// Lowercase name, for traces and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// The animatable properties of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelFrame {
    /// Distance of the panel's bottom edge below its fully open position.
    pub offset: f64,
    /// Rounding applied to the masked corners.
    pub corner_radius: f64,
}

impl PanelFrame {
    #[must_use]
    pub const fn new(offset: f64, corner_radius: f64) -> Self {
        Self {
            offset,
            corner_radius,
        }
    }

    /// Linear interpolation; `t` is not clamped so spring overshoot shows.
    #[must_use]
    pub fn lerp(self, to: PanelFrame, t: f64) -> PanelFrame {
        PanelFrame {
            offset: self.offset + (to.offset - self.offset) * t,
            corner_radius: self.corner_radius + (to.corner_radius - self.corner_radius) * t,
        }
    }
}

/// What the renderer sees: the current frame plus layout bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelSurface {
    pub frame: PanelFrame,
    /// Number of layout passes requested so far.
    pub layout_passes: u64,
}

impl PanelSurface {
    #[must_use]
    pub const fn new(frame: PanelFrame) -> Self {
        Self {
            frame,
            layout_passes: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

bitflags! {
    /// Panel corners that receive rounding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Corners: u8 {
        const TOP_LEFT     = 0b0001;
        const TOP_RIGHT    = 0b0010;
        const BOTTOM_LEFT  = 0b0100;
        const BOTTOM_RIGHT = 0b1000;
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
    }
}

/// Static look of the panel. Renderers read this; the transition logic
/// only animates the corner radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    pub masked_corners: Corners,
    pub shadow_opacity: f32,
    pub shadow_radius: f32,
    pub status_bar_hidden: bool,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            masked_corners: Corners::TOP,
            shadow_opacity: 0.1,
            shadow_radius: 10.0,
            status_bar_hidden: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Longest accepted transition duration.
const MAX_TRANSITION: Duration = Duration::from_secs(60);

/// Panel geometry and transition timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    /// Offset of the fully closed panel (default: 440).
    pub popup_offset: f64,
    /// Panel height (default: 500).
    pub panel_height: f64,
    /// Duration of an interactive transition (default: 1s).
    pub transition_duration: Duration,
    /// Damping ratio of the transition spring (default: 1.0).
    pub damping_ratio: f64,
    /// Corner radius of the open panel (default: 20).
    pub open_corner_radius: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            popup_offset: 440.0,
            panel_height: 500.0,
            transition_duration: Duration::from_secs(1),
            damping_ratio: 1.0,
            open_corner_radius: 20.0,
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn with_popup_offset(mut self, offset: f64) -> Self {
        self.popup_offset = offset;
        self
    }

    #[must_use]
    pub fn with_panel_height(mut self, height: f64) -> Self {
        self.panel_height = height;
        self
    }

    #[must_use]
    pub fn with_transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }

    #[must_use]
    pub fn with_damping_ratio(mut self, ratio: f64) -> Self {
        self.damping_ratio = ratio;
        self
    }

    /// Load overrides from the process environment.
    ///
    /// Reads:
    /// - `SCRUBSHEET_POPUP_OFFSET`: closed offset in points
    /// - `SCRUBSHEET_PANEL_HEIGHT`: panel height in points
    /// - `SCRUBSHEET_TRANSITION_MS`: transition duration in milliseconds
    /// - `SCRUBSHEET_DAMPING_RATIO`: spring damping ratio
    /// - `SCRUBSHEET_CORNER_RADIUS`: open corner radius in points
    ///
    /// Unparseable values are ignored. Call [`validate`](Self::validate)
    /// before use.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load overrides using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let number = |key: &str| get_env(key).and_then(|v| v.trim().parse::<f64>().ok());

        if let Some(offset) = number("SCRUBSHEET_POPUP_OFFSET") {
            config.popup_offset = offset;
        }
        if let Some(height) = number("SCRUBSHEET_PANEL_HEIGHT") {
            config.panel_height = height;
        }
        if let Some(ms) =
            get_env("SCRUBSHEET_TRANSITION_MS").and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.transition_duration = Duration::from_millis(ms);
        }
        if let Some(ratio) = number("SCRUBSHEET_DAMPING_RATIO") {
            config.damping_ratio = ratio;
        }
        if let Some(radius) = number("SCRUBSHEET_CORNER_RADIUS") {
            config.open_corner_radius = radius;
        }
        config
    }

    /// Check that the configuration describes a usable panel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.popup_offset.is_finite() && self.popup_offset > 0.0) {
            return Err(ConfigError::PopupOffset(self.popup_offset));
        }
        if !(self.panel_height.is_finite() && self.panel_height > 0.0) {
            return Err(ConfigError::PanelHeight(self.panel_height));
        }
        if self.popup_offset > self.panel_height {
            return Err(ConfigError::OffsetExceedsHeight {
                offset: self.popup_offset,
                height: self.panel_height,
            });
        }
        if self.transition_duration.is_zero() || self.transition_duration > MAX_TRANSITION {
            return Err(ConfigError::TransitionDuration(self.transition_duration));
        }
        if !(self.damping_ratio.is_finite() && self.damping_ratio > 0.0) {
            return Err(ConfigError::DampingRatio(self.damping_ratio));
        }
        if !(self.open_corner_radius.is_finite() && self.open_corner_radius >= 0.0) {
            return Err(ConfigError::CornerRadius(self.open_corner_radius));
        }
        Ok(())
    }

    /// Timing of the interactive transition.
    #[must_use]
    pub fn timing(&self) -> TimingParameters {
        TimingParameters::new(self.transition_duration, self.damping_ratio)
    }

    /// Frame the panel rests at in `state`.
    #[must_use]
    pub fn resting_frame(&self, state: PanelState) -> PanelFrame {
        match state {
            PanelState::Open => PanelFrame::new(0.0, self.open_corner_radius),
            PanelState::Closed => PanelFrame::new(self.popup_offset, 0.0),
        }
    }

    /// Offset the panel rests at in `state`.
    #[must_use]
    pub fn resting_offset(&self, state: PanelState) -> f64 {
        self.resting_frame(state).offset
    }
}

/// A rejected [`PanelConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    PopupOffset(f64),
    PanelHeight(f64),
    OffsetExceedsHeight { offset: f64, height: f64 },
    TransitionDuration(Duration),
    DampingRatio(f64),
    CornerRadius(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopupOffset(v) => write!(f, "popup offset must be positive and finite, got {v}"),
            Self::PanelHeight(v) => write!(f, "panel height must be positive and finite, got {v}"),
            Self::OffsetExceedsHeight { offset, height } => {
                write!(f, "popup offset {offset} exceeds panel height {height}")
            }
            Self::TransitionDuration(d) => {
                write!(f, "transition duration must be in (0s, 60s], got {d:?}")
            }
            Self::DampingRatio(v) => {
                write!(f, "damping ratio must be positive and finite, got {v}")
            }
            Self::CornerRadius(v) => {
                write!(f, "corner radius must be non-negative and finite, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#![forbid(unsafe_code)]

//! Interactive bottom-sheet panel.
//!
//! A panel rests either closed (mostly hidden below the viewport edge) or
//! open. Grabbing it starts a transition toward the other state immediately;
//! dragging scrubs that transition, and releasing lets the fling direction
//! decide whether it finishes or reverses. A panel already in flight can be
//! grabbed again and keeps animating from where it is.
//!
//! - [`gesture`]: pan recognition with an immediate-start policy.
//! - [`animation`]: scrubbable spring animations behind [`AnimationService`].
//! - [`transition`]: the open/close state machine.
//! - [`sheet`]: the host tying input, transition and frame loop together.
//!
//! Enable the `tracing` feature for structured diagnostics.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod panel;
pub mod sheet;
pub mod transition;
pub mod velocity;

pub use animation::{
    AnimatingPosition, AnimationEvent, AnimationHandle, AnimationService, FrameAnimator,
};
pub use event::{PointerEvent, PointerEventKind};
pub use geometry::{Point, Rect, Size, Vec2};
pub use gesture::{DragRecognizer, GesturePhase, ImmediateStart, PanUpdate, ThresholdStart};
pub use panel::{ConfigError, Corners, PanelConfig, PanelFrame, PanelState, PanelStyle};
pub use sheet::PopupSheet;
pub use transition::{TransitionController, TransitionSession};

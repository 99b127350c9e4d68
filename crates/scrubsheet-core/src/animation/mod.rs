#![forbid(unsafe_code)]

//! Interruptible animation runtime.
//!
//! - [`spring`]: damped spring physics.
//! - [`animator`]: a single scrubbable, pausable, reversible animation.
//! - [`service`]: the host capability trait and its frame-driven
//!   implementation.

pub mod animator;
pub mod service;
pub mod spring;

pub use animator::{AnimatingPosition, AnimatorState, PropertyAnimator, TimingParameters};
pub use service::{AnimationEvent, AnimationHandle, AnimationService, FrameAnimator};
pub use spring::Spring;

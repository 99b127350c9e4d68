#![forbid(unsafe_code)]

//! Headless driver for the scrubsheet popup panel.
//!
//! Replays built-in scenarios or JSON pointer scripts through a
//! [`scrubsheet_core::PopupSheet`] at a fixed frame rate and prints the
//! panel's state on every frame.

pub mod cli;
pub mod error;
pub mod logging;
pub mod script;
pub mod simulate;

pub use cli::run_from_env;
pub use error::{DemoError, Result};

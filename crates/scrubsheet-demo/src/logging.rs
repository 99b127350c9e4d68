//! Subscriber setup for the demo binary.
//!
//! Logs go to stderr so frame output on stdout stays machine-readable.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "warn,scrubsheet_core=info,scrubsheet_demo=info";

/// How the subscriber should be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
    pub json: bool,
}

impl LogSettings {
    /// Read `SCRUBSHEET_LOG` (falling back to `RUST_LOG`) and
    /// `SCRUBSHEET_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter = get_env("SCRUBSHEET_LOG")
            .or_else(|| get_env("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let json = get_env("SCRUBSHEET_LOG_FORMAT")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("json"));
        Self { filter, json }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(settings: &LogSettings) {
    let env_filter =
        EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if settings.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let settings = LogSettings::from_env_with(env(&[]));
        assert_eq!(settings.filter, DEFAULT_FILTER);
        assert!(!settings.json);
    }

    #[test]
    fn own_variable_wins_over_rust_log() {
        let settings = LogSettings::from_env_with(env(&[
            ("SCRUBSHEET_LOG", "scrubsheet_core=trace"),
            ("RUST_LOG", "error"),
        ]));
        assert_eq!(settings.filter, "scrubsheet_core=trace");
    }

    #[test]
    fn rust_log_is_fallback() {
        let settings = LogSettings::from_env_with(env(&[("RUST_LOG", "debug")]));
        assert_eq!(settings.filter, "debug");
    }

    #[test]
    fn json_format_is_case_insensitive() {
        let settings = LogSettings::from_env_with(env(&[("SCRUBSHEET_LOG_FORMAT", " JSON ")]));
        assert!(settings.json);
        let settings = LogSettings::from_env_with(env(&[("SCRUBSHEET_LOG_FORMAT", "pretty")]));
        assert!(!settings.json);
    }
}

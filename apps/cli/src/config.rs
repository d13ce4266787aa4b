// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defaults loaded from environment variables. Command line flags override
//! every value here.

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Douglas-Peucker tolerance used when no method flag is given.
    pub tolerance: f64,
    /// Abort on reconstruction inconsistencies.
    pub strict: bool,
    /// Format of the log lines written to stderr.
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            tolerance: var("EDGEWELD_TOLERANCE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|t: &f64| *t >= 0.0)
                .unwrap_or(0.0),
            strict: var("EDGEWELD_STRICT")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
            log_format: match var("EDGEWELD_LOG_FORMAT").as_deref().map(str::trim) {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn defaults_without_env() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.tolerance, 0.0);
        assert!(!config.strict);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_values() {
        let config = Config::from_lookup(lookup(&[
            ("EDGEWELD_TOLERANCE", "0.25"),
            ("EDGEWELD_STRICT", "TRUE"),
            ("EDGEWELD_LOG_FORMAT", "json"),
        ]));
        assert_eq!(config.tolerance, 0.25);
        assert!(config.strict);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn ignores_unusable_tolerance() {
        let negative = Config::from_lookup(lookup(&[("EDGEWELD_TOLERANCE", "-3")]));
        assert_eq!(negative.tolerance, 0.0);
        let garbage = Config::from_lookup(lookup(&[("EDGEWELD_TOLERANCE", "abc")]));
        assert_eq!(garbage.tolerance, 0.0);
    }
}

//! Environment-driven configuration for the web binary.
//!
//! | Variable              | Default                     |
//! |-----------------------|-----------------------------|
//! | `HOST`                | `0.0.0.0`                   |
//! | `PORT`                | `8080`                      |
//! | `SCORING_API_URL`     | `http://127.0.0.1:5000/api` |
//! | `API_TIMEOUT_SECS`    | `30`                        |
//! | `CREDENTIAL_FILE`     | unset (memory only)         |
//! | `FAIRNESS_TIERS`      | `current` (or `legacy`)     |
//! | `SUCCESS_DISPLAY_MS`  | `3000`                      |
//! | `CONFETTI_MS`         | `3000`                      |
//! | `INACTIVITY_DIM_SECS` | `60`                        |

use crate::logic::{OutcomeConfig, TierThresholds};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub scoring_api_url: String,
    pub api_timeout: Duration,
    pub credential_file: Option<PathBuf>,
    pub thresholds: TierThresholds,
    pub outcome: OutcomeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            scoring_api_url: "http://127.0.0.1:5000/api".to_string(),
            api_timeout: Duration::from_secs(30),
            credential_file: None,
            thresholds: TierThresholds::CURRENT,
            outcome: OutcomeConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let d = Self::default();

        let success_display = parsed(&lookup, "SUCCESS_DISPLAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(d.outcome.success_display);
        let confetti = parsed(&lookup, "CONFETTI_MS")
            .map(Duration::from_millis)
            .unwrap_or(d.outcome.confetti)
            .min(success_display);

        Self {
            host: lookup("HOST").unwrap_or(d.host),
            port: parsed(&lookup, "PORT").unwrap_or(d.port),
            scoring_api_url: lookup("SCORING_API_URL").unwrap_or(d.scoring_api_url),
            api_timeout: parsed(&lookup, "API_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.api_timeout),
            credential_file: lookup("CREDENTIAL_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            thresholds: match lookup("FAIRNESS_TIERS").as_deref().map(str::trim) {
                Some("legacy") => TierThresholds::LEGACY,
                Some("current") | None => TierThresholds::CURRENT,
                Some(other) => {
                    log::warn!("unknown FAIRNESS_TIERS '{other}', using current thresholds");
                    TierThresholds::CURRENT
                }
            },
            outcome: OutcomeConfig {
                credential_ttl_days: d.outcome.credential_ttl_days,
                success_display,
                confetti,
                inactivity_dim: parsed(&lookup, "INACTIVITY_DIM_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(d.outcome.inactivity_dim),
            },
        }
    }
}

fn parsed<T: FromStr, F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring invalid {key}='{value}'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(config(&[]), AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("PORT", "9000"),
            ("FAIRNESS_TIERS", "legacy"),
            ("CREDENTIAL_FILE", "/tmp/cred.json"),
            ("INACTIVITY_DIM_SECS", "5"),
        ]);
        assert_eq!(c.port, 9000);
        assert_eq!(c.thresholds, TierThresholds::LEGACY);
        assert_eq!(c.credential_file, Some(PathBuf::from("/tmp/cred.json")));
        assert_eq!(c.outcome.inactivity_dim, Duration::from_secs(5));
    }

    #[test]
    fn bad_numbers_fall_back_and_confetti_is_clamped() {
        let c = config(&[("PORT", "eighty"), ("SUCCESS_DISPLAY_MS", "1000"), ("CONFETTI_MS", "5000")]);
        assert_eq!(c.port, 8080);
        assert_eq!(c.outcome.success_display, Duration::from_millis(1000));
        assert_eq!(c.outcome.confetti, Duration::from_millis(1000));
    }
}

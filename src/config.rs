//! Run configuration, loaded from YAML.
//!
//! ```yaml
//! excluded_rooms: ["The Drug"]
//! blank_policy: neutral
//! neutral_score: 1
//! time_limit_seconds: 60
//! forced:
//!   - room: The Drug
//!     occupants: [Grant, Peyton]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::formulation::SolveOptions;

/// What a blank survey cell means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankPolicy {
    /// The person is indifferent: use [`Config::neutral_score`].
    #[default]
    Neutral,
    /// A blank cell is malformed input.
    Reject,
}

/// People placed into a reserved room outside the optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedAssignment {
    pub room: String,
    pub occupants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rooms never offered to the optimizer.
    pub excluded_rooms: BTreeSet<String>,
    pub blank_policy: BlankPolicy,
    pub neutral_score: i64,
    pub time_limit_seconds: Option<f64>,
    pub forced: Vec<ForcedAssignment>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_rooms: BTreeSet::new(),
            blank_policy: BlankPolicy::Neutral,
            neutral_score: 1,
            time_limit_seconds: None,
            forced: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let buf = read_to_string(path)?;
        Self::from_yaml_str(&buf)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Solver options; a time limit must be a positive, representable
    /// number of seconds.
    pub fn solve_options(&self) -> Result<SolveOptions> {
        let time_limit = match self.time_limit_seconds {
            None => None,
            Some(secs) if secs > 0.0 => {
                Some(Duration::try_from_secs_f64(secs).map_err(|err| {
                    Error::InvalidConfig {
                        reason: format!("time_limit_seconds {secs}: {err}"),
                    }
                })?)
            }
            Some(secs) => {
                return Err(Error::InvalidConfig {
                    reason: format!("time_limit_seconds must be positive, got {secs}"),
                });
            }
        };
        Ok(SolveOptions { time_limit })
    }

    /// Rooms kept out of the dataset: excluded ones and those reserved by
    /// forced assignments.
    pub fn reserved_rooms(&self) -> BTreeSet<&str> {
        self.excluded_rooms
            .iter()
            .map(String::as_str)
            .chain(self.forced.iter().map(|f| f.room.as_str()))
            .collect()
    }

    /// People kept out of the dataset because they are placed by hand.
    pub fn forced_people(&self) -> BTreeSet<&str> {
        self.forced
            .iter()
            .flat_map(|f| f.occupants.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.neutral_score, 1);
        assert_eq!(config.blank_policy, BlankPolicy::Neutral);
        assert_eq!(config.solve_options().unwrap(), SolveOptions::default());
    }

    #[test]
    fn parses_full_document() {
        let config = Config::from_yaml_str(
            r#"
excluded_rooms: ["The Drug"]
blank_policy: reject
neutral_score: 0
time_limit_seconds: 1.5
forced:
  - room: Attic
    occupants: [Grant, Peyton]
"#,
        )
        .unwrap();

        assert_eq!(config.blank_policy, BlankPolicy::Reject);
        assert_eq!(config.neutral_score, 0);
        assert_eq!(
            config.solve_options().unwrap().time_limit,
            Some(Duration::from_millis(1500))
        );
        assert_eq!(
            config.reserved_rooms(),
            BTreeSet::from(["The Drug", "Attic"])
        );
        assert_eq!(config.forced_people(), BTreeSet::from(["Grant", "Peyton"]));
    }

    #[test]
    fn unusable_time_limits_are_rejected() {
        for secs in [0.0, -5.0, f64::NAN, f64::INFINITY, 1e30] {
            let config = Config {
                time_limit_seconds: Some(secs),
                ..Config::default()
            };
            assert!(
                matches!(config.solve_options(), Err(Error::InvalidConfig { .. })),
                "{secs} accepted"
            );
        }
    }

    #[test]
    fn huge_time_limit_from_yaml_is_an_error() {
        let config = Config::from_yaml_str("time_limit_seconds: 1e30").unwrap();
        assert!(matches!(
            config.solve_options(),
            Err(Error::InvalidConfig { ref reason }) if reason.contains("time_limit_seconds")
        ));
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(Config::from_yaml_str("blank_policy: maybe").is_err());
    }
}

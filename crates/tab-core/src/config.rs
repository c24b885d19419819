//! Tournament-level allocation settings (`tabgrid.toml`).
//!
//! The engine does not own these settings; they are read once per run and
//! passed in. Every field has a default so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AllocResult, AllocationError};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationConfig {
    #[serde(default)]
    pub scores: ScoresConfig,
    #[serde(default)]
    pub penalties: PenaltiesConfig,
    #[serde(default)]
    pub positions: PositionsConfig,
    #[serde(default)]
    pub conflicts: ConflictsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoresConfig {
    /// Lowest score on the tournament's adjudicator scale.
    pub min: f64,
    /// Highest score on the tournament's adjudicator scale.
    pub max: f64,
    /// Weighted score needed to chair or panel.
    pub min_voting: f64,
    /// Share of the weighted score taken from feedback, 0.0..=1.0.
    pub feedback_weight: f64,
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 5.0,
            min_voting: 1.5,
            feedback_weight: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltiesConfig {
    /// Added per conflicted team or chair.
    pub conflict: f64,
    /// Added per prior encounter with a team or chair.
    pub history: f64,
    /// Multiplies the squared importance gap between a debate and a preformed panel.
    pub preformed_mismatch: f64,
}

impl Default for PenaltiesConfig {
    fn default() -> Self {
        Self {
            conflict: 1_000_000.0,
            history: 10_000.0,
            preformed_mismatch: 10_000_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionsConfig {
    /// Every debate is solo-chaired.
    pub no_panellist: bool,
    /// No trainees are allocated.
    pub no_trainee: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictsConfig {
    /// Treat every participant as conflicted with its own institution.
    pub own_institution: bool,
}

impl AllocationConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AllocationConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a config for a tournament scoring adjudicators on `min..=max`.
    pub fn scaffold(min: f64, max: f64) -> Self {
        let range = max - min;
        AllocationConfig {
            scores: ScoresConfig {
                min,
                max,
                min_voting: min + range * 0.3,
                feedback_weight: 0.0,
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> AllocResult<()> {
        let s = &self.scores;
        if !(s.max > s.min) {
            return Err(AllocationError::InvalidConfig(format!(
                "scores.max ({}) must be greater than scores.min ({})",
                s.max, s.min
            )));
        }
        if !(0.0..=1.0).contains(&s.feedback_weight) {
            return Err(AllocationError::InvalidConfig(format!(
                "scores.feedback_weight ({}) must be between 0 and 1",
                s.feedback_weight
            )));
        }
        let p = &self.penalties;
        for (name, value) in [
            ("conflict", p.conflict),
            ("history", p.history),
            ("preformed_mismatch", p.preformed_mismatch),
        ] {
            if !(value >= 0.0) {
                return Err(AllocationError::InvalidConfig(format!(
                    "penalties.{name} ({value}) must not be negative"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AllocationConfig::default();
        assert_eq!(config.scores.max, 5.0);
        assert_eq!(config.scores.min_voting, 1.5);
        assert_eq!(config.penalties.conflict, 1_000_000.0);
        assert!(!config.positions.no_panellist);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial() {
        let toml_str = r#"
[scores]
max = 10.0

[positions]
no_trainee = true
"#;
        let config: AllocationConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scores.max, 10.0);
        assert_eq!(config.scores.min, 0.0);
        assert!(config.positions.no_trainee);
        assert_eq!(config.penalties.history, 10_000.0);
    }

    #[test]
    fn test_scaffold_round_trips() {
        let config = AllocationConfig::scaffold(1.0, 6.0);
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[scores]"));
        let parsed: AllocationConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_empty_range() {
        let mut config = AllocationConfig::default();
        config.scores.max = config.scores.min;
        assert!(matches!(config.validate(), Err(AllocationError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_weight() {
        let mut config = AllocationConfig::default();
        config.scores.feedback_weight = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabgrid.toml");
        std::fs::write(&path, "[penalties]\nhistory = 5.0\n").unwrap();

        let config = AllocationConfig::from_file(&path).unwrap();
        assert_eq!(config.penalties.history, 5.0);

        std::fs::write(&path, "[scores]\nmin = 3.0\nmax = 1.0\n").unwrap();
        assert!(AllocationConfig::from_file(&path).is_err());
    }
}

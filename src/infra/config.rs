// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::backend::StreamFormat;
use crate::infra::errors::TandemError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "BackendConfig::solver_default")]
    pub solver: BackendConfig,

    #[serde(default = "BackendConfig::reviewer_default")]
    pub reviewer: BackendConfig,

    #[serde(default)]
    pub rounds: RoundsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solver: BackendConfig::solver_default(),
            reviewer: BackendConfig::reviewer_default(),
            rounds: RoundsConfig::default(),
        }
    }
}

/// One backend endpoint: where it lives, which model to ask for, and which
/// wire shape it speaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub model: String,
    #[serde(default)]
    pub format: StreamFormat,
}

impl BackendConfig {
    pub fn solver_default() -> Self {
        Self {
            url: "http://localhost:11434".into(),
            model: "qwen2.5-coder:7b".into(),
            format: StreamFormat::Chat,
        }
    }

    pub fn reviewer_default() -> Self {
        Self {
            url: "http://localhost:11434".into(),
            model: "llama3.1:8b".into(),
            format: StreamFormat::Generate,
        }
    }
}

/// Bounds for the round budget. A requested budget is clamped into
/// `[min, max]`, never rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundsConfig {
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

impl Default for RoundsConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 10,
            default: 5,
        }
    }
}

impl RoundsConfig {
    /// Resolve a requested budget. `None` selects the default; anything
    /// out of range is silently pulled to the nearest bound.
    pub fn clamp(&self, requested: Option<u8>) -> u8 {
        requested.unwrap_or(self.default).clamp(self.min, self.max)
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self, TandemError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)
            .map_err(|e| TandemError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `tandem.toml` from the working directory, falling back to
    /// defaults when it does not exist.
    pub fn load() -> Result<Self, TandemError> {
        let path = Path::new("tandem.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), TandemError> {
        if self.rounds.min == 0 {
            return Err(TandemError::Config("rounds.min must be at least 1".into()));
        }
        if self.rounds.min > self.rounds.max {
            return Err(TandemError::Config(format!(
                "rounds.min ({}) exceeds rounds.max ({})",
                self.rounds.min, self.rounds.max
            )));
        }
        Ok(())
    }
}

// Timeouts, topics, drive tuning
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drive::InputCurve;
use crate::wrist::WristSetpoints;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Command timeout for watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_DRIVE: &str = "rrbot/cmd/drive"; // commands
pub const TOPIC_RT_DRIVE: &str = "rrbot/rt/drive"; // actuation
pub const TOPIC_HEALTH: &str = "rrbot/state/health"; // health status

/// Error loading the runtime config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot load the config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read the config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Zenoh key expressions used by the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topics {
    pub cmd: String,
    pub actuation: String,
    pub health: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            cmd: TOPIC_CMD_DRIVE.to_string(),
            actuation: TOPIC_RT_DRIVE.to_string(),
            health: TOPIC_HEALTH.to_string(),
        }
    }
}

/// Runtime settings, loaded from TOML. Missing keys take the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub loop_hz: u64,
    pub cmd_timeout_ms: u64,
    pub topics: Topics,
    pub input_curve: InputCurve,
    pub wrist: WristSetpoints,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            loop_hz: LOOP_HZ,
            cmd_timeout_ms: CMD_TIMEOUT.as_millis() as u64,
            topics: Topics::default(),
            input_curve: InputCurve::default(),
            wrist: WristSetpoints::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load from a TOML file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                let text = read_to_string(path)?;
                Self::from_toml_str(&text)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_hz == 0 || self.loop_hz > 1000 {
            return Err(ConfigError::Invalid(format!(
                "loop_hz must be in 1..=1000, got {}",
                self.loop_hz
            )));
        }
        if self.cmd_timeout_ms == 0 {
            return Err(ConfigError::Invalid("cmd_timeout_ms must be > 0".into()));
        }
        if let InputCurve::Deadband { threshold } = self.input_curve {
            if !(0.0..1.0).contains(&threshold) {
                return Err(ConfigError::Invalid(format!(
                    "deadband threshold must be in [0, 1), got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }

    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(1000 / self.loop_hz)
    }

    pub fn cmd_timeout(&self) -> Duration {
        Duration::from_millis(self.cmd_timeout_ms)
    }
}

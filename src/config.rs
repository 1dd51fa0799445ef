//! Table configuration.

use std::env;
use std::time::Duration;

/// Default time a player has for each move.
pub const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default per-seat entry fee.
pub const DEFAULT_ENTRY_FEE: f64 = 1.00;

/// Errors reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: cannot parse '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("{var} must be positive, got {value}")]
    NotPositive { var: &'static str, value: String },
}

/// Settings shared by every game at a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub move_timeout: Duration,
    pub entry_fee: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig { move_timeout: DEFAULT_MOVE_TIMEOUT, entry_fee: DEFAULT_ENTRY_FEE }
    }
}

impl TableConfig {
    /// Reads configuration from environment variables.
    ///
    /// Recognized variables:
    /// - `MOVE_TIMEOUT_SECONDS` (u64): seconds allowed per move (default 60)
    /// - `ENTRY_FEE_USD` (f64): per-seat entry fee (default 1.00)
    ///
    /// Unset variables keep their default; set but unparseable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = TableConfig::default();

        if let Some(value) = lookup("MOVE_TIMEOUT_SECONDS") {
            let var = "MOVE_TIMEOUT_SECONDS";
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var, value: value.clone() })?;
            if secs == 0 {
                return Err(ConfigError::NotPositive { var, value });
            }
            config.move_timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup("ENTRY_FEE_USD") {
            let var = "ENTRY_FEE_USD";
            let fee: f64 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var, value: value.clone() })?;
            if !fee.is_finite() || fee < 0.0 {
                return Err(ConfigError::InvalidValue { var, value });
            }
            config.entry_fee = fee;
        }

        Ok(config)
    }

    pub fn with_move_timeout(mut self, timeout: Duration) -> Self {
        self.move_timeout = timeout;
        self
    }

    pub fn with_entry_fee(mut self, fee: f64) -> Self {
        self.entry_fee = fee;
        self
    }
}

//! Engine configuration
//!
//! All values can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | RESERVATION_WINDOW_HOURS | 48 | How long a reservation holds stock |
//! | SWEEP_INTERVAL_SECS | 300 | Expiry sweeper period |
//! | CODE_MAX_ATTEMPTS | 10 | Order-code retry budget before widening |
//!
//! Values are required to be sane: zero is rejected by [`EngineConfig::validate`]
//! instead of being silently defaulted.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config: {field} must be positive")]
    NotPositive { field: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Reservation window in hours
    pub reservation_window_hours: i64,
    /// Expiry sweeper interval in seconds
    pub sweep_interval_secs: u64,
    /// Order-code generation attempts before the widening fallback
    pub code_max_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reservation_window_hours: 48,
            sweep_interval_secs: 300,
            code_max_attempts: 10,
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            reservation_window_hours: std::env::var("RESERVATION_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.reservation_window_hours),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval_secs),
            code_max_attempts: std::env::var("CODE_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.code_max_attempts),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reservation_window_hours <= 0 {
            return Err(ConfigError::NotPositive {
                field: "reservation_window_hours",
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "sweep_interval_secs",
            });
        }
        if self.code_max_attempts == 0 {
            return Err(ConfigError::NotPositive {
                field: "code_max_attempts",
            });
        }
        Ok(())
    }

    /// Reservation window as a chrono duration
    pub fn reservation_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.reservation_window_hours)
    }

    /// Sweep interval as a std duration
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}

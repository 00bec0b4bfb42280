//! Configuration types for gann-sq9
//!
//! Every recognized field is enumerated with its default; unknown keys are
//! rejected at deserialization so a typo fails fast instead of being ignored.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub gann: GannConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Square of 9 level generation parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GannConfig {
    /// Root increment per axis, in spiral order from 0° to 315°
    #[serde(default = "default_increments")]
    pub increments: Vec<Decimal>,

    /// Rings generated outward from the center per axis
    #[serde(default = "default_values_per_axis")]
    pub values_per_axis: u32,

    /// Multiplicative stop-loss buffer beyond the straddle levels
    #[serde(default = "default_buffer_fraction")]
    pub buffer_fraction: Decimal,

    /// Also generate rings below the central square
    #[serde(default = "default_include_lower")]
    pub include_lower: bool,

    /// Cap on buy/sell targets returned per side
    #[serde(default = "default_num_targets")]
    pub num_targets: usize,
}

fn default_increments() -> Vec<Decimal> {
    vec![
        Decimal::new(125, 3),
        Decimal::new(25, 2),
        Decimal::new(5, 1),
        Decimal::new(75, 2),
        Decimal::ONE,
        Decimal::new(75, 2),
        Decimal::new(5, 1),
        Decimal::new(25, 2),
    ]
}
fn default_values_per_axis() -> u32 {
    20
}
fn default_buffer_fraction() -> Decimal {
    Decimal::new(2, 3) // 0.002
}
fn default_include_lower() -> bool {
    true
}
fn default_num_targets() -> usize {
    3
}

impl Default for GannConfig {
    fn default() -> Self {
        Self {
            increments: default_increments(),
            values_per_axis: default_values_per_axis(),
            buffer_fraction: default_buffer_fraction(),
            include_lower: default_include_lower(),
            num_targets: default_num_targets(),
        }
    }
}

impl GannConfig {
    /// Check the constructor constraints once, before an engine is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.increments.len() != 8 {
            return Err(ConfigError::IncrementCount(self.increments.len()));
        }
        if self.increments.iter().any(|i| *i <= Decimal::ZERO) {
            return Err(ConfigError::NonPositiveIncrement);
        }
        if self.values_per_axis == 0 {
            return Err(ConfigError::ZeroValuesPerAxis);
        }
        if self.buffer_fraction < Decimal::ZERO || self.buffer_fraction >= Decimal::ONE {
            return Err(ConfigError::BufferOutOfRange(self.buffer_fraction));
        }
        if self.num_targets == 0 {
            return Err(ConfigError::ZeroTargets);
        }
        Ok(())
    }
}

/// Risk management parameters, fractions of account balance unless noted
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskConfig {
    /// Capital risked per trade
    #[serde(default = "default_max_risk_per_trade")]
    pub max_risk_per_trade: Decimal,

    /// Maximum concurrent open positions (count)
    #[serde(default = "default_max_positions")]
    pub max_positions: usize,

    /// Aggregate risk allowed on a single symbol
    #[serde(default = "default_max_risk_per_symbol")]
    pub max_risk_per_symbol: Decimal,

    /// Daily loss that halts new admissions
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: Decimal,

    /// Drawdown from peak balance that halts new admissions
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: Decimal,

    /// Minimum profit/loss ratio for a targeted trade (ratio, not fraction)
    #[serde(default = "default_min_risk_reward")]
    pub min_risk_reward: Decimal,

    /// Account balance the session starts from
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,
}

fn default_max_risk_per_trade() -> Decimal {
    Decimal::new(1, 2) // 0.01
}
fn default_max_positions() -> usize {
    5
}
fn default_max_risk_per_symbol() -> Decimal {
    Decimal::new(2, 2) // 0.02
}
fn default_max_daily_loss() -> Decimal {
    Decimal::new(5, 2) // 0.05
}
fn default_max_drawdown() -> Decimal {
    Decimal::new(10, 2) // 0.10
}
fn default_min_risk_reward() -> Decimal {
    Decimal::new(15, 1) // 1.5
}
fn default_initial_balance() -> Decimal {
    Decimal::new(1_000_000, 0)
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_risk_per_trade: default_max_risk_per_trade(),
            max_positions: default_max_positions(),
            max_risk_per_symbol: default_max_risk_per_symbol(),
            max_daily_loss: default_max_daily_loss(),
            max_drawdown: default_max_drawdown(),
            min_risk_reward: default_min_risk_reward(),
            initial_balance: default_initial_balance(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Configuration rejected at construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("expected exactly 8 axis increments, got {0}")]
    IncrementCount(usize),
    #[error("axis increments must be positive")]
    NonPositiveIncrement,
    #[error("values_per_axis must be positive")]
    ZeroValuesPerAxis,
    #[error("buffer_fraction must be in [0, 1), got {0}")]
    BufferOutOfRange(Decimal),
    #[error("num_targets must be positive")]
    ZeroTargets,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

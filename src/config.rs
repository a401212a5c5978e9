use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use crate::choke::models::AllocationPolicy;

const DEFAULT_BLOCKS_PER_PIECE: usize = 32;
const DEFAULT_MAX_REQUESTS: usize = 50;
const DEFAULT_RATE_WINDOW_ROUNDS: usize = 2;
const DEFAULT_RECIPROCATION_ROUNDS: usize = 3;
const DEFAULT_GAMMA: f64 = 0.1;
const DEFAULT_ALPHA: f64 = 0.2;
const DEFAULT_OPTIMISTIC_PERIOD: usize = 3;
const DEFAULT_PROPORTIONAL_SHARE: f64 = 0.9;

const DEFAULT_AUCTION_ROUNDS: usize = 48;
const DEFAULT_MIN_PACING_FACTOR: f64 = 0.5;
const DEFAULT_MAX_PACING_FACTOR: f64 = 2.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{name} must be in (0, 1), got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("pacing factor bounds are inverted: min {min} > max {max}")]
    InvertedBounds { min: f64, max: f64 },
}

/// Settings of one swarm participant's strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub blocks_per_piece: usize,
    pub max_requests: usize,
    // trailing window used for download rates
    pub rate_window_rounds: usize,
    // consecutive reciprocations before a threshold decays
    pub reciprocation_rounds: usize,
    pub gamma: f64,
    pub alpha: f64,
    pub optimistic_period: usize,
    pub proportional_share: f64,
    pub policy: AllocationPolicy,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        return StrategyConfig {
            blocks_per_piece: DEFAULT_BLOCKS_PER_PIECE,
            max_requests: DEFAULT_MAX_REQUESTS,
            rate_window_rounds: DEFAULT_RATE_WINDOW_ROUNDS,
            reciprocation_rounds: DEFAULT_RECIPROCATION_ROUNDS,
            gamma: DEFAULT_GAMMA,
            alpha: DEFAULT_ALPHA,
            optimistic_period: DEFAULT_OPTIMISTIC_PERIOD,
            proportional_share: DEFAULT_PROPORTIONAL_SHARE,
            policy: AllocationPolicy::UniformRandom,
        };
    }
}

impl StrategyConfig {
    pub fn init(policy: AllocationPolicy) -> Self {
        return StrategyConfig { policy, ..StrategyConfig::default() };
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StrategyConfig = serde_json::from_str(json)?;
        config.validate()?;
        return Ok(config);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blocks_per_piece == 0 {
            return Err(ConfigError::Zero("blocks_per_piece"));
        }
        if self.rate_window_rounds == 0 {
            return Err(ConfigError::Zero("rate_window_rounds"));
        }
        if self.reciprocation_rounds == 0 {
            return Err(ConfigError::Zero("reciprocation_rounds"));
        }
        if self.optimistic_period == 0 {
            return Err(ConfigError::Zero("optimistic_period"));
        }
        check_unit_interval("gamma", self.gamma)?;
        check_unit_interval("alpha", self.alpha)?;
        check_unit_interval("proportional_share", self.proportional_share)?;
        return Ok(());
    }

    pub fn is_optimistic_round(&self, round: usize) -> bool {
        return round > 0 && round % self.optimistic_period == 0;
    }
}

/// Settings of a budget-paced auction bidder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    pub num_rounds: usize,
    pub min_pacing_factor: f64,
    pub max_pacing_factor: f64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        return AuctionConfig {
            num_rounds: DEFAULT_AUCTION_ROUNDS,
            min_pacing_factor: DEFAULT_MIN_PACING_FACTOR,
            max_pacing_factor: DEFAULT_MAX_PACING_FACTOR,
        };
    }
}

impl AuctionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AuctionConfig = serde_json::from_str(json)?;
        config.validate()?;
        return Ok(config);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rounds == 0 {
            return Err(ConfigError::Zero("num_rounds"));
        }
        if self.min_pacing_factor <= 0.0 {
            return Err(ConfigError::Zero("min_pacing_factor"));
        }
        if self.min_pacing_factor > self.max_pacing_factor {
            return Err(ConfigError::InvertedBounds { min: self.min_pacing_factor, max: self.max_pacing_factor });
        }
        return Ok(());
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        return Ok(());
    }
    return Err(ConfigError::RateOutOfRange { name, value });
}

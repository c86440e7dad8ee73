//! Game rules configuration

use serde::Deserialize;

use crate::application::FinishCycleSettings;
use crate::domain::stock::{StockSynthesizer, DEFAULT_INCOME_SCALE};

use super::error::ValidationError;

/// Tunables of the cycle finish and the first cycle
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Fund speed used for cycle 1 and whenever none is given
    #[serde(default = "default_fund_speed")]
    pub default_fund_speed: f64,

    /// Amount of each carried green bid
    #[serde(default = "default_green_carry_amount")]
    pub green_carry_amount: f64,

    /// Price of a ticket without history
    #[serde(default = "default_initial_stock_price")]
    pub initial_stock_price: f64,

    /// Income that moves a stock price by one noise unit
    #[serde(default = "default_stock_income_scale")]
    pub stock_income_scale: f64,

    /// Seed for stock noise; entropy when absent
    pub rng_seed: Option<u64>,
}

impl GameConfig {
    /// Settings handed to the cycle finish handler
    pub fn finish_cycle_settings(&self) -> FinishCycleSettings {
        FinishCycleSettings {
            green_carry_amount: self.green_carry_amount,
            synthesizer: StockSynthesizer::new(self.stock_income_scale, self.initial_stock_price),
        }
    }

    /// Validate game configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.default_fund_speed.is_finite() || self.default_fund_speed < 0.0 {
            return Err(ValidationError::InvalidFundSpeed);
        }
        if !self.green_carry_amount.is_finite() || self.green_carry_amount < 0.0 {
            return Err(ValidationError::InvalidGreenCarryAmount);
        }
        if !self.initial_stock_price.is_finite() {
            return Err(ValidationError::InvalidInitialStockPrice);
        }
        if !self.stock_income_scale.is_finite() || self.stock_income_scale <= 0.0 {
            return Err(ValidationError::InvalidIncomeScale);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_fund_speed: default_fund_speed(),
            green_carry_amount: default_green_carry_amount(),
            initial_stock_price: default_initial_stock_price(),
            stock_income_scale: default_stock_income_scale(),
            rng_seed: None,
        }
    }
}

fn default_fund_speed() -> f64 {
    10.0
}

fn default_green_carry_amount() -> f64 {
    1.0
}

fn default_initial_stock_price() -> f64 {
    100.0
}

fn default_stock_income_scale() -> f64 {
    DEFAULT_INCOME_SCALE
}

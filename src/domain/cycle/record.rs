//! Cycle records.
//!
//! The cycle counter is append-only: finishing a cycle appends the record of
//! the next one, carrying the fund speed chosen for it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp};

/// One tick of the game clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u32,
    /// Capital accrual rate, per minute, for bids approved in this cycle.
    pub fund_speed: f64,
    pub started_at: Timestamp,
}

impl CycleRecord {
    /// The record used when the counter is still empty.
    pub fn first(fund_speed: f64, now: Timestamp) -> Result<Self, DomainError> {
        Ok(Self {
            cycle: 1,
            fund_speed: validate_fund_speed(fund_speed)?,
            started_at: now,
        })
    }

    /// The record that follows this one.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for a negative or non-finite fund speed, or when
    /// the cycle number would overflow.
    pub fn next(&self, fund_speed: f64, now: Timestamp) -> Result<Self, DomainError> {
        let cycle = self.cycle.checked_add(1).ok_or_else(|| {
            DomainError::validation("cycle", "Cycle counter overflow")
        })?;
        Ok(Self {
            cycle,
            fund_speed: validate_fund_speed(fund_speed)?,
            started_at: now,
        })
    }

    /// The cycle before this one, if any.
    pub fn previous_cycle(&self) -> Option<u32> {
        self.cycle.checked_sub(1)
    }
}

fn validate_fund_speed(fund_speed: f64) -> Result<f64, DomainError> {
    if !fund_speed.is_finite() || fund_speed < 0.0 {
        return Err(DomainError::validation(
            "fund_speed",
            format!("Fund speed must be finite and non-negative, got {}", fund_speed),
        ));
    }
    Ok(fund_speed)
}

//! InvestmentBid aggregate.
//!
//! A bid is a participant's commitment of capital to one market for one
//! cycle.
//!
//! # Invariants
//!
//! - `amount >= 0` and `multiplier >= 0`, both finite
//! - `approved_at` is set iff `status == Approved`
//! - `income` moves from `None` to `Some` exactly once, and only on an
//!   approved bid; after that the bid is frozen for its cycle

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BidId, DomainError, ErrorCode, MarketName, ParticipantId, StateMachine, Timestamp,
    ValidationError,
};

use super::BidStatus;

/// A participant's capital commitment to a market for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentBid {
    pub id: BidId,
    pub participant: ParticipantId,
    pub market: MarketName,

    /// Capital committed; the ceiling of what can accrue.
    pub amount: f64,

    pub created_at: Timestamp,
    pub approved_at: Option<Timestamp>,
    pub status: BidStatus,
    pub cycle: u32,

    /// Realized gain (or loss when negative), written once at settlement.
    pub income: Option<f64>,

    /// Administrative scaling of the funded amount.
    pub multiplier: f64,
}

impl InvestmentBid {
    /// Creates a new pending bid.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if amount is negative or not finite.
    pub fn submit(
        participant: ParticipantId,
        market: MarketName,
        amount: f64,
        cycle: u32,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let amount = ValidationError::check_non_negative("amount", amount)?;
        Ok(Self {
            id: BidId::new(),
            participant,
            market,
            amount,
            created_at: now,
            approved_at: None,
            status: BidStatus::Pending,
            cycle,
            income: None,
            multiplier: 1.0,
        })
    }

    /// Creates an already-approved bid that keeps a profitable position
    /// alive into the next cycle.
    ///
    /// Both timestamps are backdated so the bid accrues as if it had been
    /// approved at `backdated_to`.
    pub fn green_carry(
        participant: ParticipantId,
        market: MarketName,
        amount: f64,
        cycle: u32,
        backdated_to: Timestamp,
    ) -> Result<Self, ValidationError> {
        let mut bid = Self::submit(participant, market, amount, cycle, backdated_to)?;
        bid.status = BidStatus::Approved;
        bid.approved_at = Some(backdated_to);
        Ok(bid)
    }

    /// Accepts the bid and stamps the approval instant.
    pub fn approve(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.status = self.status.transition_to(BidStatus::Approved)?;
        self.approved_at = Some(now);
        Ok(())
    }

    /// Declines the bid.
    pub fn reject(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(BidStatus::Rejected)?;
        Ok(())
    }

    /// Changes the administrative multiplier.
    ///
    /// # Errors
    ///
    /// - `BidAlreadyPriced` once income has been assigned
    /// - `ValidationFailed` for negative or non-finite multipliers
    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<(), DomainError> {
        self.ensure_unpriced()?;
        self.multiplier = ValidationError::check_non_negative("multiplier", multiplier)?;
        Ok(())
    }

    /// Records the settled income. One-time write.
    ///
    /// # Errors
    ///
    /// - `BidNotApproved` if the bid was never approved
    /// - `BidAlreadyPriced` if income is already set
    pub fn assign_income(&mut self, income: f64) -> Result<(), DomainError> {
        self.ensure_unpriced()?;
        if self.status != BidStatus::Approved {
            return Err(DomainError::new(
                ErrorCode::BidNotApproved,
                format!("Bid {} is {} and cannot be priced", self.id, self.status),
            ));
        }
        if !income.is_finite() {
            return Err(DomainError::validation("income", "Income must be finite"));
        }
        self.income = Some(income);
        Ok(())
    }

    /// Capital actually competing in the market at `now`.
    ///
    /// Accrues linearly at `fund_speed` per minute from approval, capped at
    /// the committed amount, then scaled by the multiplier. Unapproved bids
    /// have nothing funded.
    pub fn funded_amount(&self, fund_speed: f64, now: Timestamp) -> f64 {
        match (self.status, self.approved_at) {
            (BidStatus::Approved, Some(approved_at)) => {
                let accrued = fund_speed * now.minutes_since(&approved_at);
                self.multiplier * self.amount.min(accrued)
            }
            _ => 0.0,
        }
    }

    /// Approved and still waiting for settlement.
    pub fn is_eligible_for_pricing(&self) -> bool {
        self.status == BidStatus::Approved && self.income.is_none()
    }

    pub fn is_priced(&self) -> bool {
        self.income.is_some()
    }

    /// Still ties up funds: pending, or approved and unpriced.
    pub fn is_active(&self) -> bool {
        self.status.holds_funds() && self.income.is_none()
    }

    fn ensure_unpriced(&self) -> Result<(), DomainError> {
        if self.is_priced() {
            return Err(DomainError::new(
                ErrorCode::BidAlreadyPriced,
                format!("Bid {} has already been priced", self.id),
            ));
        }
        Ok(())
    }
}

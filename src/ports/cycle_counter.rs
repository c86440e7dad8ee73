//! Cycle counter port.

use async_trait::async_trait;

use crate::domain::cycle::CycleRecord;
use crate::domain::foundation::DomainError;

/// Port for the append-only cycle counter.
#[async_trait]
pub trait CycleCounter: Send + Sync {
    /// The current cycle, or `None` before the game has started.
    async fn latest(&self) -> Result<Option<CycleRecord>, DomainError>;

    /// Append the record of the next cycle.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `record.cycle` is not exactly one past the latest
    async fn append_next(&self, record: &CycleRecord) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_counter_is_object_safe() {
        fn _accepts_dyn(_counter: &dyn CycleCounter) {}
    }
}

//! Cycle command handlers.

mod finish_cycle;

pub use finish_cycle::{
    CycleFinishedEvent, FinishCycleCommand, FinishCycleError, FinishCycleHandler,
    FinishCycleResult, FinishCycleSettings,
};

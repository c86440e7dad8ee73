//! `capital-game` - finishes the current cycle of a game stored on disk.
//!
//! Usage: `capital-game [NEXT_FUND_SPEED]`
//!
//! On an empty snapshot the first cycle is started instead.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use capital_game::adapters::{InMemoryEventBus, InMemoryGameStore, JsonSnapshotFile, SnapshotError};
use capital_game::application::{FinishCycleCommand, FinishCycleHandler};
use capital_game::application::handlers::FinishCycleError;
use capital_game::config::{AppConfig, ConfigError, ValidationError};
use capital_game::domain::cycle::CycleRecord;
use capital_game::domain::foundation::{CycleContext, DomainError, Timestamp};
use capital_game::ports::CycleCounter;

#[derive(Debug, Error)]
enum RunError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid fund speed argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Snapshot(#[from] SnapshotError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    FinishCycle(#[from] FinishCycleError),
}

#[tokio::main]
async fn main() -> Result<(), RunError> {
    let config = AppConfig::load()?;
    config.validate()?;
    config.logging.init_tracing()?;

    let next_fund_speed = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<f64>().map_err(|_| RunError::InvalidArgument(arg)))
        .transpose()?;

    let file = JsonSnapshotFile::new(&config.store.snapshot_path);
    let store = InMemoryGameStore::from_snapshot(file.load_or_default().await?);

    if store.latest().await?.is_none() {
        let first = CycleRecord::first(config.game.default_fund_speed, Timestamp::now())?;
        store.append_next(&first).await?;
        file.save(&store.snapshot().await).await?;
        info!(
            fund_speed = first.fund_speed,
            path = %file.path().display(),
            "Game started at cycle 1"
        );
        return Ok(());
    }

    let bus = Arc::new(InMemoryEventBus::new());
    let mut handler = FinishCycleHandler::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        bus.clone(),
    )
    .with_settings(config.game.finish_cycle_settings());
    if let Some(seed) = config.game.rng_seed {
        handler = handler.with_seed(seed);
    }

    let result = handler
        .handle(FinishCycleCommand { next_fund_speed }, CycleContext::operator())
        .await?;
    file.save(&store.snapshot().await).await?;

    info!(
        cycle = result.finished.cycle,
        next_cycle = result.next.cycle,
        priced = result.event.priced_bids,
        transactions = result.transactions.len(),
        stock_points = result.stock_points.len(),
        events = bus.event_count(),
        "Snapshot saved"
    );
    Ok(())
}

//! # Batch Runner
//!
//! Executes sorted batches strictly in order. Within a batch every configure
//! action is launched concurrently against the shared handle and the runner
//! suspends until the whole set settles; the first failure aborts the
//! remaining pipeline. Batches already run are not rolled back, so the
//! application handle may be left partially configured on failure.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::error::InitializerError;
use crate::initializer::{AppHandle, Initializer};

/// Run every batch in order, fanning out within each batch.
pub async fn run_initializers<A>(
    batches: &[Vec<Initializer<A>>],
    app: Arc<A>,
) -> Result<(), InitializerError>
where
    A: AppHandle,
{
    for (index, batch) in batches.iter().enumerate() {
        debug!(batch = index, size = batch.len(), "running initializer batch");
        try_join_all(
            batch
                .iter()
                .map(|initializer| initializer.configure_app(Arc::clone(&app))),
        )
        .await?;
    }

    info!(batches = batches.len(), "initializer batches completed");
    Ok(())
}

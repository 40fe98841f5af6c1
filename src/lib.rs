//! # Initflow
//!
//! Dependency-ordered application initializers with batched async execution.
//!
//! An application often has a pile of startup chores: connect the database,
//! register routes, warm a cache, seed an admin user. Some of those depend on
//! others; most do not. This crate discovers those chores as *initializer*
//! records, orders them by their declared name-based dependencies, and runs
//! them against a shared application handle: concurrently where independent,
//! sequentially where ordered.
//!
//! ## Architecture Overview
//!
//! The pipeline is four stages, each one its own module:
//!
//! 1. **Discovery** ([`discovery`]): walk a directory and collect files
//!    matching a glob pattern.
//! 2. **Loading** ([`loader`]): resolve each file into an [`Initializer`]
//!    record (`name`, `after`, configure action). The default loader reads
//!    TOML manifests whose `configure` field names an action registered in
//!    an [`ActionRegistry`].
//! 3. **Sorting** ([`sorter`]): partition records into ordered batches so
//!    that a record declaring `after = "database"` lands in a batch strictly
//!    after the one containing the record named `database`. Unsatisfiable
//!    cycles are detected and reported, never silently dropped.
//! 4. **Running** ([`runner`]): execute batches in order; within a batch
//!    every action runs concurrently and the first failure aborts the rest.
//!
//! [`InitializerPipeline`] composes the stages; [`configure`] is the one-call
//! entry point that resolves to the application handle.
//!
//! ## Ordering Model
//!
//! Ordering is by groups, not edges. Every record with `after == ""` runs in
//! the first batch. A group of records sharing an `after` value becomes
//! eligible as a batch once any record carrying that name has run, or
//! immediately if no record carries that name at all (a missing predecessor
//! degrades to "no dependency" rather than an error). Records in the same
//! batch must be independent by the caller's contract; the crate provides no
//! mutual exclusion between them.
//!
//! ## Example
//!
//! Records can be built programmatically, with no filesystem involved:
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use initflow::{runner, sorter, Initializer};
//!
//! #[derive(Default)]
//! struct App {
//!     log: Mutex<Vec<String>>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), initflow::InitializerError> {
//!     let initializers = vec![
//!         Initializer::from_fn("routes", "database", |app: Arc<App>| async move {
//!             app.log.lock().unwrap().push("routes".into());
//!             Ok(())
//!         }),
//!         Initializer::from_fn("database", "", |app: Arc<App>| async move {
//!             app.log.lock().unwrap().push("database".into());
//!             Ok(())
//!         }),
//!     ];
//!
//!     let batches = sorter::sort_initializers(initializers)?;
//!     let app = Arc::new(App::default());
//!     runner::run_initializers(&batches, Arc::clone(&app)).await?;
//!
//!     assert_eq!(*app.log.lock().unwrap(), vec!["database", "routes"]);
//!     Ok(())
//! }
//! ```
//!
//! Or loaded from a directory of manifests, where `initializers/cache.toml`
//! might read:
//!
//! ```toml
//! name = "cache"
//! after = "database"
//! configure = "warm-cache"
//! ```
//!
//! and startup code registers `warm-cache` in an [`ActionRegistry`] before
//! calling [`configure`].
//!
//! ## Failure Model
//!
//! Every failure surfaces as a single [`InitializerError`] naming the stage
//! and, where applicable, the file or initializer involved. Nothing is
//! retried, and batches that already ran are not rolled back; on failure
//! the handle may be left partially configured.

pub mod discovery;
pub mod error;
pub mod initializer;
pub mod loader;
pub mod pipeline;
pub mod registry;
pub mod runner;
pub mod sorter;
pub mod telemetry;

pub use error::{BoxError, InitializerError};
pub use initializer::{AppHandle, Configure, FnConfigure, Initializer, Manifest};
pub use loader::{Loader, ManifestLoader};
pub use pipeline::{InitializerPipeline, PipelineOptions};
pub use registry::ActionRegistry;

use std::sync::Arc;

/// Discover, order, and run every initializer under `options.directory`,
/// resolving to the application handle on success.
pub async fn configure<A>(
    app: Arc<A>,
    loader: impl Loader<A> + 'static,
    options: PipelineOptions,
) -> Result<Arc<A>, InitializerError>
where
    A: AppHandle,
{
    let pipeline = InitializerPipeline::new(options, loader);
    pipeline.configure_app(Arc::clone(&app)).await?;
    Ok(app)
}

/// Like [`configure`], but also invokes `done` exactly once with the outcome
/// before returning it, for callers that want a completion hook.
pub async fn configure_with<A, F>(
    app: Arc<A>,
    loader: impl Loader<A> + 'static,
    options: PipelineOptions,
    done: F,
) -> Result<Arc<A>, InitializerError>
where
    A: AppHandle,
    F: FnOnce(Result<&Arc<A>, &InitializerError>),
{
    match configure(app, loader, options).await {
        Ok(app) => {
            done(Ok(&app));
            Ok(app)
        }
        Err(err) => {
            done(Err(&err));
            Err(err)
        }
    }
}

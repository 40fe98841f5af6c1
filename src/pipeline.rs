//! # Pipeline Orchestration
//!
//! [`InitializerPipeline`] composes the stages into a single operation:
//! discover files → load each into a record → sort into dependency-ordered
//! batches → run the batches against the application handle. Each stage is
//! also exposed on its own, so callers can inspect or test intermediate
//! results. A failure at any stage short-circuits the rest.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::discovery;
use crate::error::InitializerError;
use crate::initializer::{AppHandle, Initializer};
use crate::loader::{Loader, ManifestLoader};
use crate::registry::ActionRegistry;
use crate::runner;
use crate::sorter;

/// Default directory scanned for initializer files, relative to the process
/// working directory.
pub const DEFAULT_DIRECTORY: &str = "initializers";

/// Default file-match pattern: every TOML manifest, recursively.
pub const DEFAULT_FILE_MATCH: &str = "**/*.toml";

/// Where to look for initializer files and which ones to pick up.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub directory: PathBuf,
    pub file_match: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            file_match: DEFAULT_FILE_MATCH.to_string(),
        }
    }
}

impl PipelineOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn file_match(mut self, pattern: impl Into<String>) -> Self {
        self.file_match = pattern.into();
        self
    }
}

/// Discovers, orders, and runs initializers against a shared handle.
pub struct InitializerPipeline<A: AppHandle> {
    options: PipelineOptions,
    loader: Arc<dyn Loader<A>>,
}

impl<A: AppHandle> InitializerPipeline<A> {
    pub fn new(options: PipelineOptions, loader: impl Loader<A> + 'static) -> Self {
        Self {
            options,
            loader: Arc::new(loader),
        }
    }

    /// Convenience constructor wiring up the default manifest loader.
    pub fn with_registry(options: PipelineOptions, registry: ActionRegistry<A>) -> Self {
        Self::new(options, ManifestLoader::new(registry))
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Discover matching files and load each into a record, in discovery
    /// order.
    pub async fn get_initializers(&self) -> Result<Vec<Initializer<A>>, InitializerError> {
        let files = discovery::discover_files(&self.options.directory, &self.options.file_match)?;
        let mut initializers = Vec::with_capacity(files.len());
        for file in files {
            initializers.push(self.loader.load(&file).await?);
        }
        Ok(initializers)
    }

    /// Partition records into dependency-ordered batches.
    pub fn sort_initializers(
        &self,
        initializers: Vec<Initializer<A>>,
    ) -> Result<Vec<Vec<Initializer<A>>>, InitializerError> {
        sorter::sort_initializers(initializers)
    }

    /// Run sorted batches against the application handle.
    pub async fn run_initializers(
        &self,
        batches: &[Vec<Initializer<A>>],
        app: Arc<A>,
    ) -> Result<(), InitializerError> {
        runner::run_initializers(batches, app).await
    }

    /// Full pipeline: discover → load → sort → run.
    pub async fn configure_app(&self, app: Arc<A>) -> Result<(), InitializerError> {
        let initializers = self.get_initializers().await?;
        info!(
            count = initializers.len(),
            directory = %self.options.directory.display(),
            "loaded initializers"
        );
        let batches = self.sort_initializers(initializers)?;
        self.run_initializers(&batches, app).await
    }
}

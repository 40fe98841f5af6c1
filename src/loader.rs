//! # Initializer Loading
//!
//! The [`Loader`] trait is the boundary between file paths and initializer
//! records. The default implementation, [`ManifestLoader`], reads a TOML
//! manifest and resolves its declared action name against an
//! [`ActionRegistry`]. Failing to read or parse a file is a load-time
//! failure; a manifest that resolves to no action still loads and fails
//! later, when its batch executes.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::InitializerError;
use crate::initializer::{AppHandle, Initializer, Manifest};
use crate::registry::ActionRegistry;

/// Turns a file path into an initializer record.
#[async_trait]
pub trait Loader<A: AppHandle>: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Initializer<A>, InitializerError>;
}

/// Loads TOML manifests and resolves their actions from a registry.
pub struct ManifestLoader<A: AppHandle> {
    registry: ActionRegistry<A>,
}

impl<A: AppHandle> ManifestLoader<A> {
    pub fn new(registry: ActionRegistry<A>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<A: AppHandle> Loader<A> for ManifestLoader<A> {
    async fn load(&self, path: &Path) -> Result<Initializer<A>, InitializerError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| InitializerError::Load {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        let manifest: Manifest =
            toml::from_str(&raw).map_err(|source| InitializerError::Load {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        debug!(
            path = %path.display(),
            name = %manifest.name,
            after = %manifest.after,
            "loaded initializer manifest"
        );

        Ok(Initializer::from_manifest(manifest, path, &self.registry))
    }
}

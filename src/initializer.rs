//! # Initializer Records
//!
//! An [`Initializer`] is one discrete unit of application configuration: an
//! identity (`name`), an optional declared predecessor (`after`), and a
//! configure action to run against the shared application handle.
//!
//! # Architecture Note
//! Records are built by explicit field extraction, never by merging an
//! arbitrary loaded shape: a [`Manifest`] is deserialized with stated
//! defaults (`name: ""`, `after: ""`) and turned into a record via
//! [`Initializer::from_manifest`]. A record may legitimately carry no action
//! at construction time; the check is deferred until its batch executes, at
//! which point [`Initializer::configure_app`] fails with
//! [`InitializerError::MissingConfigure`] naming the originating file.
//!
//! The [`Configure`] trait is the seam between the pipeline and application
//! code. Implement it directly for stateful actions, or wrap an async closure
//! with [`FnConfigure`] / [`Initializer::from_fn`].

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{BoxError, InitializerError};
use crate::registry::ActionRegistry;

/// The shared object being configured.
///
/// The pipeline never touches the handle itself; it only passes an
/// `Arc<A>` to every configure action. Any thread-safe type qualifies, so
/// this is a blanket-implemented marker. Actions running in the same batch
/// receive the handle concurrently and must be independent by the caller's
/// contract; the pipeline provides no mutual exclusion between them.
pub trait AppHandle: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> AppHandle for T {}

/// A unit of configuration work run against the shared application handle.
///
/// The return value of a successful run is ignored by the batch runner; only
/// the side effects on the handle matter.
#[async_trait]
pub trait Configure<A: AppHandle>: Send + Sync {
    async fn configure(&self, app: Arc<A>) -> Result<(), BoxError>;
}

/// Adapter that lets a plain async closure act as a [`Configure`] action.
pub struct FnConfigure<F>(F);

impl<F> FnConfigure<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<A, F, Fut> Configure<A> for FnConfigure<F>
where
    A: AppHandle,
    F: Fn(Arc<A>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    async fn configure(&self, app: Arc<A>) -> Result<(), BoxError> {
        (self.0)(app).await
    }
}

/// The raw shape of an initializer file on disk.
///
/// Every field defaults: an empty `name` means "anonymous", an empty `after`
/// means "no dependency, run in the first batch", and a missing `configure`
/// defers the missing-action failure to execution time.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub name: String,
    pub after: String,
    /// Key of a registered action in the [`ActionRegistry`].
    pub configure: Option<String>,
}

/// A loaded unit of configuration with identity, optional dependency, and a
/// configure action.
pub struct Initializer<A: AppHandle> {
    name: String,
    after: String,
    source: PathBuf,
    action: Option<Arc<dyn Configure<A>>>,
}

impl<A: AppHandle> Clone for Initializer<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            after: self.after.clone(),
            source: self.source.clone(),
            action: self.action.clone(),
        }
    }
}

impl<A: AppHandle> fmt::Debug for Initializer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("name", &self.name)
            .field("after", &self.after)
            .field("source", &self.source)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl<A: AppHandle> Initializer<A> {
    /// Construct a record programmatically, without any backing file.
    pub fn new(
        name: impl Into<String>,
        after: impl Into<String>,
        action: impl Configure<A> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            after: after.into(),
            source: PathBuf::new(),
            action: Some(Arc::new(action)),
        }
    }

    /// Construct a record from an async closure.
    pub fn from_fn<F, Fut>(name: impl Into<String>, after: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self::new(name, after, FnConfigure::new(f))
    }

    /// Build a record from a loaded manifest, resolving the declared action
    /// name against the registry.
    ///
    /// An unknown or absent action name is not a load failure; the record is
    /// constructed without an action and fails descriptively if it is ever
    /// executed.
    pub fn from_manifest(manifest: Manifest, source: &Path, registry: &ActionRegistry<A>) -> Self {
        let action = manifest
            .configure
            .as_deref()
            .and_then(|key| registry.get(key));
        Self {
            name: manifest.name,
            after: manifest.after,
            source: source.to_path_buf(),
            action,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn after(&self) -> &str {
        &self.after
    }

    /// The file this record was loaded from; empty for programmatic records.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Run the configure action against the shared application handle.
    pub async fn configure_app(&self, app: Arc<A>) -> Result<(), InitializerError> {
        let action = self
            .action
            .as_ref()
            .ok_or_else(|| InitializerError::MissingConfigure {
                file: self.file_label(),
            })?;

        action
            .configure(app)
            .await
            .map_err(|source| InitializerError::Configure {
                initializer: self.display_name(),
                source,
            })
    }

    /// Base name of the source file, for diagnostics.
    fn file_label(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display_name())
    }

    fn display_name(&self) -> String {
        if self.name.is_empty() {
            "<anonymous initializer>".to_string()
        } else {
            self.name.clone()
        }
    }
}

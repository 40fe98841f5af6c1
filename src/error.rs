//! # Pipeline Errors
//!
//! This module defines the error taxonomy for the initializer pipeline.
//! Each stage of the pipeline (discovery, load, sort, run) maps to a distinct
//! variant so callers can pattern-match on the failure kind instead of
//! inspecting message strings.

use std::path::PathBuf;

/// Boxed foreign error, as produced by configure actions and loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while discovering, ordering, or running initializers.
#[derive(Debug, thiserror::Error)]
pub enum InitializerError {
    /// Enumerating files under the initializer directory failed.
    #[error("failed to load initializer files: {source}")]
    Discovery {
        #[source]
        source: walkdir::Error,
    },

    /// The configured file-match glob does not compile.
    #[error("invalid file match pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A matched file could not be resolved into an initializer record.
    #[error("failed to load initializer {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// A record reached execution without a usable configure action.
    #[error("must provide a configure action in {file}")]
    MissingConfigure { file: String },

    /// The sorter stalled: the remaining records can never be scheduled.
    #[error("initializers failed to complete; dependency cycle detected among [{}]", .remaining.join(", "))]
    DependencyCycle { remaining: Vec<String> },

    /// A configure action failed while its batch was running.
    #[error("initializer `{initializer}` failed to configure the application: {source}")]
    Configure {
        initializer: String,
        #[source]
        source: BoxError,
    },
}

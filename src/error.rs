//! Error taxonomy for scaffolding runs
//!
//! Every failure a generation or removal step can hit is a variant of
//! [`ScaffoldError`]. Orchestrators use [`ScaffoldError::is_fatal`] to decide
//! whether a failed step stops the remaining steps of the run:
//!
//! - `AnchorNotFound`: the aggregate file is left as it was, later steps run
//! - `OverwriteDeclined`: the artifact is skipped, later steps run
//! - `UnrecognizedColumnType`: diagnostic only, generation degrades to TODOs
//! - `Filesystem` / `Render`: the run stops, completed steps are not rolled back

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// ERROR CATEGORIES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The target file does not have the structure the generator expects
    InputContract,
    /// Schema information the generator cannot map
    Schema,
    /// The user chose to keep an existing file
    Declined,
    /// Disk access failed
    Io,
    /// Template lookup or rendering failed
    Template,
    /// Invalid configuration
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InputContract => "input_contract",
            ErrorCategory::Schema => "schema",
            ErrorCategory::Declined => "declined",
            ErrorCategory::Io => "io",
            ErrorCategory::Template => "template",
            ErrorCategory::Config => "config",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SCAFFOLD ERROR
// =============================================================================

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("anchor {anchor:?} not found{}", display_path(.path))]
    AnchorNotFound {
        anchor: String,
        path: Option<PathBuf>,
    },

    #[error("column {field:?} has type {raw_type:?} which is not predefined")]
    UnrecognizedColumnType { field: String, raw_type: String },

    #[error("overwrite of {} declined", .path.display())]
    OverwriteDeclined { path: PathBuf },

    #[error("filesystem error on {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render template {template:?}: {source}")]
    Render {
        template: String,
        #[source]
        source: tera::Error,
    },

    #[error("template {template:?} is not registered")]
    TemplateNotFound { template: String },

    #[error("schema error: {message}")]
    Schema { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl ScaffoldError {
    pub fn filesystem(path: impl AsRef<Path>, source: io::Error) -> Self {
        ScaffoldError::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        ScaffoldError::Schema {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ScaffoldError::Config {
            message: message.into(),
        }
    }

    /// Attaches the aggregate file path to an `AnchorNotFound` raised by the
    /// pure splice function.
    pub fn at_path(self, file: &Path) -> Self {
        match self {
            ScaffoldError::AnchorNotFound { anchor, path: None } => ScaffoldError::AnchorNotFound {
                anchor,
                path: Some(file.to_path_buf()),
            },
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScaffoldError::AnchorNotFound { .. } => ErrorCategory::InputContract,
            ScaffoldError::UnrecognizedColumnType { .. } | ScaffoldError::Schema { .. } => {
                ErrorCategory::Schema
            }
            ScaffoldError::OverwriteDeclined { .. } => ErrorCategory::Declined,
            ScaffoldError::Filesystem { .. } => ErrorCategory::Io,
            ScaffoldError::Render { .. } | ScaffoldError::TemplateNotFound { .. } => {
                ErrorCategory::Template
            }
            ScaffoldError::Config { .. } => ErrorCategory::Config,
        }
    }

    /// Whether this failure stops the remaining steps of an orchestrator run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ScaffoldError::AnchorNotFound { .. }
                | ScaffoldError::OverwriteDeclined { .. }
                | ScaffoldError::UnrecognizedColumnType { .. }
        )
    }
}

pub type ScaffoldResult<T> = std::result::Result<T, ScaffoldError>;

/// Extension trait for tagging I/O results with the path they touched.
pub trait IoResultExt<T> {
    fn at(self, path: impl AsRef<Path>) -> ScaffoldResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> ScaffoldResult<T> {
        self.map_err(|source| ScaffoldError::filesystem(path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        let anchor = ScaffoldError::AnchorNotFound {
            anchor: "items: [".to_string(),
            path: None,
        };
        assert!(!anchor.is_fatal());
        assert_eq!(anchor.category(), ErrorCategory::InputContract);

        let io = ScaffoldError::filesystem("a.php", io::Error::other("disk full"));
        assert!(io.is_fatal());
        assert_eq!(io.category().as_str(), "io");
    }

    #[test]
    fn test_at_path_only_fills_missing_path() {
        let err = ScaffoldError::AnchorNotFound {
            anchor: "items: [".to_string(),
            path: None,
        }
        .at_path(Path::new("src/store/modules/menu.js"));
        assert_eq!(
            err.to_string(),
            "anchor \"items: [\" not found in src/store/modules/menu.js"
        );
    }

    #[test]
    fn test_io_result_ext() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let err = result.at("app/Models/Post.php").unwrap_err();
        assert!(err.to_string().contains("app/Models/Post.php"));
    }
}

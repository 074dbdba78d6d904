//! Harness error types.

use std::path::PathBuf;

use decl_config::ConfigError;
use decl_table::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A golden line that is not `<kind> <name>[ | <detail>]`.
    #[error("{}:{line}: {reason}", path.display())]
    Golden {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("fixture {} has no C or C++ sources", dir.display())]
    EmptyFixture { dir: PathBuf },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

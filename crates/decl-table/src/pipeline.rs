//! Whole-input analysis: per-file front end, then a single merge.

use rayon::prelude::*;

use decl_core::SourceFile;
use decl_parser::{FileError, FileSymbols, analyze_file};

use crate::builder::TableBuilder;
use crate::error::{PipelineError, TableError};
use crate::table::SymbolTable;

/// How per-file analysis is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Tokenize, parse and normalize files on a rayon pool.
    pub parallel: bool,
    /// Pool size; `0` lets rayon pick.
    pub worker_threads: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            worker_threads: 0,
        }
    }
}

/// The merged table plus everything that went wrong on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub table: SymbolTable,
    /// Files left out of the table entirely.
    pub file_errors: Vec<FileError>,
    pub table_errors: Vec<TableError>,
}

impl Analysis {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.file_errors.is_empty() && self.table_errors.is_empty()
    }

    /// Every error rendered as one line, file errors first.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.file_errors
            .iter()
            .map(ToString::to_string)
            .chain(self.table_errors.iter().map(ToString::to_string))
            .collect()
    }
}

/// Analyze `files` and merge them in the given order.
///
/// Per-file work may run in parallel; results are merged in input order so
/// the table is identical either way.
///
/// # Errors
/// Returns `PipelineError::ThreadPool` if the worker pool cannot be built.
/// Problems in the input itself are reported inside [`Analysis`].
pub fn analyze(files: &[SourceFile], options: AnalysisOptions) -> Result<Analysis, PipelineError> {
    let results: Vec<Result<FileSymbols, FileError>> = if options.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.worker_threads)
            .build()?;
        pool.install(|| files.par_iter().map(analyze_file).collect())
    } else {
        files.iter().map(analyze_file).collect()
    };
    Ok(merge(results))
}

/// Merge already-analyzed files. Failed files are recorded and skipped.
#[must_use]
pub fn merge(results: impl IntoIterator<Item = Result<FileSymbols, FileError>>) -> Analysis {
    let mut builder = TableBuilder::new();
    let mut file_errors = Vec::new();
    for result in results {
        match result {
            Ok(symbols) => builder.add_file(symbols),
            Err(error) => {
                tracing::warn!(path = %error.path, error = %error.error, "file skipped");
                file_errors.push(error);
            }
        }
    }
    let (table, table_errors) = builder.finish();
    Analysis {
        table,
        file_errors,
        table_errors,
    }
}

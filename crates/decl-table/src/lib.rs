//! # decl-table
//!
//! Cross-file half of declscope. Per-file symbol sets from `decl-parser`
//! are merged into one [`SymbolTable`]:
//!
//! - declarations meet their definitions (prototypes, forward declarations,
//!   `extern` variables, out-of-class method bodies)
//! - duplicate definitions are rejected together with what they own
//! - placeholder type references are bound across files
//! - every bound reference is indexed both ways, so a type's users can be
//!   listed as well as what a declaration uses
//!
//! [`analyze`] runs the whole pipeline over in-memory sources.

pub mod builder;
pub mod error;
pub mod pipeline;
mod resolve;
pub mod table;

pub use builder::TableBuilder;
pub use error::{PipelineError, TableError};
pub use pipeline::{Analysis, AnalysisOptions, analyze, merge};
pub use table::{ReferenceEdge, SymbolTable};

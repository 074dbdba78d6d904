//! # decl-harness
//!
//! Conformance harness for declscope. Each fixture directory holds C or C++
//! sources and a `symbols.golden` listing; the harness runs the full
//! pipeline over the sources, renders the merged table in the listing
//! format and reports every structural difference.
//!
//! With `harness.bless` set the golden file is rewritten from the produced
//! listing instead.

pub mod diff;
pub mod error;
pub mod fixture;
pub mod listing;
pub mod logging;
pub mod runner;

pub use diff::{Mismatch, diff};
pub use error::HarnessError;
pub use fixture::{Fixture, discover};
pub use listing::{ListingEntry, parse_golden, render, to_golden_text};
pub use logging::init_test_logging;
pub use runner::{FixtureReport, Harness};

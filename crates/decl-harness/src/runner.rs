//! Run fixtures through the pipeline and compare against golden files.

use std::fmt;
use std::fs;
use std::path::Path;

use decl_config::DeclConfig;
use decl_table::{AnalysisOptions, analyze};

use crate::diff::{Mismatch, diff};
use crate::error::HarnessError;
use crate::fixture::{Fixture, discover};
use crate::listing::{self, ListingEntry};

/// Outcome of one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureReport {
    pub fixture: String,
    /// Pipeline errors first, then listing differences.
    pub mismatches: Vec<Mismatch>,
    /// What the pipeline produced.
    pub produced: Vec<ListingEntry>,
    /// The golden file was rewritten instead of compared.
    pub blessed: bool,
}

impl FixtureReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for FixtureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            let verb = if self.blessed { "blessed" } else { "ok" };
            return write!(f, "fixture `{}`: {verb}", self.fixture);
        }
        write!(f, "fixture `{}`: {} mismatch(es)", self.fixture, self.mismatches.len())?;
        for mismatch in &self.mismatches {
            write!(f, "\n  {mismatch}")?;
        }
        Ok(())
    }
}

/// Drives fixtures with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: DeclConfig,
}

impl Harness {
    #[must_use]
    pub const fn new(config: DeclConfig) -> Self {
        Self { config }
    }

    /// Configure from `.env`, config files and `DECLSCOPE_*` variables.
    ///
    /// # Errors
    /// Returns `HarnessError::Config` when configuration cannot be loaded.
    pub fn from_env() -> Result<Self, HarnessError> {
        Ok(Self::new(DeclConfig::load_with_dotenv()?))
    }

    #[must_use]
    pub const fn config(&self) -> &DeclConfig {
        &self.config
    }

    /// Run every fixture under `harness.fixtures_dir`.
    ///
    /// # Errors
    /// Stops at the first fixture that cannot be run at all.
    pub fn run_all(&self) -> Result<Vec<FixtureReport>, HarnessError> {
        discover(&self.config.harness.fixtures_dir)?
            .iter()
            .map(|dir| self.run_fixture(dir))
            .collect()
    }

    /// Analyze one fixture directory and compare (or bless) its listing.
    ///
    /// # Errors
    /// Returns an error when the fixture or its golden file cannot be read,
    /// the golden file is malformed, or the worker pool cannot start.
    /// Differences are not errors: they are in the report.
    pub fn run_fixture(&self, dir: &Path) -> Result<FixtureReport, HarnessError> {
        let fixture = Fixture::load(dir, &self.config.harness.golden_file)?;
        let options = AnalysisOptions {
            parallel: self.config.analysis.parallel,
            worker_threads: self.config.analysis.worker_threads,
        };
        let analysis = analyze(&fixture.sources, options)?;
        let produced = listing::render(&analysis.table, &fixture.file_names());
        let mut mismatches: Vec<Mismatch> = analysis
            .error_messages()
            .into_iter()
            .map(Mismatch::Pipeline)
            .collect();

        let blessed = self.config.harness.bless;
        if blessed {
            let text = listing::to_golden_text(&fixture.name, &produced);
            fs::write(&fixture.golden_path, text)
                .map_err(|e| HarnessError::io(&fixture.golden_path, e))?;
            tracing::info!(fixture = %fixture.name, symbols = produced.len(), "golden file blessed");
        } else {
            let text = fs::read_to_string(&fixture.golden_path)
                .map_err(|e| HarnessError::io(&fixture.golden_path, e))?;
            let expected = listing::parse_golden(&fixture.golden_path, &text)?;
            mismatches.extend(diff(&expected, &produced));
        }

        let report = FixtureReport {
            fixture: fixture.name,
            mismatches,
            produced,
            blessed,
        };
        if report.passed() {
            tracing::debug!(fixture = %report.fixture, "fixture passed");
        } else {
            tracing::warn!(
                fixture = %report.fixture,
                mismatches = report.mismatches.len(),
                "fixture failed"
            );
        }
        Ok(report)
    }
}

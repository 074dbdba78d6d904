//! Conformance fixture settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("tests/fixtures")
}

fn default_golden_file() -> String {
    "symbols.golden".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// Root holding one directory per fixture.
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Expected listing inside each fixture directory.
    #[serde(default = "default_golden_file")]
    pub golden_file: String,

    /// Rewrite golden files from the produced listing instead of diffing.
    #[serde(default)]
    pub bless: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: default_fixtures_dir(),
            golden_file: default_golden_file(),
            bless: false,
        }
    }
}

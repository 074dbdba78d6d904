//! Dialect selection from file extensions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::CoreError;

/// A C-family grammar variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    C,
    Cpp,
}

const C_EXTENSIONS: &[&str] = &["c", "h"];
const CPP_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "hpp", "hh", "hxx"];
const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx"];

impl Dialect {
    /// Detect the dialect from a file path extension.
    ///
    /// Returns `None` for unsupported or unrecognized extensions. Content is
    /// never sniffed: callers that know better pass the dialect explicitly.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = extension(path)?;
        if C_EXTENSIONS.contains(&ext) {
            return Some(Self::C);
        }
        if CPP_EXTENSIONS.contains(&ext) {
            return Some(Self::Cpp);
        }
        None
    }

    /// Whether `path` names a header file.
    #[must_use]
    pub fn is_header(path: &str) -> bool {
        extension(path).is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext))
    }

    #[must_use]
    pub const fn is_cpp(self) -> bool {
        matches!(self, Self::Cpp)
    }
}

fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit(['/', '\\']).next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() { None } else { Some(ext) }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::C => "c",
            Self::Cpp => "cpp",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Dialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Self::C),
            "cpp" | "c++" => Ok(Self::Cpp),
            other => Err(CoreError::UnknownDialect(other.to_string())),
        }
    }
}

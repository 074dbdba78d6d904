//! Fixture directories on disk.

use std::fs;
use std::path::{Path, PathBuf};

use decl_core::{Dialect, SourceFile};

use crate::error::HarnessError;

/// A directory of C or C++ sources plus the golden listing they must
/// produce.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Directory name.
    pub name: String,
    pub dir: PathBuf,
    /// Headers first, then sources, each alphabetical. Paths are relative
    /// to the fixture directory.
    pub sources: Vec<SourceFile>,
    pub golden_path: PathBuf,
}

impl Fixture {
    /// Read every recognised source file in `dir`.
    ///
    /// # Errors
    /// Returns `HarnessError::Io` when the directory or a file cannot be
    /// read, and `HarnessError::EmptyFixture` when no source is found.
    pub fn load(dir: &Path, golden_file: &str) -> Result<Self, HarnessError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))? {
            let entry = entry.map_err(|e| HarnessError::io(dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| HarnessError::io(entry.path(), e))?
                .is_file();
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_file && Dialect::from_path(&name).is_some() {
                names.push(name);
            }
        }
        if names.is_empty() {
            return Err(HarnessError::EmptyFixture {
                dir: dir.to_path_buf(),
            });
        }
        names.sort_by(|a, b| {
            (!Dialect::is_header(a), a.as_str()).cmp(&(!Dialect::is_header(b), b.as_str()))
        });

        let mut sources = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            let text = fs::read_to_string(&path).map_err(|e| HarnessError::io(&path, e))?;
            if let Some(source) = SourceFile::detect(name, text) {
                sources.push(source);
            }
        }

        Ok(Self {
            name: dir
                .file_name()
                .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().into_owned()),
            dir: dir.to_path_buf(),
            sources,
            golden_path: dir.join(golden_file),
        })
    }

    /// Source paths as they appear in symbol locations.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.path.clone()).collect()
    }
}

/// Every subdirectory of `root`, sorted by name.
///
/// # Errors
/// Returns `HarnessError::Io` when `root` cannot be listed.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| HarnessError::io(root, e))? {
        let entry = entry.map_err(|e| HarnessError::io(root, e))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).expect("write fixture file");
    }

    #[test]
    fn headers_come_first_then_sources() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for name in ["b.c", "z.h", "a.c", "m.hpp", "notes.txt", "symbols.golden"] {
            write(tmp.path(), name, "");
        }
        let fixture = Fixture::load(tmp.path(), "symbols.golden").expect("fixture");
        assert_eq!(fixture.file_names(), vec!["m.hpp", "z.h", "a.c", "b.c"]);
        assert_eq!(fixture.golden_path, tmp.path().join("symbols.golden"));
    }

    #[test]
    fn dialect_comes_from_extension() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write(tmp.path(), "api.h", "");
        write(tmp.path(), "impl.cc", "");
        let fixture = Fixture::load(tmp.path(), "symbols.golden").expect("fixture");
        let dialects: Vec<Dialect> = fixture.sources.iter().map(|s| s.dialect).collect();
        assert_eq!(dialects, vec![Dialect::C, Dialect::Cpp]);
    }

    #[test]
    fn directory_without_sources_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write(tmp.path(), "README", "nothing here");
        let err = Fixture::load(tmp.path(), "symbols.golden").expect_err("empty");
        assert!(matches!(err, HarnessError::EmptyFixture { .. }));
    }

    #[test]
    fn discover_lists_subdirectories_sorted() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for name in ["cpp", "c", "mixed"] {
            fs::create_dir(tmp.path().join(name)).expect("mkdir");
        }
        write(tmp.path(), "stray.h", "");
        let found: Vec<String> = discover(tmp.path())
            .expect("discover")
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(found, vec!["c", "cpp", "mixed"]);
    }
}

use serde::{Deserialize, Serialize};

/// A scope-path-prefixed symbol name, e.g. `geometry::Rectangle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName(Vec<String>);

impl QualifiedName {
    #[must_use]
    pub const fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The global scope.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Split `a::b::c` into segments. A leading `::` is ignored.
    ///
    /// Only meant for plain identifier paths; function pointer type names
    /// contain `::` inside their signature and must be built with `new`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self(
            text.trim()
                .trim_start_matches("::")
                .split("::")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The last segment, or `""` for the global scope.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Every segment but the last.
    #[must_use]
    pub fn scope(&self) -> &[String] {
        match self.0.split_last() {
            Some((_, scope)) => scope,
            None => &[],
        }
    }

    #[must_use]
    pub fn parent(&self) -> Self {
        Self(self.scope().to_vec())
    }

    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Append a relative path.
    #[must_use]
    pub fn join(&self, path: &[String]) -> Self {
        let mut segments = self.0.clone();
        segments.extend(path.iter().cloned());
        Self(segments)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("::"))
    }
}

impl From<&str> for QualifiedName {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<Vec<String>> for QualifiedName {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

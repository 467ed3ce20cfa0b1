use std::fmt;

/// Well-known record paths.
pub mod queries {
    /// Integer field holding a record's schema version.
    pub const CONTENT_VERSION: &str = "ContentVersion";
    /// View holding values written by fallback custom-data providers.
    pub const CUSTOM_DATA: &str = "Data";
}

/// A dotted path (`"Item.Count"`) addressing a value inside a [`DataContainer`](crate::DataContainer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DataQuery {
    parts: Vec<String>,
}

impl DataQuery {
    pub const SEPARATOR: char = '.';

    /// Splits `path` on [`DataQuery::SEPARATOR`], dropping empty segments.
    #[must_use]
    pub fn of(path: &str) -> Self {
        Self {
            parts: path.split(Self::SEPARATOR).filter(|p| !p.is_empty()).map(str::to_owned).collect(),
        }
    }

    /// Takes `parts` as whole segments; separators inside a part are kept.
    #[must_use]
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { parts: parts.into_iter().map(Into::<String>::into).filter(|p| !p.is_empty()).collect() }
    }

    /// Returns a new query with `child` appended.
    #[must_use]
    pub fn then(&self, child: impl Into<Self>) -> Self {
        let mut parts = self.parts.clone();
        parts.extend(child.into().parts);
        Self { parts }
    }

    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<&str> for DataQuery {
    fn from(path: &str) -> Self {
        Self::of(path)
    }
}

impl From<String> for DataQuery {
    fn from(path: String) -> Self {
        Self::of(&path)
    }
}

impl From<&Self> for DataQuery {
    fn from(query: &Self) -> Self {
        query.clone()
    }
}

impl fmt::Display for DataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

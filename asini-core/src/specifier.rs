//! Dependency specifiers of the form `name@range`.

use std::fmt;

/// Splits `"name@range"` into its name and optional range.
///
/// The split happens on the last `@` that is not the first character, so a
/// scope marker (`@scope/name`) is kept in the name. A trailing `@` with
/// nothing after it yields no range.
pub fn split_version(spec: &str) -> (String, Option<String>) {
    match spec.rfind('@') {
        Some(idx) if idx > 0 => {
            let (name, rest) = spec.split_at(idx);
            let range = &rest[1..];
            if range.is_empty() {
                (name.to_string(), None)
            } else {
                (name.to_string(), Some(range.to_string()))
            }
        }
        _ => (spec.to_string(), None),
    }
}

/// A package name paired with an optional version range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencySpecifier {
    pub name: String,
    pub range: Option<String>,
}

impl DependencySpecifier {
    pub fn parse(spec: &str) -> Self {
        let (name, range) = split_version(spec);
        Self { name, range }
    }

    /// The requested range, or `"*"` when none was given.
    #[inline]
    pub fn range_or_any(&self) -> &str {
        self.range.as_deref().unwrap_or("*")
    }

    #[inline]
    pub fn is_scoped(&self) -> bool {
        self.name.starts_with('@') && self.name.contains('/')
    }
}

impl fmt::Display for DependencySpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            Some(range) => write!(f, "{}@{}", self.name, range),
            None => f.write_str(&self.name),
        }
    }
}

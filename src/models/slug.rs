use std::fmt;

use crate::error::AppError;

/// File extension every page is stored under.
pub const PAGE_EXTENSION: &str = ".md";

/// A validated page identifier.
///
/// This is the only way to turn user input into something that ends up in a
/// filesystem path, so every route shares the same checks: no path
/// separators, no dot segments, no hidden names and no control characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw.is_empty() {
            return Err(AppError::InvalidSlug("slug cannot be empty".into()));
        }
        if raw.starts_with('.') {
            return Err(AppError::InvalidSlug(format!(
                "slug '{raw}' must not start with '.'"
            )));
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(AppError::InvalidSlug(format!(
                "slug '{raw}' contains a path separator"
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(AppError::InvalidSlug(format!(
                "slug '{}' contains control characters",
                raw.escape_debug()
            )));
        }

        Ok(Self(raw.to_string()))
    }

    /// Recover a slug from a directory entry name.
    ///
    /// Returns `None` for anything that is not `<valid slug>.md`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(PAGE_EXTENSION)?;
        Self::parse(stem).ok()
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.0, PAGE_EXTENSION)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use crate::models::slug::Slug;

/// A page as loaded from the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub slug: Slug,
    pub body: String,
}

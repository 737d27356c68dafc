use std::fmt;

use serde::Serialize;

/// Identifier of a book in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(pub u32);

impl BookId {
    /// First id handed out by an empty catalog
    pub const FIRST: Self = Self(100);
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalogued book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Catalog identifier
    pub id: BookId,
    /// Title as entered
    pub title: String,
    /// Author as entered
    pub author: String,
    /// Free-text category
    pub category: String,
    /// Whether a member currently holds the book
    pub issued: bool,
}

impl Book {
    /// Create a book that is not yet issued
    #[must_use]
    pub fn new(id: BookId, title: &str, author: &str, category: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            issued: false,
        }
    }

    /// Whether the book can be handed to a member right now
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.issued
    }

    /// Record that the book has left the shelf
    pub fn mark_issued(&mut self) {
        self.issued = true;
    }

    /// Record that the book is back on the shelf
    pub fn mark_returned(&mut self) {
        self.issued = false;
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} by {} ({}) Issued:{}",
            self.id, self.title, self.author, self.category, self.issued
        )
    }
}

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::book::BookId;

/// Identifier of a library member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl MemberId {
    /// First id handed out by an empty catalog
    pub const FIRST: Self = Self(200);
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local part, `@`, a single domain label, a dot and a TLD of two or more letters
#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+\-]+@[A-Za-z0-9_\-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

/// Check an address against the simple email shape accepted for members
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Catalog identifier
    pub id: MemberId,
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
    /// Books currently on loan, in the order they were issued
    pub issued_books: Vec<BookId>,
}

impl Member {
    /// Create a member with no loans
    #[must_use]
    pub fn new(id: MemberId, name: &str, email: &str) -> Self {
        Self { id, name: name.to_string(), email: email.to_string(), issued_books: Vec::new() }
    }

    /// Whether the member currently holds `book_id`
    #[must_use]
    pub fn holds(&self, book_id: BookId) -> bool {
        self.issued_books.contains(&book_id)
    }

    /// Append a loan
    pub fn add_issued_book(&mut self, book_id: BookId) {
        self.issued_books.push(book_id);
    }

    /// Drop the first loan of `book_id`, returning whether one was found
    pub fn return_issued_book(&mut self, book_id: BookId) -> bool {
        match self.issued_books.iter().position(|id| *id == book_id) {
            Some(pos) => {
                self.issued_books.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issued: Vec<String> = self.issued_books.iter().map(ToString::to_string).collect();
        write!(f, "[{}] {} <{}> Issued:[{}]", self.id, self.name, self.email, issued.join(", "))
    }
}

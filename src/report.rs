use std::fmt;

use serde::Serialize;

use crate::{book::Book, catalog::Catalog, error::Result, member::Member};

/// Render every book, member and category, the way the "show all" menu item does
#[must_use]
pub fn listing(catalog: &Catalog) -> String {
    let mut out = String::from("Books:\n");
    if catalog.book_count() == 0 {
        out.push_str("No books.\n");
    }
    for book in catalog.books() {
        out.push_str(&format!("{book}\n"));
    }

    out.push_str("\nMembers:\n");
    if catalog.member_count() == 0 {
        out.push_str("No members.\n");
    }
    for member in catalog.members() {
        out.push_str(&format!("{member}\n"));
    }

    let categories: Vec<&str> = catalog.categories().collect();
    out.push_str(&format!("\nCategories: [{}]\n", categories.join(", ")));
    out
}

/// Generate a markdown table of books
#[must_use]
pub fn books_table(books: &[&Book]) -> String {
    if books.is_empty() {
        return "No books.".to_string();
    }

    let mut table = String::from("| ID | Title | Author | Category | Issued |\n");
    table.push_str("|----|-------|--------|----------|--------|\n");
    for book in books {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            book.id,
            cell(&book.title),
            cell(&book.author),
            cell(&book.category),
            if book.issued { "yes" } else { "no" }
        ));
    }
    table
}

/// Escape a pipe so it does not split a markdown cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Headline numbers for a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Books in the catalog
    pub books: usize,
    /// Books currently on loan
    pub issued: usize,
    /// Registered members
    pub members: usize,
    /// Distinct categories
    pub categories: usize,
    /// Queued requests across all wait-lists
    pub waiting: usize,
}

impl Summary {
    /// Count everything in `catalog`
    #[must_use]
    pub fn of(catalog: &Catalog) -> Self {
        Self {
            books: catalog.book_count(),
            issued: catalog.books().filter(|b| b.issued).count(),
            members: catalog.member_count(),
            categories: catalog.categories().count(),
            waiting: catalog.waiting_count(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Library Summary ===")?;
        writeln!(f, "Books: {} ({} issued)", self.books, self.issued)?;
        writeln!(f, "Members: {}", self.members)?;
        writeln!(f, "Categories: {}", self.categories)?;
        write!(f, "Waiting requests: {}", self.waiting)
    }
}

/// Serializable view of a catalog
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    /// Books in catalog order
    books: Vec<&'a Book>,
    /// Members in catalog order
    members: Vec<&'a Member>,
    /// Distinct categories
    categories: Vec<&'a str>,
}

/// Pretty-printed JSON of every book, member and category
///
/// # Errors
///
/// Returns `LibraryError::Json` if serialization fails.
pub fn json_snapshot(catalog: &Catalog) -> Result<String> {
    let snapshot = Snapshot {
        books: catalog.books().collect(),
        members: catalog.members().collect(),
        categories: catalog.categories().collect(),
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::{book::BookId, circulation::CirculationDesk, member::MemberId};

    /// One issued book, one shelved book, one member
    fn setup_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_book("Dune", "Herbert", "Fiction").expect("valid book");
        catalog.add_book("Either|Or", "Kierkegaard", "Philosophy").expect("valid book");
        catalog.add_member("Alice", "alice@x.com").expect("valid member");
        CirculationDesk::new().issue(&mut catalog, BookId(100), MemberId(200)).expect("issue");
        catalog
    }

    #[test]
    fn test_listing_of_empty_catalog() {
        let text = listing(&Catalog::new());
        assert_eq!(text, "Books:\nNo books.\n\nMembers:\nNo members.\n\nCategories: []\n");
    }

    #[test]
    fn test_listing_shows_records() {
        let text = listing(&setup_catalog());
        assert!(text.contains("[100] Dune by Herbert (Fiction) Issued:true"));
        assert!(text.contains("[200] Alice <alice@x.com> Issued:[100]"));
        assert!(text.contains("Categories: [Fiction, Philosophy]"));
    }

    #[test]
    fn test_books_table_escapes_pipes() {
        let catalog = setup_catalog();
        let books: Vec<&Book> = catalog.books().collect();
        let table = books_table(&books);
        assert!(table.starts_with("| ID | Title |"));
        assert!(table.contains("| 100 | Dune | Herbert | Fiction | yes |"));
        assert!(table.contains("| 101 | Either\\|Or | Kierkegaard | Philosophy | no |"));
        assert_eq!(books_table(&[]), "No books.");
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::of(&setup_catalog());
        assert_eq!(
            summary,
            Summary { books: 2, issued: 1, members: 1, categories: 2, waiting: 0 }
        );
        assert!(summary.to_string().contains("Books: 2 (1 issued)"));
    }

    #[test]
    fn test_json_snapshot() {
        let json = json_snapshot(&setup_catalog()).expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["books"][0]["id"], 100);
        assert_eq!(value["books"][0]["issued"], true);
        assert_eq!(value["members"][0]["issued_books"][0], 100);
        assert_eq!(value["categories"][1], "Philosophy");
    }
}

//! Read-only search and ordering over the books of a [`Catalog`].

use std::{fmt, str::FromStr};

use crate::{book::Book, catalog::Catalog, error::LibraryError};

/// Text field of a book used for searching and sorting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookField {
    /// Match or order by title
    #[default]
    Title,
    /// Match or order by author
    Author,
    /// Match or order by category
    Category,
}

impl BookField {
    /// Map a numbered menu choice (1 = title, 2 = author, 3 = category)
    #[must_use]
    pub fn from_menu_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::Title),
            2 => Some(Self::Author),
            3 => Some(Self::Category),
            _ => None,
        }
    }

    /// The field's text on `book`
    #[must_use]
    pub fn value(self, book: &Book) -> &str {
        match self {
            Self::Title => &book.title,
            Self::Author => &book.author,
            Self::Category => &book.category,
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Category => "category",
        };
        f.write_str(name)
    }
}

impl FromStr for BookField {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "title" => Ok(Self::Title),
            "2" | "author" => Ok(Self::Author),
            "3" | "category" => Ok(Self::Category),
            other => Err(LibraryError::validation("field", format!("unknown book field {other:?}"))),
        }
    }
}

/// Books whose `field` contains `term`, ignoring case, in catalog order
///
/// No match yields an empty list.
#[must_use]
pub fn search<'a>(catalog: &'a Catalog, field: BookField, term: &str) -> Vec<&'a Book> {
    let needle = term.to_lowercase();
    catalog.books().filter(|book| field.value(book).to_lowercase().contains(&needle)).collect()
}

/// Every book ordered by `field`, ignoring case
///
/// The sort is stable, so books with equal keys keep their catalog order.
#[must_use]
pub fn sort_by(catalog: &Catalog, field: BookField) -> Vec<&Book> {
    let mut books: Vec<&Book> = catalog.books().collect();
    books.sort_by_cached_key(|book| field.value(book).to_lowercase());
    books
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::book::BookId;

    /// Catalog with a handful of books in a known insertion order
    fn setup_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for (title, author, category) in [
            ("dune", "Herbert", "Fiction"),
            ("Cosmos", "Sagan", "Science"),
            ("Brief History of Time", "hawking", "science"),
            ("Children of Dune", "Herbert", "Fiction"),
            ("Anathem", "Stephenson", "Fiction"),
        ] {
            catalog.add_book(title, author, category).expect("valid book");
        }
        catalog
    }

    /// Ids of `books`, in order
    fn ids(books: &[&Book]) -> Vec<u32> {
        books.iter().map(|b| b.id.0).collect()
    }

    #[test]
    fn test_search_ignores_case() {
        let catalog = setup_catalog();
        let found = search(&catalog, BookField::Title, "DUNE");
        assert_eq!(ids(&found), vec![100, 103]);

        let found = search(&catalog, BookField::Author, "herb");
        assert_eq!(ids(&found), vec![100, 103]);

        let found = search(&catalog, BookField::Category, "SCI");
        assert_eq!(ids(&found), vec![101, 102]);
    }

    #[test]
    fn test_search_only_looks_at_chosen_field() {
        let catalog = setup_catalog();
        assert!(search(&catalog, BookField::Author, "dune").is_empty());
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let catalog = setup_catalog();
        assert!(search(&catalog, BookField::Title, "zzz").is_empty());
        assert!(search(&Catalog::new(), BookField::Category, "any").is_empty());
    }

    #[test]
    fn test_sort_by_title() {
        let catalog = setup_catalog();
        let sorted = sort_by(&catalog, BookField::Title);
        assert_eq!(ids(&sorted), vec![104, 102, 103, 101, 100]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let catalog = setup_catalog();
        let by_author = sort_by(&catalog, BookField::Author);
        // Both Herbert books keep insertion order
        assert_eq!(ids(&by_author), vec![102, 100, 103, 101, 104]);

        let by_category = sort_by(&catalog, BookField::Category);
        assert_eq!(ids(&by_category), vec![100, 103, 104, 101, 102]);
        assert_eq!(by_category.first().map(|b| b.id), Some(BookId(100)));
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!(BookField::from_menu_choice(2), Some(BookField::Author));
        assert_eq!(BookField::from_menu_choice(4), None);
        assert_eq!("Category".parse::<BookField>().ok(), Some(BookField::Category));
        assert_eq!("1".parse::<BookField>().ok(), Some(BookField::Title));
        assert!("isbn".parse::<BookField>().is_err());
        assert_eq!(BookField::default().to_string(), "title");
    }
}

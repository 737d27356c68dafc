use std::fmt;

use tracing::{info, warn};

use crate::{
    book::{Book, BookId},
    catalog::Catalog,
    circulation::CirculationDesk,
    config::LibraryConfig,
    error::{LibraryError, Result},
    events::{IssueOutcome, ReturnOutcome},
    member::{Member, MemberId},
    persistence::{FileStore, LoadReport},
    query::{self, BookField},
};

/// The value of a mutating operation together with how its write-through save went
///
/// The in-memory change is applied whether or not the save succeeded. A
/// failed save leaves disk behind memory until the next successful save.
#[derive(Debug)]
pub struct Persisted<T> {
    /// What the operation produced
    pub value: T,
    /// Why the save after the operation failed, if it did
    pub save_error: Option<LibraryError>,
}

impl<T> Persisted<T> {
    /// Whether disk matches memory after the operation
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// A library: catalog, circulation desk and backing files
///
/// Every operation that changes a record saves the whole catalog before it
/// returns.
#[derive(Debug)]
pub struct Library {
    /// Books, members, categories and wait-lists
    catalog: Catalog,
    /// Issue and return logic
    desk: CirculationDesk,
    /// Backing files
    store: FileStore,
    /// Set when the last save failed
    unsaved_changes: bool,
}

impl Library {
    /// Load the library described by `config`, logging every circulation event
    ///
    /// # Errors
    ///
    /// Returns whatever [`FileStore::load`] returns under the configured policy.
    pub fn open(config: &LibraryConfig) -> Result<(Self, LoadReport)> {
        let store = FileStore::from_config(config);
        let (catalog, report) = store.load()?;
        info!(
            books = report.books_loaded,
            members = report.members_loaded,
            skipped = report.skipped.len(),
            "library opened"
        );
        Ok((Self::from_parts(catalog, CirculationDesk::with_event_logger(), store), report))
    }

    /// Assemble a library from already built parts
    #[must_use]
    pub fn from_parts(catalog: Catalog, desk: CirculationDesk, store: FileStore) -> Self {
        Self { catalog, desk, store, unsaved_changes: false }
    }

    /// Read access to the catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Backing files
    #[must_use]
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Whether memory holds changes the last save failed to write
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    /// Add a book and save
    ///
    /// # Errors
    ///
    /// See [`Catalog::add_book`]; nothing is saved when it fails.
    pub fn add_book(&mut self, title: &str, author: &str, category: &str) -> Result<Persisted<Book>> {
        let book = self.catalog.add_book(title, author, category)?;
        Ok(self.persist(book))
    }

    /// Register a member and save
    ///
    /// # Errors
    ///
    /// See [`Catalog::add_member`]; nothing is saved when it fails.
    pub fn add_member(&mut self, name: &str, email: &str) -> Result<Persisted<Member>> {
        let member = self.catalog.add_member(name, email)?;
        Ok(self.persist(member))
    }

    /// Issue a book, saving when a loan was made
    ///
    /// Wait-lists are kept in memory only, so queueing a member does not save.
    ///
    /// # Errors
    ///
    /// See [`CirculationDesk::issue`].
    pub fn issue(&mut self, book_id: BookId, member_id: MemberId) -> Result<Persisted<IssueOutcome>> {
        let outcome = self.desk.issue(&mut self.catalog, book_id, member_id)?;
        match outcome {
            IssueOutcome::Issued => Ok(self.persist(outcome)),
            IssueOutcome::Waitlisted { .. } | IssueOutcome::AlreadyWaiting { .. } => {
                Ok(Persisted { value: outcome, save_error: None })
            }
        }
    }

    /// Return a book, promoting the next waiting member, and save
    ///
    /// # Errors
    ///
    /// See [`CirculationDesk::return_book`].
    pub fn return_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<Persisted<ReturnOutcome>> {
        let outcome = self.desk.return_book(&mut self.catalog, book_id, member_id)?;
        Ok(self.persist(outcome))
    }

    /// Books whose `field` contains `term`, ignoring case
    #[must_use]
    pub fn search(&self, field: BookField, term: &str) -> Vec<&Book> {
        query::search(&self.catalog, field, term)
    }

    /// Every book ordered by `field`, ignoring case
    #[must_use]
    pub fn sort_by(&self, field: BookField) -> Vec<&Book> {
        query::sort_by(&self.catalog, field)
    }

    /// Save the whole catalog now
    ///
    /// # Errors
    ///
    /// Returns the I/O failure; the library then reports unsaved changes.
    pub fn save(&mut self) -> Result<()> {
        let result = self.store.save(&self.catalog);
        self.unsaved_changes = result.is_err();
        result
    }

    /// Save after a mutation, keeping the mutation even if the save fails
    fn persist<T>(&mut self, value: T) -> Persisted<T> {
        let save_error = self.save().err();
        if let Some(error) = &save_error {
            warn!(%error, "save failed, in-memory changes are not on disk");
        }
        Persisted { value, save_error }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} books, {} members, {} categories",
            self.catalog.book_count(),
            self.catalog.member_count(),
            self.catalog.categories().count()
        )
    }
}

#[cfg(test)]
mod tests;

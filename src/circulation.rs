use std::fmt;

use crate::{
    book::BookId,
    catalog::Catalog,
    error::{LibraryError, Result},
    events::{CirculationEvent, IssueOutcome, ReturnOutcome},
    member::MemberId,
    observers::{CirculationObserver, EventLogger},
};

/// Issue and return logic over a [`Catalog`]
///
/// Each book is either available or issued to one member. Asking for an issued
/// book puts the requester on that book's FIFO wait-list, and returning it hands
/// it straight to the head of that list within the same call.
///
/// The desk keeps no catalog state; it only holds the observers notified after
/// each change.
pub struct CirculationDesk {
    /// Registered event observers
    observers: Vec<Box<dyn CirculationObserver>>,
}

impl fmt::Debug for CirculationDesk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CirculationDesk").field("observers_count", &self.observers.len()).finish()
    }
}

impl Default for CirculationDesk {
    fn default() -> Self {
        Self::new()
    }
}

impl CirculationDesk {
    /// Create a desk with no observers
    #[must_use]
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    /// Create a desk that logs every event through `tracing`
    #[must_use]
    pub fn with_event_logger() -> Self {
        let mut desk = Self::new();
        desk.register_observer(Box::new(EventLogger));
        desk
    }

    /// Register an observer to be notified of circulation events
    pub fn register_observer(&mut self, observer: Box<dyn CirculationObserver>) {
        self.observers.push(observer);
    }

    /// Lend `book_id` to `member_id`, or queue the member if it is on loan
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if either id does not resolve. The
    /// catalog is unchanged in that case.
    pub fn issue(
        &self,
        catalog: &mut Catalog,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<IssueOutcome> {
        let available = catalog.book(book_id).ok_or_else(|| book_not_found(book_id))?.is_available();
        if catalog.member(member_id).is_none() {
            return Err(member_not_found(member_id));
        }

        if available {
            lend(catalog, book_id, member_id);
            self.notify(&CirculationEvent::Issued { book: book_id, member: member_id });
            return Ok(IssueOutcome::Issued);
        }

        let queue = catalog.waitlist_mut(book_id);
        if let Some(index) = queue.iter().position(|waiting| *waiting == member_id) {
            let position = index.saturating_add(1);
            self.notify(&CirculationEvent::AlreadyWaiting {
                book: book_id,
                member: member_id,
                position,
            });
            return Ok(IssueOutcome::AlreadyWaiting { position });
        }

        queue.push_back(member_id);
        let position = queue.len();
        self.notify(&CirculationEvent::Waitlisted { book: book_id, member: member_id, position });
        Ok(IssueOutcome::Waitlisted { position })
    }

    /// Take `book_id` back from `member_id` and promote the next waiting member
    ///
    /// Only the head of the wait-list is consulted. If it no longer resolves to
    /// a member it is discarded and the book stays on the shelf.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if either id does not resolve, or
    /// `LibraryError::NotIssuedByMember` if the member does not hold the book.
    /// The catalog is unchanged in both cases.
    pub fn return_book(
        &self,
        catalog: &mut Catalog,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<ReturnOutcome> {
        if catalog.book(book_id).is_none() {
            return Err(book_not_found(book_id));
        }
        let member = catalog.member_mut(member_id).ok_or_else(|| member_not_found(member_id))?;
        if !member.return_issued_book(book_id) {
            return Err(LibraryError::NotIssuedByMember { book_id: book_id.0, member_id: member_id.0 });
        }
        if let Some(book) = catalog.book_mut(book_id) {
            book.mark_returned();
        }
        self.notify(&CirculationEvent::Returned { book: book_id, member: member_id });

        let Some(next) = catalog.pop_waiting(book_id) else {
            return Ok(ReturnOutcome::Returned);
        };

        if catalog.member(next).is_none() {
            self.notify(&CirculationEvent::PromotionDropped { book: book_id, member: next });
            return Ok(ReturnOutcome::PromotionDropped { member: next });
        }

        lend(catalog, book_id, next);
        self.notify(&CirculationEvent::AutoIssued { book: book_id, member: next });
        Ok(ReturnOutcome::AutoIssued { to: next })
    }

    /// Notify every observer
    fn notify(&self, event: &CirculationEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

/// Mark the book issued and record the loan on the member; both ids must resolve
fn lend(catalog: &mut Catalog, book_id: BookId, member_id: MemberId) {
    if let Some(book) = catalog.book_mut(book_id) {
        book.mark_issued();
    }
    if let Some(member) = catalog.member_mut(member_id) {
        member.add_issued_book(book_id);
    }
}

/// Error for an unresolved book id
fn book_not_found(id: BookId) -> LibraryError {
    LibraryError::NotFound { entity: "Book", id: id.0 }
}

/// Error for an unresolved member id
fn member_not_found(id: MemberId) -> LibraryError {
    LibraryError::NotFound { entity: "Member", id: id.0 }
}

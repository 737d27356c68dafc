
use crate::{book::BookId, member::MemberId};

/// Something that happened at the circulation desk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CirculationEvent {
    /// An available book was lent to a member
    Issued {
        /// Book lent
        book: BookId,
        /// Borrower
        member: MemberId,
    },
    /// A member joined the wait-list of an issued book
    Waitlisted {
        /// Book waited for
        book: BookId,
        /// Member queued
        member: MemberId,
        /// 1-based position in the queue
        position: usize,
    },
    /// A member asked for a book they are already queued for
    AlreadyWaiting {
        /// Book waited for
        book: BookId,
        /// Member already queued
        member: MemberId,
        /// 1-based position in the queue
        position: usize,
    },
    /// A member handed a book back
    Returned {
        /// Book returned
        book: BookId,
        /// Former borrower
        member: MemberId,
    },
    /// A returned book went straight to the head of its wait-list
    AutoIssued {
        /// Book lent
        book: BookId,
        /// New borrower
        member: MemberId,
    },
    /// The head of a wait-list no longer resolved and was discarded
    PromotionDropped {
        /// Book waited for
        book: BookId,
        /// Unresolved member id
        member: MemberId,
    },
}

/// Result of asking to issue a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The book was available and is now on loan to the member
    Issued,
    /// The book was on loan; the member was queued at this 1-based position
    Waitlisted {
        /// Position in the queue
        position: usize,
    },
    /// The member was already queued; nothing changed
    AlreadyWaiting {
        /// Existing position in the queue
        position: usize,
    },
}

/// Result of returning a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// The book is back on the shelf
    Returned,
    /// The book went straight to the next waiting member
    AutoIssued {
        /// New borrower
        to: MemberId,
    },
    /// The next waiting member no longer exists; the book is on the shelf
    PromotionDropped {
        /// Discarded wait-list entry
        member: MemberId,
    },
}

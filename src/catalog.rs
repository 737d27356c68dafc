use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    fmt,
};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    book::{Book, BookId},
    codec::ESCAPE_TOKEN,
    error::{LibraryError, Result},
    member::{Member, MemberId, is_valid_email},
};

/// A mismatch between book issued flags and member loan lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanDiscrepancy {
    /// The book is flagged issued but no member lists it
    IssuedWithoutHolder(BookId),
    /// A member lists the book but it is flagged available
    HeldButAvailable {
        /// The book in question
        book: BookId,
        /// The member listing it
        holder: MemberId,
    },
    /// More than one member lists the same book
    MultipleHolders {
        /// The book in question
        book: BookId,
        /// Every member listing it
        holders: Vec<MemberId>,
    },
    /// A member lists a book id the catalog does not know
    UnknownBook {
        /// The member listing it
        holder: MemberId,
        /// The unresolved id
        book: BookId,
    },
}

impl fmt::Display for LoanDiscrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IssuedWithoutHolder(book) => {
                write!(f, "book {book} is marked issued but no member holds it")
            }
            Self::HeldButAvailable { book, holder } => {
                write!(f, "member {holder} holds book {book} which is marked available")
            }
            Self::MultipleHolders { book, holders } => {
                let ids: Vec<String> = holders.iter().map(ToString::to_string).collect();
                write!(f, "book {book} is held by several members: {}", ids.join(", "))
            }
            Self::UnknownBook { holder, book } => {
                write!(f, "member {holder} holds unknown book {book}")
            }
        }
    }
}

/// Owner of every book, member, category and wait-list
///
/// Records live in insertion-ordered maps addressed by id. Nothing outside the
/// catalog keeps a reference to a record beyond a single call.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Books keyed by id, in insertion order
    books: IndexMap<BookId, Book>,
    /// Members keyed by id, in insertion order
    members: IndexMap<MemberId, Member>,
    /// Every category ever seen on a book
    categories: BTreeSet<String>,
    /// Members queued for each issued book, head first
    waitlists: HashMap<BookId, VecDeque<MemberId>>,
    /// Id the next added book receives
    next_book_id: BookId,
    /// Id the next added member receives
    next_member_id: MemberId,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            books: IndexMap::new(),
            members: IndexMap::new(),
            categories: BTreeSet::new(),
            waitlists: HashMap::new(),
            next_book_id: BookId::FIRST,
            next_member_id: MemberId::FIRST,
        }
    }

    /// Add a book under the next free id
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if any field is blank, spans lines or
    /// holds the delimiter escape token, or `LibraryError::IdSpaceExhausted`
    /// if no further ids can be assigned.
    pub fn add_book(&mut self, title: &str, author: &str, category: &str) -> Result<Book> {
        require("title", title)?;
        require("author", author)?;
        require("category", category)?;

        let id = self.next_book_id;
        self.next_book_id = successor_book(id)?;

        let book = Book::new(id, title, author, category);
        self.categories.insert(book.category.clone());
        self.books.insert(id, book.clone());
        debug!(book = %id, "added book");
        Ok(book)
    }

    /// Register a member under the next free id
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the name or email is blank, spans
    /// lines or holds the delimiter escape token, or the email is malformed.
    /// Returns `LibraryError::IdSpaceExhausted` if no further ids can be
    /// assigned.
    pub fn add_member(&mut self, name: &str, email: &str) -> Result<Member> {
        require("name", name)?;
        require("email", email)?;
        if !is_valid_email(email) {
            return Err(LibraryError::validation("email", format!("{email:?} is not a valid address")));
        }

        let id = self.next_member_id;
        self.next_member_id = successor_member(id)?;

        let member = Member::new(id, name, email);
        self.members.insert(id, member.clone());
        debug!(member = %id, "added member");
        Ok(member)
    }

    /// Look up a book
    #[must_use]
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    /// Look up a member
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// Mutable access for the circulation desk
    pub(crate) fn book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.get_mut(&id)
    }

    /// Mutable access for the circulation desk
    pub(crate) fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.get_mut(&id)
    }

    /// All books in insertion order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// All members in insertion order
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Every category seen so far; callers must not rely on the order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Number of books
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Number of members
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Id the next added book will receive
    #[must_use]
    pub fn next_book_id(&self) -> BookId {
        self.next_book_id
    }

    /// Id the next added member will receive
    #[must_use]
    pub fn next_member_id(&self) -> MemberId {
        self.next_member_id
    }

    /// Members waiting for `book_id`, head of the queue first
    #[must_use]
    pub fn waitlist(&self, book_id: BookId) -> Vec<MemberId> {
        self.waitlists.get(&book_id).map(|q| q.iter().copied().collect()).unwrap_or_default()
    }

    /// Total number of queued requests across all books
    #[must_use]
    pub fn waiting_count(&self) -> usize {
        self.waitlists.values().map(VecDeque::len).sum()
    }

    /// Queue for `book_id`, created on first use
    pub(crate) fn waitlist_mut(&mut self, book_id: BookId) -> &mut VecDeque<MemberId> {
        self.waitlists.entry(book_id).or_default()
    }

    /// Take the head of the queue for `book_id`, if any
    pub(crate) fn pop_waiting(&mut self, book_id: BookId) -> Option<MemberId> {
        let queue = self.waitlists.get_mut(&book_id)?;
        let head = queue.pop_front();
        if queue.is_empty() {
            self.waitlists.remove(&book_id);
        }
        head
    }

    /// Insert a book read from disk, keeping its id
    ///
    /// The id counter moves past the loaded id so later additions never
    /// collide with it. A record with an id already present replaces it.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::IdSpaceExhausted` if the loaded id is the largest
    /// representable one.
    pub fn insert_book(&mut self, book: Book) -> Result<()> {
        let after = successor_book(book.id)?;
        self.next_book_id = self.next_book_id.max(after);
        self.categories.insert(book.category.clone());
        if let Some(previous) = self.books.insert(book.id, book) {
            warn!(book = %previous.id, "duplicate book id, keeping the later record");
        }
        Ok(())
    }

    /// Insert a member read from disk, keeping its id
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::IdSpaceExhausted` if the loaded id is the largest
    /// representable one.
    pub fn insert_member(&mut self, member: Member) -> Result<()> {
        let after = successor_member(member.id)?;
        self.next_member_id = self.next_member_id.max(after);
        if let Some(previous) = self.members.insert(member.id, member) {
            warn!(member = %previous.id, "duplicate member id, keeping the later record");
        }
        Ok(())
    }

    /// Cross-check issued flags against member loan lists
    #[must_use]
    pub fn loan_discrepancies(&self) -> Vec<LoanDiscrepancy> {
        let mut holders: IndexMap<BookId, Vec<MemberId>> = IndexMap::new();
        let mut found = Vec::new();

        for member in self.members.values() {
            for book_id in &member.issued_books {
                if self.books.contains_key(book_id) {
                    holders.entry(*book_id).or_default().push(member.id);
                } else {
                    found.push(LoanDiscrepancy::UnknownBook { holder: member.id, book: *book_id });
                }
            }
        }

        for book in self.books.values() {
            match (book.issued, holders.get(&book.id).map(Vec::as_slice)) {
                (true, None | Some([])) => {
                    found.push(LoanDiscrepancy::IssuedWithoutHolder(book.id));
                }
                (false, Some([holder, ..])) => {
                    found.push(LoanDiscrepancy::HeldButAvailable { book: book.id, holder: *holder });
                }
                (_, Some(all @ [_, _, ..])) => {
                    found.push(LoanDiscrepancy::MultipleHolders {
                        book: book.id,
                        holders: all.to_vec(),
                    });
                }
                _ => {}
            }
        }

        found
    }
}

/// Reject blank text and text that would not survive a save and reload
fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::validation(field, "cannot be empty"));
    }
    if value.contains(['\n', '\r']) {
        return Err(LibraryError::validation(field, "cannot contain line breaks"));
    }
    if value.contains(ESCAPE_TOKEN) {
        return Err(LibraryError::validation(field, format!("cannot contain {ESCAPE_TOKEN:?}")));
    }
    Ok(())
}

/// Id following `id`
fn successor_book(id: BookId) -> Result<BookId> {
    id.0.checked_add(1).map(BookId).ok_or(LibraryError::IdSpaceExhausted { entity: "book" })
}

/// Id following `id`
fn successor_member(id: MemberId) -> Result<MemberId> {
    id.0.checked_add(1).map(MemberId).ok_or(LibraryError::IdSpaceExhausted { entity: "member" })
}

//! Book circulation for a small library.
//!
//! This crate keeps a catalog of books and members, lends books out, queues
//! members for books that are already on loan and hands a returned book
//! straight to the next member in line. The catalog is written through to two
//! pipe-delimited text files after every change.

pub mod book;
pub mod catalog;
pub mod circulation;
pub mod codec;
pub mod config;
pub mod console;
pub mod error;
pub mod events;
pub mod logging;
pub mod member;
pub mod observers;
pub mod persistence;
pub mod query;
pub mod report;
pub mod system;

pub use book::{Book, BookId};
pub use catalog::Catalog;
pub use circulation::CirculationDesk;
pub use config::{LibraryConfig, LoadPolicy};
pub use error::{LibraryError, Result};
pub use events::{CirculationEvent, IssueOutcome, ReturnOutcome};
pub use member::{Member, MemberId};
pub use persistence::{FileStore, LoadReport};
pub use query::BookField;
pub use system::Library;

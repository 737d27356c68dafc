use std::path::PathBuf;

use thiserror::Error;

/// Failures returned by catalog, circulation and persistence operations
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A required field was empty or malformed
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// No record with the given id exists
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// The id that did not resolve
        id: u32,
    },

    /// A return was attempted for a book the member does not hold
    #[error("Member {member_id} did not issue book {book_id}")]
    NotIssuedByMember {
        /// Book the member tried to return
        book_id: u32,
        /// Member that tried to return it
        member_id: u32,
    },

    /// The id counter for a record kind cannot advance any further
    #[error("No identifiers left for new {entity} records")]
    IdSpaceExhausted {
        /// Kind of record whose counter overflowed
        entity: &'static str,
    },

    /// A line of a backing file could not be decoded
    #[error("{}:{line}: {source}", .file.display())]
    Decode {
        /// File the line was read from
        file: PathBuf,
        /// 1-based line number
        line: usize,
        /// Why decoding failed
        #[source]
        source: DecodeError,
    },

    /// Reading or writing a backing file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Rendering a JSON snapshot failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LibraryError {
    /// Shorthand for a [`LibraryError::Validation`]
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    /// Shorthand for a [`LibraryError::Io`]
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Why a single persisted line could not be turned back into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line split into an unexpected number of fields
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Number of fields the record needs
        expected: usize,
        /// Number of fields present
        found: usize,
    },

    /// The record id was not a number
    #[error("invalid record id {0:?}")]
    InvalidId(String),

    /// One of the comma-separated issued book ids was not a number
    #[error("invalid issued book id {0:?}")]
    InvalidIssuedBookId(String),

    /// The record id is the largest representable one, leaving none to assign
    #[error("record id {0} leaves no room for new ids")]
    IdOutOfRange(u32),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LibraryError>;

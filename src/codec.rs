//! Line codec for the `books.txt` and `members.txt` backing files.
//!
//! Each record is one line of fields joined by `|`. Any literal `|` inside a
//! text field is written as `&#124;` and restored on decode.

use crate::{
    book::{Book, BookId},
    error::DecodeError,
    member::{Member, MemberId},
};

/// Field separator
pub const DELIMITER: char = '|';

/// On-disk stand-in for a literal delimiter inside a text field
pub const ESCAPE_TOKEN: &str = "&#124;";

/// Number of fields in a book line
const BOOK_FIELDS: usize = 5;

/// Minimum number of fields in a member line; the issued list may be omitted
const MEMBER_MIN_FIELDS: usize = 3;

/// Replace delimiters in a text field with the escape token
#[must_use]
pub fn escape(field: &str) -> String {
    field.replace(DELIMITER, ESCAPE_TOKEN)
}

/// Restore delimiters in a text field read from disk
#[must_use]
pub fn unescape(field: &str) -> String {
    field.replace(ESCAPE_TOKEN, "|")
}

/// Encode a book as `id|title|author|category|issued`
#[must_use]
pub fn encode_book(book: &Book) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        book.id,
        escape(&book.title),
        escape(&book.author),
        escape(&book.category),
        book.issued
    )
}

/// Decode a line produced by [`encode_book`]
///
/// The issued flag is `true` only for a case-insensitive `true`; any other
/// value reads as not issued.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the line does not have exactly five fields or
/// the id is not a number.
pub fn decode_book(line: &str) -> Result<Book, DecodeError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let [id, title, author, category, issued] = fields.as_slice() else {
        return Err(DecodeError::FieldCount { expected: BOOK_FIELDS, found: fields.len() });
    };

    Ok(Book {
        id: BookId(parse_id(id)?),
        title: unescape(title),
        author: unescape(author),
        category: unescape(category),
        issued: issued.eq_ignore_ascii_case("true"),
    })
}

/// Encode a member as `id|name|email|issued-ids`, ids joined by commas
#[must_use]
pub fn encode_member(member: &Member) -> String {
    let issued: Vec<String> = member.issued_books.iter().map(ToString::to_string).collect();
    format!("{}|{}|{}|{}", member.id, escape(&member.name), escape(&member.email), issued.join(","))
}

/// Decode a line produced by [`encode_member`]
///
/// The line is split into at most four fields, so a missing or empty issued
/// list decodes to a member with no loans.
///
/// # Errors
///
/// Returns a [`DecodeError`] if fewer than three fields are present, the id is
/// not a number, or an issued book id is not a number.
pub fn decode_member(line: &str) -> Result<Member, DecodeError> {
    let fields: Vec<&str> = line.splitn(4, DELIMITER).collect();
    let (id, name, email, issued) = match fields.as_slice() {
        [id, name, email] => (id, name, email, ""),
        [id, name, email, issued] => (id, name, email, *issued),
        _ => {
            return Err(DecodeError::FieldCount {
                expected: MEMBER_MIN_FIELDS,
                found: fields.len(),
            });
        }
    };

    let mut member = Member::new(MemberId(parse_id(id)?), &unescape(name), &unescape(email));
    for raw in issued.split(',').filter(|s| !s.is_empty()) {
        let book_id =
            raw.parse().map_err(|_| DecodeError::InvalidIssuedBookId(raw.to_string()))?;
        member.add_issued_book(BookId(book_id));
    }

    Ok(member)
}

/// Parse the leading id field of a record
fn parse_id(raw: &str) -> Result<u32, DecodeError> {
    raw.parse().map_err(|_| DecodeError::InvalidId(raw.to_string()))
}

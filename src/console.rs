//! Numbered menu loop for a single operator.
//!
//! The console owns no library state: it reads a choice, collects trimmed
//! arguments, calls the matching [`Library`] operation and prints the result.
//! Input and output are generic so the loop can be driven by a script.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::{
    book::{Book, BookId},
    events::{IssueOutcome, ReturnOutcome},
    member::MemberId,
    query::BookField,
    report,
    system::{Library, Persisted},
};

/// Menu entries, in display order
const MENU: [&str; 8] = [
    "1. Add Book",
    "2. Add Member",
    "3. Issue Book",
    "4. Return Book",
    "5. Search Books",
    "6. Sort Books",
    "7. Show All Books / Members",
    "8. Exit",
];

/// Interactive front end over a [`Library`]
#[derive(Debug)]
pub struct Console<R, W> {
    /// Operator input, one answer per line
    input: R,
    /// Prompts and results
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console reading from `input` and writing to `output`
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output sink
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until the operator exits or input ends
    ///
    /// Either way the catalog is saved once more before returning.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    /// Library failures are printed and the loop continues.
    pub fn run(&mut self, library: &mut Library) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{}", "=== City Library Digital Management System ===".green().bold())?;
            for entry in MENU {
                writeln!(self.output, "{entry}")?;
            }

            let Some(line) = self.prompt("Enter choice: ")? else {
                return self.exit(library);
            };
            if line.is_empty() {
                continue;
            }

            match line.parse::<u32>() {
                Ok(1) => self.add_book(library)?,
                Ok(2) => self.add_member(library)?,
                Ok(3) => self.issue_book(library)?,
                Ok(4) => self.return_book(library)?,
                Ok(5) => self.search_books(library)?,
                Ok(6) => self.sort_books(library)?,
                Ok(7) => self.show_all(library)?,
                Ok(8) => return self.exit(library),
                _ => self.error("Invalid choice.")?,
            }
        }
    }

    /// Save and say goodbye
    fn exit(&mut self, library: &mut Library) -> io::Result<()> {
        match library.save() {
            Ok(()) => writeln!(self.output, "{}", "Saved. Exiting.".green()),
            Err(e) => self.error(&format!("Could not save before exiting: {e}")),
        }
    }

    /// Menu item 1
    fn add_book(&mut self, library: &mut Library) -> io::Result<()> {
        let Some(title) = self.prompt("Enter Book Title: ")? else { return Ok(()) };
        let Some(author) = self.prompt("Enter Author: ")? else { return Ok(()) };
        let Some(category) = self.prompt("Enter Category: ")? else { return Ok(()) };

        match library.add_book(&title, &author, &category) {
            Ok(added) => {
                writeln!(self.output, "Book added with ID: {}", added.value.id)?;
                self.save_warning(&added)
            }
            Err(e) => self.error(&format!("Error adding book: {e}")),
        }
    }

    /// Menu item 2
    fn add_member(&mut self, library: &mut Library) -> io::Result<()> {
        let Some(name) = self.prompt("Enter Member Name: ")? else { return Ok(()) };
        let Some(email) = self.prompt("Enter Email: ")? else { return Ok(()) };

        match library.add_member(&name, &email) {
            Ok(added) => {
                writeln!(self.output, "Member added with ID: {}", added.value.id)?;
                self.save_warning(&added)
            }
            Err(e) => self.error(&format!("Error adding member: {e}")),
        }
    }

    /// Menu item 3
    fn issue_book(&mut self, library: &mut Library) -> io::Result<()> {
        let Some((book_id, member_id)) = self.loan_ids()? else { return Ok(()) };

        match library.issue(book_id, member_id) {
            Ok(issued) => {
                match issued.value {
                    IssueOutcome::Issued => writeln!(self.output, "Book issued to member.")?,
                    IssueOutcome::Waitlisted { position } => {
                        writeln!(self.output, "Book is already issued. Adding to waiting list.")?;
                        writeln!(self.output, "Added to wait list position: {position}")?;
                    }
                    IssueOutcome::AlreadyWaiting { .. } => {
                        writeln!(self.output, "Book is already issued. Adding to waiting list.")?;
                        writeln!(self.output, "Already in wait list.")?;
                    }
                }
                self.save_warning(&issued)
            }
            Err(e) => self.error(&e.to_string()),
        }
    }

    /// Menu item 4
    fn return_book(&mut self, library: &mut Library) -> io::Result<()> {
        let Some((book_id, member_id)) = self.loan_ids()? else { return Ok(()) };

        match library.return_book(book_id, member_id) {
            Ok(returned) => {
                match returned.value {
                    ReturnOutcome::Returned => {}
                    ReturnOutcome::AutoIssued { to } => {
                        writeln!(self.output, "Book auto-issued to waiting member ID: {to}")?;
                    }
                    ReturnOutcome::PromotionDropped { member } => {
                        let notice = format!("Waiting member {member} no longer exists; entry dropped.");
                        writeln!(self.output, "{}", notice.yellow())?;
                    }
                }
                writeln!(self.output, "Book returned successfully.")?;
                self.save_warning(&returned)
            }
            Err(e) => self.error(&e.to_string()),
        }
    }

    /// Menu item 5
    fn search_books(&mut self, library: &Library) -> io::Result<()> {
        let Some(field) = self.field("Search by: 1.Title 2.Author 3.Category")? else {
            return Ok(());
        };
        let Some(term) = self.prompt("Enter search term: ")? else { return Ok(()) };

        let found = library.search(field, &term);
        if found.is_empty() {
            writeln!(self.output, "No results.")
        } else {
            self.print_books(&found)
        }
    }

    /// Menu item 6
    fn sort_books(&mut self, library: &Library) -> io::Result<()> {
        let Some(field) = self.field("Sort by: 1.Title 2.Author 3.Category")? else {
            return Ok(());
        };
        let sorted = library.sort_by(field);
        self.print_books(&sorted)
    }

    /// Menu item 7
    fn show_all(&mut self, library: &Library) -> io::Result<()> {
        write!(self.output, "\n{}", report::listing(library.catalog()))
    }

    /// Ask for a book id and a member id
    fn loan_ids(&mut self) -> io::Result<Option<(BookId, MemberId)>> {
        let Some(book) = self.prompt("Enter Book ID: ")? else { return Ok(None) };
        let Ok(book_id) = book.parse() else {
            self.error("Invalid ID.")?;
            return Ok(None);
        };
        let Some(member) = self.prompt("Enter Member ID: ")? else { return Ok(None) };
        let Ok(member_id) = member.parse() else {
            self.error("Invalid ID.")?;
            return Ok(None);
        };
        Ok(Some((BookId(book_id), MemberId(member_id))))
    }

    /// Ask for a numbered book field
    fn field(&mut self, question: &str) -> io::Result<Option<BookField>> {
        writeln!(self.output, "{question}")?;
        let Some(answer) = self.prompt("")? else { return Ok(None) };
        let field = answer.parse().ok().and_then(BookField::from_menu_choice);
        if field.is_none() {
            self.error("Invalid.")?;
        }
        Ok(field)
    }

    /// One book per line
    fn print_books(&mut self, books: &[&Book]) -> io::Result<()> {
        for book in books {
            writeln!(self.output, "{book}")?;
        }
        Ok(())
    }

    /// Tell the operator when a change did not reach disk
    fn save_warning<T>(&mut self, persisted: &Persisted<T>) -> io::Result<()> {
        match &persisted.save_error {
            Some(e) => {
                let warning = format!("Warning: change kept in memory but not saved: {e}");
                writeln!(self.output, "{}", warning.yellow())
            }
            None => Ok(()),
        }
    }

    /// Print a failure message
    fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }

    /// Show `text` and read one trimmed line; `None` once input is exhausted
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

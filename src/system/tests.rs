#![allow(clippy::expect_used)]

use std::fs;

use crate::{
    book::BookId,
    catalog::Catalog,
    circulation::CirculationDesk,
    config::LibraryConfig,
    error::LibraryError,
    events::{IssueOutcome, ReturnOutcome},
    member::MemberId,
    persistence::FileStore,
    query::BookField,
    system::Library,
};

/// Empty library whose files live in a fresh temporary directory
fn setup_library() -> (tempfile::TempDir, Library) {
    let dir = tempfile::tempdir().expect("create tempdir");
    let config = LibraryConfig::builder().data_dir(dir.path()).build().expect("valid config");
    let (library, report) = Library::open(&config).expect("open succeeds");
    assert!(report.is_clean());
    (dir, library)
}

#[test]
fn test_lending_scenario() {
    let (_dir, mut library) = setup_library();

    let dune = library.add_book("Dune", "Herbert", "Fiction").expect("valid book").value;
    let alice = library.add_member("Alice", "alice@x.com").expect("valid member").value;
    let bob = library.add_member("Bob", "bob@x.com").expect("valid member").value;
    assert_eq!(dune.id, BookId(100));
    assert_eq!(alice.id, MemberId(200));
    assert_eq!(bob.id, MemberId(201));

    let issued = library.issue(dune.id, alice.id).expect("issue succeeds");
    assert_eq!(issued.value, IssueOutcome::Issued);
    assert!(issued.is_saved());
    let catalog = library.catalog();
    assert!(catalog.book(dune.id).expect("book exists").issued);
    assert_eq!(catalog.member(alice.id).expect("member exists").issued_books, vec![dune.id]);

    let queued = library.issue(dune.id, bob.id).expect("queue succeeds");
    assert_eq!(queued.value, IssueOutcome::Waitlisted { position: 1 });

    let returned = library.return_book(dune.id, alice.id).expect("return succeeds");
    assert_eq!(returned.value, ReturnOutcome::AutoIssued { to: bob.id });

    let catalog = library.catalog();
    assert!(catalog.book(dune.id).expect("book exists").issued);
    assert!(catalog.member(alice.id).expect("member exists").issued_books.is_empty());
    assert_eq!(catalog.member(bob.id).expect("member exists").issued_books, vec![dune.id]);
    assert!(catalog.waitlist(dune.id).is_empty());
}

#[test]
fn test_every_mutation_is_written_through() {
    let (dir, mut library) = setup_library();
    let books_path = dir.path().join("books.txt");
    let members_path = dir.path().join("members.txt");

    library.add_book("Dune", "Herbert", "Fiction").expect("valid book");
    assert_eq!(fs::read_to_string(&books_path).expect("books"), "100|Dune|Herbert|Fiction|false\n");

    library.add_member("Alice", "alice@x.com").expect("valid member");
    library.issue(BookId(100), MemberId(200)).expect("issue");
    assert_eq!(fs::read_to_string(&books_path).expect("books"), "100|Dune|Herbert|Fiction|true\n");
    assert_eq!(fs::read_to_string(&members_path).expect("members"), "200|Alice|alice@x.com|100\n");

    library.return_book(BookId(100), MemberId(200)).expect("return");
    assert_eq!(fs::read_to_string(&members_path).expect("members"), "200|Alice|alice@x.com|\n");
}

#[test]
fn test_reopen_restores_state_and_counters() {
    let (dir, mut library) = setup_library();
    library.add_book("Dune", "Herbert", "Fiction").expect("valid book");
    library.add_book("Emma", "Austen", "Classic").expect("valid book");
    library.add_member("Alice", "alice@x.com").expect("valid member");
    library.issue(BookId(101), MemberId(200)).expect("issue");
    drop(library);

    let config = LibraryConfig::builder().data_dir(dir.path()).build().expect("valid config");
    let (mut reopened, report) = Library::open(&config).expect("reopen succeeds");
    assert!(report.is_clean());
    assert!(reopened.catalog().book(BookId(101)).expect("book exists").issued);

    let next = reopened.add_book("Cosmos", "Sagan", "Science").expect("valid book").value;
    assert_eq!(next.id, BookId(102));
    assert_eq!(reopened.to_string(), "3 books, 1 members, 3 categories");
}

#[test]
fn test_rejected_operations_leave_files_alone() {
    let (dir, mut library) = setup_library();
    let result = library.add_book("", "Herbert", "Fiction");
    assert!(matches!(result, Err(LibraryError::Validation { .. })));
    assert!(!dir.path().join("books.txt").exists());

    let result = library.issue(BookId(100), MemberId(200));
    assert!(matches!(result, Err(LibraryError::NotFound { .. })));
}

#[test]
fn test_save_failure_keeps_change_in_memory() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file, not directory").expect("write blocker");
    let store = FileStore::new(blocker.join("books.txt"), blocker.join("members.txt"));
    let mut library = Library::from_parts(Catalog::new(), CirculationDesk::new(), store);

    let added = library.add_book("Dune", "Herbert", "Fiction").expect("validation passes");
    assert!(!added.is_saved());
    assert!(matches!(added.save_error, Some(LibraryError::Io { .. })));
    assert!(library.has_unsaved_changes());
    assert_eq!(library.catalog().book_count(), 1);
    assert!(library.save().is_err());
}

#[test]
fn test_search_and_sort_delegate_to_catalog() {
    let (_dir, mut library) = setup_library();
    library.add_book("dune", "Herbert", "Fiction").expect("valid book");
    library.add_book("Anathem", "Stephenson", "Fiction").expect("valid book");

    assert_eq!(library.search(BookField::Author, "STEPH").len(), 1);
    assert!(library.search(BookField::Title, "nothing").is_empty());
    let titles: Vec<&str> =
        library.sort_by(BookField::Title).iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Anathem", "dune"]);
}

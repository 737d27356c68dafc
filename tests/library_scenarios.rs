#![allow(clippy::expect_used)]

use std::fs;

use library_circulation::{
    BookField, BookId, IssueOutcome, Library, LibraryConfig, LoadPolicy, MemberId, ReturnOutcome,
    codec,
};

/// Open a library in `dir` with default file names
fn open(dir: &tempfile::TempDir) -> Library {
    let config = LibraryConfig::builder().data_dir(dir.path()).build().expect("valid config");
    Library::open(&config).expect("open succeeds").0
}

#[test]
fn test_dune_is_handed_from_alice_to_bob() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let mut library = open(&dir);

    let dune = library.add_book("Dune", "Herbert", "Fiction").expect("book").value.id;
    let alice = library.add_member("Alice", "alice@x.com").expect("member").value.id;
    let bob = library.add_member("Bob", "bob@x.com").expect("member").value.id;
    assert_eq!((dune, alice, bob), (BookId(100), MemberId(200), MemberId(201)));

    assert_eq!(library.issue(dune, alice).expect("issue").value, IssueOutcome::Issued);
    assert_eq!(
        library.issue(dune, bob).expect("queue").value,
        IssueOutcome::Waitlisted { position: 1 }
    );
    assert_eq!(
        library.return_book(dune, alice).expect("return").value,
        ReturnOutcome::AutoIssued { to: bob }
    );

    let catalog = library.catalog();
    assert!(catalog.book(dune).expect("book").issued);
    assert!(catalog.member(alice).expect("alice").issued_books.is_empty());
    assert_eq!(catalog.member(bob).expect("bob").issued_books, vec![dune]);
    assert!(catalog.waitlist(dune).is_empty());
}

#[test]
fn test_saved_library_reopens_identically() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let mut library = open(&dir);
    library.add_book("Pipes | Filters", "Unix|Folk", "Systems").expect("book");
    library.add_book("Dune", "Herbert", "Fiction").expect("book");
    library.add_member("Alice", "alice@x.com").expect("member");
    library.add_member("Bob", "bob@x.com").expect("member");
    library.issue(BookId(100), MemberId(201)).expect("issue");
    library.issue(BookId(101), MemberId(201)).expect("issue");
    library.save().expect("save");

    let reopened = open(&dir);
    let before = library.catalog();
    let after = reopened.catalog();
    assert_eq!(after.books().collect::<Vec<_>>(), before.books().collect::<Vec<_>>());
    assert_eq!(after.members().collect::<Vec<_>>(), before.members().collect::<Vec<_>>());
    assert_eq!(after.book(BookId(100)).expect("book").title, "Pipes | Filters");
}

#[test]
fn test_next_id_follows_largest_loaded_id() {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::write(dir.path().join("books.txt"), "150|Old|Author|Cat|false\n").expect("write");
    let mut library = open(&dir);
    assert_eq!(library.add_book("New", "Author", "Cat").expect("book").value.id, BookId(151));
}

#[test]
fn test_strict_load_rejects_corrupt_file() {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::write(dir.path().join("books.txt"), "100|Only|Three\n").expect("write");
    let config = LibraryConfig::builder()
        .data_dir(dir.path())
        .load_policy(LoadPolicy::Abort)
        .build()
        .expect("valid config");
    assert!(Library::open(&config).is_err());

    let lenient = open(&dir);
    assert_eq!(lenient.catalog().book_count(), 0);
}

#[test]
fn test_search_misses_are_empty() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let mut library = open(&dir);
    library.add_book("Dune", "Herbert", "Fiction").expect("book");
    for field in [BookField::Title, BookField::Author, BookField::Category] {
        assert!(library.search(field, "no such text").is_empty());
    }
}

#[test]
fn test_escape_is_exact_inverse_for_delimited_text() {
    for text in ["a|b", "|", "||lead and trail||", "plain", ""] {
        assert_eq!(codec::unescape(&codec::escape(text)), text);
        assert!(!codec::escape(text).contains('|'));
    }
}

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, LoanDiscrepancy},
    codec,
    config::{LibraryConfig, LoadPolicy},
    error::{DecodeError, LibraryError, Result},
};

/// A line left out of a lenient load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// File the line came from
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Why it did not decode
    pub reason: DecodeError,
}

/// What a load found besides the records themselves
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Books inserted into the catalog
    pub books_loaded: usize,
    /// Members inserted into the catalog
    pub members_loaded: usize,
    /// Malformed lines skipped under [`LoadPolicy::SkipAndWarn`]
    pub skipped: Vec<SkippedLine>,
    /// Files that existed but could not be read; their collection starts empty
    pub read_errors: Vec<LibraryError>,
    /// Loan mismatches found after loading; they are reported, not repaired
    pub discrepancies: Vec<LoanDiscrepancy>,
}

impl LoadReport {
    /// Whether the load saw nothing worth telling the operator about
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.read_errors.is_empty() && self.discrepancies.is_empty()
    }
}

/// Flat-file home of a [`Catalog`]: one books file and one members file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    /// Path of the books file
    books_path: PathBuf,
    /// Path of the members file
    members_path: PathBuf,
    /// Handling of malformed lines
    policy: LoadPolicy,
}

impl FileStore {
    /// Store backed by the two given files
    #[must_use]
    pub fn new(books_path: impl Into<PathBuf>, members_path: impl Into<PathBuf>) -> Self {
        Self {
            books_path: books_path.into(),
            members_path: members_path.into(),
            policy: LoadPolicy::default(),
        }
    }

    /// Store described by `config`
    #[must_use]
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.books_path(), config.members_path()).with_policy(config.load_policy)
    }

    /// Replace the malformed-line policy
    #[must_use]
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of the books file
    #[must_use]
    pub fn books_path(&self) -> &Path {
        &self.books_path
    }

    /// Path of the members file
    #[must_use]
    pub fn members_path(&self) -> &Path {
        &self.members_path
    }

    /// Rewrite both files from the catalog, books first
    ///
    /// Each file is written to a temporary sibling and renamed over the old
    /// one, so either file on disk is always a complete snapshot. The two
    /// renames are not one transaction: a failure on the members file leaves
    /// the new books file next to the previous members file.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Io` if a directory cannot be created or a file
    /// cannot be written or renamed.
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        write_atomically(&self.books_path, catalog.books().map(codec::encode_book))?;
        write_atomically(&self.members_path, catalog.members().map(codec::encode_member))?;
        debug!(
            books = catalog.book_count(),
            members = catalog.member_count(),
            "catalog saved"
        );
        Ok(())
    }

    /// Build a catalog from both files
    ///
    /// A missing file means an empty collection. A file that exists but cannot
    /// be read is recorded in the report and also treated as empty. Malformed
    /// lines follow the store's [`LoadPolicy`]. Id counters end up past every
    /// loaded id.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Decode` for the first malformed line under
    /// [`LoadPolicy::Abort`]. A record whose id leaves no room for new ones
    /// counts as malformed.
    pub fn load(&self) -> Result<(Catalog, LoadReport)> {
        let mut catalog = Catalog::new();
        let mut report = LoadReport::default();

        if let Some(contents) = read_optional(&self.books_path, &mut report) {
            for (line_no, line) in data_lines(&contents) {
                match codec::decode_book(line) {
                    Ok(book) => {
                        let id = book.id.0;
                        match catalog.insert_book(book) {
                            Ok(()) => {
                                report.books_loaded = report.books_loaded.saturating_add(1);
                            }
                            Err(LibraryError::IdSpaceExhausted { .. }) => {
                                let reason = DecodeError::IdOutOfRange(id);
                                self.reject(&self.books_path, line_no, reason, &mut report)?;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Err(reason) => self.reject(&self.books_path, line_no, reason, &mut report)?,
                }
            }
        }

        if let Some(contents) = read_optional(&self.members_path, &mut report) {
            for (line_no, line) in data_lines(&contents) {
                match codec::decode_member(line) {
                    Ok(member) => {
                        let id = member.id.0;
                        match catalog.insert_member(member) {
                            Ok(()) => {
                                report.members_loaded = report.members_loaded.saturating_add(1);
                            }
                            Err(LibraryError::IdSpaceExhausted { .. }) => {
                                let reason = DecodeError::IdOutOfRange(id);
                                self.reject(&self.members_path, line_no, reason, &mut report)?;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Err(reason) => self.reject(&self.members_path, line_no, reason, &mut report)?,
                }
            }
        }

        report.discrepancies = catalog.loan_discrepancies();
        for discrepancy in &report.discrepancies {
            warn!(%discrepancy, "inconsistent loan data");
        }

        debug!(books = report.books_loaded, members = report.members_loaded, "catalog loaded");
        Ok((catalog, report))
    }

    /// Apply the load policy to a line that did not decode
    fn reject(
        &self,
        file: &Path,
        line: usize,
        reason: DecodeError,
        report: &mut LoadReport,
    ) -> Result<()> {
        match self.policy {
            LoadPolicy::Abort => {
                Err(LibraryError::Decode { file: file.to_path_buf(), line, source: reason })
            }
            LoadPolicy::SkipAndWarn => {
                warn!(file = %file.display(), line, %reason, "skipping malformed line");
                report.skipped.push(SkippedLine { file: file.to_path_buf(), line, reason });
                Ok(())
            }
        }
    }
}

/// Read a whole file, treating absence as empty and recording other failures
fn read_optional(path: &Path, report: &mut LoadReport) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no backing file, starting empty");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read backing file, starting empty");
            report.read_errors.push(LibraryError::io(path, e));
            None
        }
    }
}

/// Non-blank lines of a file with their 1-based line numbers
fn data_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    (1..).zip(contents.lines()).filter(|(_, line)| !line.trim().is_empty())
}

/// Replace `path` with the given lines via a temporary file in the same directory
fn write_atomically(path: &Path, lines: impl Iterator<Item = String>) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| LibraryError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| LibraryError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(&mut file);
        for line in lines {
            writeln!(writer, "{line}").map_err(|e| LibraryError::io(path, e))?;
        }
        writer.flush().map_err(|e| LibraryError::io(path, e))?;
    }
    file.as_file().sync_all().map_err(|e| LibraryError::io(path, e))?;
    file.persist(path).map_err(|e| LibraryError::io(path, e.error))?;

    debug!(path = %path.display(), "wrote backing file");
    Ok(())
}

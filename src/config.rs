//! Where the catalog lives on disk and how strictly it is read back.
//!
//! ```
//! use library_circulation::config::{LibraryConfig, LoadPolicy};
//!
//! let config = LibraryConfig::builder()
//!     .data_dir("/var/lib/library")
//!     .load_policy(LoadPolicy::Abort)
//!     .build()
//!     .expect("valid config");
//! assert!(config.books_path().ends_with("books.txt"));
//! ```

use std::path::{Path, PathBuf};

use crate::error::{LibraryError, Result};

/// Default name of the books file
pub const DEFAULT_BOOKS_FILE: &str = "books.txt";

/// Default name of the members file
pub const DEFAULT_MEMBERS_FILE: &str = "members.txt";

/// What to do with a line that does not decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log the line number and reason, keep loading the rest of the file
    #[default]
    SkipAndWarn,
    /// Stop the load and report the first bad line
    Abort,
}

/// Storage settings for a library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Directory holding both backing files
    pub data_dir: PathBuf,
    /// File name of the books file inside `data_dir`
    pub books_file: String,
    /// File name of the members file inside `data_dir`
    pub members_file: String,
    /// Handling of malformed lines on load
    pub load_policy: LoadPolicy,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            books_file: DEFAULT_BOOKS_FILE.to_string(),
            members_file: DEFAULT_MEMBERS_FILE.to_string(),
            load_policy: LoadPolicy::default(),
        }
    }
}

impl LibraryConfig {
    /// Start building a configuration from the defaults
    #[must_use]
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::default()
    }

    /// Full path of the books file
    #[must_use]
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }

    /// Full path of the members file
    #[must_use]
    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(&self.members_file)
    }
}

/// Builder for [`LibraryConfig`]
#[derive(Debug, Clone, Default)]
pub struct LibraryConfigBuilder {
    /// Settings accumulated so far
    config: LibraryConfig,
}

impl LibraryConfigBuilder {
    /// Directory holding both backing files
    #[must_use]
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// File name of the books file
    #[must_use]
    pub fn books_file(mut self, name: impl Into<String>) -> Self {
        self.config.books_file = name.into();
        self
    }

    /// File name of the members file
    #[must_use]
    pub fn members_file(mut self, name: impl Into<String>) -> Self {
        self.config.members_file = name.into();
        self
    }

    /// Handling of malformed lines on load
    #[must_use]
    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.config.load_policy = policy;
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if either file name is blank or both
    /// names point at the same file.
    pub fn build(self) -> Result<LibraryConfig> {
        let config = self.config;
        if config.books_file.trim().is_empty() {
            return Err(LibraryError::validation("books_file", "cannot be empty"));
        }
        if config.members_file.trim().is_empty() {
            return Err(LibraryError::validation("members_file", "cannot be empty"));
        }
        if config.books_file == config.members_file {
            return Err(LibraryError::validation(
                "members_file",
                "must differ from the books file",
            ));
        }
        Ok(config)
    }
}

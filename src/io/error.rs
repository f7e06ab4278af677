//! Error type for reading fragments and templates and writing assembled models.
//!
//! Filesystem failures and malformed records share one enum so the assembly layer can wrap
//! them without caring which format produced them.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or writing structure files.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper around operating-system level I/O failures.
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        /// File involved in the failed operation, if any.
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// An input line could not be parsed into the expected record.
    #[error(
        "failed to parse {format} {path_desc}: {details} (line {line_number})",
        path_desc = PathDisplay(path)
    )]
    Parse {
        /// Name of the textual format (e.g., `"PDB"`).
        format: &'static str,
        path: Option<PathBuf>,
        /// One-based line number where parsing failed.
        line_number: usize,
        details: String,
    },

    /// The fragment directory does not exist or is not a directory.
    #[error("input directory '{}' does not exist", path.display())]
    MissingDirectory { path: PathBuf },
}

impl Error {
    /// Constructs an [`Error::Io`] variant from a standard I/O error.
    ///
    /// # Arguments
    ///
    /// * `source` - The original `std::io::Error`.
    /// * `path` - Optional file path associated with the operation.
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    /// Builds a [`Error::Parse`] variant with consistent messaging.
    ///
    /// # Arguments
    ///
    /// * `format` - Name of the textual format being parsed.
    /// * `path` - Optional path pointing to the input file.
    /// * `line_number` - Line where the failure occurred (1-indexed).
    /// * `details` - Additional context about the parsing problem.
    pub fn parse(
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path,
            line_number,
            details: details.into(),
        }
    }

    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }

    /// Attaches `path` to errors raised on an anonymous stream.
    pub fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Io { path: None, source } => Self::Io {
                path: Some(path.to_path_buf()),
                source,
            },
            Self::Parse {
                format,
                path: None,
                line_number,
                details,
            } => Self::Parse {
                format,
                path: Some(path.to_path_buf()),
                line_number,
                details,
            },
            other => other,
        }
    }
}

/// Prints `file '<path>'` when a path is known, `stream source` otherwise.
struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}

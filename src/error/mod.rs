//! Error handling and diagnostics for the Lua lexer
//!
//! Malformed source never produces an error here: it becomes an error token
//! in the token stream. The errors in this module are failures of the
//! library itself, such as unreadable input or a lookup with a token that
//! did not come from the lexer being asked.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for lexer operations
pub type LexResult<T> = Result<T, LexError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Optional filename
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, filename: Option<String>) -> Self {
        Self { line, filename }
    }

    /// Create a source location without a filename
    pub fn at(line: usize) -> Self {
        Self::new(line, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}", filename, self.line)
        } else {
            write!(f, "line {}", self.line)
        }
    }
}

/// Main error type for the lexer library
#[derive(Debug, Error)]
pub enum LexError {
    /// The source could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A table lookup used an index the table never handed out
    #[error("index {index} is out of range for the {table} table ({len} entries)")]
    IndexOutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },

    /// The token was not produced by this lexer
    #[error("unknown token at line {line}")]
    UnknownToken { line: usize },
}

impl LexError {
    /// Create a new I/O error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::Io { .. } => "I/O Error",
            Self::IndexOutOfRange { .. } => "Lookup Error",
            Self::UnknownToken { .. } => "Token Error",
        }
    }
}

//! # luaflex
//!
//! A lexical analyzer for Lua 5.1 source code:
//! - Scans keywords, operators, delimiters, numbers, strings and identifiers
//! - Interns every distinct literal and identifier with a stable index
//! - Turns malformed input into error tokens and keeps scanning
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//! - `lexer`: Character stream, intern tables and the scanner
//! - `report`: Token listings, error lists and summaries
//! - `error`: Error handling and diagnostics

pub mod error;
pub mod lexer;
pub mod report;

use std::path::Path;

// Re-export commonly used types
pub use error::{Diagnostic, LexError, LexResult, SourceLocation};
pub use lexer::{Lexer, Token, TokenCategory, TokenInfo, TokenKind};
pub use report::{CategoryFilter, Report, ReportConfig, Summary};

/// Version of luaflex
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze Lua source text and return its report
pub fn analyze(source: &str) -> LexResult<Report> {
    let mut lexer = Lexer::new(source, None);
    Report::collect(&mut lexer)
}

/// Read and analyze a Lua source file
pub fn analyze_file(path: impl AsRef<Path>) -> LexResult<Report> {
    let mut lexer = Lexer::from_path(path)?;
    Report::collect(&mut lexer)
}

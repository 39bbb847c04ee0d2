//! Analysis reports
//!
//! A report is the resolved information of every non-comment token of one
//! source, in scan order. It renders as the numbered token listing, the
//! error list and the symbol/error summary.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use colored::Colorize;

use crate::error::LexResult;
use crate::lexer::{Delimiter, ErrorKind, Keyword, Lexer, Operator, TokenCategory, TokenInfo};

/// Header line of a written report
pub const REPORT_HEADER: &str = "idx, (type_id[type_name], sym_idx): \"sym_value\", line";

/// One row of a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub info: TokenInfo,
}

impl ReportEntry {
    pub fn new(info: TokenInfo) -> Self {
        Self { info }
    }

    pub fn is_error(&self) -> bool {
        self.info.is_error()
    }

    /// Render the row numbered `idx`
    ///
    /// A missing index or value renders as `None`.
    pub fn render_line(&self, idx: usize) -> String {
        let info = &self.info;
        let index = info.index.map_or_else(|| "None".to_string(), |i| i.to_string());
        let value = info.value.as_ref().map_or_else(|| "None".to_string(), ToString::to_string);
        format!(
            "{}, ({}[{}], {}): \"{}\", {}",
            idx,
            info.type_id(),
            info.type_name,
            index,
            value,
            info.line
        )
    }

    /// Render the row for the error list; `None` for non-error rows
    pub fn render_error(&self) -> Option<String> {
        if !self.is_error() {
            return None;
        }
        let info = &self.info;
        let value = info.value.as_ref().map(ToString::to_string).unwrap_or_default();
        let index = info.index.unwrap_or_default();
        Some(format!(
            "Line[{}] : \"{}\" : error {}: {}",
            info.line, value, index, info.type_name
        ))
    }
}

/// Symbol and error counts of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Entries that are not errors
    pub symbols: usize,
    pub errors: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} symbol(s) found.", self.symbols)?;
        write!(f, "{} error(s) found.", self.errors)
    }
}

/// Selects the report rows of one token category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TokenCategory),
}

impl CategoryFilter {
    pub fn matches(&self, info: &TokenInfo) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => info.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.to_ascii_lowercase().as_str() {
            "all" => return Ok(Self::All),
            "keywords" => TokenCategory::Keywords,
            "operators" => TokenCategory::Operators,
            "delimiters" => TokenCategory::Delimiters,
            "errors" => TokenCategory::Errors,
            "constants" => TokenCategory::Constants,
            "strings" => TokenCategory::Strings,
            "identifiers" => TokenCategory::Identifiers,
            other => {
                return Err(format!(
                    "unknown category '{}' (expected one of: all, keywords, operators, \
                     delimiters, errors, constants, strings, identifiers)",
                    other
                ))
            }
        };
        Ok(Self::Only(category))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Only(TokenCategory::Keywords) => "keywords",
            Self::Only(TokenCategory::Operators) => "operators",
            Self::Only(TokenCategory::Delimiters) => "delimiters",
            Self::Only(TokenCategory::Errors) => "errors",
            Self::Only(TokenCategory::Comments) => "comments",
            Self::Only(TokenCategory::Constants) => "constants",
            Self::Only(TokenCategory::Strings) => "strings",
            Self::Only(TokenCategory::Identifiers) => "identifiers",
        };
        f.write_str(name)
    }
}

/// How a report is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub filter: CategoryFilter,
    /// Write only the error list and the summary
    pub errors_only: bool,
    /// Highlight error rows in red
    pub color: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            filter: CategoryFilter::All,
            errors_only: false,
            color: true,
        }
    }
}

/// Resolved tokens of one analysis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Run `lexer` to the end of its input, collecting every token except
    /// comments
    pub fn collect(lexer: &mut Lexer) -> LexResult<Self> {
        let mut entries = Vec::new();
        while let Some(token) = lexer.next_token() {
            if token.is_comment() {
                continue;
            }
            entries.push(ReportEntry::new(lexer.token_info(&token)?));
        }

        tracing::debug!(entries = entries.len(), "collected report");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Rows selected by `filter`, in scan order
    pub fn filtered(&self, filter: CategoryFilter) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |entry| filter.matches(&entry.info))
    }

    /// Rows selected by `filter`, numbered from 1
    pub fn lines(&self, filter: CategoryFilter) -> Vec<String> {
        self.filtered(filter)
            .enumerate()
            .map(|(i, entry)| entry.render_line(i + 1))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let errors = self.entries.iter().filter(|entry| entry.is_error()).count();
        Summary {
            symbols: self.entries.len() - errors,
            errors,
        }
    }

    /// Error list rows, in scan order
    pub fn error_lines(&self) -> Vec<String> {
        self.entries.iter().filter_map(ReportEntry::render_error).collect()
    }

    /// Write the report
    ///
    /// The full form is the header, a blank line, the numbered rows, a blank
    /// line and the summary. With `errors_only` the error list replaces the
    /// header and rows.
    pub fn write_to<W: Write>(&self, writer: &mut W, config: &ReportConfig) -> io::Result<()> {
        let paint = |line: String, error: bool| {
            if error && config.color {
                line.red().to_string()
            } else {
                line
            }
        };

        if config.errors_only {
            let errors = self.error_lines();
            for line in &errors {
                writeln!(writer, "{}", paint(line.clone(), true))?;
            }
            if !errors.is_empty() {
                writeln!(writer)?;
            }
        } else {
            writeln!(writer, "{}", REPORT_HEADER)?;
            writeln!(writer)?;
            for (i, entry) in self.filtered(config.filter).enumerate() {
                writeln!(writer, "{}", paint(entry.render_line(i + 1), entry.is_error()))?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "{}", self.summary())
    }
}

/// The reserved vocabulary: keywords, operators and delimiters with their
/// table indices
pub fn vocabulary() -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("{}:", TokenCategory::Keywords));
    for keyword in Keyword::ALL {
        lines.push(format!("  {:>2}  {}", keyword.index(), keyword));
    }
    lines.push(format!("{}:", TokenCategory::Operators));
    for operator in Operator::ALL {
        lines.push(format!("  {:>2}  {}", operator.index(), operator));
    }
    lines.push(format!("{}:", TokenCategory::Delimiters));
    for delimiter in Delimiter::ALL {
        lines.push(format!("  {:>2}  {}", delimiter.index(), delimiter));
    }
    lines.push(format!("{}:", TokenCategory::Errors));
    for kind in ErrorKind::ALL {
        lines.push(format!("  {:>2}  {}", kind.index(), kind));
    }

    lines
}

//! Diagnostic formatting for lexical error tokens
//!
//! This module renders an error token with the source lines around it and
//! marks the offending text when it can be found on the line.

use super::SourceLocation;
use crate::lexer::{ErrorKind, TokenInfo};
use colored::Colorize;

/// A lexical error ready to be displayed
pub struct Diagnostic {
    kind: ErrorKind,
    text: String,
    location: SourceLocation,
    source: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(kind: ErrorKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
            source: None,
        }
    }

    /// Build a diagnostic from resolved token information; `None` unless the
    /// token is an error token
    pub fn from_token_info(info: &TokenInfo, filename: Option<&str>) -> Option<Self> {
        let kind = info.error_kind()?;
        let text = info.value.as_ref().map(ToString::to_string).unwrap_or_default();
        let location = SourceLocation::new(info.line, filename.map(str::to_string));
        Some(Self::new(kind, text, location))
    }

    /// Attach source code for context lines
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();

        let header = format!("error[{}]", self.kind.index()).red().bold();
        output.push_str(&format!("{}: {} \"{}\"\n", header, self.kind.message(), self.text));
        output.push_str(&format!("  {} {}\n", "-->".blue().bold(), self.location));

        if let Some(ref source) = self.source {
            output.push_str(&self.format_source_context(source));
        }

        output
    }

    /// Format the source lines around the error line
    fn format_source_context(&self, source: &str) -> String {
        let mut output = String::new();
        let lines: Vec<&str> = source.lines().collect();
        let line = self.location.line;

        if line == 0 || line > lines.len() {
            return output;
        }

        let line_idx = line - 1;
        let line_num_width = (line + 1).to_string().len();

        if line_idx > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx, width = line_num_width).blue(),
                lines[line_idx - 1]
            ));
        }

        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", line, width = line_num_width).blue().bold(),
            lines[line_idx]
        ));

        // Underline the offending text if it sits on this line
        if let Some(column) = self.marker_column(lines[line_idx]) {
            let padding = " ".repeat(line_num_width + 3 + column);
            let marker = "^".repeat(self.text.chars().count().max(1));
            output.push_str(&format!("{}{}\n", padding, marker.red().bold()));
        }

        if line_idx + 1 < lines.len() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line + 1, width = line_num_width).blue(),
                lines[line_idx + 1]
            ));
        }

        output
    }

    fn marker_column(&self, line: &str) -> Option<usize> {
        if self.text.is_empty() || self.text.contains('\n') {
            return None;
        }
        let byte_offset = line.find(&self.text)?;
        Some(line[..byte_offset].chars().count())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

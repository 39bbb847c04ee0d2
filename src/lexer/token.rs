//! Token definitions for Lua 5.1 lexical analysis
//!
//! This module defines the fixed vocabulary (keywords, operators and
//! delimiters), the token record handed out by the lexer and the resolved
//! token information used by reports.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A token produced by the lexer
///
/// The kind carries the index into whichever table backs it, so a token is
/// a small `Copy` value that stays valid for the lifetime of its lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Line of the token's first character (1-based)
    pub line: usize,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self { kind, line }
    }

    /// Comments are handed to the caller but never recorded by the lexer
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment)
    }

    /// Index into the backing table, if the kind has one
    pub fn index(&self) -> Option<usize> {
        self.kind.index()
    }

    /// Category reported for this token
    pub fn category(&self) -> TokenCategory {
        self.kind.category()
    }
}

/// Token kinds
///
/// Fixed-vocabulary kinds carry their enum directly; interned kinds carry
/// the index into the lexer's table of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Operator(Operator),
    Delimiter(Delimiter),
    Comment,
    NumericConstant(usize),
    StringLiteral(usize),
    Identifier(usize),
    ErrorDescriptor(usize),
}

impl TokenKind {
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Keyword(keyword) => Some(keyword.index()),
            Self::Operator(operator) => Some(operator.index()),
            Self::Delimiter(delimiter) => Some(delimiter.index()),
            Self::Comment => None,
            Self::NumericConstant(index)
            | Self::StringLiteral(index)
            | Self::Identifier(index)
            | Self::ErrorDescriptor(index) => Some(*index),
        }
    }

    pub fn category(&self) -> TokenCategory {
        match self {
            Self::Keyword(_) => TokenCategory::Keywords,
            Self::Operator(_) => TokenCategory::Operators,
            Self::Delimiter(_) => TokenCategory::Delimiters,
            Self::Comment => TokenCategory::Comments,
            Self::NumericConstant(_) => TokenCategory::Constants,
            Self::StringLiteral(_) => TokenCategory::Strings,
            Self::Identifier(_) => TokenCategory::Identifiers,
            Self::ErrorDescriptor(_) => TokenCategory::Errors,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(kw) => write!(f, "keyword '{}'", kw),
            Self::Operator(op) => write!(f, "operator '{}'", op),
            Self::Delimiter(delim) => write!(f, "delimiter '{}'", delim),
            Self::Comment => write!(f, "comment"),
            Self::NumericConstant(index) => write!(f, "constant #{}", index),
            Self::StringLiteral(index) => write!(f, "string #{}", index),
            Self::Identifier(index) => write!(f, "identifier #{}", index),
            Self::ErrorDescriptor(index) => write!(f, "error #{}", index),
        }
    }
}

/// Report categories, numbered the way analysis reports number them
///
/// Error tokens are reported under `Errors`, with the error kind ordinal as
/// their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Keywords = 0,
    Operators = 1,
    Delimiters = 2,
    Errors = 3,
    Comments = 4,
    Constants = 5,
    Strings = 6,
    Identifiers = 7,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 8] = [
        Self::Keywords,
        Self::Operators,
        Self::Delimiters,
        Self::Errors,
        Self::Comments,
        Self::Constants,
        Self::Strings,
        Self::Identifiers,
    ];

    /// Numeric type id used in reports
    pub fn id(self) -> usize {
        self as usize
    }

    /// Name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Self::Keywords => "KEYWORDS",
            Self::Operators => "OPS",
            Self::Delimiters => "DELIMITERS",
            Self::Errors => "MSGS",
            Self::Comments => "COMMENTS",
            Self::Constants => "consts",
            Self::Strings => "strings",
            Self::Identifiers => "symbols",
        }
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True if `type_id` is the report id of error tokens
pub fn is_error_kind(type_id: usize) -> bool {
    type_id == TokenCategory::Errors.id()
}

/// Lua 5.1 reserved words, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    And,
    Break,
    Do,
    Else,
    Elseif,
    End,
    False,
    For,
    Function,
    If,
    In,
    Local,
    Nil,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    True,
    Until,
    While,
}

impl Keyword {
    pub const ALL: [Keyword; 21] = [
        Self::And,
        Self::Break,
        Self::Do,
        Self::Else,
        Self::Elseif,
        Self::End,
        Self::False,
        Self::For,
        Self::Function,
        Self::If,
        Self::In,
        Self::Local,
        Self::Nil,
        Self::Not,
        Self::Or,
        Self::Repeat,
        Self::Return,
        Self::Then,
        Self::True,
        Self::Until,
        Self::While,
    ];

    /// Get keyword from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "and" => Some(Self::And),
            "break" => Some(Self::Break),
            "do" => Some(Self::Do),
            "else" => Some(Self::Else),
            "elseif" => Some(Self::Elseif),
            "end" => Some(Self::End),
            "false" => Some(Self::False),
            "for" => Some(Self::For),
            "function" => Some(Self::Function),
            "if" => Some(Self::If),
            "in" => Some(Self::In),
            "local" => Some(Self::Local),
            "nil" => Some(Self::Nil),
            "not" => Some(Self::Not),
            "or" => Some(Self::Or),
            "repeat" => Some(Self::Repeat),
            "return" => Some(Self::Return),
            "then" => Some(Self::Then),
            "true" => Some(Self::True),
            "until" => Some(Self::Until),
            "while" => Some(Self::While),
            _ => None,
        }
    }

    /// Get string representation of keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Break => "break",
            Self::Do => "do",
            Self::Else => "else",
            Self::Elseif => "elseif",
            Self::End => "end",
            Self::False => "false",
            Self::For => "for",
            Self::Function => "function",
            Self::If => "if",
            Self::In => "in",
            Self::Local => "local",
            Self::Nil => "nil",
            Self::Not => "not",
            Self::Or => "or",
            Self::Repeat => "repeat",
            Self::Return => "return",
            Self::Then => "then",
            Self::True => "true",
            Self::Until => "until",
            Self::While => "while",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operators, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Caret,        // ^
    Percent,      // %
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    Equal,        // ==
    NotEqual,     // ~=
    Hash,         // #
    Assign,       // =
    Ellipsis,     // ...
    Concat,       // ..
}

impl Operator {
    pub const ALL: [Operator; 16] = [
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Caret,
        Self::Percent,
        Self::Less,
        Self::LessEqual,
        Self::Greater,
        Self::GreaterEqual,
        Self::Equal,
        Self::NotEqual,
        Self::Hash,
        Self::Assign,
        Self::Ellipsis,
        Self::Concat,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    /// Single-character operator starting with `c`
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Star),
            '/' => Some(Self::Slash),
            '^' => Some(Self::Caret),
            '%' => Some(Self::Percent),
            '<' => Some(Self::Less),
            '>' => Some(Self::Greater),
            '#' => Some(Self::Hash),
            '=' => Some(Self::Assign),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Caret => "^",
            Self::Percent => "%",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "~=",
            Self::Hash => "#",
            Self::Assign => "=",
            Self::Ellipsis => "...",
            Self::Concat => "..",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delimiters, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,
    Semicolon,    // ;
    Colon,        // :
    Dot,          // .
}

impl Delimiter {
    pub const ALL: [Delimiter; 10] = [
        Self::LeftParen,
        Self::RightParen,
        Self::LeftBracket,
        Self::RightBracket,
        Self::LeftBrace,
        Self::RightBrace,
        Self::Comma,
        Self::Semicolon,
        Self::Colon,
        Self::Dot,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '(' => Some(Self::LeftParen),
            ')' => Some(Self::RightParen),
            '[' => Some(Self::LeftBracket),
            ']' => Some(Self::RightBracket),
            '{' => Some(Self::LeftBrace),
            '}' => Some(Self::RightBrace),
            ',' => Some(Self::Comma),
            ';' => Some(Self::Semicolon),
            ':' => Some(Self::Colon),
            '.' => Some(Self::Dot),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::LeftParen => '(',
            Self::RightParen => ')',
            Self::LeftBracket => '[',
            Self::RightBracket => ']',
            Self::LeftBrace => '{',
            Self::RightBrace => '}',
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Colon => ':',
            Self::Dot => '.',
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Lexical error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedNumber,
    UnexpectedSymbol,
    UnfinishedLineString,
    UnfinishedBlockComment,
    UnfinishedBlockString,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        Self::MalformedNumber,
        Self::UnexpectedSymbol,
        Self::UnfinishedLineString,
        Self::UnfinishedBlockComment,
        Self::UnfinishedBlockString,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            Self::MalformedNumber => "Malformed number",
            Self::UnexpectedSymbol => "Unexpected symbol",
            Self::UnfinishedLineString => "Unfinished line string",
            Self::UnfinishedBlockComment => "Unfinished block comment",
            Self::UnfinishedBlockString => "Unfinished block string",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One distinct lexical error: the offending text and what was wrong with it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorDescriptor {
    pub text: String,
    pub kind: ErrorKind,
}

impl ErrorDescriptor {
    pub fn new(text: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// A numeric constant as stored in the constants table
///
/// Compares by numeric value, so `0.0` and `-0.0` share a slot and the
/// first inserted representation is kept.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub f64);

impl Constant {
    pub fn value(&self) -> f64 {
        self.0
    }

    fn key_bits(&self) -> u64 {
        if self.0 == 0.0 {
            0
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits() == other.key_bits()
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.0))
    }
}

/// Formats a number the way analysis reports print floats: always with a
/// fractional part or exponent, scientific notation outside `1e-4..1e16`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Value of a resolved token
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => f.write_str(&format_number(*value)),
        }
    }
}

/// Everything a report needs to know about one token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub category: TokenCategory,
    /// Category name, or the error message for error tokens
    pub type_name: &'static str,
    /// Table index, or the error kind ordinal for error tokens
    pub index: Option<usize>,
    pub value: Option<SymbolValue>,
    pub line: usize,
}

impl TokenInfo {
    pub fn type_id(&self) -> usize {
        self.category.id()
    }

    pub fn is_error(&self) -> bool {
        is_error_kind(self.type_id())
    }

    /// Error kind of an error token
    pub fn error_kind(&self) -> Option<ErrorKind> {
        if self.is_error() {
            self.index.and_then(ErrorKind::from_index)
        } else {
            None
        }
    }
}

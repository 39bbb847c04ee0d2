//! Lexical analysis module
//!
//! This module handles tokenization of Lua 5.1 source code.

pub mod intern;
pub mod number;
pub mod scanner;
pub mod stream;
pub mod token;

pub use intern::InternTable;
pub use scanner::Lexer;
pub use stream::{CharacterStream, Encoding};
pub use token::{
    format_number, is_error_kind, Constant, Delimiter, ErrorDescriptor, ErrorKind, Keyword,
    Operator, SymbolValue, Token, TokenCategory, TokenInfo, TokenKind,
};

//! Lexer/Scanner implementation for Lua 5.1
//!
//! This module implements lexical analysis, converting source code into
//! tokens. Scanning never fails: malformed input turns into error tokens and
//! scanning resumes right after them.

use std::path::Path;

use rustc_hash::FxHashSet;

use super::intern::InternTable;
use super::number::{self, NumberLiteral};
use super::stream::{CharacterStream, Encoding};
use super::token::{
    self, Constant, Delimiter, ErrorDescriptor, ErrorKind, Keyword, Operator, SymbolValue, Token,
    TokenInfo, TokenKind,
};
use crate::error::{LexError, LexResult};

/// Offending text recorded for long brackets that run into end of input
const EOF_MARKER: &str = "<EOF>";

/// Lexer for Lua source code
///
/// The lexer owns its character stream and four intern tables. Every token
/// it hands out except comments is also kept in an ordered log, which is
/// what [`Lexer::token_info`] checks tokens against.
#[derive(Debug)]
pub struct Lexer {
    stream: CharacterStream,
    line: usize,
    constants: InternTable<Constant>,
    strings: InternTable<String>,
    identifiers: InternTable<String>,
    errors: InternTable<ErrorDescriptor>,
    tokens: Vec<Token>,
    recorded: FxHashSet<Token>,
    filename: Option<String>,
}

impl Lexer {
    /// Create a new lexer over source text
    pub fn new(source: &str, filename: Option<&str>) -> Self {
        Self::from_bytes(source.as_bytes(), filename)
    }

    /// Create a lexer over a raw buffer, detecting its encoding signature
    pub fn from_bytes(bytes: impl AsRef<[u8]>, filename: Option<&str>) -> Self {
        Self {
            stream: CharacterStream::new(bytes.as_ref()),
            line: 1,
            constants: InternTable::new("constants"),
            strings: InternTable::new("strings"),
            identifiers: InternTable::new("identifiers"),
            errors: InternTable::new("errors"),
            tokens: Vec::new(),
            recorded: FxHashSet::default(),
            filename: filename.map(|s| s.to_string()),
        }
    }

    /// Read a whole file and create a lexer over it
    ///
    /// The file is closed before this returns. An empty file is valid input.
    pub fn from_path(path: impl AsRef<Path>) -> LexResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| LexError::io(path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read source file");
        Ok(Self::from_bytes(bytes, Some(&path.display().to_string())))
    }

    /// Scan the remaining input, returning every token except comments
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.by_ref().filter(|token| !token.is_comment()).collect()
    }

    /// Scan the next token, or return `None` at end of input
    pub fn next_token(&mut self) -> Option<Token> {
        let c = self.skip_to_token()?;
        let line = self.line;

        let kind = if c.is_ascii_alphabetic() || c == '_' {
            self.scan_identifier(c)
        } else if c.is_ascii_digit() || c == '.' {
            self.stream.push_back(1);
            self.scan_number()
        } else {
            match c {
                '\'' | '"' => self.scan_line_string(c),
                '-' => self.scan_minus(),
                '[' => self.scan_open_bracket(),
                '~' => self.scan_tilde(),
                _ => {
                    if let Some(delimiter) = Delimiter::from_char(c) {
                        TokenKind::Delimiter(delimiter)
                    } else if let Some(operator) = Operator::from_char(c) {
                        self.scan_operator(operator)
                    } else {
                        self.error_token(ErrorKind::UnexpectedSymbol, c.to_string())
                    }
                }
            }
        };

        let token = Token::new(kind, line);
        if !token.is_comment() {
            self.tokens.push(token);
            self.recorded.insert(token);
        }
        tracing::trace!(line, kind = %token.kind, "scanned token");

        Some(token)
    }

    /// Resolve a token into its category, index, value and line
    pub fn token_info(&self, token: &Token) -> LexResult<TokenInfo> {
        if !token.is_comment() && !self.recorded.contains(token) {
            return Err(LexError::UnknownToken { line: token.line });
        }

        let category = token.category();
        let line = token.line;
        let name = category.name();
        let text = |value: &str| Some(SymbolValue::Text(value.to_string()));

        let (type_name, index, value) = match token.kind {
            TokenKind::Keyword(keyword) => (name, Some(keyword.index()), text(keyword.as_str())),
            TokenKind::Operator(operator) => {
                (name, Some(operator.index()), text(operator.as_str()))
            }
            TokenKind::Delimiter(delimiter) => (
                name,
                Some(delimiter.index()),
                Some(SymbolValue::Text(delimiter.as_char().to_string())),
            ),
            TokenKind::Comment => (name, None, None),
            TokenKind::NumericConstant(index) => {
                let constant = self.constants.get(index)?;
                (name, Some(index), Some(SymbolValue::Number(constant.value())))
            }
            TokenKind::StringLiteral(index) => {
                (name, Some(index), text(self.strings.get(index)?.as_str()))
            }
            TokenKind::Identifier(index) => {
                (name, Some(index), text(self.identifiers.get(index)?.as_str()))
            }
            TokenKind::ErrorDescriptor(index) => {
                let descriptor = self.errors.get(index)?;
                (
                    descriptor.kind.message(),
                    Some(descriptor.kind.index()),
                    text(descriptor.text.as_str()),
                )
            }
        };

        Ok(TokenInfo {
            category,
            type_name,
            index,
            value,
            line,
        })
    }

    /// True for the transient comment tokens
    pub fn is_comment(token: &Token) -> bool {
        token.is_comment()
    }

    /// True if `type_id` is the report id of error tokens
    pub fn is_error_kind(type_id: usize) -> bool {
        token::is_error_kind(type_id)
    }

    /// Tokens recorded so far, in scan order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Current line number
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn encoding(&self) -> Encoding {
        self.stream.encoding()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The decoded source text
    pub fn source_text(&self) -> String {
        self.stream.text()
    }

    pub fn constants(&self) -> &InternTable<Constant> {
        &self.constants
    }

    pub fn strings(&self) -> &InternTable<String> {
        &self.strings
    }

    pub fn identifiers(&self) -> &InternTable<String> {
        &self.identifiers
    }

    pub fn errors(&self) -> &InternTable<ErrorDescriptor> {
        &self.errors
    }

    /// Skip characters that cannot start a token, counting newlines
    fn skip_to_token(&mut self) -> Option<char> {
        loop {
            let c = self.stream.next_char()?;
            if c.is_ascii_alphanumeric() || c.is_ascii_punctuation() {
                return Some(c);
            }
            if c == '\n' {
                self.line += 1;
            }
        }
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut lexeme = String::from(first);
        while let Some(c) = self.stream.next_if(|c| c.is_ascii_alphanumeric() || c == '_') {
            lexeme.push(c);
        }

        match Keyword::from_str(&lexeme) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(self.identifiers.insert(lexeme)),
        }
    }

    /// Scan a number, or `.`, `..` and `...` which share its first character
    fn scan_number(&mut self) -> TokenKind {
        let text = number::scan(&mut self.stream);
        if text != "." {
            return self.number_token(&text);
        }

        if !self.stream.next_if_eq('.') {
            TokenKind::Delimiter(Delimiter::Dot)
        } else if self.stream.next_if_eq('.') {
            TokenKind::Operator(Operator::Ellipsis)
        } else {
            TokenKind::Operator(Operator::Concat)
        }
    }

    fn number_token(&mut self, text: &str) -> TokenKind {
        match number::convert(text) {
            NumberLiteral::Value(value) => {
                TokenKind::NumericConstant(self.constants.insert(Constant(value)))
            }
            NumberLiteral::Malformed(raw) => self.error_token(ErrorKind::MalformedNumber, raw),
        }
    }

    /// Scan a quoted string up to its closing quote on the same line
    ///
    /// A backslash keeps the character after it verbatim. Escapes are not
    /// interpreted.
    fn scan_line_string(&mut self, quote: char) -> TokenKind {
        let mut text = String::new();

        loop {
            match self.stream.next_char() {
                Some(c) if c == quote => {
                    return TokenKind::StringLiteral(self.strings.insert(text));
                }
                Some('\n') | None => {
                    // Leave the newline for the next token to count
                    self.stream.push_back(1);
                    return self.error_token(ErrorKind::UnfinishedLineString, text);
                }
                Some('\\') => {
                    text.push('\\');
                    match self.stream.next_char() {
                        Some(escaped) => {
                            if escaped == '\n' {
                                self.line += 1;
                            }
                            text.push(escaped);
                        }
                        None => self.stream.push_back(1),
                    }
                }
                Some(c) => text.push(c),
            }
        }
    }

    /// Scan what follows a `-`: a comment, a negative number or the operator
    fn scan_minus(&mut self) -> TokenKind {
        match self.stream.next_char() {
            Some('-') => self.scan_comment(),
            Some(c) if c.is_ascii_digit() => {
                self.stream.push_back(2);
                let text = number::scan_decimal(&mut self.stream);
                self.number_token(&text)
            }
            _ => {
                self.stream.push_back(1);
                TokenKind::Operator(Operator::Minus)
            }
        }
    }

    /// Scan a comment after its leading `--`
    fn scan_comment(&mut self) -> TokenKind {
        if self.stream.next_if_eq('[') {
            if let Some(level) = self.long_bracket_level() {
                return match self.scan_long_bracket(level) {
                    Some(_) => TokenKind::Comment,
                    None => self.error_token(ErrorKind::UnfinishedBlockComment, EOF_MARKER),
                };
            }
        }

        // Line comment; the newline is left for the next token to count
        while self.stream.next_if(|c| c != '\n').is_some() {}
        TokenKind::Comment
    }

    /// Scan a block string, or fall back to the `[` delimiter
    fn scan_open_bracket(&mut self) -> TokenKind {
        let Some(level) = self.long_bracket_level() else {
            return TokenKind::Delimiter(Delimiter::LeftBracket);
        };

        // A newline right after the opening bracket is not part of the string
        if self.stream.next_if_eq('\n') {
            self.line += 1;
        }

        match self.scan_long_bracket(level) {
            Some(body) => TokenKind::StringLiteral(self.strings.insert(body)),
            None => self.error_token(ErrorKind::UnfinishedBlockString, EOF_MARKER),
        }
    }

    /// After a `[`, match `=`* followed by a second `[` and return the number
    /// of `=`. On a mismatch nothing past the first `[` is consumed.
    fn long_bracket_level(&mut self) -> Option<usize> {
        let mut level = 0;
        while self.stream.next_if_eq('=') {
            level += 1;
        }

        if self.stream.next_if_eq('[') {
            Some(level)
        } else {
            self.stream.push_back(level);
            None
        }
    }

    /// Consume a long bracket body up to `]`, exactly `level` `=`, `]`.
    /// Returns `None` if input ends first.
    fn scan_long_bracket(&mut self, level: usize) -> Option<String> {
        let mut body = String::new();

        loop {
            match self.stream.next_char()? {
                ']' => {
                    let mut equals = 0;
                    while self.stream.next_if_eq('=') {
                        equals += 1;
                    }
                    if equals == level && self.stream.next_if_eq(']') {
                        return Some(body);
                    }
                    // Not the closing bracket; whatever follows is rescanned
                    body.push(']');
                    body.extend(std::iter::repeat('=').take(equals));
                }
                '\n' => {
                    self.line += 1;
                    body.push('\n');
                }
                c => body.push(c),
            }
        }
    }

    /// `~` is only valid as the first half of `~=`
    fn scan_tilde(&mut self) -> TokenKind {
        if self.stream.next_if_eq('=') {
            TokenKind::Operator(Operator::NotEqual)
        } else {
            self.error_token(ErrorKind::UnexpectedSymbol, "~")
        }
    }

    /// Prefer the two-character operator starting with `first`
    fn scan_operator(&mut self, first: Operator) -> TokenKind {
        if let Some(c) = self.stream.next_char() {
            let pair = format!("{}{}", first.as_str(), c);
            if let Some(operator) = Operator::from_str(&pair) {
                return TokenKind::Operator(operator);
            }
        }
        self.stream.push_back(1);
        TokenKind::Operator(first)
    }

    /// Record a lexical error and return its token kind
    fn error_token(&mut self, kind: ErrorKind, text: impl Into<String>) -> TokenKind {
        let descriptor = ErrorDescriptor::new(text, kind);
        tracing::debug!(line = self.line, %kind, text = %descriptor.text, "lexical error");
        TokenKind::ErrorDescriptor(self.errors.insert(descriptor))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenCategory;
    use pretty_assertions::assert_eq;

    fn new_lexer(source: &str) -> Lexer {
        Lexer::new(source, None)
    }

    /// Tokens of `source` resolved to (category, value text, line)
    fn resolve(source: &str) -> Vec<(TokenCategory, String, usize)> {
        let mut lexer = new_lexer(source);
        let tokens = lexer.tokenize();
        tokens
            .iter()
            .map(|token| {
                let info = lexer.token_info(token).unwrap();
                let value = info.value.map(|v| v.to_string()).unwrap_or_default();
                (info.category, value, info.line)
            })
            .collect()
    }

    fn values(source: &str) -> Vec<String> {
        resolve(source).into_iter().map(|(_, value, _)| value).collect()
    }

    fn error(lexer: &Lexer, token: &Token) -> ErrorDescriptor {
        match token.kind {
            TokenKind::ErrorDescriptor(index) => lexer.errors().get(index).unwrap().clone(),
            other => panic!("expected an error token, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_source() {
        let mut lexer = new_lexer("");
        assert_eq!(lexer.next_token(), None);
        assert!(lexer.tokens().is_empty());

        let mut blank = new_lexer(" \t\n\r\n ");
        assert_eq!(blank.next_token(), None);
        assert_eq!(blank.line(), 3);
    }

    #[test]
    fn test_assignment() {
        let mut lexer = new_lexer("x = 1");
        let tokens = lexer.tokenize();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Identifier(0), 1),
                Token::new(TokenKind::Operator(Operator::Assign), 1),
                Token::new(TokenKind::NumericConstant(0), 1),
            ]
        );
        assert_eq!(lexer.identifiers().get(0).unwrap(), "x");
        assert_eq!(lexer.constants().get(0).unwrap().value(), 1.0);
    }

    #[test]
    fn test_line_comment_is_transient() {
        let mut lexer = new_lexer("-- c\ny=2");
        let comment = lexer.next_token().unwrap();
        assert_eq!(comment, Token::new(TokenKind::Comment, 1));
        assert!(Lexer::is_comment(&comment));

        let rest: Vec<Token> = lexer.by_ref().collect();
        assert_eq!(
            rest,
            vec![
                Token::new(TokenKind::Identifier(0), 2),
                Token::new(TokenKind::Operator(Operator::Assign), 2),
                Token::new(TokenKind::NumericConstant(0), 2),
            ]
        );
        assert_eq!(lexer.tokens(), rest.as_slice());

        let info = lexer.token_info(&comment).unwrap();
        assert_eq!(info.category, TokenCategory::Comments);
        assert_eq!(info.index, None);
        assert_eq!(info.value, None);
        assert_eq!(info.line, 1);
    }

    #[test]
    fn test_unfinished_line_string() {
        let mut lexer = new_lexer("s = \"abc");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            error(&lexer, &tokens[2]),
            ErrorDescriptor::new("abc", ErrorKind::UnfinishedLineString)
        );
    }

    #[test]
    fn test_unfinished_line_string_keeps_line_count() {
        let mut lexer = new_lexer("'abc\nx");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1], Token::new(TokenKind::Identifier(0), 2));
    }

    #[test]
    fn test_hex_constant() {
        let mut lexer = new_lexer("0xFF");
        let tokens = lexer.tokenize();
        assert_eq!(tokens, vec![Token::new(TokenKind::NumericConstant(0), 1)]);
        assert_eq!(lexer.constants().get(0).unwrap().value(), 255.0);
    }

    #[test]
    fn test_lone_tilde() {
        let mut lexer = new_lexer("a~b");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Identifier(0));
        assert_eq!(
            error(&lexer, &tokens[1]),
            ErrorDescriptor::new("~", ErrorKind::UnexpectedSymbol)
        );
        assert_eq!(tokens[2].kind, TokenKind::Identifier(1));
    }

    #[test]
    fn test_block_string() {
        let mut lexer = new_lexer("[[hello]]");
        let tokens = lexer.tokenize();
        assert_eq!(tokens, vec![Token::new(TokenKind::StringLiteral(0), 1)]);
        assert_eq!(lexer.strings().get(0).unwrap(), "hello");
    }

    #[test]
    fn test_repeated_constant_shares_index() {
        let mut lexer = new_lexer("a = 3.14\nb = 3.14");
        let constants: Vec<Token> = lexer
            .tokenize()
            .into_iter()
            .filter(|t| matches!(t.kind, TokenKind::NumericConstant(_)))
            .collect();
        assert_eq!(constants.len(), 2);
        assert_eq!(constants[0].index(), constants[1].index());
        assert_eq!(lexer.constants().len(), 1);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut lexer = new_lexer("local function foo_1 _ends end");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Local));
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Function));
        assert_eq!(tokens[2].kind, TokenKind::Identifier(0));
        assert_eq!(tokens[3].kind, TokenKind::Identifier(1));
        assert_eq!(tokens[4].kind, TokenKind::Keyword(Keyword::End));
        assert_eq!(lexer.identifiers().get(1).unwrap(), "_ends");
    }

    #[test]
    fn test_dots() {
        let kinds: Vec<TokenKind> = new_lexer("a.b .. c ... .")
            .tokenize()
            .iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier(0),
                TokenKind::Delimiter(Delimiter::Dot),
                TokenKind::Identifier(1),
                TokenKind::Operator(Operator::Concat),
                TokenKind::Identifier(2),
                TokenKind::Operator(Operator::Ellipsis),
                TokenKind::Delimiter(Delimiter::Dot),
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(values("<= >= == ~= < > = #"), vec!["<=", ">=", "==", "~=", "<", ">", "=", "#"]);
        assert_eq!(values("a=-b"), vec!["a", "=", "-", "b"]);
        assert_eq!(values("=<"), vec!["=", "<"]);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            values("f(t[1]){};:,"),
            vec!["f", "(", "t", "[", "1.0", "]", ")", "{", "}", ";", ":", ","]
        );
    }

    #[test]
    fn test_negative_number_is_one_constant() {
        let mut lexer = new_lexer("x = -5");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::NumericConstant(0));
        assert_eq!(lexer.constants().get(0).unwrap().value(), -5.0);
        assert_eq!(values("5-3"), vec!["5.0", "-3.0"]);
    }

    #[test]
    fn test_malformed_number_is_one_token() {
        let mut lexer = new_lexer("3ab 1e");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            error(&lexer, &tokens[0]),
            ErrorDescriptor::new("3ab", ErrorKind::MalformedNumber)
        );
        assert_eq!(
            error(&lexer, &tokens[1]),
            ErrorDescriptor::new("1e", ErrorKind::MalformedNumber)
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            values("99 0.44 7.9E2 .98 0x1A 1e-2"),
            vec!["99.0", "0.44", "790.0", "0.98", "26.0", "0.01"]
        );
    }

    #[test]
    fn test_line_string_keeps_escapes_verbatim() {
        let mut lexer = new_lexer(r#"'it\'s' "a\"b" "tab\t""#);
        lexer.tokenize();
        let strings: Vec<&str> = lexer.strings().iter().map(String::as_str).collect();
        assert_eq!(strings, vec![r"it\'s", r#"a\"b"#, r"tab\t"]);
    }

    #[test]
    fn test_escaped_newline_counts_line() {
        let mut lexer = new_lexer("'a\\\nb' c");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral(0));
        assert_eq!(lexer.strings().get(0).unwrap(), "a\\\nb");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_block_string_levels() {
        let mut lexer = new_lexer("[==[a]]b]=]c]==]");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(lexer.strings().get(0).unwrap(), "a]]b]=]c");
    }

    #[test]
    fn test_block_string_drops_first_newline() {
        let mut lexer = new_lexer("x = [[\nline one\nline two]] y");
        let tokens = lexer.tokenize();
        assert_eq!(lexer.strings().get(0).unwrap(), "line one\nline two");
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_close_bracket_is_rescanned() {
        let mut lexer = new_lexer("[=[x]]=]");
        lexer.tokenize();
        assert_eq!(lexer.strings().get(0).unwrap(), "x]");
    }

    #[test]
    fn test_unfinished_block_string() {
        let mut lexer = new_lexer("[[never\nclosed");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(
            error(&lexer, &tokens[0]),
            ErrorDescriptor::new("<EOF>", ErrorKind::UnfinishedBlockString)
        );
    }

    #[test]
    fn test_bracket_without_long_string() {
        assert_eq!(values("t[=x"), vec!["t", "[", "=", "x"]);
        assert_eq!(values("a[b]"), vec!["a", "[", "b", "]"]);
    }

    #[test]
    fn test_block_comment() {
        let mut lexer = new_lexer("--[==[ one\ntwo ]] ]==] x");
        let comment = lexer.next_token().unwrap();
        assert_eq!(comment, Token::new(TokenKind::Comment, 1));
        let x = lexer.next_token().unwrap();
        assert_eq!(x, Token::new(TokenKind::Identifier(0), 2));
        assert_eq!(lexer.next_token(), None);
    }

    #[test]
    fn test_unfinished_block_comment_is_recorded() {
        let mut lexer = new_lexer("x --[[ open\n");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].line, 1);
        assert_eq!(
            error(&lexer, &tokens[1]),
            ErrorDescriptor::new("<EOF>", ErrorKind::UnfinishedBlockComment)
        );
        assert_eq!(lexer.line(), 2);
    }

    #[test]
    fn test_malformed_long_comment_is_line_comment() {
        let mut lexer = new_lexer("--[= not long\ny");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Comment);
        assert_eq!(lexer.next_token().unwrap(), Token::new(TokenKind::Identifier(0), 2));
    }

    #[test]
    fn test_unexpected_symbols() {
        let mut lexer = new_lexer("a @ b $ @");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 5);
        assert_eq!(
            error(&lexer, &tokens[1]),
            ErrorDescriptor::new("@", ErrorKind::UnexpectedSymbol)
        );
        assert_eq!(
            error(&lexer, &tokens[3]),
            ErrorDescriptor::new("$", ErrorKind::UnexpectedSymbol)
        );
        // The repeated '@' reuses its descriptor
        assert_eq!(tokens[1].kind, tokens[4].kind);
        assert_eq!(lexer.errors().len(), 2);
    }

    #[test]
    fn test_non_ascii_is_skipped() {
        let mut lexer = Lexer::from_bytes(b"a \xE9 b", None);
        assert_eq!(lexer.tokenize().len(), 2);
    }

    #[test]
    fn test_utf16_source() {
        let mut bytes = vec![0xFF, 0xFE];
        for b in b"x = 1\ny" {
            bytes.extend([*b, 0]);
        }
        let mut lexer = Lexer::from_bytes(bytes, None);
        assert_eq!(lexer.encoding(), Encoding::Utf16Le);
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].line, 2);
    }

    #[test]
    fn test_token_info() {
        let mut lexer = new_lexer("while x ~= 'q' do\n  x = x .. 3ab\nend");
        let tokens = lexer.tokenize();

        let info = lexer.token_info(&tokens[0]).unwrap();
        assert_eq!(info.type_id(), 0);
        assert_eq!(info.type_name, "KEYWORDS");
        assert_eq!(info.index, Some(Keyword::While.index()));
        assert_eq!(info.value, Some(SymbolValue::Text("while".to_string())));

        let info = lexer.token_info(&tokens[3]).unwrap();
        assert_eq!(info.category, TokenCategory::Strings);
        assert_eq!(info.value, Some(SymbolValue::Text("q".to_string())));

        let malformed = tokens.iter().find(|t| t.category() == TokenCategory::Errors).unwrap();
        let info = lexer.token_info(malformed).unwrap();
        assert!(Lexer::is_error_kind(info.type_id()));
        assert_eq!(info.type_name, "Malformed number");
        assert_eq!(info.index, Some(0));
        assert_eq!(info.value, Some(SymbolValue::Text("3ab".to_string())));
        assert_eq!(info.line, 2);
    }

    #[test]
    fn test_token_info_rejects_foreign_tokens() {
        let mut lexer = new_lexer("x");
        lexer.tokenize();

        let foreign = Token::new(TokenKind::Identifier(5), 9);
        assert!(matches!(
            lexer.token_info(&foreign),
            Err(LexError::UnknownToken { line: 9 })
        ));

        let comment = Token::new(TokenKind::Comment, 4);
        assert!(lexer.token_info(&comment).is_ok());
    }

    #[test]
    fn test_is_error_kind() {
        for category in TokenCategory::ALL {
            let expected = category == TokenCategory::Errors;
            assert_eq!(Lexer::is_error_kind(category.id()), expected);
            assert_eq!(token::is_error_kind(category.id()), expected);
        }
    }

    #[test]
    fn test_from_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFreturn 1").unwrap();

        let mut lexer = Lexer::from_path(file.path()).unwrap();
        assert_eq!(lexer.encoding(), Encoding::Utf8Bom);
        assert_eq!(lexer.tokenize().len(), 2);
        assert!(lexer.filename().is_some());
    }

    #[test]
    fn test_from_path_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut lexer = Lexer::from_path(file.path()).unwrap();
        assert_eq!(lexer.next_token(), None);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Lexer::from_path(dir.path().join("missing.lua"));
        assert!(matches!(result, Err(LexError::Io { .. })));
    }
}

//! Character stream over a raw source buffer
//!
//! The stream detects a byte-order mark, decodes the whole buffer into a
//! character array up front and hands characters out through a cursor that
//! can be rewound by any distance.
//!
//! Only ASCII content is decoded correctly. For UTF-16 input each code unit
//! is reduced to its low-order byte, and bytes above 0x7F in single-byte
//! input map to the Latin-1 character of the same value.

/// Encoding signature found at the start of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// No signature; one byte per character
    Plain,
    /// UTF-8 signature `EF BB BF`; one byte per character
    Utf8Bom,
    /// UTF-16 little-endian signature `FF FE`; two bytes per character
    Utf16Le,
    /// UTF-16 big-endian signature `FE FF`; two bytes per character
    Utf16Be,
}

impl Encoding {
    /// Detect the encoding from the leading bytes
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes {
            [0xFF, 0xFE, ..] => Self::Utf16Le,
            [0xFE, 0xFF, ..] => Self::Utf16Be,
            [0xEF, 0xBB, 0xBF, ..] => Self::Utf8Bom,
            _ => Self::Plain,
        }
    }

    /// Length of the signature in bytes
    pub fn bom_len(self) -> usize {
        match self {
            Self::Plain => 0,
            Self::Utf8Bom => 3,
            Self::Utf16Le | Self::Utf16Be => 2,
        }
    }

    /// Bytes per logical character
    pub fn code_unit_width(self) -> usize {
        match self {
            Self::Plain | Self::Utf8Bom => 1,
            Self::Utf16Le | Self::Utf16Be => 2,
        }
    }
}

/// Cursor over the decoded characters of a source buffer
#[derive(Debug, Clone)]
pub struct CharacterStream {
    chars: Vec<char>,
    /// May run past `chars.len()`: every read advances, even at end of
    /// input, so a push-back always undoes exactly the reads it names.
    position: usize,
    encoding: Encoding,
}

impl CharacterStream {
    /// Decode `bytes` into a stream
    pub fn new(bytes: &[u8]) -> Self {
        let encoding = Encoding::detect(bytes);
        let body = &bytes[encoding.bom_len()..];

        // A trailing odd byte in UTF-16 input is dropped
        let chars = match encoding {
            Encoding::Plain | Encoding::Utf8Bom => body.iter().map(|&b| char::from(b)).collect(),
            Encoding::Utf16Le => body.chunks_exact(2).map(|unit| char::from(unit[0])).collect(),
            Encoding::Utf16Be => body.chunks_exact(2).map(|unit| char::from(unit[1])).collect(),
        };

        tracing::debug!(?encoding, bytes = bytes.len(), "decoded source buffer");

        Self {
            chars,
            position: 0,
            encoding,
        }
    }

    /// Read the next character, or `None` at end of input
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.position).copied();
        self.position += 1;
        c
    }

    /// Rewind the cursor by `n` characters, stopping at the start
    pub fn push_back(&mut self, n: usize) {
        self.position = self.position.saturating_sub(n);
    }

    /// Consume the next character only if it satisfies `predicate`
    pub fn next_if(&mut self, predicate: impl FnOnce(char) -> bool) -> Option<char> {
        match self.next_char() {
            Some(c) if predicate(c) => Some(c),
            _ => {
                self.push_back(1);
                None
            }
        }
    }

    /// Consume the next character only if it equals `expected`
    pub fn next_if_eq(&mut self, expected: char) -> bool {
        self.next_if(|c| c == expected).is_some()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Cursor position in characters
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of decoded characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The decoded text, independent of the cursor
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(stream: &mut CharacterStream) -> String {
        std::iter::from_fn(|| stream.next_char()).collect()
    }

    #[test]
    fn test_plain_input() {
        let mut stream = CharacterStream::new(b"ab");
        assert_eq!(stream.encoding(), Encoding::Plain);
        assert_eq!(stream.next_char(), Some('a'));
        assert_eq!(stream.next_char(), Some('b'));
        assert_eq!(stream.next_char(), None);
        assert_eq!(stream.next_char(), None);
    }

    #[test]
    fn test_utf8_signature_is_skipped() {
        let mut stream = CharacterStream::new(b"\xEF\xBB\xBFlocal");
        assert_eq!(stream.encoding(), Encoding::Utf8Bom);
        assert_eq!(drain(&mut stream), "local");
    }

    #[test]
    fn test_utf16_little_endian() {
        let mut stream = CharacterStream::new(b"\xFF\xFEx\x00=\x001\x00");
        assert_eq!(stream.encoding(), Encoding::Utf16Le);
        assert_eq!(stream.encoding().code_unit_width(), 2);
        assert_eq!(drain(&mut stream), "x=1");
    }

    #[test]
    fn test_utf16_big_endian() {
        let mut stream = CharacterStream::new(b"\xFE\xFF\x00x\x00=\x001");
        assert_eq!(stream.encoding(), Encoding::Utf16Be);
        assert_eq!(drain(&mut stream), "x=1");
    }

    #[test]
    fn test_utf16_trailing_odd_byte_is_dropped() {
        let mut stream = CharacterStream::new(b"\xFF\xFEa\x00b");
        assert_eq!(drain(&mut stream), "a");
    }

    #[test]
    fn test_push_back_several_characters() {
        let mut stream = CharacterStream::new(b"[==[");
        assert_eq!(stream.next_char(), Some('['));
        assert_eq!(stream.next_char(), Some('='));
        assert_eq!(stream.next_char(), Some('='));
        stream.push_back(2);
        assert_eq!(stream.next_char(), Some('='));
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn test_push_back_clamps_at_start() {
        let mut stream = CharacterStream::new(b"ab");
        stream.next_char();
        stream.push_back(10);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.next_char(), Some('a'));
    }

    #[test]
    fn test_push_back_after_end_of_input() {
        let mut stream = CharacterStream::new(b"0");
        assert_eq!(stream.next_char(), Some('0'));
        assert_eq!(stream.next_char(), None);
        stream.push_back(1);
        assert_eq!(stream.next_char(), None);
        stream.push_back(2);
        assert_eq!(stream.next_char(), Some('0'));
    }

    #[test]
    fn test_next_if() {
        let mut stream = CharacterStream::new(b"==x");
        assert!(stream.next_if_eq('='));
        assert_eq!(stream.next_if(|c| c.is_ascii_alphabetic()), None);
        assert_eq!(stream.next_char(), Some('='));
        assert_eq!(stream.next_if(|c| c.is_ascii_alphabetic()), Some('x'));
        assert!(!stream.next_if_eq('='));
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_empty_buffer() {
        let mut stream = CharacterStream::new(b"");
        assert!(stream.is_empty());
        assert_eq!(stream.next_char(), None);
        assert_eq!(stream.text(), "");
    }
}

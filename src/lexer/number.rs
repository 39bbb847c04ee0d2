//! Numeric literal scanning and conversion
//!
//! Decimal literals are scanned by a small state machine that is deliberately
//! permissive: once a literal has gone wrong (`3ab`, `1e5x`) the remaining
//! alphanumerics are absorbed so the whole run is rejected as one token.

use super::stream::CharacterStream;

/// States of the decimal literal automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Integer,
    Dot,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
    Garbage,
    /// A leading sign has been taken; the next digit restarts the literal
    Sign,
}

/// What the automaton does with one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Append the character and move on
    Accept(State),
    /// Leave the character for the next state to look at
    Retry(State),
    Stop,
}

impl State {
    fn step(self, c: char) -> Step {
        use State::*;

        let digit = c.is_ascii_digit();
        let alpha = c.is_ascii_alphabetic();
        let exponent = c == 'e' || c == 'E';
        let sign = c == '+' || c == '-';

        let next = match self {
            Start if digit => Integer,
            Start if c == '.' => Dot,
            Start if sign => Sign,
            Integer if digit => Integer,
            Integer if c == '.' => Dot,
            Integer if exponent => Exponent,
            Integer if alpha => Garbage,
            Dot if digit => Fraction,
            Fraction if digit => Fraction,
            Fraction if exponent => Exponent,
            Fraction if alpha => Garbage,
            Exponent if alpha => Garbage,
            Exponent if sign => ExponentSign,
            Exponent if digit => ExponentDigits,
            ExponentSign if alpha => Garbage,
            ExponentSign | ExponentDigits if digit => ExponentDigits,
            ExponentDigits if alpha => Garbage,
            Garbage if c.is_ascii_alphanumeric() => Garbage,
            Sign if digit => return Step::Retry(Start),
            _ => return Step::Stop,
        };
        Step::Accept(next)
    }
}

/// Scan a numeric literal starting at the cursor
///
/// Text starting with `0x`/`0X` is taken as a hexadecimal literal, anything
/// else goes through the decimal automaton.
pub(crate) fn scan(stream: &mut CharacterStream) -> String {
    let first = stream.next_char();
    let second = stream.next_char();
    stream.push_back(2);

    match (first, second) {
        (Some('0'), Some('x' | 'X')) => scan_hex(stream),
        _ => scan_decimal(stream),
    }
}

/// Scan the prefix and every alphanumeric after it; validation is left to
/// [`convert`]
pub(crate) fn scan_hex(stream: &mut CharacterStream) -> String {
    let mut text: String = (0..2).filter_map(|_| stream.next_char()).collect();
    while let Some(c) = stream.next_if(|c| c.is_ascii_alphanumeric()) {
        text.push(c);
    }
    text
}

/// Run the decimal automaton, pushing back the first character it rejects
pub(crate) fn scan_decimal(stream: &mut CharacterStream) -> String {
    let mut text = String::new();
    let mut state = State::Start;

    loop {
        let Some(c) = stream.next_char() else {
            stream.push_back(1);
            break;
        };

        match state.step(c) {
            Step::Accept(next) => {
                text.push(c);
                state = next;
            }
            Step::Retry(next) => {
                stream.push_back(1);
                state = next;
            }
            Step::Stop => {
                stream.push_back(1);
                break;
            }
        }
    }

    text
}

/// Result of converting scanned literal text
#[derive(Debug, Clone, PartialEq)]
pub enum NumberLiteral {
    Value(f64),
    Malformed(String),
}

/// Convert literal text to a number
///
/// Decimal parsing is tried first, then hexadecimal parsing for text with
/// a `0x`/`0X` prefix.
pub fn convert(text: &str) -> NumberLiteral {
    if let Ok(value) = text.parse::<f64>() {
        return NumberLiteral::Value(value);
    }

    let hex_digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"));

    match hex_digits.and_then(parse_hex_float) {
        Some(value) => NumberLiteral::Value(value),
        None => NumberLiteral::Malformed(text.to_string()),
    }
}

/// Parse hexadecimal digits with an optional `.` fraction and an optional
/// `p` binary exponent
///
/// The digits are collected into an integer mantissa and a power of two, so
/// the result is rounded once. Digits past the mantissa's capacity only
/// decide the rounding direction.
fn parse_hex_float(digits: &str) -> Option<f64> {
    let (mantissa_text, exponent) = match digits.find(|c: char| c == 'p' || c == 'P') {
        Some(at) => (&digits[..at], Some(&digits[at + 1..])),
        None => (digits, None),
    };
    let (integer, fraction) = mantissa_text.split_once('.').unwrap_or((mantissa_text, ""));
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut mantissa: u128 = 0;
    let mut scale: i64 = 0;
    let mut inexact = false;

    let integer_digits = integer.chars().map(|c| (c, false));
    let fraction_digits = fraction.chars().map(|c| (c, true));
    for (c, in_fraction) in integer_digits.chain(fraction_digits) {
        let digit = c.to_digit(16)?;
        if mantissa >> 120 == 0 {
            mantissa = (mantissa << 4) | u128::from(digit);
            if in_fraction {
                scale -= 4;
            }
        } else {
            inexact |= digit != 0;
            if !in_fraction {
                scale += 4;
            }
        }
    }
    // A full mantissa keeps its low bit far below the rounding position
    if inexact {
        mantissa |= 1;
    }

    if let Some(exponent) = exponent {
        scale = scale.checked_add(exponent.parse::<i64>().ok()?)?;
    }

    // The conversion rounds; scaling by powers of two is exact while the
    // value stays normal
    let mut value = mantissa as f64;
    while scale != 0 && value != 0.0 && value.is_finite() {
        let step = scale.clamp(-1000, 1000);
        value *= 2.0f64.powi(step as i32);
        scale -= step;
    }

    value.is_finite().then_some(value)
}

//! Droidspeak decoding.
//!
//! Droidspeak is the wire encoding used for every string field returned by the
//! Death Star API: each character is written as an 8-bit binary octet and
//! octets are separated by a single space.
//!
//! ```text
//! 01101100 01100101 01101001 01100001  ->  "leia"
//! ```
//!
//! Decoding is all-or-nothing. The first malformed octet aborts the decode and
//! no partial text is returned.

use std::fmt::Write as _;
use std::sync::Arc;

/// Width of a single droidspeak octet.
const OCTET_WIDTH: usize = 8;

/// Vertical tab, accepted as whitespace alongside `char::is_ascii_whitespace`.
const VERTICAL_TAB: u8 = 0x0b;

/// Converts an encoded string field into human-readable text.
pub trait Decoder: Send + Sync {
    /// Decode `input` in full.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodingError`] for the first token that cannot be decoded.
    fn decode(&self, input: &str) -> Result<String, DecodingError>;
}

impl<D: Decoder + ?Sized> Decoder for Arc<D> {
    fn decode(&self, input: &str) -> Result<String, DecodingError> {
        (**self).decode(input)
    }
}

/// Decoder for space-separated 8-bit binary octets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DroidspeakDecoder;

impl DroidspeakDecoder {
    /// Create a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for DroidspeakDecoder {
    /// Decode a droidspeak string.
    ///
    /// # Examples
    ///
    /// ```
    /// use deathstar_core::{Decoder, DroidspeakDecoder};
    ///
    /// let decoder = DroidspeakDecoder::new();
    /// assert_eq!(decoder.decode("01101100 01100101 01101001 01100001").unwrap(), "leia");
    /// assert_eq!(decoder.decode("").unwrap(), "");
    /// ```
    fn decode(&self, input: &str) -> Result<String, DecodingError> {
        if input.is_empty() {
            return Ok(String::new());
        }

        input
            .split(' ')
            .map(decode_octet)
            .collect::<Result<String, _>>()
    }
}

fn decode_octet(token: &str) -> Result<char, DecodingError> {
    if token.len() != OCTET_WIDTH {
        return Err(DecodingError::TooLong(token.to_string()));
    }

    if !token.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(DecodingError::NonBinary(token.to_string()));
    }

    let byte = u8::from_str_radix(token, 2)
        .map_err(|_| DecodingError::NonBinary(token.to_string()))?;

    if !is_human_readable(byte) {
        return Err(DecodingError::NonHumanReadable(token.to_string()));
    }

    Ok(char::from(byte))
}

fn is_human_readable(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || byte.is_ascii_punctuation()
        || byte.is_ascii_whitespace()
        || byte == VERTICAL_TAB
}

/// Encode text as droidspeak.
///
/// Each byte of `text` becomes one octet. Multi-byte UTF-8 characters
/// produce octets that [`DroidspeakDecoder`] will reject as
/// non-human-readable.
///
/// # Examples
///
/// ```
/// use deathstar_core::encode_droidspeak;
///
/// assert_eq!(encode_droidspeak("Hi"), "01001000 01101001");
/// assert_eq!(encode_droidspeak(""), "");
/// ```
#[must_use]
pub fn encode_droidspeak(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len() * (OCTET_WIDTH + 1));
    for (i, byte) in text.bytes().enumerate() {
        if i > 0 {
            encoded.push(' ');
        }
        let _ = write!(encoded, "{byte:08b}");
    }
    encoded
}

/// Errors that can occur while decoding droidspeak.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodingError {
    /// Token is not exactly eight characters wide
    #[error("\"{0}\" is too long to be an 8 bit string")]
    TooLong(String),
    /// Token contains characters other than `0` and `1`
    #[error("\"{0}\" contains non-binary characters")]
    NonBinary(String),
    /// Token decodes to a control or non-ASCII byte
    #[error("\"{0}\" does not convert to a valid human-readable character")]
    NonHumanReadable(String),
}

impl DecodingError {
    /// Numeric code identifying the failure kind.
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::TooLong(_) => 1,
            Self::NonBinary(_) => 2,
            Self::NonHumanReadable(_) => 3,
        }
    }

    /// The offending token, verbatim.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::TooLong(token) | Self::NonBinary(token) | Self::NonHumanReadable(token) => token,
        }
    }
}

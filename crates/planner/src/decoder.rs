//! Incremental UTF-8 decoding for chunked response bodies.

use std::char::REPLACEMENT_CHARACTER;

/// Decodes a byte stream into text one chunk at a time.
///
/// A multi-byte character split across chunks is held back until the rest
/// of it arrives. Invalid bytes decode to U+FFFD.
///
/// # Examples
///
/// ```
/// use tripboard_planner::Utf8StreamDecoder;
///
/// let mut decoder = Utf8StreamDecoder::new();
/// let bytes = "café".as_bytes();
/// assert_eq!(decoder.decode(&bytes[..4]), "caf");
/// assert_eq!(decoder.decode(&bytes[4..]), "é");
/// assert_eq!(decoder.finish(), "");
/// ```
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    /// Creates a decoder with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `chunk` as forms complete characters.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        self.drain(false)
    }

    /// Flushes whatever is still pending at end of stream.
    ///
    /// An incomplete trailing sequence decodes to U+FFFD.
    pub fn finish(&mut self) -> String {
        self.drain(true)
    }

    /// Returns `true` if bytes are held back waiting for more input.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn drain(&mut self, at_end: bool) -> String {
        let bytes = std::mem::take(&mut self.pending);
        let mut text = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, invalid) = rest.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            text.push(REPLACEMENT_CHARACTER);
                            rest = &invalid[len..];
                        }
                        None if at_end => {
                            text.push(REPLACEMENT_CHARACTER);
                            break;
                        }
                        None => {
                            self.pending = invalid.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(br#"{"Day 1":"#), r#"{"Day 1":"#);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn split_multibyte_character_is_held_back() {
        let bytes = "Tōkyō".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();

        // 'ō' is two bytes; split it down the middle
        assert_eq!(decoder.decode(&bytes[..2]), "T");
        assert!(decoder.has_pending());
        assert_eq!(decoder.decode(&bytes[2..]), "ōkyō");
        assert!(!decoder.has_pending());
    }

    #[test]
    fn four_byte_character_across_three_chunks() {
        let bytes = "🗾".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.decode(&bytes[1..3]), "");
        assert_eq!(decoder.decode(&bytes[3..]), "🗾");
    }

    #[test]
    fn invalid_bytes_become_replacement_characters() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn truncated_sequence_at_end_is_replaced() {
        let bytes = "é".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.finish(), "");
    }
}

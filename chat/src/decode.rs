//! Incremental UTF-8 decoding for fragments cut at arbitrary byte
//! boundaries.

/// Stateful decoder that buffers an incomplete multi-byte sequence at the
/// end of a fragment until the rest of it arrives.
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Decode everything decodable from `chunk` plus any bytes held back
    /// from earlier fragments. Invalid sequences become replacement
    /// characters; a truncated sequence at the end is held for the next
    /// call.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[..valid_up_to]).unwrap());
                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + bad);
                        }
                        None => {
                            // Truncated sequence; keep the tail bytes.
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush whatever is still buffered at end of stream.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let out = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        out
    }
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Utf8Decoder;

    #[test]
    fn plain_ascii_passes_through() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(b"Bonjour"), "Bonjour");
        assert_eq!(dec.finish(), "");
    }

    #[test]
    fn multibyte_split_across_fragments() {
        // "à" is 0xC3 0xA0; cut between the two bytes.
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(b"Bonjour \xC3"), "Bonjour ");
        assert_eq!(dec.push(b"\xA0 toi"), "\u{e0} toi");
        assert_eq!(dec.finish(), "");
    }

    #[test]
    fn four_byte_scalar_split_three_ways() {
        // "𝄞" (U+1D11E) is four bytes.
        let bytes = "𝄞".as_bytes();
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(&bytes[..1]), "");
        assert_eq!(dec.push(&bytes[1..3]), "");
        assert_eq!(dec.push(&bytes[3..]), "𝄞");
    }

    #[test]
    fn invalid_byte_becomes_replacement() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn truncated_tail_is_flushed_lossily() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(b"fin \xC3"), "fin ");
        assert_eq!(dec.finish(), "\u{FFFD}");
    }
}

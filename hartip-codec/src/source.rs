//! Resumable byte source with consumption memory
//!
//! [`Source`] wraps an input buffer and tracks how many bytes have been
//! consumed. Unlike a plain cursor it can render a diagnostic context
//! string showing the consumed prefix, the pending suffix and a marker
//! at the current position, which parse failures carry upward.

use hartip_core::{HartError, HartResult};
use std::fmt::Write as _;

/// Byte source over a borrowed buffer
#[derive(Debug)]
pub struct Source<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Source<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Number of bytes consumed so far
    pub fn consumed(&self) -> usize {
        self.position
    }

    /// Number of bytes still available
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Consumed prefix of the input
    pub fn consumed_bytes(&self) -> &'a [u8] {
        &self.data[..self.position]
    }

    /// Unconsumed suffix of the input
    pub fn pending(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Next byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    pub fn read_u8(&mut self) -> HartResult<u8> {
        let byte = self.peek().ok_or_else(|| {
            HartError::Decode("unexpected end of input: need 1 byte, have 0".to_string())
        })?;
        self.position += 1;
        Ok(byte)
    }

    pub fn read_exact(&mut self, len: usize) -> HartResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(HartError::Decode(format!(
                "unexpected end of input: need {} bytes, have {}",
                len,
                self.remaining()
            )));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Diagnostic context for the current position
    ///
    /// Renders the full input as hex with a caret marking the boundary
    /// between consumed and pending bytes:
    ///
    /// ```text
    /// at 2 total bytes:
    /// CB 00 01
    /// -----^ (byte 2)
    /// ```
    pub fn context(&self) -> String {
        let mut hex = String::new();
        for (i, byte) in self.data.iter().enumerate() {
            if i > 0 {
                hex.push(' ');
            }
            let _ = write!(hex, "{:02X}", byte);
        }
        let marker_len = (self.position * 3).saturating_sub(1);
        format!(
            "at {} total bytes:\n{}\n{}^ (byte {})",
            self.position,
            hex,
            "-".repeat(marker_len),
            self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_track() {
        let data = [0x4B, 0x00, 0xFF];
        let mut source = Source::new(&data);

        assert_eq!(source.read_u8().unwrap(), 0x4B);
        assert_eq!(source.consumed(), 1);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.consumed_bytes(), &[0x4B]);
        assert_eq!(source.pending(), &[0x00, 0xFF]);
    }

    #[test]
    fn test_read_exact_over_end() {
        let data = [0x01];
        let mut source = Source::new(&data);
        assert!(source.read_exact(4).is_err());
        // A failed read consumes nothing.
        assert_eq!(source.consumed(), 0);
    }

    #[test]
    fn test_context_marks_position() {
        let data = [0xCB, 0x00, 0x01];
        let mut source = Source::new(&data);
        source.read_u8().unwrap();
        source.read_u8().unwrap();

        let context = source.context();
        assert!(context.starts_with("at 2 total bytes:"));
        assert!(context.contains("CB 00 01"));
        assert!(context.ends_with("^ (byte 2)"));
    }

    #[test]
    fn test_context_at_start() {
        let source = Source::new(&[0x01]);
        assert!(source.context().contains("(byte 0)"));
    }
}

//! Bounded scratch buffer for escape decoding.
//!
//! Unescaped runs are emitted zero-copy, but once an escape is seen the
//! decoded text no longer matches the input bytes and has to be built
//! somewhere. [`TempBuffer`] is that somewhere: a fixed-capacity byte
//! buffer the string decoder fills and flushes through `*_part` events
//! when it is full, when the string closes, or when input runs out. It is
//! always empty at every suspension point, so the parser's transient
//! memory stays bounded regardless of input size.

use alloc::vec::Vec;

pub(crate) const TEMP_CAPACITY: usize = 4096;

#[derive(Debug)]
pub(crate) struct TempBuffer {
    bytes: Vec<u8>,
}

impl TempBuffer {
    pub(crate) fn new() -> Self {
        TempBuffer {
            bytes: Vec::with_capacity(TEMP_CAPACITY),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when fewer than `n` bytes of capacity remain.
    #[inline]
    pub(crate) fn needs_flush(&self, n: usize) -> bool {
        self.bytes.len() + n > TEMP_CAPACITY
    }

    #[inline]
    pub(crate) fn push(&mut self, b: u8) {
        debug_assert!(self.bytes.len() < TEMP_CAPACITY);
        self.bytes.push(b);
    }

    #[inline]
    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        debug_assert!(self.bytes.len() + bytes.len() <= TEMP_CAPACITY);
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends the UTF-8 encoding of a Unicode scalar value.
    ///
    /// `cp` comes from a decoded `\u` escape or a combined surrogate pair,
    /// both of which are range-checked before this is called.
    pub(crate) fn append_scalar(&mut self, cp: u32) {
        debug_assert!(self.bytes.len() + 4 <= TEMP_CAPACITY);
        if cp < 0x80 {
            self.bytes.push(cp as u8);
        } else if cp < 0x800 {
            self.bytes.push(0xC0 | (cp >> 6) as u8);
            self.bytes.push(0x80 | (cp & 0x3F) as u8);
        } else if cp < 0x10000 {
            self.bytes.push(0xE0 | (cp >> 12) as u8);
            self.bytes.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            self.bytes.push(0x80 | (cp & 0x3F) as u8);
        } else {
            self.bytes.push(0xF0 | (cp >> 18) as u8);
            self.bytes.push(0x80 | ((cp >> 12) & 0x3F) as u8);
            self.bytes.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            self.bytes.push(0x80 | (cp & 0x3F) as u8);
        }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::TempBuffer;

    #[test]
    fn scalar_encoding_widths() {
        let mut t = TempBuffer::new();
        t.append_scalar(0x41);
        assert_eq!(t.as_slice(), b"A");
        t.clear();
        t.append_scalar(0xE9);
        assert_eq!(t.as_slice(), "é".as_bytes());
        t.clear();
        t.append_scalar(0x20AC);
        assert_eq!(t.as_slice(), "€".as_bytes());
        t.clear();
        t.append_scalar(0x1F600);
        assert_eq!(t.as_slice(), "😀".as_bytes());
    }

    #[test]
    fn flush_threshold() {
        let mut t = TempBuffer::new();
        assert!(!t.needs_flush(super::TEMP_CAPACITY));
        t.push(b'x');
        assert!(t.needs_flush(super::TEMP_CAPACITY));
        assert!(!t.needs_flush(1));
    }
}

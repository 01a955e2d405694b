//! UTF-8 sequence classification.
//!
//! Lead bytes map to a class that fixes both the sequence length and the
//! allowed range of the first continuation byte (the one that rules out
//! overlong encodings and surrogates). When four bytes are available the
//! whole sequence is checked with one masked compare on a little-endian
//! `u32`; otherwise the validator in the parser walks continuation bytes
//! one at a time so it can suspend between them.

/// Class of a lead byte, indexed by `byte & 0x7F` for bytes >= 0x80.
///
/// 0 = invalid lead
/// 1 = 2 bytes, second byte [80, BF]
/// 2 = 3 bytes, second byte [A0, BF]
/// 3 = 3 bytes, second byte [80, BF]
/// 4 = 3 bytes, second byte [80, 9F]
/// 5 = 4 bytes, second byte [90, BF]
/// 6 = 4 bytes, second byte [80, BF]
/// 7 = 4 bytes, second byte [80, 8F]
#[rustfmt::skip]
static LEAD: [u8; 128] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    2, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 3, 3,
    5, 6, 6, 6, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

#[inline]
pub(crate) fn lead_class(b: u8) -> u8 {
    LEAD[(b & 0x7F) as usize]
}

#[inline]
pub(crate) fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Range check for the first continuation byte of the given class.
#[inline]
pub(crate) fn first_continuation_ok(class: u8, b: u8) -> bool {
    match class {
        1 | 3 | 6 => is_continuation(b),
        2 => b & 0xE0 == 0xA0,
        4 => b & 0xE0 == 0x80,
        5 => (0x90..=0xBF).contains(&b),
        7 => b & 0xF0 == 0x80,
        _ => false,
    }
}

/// Validates a whole sequence against four buffered bytes, loaded
/// little-endian with the lead byte in the low octet. Returns the sequence
/// length, or `None` when invalid.
#[inline]
pub(crate) fn check_word(v: u32) -> Option<usize> {
    match LEAD[(v & 0x0000_007F) as usize] {
        1 if v & 0x0000_C000 == 0x0000_8000 => Some(2),
        2 if v & 0x00C0_E000 == 0x0080_A000 => Some(3),
        3 if v & 0x00C0_C000 == 0x0080_8000 => Some(3),
        4 if v & 0x00C0_E000 == 0x0080_8000 => Some(3),
        // F0 leads pair a [90, BF] second byte with two plain continuation
        // bytes; the add folds all three range checks into one compare.
        5 if (v & 0xC0C0_FF00).wrapping_add(0x7F7F_7000) <= 0x0000_2F00 => Some(4),
        6 if v & 0xC0C0_C000 == 0x8080_8000 => Some(4),
        7 if v & 0xC0C0_F000 == 0x8080_8000 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(bytes: &[u8]) -> u32 {
        let mut buf = [0u8; 4];
        let n = bytes.len().min(4);
        buf[..n].copy_from_slice(&bytes[..n]);
        u32::from_le_bytes(buf)
    }

    #[test]
    fn accepts_valid_sequences() {
        assert_eq!(check_word(word("é...".as_bytes())), Some(2));
        assert_eq!(check_word(word("€...".as_bytes())), Some(3));
        assert_eq!(check_word(word("😀".as_bytes())), Some(4));
    }

    #[test]
    fn rejects_overlongs_and_surrogates() {
        // overlong "/" as 3 bytes
        assert_eq!(check_word(word(&[0xE0, 0x80, 0xAF, 0x00])), None);
        // UTF-8-encoded surrogate D800
        assert_eq!(check_word(word(&[0xED, 0xA0, 0x80, 0x00])), None);
        // F0 followed by 0x80: overlong 4-byte form
        assert_eq!(check_word(word(&[0xF0, 0x80, 0x80, 0x80])), None);
        // F4 past U+10FFFF
        assert_eq!(check_word(word(&[0xF4, 0x90, 0x80, 0x80])), None);
    }

    #[test]
    fn slow_path_ranges_match_fast_path() {
        // Every (lead, second) pair must agree between check_word and the
        // class-based range check used when fewer than 4 bytes remain.
        for lead in 0x80u16..=0xFFu16 {
            let lead = lead as u8;
            let class = lead_class(lead);
            for second in 0x00u16..=0xFFu16 {
                let second = second as u8;
                let fast = check_word(word(&[lead, second, 0x80, 0x80])).is_some();
                let slow = class != 0 && first_continuation_ok(class, second);
                assert_eq!(fast, slow, "lead {lead:#x} second {second:#x}");
            }
        }
    }
}

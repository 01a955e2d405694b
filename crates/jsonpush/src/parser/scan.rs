//! Byte-counting scans used by the hot loops.
//!
//! Each scan returns the length of the maximal prefix of `data` that needs
//! no per-byte attention, so callers can skip it in one step.

/// JSON whitespace: space, tab, line feed, carriage return.
pub(crate) fn count_whitespace(data: &[u8]) -> usize {
    data.iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .count()
}

// Bytes a string scanner can pass over without acting: everything except
// the closing quote, backslash, and control bytes. The VALID variant also
// stops at bytes >= 0x80 so they reach the UTF-8 validator.
const PASS: u8 = 1;

static UNESCAPED: [u8; 256] = build_class(true);
static VALID_UNESCAPED: [u8; 256] = build_class(false);

const fn build_class(pass_high: bool) -> [u8; 256] {
    let mut t = [0u8; 256];
    let mut b = 0x20usize;
    while b < 256 {
        let high = b >= 0x80;
        if b != b'"' as usize && b != b'\\' as usize && (pass_high || !high) {
            t[b] = PASS;
        }
        b += 1;
    }
    t
}

/// Run of bytes needing no escape handling, invalid UTF-8 permitted.
pub(crate) fn count_unescaped(data: &[u8]) -> usize {
    data.iter().take_while(|&&b| UNESCAPED[b as usize] == PASS).count()
}

/// Run of bytes needing no escape handling and no UTF-8 validation.
pub(crate) fn count_valid_unescaped(data: &[u8]) -> usize {
    data.iter()
        .take_while(|&&b| VALID_UNESCAPED[b as usize] == PASS)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_stops_at_token() {
        assert_eq!(count_whitespace(b"  \t\r\n{"), 5);
        assert_eq!(count_whitespace(b"x"), 0);
        assert_eq!(count_whitespace(b""), 0);
    }

    #[test]
    fn unescaped_stops_at_specials() {
        assert_eq!(count_unescaped(b"abc\"rest"), 3);
        assert_eq!(count_unescaped(b"abc\\n"), 3);
        assert_eq!(count_unescaped(b"ab\x01c"), 2);
        // high bytes pass in lax mode, stop in validating mode
        assert_eq!(count_unescaped(b"ab\xC3\xA9cd\""), 6);
        assert_eq!(count_valid_unescaped(b"ab\xC3\xA9cd\""), 2);
    }
}

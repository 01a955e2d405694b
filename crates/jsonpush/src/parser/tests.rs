#![allow(clippy::float_cmp)]

use alloc::{vec, vec::Vec};

use quickcheck::QuickCheck;
use rstest::*;

use super::*;

/// Owned copy of every handler callback, in order.
#[derive(Debug, Clone, PartialEq)]
enum Event {
    DocBegin,
    DocEnd,
    ObjBegin,
    ObjEnd,
    ArrBegin,
    ArrEnd,
    KeyPart(Vec<u8>),
    Key(Vec<u8>),
    StrPart(Vec<u8>),
    Str(Vec<u8>),
    NumPart(Vec<u8>),
    Int(i64, Vec<u8>),
    Uint(u64, Vec<u8>),
    Dub(f64, Vec<u8>),
    Bool(bool),
    Null,
    ComPart(Vec<u8>),
    Com(Vec<u8>),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    /// Fail with `HandlerAbort` once this many events have been recorded.
    fail_at: Option<usize>,
}

impl Recorder {
    fn record(&mut self, ev: Event) -> Result<(), Error> {
        self.events.push(ev);
        match self.fail_at {
            Some(n) if self.events.len() >= n => Err(Error::HandlerAbort),
            _ => Ok(()),
        }
    }
}

impl Handler for Recorder {
    fn on_document_begin(&mut self) -> Result<(), Error> {
        self.record(Event::DocBegin)
    }
    fn on_document_end(&mut self) -> Result<(), Error> {
        self.record(Event::DocEnd)
    }
    fn on_object_begin(&mut self) -> Result<(), Error> {
        self.record(Event::ObjBegin)
    }
    fn on_object_end(&mut self) -> Result<(), Error> {
        self.record(Event::ObjEnd)
    }
    fn on_array_begin(&mut self) -> Result<(), Error> {
        self.record(Event::ArrBegin)
    }
    fn on_array_end(&mut self) -> Result<(), Error> {
        self.record(Event::ArrEnd)
    }
    fn on_key_part(&mut self, text: &[u8]) -> Result<(), Error> {
        self.record(Event::KeyPart(text.to_vec()))
    }
    fn on_key(&mut self, text: &[u8]) -> Result<(), Error> {
        self.record(Event::Key(text.to_vec()))
    }
    fn on_string_part(&mut self, text: &[u8]) -> Result<(), Error> {
        self.record(Event::StrPart(text.to_vec()))
    }
    fn on_string(&mut self, text: &[u8]) -> Result<(), Error> {
        self.record(Event::Str(text.to_vec()))
    }
    fn on_number_part(&mut self, text: &[u8]) -> Result<(), Error> {
        self.record(Event::NumPart(text.to_vec()))
    }
    fn on_int64(&mut self, value: i64, text: &[u8]) -> Result<(), Error> {
        self.record(Event::Int(value, text.to_vec()))
    }
    fn on_uint64(&mut self, value: u64, text: &[u8]) -> Result<(), Error> {
        self.record(Event::Uint(value, text.to_vec()))
    }
    fn on_double(&mut self, value: f64, text: &[u8]) -> Result<(), Error> {
        self.record(Event::Dub(value, text.to_vec()))
    }
    fn on_bool(&mut self, value: bool) -> Result<(), Error> {
        self.record(Event::Bool(value))
    }
    fn on_null(&mut self) -> Result<(), Error> {
        self.record(Event::Null)
    }
    fn on_comment_part(&mut self, text: &[u8]) -> Result<(), Error> {
        self.record(Event::ComPart(text.to_vec()))
    }
    fn on_comment(&mut self, text: &[u8]) -> Result<(), Error> {
        self.record(Event::Com(text.to_vec()))
    }
}

/// Feeds `chunks` in order, `more = true` for all but the last. Returns the
/// last call's result and everything recorded up to that point.
fn run_chunks(opt: ParseOptions, chunks: &[&[u8]]) -> (Result<usize, Error>, Vec<Event>) {
    let mut parser = Parser::new(opt);
    let mut rec = Recorder::default();
    let mut last = Ok(0);
    for (i, chunk) in chunks.iter().enumerate() {
        let more = i + 1 < chunks.len();
        last = parser.write_some(&mut rec, chunk, more);
        if last.is_err() {
            break;
        }
    }
    (last, rec.events)
}

fn events(opt: ParseOptions, input: &[u8]) -> Vec<Event> {
    let (r, ev) = run_chunks(opt, &[input]);
    r.expect("parse failed");
    ev
}

fn events_chunked(opt: ParseOptions, chunks: &[&[u8]]) -> Vec<Event> {
    let (r, ev) = run_chunks(opt, chunks);
    r.expect("parse failed");
    ev
}

fn events_split(opt: ParseOptions, input: &[u8], size: usize) -> Vec<Event> {
    let chunks: Vec<&[u8]> = input.chunks(size).collect();
    events_chunked(opt, &chunks)
}

fn fail(opt: ParseOptions, input: &[u8]) -> Error {
    let (r, _) = run_chunks(opt, &[input]);
    r.expect_err("expected a parse error")
}

fn fail_chunked(opt: ParseOptions, chunks: &[&[u8]]) -> Error {
    let (r, _) = run_chunks(opt, chunks);
    r.expect_err("expected a parse error")
}

fn lenient() -> ParseOptions {
    ParseOptions {
        allow_comments: true,
        allow_trailing_commas: true,
        ..ParseOptions::default()
    }
}

/// Merges `*_part` fragments into the following terminal event, giving the
/// chunking-independent view of a sequence.
fn coalesce(events: &[Event]) -> Vec<Event> {
    fn joined(pending: &mut Vec<u8>, tail: &[u8]) -> Vec<u8> {
        let mut t = core::mem::take(pending);
        t.extend_from_slice(tail);
        t
    }
    let mut out = Vec::new();
    let mut pending: Vec<u8> = Vec::new();
    for ev in events {
        match ev {
            Event::KeyPart(b) | Event::StrPart(b) | Event::NumPart(b) | Event::ComPart(b) => {
                pending.extend_from_slice(b);
            }
            Event::Key(b) => out.push(Event::Key(joined(&mut pending, b))),
            Event::Str(b) => out.push(Event::Str(joined(&mut pending, b))),
            Event::Com(b) => out.push(Event::Com(joined(&mut pending, b))),
            Event::Int(v, b) => out.push(Event::Int(*v, joined(&mut pending, b))),
            Event::Uint(v, b) => out.push(Event::Uint(*v, joined(&mut pending, b))),
            Event::Dub(v, b) => out.push(Event::Dub(*v, joined(&mut pending, b))),
            other => out.push(other.clone()),
        }
    }
    out
}

//--------------------------------------------------------------------------
// documents and structure

#[rstest]
#[case::bool_true(&b"true"[..], Event::Bool(true))]
#[case::bool_false(&b"false"[..], Event::Bool(false))]
#[case::null(&b"null"[..], Event::Null)]
#[case::int(&b"42"[..], Event::Int(42, b"42".to_vec()))]
#[case::string(&b"\"hi\""[..], Event::Str(b"hi".to_vec()))]
fn scalar_documents(#[case] input: &[u8], #[case] expected: Event) {
    assert_eq!(
        events(ParseOptions::default(), input),
        vec![Event::DocBegin, expected, Event::DocEnd]
    );
}

#[test]
fn object_and_array_events() {
    assert_eq!(
        events(
            ParseOptions::default(),
            br#"{"a":[1,2.5,true,null,"x"],"b":{}}"#
        ),
        vec![
            Event::DocBegin,
            Event::ObjBegin,
            Event::Key(b"a".to_vec()),
            Event::ArrBegin,
            Event::Int(1, b"1".to_vec()),
            Event::Dub(2.5, b"2.5".to_vec()),
            Event::Bool(true),
            Event::Null,
            Event::Str(b"x".to_vec()),
            Event::ArrEnd,
            Event::Key(b"b".to_vec()),
            Event::ObjBegin,
            Event::ObjEnd,
            Event::ObjEnd,
            Event::DocEnd,
        ]
    );
}

#[test]
fn surrounding_whitespace_is_consumed() {
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder::default();
    let n = parser.write_some(&mut rec, b" [1] ", false).unwrap();
    assert_eq!(n, 5);
    assert!(parser.done());
}

#[test]
fn trailing_garbage_is_left_unconsumed() {
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder::default();
    let n = parser.write_some(&mut rec, b"1 x", false).unwrap();
    assert_eq!(n, 2);
    assert!(parser.done());
    assert_eq!(
        rec.events,
        vec![Event::DocBegin, Event::Int(1, b"1".to_vec()), Event::DocEnd]
    );
}

#[rstest]
#[case::empty(&b""[..])]
#[case::whitespace_only(&b"   \n"[..])]
#[case::open_object(&br#"{"a":"#[..])]
#[case::open_string(&b"\"abc"[..])]
#[case::lone_minus(&b"-"[..])]
fn incomplete_at_end_of_input(#[case] input: &[u8]) {
    assert_eq!(fail(ParseOptions::default(), input), Error::Incomplete);
}

#[test]
fn document_end_fires_once_with_trailing_whitespace() {
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder::default();
    parser.write_some(&mut rec, b"true ", true).unwrap();
    assert!(parser.done());
    parser.write_some(&mut rec, b"   ", true).unwrap();
    parser.write_some(&mut rec, b"", false).unwrap();
    let ends = rec
        .events
        .iter()
        .filter(|e| **e == Event::DocEnd)
        .count();
    assert_eq!(ends, 1);
}

#[test]
fn depth_is_visible_while_suspended() {
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder::default();
    parser.write_some(&mut rec, b"[[", true).unwrap();
    assert_eq!(parser.depth(), 2);
    assert!(!parser.done());
}

#[test]
fn reset_allows_reuse() {
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder::default();
    parser.write_some(&mut rec, b"true", false).unwrap();
    assert!(parser.done());
    parser.reset();
    assert!(!parser.done());
    let mut rec = Recorder::default();
    parser.write_some(&mut rec, b"[false]", false).unwrap();
    assert_eq!(
        rec.events,
        vec![
            Event::DocBegin,
            Event::ArrBegin,
            Event::Bool(false),
            Event::ArrEnd,
            Event::DocEnd,
        ]
    );
}

#[test]
fn last_error_is_recorded() {
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder::default();
    let e = parser.write_some(&mut rec, b"[1,]", false).unwrap_err();
    assert_eq!(e, Error::Syntax);
    assert_eq!(parser.last_error(), Some(Error::Syntax));
    parser.reset();
    assert_eq!(parser.last_error(), None);
}

//--------------------------------------------------------------------------
// numbers

#[rstest]
#[case::zero(&b"0"[..], 0)]
#[case::neg_zero(&b"-0"[..], 0)]
#[case::small(&b"123"[..], 123)]
#[case::neg(&b"-456"[..], -456)]
#[case::i64_max(&b"9223372036854775807"[..], i64::MAX)]
#[case::i64_min(&b"-9223372036854775808"[..], i64::MIN)]
fn int64_values(#[case] input: &[u8], #[case] expected: i64) {
    assert_eq!(
        events(ParseOptions::default(), input),
        vec![
            Event::DocBegin,
            Event::Int(expected, input.to_vec()),
            Event::DocEnd
        ]
    );
}

#[rstest]
#[case::i64_max_plus_one(&b"9223372036854775808"[..], 9_223_372_036_854_775_808)]
#[case::u64_max(&b"18446744073709551615"[..], u64::MAX)]
fn uint64_values(#[case] input: &[u8], #[case] expected: u64) {
    assert_eq!(
        events(ParseOptions::default(), input),
        vec![
            Event::DocBegin,
            Event::Uint(expected, input.to_vec()),
            Event::DocEnd
        ]
    );
}

#[rstest]
#[case::fraction(&b"2.5"[..], 2.5)]
#[case::exponent(&b"1e2"[..], 100.0)]
#[case::signed_exponent(&b"1E+2"[..], 100.0)]
#[case::negative_exponent(&b"1e-2"[..], 0.01)]
#[case::underflow(&b"1e-400"[..], 0.0)]
fn double_values(#[case] input: &[u8], #[case] expected: f64) {
    assert_eq!(
        events(ParseOptions::default(), input),
        vec![
            Event::DocBegin,
            Event::Dub(expected, input.to_vec()),
            Event::DocEnd
        ]
    );
}

#[test]
fn negative_zero_with_fraction_keeps_its_sign() {
    let ev = events(ParseOptions::default(), b"-0.0");
    let Event::Dub(v, _) = &ev[1] else {
        panic!("expected a double, got {ev:?}");
    };
    assert_eq!(*v, 0.0);
    assert!(v.is_sign_negative());
}

#[test]
fn integers_below_i64_min_become_doubles() {
    let ev = events(ParseOptions::default(), b"-9223372036854775809");
    assert!(
        matches!(&ev[1], Event::Dub(v, _) if *v < -9.2e18),
        "got {ev:?}"
    );
}

#[test]
fn integers_above_u64_max_become_doubles() {
    let ev = events(ParseOptions::default(), b"18446744073709551616");
    assert!(
        matches!(&ev[1], Event::Dub(v, _) if *v > 1.8e19),
        "got {ev:?}"
    );
}

#[test]
fn overflowing_magnitude_is_infinite() {
    let ev = events(ParseOptions::default(), b"1e309");
    assert!(
        matches!(&ev[1], Event::Dub(v, _) if v.is_infinite() && *v > 0.0),
        "got {ev:?}"
    );
}

#[test]
fn exponent_overflow_is_an_error() {
    assert_eq!(
        fail(ParseOptions::default(), b"1e9999999999"),
        Error::ExponentOverflow
    );
}

#[test]
fn number_split_across_chunks_emits_fragments() {
    let ev = events_chunked(ParseOptions::default(), &[b"12", b"3.5", b"e2"]);
    assert_eq!(
        ev,
        vec![
            Event::DocBegin,
            Event::NumPart(b"12".to_vec()),
            Event::NumPart(b"3.5".to_vec()),
            Event::Dub(12350.0, b"e2".to_vec()),
            Event::DocEnd,
        ]
    );
}

#[rstest]
#[case::bare_point(&b"1."[..])]
#[case::point_before_exponent(&b"1.e5"[..])]
#[case::empty_signed_exponent(&b"1e+"[..])]
#[case::leading_plus(&b"+1"[..])]
#[case::bare_point_value(&b".5"[..])]
fn malformed_numbers_are_syntax_errors(#[case] input: &[u8]) {
    assert_eq!(fail(ParseOptions::default(), input), Error::Syntax);
}

#[test]
fn leading_zero_ends_the_number() {
    // "01" parses as the document 0 with "1" left over
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder::default();
    let n = parser.write_some(&mut rec, b"01", false).unwrap();
    assert_eq!(n, 1);
    assert_eq!(rec.events[1], Event::Int(0, b"0".to_vec()));
}

//--------------------------------------------------------------------------
// strings and escapes

#[test]
fn simple_escapes() {
    let ev = events(ParseOptions::default(), br#""a\nb\tc\\d\/e\"f\b\fg""#);
    assert_eq!(
        ev,
        vec![
            Event::DocBegin,
            Event::StrPart(b"a".to_vec()),
            Event::Str(b"\nb\tc\\d/e\"f\x08\x0Cg".to_vec()),
            Event::DocEnd,
        ]
    );
}

#[test]
fn unicode_escapes_with_lookahead() {
    let ev = events(
        ParseOptions::default(),
        br#""\u0041\u00e9\u20ac\ud83d\ude00""#,
    );
    assert_eq!(ev[1], Event::Str("Aé€😀".as_bytes().to_vec()));
}

#[test]
fn unicode_escape_split_mid_digits() {
    let ev = events_chunked(ParseOptions::default(), &[b"\"\\u0", b"0e9\""]);
    assert_eq!(ev[1], Event::Str("é".as_bytes().to_vec()));
}

#[test]
fn surrogate_pair_split_between_halves() {
    let ev = events_chunked(ParseOptions::default(), &[br#""\ud83d"#, br#"\ude00""#]);
    assert_eq!(ev[1], Event::Str("😀".as_bytes().to_vec()));
}

#[rstest]
#[case::with_lookahead(&br#""\ude00xxxxxxxx""#[..])]
#[case::without_lookahead(&br#""\ude00""#[..])]
fn lone_trailing_surrogate(#[case] input: &[u8]) {
    assert_eq!(
        fail(ParseOptions::default(), input),
        Error::IllegalTrailingSurrogate
    );
}

#[rstest]
#[case::with_lookahead(&br#""\ud800xxxxxxxx""#[..])]
#[case::without_lookahead(&br#""\ud800x""#[..])]
fn unpaired_leading_surrogate(#[case] input: &[u8]) {
    assert_eq!(
        fail(ParseOptions::default(), input),
        Error::IllegalLeadingSurrogate
    );
}

#[test]
fn leading_surrogate_with_non_trailing_partner() {
    // enough lookahead for the paired fast path
    assert_eq!(
        fail(ParseOptions::default(), br#""\ud800\u0041xx""#),
        Error::IllegalTrailingSurrogate
    );
    // and the same pair decoded one resume point at a time
    assert_eq!(
        fail_chunked(
            ParseOptions::default(),
            &[br#""\ud8"#, br#"00\u00"#, br#"41""#]
        ),
        Error::IllegalTrailingSurrogate
    );
}

#[rstest]
#[case::with_lookahead(&br#""\u12G4xxxxxxx""#[..])]
#[case::without_lookahead(&br#""\u12G""#[..])]
fn bad_hex_digit(#[case] input: &[u8]) {
    assert_eq!(
        fail(ParseOptions::default(), input),
        Error::ExpectedHexDigit
    );
}

#[test]
fn unescaped_control_byte_is_syntax() {
    assert_eq!(fail(ParseOptions::default(), b"\"a\x01b\""), Error::Syntax);
}

#[test]
fn unknown_escape_is_syntax() {
    assert_eq!(fail(ParseOptions::default(), br#""\x""#), Error::Syntax);
}

#[test]
fn unescaped_text_is_fragmented_zero_copy() {
    let ev = events_chunked(ParseOptions::default(), &[b"\"abc", b"def\""]);
    assert_eq!(
        ev,
        vec![
            Event::DocBegin,
            Event::StrPart(b"abc".to_vec()),
            Event::Str(b"def".to_vec()),
            Event::DocEnd,
        ]
    );
}

#[test]
fn long_escaped_string_flushes_the_scratch_buffer() {
    let mut input = Vec::new();
    input.extend_from_slice(b"\"\\n");
    input.extend_from_slice(&[b'a'; 5000]);
    input.push(b'"');
    let ev = events(ParseOptions::default(), &input);
    // one full scratch buffer, then the remainder
    assert!(matches!(&ev[1], Event::StrPart(b) if b.len() == 4096));
    assert!(matches!(&ev[2], Event::Str(b) if b.len() == 905));
    let mut expected = vec![b'\n'];
    expected.extend_from_slice(&[b'a'; 5000]);
    assert_eq!(coalesce(&ev)[1], Event::Str(expected));
}

#[test]
fn key_events_for_object_members() {
    let ev = events(ParseOptions::default(), br#"{"k":1,"":2}"#);
    assert_eq!(ev[2], Event::Key(b"k".to_vec()));
    assert_eq!(ev[4], Event::Key(b"".to_vec()));
}

//--------------------------------------------------------------------------
// UTF-8 validation

#[test]
fn multibyte_text_passes_validation() {
    let ev = events(ParseOptions::default(), "\"héllo € 😀\"".as_bytes());
    assert_eq!(ev[1], Event::Str("héllo € 😀".as_bytes().to_vec()));
}

#[test]
fn sequence_split_across_chunks_loses_no_bytes() {
    // "é" is C3 A9; cut between the two bytes
    let ev = events_chunked(ParseOptions::default(), &[&[0x22, 0xC3], &[0xA9, 0x22]]);
    assert_eq!(
        ev,
        vec![
            Event::DocBegin,
            Event::StrPart(vec![0xC3]),
            Event::Str(vec![0xA9]),
            Event::DocEnd,
        ]
    );
    assert_eq!(coalesce(&ev)[1], Event::Str("é".as_bytes().to_vec()));
}

#[test]
fn four_byte_sequence_fed_one_byte_at_a_time() {
    let mut input = vec![0x22];
    input.extend_from_slice("😀".as_bytes());
    input.push(0x22);
    let ev = events_split(ParseOptions::default(), &input, 1);
    assert_eq!(coalesce(&ev)[1], Event::Str("😀".as_bytes().to_vec()));
}

#[rstest]
#[case::invalid_lead(&[0x22, 0xFF, 0x22][..])]
#[case::overlong_three_byte(&[0x22, 0xE0, 0x80, 0xAF, 0x22][..])]
#[case::encoded_surrogate(&[0x22, 0xED, 0xA0, 0x80, 0x22][..])]
#[case::past_max_scalar(&[0x22, 0xF4, 0x90, 0x80, 0x80, 0x22][..])]
fn invalid_utf8_is_rejected(#[case] input: &[u8]) {
    assert_eq!(fail(ParseOptions::default(), input), Error::Syntax);
}

#[test]
fn invalid_utf8_passes_through_when_allowed() {
    let opt = ParseOptions {
        allow_invalid_utf8: true,
        ..ParseOptions::default()
    };
    let ev = events(opt, &[0x22, 0xFF, 0x22]);
    assert_eq!(ev[1], Event::Str(vec![0xFF]));
    // buffered mode after an escape keeps the raw byte too
    let ev = events(opt, &[0x22, b'\\', b'n', 0xFF, 0x22]);
    assert_eq!(ev[1], Event::Str(vec![b'\n', 0xFF]));
}

//--------------------------------------------------------------------------
// literals

#[rstest]
#[case::true_split(&[&b"tru"[..], &b"e"[..]][..], Event::Bool(true))]
#[case::false_split(&[&b"fals"[..], &b"e"[..]][..], Event::Bool(false))]
#[case::null_split(&[&b"nul"[..], &b"l"[..]][..], Event::Null)]
fn literals_split_across_chunks(#[case] chunks: &[&[u8]], #[case] expected: Event) {
    assert_eq!(
        events_chunked(ParseOptions::default(), chunks),
        vec![Event::DocBegin, expected, Event::DocEnd]
    );
}

#[test]
fn mismatched_false_with_lookahead() {
    assert_eq!(fail(ParseOptions::default(), b"falze"), Error::ExpectedFalse);
}

#[test]
fn mismatched_false_byte_by_byte() {
    assert_eq!(
        fail_chunked(ParseOptions::default(), &[b"f", b"a", b"l", b"z"]),
        Error::Syntax
    );
}

#[test]
fn mismatched_null_with_lookahead() {
    assert_eq!(fail(ParseOptions::default(), b"nulk"), Error::Syntax);
}

//--------------------------------------------------------------------------
// comments

#[test]
fn line_comment_between_elements() {
    let ev = events(lenient(), b"[1, // c\n 2]");
    assert_eq!(
        ev,
        vec![
            Event::DocBegin,
            Event::ArrBegin,
            Event::Int(1, b"1".to_vec()),
            Event::Com(b"// c\n".to_vec()),
            Event::Int(2, b"2".to_vec()),
            Event::ArrEnd,
            Event::DocEnd,
        ]
    );
}

#[test]
fn block_comment_with_consecutive_stars() {
    let ev = events(lenient(), b"[1 /* **/ ,2]");
    assert_eq!(ev[3], Event::Com(b"/* **/".to_vec()));
    assert_eq!(ev[4], Event::Int(2, b"2".to_vec()));
}

#[test]
fn comment_before_the_value() {
    let ev = events(lenient(), b"// c\n42");
    assert_eq!(
        ev,
        vec![
            Event::DocBegin,
            Event::Com(b"// c\n".to_vec()),
            Event::Int(42, b"42".to_vec()),
            Event::DocEnd,
        ]
    );
}

#[test]
fn trailing_line_comment_closed_by_end_of_input() {
    let ev = events(lenient(), b"1 // done");
    assert_eq!(
        ev,
        vec![
            Event::DocBegin,
            Event::Int(1, b"1".to_vec()),
            Event::Com(b"// done".to_vec()),
            Event::DocEnd,
        ]
    );
}

#[test]
fn unterminated_block_comment_is_incomplete() {
    let (r, ev) = run_chunks(lenient(), &[b"1 /* x"]);
    assert_eq!(r.unwrap_err(), Error::Incomplete);
    assert_eq!(*ev.last().unwrap(), Event::ComPart(b"/* x".to_vec()));
}

#[test]
fn comment_fragments_keep_their_delimiters() {
    let ev = events_chunked(lenient(), &[b"[ /* a", b"b */ 1]"]);
    assert_eq!(ev[2], Event::ComPart(b"/* a".to_vec()));
    assert_eq!(ev[3], Event::Com(b"b */".to_vec()));
    assert_eq!(coalesce(&ev)[2], Event::Com(b"/* ab */".to_vec()));
}

#[test]
fn comment_split_between_delimiter_bytes() {
    // block comment cut between '/' and '*'
    let ev = events_chunked(lenient(), &[b"[1 /", b"* c */ ,2]"]);
    assert_eq!(ev[3], Event::ComPart(b"/".to_vec()));
    assert_eq!(coalesce(&ev)[3], Event::Com(b"/* c */".to_vec()));
    // line comment cut between the two slashes
    let ev = events_chunked(lenient(), &[b"[1 /", b"/ c\n, 2]"]);
    assert_eq!(coalesce(&ev)[3], Event::Com(b"// c\n".to_vec()));
}

#[test]
fn comments_in_object_punctuation_positions() {
    let ev = events(lenient(), br#"{ /*a*/ "k" /*b*/ : /*c*/ 1 /*d*/ , "m":2 }"#);
    let coms = ev.iter().filter(|e| matches!(e, &&Event::Com(_))).count();
    assert_eq!(coms, 4);
    let keys = ev.iter().filter(|e| matches!(e, &&Event::Key(_))).count();
    assert_eq!(keys, 2);
}

#[test]
fn comments_rejected_by_default() {
    assert_eq!(fail(ParseOptions::default(), b"[1, // c\n 2]"), Error::Syntax);
}

//--------------------------------------------------------------------------
// trailing commas

#[rstest]
#[case::array(&b"[1,2,]"[..])]
#[case::object(&br#"{"a":1,}"#[..])]
fn trailing_commas_when_enabled(#[case] input: &[u8]) {
    let _ = events(lenient(), input);
}

#[rstest]
#[case::array(&b"[1,2,]"[..])]
#[case::object(&br#"{"a":1,}"#[..])]
fn trailing_commas_rejected_by_default(#[case] input: &[u8]) {
    assert_eq!(fail(ParseOptions::default(), input), Error::Syntax);
}

//--------------------------------------------------------------------------
// depth and aborts

#[test]
fn nesting_past_max_depth_fails_before_the_begin_event() {
    let opt = ParseOptions {
        max_depth: 3,
        ..ParseOptions::default()
    };
    let (r, ev) = run_chunks(opt, &[b"[[[["]);
    assert_eq!(r.unwrap_err(), Error::TooDeep);
    let begins = ev.iter().filter(|e| **e == Event::ArrBegin).count();
    assert_eq!(begins, 3);
}

#[test]
fn nesting_at_max_depth_is_fine() {
    let opt = ParseOptions {
        max_depth: 3,
        ..ParseOptions::default()
    };
    let _ = events(opt, b"[[[1]]]");
}

#[test]
fn handler_error_stops_the_parse() {
    let mut parser = Parser::new(ParseOptions::default());
    let mut rec = Recorder {
        fail_at: Some(3),
        ..Recorder::default()
    };
    let e = parser.write_some(&mut rec, b"[1,2]", false).unwrap_err();
    assert_eq!(e, Error::HandlerAbort);
    assert_eq!(parser.last_error(), Some(Error::HandlerAbort));
    assert_eq!(
        rec.events,
        vec![
            Event::DocBegin,
            Event::ArrBegin,
            Event::Int(1, b"1".to_vec()),
        ]
    );
}

//--------------------------------------------------------------------------
// chunking invariance

const KITCHEN_SINK: &str = r#"{
    "k": [1, 2.5e2, -3, true, false, null, "é😀 /"],
    "nested": {"in": "xAy"}, // tail comment
    "s": "a\\b", "n": -0.125,
}"#;

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[case(6)]
#[case(7)]
fn chunk_size_does_not_change_coalesced_events(#[case] size: usize) {
    let whole = coalesce(&events(lenient(), KITCHEN_SINK.as_bytes()));
    let split = coalesce(&events_split(lenient(), KITCHEN_SINK.as_bytes(), size));
    assert_eq!(whole, split, "chunk size {size}");
}

/// Property: cutting the input at arbitrary byte positions, including inside
/// escapes, numbers, literals, comments, and UTF-8 sequences, must not change
/// the coalesced event sequence.
#[test]
fn partition_invariance_quickcheck() {
    fn prop(splits: Vec<usize>) -> bool {
        let doc = KITCHEN_SINK.as_bytes();
        let reference = coalesce(&events(lenient(), doc));

        let mut parser = Parser::new(lenient());
        let mut rec = Recorder::default();
        let mut idx = 0;
        let mut remaining = doc.len();
        for s in splits {
            if remaining == 0 {
                break;
            }
            let size = 1 + (s % remaining);
            let end = idx + size;
            parser.write_some(&mut rec, &doc[idx..end], true).unwrap();
            idx = end;
            remaining -= size;
        }
        if remaining > 0 {
            parser.write_some(&mut rec, &doc[idx..], false).unwrap();
        } else {
            parser.write_some(&mut rec, b"", false).unwrap();
        }

        coalesce(&rec.events) == reference
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<usize>) -> bool);
}

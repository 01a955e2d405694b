//! Push-mode JSON parser core.
//!
//! Overview
//! - [`Parser::write_some`] consumes one chunk of bytes and drives a
//!   [`Handler`] with parse events. When a chunk ends mid-token the parser
//!   suspends: the productions pending at that point each push a resume tag
//!   onto the suspend stack, innermost first, and the next call re-enters
//!   them from the outside in. Any partially scanned text is either flushed
//!   through a `*_part` event or captured in the number/surrogate
//!   accumulators first, so nothing borrowed from the chunk survives the
//!   call.
//! - Each production is one method built around `loop { match state }`; the
//!   state tags double as the resume points recorded on the stack. The
//!   internal result type [`Fsm`] distinguishes "suspended, need more input"
//!   from a terminal error, and converts from [`Error`] so handler results
//!   propagate with `?`.
//!
//! Buffers and borrowing
//! - String content without escapes is emitted zero-copy as slices of the
//!   current chunk. The first escape switches the string to a bounded
//!   scratch buffer ([`buffer::TempBuffer`]) that is flushed through
//!   `*_part` events when full, at the closing quote, and whenever input
//!   runs out; the scratch is empty at every suspension point.
//! - Number text fragments always cover exactly the bytes consumed by the
//!   current call, so concatenating `on_number_part` fragments with the
//!   terminal event's text reproduces the literal.

mod buffer;
mod cursor;
mod error;
mod handler;
mod number;
mod options;
mod scan;
mod stack;
mod utf8;

#[cfg(test)]
mod tests;

use bstr::ByteSlice;

use self::{
    buffer::TempBuffer,
    cursor::Cursor,
    error::{Fsm, Interrupt},
    number::NumberAcc,
    stack::{Frame, State, SuspendStack},
};

pub use self::{error::Error, handler::Handler, options::ParseOptions};

/// Value production selected by the first byte.
#[derive(Clone, Copy)]
enum Prod {
    Err,
    Str,
    Obj,
    Arr,
    Tru,
    Fal,
    Nul,
    Minus,
    Zero,
    Digit,
    Com,
}

static DISPATCH: [Prod; 256] = build_dispatch();

const fn build_dispatch() -> [Prod; 256] {
    let mut t = [Prod::Err; 256];
    t[b'"' as usize] = Prod::Str;
    t[b'-' as usize] = Prod::Minus;
    t[b'/' as usize] = Prod::Com;
    t[b'0' as usize] = Prod::Zero;
    let mut d = b'1';
    while d <= b'9' {
        t[d as usize] = Prod::Digit;
        d += 1;
    }
    t[b'[' as usize] = Prod::Arr;
    t[b'f' as usize] = Prod::Fal;
    t[b'n' as usize] = Prod::Nul;
    t[b't' as usize] = Prod::Tru;
    t[b'{' as usize] = Prod::Obj;
    t
}

/// Where a comment is being parsed; decides what happens after it closes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CommentCtx {
    /// Value position: a value must follow the comment.
    Value,
    /// Between container punctuation: the caller resumes its own loop.
    Member,
    /// After the top-level value: a line comment at true end of input is
    /// implicitly closed by the end of the document.
    Trailing,
}

/// Incremental push parser.
///
/// Feed chunks with [`write_some`](Parser::write_some); events go to the
/// [`Handler`] passed to each call. One instance parses one document at a
/// time; call [`reset`](Parser::reset) to start another.
#[derive(Debug)]
pub struct Parser {
    opt: ParseOptions,
    st: SuspendStack,
    temp: TempBuffer,
    depth: u32,
    more: bool,
    complete: bool,
    is_key: bool,
    u1: u32,
    u2: u32,
    last_error: Option<Error>,
}

impl Parser {
    /// Creates a parser with the given options.
    #[must_use]
    pub fn new(opt: ParseOptions) -> Self {
        Parser {
            opt,
            st: SuspendStack::default(),
            temp: TempBuffer::new(),
            depth: 0,
            more: true,
            complete: false,
            is_key: false,
            u1: 0,
            u2: 0,
            last_error: None,
        }
    }

    /// The options this parser was built with.
    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.opt
    }

    /// True once the top-level value (and `on_document_end`) is done.
    #[must_use]
    pub fn done(&self) -> bool {
        self.complete
    }

    /// Current container nesting depth.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The error that ended the current document, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    /// Discards all transient state so the parser can take a new document.
    pub fn reset(&mut self) {
        self.st.clear();
        self.temp.clear();
        self.depth = 0;
        self.more = true;
        self.complete = false;
        self.is_key = false;
        self.u1 = 0;
        self.u2 = 0;
        self.last_error = None;
    }

    /// Parses some of `data`, emitting events into `handler`.
    ///
    /// `more` tells the parser whether another chunk may follow; pass
    /// `false` on the final chunk so an input that ends mid-token is
    /// reported as [`Error::Incomplete`] instead of suspending forever.
    ///
    /// Returns the number of bytes consumed. Once the document completes,
    /// trailing whitespace (and trailing comments, when enabled) is still
    /// consumed, but any other trailing bytes are left unconsumed without
    /// error.
    ///
    /// # Errors
    ///
    /// Any [`Error`], including one returned by a handler callback. Errors
    /// are terminal for this document.
    pub fn write_some<H: Handler>(
        &mut self,
        handler: &mut H,
        data: &[u8],
        more: bool,
    ) -> Result<usize, Error> {
        self.last_error = None;
        self.more = more;
        let mut cur = Cursor::new(data);
        if self.st.is_empty() {
            // first call for this document
            self.depth = 0;
            self.is_key = false;
            if let Err(e) = handler.on_document_begin() {
                self.last_error = Some(e);
                return Err(e);
            }
        }
        match self.parse_document(handler, &mut cur) {
            Ok(()) => {
                if !self.complete {
                    self.complete = true;
                    if let Err(e) = handler.on_document_end() {
                        self.last_error = Some(e);
                        return Err(e);
                    }
                }
                Ok(cur.offset())
            }
            Err(Interrupt::Fail(e)) => {
                self.last_error = Some(e);
                Err(e)
            }
            Err(Interrupt::Partial) => {
                if !self.more {
                    self.last_error = Some(Error::Incomplete);
                    return Err(Error::Incomplete);
                }
                // Suspended in trailing whitespace means the document is
                // already complete; latch it so the end event fires once.
                if !self.complete
                    && self.st.peek().map(|f| f.state) == Some(State::Doc3)
                {
                    self.complete = true;
                    if let Err(e) = handler.on_document_end() {
                        self.last_error = Some(e);
                        return Err(e);
                    }
                }
                Ok(cur.offset())
            }
        }
    }

    //------------------------------------------------------------------
    // suspension helpers

    fn suspend(&mut self, state: State) {
        self.st.reserve(self.depth);
        self.st.push(Frame { state, num: None });
    }

    fn suspend_num(&mut self, state: State, num: NumberAcc) {
        self.st.reserve(self.depth);
        self.st.push(Frame {
            state,
            num: Some(num),
        });
    }

    /// Suspends at `state` if more input is promised, then reports partial.
    fn partial(&mut self, state: State) -> Interrupt {
        if self.more {
            self.suspend(state);
        }
        Interrupt::Partial
    }

    fn partial_num(&mut self, state: State, num: NumberAcc) -> Interrupt {
        if self.more {
            self.suspend_num(state, num);
        }
        Interrupt::Partial
    }

    /// Stacks this production's own resume tag on top of a nested partial.
    fn resuspend(&mut self, r: Interrupt, state: State) -> Interrupt {
        if matches!(r, Interrupt::Partial) && self.more {
            self.suspend(state);
        }
        r
    }

    /// Skips whitespace; false when the chunk was fully consumed.
    fn skip_white(cur: &mut Cursor) -> bool {
        let n = scan::count_whitespace(cur.tail());
        cur.advance(n);
        cur.has_more()
    }

    //------------------------------------------------------------------
    // document

    fn parse_document<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        let mut st = match self.st.pop() {
            None => State::Doc1,
            Some(f) => match f.state {
                State::Doc2 => State::Doc2,
                State::Doc3 => State::Doc3,
                State::Com12 => State::Com12,
                _ => State::Doc1,
            },
        };
        loop {
            match st {
                State::Doc1 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Doc1));
                    }
                    st = State::Doc2;
                }
                State::Doc2 => {
                    match self.parse_value(h, cur) {
                        Ok(()) => {}
                        Err(r) => return Err(self.resuspend(r, State::Doc2)),
                    }
                    st = State::Doc3;
                }
                State::Doc3 => {
                    if !Self::skip_white(cur) {
                        if self.more {
                            self.suspend(State::Doc3);
                            return Err(Interrupt::Partial);
                        }
                        return Ok(());
                    }
                    if self.opt.allow_comments && cur.peek() == Some(b'/') {
                        st = State::Com12;
                        continue;
                    }
                    return Ok(());
                }
                _ => {
                    // Com12: trailing comment, then back to trailing space
                    match self.parse_comment(h, cur, CommentCtx::Trailing) {
                        Ok(()) => st = State::Doc3,
                        Err(r) => return Err(self.resuspend(r, State::Com12)),
                    }
                }
            }
        }
    }

    //------------------------------------------------------------------
    // value dispatch

    fn parse_value<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        if let Some(frame) = self.st.peek() {
            let st = frame.state;
            return self.resume_value(h, cur, st);
        }
        match DISPATCH[cur.peek().unwrap_or(0) as usize] {
            Prod::Str => self.parse_string(h, cur),
            Prod::Obj => self.parse_object(h, cur),
            Prod::Arr => self.parse_array(h, cur),
            Prod::Tru => self.parse_true(h, cur),
            Prod::Fal => self.parse_false(h, cur),
            Prod::Nul => self.parse_null(h, cur),
            Prod::Minus => self.parse_number(h, cur, b'-'),
            Prod::Zero => self.parse_number(h, cur, b'0'),
            Prod::Digit => self.parse_number(h, cur, b'+'),
            Prod::Com if self.opt.allow_comments => {
                self.parse_comment(h, cur, CommentCtx::Value)
            }
            Prod::Com | Prod::Err => Err(Error::Syntax.into()),
        }
    }

    /// Routes a suspended value to its production by the top resume tag.
    /// Each production pops its own frame on entry.
    fn resume_value<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor, st: State) -> Fsm {
        use State::{
            Arr1, Arr2, Arr3, Arr4, Com1, Com2, Com3, Com4, Com5, Com6, Com7, Com8, Com9,
            Com10, Com11, Exp1, Exp2, Exp3, Fal1, Fal2, Fal3, Fal4, Num1, Num2, Num3, Num4,
            Num5, Num6, Num7, Num8, Obj1, Obj2, Obj3, Obj4, Obj5, Obj6, Obj7, Str1, Str2,
            Str3, Str4, Str5, Str6, Str7, Sur1, Sur2, Sur3, Sur4, Sur5, Sur6, Tru1, Tru2,
            Tru3, Utf17, Utf18,
        };
        match st {
            Tru1 | Tru2 | Tru3 => self.parse_true(h, cur),
            Fal1 | Fal2 | Fal3 | Fal4 => self.parse_false(h, cur),
            Str1 | Str2 | Str3 | Str4 | Str5 | Str6 | Str7 | Sur1 | Sur2 | Sur3 | Sur4
            | Sur5 | Sur6 | Utf17 | Utf18 => self.parse_string(h, cur),
            Arr1 | Arr2 | Arr3 | Arr4 | Com10 | Com11 => self.parse_array(h, cur),
            Obj1 | Obj2 | Obj3 | Obj4 | Obj5 | Obj6 | Obj7 | Com6 | Com7 | Com8 | Com9 => {
                self.parse_object(h, cur)
            }
            Num1 | Num2 | Num3 | Num4 | Num5 | Num6 | Num7 | Num8 | Exp1 | Exp2 | Exp3 => {
                self.parse_number(h, cur, 0)
            }
            Com1 | Com2 | Com3 | Com4 | Com5 => self.parse_comment(h, cur, CommentCtx::Value),
            _ => self.parse_null(h, cur),
        }
    }

    //------------------------------------------------------------------
    // literals

    fn parse_null<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        const TAGS: [State; 3] = [State::Nul1, State::Nul2, State::Nul3];
        let mut idx = 0;
        if let Some(f) = self.st.pop() {
            idx = match f.state {
                State::Nul2 => 1,
                State::Nul3 => 2,
                _ => 0,
            };
        } else {
            if cur.remaining() >= 4 {
                if cur.tail().starts_with(b"null") {
                    h.on_null()?;
                    cur.advance(4);
                    return Ok(());
                }
                return Err(Error::Syntax.into());
            }
            cur.advance(1);
        }
        for i in idx..3 {
            match cur.peek() {
                Some(b) if b == b"ull"[i] => cur.advance(1),
                Some(_) => return Err(Error::Syntax.into()),
                None => return Err(self.partial(TAGS[i])),
            }
        }
        h.on_null()?;
        Ok(())
    }

    fn parse_true<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        const TAGS: [State; 3] = [State::Tru1, State::Tru2, State::Tru3];
        let mut idx = 0;
        if let Some(f) = self.st.pop() {
            idx = match f.state {
                State::Tru2 => 1,
                State::Tru3 => 2,
                _ => 0,
            };
        } else {
            if cur.remaining() >= 4 {
                if cur.tail().starts_with(b"true") {
                    h.on_bool(true)?;
                    cur.advance(4);
                    return Ok(());
                }
                return Err(Error::Syntax.into());
            }
            cur.advance(1);
        }
        for i in idx..3 {
            match cur.peek() {
                Some(b) if b == b"rue"[i] => cur.advance(1),
                Some(_) => return Err(Error::Syntax.into()),
                None => return Err(self.partial(TAGS[i])),
            }
        }
        h.on_bool(true)?;
        Ok(())
    }

    fn parse_false<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        const TAGS: [State; 4] = [State::Fal1, State::Fal2, State::Fal3, State::Fal4];
        let mut idx = 0;
        if let Some(f) = self.st.pop() {
            idx = match f.state {
                State::Fal2 => 1,
                State::Fal3 => 2,
                State::Fal4 => 3,
                _ => 0,
            };
        } else {
            if cur.remaining() >= 5 {
                if cur.tail()[1..5] == *b"alse" {
                    h.on_bool(false)?;
                    cur.advance(5);
                    return Ok(());
                }
                return Err(Error::ExpectedFalse.into());
            }
            cur.advance(1);
        }
        for i in idx..4 {
            match cur.peek() {
                Some(b) if b == b"alse"[i] => cur.advance(1),
                Some(_) => return Err(Error::Syntax.into()),
                None => return Err(self.partial(TAGS[i])),
            }
        }
        h.on_bool(false)?;
        Ok(())
    }

    //------------------------------------------------------------------
    // strings

    /// Emits a fragment of string or key text.
    fn emit_text_part<H: Handler>(&self, h: &mut H, text: &[u8]) -> Result<(), Error> {
        if self.is_key {
            h.on_key_part(text)
        } else {
            h.on_string_part(text)
        }
    }

    /// Emits the final fragment and leaves key mode.
    fn emit_text_final<H: Handler>(&mut self, h: &mut H, text: &[u8]) -> Result<(), Error> {
        if self.is_key {
            h.on_key(text)?;
            self.is_key = false;
            Ok(())
        } else {
            h.on_string(text)
        }
    }

    /// Flushes the scratch buffer through a `*_part` event.
    fn flush_temp<H: Handler>(&mut self, h: &mut H) -> Result<(), Error> {
        if self.temp.is_empty() {
            return Ok(());
        }
        let r = if self.is_key {
            h.on_key_part(self.temp.as_slice())
        } else {
            h.on_string_part(self.temp.as_slice())
        };
        self.temp.clear();
        r
    }

    #[allow(clippy::too_many_lines)]
    fn parse_string<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        let allow_bad = self.opt.allow_invalid_utf8;
        // Start of the pending zero-copy run; fragments restart at each call.
        let mut mark = cur.offset();
        let mut st = match self.st.pop() {
            Some(f) => f.state,
            None => {
                // at the opening quote
                cur.advance(1);
                mark = cur.offset();
                State::Str1
            }
        };
        loop {
            match st {
                // zero-copy scan of unescaped text
                State::Str1 => {
                    let run = if allow_bad {
                        scan::count_unescaped(cur.tail())
                    } else {
                        scan::count_valid_unescaped(cur.tail())
                    };
                    cur.advance(run);
                    loop {
                        match cur.peek() {
                            Some(b'"') => {
                                self.emit_text_final(h, cur.slice_from(mark))?;
                                cur.advance(1);
                                return Ok(());
                            }
                            Some(c) if !allow_bad && c & 0x80 != 0 => {
                                st = State::Utf17;
                                break;
                            }
                            Some(b'\\') => {
                                if cur.offset() > mark {
                                    self.emit_text_part(h, cur.slice_from(mark))?;
                                }
                                cur.advance(1);
                                st = State::Str3;
                                break;
                            }
                            Some(c) if c < 0x20 => return Err(Error::Syntax.into()),
                            Some(_) => cur.advance(1),
                            None => {
                                if cur.offset() > mark {
                                    self.emit_text_part(h, cur.slice_from(mark))?;
                                }
                                return Err(self.partial(State::Str1));
                            }
                        }
                    }
                }
                // validation call site of the zero-copy scanner
                State::Utf17 => match self.validate_utf8(cur) {
                    Ok(()) => st = State::Str1,
                    Err(Interrupt::Partial) => {
                        if self.more {
                            // flush the run, incomplete sequence included,
                            // before the chunk goes away
                            if cur.offset() > mark {
                                self.emit_text_part(h, cur.slice_from(mark))?;
                            }
                            self.suspend(State::Utf17);
                        }
                        return Err(Interrupt::Partial);
                    }
                    Err(r) => return Err(r),
                },
                // buffered scan once an escape was seen
                State::Str2 => loop {
                    match cur.peek() {
                        Some(b'"') => {
                            let r = if self.is_key {
                                h.on_key(self.temp.as_slice())
                            } else {
                                h.on_string(self.temp.as_slice())
                            };
                            self.temp.clear();
                            r?;
                            self.is_key = false;
                            cur.advance(1);
                            return Ok(());
                        }
                        Some(c) if !allow_bad && c & 0x80 != 0 => {
                            st = State::Utf18;
                            break;
                        }
                        Some(b'\\') => {
                            cur.advance(1);
                            st = State::Str3;
                            break;
                        }
                        Some(c) if c < 0x20 => return Err(Error::Syntax.into()),
                        Some(c) => {
                            if self.temp.needs_flush(1) {
                                self.flush_temp(h)?;
                            }
                            self.temp.push(c);
                            cur.advance(1);
                        }
                        None => {
                            self.flush_temp(h)?;
                            return Err(self.partial(State::Str2));
                        }
                    }
                },
                // validation call site of the buffered scanner
                State::Utf18 => {
                    let seq = cur.offset();
                    match self.validate_utf8(cur) {
                        Ok(()) => {
                            if self.temp.needs_flush(cur.offset() - seq) {
                                self.flush_temp(h)?;
                            }
                            self.temp.extend(cur.slice_from(seq));
                            st = State::Str2;
                        }
                        Err(Interrupt::Partial) => {
                            if self.more {
                                if self.temp.needs_flush(cur.offset() - seq) {
                                    self.flush_temp(h)?;
                                }
                                self.temp.extend(cur.slice_from(seq));
                                self.flush_temp(h)?;
                                self.suspend(State::Utf18);
                            }
                            return Err(Interrupt::Partial);
                        }
                        Err(r) => return Err(r),
                    }
                }
                // escaped character
                State::Str3 => match cur.peek() {
                    None => {
                        self.flush_temp(h)?;
                        return Err(self.partial(State::Str3));
                    }
                    Some(c) => {
                        let decoded = match c {
                            b'"' => b'"',
                            b'\\' => b'\\',
                            b'/' => b'/',
                            b'b' => 0x08,
                            b'f' => 0x0C,
                            b'n' => b'\n',
                            b'r' => b'\r',
                            b't' => b'\t',
                            b'u' => {
                                if cur.remaining() >= 11 {
                                    self.escape_u_fast(h, cur)?;
                                    st = State::Str2;
                                } else {
                                    self.flush_temp(h)?;
                                    cur.advance(1);
                                    st = State::Str4;
                                }
                                continue;
                            }
                            _ => return Err(Error::Syntax.into()),
                        };
                        if self.temp.needs_flush(1) {
                            self.flush_temp(h)?;
                        }
                        self.temp.push(decoded);
                        cur.advance(1);
                        st = State::Str2;
                    }
                },
                // \uXXXX one hex digit at a time
                State::Str4 => match self.hex_into_u1(cur, 12) {
                    Ok(()) => st = State::Str5,
                    Err(None) => return Err(self.partial(State::Str4)),
                    Err(Some(e)) => return Err(e.into()),
                },
                State::Str5 => match self.hex_into_u1(cur, 8) {
                    Ok(()) => st = State::Str6,
                    Err(None) => return Err(self.partial(State::Str5)),
                    Err(Some(e)) => return Err(e.into()),
                },
                State::Str6 => match self.hex_into_u1(cur, 4) {
                    Ok(()) => st = State::Str7,
                    Err(None) => return Err(self.partial(State::Str6)),
                    Err(Some(e)) => return Err(e.into()),
                },
                State::Str7 => match self.hex_into_u1(cur, 0) {
                    Ok(()) => {
                        if self.u1 < 0xD800 || self.u1 > 0xDFFF {
                            if self.temp.needs_flush(4) {
                                self.flush_temp(h)?;
                            }
                            self.temp.append_scalar(self.u1);
                            st = State::Str2;
                        } else if self.u1 > 0xDBFF {
                            return Err(Error::IllegalTrailingSurrogate.into());
                        } else {
                            st = State::Sur1;
                        }
                    }
                    Err(None) => return Err(self.partial(State::Str7)),
                    Err(Some(e)) => return Err(e.into()),
                },
                // trailing half of a surrogate pair: \uXXXX again
                State::Sur1 => match cur.peek() {
                    Some(b'\\') => {
                        cur.advance(1);
                        st = State::Sur2;
                    }
                    Some(_) => return Err(Error::IllegalLeadingSurrogate.into()),
                    None => return Err(self.partial(State::Sur1)),
                },
                State::Sur2 => match cur.peek() {
                    Some(b'u') => {
                        cur.advance(1);
                        st = State::Sur3;
                    }
                    Some(_) => return Err(Error::IllegalLeadingSurrogate.into()),
                    None => return Err(self.partial(State::Sur2)),
                },
                State::Sur3 => match self.hex_into_u2(cur, 12) {
                    Ok(()) => st = State::Sur4,
                    Err(None) => return Err(self.partial(State::Sur3)),
                    Err(Some(e)) => return Err(e.into()),
                },
                State::Sur4 => match self.hex_into_u2(cur, 8) {
                    Ok(()) => st = State::Sur5,
                    Err(None) => return Err(self.partial(State::Sur4)),
                    Err(Some(e)) => return Err(e.into()),
                },
                State::Sur5 => match self.hex_into_u2(cur, 4) {
                    Ok(()) => st = State::Sur6,
                    Err(None) => return Err(self.partial(State::Sur5)),
                    Err(Some(e)) => return Err(e.into()),
                },
                _ => match self.hex_into_u2(cur, 0) {
                    // Sur6
                    Ok(()) => {
                        if self.u2 < 0xDC00 || self.u2 > 0xDFFF {
                            return Err(Error::IllegalTrailingSurrogate.into());
                        }
                        let cp =
                            ((self.u1 - 0xD800) << 10) + (self.u2 - 0xDC00) + 0x10000;
                        if self.temp.needs_flush(4) {
                            self.flush_temp(h)?;
                        }
                        self.temp.append_scalar(cp);
                        st = State::Str2;
                    }
                    Err(None) => return Err(self.partial(State::Sur6)),
                    Err(Some(e)) => return Err(e.into()),
                },
            }
        }
    }

    /// One hex digit of the first escape's code unit: `u1 += d << shift`.
    /// `Err(None)` means the chunk ran out.
    fn hex_into_u1(&mut self, cur: &mut Cursor, shift: u32) -> Result<(), Option<Error>> {
        match cur.peek() {
            None => Err(None),
            Some(c) => match number::hex_digit(c) {
                None => Err(Some(Error::ExpectedHexDigit)),
                Some(d) => {
                    cur.advance(1);
                    if shift == 12 {
                        self.u1 = d << 12;
                    } else {
                        self.u1 += d << shift;
                    }
                    Ok(())
                }
            },
        }
    }

    fn hex_into_u2(&mut self, cur: &mut Cursor, shift: u32) -> Result<(), Option<Error>> {
        match cur.peek() {
            None => Err(None),
            Some(c) => match number::hex_digit(c) {
                None => Err(Some(Error::ExpectedHexDigit)),
                Some(d) => {
                    cur.advance(1);
                    if shift == 12 {
                        self.u2 = d << 12;
                    } else {
                        self.u2 += d << shift;
                    }
                    Ok(())
                }
            },
        }
    }

    /// `\u` escape with enough buffered input for a whole surrogate pair.
    /// The cursor is at the `u`.
    fn escape_u_fast<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Result<(), Error> {
        let u1 = Self::read_hex4(cur, 1)?;
        if u1 < 0xD800 || u1 > 0xDFFF {
            cur.advance(5);
            if self.temp.needs_flush(4) {
                self.flush_temp(h)?;
            }
            self.temp.append_scalar(u1);
            return Ok(());
        }
        if u1 > 0xDBFF {
            return Err(Error::IllegalTrailingSurrogate);
        }
        cur.advance(5);
        if cur.peek() != Some(b'\\') {
            return Err(Error::IllegalLeadingSurrogate);
        }
        cur.advance(1);
        if cur.peek() != Some(b'u') {
            return Err(Error::IllegalLeadingSurrogate);
        }
        cur.advance(1);
        let u2 = Self::read_hex4(cur, 0)?;
        if u2 < 0xDC00 || u2 > 0xDFFF {
            return Err(Error::IllegalTrailingSurrogate);
        }
        cur.advance(4);
        let cp = ((u1 - 0xD800) << 10) + (u2 - 0xDC00) + 0x10000;
        if self.temp.needs_flush(4) {
            self.flush_temp(h)?;
        }
        self.temp.append_scalar(cp);
        Ok(())
    }

    /// Reads four hex digits at `cur + at`. On a bad digit, advances past
    /// the valid ones among the first three, matching where the scan stops.
    fn read_hex4(cur: &mut Cursor, at: usize) -> Result<u32, Error> {
        let t = &cur.tail()[at..at + 4];
        let d1 = number::hex_digit(t[0]);
        let d2 = number::hex_digit(t[1]);
        let d3 = number::hex_digit(t[2]);
        let d4 = number::hex_digit(t[3]);
        match (d1, d2, d3, d4) {
            (Some(a), Some(b), Some(c), Some(d)) => Ok((a << 12) + (b << 8) + (c << 4) + d),
            _ => {
                let n = usize::from(d1.is_some())
                    + usize::from(d2.is_some())
                    + usize::from(d3.is_some());
                cur.advance(n);
                Err(Error::ExpectedHexDigit)
            }
        }
    }

    //------------------------------------------------------------------
    // UTF-8 validation

    /// Validates one multi-byte sequence at the cursor. With four bytes
    /// buffered this is a single masked compare; otherwise continuation
    /// bytes are checked one at a time so validation can suspend.
    fn validate_utf8(&mut self, cur: &mut Cursor) -> Fsm {
        if let Some(f) = self.st.pop() {
            return self.validate_utf8_slow(cur, f.state);
        }
        if cur.remaining() >= 4 {
            let mut w = [0u8; 4];
            w.copy_from_slice(&cur.tail()[..4]);
            return match utf8::check_word(u32::from_le_bytes(w)) {
                Some(n) => {
                    cur.advance(n);
                    Ok(())
                }
                None => Err(Error::Syntax.into()),
            };
        }
        let class = utf8::lead_class(cur.peek().unwrap_or(0));
        let start = match class {
            1 => State::Utf1,
            2 => State::Utf2,
            3 => State::Utf4,
            4 => State::Utf6,
            5 => State::Utf8,
            6 => State::Utf11,
            7 => State::Utf14,
            _ => return Err(Error::Syntax.into()),
        };
        cur.advance(1);
        self.validate_utf8_slow(cur, start)
    }

    fn validate_utf8_slow(&mut self, cur: &mut Cursor, start: State) -> Fsm {
        let mut st = start;
        loop {
            let Some(b) = cur.peek() else {
                return Err(self.partial(st));
            };
            // The first continuation byte of a sequence carries the
            // class-specific range that excludes overlongs and surrogates.
            let ok = match st {
                State::Utf2 => utf8::first_continuation_ok(2, b),
                State::Utf6 => utf8::first_continuation_ok(4, b),
                State::Utf8 => utf8::first_continuation_ok(5, b),
                State::Utf14 => utf8::first_continuation_ok(7, b),
                _ => utf8::is_continuation(b),
            };
            if !ok {
                return Err(Error::Syntax.into());
            }
            cur.advance(1);
            st = match st {
                State::Utf2 => State::Utf3,
                State::Utf4 => State::Utf5,
                State::Utf6 => State::Utf7,
                State::Utf8 => State::Utf9,
                State::Utf9 => State::Utf10,
                State::Utf11 => State::Utf12,
                State::Utf12 => State::Utf13,
                State::Utf14 => State::Utf15,
                State::Utf15 => State::Utf16,
                _ => return Ok(()),
            };
        }
    }

    //------------------------------------------------------------------
    // containers

    #[allow(clippy::too_many_lines)]
    fn parse_object<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        let mut st = match self.st.pop() {
            Some(f) => f.state,
            None => {
                // at '{'
                self.depth += 1;
                if self.depth > self.opt.max_depth {
                    return Err(Error::TooDeep.into());
                }
                h.on_object_begin()?;
                cur.advance(1);
                State::Obj1
            }
        };
        loop {
            match st {
                State::Obj1 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Obj1));
                    }
                    match cur.peek() {
                        Some(b'}') => st = State::Obj6, // close via the shared arm
                        Some(b'/') if self.opt.allow_comments => st = State::Com6,
                        Some(b'"') => {
                            self.is_key = true;
                            st = State::Obj2;
                        }
                        _ => return Err(Error::Syntax.into()),
                    }
                }
                State::Obj2 => {
                    match self.parse_string(h, cur) {
                        Ok(()) => {}
                        Err(r) => return Err(self.resuspend(r, State::Obj2)),
                    }
                    st = State::Obj3;
                }
                State::Obj3 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Obj3));
                    }
                    match cur.peek() {
                        Some(b':') => {
                            cur.advance(1);
                            st = State::Obj4;
                        }
                        Some(b'/') if self.opt.allow_comments => st = State::Com8,
                        _ => return Err(Error::Syntax.into()),
                    }
                }
                State::Obj4 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Obj4));
                    }
                    st = State::Obj5;
                }
                State::Obj5 => {
                    match self.parse_value(h, cur) {
                        Ok(()) => {}
                        Err(r) => return Err(self.resuspend(r, State::Obj5)),
                    }
                    st = State::Obj6;
                }
                State::Obj6 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Obj6));
                    }
                    match cur.peek() {
                        Some(b',') => {
                            cur.advance(1);
                            st = State::Obj7;
                        }
                        Some(b'}') => {
                            h.on_object_end()?;
                            self.depth -= 1;
                            cur.advance(1);
                            return Ok(());
                        }
                        Some(b'/') if self.opt.allow_comments => st = State::Com9,
                        _ => return Err(Error::Syntax.into()),
                    }
                }
                State::Obj7 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Obj7));
                    }
                    match cur.peek() {
                        Some(b'}') if self.opt.allow_trailing_commas => st = State::Obj6,
                        Some(b'"') => {
                            self.is_key = true;
                            st = State::Obj2;
                        }
                        Some(b'/') if self.opt.allow_comments => st = State::Com7,
                        _ => return Err(Error::Syntax.into()),
                    }
                }
                State::Com6 => match self.parse_comment(h, cur, CommentCtx::Member) {
                    Ok(()) => st = State::Obj1,
                    Err(r) => return Err(self.resuspend(r, State::Com6)),
                },
                State::Com7 => match self.parse_comment(h, cur, CommentCtx::Member) {
                    Ok(()) => st = State::Obj7,
                    Err(r) => return Err(self.resuspend(r, State::Com7)),
                },
                State::Com8 => match self.parse_comment(h, cur, CommentCtx::Member) {
                    Ok(()) => st = State::Obj3,
                    Err(r) => return Err(self.resuspend(r, State::Com8)),
                },
                _ => match self.parse_comment(h, cur, CommentCtx::Member) {
                    // Com9
                    Ok(()) => st = State::Obj6,
                    Err(r) => return Err(self.resuspend(r, State::Com9)),
                },
            }
        }
    }

    fn parse_array<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor) -> Fsm {
        let mut st = match self.st.pop() {
            Some(f) => f.state,
            None => {
                // at '['
                self.depth += 1;
                if self.depth > self.opt.max_depth {
                    return Err(Error::TooDeep.into());
                }
                h.on_array_begin()?;
                cur.advance(1);
                State::Arr1
            }
        };
        loop {
            match st {
                State::Arr1 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Arr1));
                    }
                    match cur.peek() {
                        Some(b']') => st = State::Arr3, // close via the shared arm
                        Some(b'/') if self.opt.allow_comments => st = State::Com10,
                        _ => st = State::Arr2,
                    }
                }
                State::Arr2 => {
                    match self.parse_value(h, cur) {
                        Ok(()) => {}
                        Err(r) => return Err(self.resuspend(r, State::Arr2)),
                    }
                    st = State::Arr3;
                }
                State::Arr3 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Arr3));
                    }
                    match cur.peek() {
                        Some(b',') => {
                            cur.advance(1);
                            st = State::Arr4;
                        }
                        Some(b']') => {
                            h.on_array_end()?;
                            self.depth -= 1;
                            cur.advance(1);
                            return Ok(());
                        }
                        Some(b'/') if self.opt.allow_comments => st = State::Com11,
                        _ => return Err(Error::Syntax.into()),
                    }
                }
                State::Arr4 => {
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Arr4));
                    }
                    if self.opt.allow_trailing_commas && cur.peek() == Some(b']') {
                        st = State::Arr3;
                    } else {
                        st = State::Arr2;
                    }
                }
                State::Com10 => match self.parse_comment(h, cur, CommentCtx::Member) {
                    Ok(()) => st = State::Arr1,
                    Err(r) => return Err(self.resuspend(r, State::Com10)),
                },
                _ => match self.parse_comment(h, cur, CommentCtx::Member) {
                    // Com11
                    Ok(()) => st = State::Arr3,
                    Err(r) => return Err(self.resuspend(r, State::Com11)),
                },
            }
        }
    }

    //------------------------------------------------------------------
    // numbers

    /// `first` is the dispatched leading byte class: `-`, `0`, `+` for any
    /// of 1-9, or 0 when resuming.
    #[allow(clippy::too_many_lines)]
    fn parse_number<H: Handler>(&mut self, h: &mut H, cur: &mut Cursor, first: u8) -> Fsm {
        let mark = cur.offset();
        let mut num;
        let mut st;
        match self.st.pop() {
            Some(f) => {
                num = f.num.unwrap_or_default();
                st = f.state;
            }
            None => {
                num = NumberAcc::default();
                if first == b'-' {
                    cur.advance(1);
                    num.neg = true;
                }
                st = State::Num1;
            }
        }
        loop {
            match st {
                // first digit
                State::Num1 => match cur.peek() {
                    Some(b'0') => {
                        cur.advance(1);
                        num.mant = 0;
                        st = State::Num6;
                    }
                    Some(c @ b'1'..=b'9') => {
                        cur.advance(1);
                        num.mant = u64::from(c - b'0');
                        st = State::Num2;
                    }
                    Some(_) => return Err(Error::Syntax.into()),
                    None => {
                        h.on_number_part(cur.slice_from(mark))?;
                        return Err(self.partial_num(State::Num1, num));
                    }
                },
                // significant digits left of the decimal point
                State::Num2 => loop {
                    match cur.peek() {
                        Some(c @ b'0'..=b'9') => {
                            cur.advance(1);
                            let (cut, cut_digit) = if num.neg {
                                (number::INT64_CUTOFF, number::INT64_CUTOFF_DIGIT)
                            } else {
                                (number::UINT64_CUTOFF, number::UINT64_CUTOFF_DIGIT)
                            };
                            if num.mant > cut || (num.mant == cut && c > cut_digit) {
                                num.bias += 1;
                                st = State::Num3;
                                break;
                            }
                            num.mant = 10 * num.mant + u64::from(c - b'0');
                        }
                        Some(_) => {
                            st = State::Num6;
                            break;
                        }
                        None => {
                            if self.more {
                                h.on_number_part(cur.slice_from(mark))?;
                                return Err(self.partial_num(State::Num2, num));
                            }
                            return Self::finish_int(h, cur, mark, &num);
                        }
                    }
                },
                // non-significant digits left of the decimal point
                State::Num3 => loop {
                    match cur.peek() {
                        Some(b'0'..=b'9') => {
                            cur.advance(1);
                            num.bias = num.bias.saturating_add(1);
                        }
                        Some(b'.') => {
                            cur.advance(1);
                            st = State::Num4;
                            break;
                        }
                        Some(c) if c | 32 == b'e' => {
                            cur.advance(1);
                            st = State::Exp1;
                            break;
                        }
                        Some(_) => return Self::finish_dub(h, cur, mark, &num),
                        None => {
                            if self.more {
                                h.on_number_part(cur.slice_from(mark))?;
                                return Err(self.partial_num(State::Num3, num));
                            }
                            return Self::finish_dub(h, cur, mark, &num);
                        }
                    }
                },
                // first discarded digit right of the decimal point
                State::Num4 => match cur.peek() {
                    Some(b'0'..=b'9') => {
                        cur.advance(1);
                        st = State::Num5;
                    }
                    Some(_) => return Err(Error::Syntax.into()),
                    None => {
                        h.on_number_part(cur.slice_from(mark))?;
                        return Err(self.partial_num(State::Num4, num));
                    }
                },
                // remaining discarded digits right of the decimal point
                State::Num5 => loop {
                    match cur.peek() {
                        Some(b'0'..=b'9') => cur.advance(1),
                        Some(c) if c | 32 == b'e' => {
                            cur.advance(1);
                            st = State::Exp1;
                            break;
                        }
                        Some(_) => return Self::finish_dub(h, cur, mark, &num),
                        None => {
                            if self.more {
                                h.on_number_part(cur.slice_from(mark))?;
                                return Err(self.partial_num(State::Num5, num));
                            }
                            return Self::finish_dub(h, cur, mark, &num);
                        }
                    }
                },
                // '.' or exponent after the integer part
                State::Num6 => match cur.peek() {
                    Some(b'.') => {
                        cur.advance(1);
                        st = State::Num7;
                    }
                    Some(c) if c | 32 == b'e' => {
                        cur.advance(1);
                        st = State::Exp1;
                    }
                    Some(_) => return Self::finish_int(h, cur, mark, &num),
                    None => {
                        if self.more {
                            h.on_number_part(cur.slice_from(mark))?;
                            return Err(self.partial_num(State::Num6, num));
                        }
                        return Self::finish_int(h, cur, mark, &num);
                    }
                },
                // fraction requires at least one digit
                State::Num7 => match cur.peek() {
                    Some(b'0'..=b'9') => st = State::Num8,
                    Some(_) => return Err(Error::Syntax.into()),
                    None => {
                        if self.more {
                            h.on_number_part(cur.slice_from(mark))?;
                            return Err(self.partial_num(State::Num7, num));
                        }
                        return Err(Error::Syntax.into());
                    }
                },
                // significant fraction digits
                State::Num8 => loop {
                    match cur.peek() {
                        Some(c @ b'0'..=b'9') => {
                            cur.advance(1);
                            if num.mant <= number::DOUBLE_CUTOFF {
                                num.bias -= 1;
                                num.mant = 10 * num.mant + u64::from(c - b'0');
                            } else {
                                st = State::Num5;
                                break;
                            }
                        }
                        Some(c) if c | 32 == b'e' => {
                            cur.advance(1);
                            st = State::Exp1;
                            break;
                        }
                        Some(_) => return Self::finish_dub(h, cur, mark, &num),
                        None => {
                            if self.more {
                                h.on_number_part(cur.slice_from(mark))?;
                                return Err(self.partial_num(State::Num8, num));
                            }
                            return Self::finish_dub(h, cur, mark, &num);
                        }
                    }
                },
                // optional exponent sign
                State::Exp1 => match cur.peek() {
                    Some(b'+') => {
                        cur.advance(1);
                        st = State::Exp2;
                    }
                    Some(b'-') => {
                        cur.advance(1);
                        num.exp_neg = true;
                        st = State::Exp2;
                    }
                    Some(_) => st = State::Exp2,
                    None => {
                        h.on_number_part(cur.slice_from(mark))?;
                        return Err(self.partial_num(State::Exp1, num));
                    }
                },
                // exponent requires at least one digit
                State::Exp2 => match cur.peek() {
                    Some(c @ b'0'..=b'9') => {
                        cur.advance(1);
                        num.exp = i32::from(c - b'0');
                        st = State::Exp3;
                    }
                    Some(_) => return Err(Error::Syntax.into()),
                    None => {
                        if self.more {
                            h.on_number_part(cur.slice_from(mark))?;
                            return Err(self.partial_num(State::Exp2, num));
                        }
                        return Err(Error::Syntax.into());
                    }
                },
                // remaining exponent digits
                _ => loop {
                    // Exp3
                    match cur.peek() {
                        Some(c @ b'0'..=b'9') => {
                            if num.exp > number::EXP_CUTOFF
                                || (num.exp == number::EXP_CUTOFF
                                    && c > number::EXP_CUTOFF_DIGIT)
                            {
                                return Err(Error::ExponentOverflow.into());
                            }
                            cur.advance(1);
                            num.exp = 10 * num.exp + i32::from(c - b'0');
                        }
                        Some(_) => return Self::finish_dub(h, cur, mark, &num),
                        None => {
                            if self.more {
                                h.on_number_part(cur.slice_from(mark))?;
                                return Err(self.partial_num(State::Exp3, num));
                            }
                            return Self::finish_dub(h, cur, mark, &num);
                        }
                    }
                },
            }
        }
    }

    /// Integer classification: `i64` if it fits (negatives via wrapping
    /// negation, so `i64::MIN` is exact), `u64` otherwise.
    fn finish_int<H: Handler>(
        h: &mut H,
        cur: &Cursor,
        mark: usize,
        num: &NumberAcc,
    ) -> Fsm {
        let text = cur.slice_from(mark);
        #[allow(clippy::cast_possible_wrap)]
        if num.neg {
            h.on_int64(num.mant.wrapping_neg() as i64, text)?;
        } else if i64::try_from(num.mant).is_ok() {
            h.on_int64(num.mant as i64, text)?;
        } else {
            h.on_uint64(num.mant, text)?;
        }
        Ok(())
    }

    fn finish_dub<H: Handler>(
        h: &mut H,
        cur: &Cursor,
        mark: usize,
        num: &NumberAcc,
    ) -> Fsm {
        let d = number::dec_to_float(num.mant, num.scale(), num.neg);
        h.on_double(d, cur.slice_from(mark))?;
        Ok(())
    }

    //------------------------------------------------------------------
    // comments

    fn parse_comment<H: Handler>(
        &mut self,
        h: &mut H,
        cur: &mut Cursor,
        ctx: CommentCtx,
    ) -> Fsm {
        // Fragment start; delimiters are part of the comment text.
        let mark = cur.offset();
        let mut st = match self.st.pop() {
            Some(f) => f.state,
            None => {
                // at '/'
                cur.advance(1);
                State::Com1
            }
        };
        loop {
            match st {
                State::Com1 => match cur.peek() {
                    Some(b'/') => {
                        cur.advance(1);
                        st = State::Com2;
                    }
                    Some(b'*') => {
                        cur.advance(1);
                        st = State::Com3;
                    }
                    Some(_) => return Err(Error::Syntax.into()),
                    None => {
                        // the opening '/' consumed at entry is already part
                        // of the comment text
                        if cur.offset() > mark {
                            h.on_comment_part(cur.slice_from(mark))?;
                        }
                        return Err(self.partial(State::Com1));
                    }
                },
                // line comment: scan to the newline
                State::Com2 => match cur.tail().find_byte(b'\n') {
                    Some(i) => {
                        cur.advance(i + 1);
                        return self.finish_comment(h, cur, mark, ctx);
                    }
                    None => {
                        cur.advance(cur.remaining());
                        // a document that simply stops inside a trailing
                        // line comment closes it
                        if ctx == CommentCtx::Trailing && !self.more {
                            h.on_comment(cur.slice_from(mark))?;
                            return Ok(());
                        }
                        h.on_comment_part(cur.slice_from(mark))?;
                        return Err(self.partial(State::Com2));
                    }
                },
                // block comment: scan to an asterisk
                State::Com3 => match cur.tail().find_byte(b'*') {
                    Some(i) => {
                        cur.advance(i + 1);
                        st = State::Com4;
                    }
                    None => {
                        cur.advance(cur.remaining());
                        h.on_comment_part(cur.slice_from(mark))?;
                        return Err(self.partial(State::Com3));
                    }
                },
                // asterisk seen; a slash closes, another asterisk re-arms
                State::Com4 => match cur.peek() {
                    Some(b'/') => {
                        cur.advance(1);
                        return self.finish_comment(h, cur, mark, ctx);
                    }
                    Some(b'*') => cur.advance(1),
                    Some(_) => {
                        cur.advance(1);
                        st = State::Com3;
                    }
                    None => {
                        h.on_comment_part(cur.slice_from(mark))?;
                        return Err(self.partial(State::Com4));
                    }
                },
                // value position: whitespace, then the value itself
                _ => {
                    // Com5
                    if !Self::skip_white(cur) {
                        return Err(self.partial(State::Com5));
                    }
                    return self.parse_value(h, cur);
                }
            }
        }
    }

    /// Emits the final comment fragment, then continues per context.
    fn finish_comment<H: Handler>(
        &mut self,
        h: &mut H,
        cur: &mut Cursor,
        mark: usize,
        ctx: CommentCtx,
    ) -> Fsm {
        h.on_comment(cur.slice_from(mark))?;
        if ctx == CommentCtx::Value {
            if !Self::skip_white(cur) {
                return Err(self.partial(State::Com5));
            }
            return self.parse_value(h, cur);
        }
        Ok(())
    }
}

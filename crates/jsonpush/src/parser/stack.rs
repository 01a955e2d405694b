use alloc::vec::Vec;

use crate::parser::number::NumberAcc;

/// Resume points. One tag per place a production can run out of input,
/// named after the production and the position within it.
///
/// Only the parser pushes and pops these; the numbering conventions follow
/// the grammar: `Doc*` for the document wrapper, `Com*` for comments (and
/// the comment re-entry points of the containers that host them), `Utf1`
/// through `Utf16` for continuation bytes inside the UTF-8 validator,
/// `Utf17`/`Utf18` for the string scanner's validation call sites, `Sur*`
/// for the trailing half of a surrogate pair escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Doc1,
    Doc2,
    Doc3,
    Com1,
    Com2,
    Com3,
    Com4,
    Com5,
    Com6,
    Com7,
    Com8,
    Com9,
    Com10,
    Com11,
    Com12,
    Nul1,
    Nul2,
    Nul3,
    Tru1,
    Tru2,
    Tru3,
    Fal1,
    Fal2,
    Fal3,
    Fal4,
    Str1,
    Str2,
    Str3,
    Str4,
    Str5,
    Str6,
    Str7,
    Sur1,
    Sur2,
    Sur3,
    Sur4,
    Sur5,
    Sur6,
    Utf1,
    Utf2,
    Utf3,
    Utf4,
    Utf5,
    Utf6,
    Utf7,
    Utf8,
    Utf9,
    Utf10,
    Utf11,
    Utf12,
    Utf13,
    Utf14,
    Utf15,
    Utf16,
    Utf17,
    Utf18,
    Obj1,
    Obj2,
    Obj3,
    Obj4,
    Obj5,
    Obj6,
    Obj7,
    Arr1,
    Arr2,
    Arr3,
    Arr4,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Exp1,
    Exp2,
    Exp3,
}

/// One suspended production. Number productions carry their accumulator so
/// a literal split across chunks keeps its digits.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub(crate) state: State,
    pub(crate) num: Option<NumberAcc>,
}

/// LIFO record of the productions pending when input ran out.
///
/// Productions push innermost-first as the partial result unwinds, so the
/// outermost frame ends up on top. On re-entry, routing code peeks the top
/// frame and each production pops its own frame. The stack is empty
/// whenever parsing is actively consuming input.
#[derive(Debug, Default)]
pub(crate) struct SuspendStack {
    frames: Vec<Frame>,
}

impl SuspendStack {
    /// Reserves the worst case for one unwind before the first push, so no
    /// reallocation happens while frames are being pushed: one frame per
    /// open container, plus the document, the in-flight value, and a
    /// comment or UTF-8 sequence inside it.
    pub(crate) fn reserve(&mut self, depth: u32) {
        if !self.frames.is_empty() {
            return;
        }
        self.frames.reserve(depth as usize + 3);
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }
}

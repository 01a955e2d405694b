use thiserror::Error;

/// Everything that can go wrong while parsing.
///
/// All errors are terminal for the current document: after `write_some`
/// returns one, only [`Parser::reset`](crate::Parser::reset) makes the
/// parser usable again. [`Error::Incomplete`] is raised by the driver when
/// the caller signals end of input (`more = false`) while the parser is
/// still suspended inside a production.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input violates the JSON grammar.
    #[error("syntax error")]
    Syntax,

    /// The input ended before the document was complete.
    #[error("incomplete JSON")]
    Incomplete,

    /// Nesting exceeded [`ParseOptions::max_depth`](crate::ParseOptions).
    #[error("too deep")]
    TooDeep,

    /// A number's exponent does not fit in 32 bits.
    #[error("exponent too large")]
    ExponentOverflow,

    /// A `\u` escape was not followed by four hex digits.
    #[error("expected hex digit")]
    ExpectedHexDigit,

    /// A leading surrogate escape was not followed by a `\u` escape.
    #[error("illegal leading surrogate")]
    IllegalLeadingSurrogate,

    /// A trailing surrogate escape appeared without a leading surrogate, or
    /// a leading surrogate was paired with a non-trailing code unit.
    #[error("illegal trailing surrogate")]
    IllegalTrailingSurrogate,

    /// A literal starting with `f` was not `false`.
    #[error("expected 'false'")]
    ExpectedFalse,

    /// Generic code for handlers that abort without a more specific error.
    #[error("handler aborted parsing")]
    HandlerAbort,
}

/// Outcome of one step of grammar code: keep going, suspend for more input,
/// or fail. `From<Error>` lets handler results propagate with `?`.
pub(crate) enum Interrupt {
    /// Input exhausted mid-production; state has been pushed for resumption.
    Partial,
    /// Terminal failure.
    Fail(Error),
}

impl From<Error> for Interrupt {
    fn from(e: Error) -> Self {
        Interrupt::Fail(e)
    }
}

/// Internal result type threaded through every production.
pub(crate) type Fsm = Result<(), Interrupt>;

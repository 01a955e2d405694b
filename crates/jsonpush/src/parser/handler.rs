use crate::parser::error::Error;

/// Receiver for parse events.
///
/// Every method defaults to `Ok(())`, so implementations only override the
/// events they care about. Returning an `Err` from any callback aborts the
/// current `write_some` call immediately and the error is surfaced to the
/// caller verbatim; [`Error::HandlerAbort`] is the generic choice when no
/// more specific code applies.
///
/// Byte-slice payloads (`text` arguments) point into the current input chunk
/// or the parser's internal scratch buffer and are valid only for the
/// duration of the callback. Handlers that need the data longer must copy it.
///
/// Strings, keys, numbers, and comments whose text spans a chunk boundary
/// arrive as one or more `*_part` events followed by a terminal event; the
/// concatenation of all fragments, in order, is the full text. Scalar number
/// events ([`on_int64`](Handler::on_int64) and friends) carry the final
/// fragment of the literal alongside the decoded value.
pub trait Handler {
    /// The parser has begun a new document.
    fn on_document_begin(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// The top-level value is complete. Fired exactly once per document.
    fn on_document_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// An object `{` was consumed.
    fn on_object_begin(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// An object was closed.
    fn on_object_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// An array `[` was consumed.
    fn on_array_begin(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// An array was closed.
    fn on_array_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// A fragment of an object key.
    fn on_key_part(&mut self, text: &[u8]) -> Result<(), Error> {
        let _ = text;
        Ok(())
    }

    /// The final fragment of an object key.
    fn on_key(&mut self, text: &[u8]) -> Result<(), Error> {
        let _ = text;
        Ok(())
    }

    /// A fragment of a string value.
    fn on_string_part(&mut self, text: &[u8]) -> Result<(), Error> {
        let _ = text;
        Ok(())
    }

    /// The final fragment of a string value.
    fn on_string(&mut self, text: &[u8]) -> Result<(), Error> {
        let _ = text;
        Ok(())
    }

    /// A fragment of a number literal that continues in a later chunk.
    fn on_number_part(&mut self, text: &[u8]) -> Result<(), Error> {
        let _ = text;
        Ok(())
    }

    /// A number that fits in `i64`.
    fn on_int64(&mut self, value: i64, text: &[u8]) -> Result<(), Error> {
        let _ = (value, text);
        Ok(())
    }

    /// A non-negative integer too large for `i64` but fitting in `u64`.
    fn on_uint64(&mut self, value: u64, text: &[u8]) -> Result<(), Error> {
        let _ = (value, text);
        Ok(())
    }

    /// A number with a fraction or exponent, or one too large for `u64`.
    ///
    /// The conversion from decimal text is fast but approximate; see the
    /// crate documentation.
    fn on_double(&mut self, value: f64, text: &[u8]) -> Result<(), Error> {
        let _ = (value, text);
        Ok(())
    }

    /// `true` or `false`.
    fn on_bool(&mut self, value: bool) -> Result<(), Error> {
        let _ = value;
        Ok(())
    }

    /// `null`.
    fn on_null(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// A fragment of a comment, delimiters included.
    fn on_comment_part(&mut self, text: &[u8]) -> Result<(), Error> {
        let _ = text;
        Ok(())
    }

    /// The final fragment of a comment.
    fn on_comment(&mut self, text: &[u8]) -> Result<(), Error> {
        let _ = text;
        Ok(())
    }
}

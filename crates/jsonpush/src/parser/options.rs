/// Configuration options for the push parser.
///
/// Options are fixed for the lifetime of a [`Parser`](crate::Parser); all
/// extensions are off by default, so the default configuration accepts
/// strict JSON only.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Whether to allow C and C++ style comments (`// ...`, `/* ... */`)
    /// wherever whitespace may appear.
    ///
    /// Comment text is delivered to the handler through
    /// [`on_comment_part`](crate::Handler::on_comment_part) and
    /// [`on_comment`](crate::Handler::on_comment), delimiters included.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether to allow a comma after the last element of an array or the
    /// last member of an object.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_commas: bool,

    /// Whether to pass invalid UTF-8 sequences inside strings and keys
    /// through to the handler unchanged instead of rejecting them.
    ///
    /// When `true`, string payloads are raw bytes and may not be valid
    /// UTF-8. Escape sequences are still decoded and validated.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_invalid_utf8: bool,

    /// Maximum nesting depth of arrays and objects.
    ///
    /// Opening a container beyond this depth fails with
    /// [`Error::TooDeep`](crate::Error::TooDeep).
    ///
    /// # Default
    ///
    /// `1024`
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            allow_comments: false,
            allow_trailing_commas: false,
            allow_invalid_utf8: false,
            max_depth: 1024,
        }
    }
}

/// Read-only cursor over the chunk passed to a single `write_some` call.
///
/// Positions are chunk-local; nothing here survives the call. Productions
/// mark a position with [`Cursor::offset`] and later recover the scanned
/// bytes with [`Cursor::slice_from`] to emit fragment events.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    /// Current byte, or `None` when the chunk is exhausted.
    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn has_more(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Bytes left in this chunk.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    /// Advances by `n` bytes. Callers only advance past bytes they have
    /// already inspected, so `pos` never passes the end of the chunk.
    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.data.len());
        self.pos += n;
    }

    /// The bytes consumed since `mark` (a prior `offset`).
    #[inline]
    pub(crate) fn slice_from(&self, mark: usize) -> &'a [u8] {
        &self.data[mark..self.pos]
    }

    /// The unconsumed tail of the chunk.
    #[inline]
    pub(crate) fn tail(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

//! FIFO Tracker.

/// Queue status derived from the cursor pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tracker {
    /// Write cursor.
    pub wptr_r: u32,
    /// Successor of the write cursor.
    pub wptr_n: u32,
    /// Read cursor.
    pub rptr_r: u32,
    /// No free slot is left.
    pub full: bool,
    /// No entry is stored.
    pub empty: bool,
}

impl Tracker {
    /// Computes the status of the cursor pair `(wptr_r, rptr_r)`, where `wptr_n` is the previewed successor of
    /// `wptr_r`.
    ///
    /// Equal cursors always mean empty, even when the write cursor's successor is itself.
    pub fn new(wptr_r: u32, wptr_n: u32, rptr_r: u32) -> Self {
        let empty = wptr_r == rptr_r;
        let full = !empty && wptr_n == rptr_r;
        Self { wptr_r, wptr_n, rptr_r, full, empty }
    }
}

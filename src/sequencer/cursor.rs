/// Read position in a data series, consumed front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Cursor { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.len
    }

    /// Moves past the current element. Returns true once nothing is left.
    pub fn advance(&mut self) -> bool {
        if self.index < self.len {
            self.index += 1;
        }
        self.is_exhausted()
    }

    /// Starts over on a series of `len` elements.
    pub fn rewind(&mut self, len: usize) {
        self.index = 0;
        self.len = len;
    }
}

/// Position within an ordered list of `len` items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    index: usize,
    len: usize,
}

impl PageCursor {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// True on the final item, and for an empty list.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    /// Step back; no-op at the first item. Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward; no-op at the last item. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn next_wrapping(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn previous_wrapping(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

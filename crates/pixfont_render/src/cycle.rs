/// Index following `current` in a sequence of `len` items, wrapping back to the start.
/// An empty sequence always yields 0.
#[must_use]
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current % len + 1) % len
}

/// Round-robin selection over an immutable list of fonts (or anything else)
#[derive(Clone, Copy, Debug)]
pub struct FontCycle<'a, T> {
    items: &'a [T],
    index: usize,
}

impl<'a, T> FontCycle<'a, T> {
    /// Returns `None` for an empty list, there is nothing to select from
    #[must_use]
    pub fn new(items: &'a [T]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self { items, index: 0 })
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> &'a T {
        &self.items[self.index]
    }

    /// Moves to the next item and returns it
    pub fn advance(&mut self) -> &'a T {
        self.index = next_index(self.index, self.items.len());
        self.current()
    }
}

//! Fixed-capacity ring buffer with indexed access into recent history.

/// Fixed-capacity ring buffer (append-only, overwrite-oldest when full).
///
/// Items are addressed either by offset from the latest item (`get(0)` is the most
/// recent push) or by absolute index (the `n`-th item ever pushed has index `n`).
/// Requests for items that were never pushed or have already been overwritten panic
/// rather than return stale data.
#[derive(Debug, Clone)]
pub struct RollingList<T> {
    capacity: usize,
    length: usize,
    items: Vec<T>,
}

impl<T> RollingList<T> {
    /// Creates an empty buffer holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RollingList capacity must be > 0");
        Self {
            capacity,
            length: 0,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Maximum number of items retained.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of items ever pushed.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` when nothing has been pushed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns `true` once `capacity` items have been pushed.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.length >= self.capacity
    }

    /// Absolute index of the most recent item, if any.
    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.length.checked_sub(1)
    }

    /// Absolute index of the oldest item still retained.
    #[inline]
    pub fn window_start(&self) -> usize {
        self.length.saturating_sub(self.capacity)
    }

    /// Pushes an item, returning the overwritten one once the buffer is full.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        let slot = self.length % self.capacity;
        self.length += 1;
        if self.items.len() < self.capacity {
            self.items.push(item);
            None
        } else {
            Some(std::mem::replace(&mut self.items[slot], item))
        }
    }

    /// Returns the item pushed `offset` positions before the most recent one.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not smaller than both the capacity and the number of
    /// items pushed so far.
    #[inline]
    pub fn get(&self, offset: usize) -> &T {
        assert!(
            offset < self.items.len(),
            "RollingList offset {offset} out of bounds (capacity {}, pushed {})",
            self.capacity,
            self.length
        );
        &self.items[(self.length - 1 - offset) % self.capacity]
    }

    /// Non-panicking form of [`RollingList::get`].
    #[inline]
    pub fn try_get(&self, offset: usize) -> Option<&T> {
        (offset < self.items.len()).then(|| self.get(offset))
    }

    /// Returns the item with absolute index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` lies outside `[window_start(), len())`.
    #[inline]
    pub fn get_absolute(&self, index: usize) -> &T {
        assert!(
            index < self.length && index >= self.window_start(),
            "RollingList index {index} out of bounds (window {}..{})",
            self.window_start(),
            self.length
        );
        &self.items[index % self.capacity]
    }

    /// Most recent item, if any.
    #[inline]
    pub fn latest(&self) -> Option<&T> {
        self.try_get(0)
    }

    /// Iterates over retained items from the most recent to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.items.len()).map(move |offset| self.get(offset))
    }
}

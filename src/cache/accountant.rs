//! Size Accountant Module
//!
//! Tracks byte usage against the configured budget and authorizes
//! size-changing operations.

// == Size Accountant ==
/// Byte and entry bookkeeping for a bounded cache.
///
/// Every method that returns `bool` either commits its change in full or
/// leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeAccountant {
    capacity_bytes: usize,
    current_bytes: usize,
    entry_count: usize,
}

impl SizeAccountant {
    // == Constructor ==
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            current_bytes: 0,
            entry_count: 0,
        }
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn current_bytes(&self) -> usize {
        self.current_bytes
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Bytes still free under the budget.
    pub fn available_bytes(&self) -> usize {
        self.capacity_bytes - self.current_bytes
    }

    // == Fits ==
    /// Whether `additional_bytes` more would stay within budget. Read-only.
    pub fn fits(&self, additional_bytes: usize) -> bool {
        additional_bytes <= self.available_bytes()
    }

    // == Reserve ==
    /// Accounts for a new entry of `bytes` if it fits.
    pub fn reserve(&mut self, bytes: usize) -> bool {
        if !self.fits(bytes) {
            return false;
        }
        self.current_bytes += bytes;
        self.entry_count += 1;
        true
    }

    // == Release ==
    /// Accounts for the removal of an entry of `bytes`.
    ///
    /// # Panics
    /// Releasing more bytes or entries than were reserved is an internal
    /// inconsistency and panics.
    pub fn release(&mut self, bytes: usize) {
        assert!(
            self.entry_count > 0 && bytes <= self.current_bytes,
            "internal inconsistency: releasing {bytes} bytes with {} bytes / {} entries accounted",
            self.current_bytes,
            self.entry_count
        );
        self.current_bytes -= bytes;
        self.entry_count -= 1;
    }

    // == Replace ==
    /// Swaps `old_bytes` for `new_bytes` on an existing entry if the result
    /// stays within budget. Shrinking always succeeds.
    pub fn replace(&mut self, old_bytes: usize, new_bytes: usize) -> bool {
        assert!(
            old_bytes <= self.current_bytes,
            "internal inconsistency: replacing {old_bytes} bytes with only {} accounted",
            self.current_bytes
        );
        let next = self.current_bytes - old_bytes + new_bytes;
        if next > self.capacity_bytes {
            return false;
        }
        self.current_bytes = next;
        true
    }

    // == Reset ==
    /// Returns to the empty state, keeping the budget.
    pub fn reset(&mut self) {
        self.current_bytes = 0;
        self.entry_count = 0;
    }
}

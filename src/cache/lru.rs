//! LRU List Module
//!
//! Owning store of cache entries kept in recency order.
//!
//! Entries live in an arena of slots linked into a doubly-linked list by
//! index. The list runs from least recently used (front) to most recently
//! used (back). Callers address entries through generational handles: once an
//! entry is removed its slot generation is bumped, so an old handle stops
//! resolving instead of pointing at whatever reuses the slot.

use crate::cache::CacheEntry;

// == Entry Handle ==
/// Stable, non-owning reference to an entry in an [`LruList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    node: Option<Node>,
}

// == LRU List ==
/// Arena-backed recency list.
///
/// - Front = Least recently used
/// - Back = Most recently used
///
/// Push at the back, pop at the front, removal of any handle and relocation
/// to the back are all O(1).
#[derive(Debug, Default)]
pub struct LruList {
    slots: Vec<Slot>,
    /// Vacant slot indices available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl LruList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Lookup ==
    /// Returns the entry behind `handle`, or None if the handle is stale.
    pub fn get(&self, handle: EntryHandle) -> Option<&CacheEntry> {
        self.resolve(handle)
            .and_then(|idx| self.slots[idx].node.as_ref())
            .map(|node| &node.entry)
    }

    /// Mutable access to the entry behind `handle`. Does not change recency.
    pub fn get_mut(&mut self, handle: EntryHandle) -> Option<&mut CacheEntry> {
        let idx = self.resolve(handle)?;
        self.slots[idx].node.as_mut().map(|node| &mut node.entry)
    }

    /// Handle of the least recently used entry.
    pub fn front_handle(&self) -> Option<EntryHandle> {
        self.head.map(|idx| self.handle_at(idx))
    }

    // == Push Back ==
    /// Appends an entry at the most recently used end and returns its handle.
    pub fn push_back(&mut self, entry: CacheEntry) -> EntryHandle {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx].node = Some(node);
                idx
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };
        self.link_back(idx);
        self.len += 1;
        self.handle_at(idx)
    }

    // == Pop Front ==
    /// Removes and returns the least recently used entry.
    pub fn pop_front(&mut self) -> Option<CacheEntry> {
        let idx = self.head?;
        Some(self.remove_at(idx))
    }

    // == Remove ==
    /// Removes the entry behind `handle`, wherever it sits in the list.
    ///
    /// Returns None if the handle is stale.
    pub fn remove(&mut self, handle: EntryHandle) -> Option<CacheEntry> {
        let idx = self.resolve(handle)?;
        Some(self.remove_at(idx))
    }

    // == Move To Back ==
    /// Marks an entry as most recently used.
    ///
    /// Returns false if the handle is stale.
    pub fn move_to_back(&mut self, handle: EntryHandle) -> bool {
        let Some(idx) = self.resolve(handle) else {
            return false;
        };
        if self.tail != Some(idx) {
            self.unlink(idx);
            self.link_back(idx);
        }
        true
    }

    // == Clear ==
    /// Drops every entry. Outstanding handles become stale.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    // == Iteration ==
    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    // == Internal Helpers ==
    fn resolve(&self, handle: EntryHandle) -> Option<usize> {
        let slot = self.slots.get(handle.index)?;
        (slot.generation == handle.generation && slot.node.is_some()).then_some(handle.index)
    }

    fn handle_at(&self, idx: usize) -> EntryHandle {
        EntryHandle {
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn node(&self, idx: usize) -> &Node {
        match self.slots[idx].node.as_ref() {
            Some(node) => node,
            None => panic!("internal inconsistency: linked slot {idx} is vacant"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        match self.slots[idx].node.as_mut() {
            Some(node) => node,
            None => panic!("internal inconsistency: linked slot {idx} is vacant"),
        }
    }

    fn remove_at(&mut self, idx: usize) -> CacheEntry {
        self.unlink(idx);
        let slot = &mut self.slots[idx];
        let node = match slot.node.take() {
            Some(node) => node,
            None => panic!("internal inconsistency: removing vacant slot {idx}"),
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx);
        self.len -= 1;
        node.entry
    }

    /// Detaches a node, patching its neighbours or the head/tail ends.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node_mut(idx);
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        {
            let node = self.node_mut(idx);
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(t) => self.node_mut(t).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruList`].
pub struct Iter<'a> {
    list: &'a LruList,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CacheEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.node(idx);
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

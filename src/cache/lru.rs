//! Recency List Module
//!
//! Arena-backed doubly linked list ordering entries by access time.

// == Node ==
/// Slot payload: the item plus its neighbours' slot handles.
#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// Nodes live in a `Vec` of slots and link to each other by slot index, so a
/// handle returned by [`push_front`](Self::push_front) stays valid until that
/// node is popped. Freed slots are recycled through a free list.
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as the most recently used and returns its handle.
    pub fn push_front(&mut self, item: T) -> usize {
        let node = Node {
            item,
            prev: None,
            next: self.head,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(head) => self.node_mut(head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks the node at `handle` as most recently used.
    ///
    /// Returns false if the handle does not refer to a live node.
    pub fn move_to_front(&mut self, handle: usize) -> bool {
        if self.get(handle).is_none() {
            return false;
        }
        if self.head == Some(handle) {
            return true;
        }

        self.unlink(handle);

        let old_head = self.head;
        let node = self.node_mut(handle);
        node.prev = None;
        node.next = old_head;

        match old_head {
            Some(head) => self.node_mut(head).prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
        true
    }

    // == Pop Back ==
    /// Removes and returns the least recently used item.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.unlink(idx);

        let node = match self.slots[idx].take() {
            Some(node) => node,
            None => unreachable!("tail points at free slot {idx}"),
        };
        self.free.push(idx);
        self.len -= 1;
        Some(node.item)
    }

    // == Accessors ==
    /// Returns the item at `handle`, if live.
    pub fn get(&self, handle: usize) -> Option<&T> {
        self.slots.get(handle)?.as_ref().map(|node| &node.item)
    }

    /// Returns the item at `handle` mutably, if live. Does not touch order.
    pub fn get_mut(&mut self, handle: usize) -> Option<&mut T> {
        self.slots.get_mut(handle)?.as_mut().map(|node| &mut node.item)
    }

    /// Returns the most recently used item.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|idx| self.get(idx))
    }

    /// Returns the least recently used item without removing it.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.get(idx))
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iter ==
    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> RecencyIter<'_, T> {
        RecencyIter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Number of allocated slots, live or free.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, idx: usize) -> &Node<T> {
        match self.slots.get(idx).and_then(Option::as_ref) {
            Some(node) => node,
            None => unreachable!("recency list link points at free slot {idx}"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        match self.slots.get_mut(idx).and_then(Option::as_mut) {
            Some(node) => node,
            None => unreachable!("recency list link points at free slot {idx}"),
        }
    }

    /// Detaches a node from its neighbours, leaving its own links stale.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator returned by [`RecencyList::iter`].
pub struct RecencyIter<'a, T> {
    list: &'a RecencyList<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for RecencyIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.list.node(idx);
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RecencyIter<'_, T> {}

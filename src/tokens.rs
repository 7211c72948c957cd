//! Ordered container used to accumulate tokens before they become an argument vector.
//!
//! Nodes live in an arena (`Vec` of slots linked by index) so handles stay valid
//! while other nodes are inserted or removed. Removed slots are recycled through a
//! free list; each slot carries a generation counter so a handle to a removed node
//! is rejected instead of silently addressing whatever reused the slot.

/// Handle to a node inside a [`TokenList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node<T> {
    data: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Doubly linked ordered sequence with O(1) insertion anywhere, O(1) append
/// (the tail is cached), and O(1) removal by handle.
#[derive(Debug)]
pub struct TokenList<T = String> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for TokenList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TokenList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head.map(|index| self.id_of(index))
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail.map(|index| self.id_of(index))
    }

    /// Append `data` after the current tail.
    pub fn push_back(&mut self, data: T) -> NodeId {
        match self.tail {
            Some(tail) => self.link_after(tail, data),
            None => self.link_first(data),
        }
    }

    /// Insert `data` before the current head.
    pub fn push_front(&mut self, data: T) -> NodeId {
        match self.head {
            Some(head) => self.link_before(head, data),
            None => self.link_first(data),
        }
    }

    /// Insert `data` right after `node`. Returns `None` if `node` is stale.
    pub fn insert_after(&mut self, node: NodeId, data: T) -> Option<NodeId> {
        let index = self.resolve(node)?;
        Some(self.link_after(index, data))
    }

    /// Insert `data` right before `node`. Returns `None` if `node` is stale.
    pub fn insert_before(&mut self, node: NodeId, data: T) -> Option<NodeId> {
        let index = self.resolve(node)?;
        Some(self.link_before(index, data))
    }

    /// Unlink `node` and hand its payload back.
    pub fn remove(&mut self, node: NodeId) -> Option<T> {
        let index = self.resolve(node)?;
        let slot = &mut self.slots[index];
        let removed = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);

        match removed.prev {
            Some(prev) => self.set_next(prev, removed.next),
            None => self.head = removed.next,
        }
        match removed.next {
            Some(next) => self.set_prev(next, removed.prev),
            None => self.tail = removed.prev,
        }
        self.len -= 1;
        Some(removed.data)
    }

    pub fn get(&self, node: NodeId) -> Option<&T> {
        let index = self.resolve(node)?;
        self.slots[index].node.as_ref().map(|n| &n.data)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Drop every node and payload, keeping the arena allocation.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Consume the list, yielding payloads in order.
    pub fn into_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let Some(node) = self.slots[index].node.take() else {
                break;
            };
            cursor = node.next;
            out.push(node.data);
        }
        out
    }

    fn id_of(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn resolve(&self, node: NodeId) -> Option<usize> {
        let slot = self.slots.get(node.index)?;
        if slot.generation == node.generation && slot.node.is_some() {
            Some(node.index)
        } else {
            None
        }
    }

    fn set_next(&mut self, index: usize, next: Option<usize>) {
        if let Some(node) = self.slots[index].node.as_mut() {
            node.next = next;
        }
    }

    fn set_prev(&mut self, index: usize, prev: Option<usize>) {
        if let Some(node) = self.slots[index].node.as_mut() {
            node.prev = prev;
        }
    }

    fn next_of(&self, index: usize) -> Option<usize> {
        self.slots[index].node.as_ref().and_then(|node| node.next)
    }

    fn prev_of(&self, index: usize) -> Option<usize> {
        self.slots[index].node.as_ref().and_then(|node| node.prev)
    }

    fn allocate(&mut self, node: Node<T>) -> usize {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }

    fn link_first(&mut self, data: T) -> NodeId {
        let index = self.allocate(Node {
            data,
            prev: None,
            next: None,
        });
        self.head = Some(index);
        self.tail = Some(index);
        self.id_of(index)
    }

    fn link_after(&mut self, at: usize, data: T) -> NodeId {
        let next = self.next_of(at);
        let index = self.allocate(Node {
            data,
            prev: Some(at),
            next,
        });
        self.set_next(at, Some(index));
        match next {
            Some(next) => self.set_prev(next, Some(index)),
            None => self.tail = Some(index),
        }
        self.id_of(index)
    }

    fn link_before(&mut self, at: usize, data: T) -> NodeId {
        let prev = self.prev_of(at);
        let index = self.allocate(Node {
            data,
            prev,
            next: Some(at),
        });
        self.set_prev(at, Some(index));
        match prev {
            Some(prev) => self.set_next(prev, Some(index)),
            None => self.head = Some(index),
        }
        self.id_of(index)
    }
}

/// Front-to-back iterator over a [`TokenList`].
pub struct Iter<'a, T> {
    list: &'a TokenList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let node = self.list.slots[index].node.as_ref()?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> IntoIterator for &'a TokenList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(list: &TokenList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    #[test]
    fn push_back_keeps_order() {
        let mut list = TokenList::new();
        list.push_back("cd");
        list.push_back("/tmp");
        assert_eq!(list.len(), 2);
        assert_eq!(contents(&list), vec!["cd", "/tmp"]);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut list = TokenList::new();
        let first = list.push_back("a");
        let last = list.push_back("d");
        let b = list.insert_after(first, "b").unwrap();
        list.insert_before(last, "c").unwrap();
        list.push_front("_");
        assert_eq!(contents(&list), vec!["_", "a", "b", "c", "d"]);
        assert_eq!(list.get(b), Some(&"b"));
        assert_eq!(list.tail(), Some(last));
    }

    #[test]
    fn remove_relinks_neighbours_and_updates_ends() {
        let mut list = TokenList::new();
        let a = list.push_back("a");
        let b = list.push_back("b");
        let c = list.push_back("c");

        assert_eq!(list.remove(b), Some("b"));
        assert_eq!(contents(&list), vec!["a", "c"]);

        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(list.head(), Some(c));

        assert_eq!(list.remove(c), Some("c"));
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn stale_handle_is_rejected_after_slot_reuse() {
        let mut list = TokenList::new();
        let a = list.push_back("a");
        list.remove(a);
        let reused = list.push_back("b");

        assert_eq!(list.get(a), None);
        assert_eq!(list.remove(a), None);
        assert_eq!(list.insert_after(a, "x"), None);
        assert_eq!(list.get(reused), Some(&"b"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn into_vec_follows_links_not_slots() {
        let mut list = TokenList::new();
        let tail = list.push_back("world".to_string());
        list.insert_before(tail, "hello".to_string());
        assert_eq!(list.into_vec(), vec!["hello", "world"]);
    }

    #[test]
    fn clear_disposes_everything() {
        let mut list = TokenList::new();
        let a = list.push_back(1);
        list.push_back(2);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.get(a), None);
        assert_eq!(list.iter().count(), 0);
    }
}

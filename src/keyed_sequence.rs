//! Doubly-linked, key-indexed list holding one generation of list items.
//!
//! Nodes live in an arena addressed by [`NodeId`]; `prev`/`next` links are a
//! [`Link`] that is either another node or one of the two list sentinels.
//! Ids stay stable while a node is moved, and are recycled after removal.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Derives the reconciliation key of an item.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    BeginOfList,
    Node(NodeId),
    EndOfList,
}

struct Entry<T> {
    key: String,
    value: T,
    prev: Link,
    next: Link,
}

/// Borrowed view of one node.
#[derive(Debug)]
pub struct NodeRef<'a, T> {
    pub id: NodeId,
    pub key: &'a str,
    pub value: &'a T,
    pub prev: Link,
    pub next: Link,
}

pub struct KeyedSequence<T> {
    slots: Vec<Option<Entry<T>>>,
    vacant: Vec<usize>,
    index: HashMap<String, NodeId>,
    head: Link,
    tail: Link,
    key_fn: KeyFn<T>,
}

impl<T> KeyedSequence<T> {
    pub fn new(key_fn: KeyFn<T>) -> Self {
        KeyedSequence {
            slots: Vec::new(),
            vacant: Vec::new(),
            index: HashMap::new(),
            head: Link::EndOfList,
            tail: Link::BeginOfList,
            key_fn,
        }
    }

    pub fn from_items<I>(items: I, key_fn: KeyFn<T>) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut sequence = KeyedSequence::new(key_fn);
        for item in items {
            sequence.add(item, Link::EndOfList);
        }
        sequence
    }

    pub fn key_fn(&self) -> &KeyFn<T> {
        &self.key_fn
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// First node, or `EndOfList` when empty.
    pub fn first(&self) -> Link {
        self.head
    }

    /// Last node, or `BeginOfList` when empty.
    pub fn last(&self) -> Link {
        self.tail
    }

    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.entry(id).map(|entry| NodeRef {
            id,
            key: &entry.key,
            value: &entry.value,
            prev: entry.prev,
            next: entry.next,
        })
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.entry(id).map(|entry| &entry.value)
    }

    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.entry(id).map(|entry| entry.key.as_str())
    }

    /// Link following `link`. Sentinels step onto the list ends.
    pub fn next(&self, link: Link) -> Link {
        match link {
            Link::BeginOfList => self.head,
            Link::Node(id) => self.entry(id).map_or(Link::EndOfList, |entry| entry.next),
            Link::EndOfList => Link::EndOfList,
        }
    }

    pub fn prev(&self, link: Link) -> Link {
        match link {
            Link::BeginOfList => Link::BeginOfList,
            Link::Node(id) => self.entry(id).map_or(Link::BeginOfList, |entry| entry.prev),
            Link::EndOfList => self.tail,
        }
    }

    /// Insert `value` right before `before` (`EndOfList` appends,
    /// `BeginOfList` prepends).
    pub fn add(&mut self, value: T, before: Link) -> NodeId {
        let key = (self.key_fn)(&value);
        debug_assert!(
            !self.index.contains_key(&key),
            "duplicate key '{key}' in keyed sequence"
        );

        let entry = Entry {
            key: key.clone(),
            value,
            prev: Link::BeginOfList,
            next: Link::EndOfList,
        };
        let id = match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(entry));
                NodeId(self.slots.len() - 1)
            }
        };

        self.link_before(id, before);
        self.index.insert(key, id);
        id
    }

    /// Splice `id` out of the list and hand back its value.
    ///
    /// Callers walking the list must read the node's `next` link before
    /// calling this; the removed node's links are gone afterwards.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.entry(id)?;
        self.unlink(id);
        let entry = self.slots[id.0].take()?;
        self.vacant.push(id.0);
        if self.index.get(&entry.key) == Some(&id) {
            self.index.remove(&entry.key);
        }
        Some(entry.value)
    }

    /// Relocate `id` to sit right before `before`. The node keeps its id.
    pub fn move_before(&mut self, id: NodeId, before: Link) {
        if before == Link::Node(id) || self.entry(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_before(id, before);
    }

    /// Hops from `from` to `to` following `next` links, or `None` when `to`
    /// is not reached before the end of the list.
    pub fn distance(&self, from: Link, to: NodeId) -> Option<usize> {
        let mut cursor = match from {
            Link::BeginOfList => self.head,
            other => other,
        };
        let mut hops = 0;
        while let Link::Node(id) = cursor {
            if id == to {
                return Some(hops);
            }
            hops += 1;
            cursor = self.next(cursor);
        }
        None
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            sequence: self,
            cursor: self.head,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|node| node.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|node| node.value)
    }

    pub fn into_values(mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Link::Node(id) = cursor {
            cursor = self.next(cursor);
            if let Some(entry) = self.slots[id.0].take() {
                values.push(entry.value);
            }
        }
        values
    }

    fn entry(&self, id: NodeId) -> Option<&Entry<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn link_before(&mut self, id: NodeId, before: Link) {
        let before = match before {
            Link::BeginOfList => self.head,
            other => other,
        };
        let prev = match before {
            Link::Node(anchor) => self.entry(anchor).map_or(self.tail, |entry| entry.prev),
            _ => self.tail,
        };

        if let Some(entry) = self.entry_mut(id) {
            entry.prev = prev;
            entry.next = before;
        }
        match prev {
            Link::Node(p) => {
                if let Some(entry) = self.entry_mut(p) {
                    entry.next = Link::Node(id);
                }
            }
            _ => self.head = Link::Node(id),
        }
        match before {
            Link::Node(n) => {
                if let Some(entry) = self.entry_mut(n) {
                    entry.prev = Link::Node(id);
                }
            }
            _ => self.tail = Link::Node(id),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some((prev, next)) = self.entry(id).map(|entry| (entry.prev, entry.next)) else {
            return;
        };
        match prev {
            Link::Node(p) => {
                if let Some(entry) = self.entry_mut(p) {
                    entry.next = next;
                }
            }
            _ => self.head = next,
        }
        match next {
            Link::Node(n) => {
                if let Some(entry) = self.entry_mut(n) {
                    entry.prev = prev;
                }
            }
            _ => self.tail = prev,
        }
        if let Some(entry) = self.entry_mut(id) {
            entry.prev = Link::BeginOfList;
            entry.next = Link::EndOfList;
        }
    }
}

impl<T: Clone> Clone for KeyedSequence<T> {
    fn clone(&self) -> Self {
        KeyedSequence::from_items(self.values().cloned(), Arc::clone(&self.key_fn))
    }
}

impl<T: fmt::Debug> fmt::Debug for KeyedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|node| (node.key, node.value)))
            .finish()
    }
}

pub struct Iter<'a, T> {
    sequence: &'a KeyedSequence<T>,
    cursor: Link,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let Link::Node(id) = self.cursor else {
            return None;
        };
        let node = self.sequence.node(id)?;
        self.cursor = node.next;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(items: &[&'static str]) -> KeyedSequence<&'static str> {
        KeyedSequence::from_items(items.iter().copied(), Arc::new(|s: &&str| s.to_string()))
    }

    fn order(sequence: &KeyedSequence<&'static str>) -> Vec<&'static str> {
        sequence.values().copied().collect()
    }

    #[test]
    fn empty_sequence_points_at_sentinels() {
        let sequence = letters(&[]);
        assert_eq!(sequence.first(), Link::EndOfList);
        assert_eq!(sequence.last(), Link::BeginOfList);
        assert!(sequence.is_empty());
    }

    #[test]
    fn add_before_node_and_at_end() {
        let mut sequence = letters(&["a", "c"]);
        let c = sequence.get("c").unwrap();
        sequence.add("b", Link::Node(c));
        sequence.add("d", Link::EndOfList);
        sequence.add("0", Link::BeginOfList);
        assert_eq!(order(&sequence), vec!["0", "a", "b", "c", "d"]);
        assert_eq!(sequence.len(), 5);
        assert_eq!(sequence.prev(Link::EndOfList), Link::Node(sequence.get("d").unwrap()));
    }

    #[test]
    fn remove_first_last_and_interior() {
        let mut sequence = letters(&["a", "b", "c", "d"]);
        assert_eq!(sequence.remove(sequence.get("a").unwrap()), Some("a"));
        assert_eq!(sequence.remove(sequence.get("d").unwrap()), Some("d"));
        assert_eq!(order(&sequence), vec!["b", "c"]);
        assert_eq!(sequence.remove(sequence.get("b").unwrap()), Some("b"));
        assert_eq!(sequence.remove(sequence.get("c").unwrap()), Some("c"));
        assert_eq!(sequence.first(), Link::EndOfList);
        assert_eq!(sequence.last(), Link::BeginOfList);
        assert!(!sequence.has("c"));
    }

    #[test]
    fn removed_ids_are_recycled() {
        let mut sequence = letters(&["a", "b"]);
        let a = sequence.get("a").unwrap();
        sequence.remove(a);
        assert!(sequence.value(a).is_none());
        assert!(sequence.key(a).is_none());
        let x = sequence.add("x", Link::BeginOfList);
        assert_eq!(x, a);
        assert_eq!(order(&sequence), vec!["x", "b"]);
    }

    #[test]
    fn move_keeps_key_index_consistent() {
        let mut sequence = letters(&["a", "b", "c", "d"]);
        let d = sequence.get("d").unwrap();
        let b = sequence.get("b").unwrap();
        sequence.move_before(d, Link::Node(b));
        assert_eq!(order(&sequence), vec!["a", "d", "b", "c"]);
        assert_eq!(sequence.get("d"), Some(d));
        assert_eq!(sequence.key(d), Some("d"));
        sequence.move_before(sequence.get("a").unwrap(), Link::EndOfList);
        assert_eq!(order(&sequence), vec!["d", "b", "c", "a"]);
        sequence.move_before(b, Link::Node(b));
        assert_eq!(order(&sequence), vec!["d", "b", "c", "a"]);
        assert_eq!(sequence.keys().collect::<Vec<_>>(), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn distance_counts_forward_hops() {
        let sequence = letters(&["a", "b", "c", "d"]);
        let a = Link::Node(sequence.get("a").unwrap());
        let c = sequence.get("c").unwrap();
        assert_eq!(sequence.distance(a, c), Some(2));
        assert_eq!(sequence.distance(Link::Node(c), c), Some(0));
        assert_eq!(sequence.distance(Link::BeginOfList, c), Some(2));
        assert_eq!(sequence.distance(Link::Node(c), sequence.get("a").unwrap()), None);
    }

    #[test]
    fn into_values_follows_list_order() {
        let mut sequence = letters(&["a", "b", "c"]);
        sequence.move_before(sequence.get("c").unwrap(), Link::BeginOfList);
        assert_eq!(sequence.into_values(), vec!["c", "a", "b"]);
    }
}

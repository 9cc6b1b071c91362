//! Sorted-by-frequency chain over the shared node arena.
//!
//! New entries are always inserted at the head, then bubbled forward one
//! adjacent swap at a time until order is restored (`fix_order`). Because
//! fresh insertions start at frequency 0 or 1 — always at or near the
//! bottom of the order — this keeps the whole list sorted in O(k) per call,
//! where k is the number of positions the node moves.

use crate::element::{Arena, Node, NodeId, SENTINEL};
use crate::Error;

#[derive(Debug)]
pub struct FrequencyList {
    arena: Arena,
    head: Option<NodeId>,
    count: u64,
}

impl FrequencyList {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            head: None,
            count: 0,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    fn insert_at_head(&mut self, node: Node) -> NodeId {
        let id = self.arena.insert(node);
        self.arena.get_mut(id).next = self.head;
        self.arena.get_mut(id).prev = None;
        if let Some(old_head) = self.head {
            self.arena.get_mut(old_head).prev = Some(id);
        }
        self.head = Some(id);
        self.count += 1;
        id
    }

    /// Swaps the list positions of adjacent nodes `a` (before) and `b`
    /// (after), updating neighbor links and `head` as needed.
    fn swap_adjacent(&mut self, a: NodeId, b: NodeId) {
        let p = self.arena.get(a).prev;
        let n = self.arena.get(b).next;

        self.arena.get_mut(b).prev = p;
        match p {
            Some(p) => self.arena.get_mut(p).next = Some(b),
            None => self.head = Some(b),
        }

        self.arena.get_mut(a).prev = Some(b);
        self.arena.get_mut(b).next = Some(a);

        self.arena.get_mut(a).next = n;
        if let Some(n) = n {
            self.arena.get_mut(n).prev = Some(a);
        }
    }

    /// Bubbles `id` forward while its successor has a strictly smaller
    /// frequency. Equal frequencies stop the sweep, so among ties the most
    /// recently inserted node stays closest to the head.
    fn fix_order(&mut self, id: NodeId) {
        let mut cur = id;
        loop {
            let next = match self.arena.get(cur).next {
                Some(n) => n,
                None => break,
            };
            if self.arena.get(next).frequency < self.arena.get(cur).frequency {
                self.swap_adjacent(cur, next);
            } else {
                break;
            }
        }
    }

    /// Adds or increments an entry. `byte == 0xFF` with a non-zero `freq`
    /// always inserts a fresh internal node (used when folding the tree);
    /// any other call searches for an existing leaf with that byte value,
    /// incrementing it if found or inserting a fresh leaf at frequency 1
    /// otherwise. The `freq` argument is ignored in the latter case — this
    /// mirrors the source exactly and is easy to get wrong (see the unit
    /// test below).
    ///
    /// The search branch is only ever reached while the list still holds
    /// leaves exclusively (pass 1 over the input bytes, before folding
    /// begins), so a literal 0xFF input byte cannot be confused with an
    /// internal node: no internal node exists yet when leaves are still
    /// being tallied.
    pub fn add_or_increment(&mut self, byte: u8, freq: u64) -> NodeId {
        if byte == SENTINEL && freq != 0 {
            let id = self.insert_at_head(Node::internal(freq));
            self.fix_order(id);
            return id;
        }
        let mut cur = self.head;
        while let Some(id) = cur {
            if self.arena.get(id).byte == byte {
                self.arena.get_mut(id).frequency += 1;
                self.fix_order(id);
                return id;
            }
            cur = self.arena.get(id).next;
        }
        let id = self.insert_at_head(Node::leaf(byte, 1));
        self.fix_order(id);
        id
    }

    /// Removes and returns the two smallest entries. Their tree children
    /// are retained; their list links are severed.
    pub fn extract_two_minima(&mut self) -> Result<(NodeId, NodeId), Error> {
        if self.count < 2 {
            return Err(Error::InvalidState("extract_two_minima requires at least two entries"));
        }
        let first = self.head.expect("count >= 2 implies a head");
        let second = self.arena.get(first).next.expect("count >= 2 implies a second node");
        let third = self.arena.get(second).next;
        if let Some(t) = third {
            self.arena.get_mut(t).prev = None;
        }
        self.head = third;
        self.count -= 2;
        self.arena.get_mut(first).prev = None;
        self.arena.get_mut(first).next = None;
        self.arena.get_mut(second).prev = None;
        self.arena.get_mut(second).next = None;
        Ok((first, second))
    }

    /// Verifies the universal sorted-list invariant; used by tests.
    #[cfg(test)]
    fn is_sorted(&self) -> bool {
        let mut cur = self.head;
        while let Some(id) = cur {
            if let Some(next) = self.arena.get(id).next {
                if self.arena.get(next).frequency < self.arena.get(id).frequency {
                    return false;
                }
                cur = Some(next);
            } else {
                cur = None;
            }
        }
        true
    }

    /// Consumes the list, handing its arena and the final merged root to
    /// the caller. Used by `HuffmanTree::build`.
    pub(crate) fn into_parts(self) -> (Arena, Option<NodeId>) {
        (self.arena, self.head)
    }

    /// Places the non-leaf child on the left unless both `a` and `b` are
    /// leaves, in which case insertion order (`a` left, `b` right) is kept.
    pub(crate) fn connect(&mut self, parent: NodeId, a: NodeId, b: NodeId) {
        if self.arena.get(b).is_leaf {
            self.arena.get_mut(parent).left = Some(a);
            self.arena.get_mut(parent).right = Some(b);
        } else {
            self.arena.get_mut(parent).left = Some(b);
            self.arena.get_mut(parent).right = Some(a);
        }
    }
}

impl Default for FrequencyList {
    fn default() -> Self {
        Self::new()
    }
}

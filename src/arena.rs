//! Index-addressed storage for skip-list towers.
//!
//! Nodes never refer to each other by pointer; every forward link is the
//! index of a slot in the [`Arena`]. Splicing a tower in or out of the list
//! therefore involves no aliasing, and removal frees a slot explicitly so it
//! can be reused by a later insertion.

use std::{iter, mem, ops};

/// Index of a node slot within the [`Arena`].
pub(crate) type NodeId = usize;

/// A forward reference to another tower, or `None` at the end of a level.
pub(crate) type Link = Option<NodeId>;

/// The slot of the head sentinel, which is always occupied.
pub(crate) const HEAD: NodeId = 0;

/// Minimum levels required for a list of size `n`.
pub(crate) fn levels_required(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        let num_bits = mem::size_of::<usize>() * 8;
        num_bits - n.leading_zeros() as usize
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Node
// ////////////////////////////////////////////////////////////////////////////

/// A single stored item together with its tower of forward links.
///
/// The tower's height is fixed at creation: `links` and `spans` always have
/// exactly `height` entries and are never resized. `links[0]` chains every
/// node of the list in order, while higher levels skip ahead.
///
/// `spans[i]` counts the level-0 steps covered by `links[i]`: it is the
/// difference between the base position of the linked node and the base
/// position of this one. An absent link is treated as a virtual slot just
/// past the last item, so the span of a terminal edge is the distance to the
/// end of the list. Rank queries work by summing these counters along the
/// search path, so they must be kept exact by every splice.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    /// The stored item. `None` only ever for the head sentinel.
    pub value: Option<T>,
    /// Forward link per level. This vector *must* be of length `height`.
    pub links: Vec<Link>,
    /// Level-0 steps covered by the corresponding link.
    pub spans: Vec<usize>,
}

impl<T> Node<T> {
    /// Create a new head sentinel spanning all `total_levels` levels.
    pub fn head(total_levels: usize) -> Self {
        Node {
            value: None,
            links: iter::repeat_n(None, total_levels).collect(),
            spans: iter::repeat_n(0, total_levels).collect(),
        }
    }

    /// Create a new node with the given value and tower height.
    ///
    /// All links default to absent; the caller is responsible for splicing
    /// the node in and fixing the spans at every level.
    pub fn new(value: T, height: usize) -> Self {
        debug_assert!(height >= 1, "a tower must occupy at least level 0");
        Node {
            value: Some(value),
            links: iter::repeat_n(None, height).collect(),
            spans: iter::repeat_n(0, height).collect(),
        }
    }

    /// The number of levels this node participates in.
    pub fn height(&self) -> usize {
        self.links.len()
    }

    /// Consumes the node returning the value it contains.
    pub fn into_inner(mut self) -> Option<T> {
        self.value.take()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

/// Slab of node slots with free-list reuse.
///
/// Slot [`HEAD`] is created on construction and stays occupied for the
/// lifetime of the arena; every other slot cycles between occupied and
/// vacant as items are inserted and removed.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<Node<T>>>,
    vacant: Vec<NodeId>,
}

impl<T> Arena<T> {
    /// Create an arena holding only a head sentinel of the given height.
    pub fn new(total_levels: usize) -> Self {
        Arena {
            slots: vec![Some(Node::head(total_levels))],
            vacant: Vec::new(),
        }
    }

    /// Store a node, reusing a vacant slot if one is available.
    pub fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.vacant.pop() {
            Some(id) => {
                debug_assert!(self.slots[id].is_none(), "free list held a live slot");
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Vacate a slot, returning the node it held.
    ///
    /// # Panics
    ///
    /// Panics if the slot is the head sentinel or already vacant; both
    /// indicate a corrupted list structure.
    pub fn free(&mut self, id: NodeId) -> Node<T> {
        assert_ne!(id, HEAD, "the head sentinel is never freed");
        let node = self.slots[id].take().expect("freeing a vacant arena slot");
        self.vacant.push(id);
        node
    }

    /// Drop every node and start over with a fresh head sentinel.
    pub fn clear(&mut self, total_levels: usize) {
        self.slots.clear();
        self.vacant.clear();
        self.slots.push(Some(Node::head(total_levels)));
    }

    /// Number of occupied slots, the head included.
    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }
}

impl<T> ops::Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        self.slots[id].as_ref().expect("indexed a vacant arena slot")
    }
}

impl<T> ops::IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.slots[id].as_mut().expect("indexed a vacant arena slot")
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

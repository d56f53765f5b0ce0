//! An always-sorted set of unique items with positional (rank) access.

use std::{
    cmp,
    cmp::Ordering,
    collections::HashMap,
    fmt,
    hash::{self, Hash},
    iter, ops,
};

use crate::{
    arena::{Arena, HEAD, Link, Node, NodeId, levels_required},
    level_generator::{Geometric, LevelGenerator},
};

/// Tower height of the head sentinel created by [`SkipSet::new`], bounding
/// the list to roughly `2^32` items without reallocation.
const DEFAULT_LEVELS: usize = 32;

// ////////////////////////////////////////////////////////////////////////////
// SkipSet
// ////////////////////////////////////////////////////////////////////////////

/// An ordered set backed by an order-statistics skip list.
///
/// The set keeps its items sorted at all times and rejects duplicates, like
/// [`std::collections::BTreeSet`]. On top of the usual membership operations
/// it answers two order-statistic queries in expected `O(log n)`:
///
/// - [`rank`][SkipSet::rank]: how many items are strictly smaller than a
///   given one, and
/// - [`get`][SkipSet::get]: which item sits at a given position in sorted
///   order.
///
/// Both are powered by a per-level span counter on every forward link,
/// recording how many base-level items the link skips over; summing the
/// counters along a search path yields an exact position without a full
/// scan.
///
/// Balancing is probabilistic: each inserted tower gets a geometrically
/// distributed height, so all bounds are expected rather than worst-case.
/// The structure is single-threaded; wrap it in a lock if it must be shared.
pub struct SkipSet<T> {
    arena: Arena<T>,
    len: usize,
    /// Highest level index currently occupied by any tower.
    level: usize,
    level_generator: Geometric,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> SkipSet<T>
where
    T: Ord,
{
    /// Create a new skip set with the default of 32 levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set: SkipSet<i64> = SkipSet::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_levels(DEFAULT_LEVELS)
    }

    /// Constructs a new, empty skip set with the optimal number of levels
    /// for the intended capacity. Specifically, it uses
    /// `floor(log2(capacity)) + 1` levels, ensuring that only *a few* nodes
    /// occupy the highest level.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::with_capacity(100);
    /// set.extend(0..100);
    /// assert_eq!(set.len(), 100);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_levels(levels_required(capacity))
    }

    fn with_levels(levels: usize) -> Self {
        let lg = Geometric::new(levels, 1.0 / 2.0)
            .expect("levels >= 1 and p = 0.5 are always valid parameters");
        SkipSet {
            arena: Arena::new(lg.total()),
            len: 0,
            level: 0,
            level_generator: lg,
        }
    }

    /// Returns `true` if the set contains the value.
    ///
    /// Expected `O(log n)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [1, 2, 3].into_iter().collect();
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        let mut current = HEAD;
        for level in (0..=self.level).rev() {
            loop {
                let Some(next) = self.arena[current].links[level] else {
                    break;
                };
                match self.value_of(next).cmp(value) {
                    Ordering::Less => current = next,
                    Ordering::Equal => return true,
                    Ordering::Greater => break,
                }
            }
        }
        false
    }

    /// Insert the value into the set.
    ///
    /// Returns `true` if the value was inserted, and `false` if it was
    /// already present; a duplicate insertion leaves the set untouched.
    /// Expected `O(log n)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert!(set.insert(5));
    /// assert!(set.insert(3));
    /// assert!(!set.insert(5));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        // Narrow the search window level by level, remembering for each
        // level the rightmost node strictly before the insertion point
        // together with its base position.
        let mut update: Vec<(NodeId, usize)> = vec![(HEAD, 0); self.level_generator.total()];
        let mut current = HEAD;
        let mut position = 0;
        for level in (0..=self.level).rev() {
            loop {
                let Some(next) = self.arena[current].links[level] else {
                    break;
                };
                match self.value_of(next).cmp(&value) {
                    Ordering::Less => {
                        position += self.arena[current].spans[level];
                        current = next;
                    }
                    Ordering::Equal => return false,
                    Ordering::Greater => break,
                }
            }
            update[level] = (current, position);
        }

        // A fresh tower may poke at most one level above the current
        // maximum; anything taller would be disconnected from the rest of
        // the structure.
        let old_level = self.level;
        let top = cmp::min(self.level_generator.level(), old_level + 1);
        if top > old_level {
            // The head's span at a newly occupied level covers the whole
            // list, since its link there is still absent.
            self.arena[HEAD].spans[top] = self.len;
            update[top] = (HEAD, 0);
            self.level = top;
        }

        // Splice the new tower in after each level's update node, splitting
        // the update node's span at the insertion point.
        let insert_position = position;
        let id = self.arena.alloc(Node::new(value, top + 1));
        for level in 0..=top {
            let (pred, pred_position) = update[level];
            let skipped = insert_position - pred_position;
            let pred_link = self.arena[pred].links[level];
            let pred_span = self.arena[pred].spans[level];
            {
                let node = &mut self.arena[id];
                node.links[level] = pred_link;
                node.spans[level] = pred_span - skipped;
            }
            let pred_node = &mut self.arena[pred];
            pred_node.links[level] = Some(id);
            pred_node.spans[level] = skipped + 1;
        }
        // Links above the tower now skip over one more item.
        for level in (top + 1)..=old_level {
            let (pred, _) = update[level];
            self.arena[pred].spans[level] += 1;
        }

        self.len += 1;
        true
    }

    /// Remove the value from the set.
    ///
    /// Returns `true` if the value was present, and `false` otherwise;
    /// removing an absent value leaves the set untouched. Expected
    /// `O(log n)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set: SkipSet<_> = [1, 2, 3].into_iter().collect();
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        let mut update: Vec<NodeId> = vec![HEAD; self.level + 1];
        let mut current = HEAD;
        for level in (0..=self.level).rev() {
            loop {
                let Some(next) = self.arena[current].links[level] else {
                    break;
                };
                if self.value_of(next) < value {
                    current = next;
                } else {
                    break;
                }
            }
            update[level] = current;
        }

        let Some(target) = self.arena[current].links[0] else {
            return false;
        };
        if self.value_of(target) != value {
            return false;
        }

        // Unlink the tower at every level it occupies, folding its spans
        // back into the update nodes; links that merely skip over it shrink
        // by one.
        for level in 0..=self.level {
            let pred = update[level];
            if self.arena[pred].links[level] == Some(target) {
                let removed_link = self.arena[target].links[level];
                let removed_span = self.arena[target].spans[level];
                let pred_node = &mut self.arena[pred];
                pred_node.spans[level] = pred_node.spans[level] + removed_span - 1;
                pred_node.links[level] = removed_link;
            } else {
                self.arena[pred].spans[level] -= 1;
            }
        }
        let _ = self.arena.free(target);

        // Shrink the active level count while the topmost level is empty.
        while self.level > 0 && self.arena[HEAD].links[self.level].is_none() {
            self.level -= 1;
        }

        self.len -= 1;
        true
    }

    /// Returns the number of items strictly smaller than the value, i.e.
    /// its zero-based position in sorted order, or `None` if the value is
    /// not present.
    ///
    /// `Some(0)` and `None` are distinct answers: the former means the value
    /// is the smallest item, the latter that it is absent. Expected
    /// `O(log n)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [10, 20, 30].into_iter().collect();
    /// assert_eq!(set.rank(&10), Some(0));
    /// assert_eq!(set.rank(&30), Some(2));
    /// assert_eq!(set.rank(&25), None);
    /// ```
    pub fn rank(&self, value: &T) -> Option<usize> {
        let mut current = HEAD;
        let mut position = 0;
        for level in (0..=self.level).rev() {
            loop {
                let Some(next) = self.arena[current].links[level] else {
                    break;
                };
                match self.value_of(next).cmp(value) {
                    Ordering::Less => {
                        position += self.arena[current].spans[level];
                        current = next;
                    }
                    // `position` is the base position of `current`; the
                    // remaining span bridges the gap to the target.
                    Ordering::Equal => {
                        return Some(position + self.arena[current].spans[level] - 1);
                    }
                    Ordering::Greater => break,
                }
            }
        }
        None
    }

    /// Checks the integrity of the whole structure.
    ///
    /// Asserts strict ordering on the base level, the exactness of every
    /// span at every level, the subsequence property between levels, and
    /// the consistency of the stored length.
    #[allow(dead_code)]
    fn check(&self) {
        let head = &self.arena[HEAD];
        assert_eq!(head.height(), self.level_generator.total());
        assert!(self.level < head.height());
        for level in (self.level + 1)..head.height() {
            assert!(
                head.links[level].is_none(),
                "link above the active levels at level {level}"
            );
        }

        // Walk the base level once to learn every node's position.
        let mut positions: HashMap<NodeId, usize> = HashMap::new();
        positions.insert(HEAD, 0);
        let mut current = HEAD;
        let mut count = 0;
        while let Some(next) = self.arena[current].links[0] {
            if current != HEAD {
                assert!(
                    self.value_of(current) < self.value_of(next),
                    "base level out of order"
                );
            }
            count += 1;
            positions.insert(next, count);
            current = next;
        }
        assert_eq!(count, self.len, "stored length does not match a base walk");

        for level in 0..=self.level {
            let mut current = HEAD;
            loop {
                let node = &self.arena[current];
                assert!(node.height() > level);
                let position = positions[&current];
                match node.links[level] {
                    Some(next) => {
                        assert!(
                            positions.contains_key(&next),
                            "node at level {level} is unreachable at the base level"
                        );
                        assert_eq!(
                            node.spans[level],
                            positions[&next] - position,
                            "span mismatch at level {level}"
                        );
                        current = next;
                    }
                    None => {
                        assert_eq!(
                            node.spans[level],
                            self.len - position,
                            "terminal span mismatch at level {level}"
                        );
                        break;
                    }
                }
            }
        }
    }
}

impl<T> SkipSet<T> {
    /// Returns the number of items in the set in `O(1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(0..10);
    /// assert_eq!(set.len(), 10);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no items.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert!(set.is_empty());
    ///
    /// set.insert(1);
    /// assert!(!set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the set, removing all items.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(0..10);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.level = 0;
        self.arena.clear(self.level_generator.total());
    }

    /// Provides a reference to the item at the given zero-based rank, or
    /// `None` if the rank is out of bounds.
    ///
    /// This is the inverse of [`rank`][SkipSet::rank]. Expected `O(log n)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [30, 10, 20].into_iter().collect();
    /// assert_eq!(set.get(0), Some(&10));
    /// assert_eq!(set.get(2), Some(&30));
    /// assert_eq!(set.get(3), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // Positions are 1-based internally, with the head at 0.
        let target = index + 1;
        let mut current = HEAD;
        let mut position = 0;
        for level in (0..=self.level).rev() {
            loop {
                let Some(next) = self.arena[current].links[level] else {
                    break;
                };
                let span = self.arena[current].spans[level];
                if position + span > target {
                    break;
                }
                position += span;
                current = next;
            }
        }
        debug_assert_eq!(position, target);
        self.arena[current].value.as_ref()
    }

    /// Provides a reference to the smallest item, or `None` if the set is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert!(set.front().is_none());
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.front(), Some(&1));
    /// ```
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        let first = self.arena[HEAD].links[0]?;
        self.arena[first].value.as_ref()
    }

    /// Provides a reference to the largest item, or `None` if the set is
    /// empty.
    ///
    /// Walks the towers top-down, so this is `O(log n)` rather than `O(1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert!(set.back().is_none());
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.back(), Some(&2));
    /// ```
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        let mut current = HEAD;
        for level in (0..=self.level).rev() {
            while let Some(next) = self.arena[current].links[level] {
                current = next;
            }
        }
        self.arena[current].value.as_ref()
    }

    /// Creates an iterator over the items of the set in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = [3, 1, 2].into_iter().collect();
    /// let items: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: &self.arena,
            next: self.arena[HEAD].links[0],
            remaining: self.len,
        }
    }

    /// Counts the towers of each height: entry `h` of the returned vector
    /// is the number of items whose tower occupies exactly `h + 1` levels.
    ///
    /// Purely diagnostic; the sum of all entries equals
    /// [`len`][SkipSet::len].
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<_> = (0..100).collect();
    /// let histogram = set.level_histogram();
    /// assert_eq!(histogram.iter().sum::<usize>(), 100);
    /// ```
    #[must_use]
    pub fn level_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.level + 1];
        let mut current = HEAD;
        while let Some(next) = self.arena[current].links[0] {
            histogram[self.arena[next].height() - 1] += 1;
            current = next;
        }
        histogram
    }

    /// The value carried by a non-head node.
    fn value_of(&self, id: NodeId) -> &T {
        self.arena[id]
            .value
            .as_ref()
            .expect("only the head sentinel carries no value")
    }
}

impl<T> SkipSet<T>
where
    T: fmt::Debug,
{
    /// Renders the internal structure level by level (for debugging
    /// purposes). Each edge is annotated with its span.
    #[allow(dead_code)]
    fn debug_structure(&self) -> String {
        let mut out = String::new();
        for level in (0..=self.level).rev() {
            out.push_str(&format!("level {level}: <head>"));
            let mut current = HEAD;
            loop {
                let span = self.arena[current].spans[level];
                match self.arena[current].links[level] {
                    Some(next) => {
                        out.push_str(&format!(
                            " -{span}-> [{:?}]",
                            self.arena[next].value.as_ref().expect("non-head value")
                        ));
                        current = next;
                    }
                    None => {
                        out.push_str(&format!(" -{span}-| "));
                        break;
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

// ///////////////////////////////////////////////
// Trait implementations
// ///////////////////////////////////////////////

impl<T: Ord> Default for SkipSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> iter::FromIterator<T> for SkipSet<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = SkipSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for SkipSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}

impl<T> ops::Index<usize> for SkipSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index).expect("Index out of range")
    }
}

impl<T> fmt::Debug for SkipSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry:?}")?;
        }
        write!(f, "]")
    }
}

impl<T> fmt::Display for SkipSet<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry}")?;
        }
        write!(f, "]")
    }
}

impl<T: PartialEq> PartialEq for SkipSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SkipSet<T> {}

impl<T: Hash> Hash for SkipSet<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for entry in self.iter() {
            entry.hash(state);
        }
    }
}

impl<'a, T> IntoIterator for &'a SkipSet<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for SkipSet<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> IntoIter<T> {
        let next = self.arena[HEAD].links[0];
        IntoIter {
            arena: self.arena,
            next,
            remaining: self.len,
        }
    }
}

// /////////////////////////////////
// Iterators
// /////////////////////////////////

/// Iterator over the items of a [`SkipSet`] in sorted order.
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    next: Link,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let id = self.next?;
        let node = &self.arena[id];
        self.next = node.links[0];
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> iter::FusedIterator for Iter<'_, T> {}

/// Owning iterator over the items of a [`SkipSet`] in sorted order.
pub struct IntoIter<T> {
    arena: Arena<T>,
    next: Link,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let id = self.next?;
        let node = self.arena.free(id);
        self.next = node.links[0];
        self.remaining -= 1;
        node.into_inner()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> iter::FusedIterator for IntoIter<T> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

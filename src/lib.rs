//! An order-statistics skip list: a sorted set in which elements can be
//! efficiently accessed, inserted and removed, all in `O(log n)` on average,
//! and which additionally answers *rank* and *select* queries — "how many
//! elements are smaller than this one?" and "which element is the `i`-th
//! smallest?" — in the same expected time.
//!
//! Conceptually, a skip list resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has references to nodes further down the list,
//! allowing the algorithm to effectively skip ahead. Each link additionally
//! records how many bottom-level elements it jumps over, which is what turns
//! positions into something the search can compute on the way down instead
//! of requiring a full scan.
//!
//! Balancing is probabilistic rather than structural: each element's tower
//! height is drawn from a geometric distribution at insertion time, and no
//! rebalancing or rotations ever happen afterwards. All complexity bounds
//! are therefore expected, not worst-case.
//!
//! # Example
//!
//! ```
//! use skipset::SkipSet;
//!
//! let mut set = SkipSet::new();
//! set.extend([5, 1, 3, 2, 4]);
//!
//! assert_eq!(set.rank(&3), Some(2));
//! assert_eq!(set.get(2), Some(&3));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
//! ```

mod arena;
pub mod level_generator;
mod skipset;

pub use crate::skipset::{IntoIter, Iter, SkipSet};

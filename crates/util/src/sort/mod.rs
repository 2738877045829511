//! Sorting utilities.
//!
//! Handler chains are short and re-sorted after every insertion, so a
//! stable insertion sort is all that is needed.

mod insertion;

pub use insertion::insertion_sort_by_key;

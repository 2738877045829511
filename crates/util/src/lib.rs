//! json-chain-util - helpers shared by the json-chain crates.

pub mod sort;
pub mod strings;

pub use sort::insertion_sort_by_key;
pub use strings::quote_into;

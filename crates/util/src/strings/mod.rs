//! String utilities.

mod escape;

pub use escape::quote_into;

//! One module per table. Every function takes a `&Connection` so callers
//! can compose them inside a single transaction.

pub mod claims;
pub mod points;
pub mod suggestions;
pub mod verdicts;
pub mod watermarks;

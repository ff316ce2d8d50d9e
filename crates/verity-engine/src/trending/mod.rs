//! Trending surfacing: ordering, decayed scores, admin curation.

pub mod scorer;

pub use scorer::{compare_trending, decayed_score};

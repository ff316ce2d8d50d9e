//! Unread-verdict tracking via a per-user read watermark.

pub mod tracker;

//! Points & streak ledger.

pub mod ledger;

pub(crate) use ledger::credit;

//! Directory walking
//!
//! `Walker` descends from a root up to a depth bound and hands every entry
//! to an `EntrySink`: the direct printer, the streaming pipeline, or the
//! sorted listing.

mod config;
mod filter;
mod walker;

pub use config::WalkerConfig;
pub use filter::ExcludeFilter;
pub use walker::{EntrySink, WalkSummary, Walker};

//! Listing sinks and diagnostics
//!
//! Three ways to turn walked entries into stdout lines:
//!
//! - `DirectPrinter`: render on the traversal thread (`--sequential`)
//! - `StreamingPipeline`: hand records to a printer thread (default unsorted mode)
//! - `SortedListing`: fill a `SortTree`, print once the walk is over (`--sort`)

mod diagnostics;
mod pipeline;
mod printer;
mod sorted;

pub use diagnostics::{ColorMode, Diagnostics, should_use_color};
pub use pipeline::{Consumed, StreamingPipeline, run_consumer};
pub use printer::DirectPrinter;
pub use sorted::SortedListing;

use crate::sort::SortSpec;

/// How entries flow from the walker to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMode {
    Sequential,
    Streaming,
    Sorted { spec: SortSpec, reverse: bool },
}

impl ListingMode {
    /// A sort spec always wins; `reverse` alone keeps traversal order.
    pub fn select(sort: Option<SortSpec>, reverse: bool, sequential: bool) -> Self {
        match sort {
            Some(spec) => ListingMode::Sorted { spec, reverse },
            None if sequential => ListingMode::Sequential,
            None => ListingMode::Streaming,
        }
    }
}

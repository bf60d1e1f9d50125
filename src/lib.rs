//! fls - list files recursively through a format template, optionally
//! grouped by a multi-key sort

pub mod error;
pub mod file;
pub mod format;
pub mod names;
pub mod output;
pub mod sort;
pub mod walk;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{FlsError, Result};
pub use file::{Attributes, File, FileKind};
pub use format::{DEFAULT_FORMAT, Renderer, Template};
pub use names::NameCache;
pub use output::{
    ColorMode, Diagnostics, DirectPrinter, ListingMode, SortedListing, StreamingPipeline,
};
pub use sort::{SortKey, SortSpec, SortTree};
pub use walk::{EntrySink, ExcludeFilter, WalkSummary, Walker, WalkerConfig};

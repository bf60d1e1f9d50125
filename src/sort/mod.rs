//! Multi-key sorted listing
//!
//! - `SortKey`/`SortSpec`: the `--sort` keys, each bound to one comparison domain
//! - `SortTree`: groups files level by level and drains them in key order

mod key;
mod tree;

pub use key::{
    Domain, SignedKey, SortDomain, SortKey, SortSpec, TextKey, UnsignedLargeKey,
    UnsignedSmallKey,
};
pub use tree::{Drain, SortTree};

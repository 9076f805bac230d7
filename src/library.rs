//! Library: asset discovery and the sorted track catalog.
//!
//! `scan` walks a directory and yields raw assets; `build_catalog` turns
//! them into display-ready `Track`s in their final order.

mod catalog;
mod model;
mod scan;

pub use catalog::build_catalog;
pub use model::{AssetEntry, Catalog, Track, UNKNOWN_ARTIST};
pub use scan::scan;

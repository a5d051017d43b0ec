//! Shelf search: the client-side view pipeline over an in-RAM catalog.
//! Filtering, sorting and pagination run locally; nothing here does I/O.

#![forbid(unsafe_code)]

pub mod paginate;
pub mod pipeline;

pub use paginate::{paginate, Pagination};
pub use pipeline::{compare_prices, compare_titles, filter, recompute, recompute_with_debug, sort, View, ViewDebugInfo, ViewPipeline, VisibleSlice};

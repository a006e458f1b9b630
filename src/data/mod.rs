//! Data layer: registry snapshots and everything derived from them.
//!
//! This module separates the tabular source (snapshot, schema, row
//! source) from the derived views (records, summaries, exports).

pub mod exporter;
pub mod record;
pub mod schema;
pub mod search;
pub mod snapshot;
pub mod source;
pub mod summary;

//! Merges tabular file drops into persistent master files.
//!
//! Incoming objects land under the `user/` prefix of a backing object store.
//! Each one is matched to a [`types::FileType`] by the [`registry`], loaded as
//! a [`types::Table`], and upserted into the master object the type names,
//! keyed by the type's primary-key column. The reconciliation algorithm lives
//! in [`merge::MergeEngine`]; every run produces a [`types::MergeReport`] with
//! row, column, size, and deduplication statistics.

pub mod codec;
pub mod error;
pub mod loader;
pub mod merge;
pub mod registry;
pub mod store;
pub mod types;

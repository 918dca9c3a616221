//! The merge engine: reconciles a staging object into its master object.
//!
//! One run loads the staging and master tables, deduplicates the staging
//! rows keep-last, and rewrites the master as the union of both with staging
//! superseding the master on key collision. The master object is only
//! written after every computation has succeeded, so a failed run never
//! leaves a partially written master behind.

use bytes::Bytes;
use tracing::{info, warn};

use crate::codec;
use crate::error::{FiledropError, FiledropResult};
use crate::loader::load_table;
use crate::store::ObjectStore;
use crate::types::{FileType, INCOMING_PREFIX, MASTER_PREFIX, MergeReport, ObjectRef, Table};

/// Outcome of one merge run.
///
/// Every failure path is a named variant so callers branch on the variant
/// instead of inspecting error types; [`MergeOutcome::status`] carries the
/// operator-facing status line.
#[derive(Debug)]
pub enum MergeOutcome {
    /// The master object was rewritten; statistics attached.
    Completed(MergeReport),
    /// The staging object was gone by the time the merge ran.
    StagingNotFound,
    /// The staging key is outside the incoming namespace.
    ObjectError,
    /// A required key column was missing from a loaded table.
    KeyError,
    /// The merge aborted on an unexpected error.
    Failed,
}

impl MergeOutcome {
    /// Operator-facing status string for this outcome.
    pub fn status(&self) -> &'static str {
        match self {
            MergeOutcome::Completed(_) => "success",
            MergeOutcome::StagingNotFound => "staging file not found",
            MergeOutcome::ObjectError => "object error",
            MergeOutcome::KeyError => "key error",
            MergeOutcome::Failed => "error",
        }
    }

    /// The attached report, when the merge completed.
    pub fn report(&self) -> Option<&MergeReport> {
        match self {
            MergeOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Merges staging drops into master objects backed by `S`.
///
/// Merges run strictly one at a time per engine call; concurrent merges
/// against the same master are not coordinated here, and the last writer
/// wins at the storage layer.
#[derive(Debug, Clone)]
pub struct MergeEngine<S> {
    store: S,
}

impl<S: ObjectStore> MergeEngine<S> {
    /// Creates an engine over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Merges the staging object into the master named by `file_type`.
    ///
    /// Precondition violations come back as their named outcomes without a
    /// report; computation errors are logged and mapped by kind. The master
    /// is written once, at the end, after all statistics are in hand.
    pub async fn merge(&self, staging: &ObjectRef, file_type: &FileType) -> MergeOutcome {
        let staging_exists = match self.store.exists(staging).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!(address = %staging.address(), %err, "staging existence check failed");
                return MergeOutcome::Failed;
            }
        };
        if !staging_exists {
            info!(address = %staging.address(), "staging object does not exist");
            return MergeOutcome::StagingNotFound;
        }

        if !staging.key().starts_with(INCOMING_PREFIX) {
            info!(address = %staging.address(), "staging key outside the incoming namespace");
            return MergeOutcome::ObjectError;
        }

        match self.run(staging, file_type).await {
            Ok(report) => MergeOutcome::Completed(report),
            Err(err @ FiledropError::MissingKeyColumn { .. }) => {
                warn!(address = %staging.address(), %err, "merge aborted");
                MergeOutcome::KeyError
            }
            Err(err) => {
                warn!(address = %staging.address(), %err, "merge aborted");
                MergeOutcome::Failed
            }
        }
    }

    async fn run(&self, staging: &ObjectRef, file_type: &FileType) -> FiledropResult<MergeReport> {
        let master = ObjectRef::new(staging.bucket(), &file_type.master_key);

        info!(staging = %staging.address(), master = %master.address(), "loading tables");
        let mut staging_table = load_table(&self.store, staging, file_type).await?;
        let master_table = load_table(&self.store, &master, file_type).await?;

        let staging_rows = staging_table.row_count();
        let staging_key = key_index(&staging_table, file_type, staging)?;
        let master_key = key_index(&master_table, file_type, &master)?;

        // Later rows in file order are authoritative within one drop.
        staging_table.dedup_by_key_keep_last(staging_key);
        let staging_distinct_rows = staging_table.row_count();

        let master_keys = master_table.key_set(master_key);
        let updated_rows = staging_table
            .key_values(staging_key)
            .filter(|key| master_keys.contains(key))
            .count();
        let new_records = staging_distinct_rows - updated_rows;

        // Staging rows come second, so keep-last resolves every key collision
        // to the staging version.
        let mut merged = master_table.concat(&staging_table);
        let merged_key = key_index(&merged, file_type, &master)?;
        merged.dedup_by_key_keep_last(merged_key);

        let master_bytes_before = if self.store.exists(&master).await? {
            self.store.size(&master).await?
        } else {
            0
        };
        let staging_bytes = self.store.size(staging).await?;

        let payload = codec::serialize(&merged, file_type.field_delimiter, file_type.text_qualifier);
        self.store.write(&master, Bytes::from(payload)).await?;
        let master_bytes_after = self.store.size(&master).await?;

        let report = MergeReport {
            staging_file: object_file_name(staging.key(), INCOMING_PREFIX),
            master_file: object_file_name(&file_type.master_key, MASTER_PREFIX),
            staging_rows,
            staging_columns: staging_table.column_count(),
            staging_bytes,
            staging_duplicates: staging_rows - staging_distinct_rows,
            staging_distinct_rows,
            master_rows_before: master_table.row_count(),
            master_columns_before: master_table.column_count(),
            master_bytes_before,
            master_rows_after: merged.row_count(),
            master_columns_after: merged.column_count(),
            master_bytes_after,
            updated_rows,
            new_records,
        };

        info!(
            staging_file = %report.staging_file,
            master_file = %report.master_file,
            staging_rows = report.staging_rows,
            staging_duplicates = report.staging_duplicates,
            updated_rows = report.updated_rows,
            new_records = report.new_records,
            master_rows = report.master_rows_after,
            master_bytes = report.master_bytes_after,
            "merge completed"
        );

        Ok(report)
    }
}

/// Position of the file type's primary-key column in `table`.
fn key_index(table: &Table, file_type: &FileType, object: &ObjectRef) -> FiledropResult<usize> {
    table
        .column_index(&file_type.primary_key)
        .ok_or_else(|| FiledropError::MissingKeyColumn {
            column: file_type.primary_key.clone(),
            object: object.address(),
        })
}

/// File name of a key: the key with its namespace prefix stripped.
fn object_file_name(key: &str, prefix: &str) -> String {
    key.strip_prefix(prefix).unwrap_or(key).to_string()
}

/// Statistics captured by one completed merge run.
///
/// Built once after the master object has been rewritten and never mutated;
/// consumed by logging and metrics only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// Staging file name, without the incoming key prefix.
    pub staging_file: String,
    /// Master file name, without the master key prefix.
    pub master_file: String,
    /// Rows in the staging table as loaded, before deduplication.
    pub staging_rows: usize,
    /// Columns in the staging table.
    pub staging_columns: usize,
    /// Byte size of the staging object.
    pub staging_bytes: u64,
    /// Staging rows dropped by keep-last deduplication.
    pub staging_duplicates: usize,
    /// Staging rows remaining after deduplication.
    pub staging_distinct_rows: usize,
    /// Rows in the master table before the merge.
    pub master_rows_before: usize,
    /// Columns in the master table before the merge.
    pub master_columns_before: usize,
    /// Byte size of the master object before the merge; 0 when it did not
    /// exist yet.
    pub master_bytes_before: u64,
    /// Rows in the master table after the merge.
    pub master_rows_after: usize,
    /// Columns in the master table after the merge.
    pub master_columns_after: usize,
    /// Byte size of the master object after the merge.
    pub master_bytes_after: u64,
    /// Staging rows whose key already existed in the master.
    pub updated_rows: usize,
    /// Staging rows whose key was new to the master.
    pub new_records: usize,
}

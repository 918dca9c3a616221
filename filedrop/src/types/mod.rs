//! Core data model: file types, object references, tables, and merge reports.

mod file_type;
mod object_ref;
mod report;
mod table;

pub use file_type::{FileType, INCOMING_PREFIX, MASTER_PREFIX};
pub use object_ref::ObjectRef;
pub use report::MergeReport;
pub use table::Table;

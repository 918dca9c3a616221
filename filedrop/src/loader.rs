//! Loading stored objects into tables.

use bytes::Bytes;
use tracing::{info, warn};

use crate::codec;
use crate::error::FiledropResult;
use crate::store::ObjectStore;
use crate::types::{FileType, ObjectRef, Table};

/// Loads `object` as a table parsed with `file_type`'s dialect.
///
/// An absent object is valid empty input and yields a table with exactly the
/// primary-key column. Malformed content and store faults during the load
/// degrade to the same empty table; only an invalid `file_type` is an error,
/// since that is a configuration fault rather than a data condition.
pub async fn load_table<S: ObjectStore>(
    store: &S,
    object: &ObjectRef,
    file_type: &FileType,
) -> FiledropResult<Table> {
    file_type.validate()?;

    let bytes = match read_object(store, object).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!(address = %object.address(), "object absent, loading as empty");
            return Ok(Table::empty_with_key(&file_type.primary_key));
        }
        Err(err) => {
            warn!(address = %object.address(), %err, "store read failed, loading as empty");
            return Ok(Table::empty_with_key(&file_type.primary_key));
        }
    };

    match codec::parse(&bytes, file_type.field_delimiter, file_type.text_qualifier) {
        Ok(table) => {
            info!(
                address = %object.address(),
                rows = table.row_count(),
                columns = table.column_count(),
                "loaded table"
            );
            Ok(table)
        }
        Err(err) => {
            warn!(address = %object.address(), %err, "unreadable content, loading as empty");
            Ok(Table::empty_with_key(&file_type.primary_key))
        }
    }
}

async fn read_object<S: ObjectStore>(
    store: &S,
    object: &ObjectRef,
) -> FiledropResult<Option<Bytes>> {
    if !store.exists(object).await? {
        return Ok(None);
    }
    store.read(object).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FiledropError;
    use crate::store::MemoryObjectStore;

    fn file_type() -> FileType {
        FileType::new(
            "Identifier CSV",
            "user/randomDataFile*.csv",
            "mstr/randomDataFile.csv",
            "Id",
            ',',
            '"',
        )
    }

    #[tokio::test]
    async fn absent_object_loads_as_empty_table_with_key_column() {
        let store = MemoryObjectStore::new();
        let object = ObjectRef::new("bucket", "mstr/randomDataFile.csv");

        let table = load_table(&store, &object, &file_type()).await.unwrap();

        assert_eq!(table.columns(), &["Id".to_string()]);
        assert_eq!(table.row_count(), 0);
    }

    #[tokio::test]
    async fn present_object_parses_with_the_dialect() {
        let store = MemoryObjectStore::new();
        let object = ObjectRef::new("bucket", "user/randomDataFile.csv");
        store
            .write(&object, Bytes::from_static(b"Id,V\n1,a\n2,b\n"))
            .await
            .unwrap();

        let table = load_table(&store, &object, &file_type()).await.unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_index("V"), Some(1));
    }

    #[tokio::test]
    async fn malformed_content_degrades_to_empty_table() {
        let store = MemoryObjectStore::new();
        let object = ObjectRef::new("bucket", "user/randomDataFile.csv");
        store
            .write(&object, Bytes::from_static(b"Id,V\n1,\"open\n"))
            .await
            .unwrap();

        let table = load_table(&store, &object, &file_type()).await.unwrap();

        assert_eq!(table.columns(), &["Id".to_string()]);
        assert_eq!(table.row_count(), 0);
    }

    #[tokio::test]
    async fn invalid_file_type_is_a_configuration_error() {
        let store = MemoryObjectStore::new();
        let object = ObjectRef::new("bucket", "user/randomDataFile.csv");
        let broken = FileType::new("broken", "user/broken.csv", "mstr/broken.csv", "", ',', '"');

        let err = load_table(&store, &object, &broken).await.unwrap_err();

        assert!(matches!(err, FiledropError::InvalidFileType(_)));
    }
}

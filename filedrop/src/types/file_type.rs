use crate::error::{FiledropError, FiledropResult};

/// Key prefix under which incoming staging objects are dropped.
pub const INCOMING_PREFIX: &str = "user/";

/// Key prefix under which master objects are maintained.
pub const MASTER_PREFIX: &str = "mstr/";

/// Merge configuration for one family of incoming files.
///
/// A file type ties an incoming key pattern to the master object it feeds and
/// the primary-key column the upsert is keyed on. Instances come from a
/// [`crate::registry::FileTypeProvider`] or are synthesized on the fly for
/// unmatched keys under the incoming prefix; they are never mutated.
#[derive(Debug, Clone, Eq)]
pub struct FileType {
    /// Display label used in logs.
    pub process_name: String,
    /// Glob-style pattern matched against incoming object keys. `*` stands
    /// for any run of characters; everything else is a case-sensitive
    /// literal, and the match covers the whole key.
    pub incoming_pattern: String,
    /// Key of the master object this type maintains.
    pub master_key: String,
    /// Name of the column whose value identifies a row across merges.
    pub primary_key: String,
    /// Field delimiter of the delimited-text dialect.
    pub field_delimiter: char,
    /// Text qualifier of the delimited-text dialect.
    pub text_qualifier: char,
}

impl FileType {
    /// Creates a file type from its parts.
    pub fn new(
        process_name: impl Into<String>,
        incoming_pattern: impl Into<String>,
        master_key: impl Into<String>,
        primary_key: impl Into<String>,
        field_delimiter: char,
        text_qualifier: char,
    ) -> Self {
        Self {
            process_name: process_name.into(),
            incoming_pattern: incoming_pattern.into(),
            master_key: master_key.into(),
            primary_key: primary_key.into(),
            field_delimiter,
            text_qualifier,
        }
    }

    /// Checks that the type is usable: none of the identifying fields may be
    /// empty.
    pub fn validate(&self) -> FiledropResult<()> {
        if self.process_name.is_empty() {
            return Err(FiledropError::InvalidFileType(
                "`process_name` cannot be empty".to_string(),
            ));
        }
        if self.incoming_pattern.is_empty() {
            return Err(FiledropError::InvalidFileType(
                "`incoming_pattern` cannot be empty".to_string(),
            ));
        }
        if self.master_key.is_empty() {
            return Err(FiledropError::InvalidFileType(
                "`master_key` cannot be empty".to_string(),
            ));
        }
        if self.primary_key.is_empty() {
            return Err(FiledropError::InvalidFileType(
                "`primary_key` cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structural value equality over the identifying fields.
///
/// Delimiter and qualifier are parsing details, not identity: two entries
/// naming the same process, pattern, master object, and key column are the
/// same file type even when their dialects differ.
impl PartialEq for FileType {
    fn eq(&self, other: &Self) -> bool {
        self.process_name == other.process_name
            && self.incoming_pattern == other.incoming_pattern
            && self.master_key == other.master_key
            && self.primary_key == other.primary_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_delimiter_and_qualifier() {
        let semicolon = FileType::new(
            "Email CSV",
            "user/userEmailFile*.csv",
            "mstr/userEmailFile.csv",
            "Email",
            ';',
            '\'',
        );
        let comma = FileType::new(
            "Email CSV",
            "user/userEmailFile*.csv",
            "mstr/userEmailFile.csv",
            "Email",
            ',',
            '"',
        );

        assert_eq!(semicolon, comma);
    }

    #[test]
    fn equality_is_structural_over_identifying_fields() {
        let email = FileType::new(
            "Email CSV",
            "user/userEmailFile*.csv",
            "mstr/userEmailFile.csv",
            "Email",
            ',',
            '"',
        );
        let identifier = FileType::new(
            "Identifier CSV",
            "user/randomDataFile*.csv",
            "mstr/randomDataFile.csv",
            "Id",
            ',',
            '"',
        );

        assert_ne!(email, identifier);
    }

    #[test]
    fn validate_rejects_empty_primary_key() {
        let file_type = FileType::new("demo", "user/demo.csv", "mstr/demo.csv", "", ',', '"');

        assert!(file_type.validate().is_err());
    }
}

//! File-type resolution for incoming object keys.
//!
//! Known file types are matched against the incoming key in priority order;
//! unmatched keys that still live under the incoming prefix get a type
//! synthesized from the expected naming convention. Anything else is a lookup
//! miss, not an error.

use regex::Regex;
use tracing::{debug, info};

use crate::types::{FileType, INCOMING_PREFIX, MASTER_PREFIX};

/// Source of the known file-type list.
///
/// The default provider is a static in-memory list; implementing this trait
/// lets a persistent registry be substituted without touching the matching
/// logic.
pub trait FileTypeProvider {
    /// Returns the known file types in priority order.
    fn known_types(&self) -> Vec<FileType>;
}

/// In-memory [`FileTypeProvider`] holding a fixed list.
#[derive(Debug, Clone)]
pub struct StaticFileTypeProvider {
    types: Vec<FileType>,
}

impl StaticFileTypeProvider {
    /// Creates a provider over the given list.
    pub fn new(types: Vec<FileType>) -> Self {
        Self { types }
    }
}

impl Default for StaticFileTypeProvider {
    /// The production file-type list.
    fn default() -> Self {
        Self::new(vec![
            FileType::new(
                "Email CSV",
                "user/userEmailFile*.csv",
                "mstr/userEmailFile.csv",
                "Email",
                ',',
                '"',
            ),
            FileType::new(
                "Identifier CSV",
                "user/randomDataFile*.csv",
                "mstr/randomDataFile.csv",
                "Id",
                ',',
                '"',
            ),
        ])
    }
}

impl FileTypeProvider for StaticFileTypeProvider {
    fn known_types(&self) -> Vec<FileType> {
        self.types.clone()
    }
}

/// Resolves incoming object keys to file types.
#[derive(Debug, Clone)]
pub struct FileTypeRegistry<P> {
    provider: P,
}

impl<P: FileTypeProvider> FileTypeRegistry<P> {
    /// Creates a registry over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Resolves `key` to a file type.
    ///
    /// Known patterns are tried in provider order and the first full-key glob
    /// match wins. Unmatched keys under the incoming prefix get a synthesized
    /// type; everything else, including the empty key, is a miss.
    pub fn resolve(&self, key: &str) -> Option<FileType> {
        if key.is_empty() {
            debug!("empty object key, no file type");
            return None;
        }

        for file_type in self.provider.known_types() {
            if glob_matches(&file_type.incoming_pattern, key) {
                info!(file_type = %file_type.process_name, "file type found");
                return Some(file_type);
            }
        }

        synthesize(key)
    }
}

/// Builds a file type on the fly for an unmatched key under the incoming
/// prefix: primary key `Id`, comma delimiter, double-quote qualifier, and the
/// master key mirroring the incoming key under the master prefix.
fn synthesize(key: &str) -> Option<FileType> {
    let Some(name) = key.strip_prefix(INCOMING_PREFIX) else {
        info!(key, "object key outside the incoming namespace, no file type");
        return None;
    };

    let file_type = FileType::new(name, key, format!("{MASTER_PREFIX}{name}"), "Id", ',', '"');
    info!(file_type = %file_type.process_name, "synthesized file type for unmatched key");
    Some(file_type)
}

/// Matches `key` against a glob `pattern` where `*` stands for any run of
/// characters and everything else is a case-sensitive literal. The match is
/// anchored to the whole key.
fn glob_matches(pattern: &str, key: &str) -> bool {
    let escaped = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    match Regex::new(&format!("^{escaped}$")) {
        Ok(matcher) => matcher.is_match(key),
        Err(_) => false,
    }
}

//! Delimited-text parsing and serialization.
//!
//! Implements the dialect the merge pipeline exchanges: a header record
//! followed by data records, with a configurable field delimiter and text
//! qualifier. Qualified fields may embed delimiters, line breaks, and doubled
//! qualifiers. Record order in the input is preserved in the parsed table;
//! the keep-last deduplication rule depends on it.

use thiserror::Error;

use crate::types::Table;

/// Errors produced while parsing delimited content.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input had no header record.
    #[error("empty input, expected a header record")]
    EmptyInput,

    /// The input was not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    /// A qualified field was never closed.
    #[error("unterminated qualified field in record {record}")]
    UnterminatedField { record: usize },

    /// A record carried more fields than the header names.
    #[error("record {record} has {found} fields, header has {expected}")]
    TooManyFields {
        record: usize,
        found: usize,
        expected: usize,
    },
}

/// Parses delimited `bytes` into a [`Table`], taking the first record as the
/// header.
///
/// Records narrower than the header are padded with empty fields; wider ones
/// are an error. Blank lines are skipped.
pub fn parse(bytes: &[u8], delimiter: char, qualifier: char) -> Result<Table, CodecError> {
    let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;

    let mut records = split_records(text, delimiter, qualifier)?.into_iter();
    let Some(header) = records.next() else {
        return Err(CodecError::EmptyInput);
    };

    let mut table = Table::new(header);
    for (idx, record) in records.enumerate() {
        if record.len() > table.column_count() {
            return Err(CodecError::TooManyFields {
                record: idx + 1,
                found: record.len(),
                expected: table.column_count(),
            });
        }
        table.push_row(record);
    }

    Ok(table)
}

/// Serializes `table` as delimited text: the header record first, `\n` line
/// endings, and fields qualified only when they contain the delimiter, the
/// qualifier, or a line break. No index or row-number column is emitted.
pub fn serialize(table: &Table, delimiter: char, qualifier: char) -> Vec<u8> {
    let mut out = String::new();
    write_record(&mut out, table.columns(), delimiter, qualifier);
    for row in table.rows() {
        write_record(&mut out, row, delimiter, qualifier);
    }
    out.into_bytes()
}

/// Splits `text` into records of unescaped fields.
fn split_records(
    text: &str,
    delimiter: char,
    qualifier: char,
) -> Result<Vec<Vec<String>>, CodecError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut qualified = false;
    let mut saw_qualifier = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if qualified {
            if ch == qualifier {
                if chars.peek() == Some(&qualifier) {
                    chars.next();
                    field.push(qualifier);
                } else {
                    qualified = false;
                }
            } else {
                field.push(ch);
            }
        } else if ch == qualifier && field.is_empty() {
            qualified = true;
            saw_qualifier = true;
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut field));
        } else if ch == '\n' || ch == '\r' {
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            fields.push(std::mem::take(&mut field));
            if fields.len() == 1 && fields[0].is_empty() && !saw_qualifier {
                // Blank line.
                fields.clear();
            } else {
                records.push(std::mem::take(&mut fields));
            }
            saw_qualifier = false;
        } else {
            field.push(ch);
        }
    }

    if qualified {
        return Err(CodecError::UnterminatedField {
            record: records.len(),
        });
    }
    if !field.is_empty() || !fields.is_empty() || saw_qualifier {
        fields.push(field);
        records.push(fields);
    }

    Ok(records)
}

/// Writes one record, qualifying fields only when the dialect requires it.
fn write_record(out: &mut String, fields: &[String], delimiter: char, qualifier: char) {
    for (idx, value) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(delimiter);
        }
        let needs_qualifier = value.contains(delimiter)
            || value.contains(qualifier)
            || value.contains('\n')
            || value.contains('\r');
        if needs_qualifier {
            out.push(qualifier);
            for ch in value.chars() {
                if ch == qualifier {
                    out.push(qualifier);
                }
                out.push(ch);
            }
            out.push(qualifier);
        } else {
            out.push_str(value);
        }
    }
    out.push('\n');
}

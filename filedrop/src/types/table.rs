use std::collections::HashSet;

/// An ordered tabular dataset with named columns and string cells.
///
/// Rows keep the order they were loaded in, and every operation preserves the
/// relative order of the rows it retains. The keep-last deduplication rule is
/// defined purely in terms of that order, which makes "last occurrence wins"
/// deterministic from parse to merge.
///
/// There is no schema beyond the column names; cells are plain strings and
/// short rows are padded with empty fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table with a single column and no rows.
    ///
    /// This is the shape an absent object loads as: valid empty input that
    /// still names the key column the merge needs.
    pub fn empty_with_key(key_column: impl Into<String>) -> Self {
        Self::new(vec![key_column.into()])
    }

    /// The column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows, in load order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Appends a row, padding it with empty fields up to the column count.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        if row.len() < self.columns.len() {
            row.resize(self.columns.len(), String::new());
        }
        self.rows.push(row);
    }

    /// Values of the column at `key_idx`, in row order.
    ///
    /// Rows shorter than `key_idx` contribute an empty value.
    pub fn key_values(&self, key_idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(key_idx).map(String::as_str).unwrap_or(""))
    }

    /// Distinct values of the column at `key_idx`.
    pub fn key_set(&self, key_idx: usize) -> HashSet<&str> {
        self.key_values(key_idx).collect()
    }

    /// Drops rows whose key value reappears later, keeping the last
    /// occurrence of each key in its original position.
    pub fn dedup_by_key_keep_last(&mut self, key_idx: usize) {
        let mut seen = HashSet::new();
        let mut keep = vec![false; self.rows.len()];
        for (idx, row) in self.rows.iter().enumerate().rev() {
            let key = row.get(key_idx).map(String::as_str).unwrap_or("");
            if seen.insert(key.to_string()) {
                keep[idx] = true;
            }
        }

        let mut idx = 0;
        self.rows.retain(|_| {
            let retained = keep[idx];
            idx += 1;
            retained
        });
    }

    /// Concatenates `other` below `self` with column-union alignment.
    ///
    /// The result carries this table's columns first, then `other`'s unseen
    /// columns in order of appearance; cells a source row does not have
    /// become empty fields. Rows of `self` precede rows of `other`.
    pub fn concat(&self, other: &Table) -> Table {
        let mut columns = self.columns.clone();
        for column in &other.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }

        let mut merged = Table::new(columns);
        for row in &self.rows {
            merged.push_aligned(&self.columns, row);
        }
        for row in &other.rows {
            merged.push_aligned(&other.columns, row);
        }
        merged
    }

    /// Appends a row described by `source_columns`, mapping each cell to the
    /// matching column of this table.
    fn push_aligned(&mut self, source_columns: &[String], row: &[String]) {
        let mut aligned = vec![String::new(); self.columns.len()];
        for (idx, column) in source_columns.iter().enumerate() {
            if let Some(target) = self.column_index(column)
                && let Some(value) = row.get(idx)
            {
                aligned[target] = value.clone();
            }
        }
        self.rows.push(aligned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(columns.iter().map(|column| column.to_string()).collect());
        for values in rows {
            table.push_row(row(values));
        }
        table
    }

    #[test]
    fn dedup_keeps_last_occurrence_in_position() {
        let mut staged = table(
            &["Id", "V"],
            &[&["1", "x"], &["2", "b"], &["1", "y"], &["3", "c"]],
        );

        staged.dedup_by_key_keep_last(0);

        assert_eq!(
            staged.rows(),
            &[row(&["2", "b"]), row(&["1", "y"]), row(&["3", "c"])]
        );
    }

    #[test]
    fn dedup_leaves_distinct_rows_alone() {
        let mut staged = table(&["Id", "V"], &[&["1", "a"], &["2", "b"]]);

        staged.dedup_by_key_keep_last(0);

        assert_eq!(staged.row_count(), 2);
    }

    #[test]
    fn concat_appends_rows_after_self() {
        let master = table(&["Id", "V"], &[&["1", "a"]]);
        let staging = table(&["Id", "V"], &[&["2", "b"]]);

        let merged = master.concat(&staging);

        assert_eq!(merged.rows(), &[row(&["1", "a"]), row(&["2", "b"])]);
    }

    #[test]
    fn concat_unions_columns_and_pads_missing_cells() {
        let master = table(&["Id"], &[]);
        let staging = table(&["Id", "Email"], &[&["1", "a@example.com"]]);

        let merged = master.concat(&staging);

        assert_eq!(merged.columns(), &["Id".to_string(), "Email".to_string()]);
        assert_eq!(merged.rows(), &[row(&["1", "a@example.com"])]);
    }

    #[test]
    fn concat_aligns_cells_by_column_name() {
        let master = table(&["Id", "V"], &[&["1", "a"]]);
        let staging = table(&["V", "Id"], &[&["b", "2"]]);

        let merged = master.concat(&staging);

        assert_eq!(merged.columns(), &["Id".to_string(), "V".to_string()]);
        assert_eq!(merged.rows(), &[row(&["1", "a"]), row(&["2", "b"])]);
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut padded = table(&["Id", "V"], &[]);
        padded.push_row(row(&["1"]));

        assert_eq!(padded.rows(), &[row(&["1", ""])]);
    }
}

//! Minimal column-ordered table used for the flattened outputs.
//!
//! Cells are `serde_json::Value`s so rows from differently shaped records
//! (thread metadata, per-metric columns) can live side by side. Missing
//! cells are `Value::Null`.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from JSON objects.
    ///
    /// Columns are the union of all keys in first-seen order; a record
    /// lacking a column gets `Null` there.
    #[must_use]
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let mut table = Self::new();
        for record in &records {
            for key in record.keys() {
                if table.column_index(key).is_none() {
                    table.columns.push(key.clone());
                }
            }
        }
        table.rows = records
            .into_iter()
            .map(|mut record| {
                table
                    .columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        table
    }

    /// Builds a table from serializable row structs.
    ///
    /// Rows that do not serialize to a JSON object are skipped with a warning.
    #[must_use]
    pub fn from_rows<T: Serialize>(rows: &[T]) -> Self {
        let records = rows
            .iter()
            .filter_map(|row| match serde_json::to_value(row) {
                Ok(Value::Object(map)) => Some(map),
                Ok(other) => {
                    tracing::warn!(kind = ?other, "skipping non-object table row");
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unserializable table row");
                    None
                }
            })
            .collect();
        Self::from_records(records)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates the cells of one column; empty if the column does not exist.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Value> + 'a {
        let index = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| index.and_then(|i| row.get(i)))
    }

    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Removes a column, returning whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// Inserts a column holding `value` in every row, at `index` (clamped to
    /// the column count).
    pub fn insert_constant_column(&mut self, index: usize, name: &str, value: &Value) {
        let index = index.min(self.columns.len());
        self.columns.insert(index, name.to_owned());
        for row in &mut self.rows {
            row.insert(index, value.clone());
        }
    }

    /// Left-outer join on `self[left_on] == right[right_on]`.
    ///
    /// Every left row is kept. Each matching right row yields one output row;
    /// a left row without a match gets `Null` in all right columns. Right
    /// columns whose name already exists on the left are suffixed `_right`.
    /// `Null` keys never match.
    #[must_use]
    pub fn left_join(&self, right: &Table, left_on: &str, right_on: &str) -> Table {
        let mut columns = self.columns.clone();
        for c in &right.columns {
            if columns.contains(c) {
                columns.push(format!("{c}_right"));
            } else {
                columns.push(c.clone());
            }
        }

        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        if let Some(ri) = right.column_index(right_on) {
            for (row_no, row) in right.rows.iter().enumerate() {
                if let Some(key) = row.get(ri).and_then(join_key) {
                    index.entry(key).or_default().push(row_no);
                }
            }
        }

        let left_key = self.column_index(left_on);
        let nulls = vec![Value::Null; right.columns.len()];
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let matches = left_key
                .and_then(|li| row.get(li))
                .and_then(join_key)
                .and_then(|key| index.get(&key));
            match matches {
                Some(right_rows) => {
                    for &r in right_rows {
                        let mut joined = row.clone();
                        joined.extend(right.rows[r].iter().cloned());
                        rows.push(joined);
                    }
                }
                None => {
                    let mut joined = row.clone();
                    joined.extend(nulls.iter().cloned());
                    rows.push(joined);
                }
            }
        }

        Table { columns, rows }
    }

    /// Rows as JSON objects keyed by column name.
    #[must_use]
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Pretty-printed JSON array of [`Table::records`].
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records())
    }
}

/// Normalises a cell into a join key; ids arrive as strings or numbers.
fn join_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

use std::collections::BTreeSet;

use fnet_core::FnetError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attributes::AttributeValue;

/// Node attribute table: node key to attribute values ordered like the attribute name list.
pub type NodeTable = IndexMap<String, Vec<AttributeValue>>;

/// Square exposure matrix indexed by node key on both axes.
///
/// Entry `(row = i, column = j)` is the weight of the edge `j -> i`, i.e. the
/// fraction of the distress of `j` transmitted to `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureMatrix {
    row_keys: Vec<String>,
    column_keys: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl ExposureMatrix {
    /// Creates a matrix from explicit row and column keys.
    pub fn new(row_keys: Vec<String>, column_keys: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        Self {
            row_keys,
            column_keys,
            values,
        }
    }

    /// Creates a matrix whose rows and columns share the same key order.
    pub fn square(keys: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        Self::new(keys.clone(), keys, values)
    }

    /// Creates a square matrix from loosely typed JSON cells.
    ///
    /// Cells may be JSON numbers or numeric strings; anything else is a
    /// non-numeric entry and rejected as an invalid topology.
    pub fn from_json_rows(keys: Vec<String>, rows: &[Vec<Value>]) -> Result<Self, FnetError> {
        let mut values = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let mut parsed = Vec::with_capacity(row.len());
            for (col_idx, cell) in row.iter().enumerate() {
                let weight = match cell {
                    Value::Number(number) => number.as_f64(),
                    Value::String(text) => text.trim().parse::<f64>().ok(),
                    _ => None,
                };
                let weight = weight.ok_or_else(|| non_numeric(row_idx, col_idx, cell))?;
                parsed.push(weight);
            }
            values.push(parsed);
        }
        Ok(Self::square(keys, values))
    }

    /// Row keys (impacted nodes).
    pub fn row_keys(&self) -> &[String] {
        &self.row_keys
    }

    /// Column keys (influencing nodes).
    pub fn column_keys(&self) -> &[String] {
        &self.column_keys
    }

    /// Iterates over `(row key, row values)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
        self.row_keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// Checks that the matrix is square over exactly the key set of `table`
    /// and that every entry is numeric.
    pub fn validate_against(&self, table: &NodeTable) -> Result<(), FnetError> {
        if self.row_keys.len() != self.column_keys.len() {
            return Err(
                FnetError::topology("matrix-not-square", "exposure matrix must be square")
                    .with_context("rows", self.row_keys.len())
                    .with_context("columns", self.column_keys.len()),
            );
        }
        if self.values.len() != self.row_keys.len() {
            return Err(FnetError::topology(
                "row-count-mismatch",
                "number of rows does not match the row keys",
            )
            .with_context("rows", self.values.len())
            .with_context("row_keys", self.row_keys.len()));
        }
        let rows = unique_keys(&self.row_keys, "row")?;
        let columns = unique_keys(&self.column_keys, "column")?;
        if rows != columns {
            return Err(FnetError::topology(
                "axis-key-mismatch",
                "rows and columns must be indexed by the same keys",
            ));
        }
        let table_keys: BTreeSet<&str> = table.keys().map(String::as_str).collect();
        if rows != table_keys {
            let missing = table_keys.symmetric_difference(&rows).next().copied();
            return Err(FnetError::topology(
                "node-key-mismatch",
                "matrix keys must match the node attribute table",
            )
            .with_context("key", missing.unwrap_or_default()));
        }
        for (row_idx, row) in self.values.iter().enumerate() {
            if row.len() != self.column_keys.len() {
                return Err(
                    FnetError::topology("ragged-row", "matrix row has the wrong length")
                        .with_context("row", &self.row_keys[row_idx])
                        .with_context("length", row.len()),
                );
            }
            if let Some(col_idx) = row.iter().position(|weight| !weight.is_finite()) {
                return Err(FnetError::topology("non-numeric-weight", "weight is not a number")
                    .with_context("row", &self.row_keys[row_idx])
                    .with_context("column", &self.column_keys[col_idx]));
            }
        }
        Ok(())
    }
}

fn unique_keys<'a>(keys: &'a [String], axis: &str) -> Result<BTreeSet<&'a str>, FnetError> {
    let mut set = BTreeSet::new();
    for key in keys {
        if !set.insert(key.as_str()) {
            return Err(
                FnetError::topology("duplicate-key", "matrix axis repeats a node key")
                    .with_context("axis", axis)
                    .with_context("key", key),
            );
        }
    }
    Ok(set)
}

fn non_numeric(row: usize, column: usize, cell: &Value) -> FnetError {
    FnetError::topology("non-numeric-weight", "weight is not a number")
        .with_context("row", row)
        .with_context("column", column)
        .with_context("value", cell)
}

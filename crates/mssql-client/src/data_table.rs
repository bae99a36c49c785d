//! Table-valued parameter data.
//!
//! A [`DataTable`] holds a column schema and the rows to send as a
//! table-valued parameter. Each appended value is coerced to its column's
//! declared type, and the column's precision, scale and length are widened
//! to fit it, so the schema advertised to the server always covers every
//! stored row.
//!
//! ## Example
//!
//! ```rust
//! use mssql_client::DataTable;
//! use mssql_types::{SqlType, SqlValue};
//!
//! let table = DataTable::new();
//! table.add_column("id", SqlType::Integer).unwrap();
//! table.add_column("amount", SqlType::Decimal).unwrap();
//!
//! table.add_row([SqlValue::from(1), SqlValue::from("0.01")]).unwrap();
//! table.add_row([SqlValue::from("2"), SqlValue::from("123.4")]).unwrap();
//!
//! let amount = &table.columns()[1];
//! assert_eq!((amount.precision, amount.scale), (5, 2));
//! ```

use std::sync::Arc;

use mssql_types::decimal::MAX_PRECISION;
use mssql_types::{
    Coerced, DecimalShape, Extent, SqlType, SqlValue, TypeCategory, TypeError, coerce,
};
use parking_lot::Mutex;
use tds_protocol::TdsVersion;

use crate::error::{Error, Result};

/// A stored row: one coerced value per column.
pub type Row = Arc<[SqlValue]>;

/// A column of a [`DataTable`].
///
/// Precision, scale and maximum length are lower bounds. Appending rows
/// only ever raises them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DataColumn {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub sql_type: SqlType,
    /// Total digits (decimal types).
    pub precision: u32,
    /// Digits after the decimal point (decimal types).
    pub scale: u32,
    /// Length in storage units (character and binary types).
    pub max_length: u32,
}

impl DataColumn {
    /// Create a column with zero lower bounds.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            precision: 0,
            scale: 0,
            max_length: 0,
        }
    }

    /// Set the precision and scale lower bounds.
    #[must_use]
    pub fn with_precision_scale(mut self, precision: u32, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Set the length lower bound.
    #[must_use]
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Current precision and scale.
    #[must_use]
    pub fn decimal_shape(&self) -> DecimalShape {
        DecimalShape::new(self.precision, self.scale)
    }

    /// Reject precision and scale no value could have.
    fn validate(&self) -> Result<()> {
        let reason = if self.scale > self.precision {
            format!(
                "scale {} exceeds precision {}",
                self.scale, self.precision
            )
        } else if self.sql_type.category() == TypeCategory::FixedPoint
            && self.precision > MAX_PRECISION
        {
            format!(
                "precision {} exceeds the maximum of {MAX_PRECISION}",
                self.precision
            )
        } else {
            return Ok(());
        };
        Err(Error::InvalidColumnDefinition {
            name: self.name.clone(),
            reason,
        })
    }

    fn same_name(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

#[derive(Debug, Default)]
struct TableState {
    columns: Vec<DataColumn>,
    rows: Vec<Row>,
    tvp_name: Option<String>,
}

enum Widening {
    Decimal(DecimalShape),
    Length(u32),
}

/// Rows and schema of a table-valued parameter.
///
/// All methods take `&self`; schema and rows sit behind a single lock, so a
/// table can be shared between threads.
#[derive(Debug)]
pub struct DataTable {
    state: Mutex<TableState>,
    tds_version: TdsVersion,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTable {
    /// Create an empty table for the default protocol version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TableState::default()),
            tds_version: TdsVersion::default(),
        }
    }

    /// Use `version` to decide which declared types are available.
    #[must_use]
    pub fn with_tds_version(mut self, version: TdsVersion) -> Self {
        self.tds_version = version;
        self
    }

    /// Protocol version the table is built for.
    #[must_use]
    pub fn tds_version(&self) -> TdsVersion {
        self.tds_version
    }

    /// Server-side table type name.
    #[must_use]
    pub fn tvp_name(&self) -> Option<String> {
        self.state.lock().tvp_name.clone()
    }

    /// Set the server-side table type name.
    pub fn set_tvp_name(&self, name: impl Into<String>) {
        self.state.lock().tvp_name = Some(name.into());
    }

    /// Add a column with default lower bounds.
    pub fn add_column(&self, name: impl Into<String>, sql_type: SqlType) -> Result<()> {
        self.add_column_metadata(DataColumn::new(name, sql_type))
    }

    /// Add a pre-built column.
    ///
    /// Names must be unique ignoring case, scale may not exceed precision,
    /// and decimal types are limited to 38 digits. Rows already stored get
    /// a NULL for the new column.
    pub fn add_column_metadata(&self, column: DataColumn) -> Result<()> {
        self.check_protocol(column.sql_type)?;
        column.validate()?;

        let mut state = self.state.lock();
        if state.columns.iter().any(|c| c.same_name(&column.name)) {
            return Err(Error::DuplicateColumnName { name: column.name });
        }

        for row in &mut state.rows {
            let mut padded = row.to_vec();
            padded.push(SqlValue::Null);
            *row = padded.into();
        }
        state.columns.push(column);
        Ok(())
    }

    /// Append a row.
    ///
    /// Values are matched to columns by position; missing trailing values
    /// are NULL. The row and any widening of the schema it needs are
    /// committed together: on error, neither the rows nor the schema change.
    pub fn add_row<I>(&self, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        let values: Vec<SqlValue> = values.into_iter().map(Into::into).collect();

        let mut guard = self.state.lock();
        let state = &mut *guard;
        if values.len() > state.columns.len() {
            return Err(Error::TooManyValues {
                supplied: values.len(),
                columns: state.columns.len(),
            });
        }

        let mut row = Vec::with_capacity(state.columns.len());
        let mut widenings = Vec::new();
        let mut values = values.into_iter();

        for (index, column) in state.columns.iter().enumerate() {
            let value = values.next().unwrap_or_default();
            let coerced = self.coerce_cell(index, column, &value)?;

            match coerced.extent {
                Extent::Decimal(shape) => {
                    let current = column.decimal_shape();
                    let widened = current
                        .widen(shape)
                        .map_err(|source| invalid_value(index, column, source))?;
                    if widened != current {
                        widenings.push((index, Widening::Decimal(widened)));
                    }
                }
                Extent::Length(length) if length > column.max_length => {
                    widenings.push((index, Widening::Length(length)));
                }
                Extent::Length(_) | Extent::Fixed => {}
            }
            row.push(coerced.value);
        }

        for (index, widening) in widenings {
            let column = &mut state.columns[index];
            match widening {
                Widening::Decimal(shape) => {
                    column.precision = shape.precision;
                    column.scale = shape.scale;
                    tracing::trace!(
                        column = %column.name,
                        precision = shape.precision,
                        scale = shape.scale,
                        "widened decimal column"
                    );
                }
                Widening::Length(length) => {
                    column.max_length = length;
                    tracing::trace!(column = %column.name, max_length = length, "widened column");
                }
            }
        }

        state.rows.push(row.into());
        Ok(())
    }

    fn coerce_cell(&self, index: usize, column: &DataColumn, value: &SqlValue) -> Result<Coerced> {
        if !column.sql_type.is_coercible() {
            return Err(Error::UnsupportedColumnType {
                position: index + 1,
                name: column.name.clone(),
                sql_type: column.sql_type,
            });
        }
        self.check_protocol(column.sql_type)?;
        coerce(column.sql_type, value).map_err(|source| invalid_value(index, column, source))
    }

    fn check_protocol(&self, sql_type: SqlType) -> Result<()> {
        if sql_type.is_offset_aware() && !self.tds_version.supports_date_time_types() {
            return Err(Error::UnsupportedByProtocol {
                sql_type,
                version: self.tds_version,
            });
        }
        Ok(())
    }

    /// Drop every column and row. The table type name is kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.columns.clear();
        state.rows.clear();
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.state.lock().columns.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.state.lock().rows.len()
    }

    /// Snapshot of the schema.
    #[must_use]
    pub fn columns(&self) -> Vec<DataColumn> {
        self.state.lock().columns.clone()
    }

    /// Snapshot of one column (0-based).
    #[must_use]
    pub fn column(&self, index: usize) -> Option<DataColumn> {
        self.state.lock().columns.get(index).cloned()
    }

    /// Row at `index` (0-based).
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Row> {
        self.state.lock().rows.get(index).cloned()
    }

    /// `(index, row)` pairs in insertion order, as of this call.
    ///
    /// Rows appended or a `clear` after the call are not seen.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Row)> + use<> {
        let rows = self.state.lock().rows.clone();
        rows.into_iter().enumerate()
    }
}

fn invalid_value(index: usize, column: &DataColumn, source: TypeError) -> Error {
    Error::InvalidColumnValue {
        position: index + 1,
        name: column.name.clone(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decimal_table() -> DataTable {
        let table = DataTable::new();
        table.add_column("amount", SqlType::Decimal).unwrap();
        table
    }

    #[test]
    fn test_decimal_precision_counts_leading_zero() {
        let table = decimal_table();
        table.add_row(["0.01"]).unwrap();
        let column = table.column(0).unwrap();
        assert_eq!((column.precision, column.scale), (3, 2));

        table.add_row(["123.4"]).unwrap();
        let column = table.column(0).unwrap();
        assert_eq!((column.precision, column.scale), (5, 2));
    }

    #[test]
    fn test_too_many_values() {
        let table = decimal_table();
        let err = table.add_row(["1", "2"]).unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyValues {
                supplied: 2,
                columns: 1
            }
        ));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_failed_row_does_not_widen() {
        let table = DataTable::new();
        table.add_column("amount", SqlType::Decimal).unwrap();
        table.add_column("qty", SqlType::Integer).unwrap();

        let err = table.add_row(["12345.678", "many"]).unwrap_err();
        assert!(matches!(err, Error::InvalidColumnValue { position: 2, .. }));
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column(0).unwrap().decimal_shape(), DecimalShape::new(0, 0));
    }

    #[test]
    fn test_scale_above_precision_is_rejected() {
        let table = DataTable::new();
        let err = table
            .add_column_metadata(DataColumn::new("n", SqlType::Decimal).with_precision_scale(2, 5))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidColumnDefinition { ref name, .. } if name == "n"));
        assert!(err.is_data_error());
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_precision_above_maximum_is_rejected() {
        let table = DataTable::new();
        let err = table
            .add_column_metadata(DataColumn::new("n", SqlType::Numeric).with_precision_scale(60, 0))
            .unwrap_err();
        assert!(err.to_string().contains("precision 60"));
        assert_eq!(table.column_count(), 0);

        table
            .add_column_metadata(DataColumn::new("n", SqlType::Numeric).with_precision_scale(38, 38))
            .unwrap();
    }

    #[test]
    fn test_short_rows_are_padded_with_null() {
        let table = DataTable::new();
        table.add_column("a", SqlType::Integer).unwrap();
        table.add_column("b", SqlType::NVarChar).unwrap();
        table.add_row([7]).unwrap();
        assert_eq!(&*table.row(0).unwrap(), &[SqlValue::Int(7), SqlValue::Null]);
    }

    #[test]
    fn test_duplicate_column_ignores_case() {
        let table = DataTable::new();
        table.add_column("Name", SqlType::VarChar).unwrap();
        let err = table.add_column("NAME", SqlType::Integer).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumnName { ref name } if name == "NAME"));
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn test_unsupported_type_fails_even_for_null() {
        let table = DataTable::new();
        table.add_column("blob", SqlType::Blob).unwrap();
        let err = table.add_row([SqlValue::Null]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedColumnType {
                position: 1,
                sql_type: SqlType::Blob,
                ..
            }
        ));
    }

    #[test]
    fn test_offset_aware_type_needs_tds_7_3() {
        let table = DataTable::new().with_tds_version(TdsVersion::V7_2);
        let err = table
            .add_column("at", SqlType::DateTimeOffset)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedByProtocol { .. }));

        let table = DataTable::new().with_tds_version(TdsVersion::V7_3A);
        table.add_column("at", SqlType::DateTimeOffset).unwrap();
        table.add_row(["2024-01-01 00:00:00 +01:00"]).unwrap();
    }

    #[test]
    fn test_length_widens() {
        let table = DataTable::new();
        table.add_column("name", SqlType::NVarChar).unwrap();
        table.add_row(["abc"]).unwrap();
        table.add_row(["a"]).unwrap();
        assert_eq!(table.column(0).unwrap().max_length, 6);
    }

    #[test]
    fn test_clear_then_reuse() {
        let table = decimal_table();
        table.set_tvp_name("dbo.Amounts");
        table.add_row(["1.5"]).unwrap();
        table.clear();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.tvp_name().as_deref(), Some("dbo.Amounts"));

        table.add_column("amount", SqlType::Decimal).unwrap();
        assert_eq!(table.column(0).unwrap().decimal_shape(), DecimalShape::new(0, 0));
    }

    #[test]
    fn test_iter_is_a_snapshot() {
        let table = decimal_table();
        table.add_row(["1"]).unwrap();
        let iter = table.iter();
        table.add_row(["2"]).unwrap();
        table.clear();
        let seen: Vec<_> = iter.map(|(i, _)| i).collect();
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn test_column_added_after_rows() {
        let table = decimal_table();
        table.add_row(["1"]).unwrap();
        table.add_column("note", SqlType::VarChar).unwrap();
        assert_eq!(table.row(0).unwrap().len(), 2);
    }

    #[test]
    fn test_table_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataTable>();
    }
}

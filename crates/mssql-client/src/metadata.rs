//! Result set metadata.
//!
//! [`ResultMetadata`] answers descriptive questions about the columns of a
//! result: names, types, precision, nullability and so on. Columns are
//! addressed 1-based.
//!
//! An Always Encrypted column arrives with an outer wire type that only
//! describes the ciphertext. Its real type is in the column's
//! [`CryptoMetadata`](tds_protocol::CryptoMetadata), and every accessor
//! reads from that instead. The choice is made once per column when the
//! metadata is built.
//!
//! Newer servers report some types under a canonical name (for example
//! `varchar(max)` as `varchar` and `money` as `decimal`) for the type name,
//! type code, value type and searchability.

use mssql_types::SqlType;
use tds_protocol::{ColumnData, SsType, TableName, TdsVersion, TypeInfo, Updatability};

use crate::error::{Error, Result};

/// Whether a column may hold NULL.
///
/// Columns whose nullability the server could not determine report
/// [`Nullability::Nullable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    /// The column never holds NULL.
    NoNulls,
    /// The column may hold NULL.
    Nullable,
}

#[derive(Debug, Clone)]
struct ResolvedColumn {
    data: ColumnData,
    effective: TypeInfo,
    reported: SsType,
}

/// Descriptive metadata for the columns of a result.
#[derive(Debug, Clone)]
pub struct ResultMetadata {
    columns: Vec<ResolvedColumn>,
    tds_version: TdsVersion,
}

impl ResultMetadata {
    /// Resolve the effective type of every column.
    #[must_use]
    pub fn new(columns: Vec<ColumnData>, tds_version: TdsVersion) -> Self {
        let canonicalize = tds_version.supports_date_time_types();
        let columns: Vec<ResolvedColumn> = columns
            .into_iter()
            .map(|data| {
                let effective = data.effective_type().clone();
                let reported = if canonicalize {
                    effective.ss_type.canonical()
                } else {
                    effective.ss_type
                };
                ResolvedColumn {
                    data,
                    effective,
                    reported,
                }
            })
            .collect();

        tracing::debug!(
            columns = columns.len(),
            encrypted = columns.iter().filter(|c| c.data.is_encrypted()).count(),
            version = %tds_version,
            "built result metadata"
        );

        Self {
            columns,
            tds_version,
        }
    }

    fn column(&self, index: usize) -> Result<&ResolvedColumn> {
        index
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or(Error::ColumnIndexOutOfRange {
                index,
                count: self.columns.len(),
            })
    }

    fn effective(&self, index: usize) -> Result<&TypeInfo> {
        self.column(index).map(|c| &c.effective)
    }

    /// Protocol version the metadata was built for.
    #[must_use]
    pub fn tds_version(&self) -> TdsVersion {
        self.tds_version
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column name.
    pub fn column_name(&self, index: usize) -> Result<&str> {
        self.column(index).map(|c| c.data.name.as_str())
    }

    /// Column label (same as the name).
    pub fn column_label(&self, index: usize) -> Result<&str> {
        self.column_name(index)
    }

    fn table_part(&self, index: usize, part: fn(&TableName) -> &Option<String>) -> Result<&str> {
        let column = self.column(index)?;
        Ok(column
            .data
            .table
            .as_ref()
            .and_then(|table| part(table).as_deref())
            .unwrap_or(""))
    }

    /// Base table name, or `""` if unknown.
    pub fn table_name(&self, index: usize) -> Result<&str> {
        self.table_part(index, |t| &t.object)
    }

    /// Schema of the base table, or `""` if unknown.
    pub fn schema_name(&self, index: usize) -> Result<&str> {
        self.table_part(index, |t| &t.schema)
    }

    /// Catalog of the base table, or `""` if unknown.
    pub fn catalog_name(&self, index: usize) -> Result<&str> {
        self.table_part(index, |t| &t.catalog)
    }

    /// Declared type the column maps to.
    pub fn column_sql_type(&self, index: usize) -> Result<SqlType> {
        self.column(index)
            .map(|c| SqlType::from_server_type(c.reported))
    }

    /// Numeric type code of the column.
    pub fn column_type(&self, index: usize) -> Result<i32> {
        self.column_sql_type(index).map(SqlType::code)
    }

    /// Server type name, e.g. `nvarchar` or `decimal`.
    ///
    /// User-defined types report their own name when the server sent one.
    pub fn column_type_name(&self, index: usize) -> Result<&str> {
        let column = self.column(index)?;
        match (&column.effective.udt_type_name, column.reported) {
            (Some(name), SsType::Udt) => Ok(name.as_str()),
            (_, reported) => Ok(reported.name()),
        }
    }

    /// Rust type a value of this column decodes into.
    pub fn column_class_name(&self, index: usize) -> Result<&'static str> {
        self.column_sql_type(index).map(SqlType::rust_type_name)
    }

    /// Total digits for numeric types, characters for character types,
    /// bytes for binary types.
    pub fn precision(&self, index: usize) -> Result<u32> {
        self.effective(index).map(|t| t.precision)
    }

    /// Digits after the decimal point.
    pub fn scale(&self, index: usize) -> Result<u32> {
        self.effective(index).map(|t| u32::from(t.scale))
    }

    /// Display width in characters.
    pub fn column_display_size(&self, index: usize) -> Result<u32> {
        self.effective(index).map(|t| t.display_size)
    }

    /// Whether the column may hold NULL.
    pub fn is_nullable(&self, index: usize) -> Result<Nullability> {
        self.effective(index).map(|t| {
            if t.is_nullable() || t.is_nullable_unknown() {
                Nullability::Nullable
            } else {
                Nullability::NoNulls
            }
        })
    }

    /// Whether the column may appear in a `WHERE` clause.
    pub fn is_searchable(&self, index: usize) -> Result<bool> {
        self.column(index).map(|c| c.reported.is_searchable())
    }

    /// Whether values of the column carry a sign.
    pub fn is_signed(&self, index: usize) -> Result<bool> {
        self.effective(index)
            .map(|t| SqlType::from_server_type(t.ss_type).is_signed())
    }

    /// Whether comparisons on the column are case-sensitive.
    pub fn is_case_sensitive(&self, index: usize) -> Result<bool> {
        self.effective(index).map(TypeInfo::is_case_sensitive)
    }

    /// Whether the column is an identity column.
    pub fn is_auto_increment(&self, index: usize) -> Result<bool> {
        self.effective(index).map(TypeInfo::is_identity)
    }

    /// Whether the column holds a monetary amount.
    pub fn is_currency(&self, index: usize) -> Result<bool> {
        self.effective(index).map(|t| t.ss_type.is_currency())
    }

    /// Whether the column is the sparse column set of its table.
    pub fn is_sparse_column_set(&self, index: usize) -> Result<bool> {
        self.effective(index).map(TypeInfo::is_sparse_column_set)
    }

    /// Whether the column is encrypted at rest.
    pub fn is_encrypted(&self, index: usize) -> Result<bool> {
        self.column(index).map(|c| c.data.is_encrypted())
    }

    /// Whether the column is known not to be writable.
    pub fn is_read_only(&self, index: usize) -> Result<bool> {
        self.effective(index)
            .map(|t| t.updatability() == Updatability::ReadOnly)
    }

    /// Whether a write to the column might succeed.
    pub fn is_writable(&self, index: usize) -> Result<bool> {
        self.effective(index).map(|t| {
            matches!(
                t.updatability(),
                Updatability::ReadWrite | Updatability::Unknown
            )
        })
    }

    /// Whether a write to the column will succeed.
    pub fn is_definitely_writable(&self, index: usize) -> Result<bool> {
        self.effective(index)
            .map(|t| t.updatability() == Updatability::ReadWrite)
    }
}

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use mssql_client::{DataTable, SqlType, SqlValue};
use rust_decimal::Decimal;

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    TinyInt(u8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Decimal(i64, u8),
    String(String),
    Binary(Vec<u8>),
}

impl From<FuzzValue> for SqlValue {
    fn from(value: FuzzValue) -> Self {
        match value {
            FuzzValue::Null => SqlValue::Null,
            FuzzValue::Bool(v) => SqlValue::Bool(v),
            FuzzValue::TinyInt(v) => SqlValue::TinyInt(v),
            FuzzValue::SmallInt(v) => SqlValue::SmallInt(v),
            FuzzValue::Int(v) => SqlValue::Int(v),
            FuzzValue::BigInt(v) => SqlValue::BigInt(v),
            FuzzValue::Float(v) => SqlValue::Float(v),
            FuzzValue::Double(v) => SqlValue::Double(v),
            FuzzValue::Decimal(m, s) => Decimal::try_new(m, u32::from(s % 29))
                .map_or(SqlValue::Null, SqlValue::from),
            FuzzValue::String(v) => SqlValue::String(v),
            FuzzValue::Binary(v) => SqlValue::Binary(Bytes::from(v)),
        }
    }
}

const COLUMNS: &[SqlType] = &[
    SqlType::Bit,
    SqlType::TinyInt,
    SqlType::SmallInt,
    SqlType::Integer,
    SqlType::BigInt,
    SqlType::Real,
    SqlType::Double,
    SqlType::Decimal,
    SqlType::Money,
    SqlType::Date,
    SqlType::VarChar,
    SqlType::NVarChar,
    SqlType::VarBinary,
];

fuzz_target!(|rows: Vec<Vec<FuzzValue>>| {
    let table = DataTable::new();
    for (i, sql_type) in COLUMNS.iter().enumerate() {
        let _ = table.add_column(format!("c{i}"), *sql_type);
    }

    for row in rows {
        let before = table.columns();
        let count = table.row_count();
        match table.add_row(row) {
            Ok(()) => {
                assert_eq!(table.row_count(), count + 1);
                for (old, new) in before.iter().zip(table.columns()) {
                    assert!(new.precision >= old.precision);
                    assert!(new.scale >= old.scale);
                    assert!(new.max_length >= old.max_length);
                }
            }
            Err(_) => {
                assert_eq!(table.row_count(), count);
                assert_eq!(before, table.columns());
            }
        }
    }
});

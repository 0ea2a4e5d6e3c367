use std::sync::Arc;

use chrono::NaiveDate;
use mysql_async::consts::ColumnType;
use mysql_async::{Column, Row, Value};

use crate::config::ValueOptions;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Collation id MySQL reports for binary string columns.
const BINARY_COLLATION: u16 = 63;

/// What a column's type says about how to read its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    BigInt,
    Decimal,
    Json,
    Date,
    Binary,
    Other,
}

impl ColumnKind {
    fn of(column: &Column) -> Self {
        match column.column_type() {
            ColumnType::MYSQL_TYPE_LONGLONG => ColumnKind::BigInt,
            ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                ColumnKind::Decimal
            }
            ColumnType::MYSQL_TYPE_JSON => ColumnKind::Json,
            ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => ColumnKind::Date,
            ColumnType::MYSQL_TYPE_BIT => ColumnKind::Binary,
            ColumnType::MYSQL_TYPE_TINY_BLOB
            | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
            | ColumnType::MYSQL_TYPE_LONG_BLOB
            | ColumnType::MYSQL_TYPE_BLOB
            | ColumnType::MYSQL_TYPE_VAR_STRING
            | ColumnType::MYSQL_TYPE_VARCHAR
            | ColumnType::MYSQL_TYPE_STRING
                if column.character_set() == BINARY_COLLATION =>
            {
                ColumnKind::Binary
            }
            _ => ColumnKind::Other,
        }
    }
}

/// Build a result set from the rows of one statement.
///
/// Column names come from the first row, so an empty result has none.
#[must_use]
pub fn build_result_set(rows: Vec<Row>, options: ValueOptions) -> ResultSet {
    let mut result_set = ResultSet::with_capacity(rows.len());
    let Some(first) = rows.first() else {
        return result_set;
    };

    let columns = first.columns();
    let kinds: Vec<ColumnKind> = columns.iter().map(ColumnKind::of).collect();
    let column_names: Vec<String> = columns
        .iter()
        .map(|col| col.name_str().into_owned())
        .collect();
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let values = row
            .unwrap_raw()
            .into_iter()
            .zip(kinds.iter())
            .map(|(value, kind)| value.map_or(SqlValue::Null, |v| convert_value(v, *kind, options)))
            .collect();
        result_set.add_row_values(values);
    }

    result_set
}

pub(crate) fn convert_value(value: Value, kind: ColumnKind, options: ValueOptions) -> SqlValue {
    let bigint_as_text = kind == ColumnKind::BigInt && options.big_number_strings;
    match value {
        Value::NULL => SqlValue::Null,
        Value::Int(i) if bigint_as_text => SqlValue::Text(i.to_string()),
        Value::Int(i) => SqlValue::Int(i),
        Value::UInt(u) => match i64::try_from(u) {
            Ok(i) if !bigint_as_text => SqlValue::Int(i),
            _ if options.support_big_numbers || bigint_as_text => SqlValue::Text(u.to_string()),
            #[allow(clippy::cast_precision_loss)]
            _ => SqlValue::Float(u as f64),
        },
        Value::Float(f) => SqlValue::Float(f64::from(f)),
        Value::Double(d) => SqlValue::Float(d),
        Value::Bytes(bytes) => convert_bytes(bytes, kind, options),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            if options.date_strings {
                SqlValue::Text(format_date(kind, year, month, day, hour, minute, second, micros))
            } else {
                NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                    .and_then(|d| {
                        d.and_hms_micro_opt(
                            u32::from(hour),
                            u32::from(minute),
                            u32::from(second),
                            micros,
                        )
                    })
                    .map_or_else(
                        || SqlValue::Text(format_date(kind, year, month, day, hour, minute, second, micros)),
                        SqlValue::Timestamp,
                    )
            }
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            SqlValue::Text(format_time(negative, days, hours, minutes, seconds, micros))
        }
    }
}

fn convert_bytes(bytes: Vec<u8>, kind: ColumnKind, options: ValueOptions) -> SqlValue {
    match kind {
        ColumnKind::Binary => SqlValue::Blob(bytes),
        ColumnKind::Json => match serde_json::from_slice(&bytes) {
            Ok(json) => SqlValue::Json(json),
            Err(_) => text_or_blob(bytes),
        },
        ColumnKind::Decimal if options.decimal_numbers => {
            match std::str::from_utf8(&bytes).ok().and_then(|s| s.parse::<f64>().ok()) {
                Some(n) => SqlValue::Float(n),
                None => text_or_blob(bytes),
            }
        }
        _ => text_or_blob(bytes),
    }
}

fn text_or_blob(bytes: Vec<u8>) -> SqlValue {
    match String::from_utf8(bytes) {
        Ok(text) => SqlValue::Text(text),
        Err(err) => SqlValue::Blob(err.into_bytes()),
    }
}

#[allow(clippy::too_many_arguments)]
fn format_date(
    kind: ColumnKind,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
) -> String {
    if kind == ColumnKind::Date {
        return format!("{year:04}-{month:02}-{day:02}");
    }
    let mut out = format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}");
    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

fn format_time(negative: bool, days: u32, hours: u8, minutes: u8, seconds: u8, micros: u32) -> String {
    let sign = if negative { "-" } else { "" };
    let total_hours = days * 24 + u32::from(hours);
    let mut out = format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}");
    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

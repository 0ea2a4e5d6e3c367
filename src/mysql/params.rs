use chrono::{Datelike, Timelike};
use mysql_async::{Params, Value};

use crate::types::SqlValue;

/// Positional parameters for `Conn::exec`. No values means no parameters.
#[must_use]
pub fn convert_params(params: &[SqlValue]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(to_mysql_value).collect())
    }
}

/// Client value for one bound parameter.
#[must_use]
pub fn to_mysql_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Int(*i),
        SqlValue::Float(f) => Value::Double(*f),
        SqlValue::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        SqlValue::Bool(b) => Value::Int(i64::from(*b)),
        SqlValue::Timestamp(dt) => Value::Date(
            u16::try_from(dt.year()).unwrap_or_default(),
            u8::try_from(dt.month()).unwrap_or_default(),
            u8::try_from(dt.day()).unwrap_or_default(),
            u8::try_from(dt.hour()).unwrap_or_default(),
            u8::try_from(dt.minute()).unwrap_or_default(),
            u8::try_from(dt.second()).unwrap_or_default(),
            dt.nanosecond() / 1_000,
        ),
        SqlValue::Null => Value::NULL,
        SqlValue::Json(json) => Value::Bytes(json.to_string().into_bytes()),
        SqlValue::Blob(bytes) => Value::Bytes(bytes.clone()),
    }
}

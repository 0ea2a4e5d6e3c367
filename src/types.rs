use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values that can be read from a MySQL row or bound as query parameters.
///
/// Only numbers and strings may be bound:
/// ```rust
/// use mysql_middleware::prelude::*;
///
/// let params = vec![SqlValue::Int(1), SqlValue::Text("alice".into())];
/// assert!(params.iter().all(SqlValue::is_bindable));
/// assert!(!SqlValue::Bool(true).is_bindable());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value is a number or a string, the only kinds a query may bind.
    #[must_use]
    pub fn is_bindable(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::Text(_))
    }

    /// Short name of the variant, used in validation messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Timestamp(_) => "timestamp",
            Self::Null => "null",
            Self::Json(_) => "json",
            Self::Blob(_) => "blob",
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let SqlValue::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// MySQL has no real boolean column type, so `TINYINT(1)` values 0/1 count too.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(value) => Some(*value),
            SqlValue::Int(1) => Some(true),
            SqlValue::Int(0) => Some(false),
            _ => None,
        }
    }

    /// Dates come back as strings, so this parses the usual MySQL layouts as well.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SqlValue::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            SqlValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_numbers_and_strings_bind() {
        assert!(SqlValue::Int(1).is_bindable());
        assert!(SqlValue::Float(1.5).is_bindable());
        assert!(SqlValue::from("x").is_bindable());
        assert!(!SqlValue::Null.is_bindable());
        assert!(!SqlValue::Blob(vec![1]).is_bindable());
        assert!(!SqlValue::Json(serde_json::json!({"a": 1})).is_bindable());
    }

    #[test]
    fn timestamp_parses_date_strings() {
        let v = SqlValue::Text("2024-03-01 12:30:00.250000".into());
        let ts = v.as_timestamp().unwrap();
        assert_eq!(ts.format("%H:%M:%S%.3f").to_string(), "12:30:00.250");
        assert!(SqlValue::Text("not a date".into()).as_timestamp().is_none());
    }

    #[test]
    fn tinyint_reads_as_bool() {
        assert_eq!(SqlValue::Int(1).as_bool(), Some(true));
        assert_eq!(SqlValue::Int(0).as_bool(), Some(false));
        assert_eq!(SqlValue::Int(2).as_bool(), None);
    }
}

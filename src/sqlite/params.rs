use crate::types::SqlValue;

/// Convert a single `SqlValue` to a rusqlite `Value`.
///
/// SQLite has no date/time storage class, so temporal values are bound as ISO-8601 text.
#[must_use]
pub fn sql_value_to_sqlite_value(value: &SqlValue) -> rusqlite::types::Value {
    match value {
        SqlValue::Int(i) => rusqlite::types::Value::Integer(*i),
        SqlValue::Float(f) => rusqlite::types::Value::Real(*f),
        SqlValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        SqlValue::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => rusqlite::types::Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Date(d) => rusqlite::types::Value::Text(d.format("%F").to_string()),
        SqlValue::Time(t) => rusqlite::types::Value::Text(t.format("%T%.f").to_string()),
        SqlValue::Null => rusqlite::types::Value::Null,
        SqlValue::Json(jval) => rusqlite::types::Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

/// Bound parameters for one `SQLite` statement.
pub struct Params(pub Vec<rusqlite::types::Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[SqlValue]) -> Self {
        Params(params.iter().map(sql_value_to_sqlite_value).collect())
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[rusqlite::types::Value] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rusqlite::types::Value;

    use super::*;

    #[test]
    fn temporal_values_bind_as_text() {
        let date = NaiveDate::from_ymd_opt(2004, 2, 18).unwrap();
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let params = Params::convert(&[
            SqlValue::Date(date),
            SqlValue::Time(time),
            SqlValue::Timestamp(date.and_time(time)),
            SqlValue::Bool(true),
        ]);
        assert_eq!(
            params.as_values(),
            &[
                Value::Text("2004-02-18".into()),
                Value::Text("10:00:00".into()),
                Value::Text("2004-02-18 10:00:00".into()),
                Value::Integer(1),
            ]
        );
    }
}

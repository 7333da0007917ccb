use std::error::Error;

use bytes::BytesMut;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value as JsonValue;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType, to_sql_checked};

use crate::types::SqlValue;

type ToSqlResult = Result<IsNull, Box<dyn Error + Sync + Send>>;

fn is_text(ty: &Type) -> bool {
    matches!(*ty, Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME)
}

fn wrong_type<T>(ty: &Type) -> ToSqlResult {
    Err(Box::new(WrongType::new::<T>(ty.clone())))
}

/// Narrow to the column's integer width; overflow is an error, not a wrap.
fn write_int(value: i64, ty: &Type, out: &mut BytesMut) -> ToSqlResult {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        _ => value.to_sql(ty, out),
    }
}

fn write_float(value: f64, ty: &Type, out: &mut BytesMut) -> ToSqlResult {
    if *ty == Type::FLOAT4 {
        (value as f32).to_sql(ty, out)
    } else {
        value.to_sql(ty, out)
    }
}

fn write_timestamp(value: &NaiveDateTime, ty: &Type, out: &mut BytesMut) -> ToSqlResult {
    if *ty == Type::TIMESTAMPTZ {
        Utc.from_utc_datetime(value).to_sql(ty, out)
    } else {
        value.to_sql(ty, out)
    }
}

// Text is parsed for non-text columns so callers can keep numbers and dates as strings.
fn write_text(s: &str, ty: &Type, out: &mut BytesMut) -> ToSqlResult {
    match *ty {
        _ if is_text(ty) => s.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => write_int(s.trim().parse()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => write_float(s.trim().parse()?, ty, out),
        Type::BOOL => s.trim().parse::<bool>()?.to_sql(ty, out),
        Type::DATE => NaiveDate::parse_from_str(s, "%Y-%m-%d")?.to_sql(ty, out),
        Type::TIME => NaiveTime::parse_from_str(s, "%H:%M:%S%.f")?.to_sql(ty, out),
        Type::TIMESTAMP | Type::TIMESTAMPTZ => {
            write_timestamp(&NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")?, ty, out)
        }
        Type::JSON | Type::JSONB => serde_json::from_str::<JsonValue>(s)?.to_sql(ty, out),
        _ => wrong_type::<String>(ty),
    }
}

impl ToSql for SqlValue {
    /// Encode for the column type the server inferred, converting only where the
    /// stored value keeps its meaning; any other pairing is a `WrongType` error.
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> ToSqlResult {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Text(s) => write_text(s, ty, out),
            SqlValue::Blob(_) if is_text(ty) => wrong_type::<Vec<u8>>(ty),
            _ if is_text(ty) => self.to_string().to_sql(ty, out),
            SqlValue::Int(i) => match *ty {
                Type::INT2 | Type::INT4 | Type::INT8 => write_int(*i, ty, out),
                Type::FLOAT4 | Type::FLOAT8 => write_float(*i as f64, ty, out),
                Type::BOOL if matches!(*i, 0 | 1) => (*i == 1).to_sql(ty, out),
                _ => wrong_type::<i64>(ty),
            },
            SqlValue::Float(f) => match *ty {
                Type::FLOAT4 | Type::FLOAT8 => write_float(*f, ty, out),
                _ => wrong_type::<f64>(ty),
            },
            SqlValue::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => write_int(i64::from(*b), ty, out),
                _ => wrong_type::<bool>(ty),
            },
            SqlValue::Timestamp(dt) => match *ty {
                Type::TIMESTAMP | Type::TIMESTAMPTZ => write_timestamp(dt, ty, out),
                _ => wrong_type::<NaiveDateTime>(ty),
            },
            SqlValue::Date(d) => match *ty {
                Type::DATE => d.to_sql(ty, out),
                _ => wrong_type::<NaiveDate>(ty),
            },
            SqlValue::Time(t) => match *ty {
                Type::TIME => t.to_sql(ty, out),
                _ => wrong_type::<NaiveTime>(ty),
            },
            SqlValue::Json(jsval) => match *ty {
                Type::JSON | Type::JSONB => jsval.to_sql(ty, out),
                _ => wrong_type::<JsonValue>(ty),
            },
            SqlValue::Blob(bytes) => match *ty {
                Type::BYTEA => bytes.to_sql(ty, out),
                _ => wrong_type::<Vec<u8>>(ty),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::TIME
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

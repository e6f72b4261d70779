use super::quote_literal;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Utc;
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;
use tokio_postgres::types::Type;

/// One column value, as the driver handed it back.
///
/// Dates, times, timestamps and numerics become [`Cell::Text`] in their
/// canonical text form, which the server parses back unchanged.
/// Everything without a decoder (PostGIS `geometry`, `bytea`, ...)
/// arrives as [`Cell::Raw`]: the value's binary form, upper-case hex.
/// For geometry that is the same hex EWKB the server prints in text
/// mode, so it can be written back as a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
    Raw(String),
}

impl Cell {
    /// SQL literal form, as spliced into a multi-row VALUES list.
    pub fn literal(&self) -> String {
        match self {
            Self::Null => "NULL".into(),
            Self::Bool(true) => "TRUE".into(),
            Self::Bool(false) => "FALSE".into(),
            Self::Int(n) => n.to_string(),
            Self::Float(x) if x.is_nan() => "'NaN'".into(),
            Self::Float(x) if x.is_infinite() && *x > 0.0 => "'Infinity'".into(),
            Self::Float(x) if x.is_infinite() => "'-Infinity'".into(),
            Self::Float(x) => format!("{:?}", x),
            Self::Text(s) => quote_literal(s),
            Self::Json(v) => quote_literal(&v.to_string()),
            Self::Raw(hex) => quote_literal(hex),
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Decodes column `i` of a driver row by its declared type.
    pub fn decode(row: &Row, i: usize) -> Result<Self, tokio_postgres::Error> {
        row.try_get::<_, Self>(i)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
            Self::Json(v) => write!(f, "{}", v),
            Self::Raw(hex) => write!(f, "{}", hex),
        }
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}
impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}
impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}
impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}
impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
impl From<serde_json::Value> for Cell {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}
impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

type Decoded = Result<Cell, Box<dyn Error + Sync + Send>>;

impl<'a> FromSql<'a> for Cell {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Decoded {
        Ok(match ty.name() {
            "bool" => Self::Bool(bool::from_sql(ty, raw)?),
            "int2" => Self::Int(i16::from_sql(ty, raw)?.into()),
            "int4" => Self::Int(i32::from_sql(ty, raw)?.into()),
            "int8" => Self::Int(i64::from_sql(ty, raw)?),
            "oid" => Self::Int(u32::from_sql(ty, raw)?.into()),
            "float4" => Self::Float(f32::from_sql(ty, raw)?.into()),
            "float8" => Self::Float(f64::from_sql(ty, raw)?),
            "text" | "varchar" | "bpchar" | "name" => Self::Text(String::from_sql(ty, raw)?),
            "json" | "jsonb" => Self::Json(serde_json::Value::from_sql(ty, raw)?),
            "date" => Self::Text(NaiveDate::from_sql(ty, raw)?.to_string()),
            "time" => Self::Text(NaiveTime::from_sql(ty, raw)?.to_string()),
            "timestamp" => Self::Text(NaiveDateTime::from_sql(ty, raw)?.to_string()),
            "timestamptz" => Self::Text(DateTime::<Utc>::from_sql(ty, raw)?.to_rfc3339()),
            "numeric" => Self::Text(Decimal::from_sql(ty, raw)?.to_string()),
            _ => Self::Raw(raw.iter().map(|b| format!("{:02X}", b)).collect()),
        })
    }
    fn from_sql_null(_: &Type) -> Decoded {
        Ok(Self::Null)
    }
    fn accepts(_: &Type) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn literals() {
        assert_eq!(Cell::Null.literal(), "NULL");
        assert_eq!(Cell::Bool(false).literal(), "FALSE");
        assert_eq!(Cell::Int(-3).literal(), "-3");
        assert_eq!(Cell::Float(2.5).literal(), "2.5");
        assert_eq!(Cell::Float(1.0).literal(), "1.0");
        assert_eq!(Cell::Float(f64::NAN).literal(), "'NaN'");
        assert_eq!(Cell::Float(f64::NEG_INFINITY).literal(), "'-Infinity'");
        assert_eq!(Cell::from("O'Neil Rd").literal(), "'O''Neil Rd'");
    }
    #[test]
    fn json_literal_is_quoted_text() {
        let cell = Cell::from(serde_json::json!({"k": "it's"}));
        assert_eq!(cell.literal(), r#"'{"k":"it''s"}'"#);
    }
    #[test]
    fn options_become_null() {
        assert!(Cell::from(None::<i64>).is_null());
        assert_eq!(Cell::from(Some(4_i64)), Cell::Int(4));
    }
    #[test]
    fn unknown_types_are_upper_hex() {
        let cell = Cell::from_sql(&Type::BYTEA, &[0x01, 0xab, 0x00]).unwrap();
        assert_eq!(cell, Cell::Raw("01AB00".into()));
    }
    #[test]
    fn nulls_of_any_type() {
        assert!(Cell::from_sql_null(&Type::DATE).unwrap().is_null());
    }
    #[test]
    fn dates_read_back_as_literals() {
        let cell = Cell::from_sql(&Type::DATE, &8766_i32.to_be_bytes()).unwrap();
        assert_eq!(cell, Cell::from("2024-01-01"));
        assert_eq!(cell.literal(), "'2024-01-01'");
    }
    #[test]
    fn times_and_timestamps() {
        let noon = Cell::from_sql(&Type::TIME, &45_000_000_000_i64.to_be_bytes()).unwrap();
        assert_eq!(noon.literal(), "'12:30:00'");
        let epoch = Cell::from_sql(&Type::TIMESTAMP, &0_i64.to_be_bytes()).unwrap();
        assert_eq!(epoch.literal(), "'2000-01-01 00:00:00'");
        let utc = Cell::from_sql(&Type::TIMESTAMPTZ, &0_i64.to_be_bytes()).unwrap();
        assert_eq!(utc.literal(), "'2000-01-01T00:00:00+00:00'");
    }
    #[test]
    fn numerics_read_back_as_literals() {
        // 12.5: two base-10000 digits [12, 5000], weight 0, scale 1
        let raw = [0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x0C, 0x13, 0x88];
        let cell = Cell::from_sql(&Type::NUMERIC, &raw).unwrap();
        assert_eq!(cell.literal(), "'12.5'");
    }
    #[test]
    fn native_types() {
        assert_eq!(Cell::from_sql(&Type::INT4, &7_i32.to_be_bytes()).unwrap(), Cell::Int(7));
        assert_eq!(Cell::from_sql(&Type::BOOL, &[1]).unwrap(), Cell::Bool(true));
        assert_eq!(Cell::from_sql(&Type::TEXT, b"Elm St").unwrap(), Cell::from("Elm St"));
    }
}

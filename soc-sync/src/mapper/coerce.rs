//! Field coercion for raw upstream items
//!
//! Upstream values are mostly strings, sometimes numbers. Dates and
//! integer-coded fields never fail: unreadable values become `None`.
//! Text fields only fail for nested values (arrays / objects).

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::MappingError;

pub type RawItem = Map<String, Value>;

/// Literal placeholders the export uses for "no value"
fn is_placeholder(s: &str) -> bool {
    s.is_empty() || s == "None" || s == "null"
}

/// Text field, `""` when absent or null
pub fn text(item: &RawItem, field: &'static str) -> Result<String, MappingError> {
    match item.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => Err(MappingError::InvalidField { field }),
    }
}

/// Lenient integer parse: `None` for placeholders, garbage or out of range
pub fn parse_int<T: TryFrom<i64>>(value: Option<&Value>) -> Option<T> {
    let n = match value? {
        Value::String(s) => {
            let s = s.trim();
            if is_placeholder(s) {
                return None;
            }
            s.parse::<i64>().ok()?
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64()?;
                if !f.is_finite() || f.abs() >= i64::MAX as f64 {
                    return None;
                }
                f.trunc() as i64
            }
        },
        _ => return None,
    };
    T::try_from(n).ok()
}

/// Integer field, see [`parse_int`]
pub fn int<T: TryFrom<i64>>(item: &RawItem, field: &str) -> Option<T> {
    parse_int(item.get(field))
}

/// Lenient date parse: `DD/MM/YYYY` or `YYYY-MM-DD`, anything else `None`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if is_placeholder(value) {
        return None;
    }
    if value.contains('/') {
        NaiveDate::parse_from_str(value, "%d/%m/%Y").ok()
    } else if value.contains('-') {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    }
}

/// Date field, see [`parse_date`]
pub fn date(item: &RawItem, field: &str) -> Option<NaiveDate> {
    match item.get(field) {
        Some(Value::String(s)) => parse_date(s),
        _ => None,
    }
}

/// `S`/`s` flag, false otherwise
pub fn yes_flag(item: &RawItem, field: &str) -> bool {
    matches!(item.get(field), Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("S"))
}

/// JSON type name for error messages
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

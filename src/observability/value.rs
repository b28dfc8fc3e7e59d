//! Coercion of record values into JSON.
//!
//! Values that serde_json represents natively pass through untouched. The
//! remaining known kinds are decimals (to floating point) and timestamps
//! (to their display form). Anything else is carried as its `Debug` text,
//! so building a record never fails.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// A value headed for a log record.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Json(Value),
    Float(f64),
    Decimal(Decimal),
    Timestamp(String),
    Repr(String),
}

impl LogValue {
    /// Carry any value as its `Debug` representation.
    pub fn repr<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        LogValue::Repr(format!("{value:?}"))
    }

    pub fn into_json(self) -> Value {
        match self {
            LogValue::Json(v) => v,
            LogValue::Float(f) => float(f),
            LogValue::Decimal(d) => match d.to_f64() {
                Some(f) => float(f),
                None => Value::String(d.to_string()),
            },
            LogValue::Timestamp(s) | LogValue::Repr(s) => Value::String(s),
        }
    }
}

/// Non-finite floats have no JSON form and fall back to their text.
fn float(f: f64) -> Value {
    match Number::from_f64(f) {
        Some(n) => Value::Number(n),
        None => Value::String(f.to_string()),
    }
}

impl From<Value> for LogValue {
    fn from(v: Value) -> Self {
        LogValue::Json(v)
    }
}

impl From<Decimal> for LogValue {
    fn from(d: Decimal) -> Self {
        LogValue::Decimal(d)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for LogValue
where
    Tz::Offset: fmt::Display,
{
    fn from(ts: DateTime<Tz>) -> Self {
        LogValue::Timestamp(ts.to_string())
    }
}

impl From<NaiveDateTime> for LogValue {
    fn from(ts: NaiveDateTime) -> Self {
        LogValue::Timestamp(ts.to_string())
    }
}

impl From<f64> for LogValue {
    fn from(f: f64) -> Self {
        LogValue::Float(f)
    }
}

impl From<f32> for LogValue {
    fn from(f: f32) -> Self {
        LogValue::Float(f64::from(f))
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Json(Value::String(s.to_string()))
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Json(Value::String(s))
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Json(Value::Bool(b))
    }
}

macro_rules! integer_values {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LogValue {
                fn from(n: $t) -> Self {
                    LogValue::Json(Value::from(n))
                }
            }
        )*
    };
}

integer_values!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => LogValue::Json(Value::Null),
        }
    }
}

impl<T: Into<LogValue>> From<Vec<T>> for LogValue {
    fn from(items: Vec<T>) -> Self {
        LogValue::Json(Value::Array(
            items.into_iter().map(|i| i.into().into_json()).collect(),
        ))
    }
}

use chrono::{DateTime, Utc};

/// A bound positional parameter.
///
/// Values never end up in SQL text; they travel next to the fragment that
/// references them and are bound by the executor in left-to-right order.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for SqlValue {
            fn from(value: $t) -> Self {
                SqlValue::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for SqlValue {
            fn from(value: $t) -> Self {
                SqlValue::UInt(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float(f64::from(value))
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

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Builds a `Vec<SqlValue>` from heterogeneous values.
///
/// ```
/// use lesson_store::{params, sql::SqlValue};
///
/// let values = params!["org-1", 0, true];
/// assert_eq!(values[1], SqlValue::Int(0));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::sql::SqlValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::sql::SqlValue::from($value)),+]
    };
}

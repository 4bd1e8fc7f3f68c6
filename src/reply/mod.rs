//! # Reply values
//!
//! The dynamically shaped tree returned by the store for any command.
//! It carries no schema: decoders assume its shape from the command that
//! produced it, and check that shape with the combinators in [`parse`].

pub mod parse;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use parse::FromReply;

/// A reply from the store.
///
/// Closed over the shapes RESP can carry:
/// - Scalars: Null, Int, Float, Bool, Text, Bytes
/// - Containers: Array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Reply {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Reply>),
}

// ============================================================================
// Type checking
// ============================================================================

impl Reply {
    pub fn type_name(&self) -> &'static str {
        match self {
            Reply::Null => "NULL",
            Reply::Int(_) => "INTEGER",
            Reply::Float(_) => "FLOAT",
            Reply::Bool(_) => "BOOLEAN",
            Reply::Text(_) => "TEXT",
            Reply::Bytes(_) => "BYTES",
            Reply::Array(_) => "ARRAY",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Reply::Null) }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reply::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(a) => Some(a),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Reply { fn from(v: bool) -> Self { Reply::Bool(v) } }
impl From<i32> for Reply { fn from(v: i32) -> Self { Reply::Int(v as i64) } }
impl From<i64> for Reply { fn from(v: i64) -> Self { Reply::Int(v) } }
impl From<f64> for Reply { fn from(v: f64) -> Self { Reply::Float(v) } }
impl From<String> for Reply { fn from(v: String) -> Self { Reply::Text(v) } }
impl From<&str> for Reply { fn from(v: &str) -> Self { Reply::Text(v.to_owned()) } }
impl<T: Into<Reply>> From<Vec<T>> for Reply {
    fn from(v: Vec<T>) -> Self { Reply::Array(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Reply>> From<Option<T>> for Reply {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Reply::Null) }
}

/// RESP2 carries every bulk string as bytes; those that are valid UTF-8
/// become `Text`, the rest stay `Bytes`.
#[cfg(feature = "redis")]
impl From<redis::Value> for Reply {
    fn from(v: redis::Value) -> Self {
        match v {
            redis::Value::Nil => Reply::Null,
            redis::Value::Int(i) => Reply::Int(i),
            redis::Value::Data(bytes) => match String::from_utf8(bytes) {
                Ok(s) => Reply::Text(s),
                Err(e) => Reply::Bytes(e.into_bytes()),
            },
            redis::Value::Bulk(items) => Reply::Array(items.into_iter().map(Reply::from).collect()),
            redis::Value::Status(s) => Reply::Text(s),
            redis::Value::Okay => Reply::Text("OK".into()),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Null => write!(f, "(nil)"),
            Reply::Int(i) => write!(f, "(integer) {i}"),
            Reply::Float(v) => write!(f, "(double) {v}"),
            Reply::Bool(b) => write!(f, "({b})"),
            Reply::Text(s) => write!(f, "\"{s}\""),
            Reply::Bytes(b) => write!(f, "<bytes[{}]>", b.len()),
            Reply::Array(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_from() {
        assert_eq!(Reply::from("hello"), Reply::Text("hello".into()));
        assert_eq!(Reply::from(42), Reply::Int(42));
        assert_eq!(Reply::from(1.5), Reply::Float(1.5));
        assert_eq!(Reply::from(None::<i64>), Reply::Null);
        assert_eq!(
            Reply::from(vec![1i64, 2]),
            Reply::Array(vec![Reply::Int(1), Reply::Int(2)])
        );
    }

    #[test]
    fn test_display_nested() {
        let r = Reply::from(vec![Reply::from("a"), Reply::Null, Reply::from(vec![3i64])]);
        assert_eq!(r.to_string(), "[\"a\", (nil), [(integer) 3]]");
    }
}

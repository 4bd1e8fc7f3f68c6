//! Command arguments — the positional sequence handed to an [`Executor`](crate::Executor).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ItemAmount;

/// One positional argument of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Arg {
    Text(String),
    Int(i64),
    Float(f64),
    /// Opaque binary payload (dump chunks).
    Bytes(Vec<u8>),
}

/// Build a `Vec<Arg>` from anything convertible into [`Arg`].
///
/// ```
/// use redisstack::{args, Arg};
/// assert_eq!(args!["BF.ADD", "k", 3], vec![Arg::from("BF.ADD"), Arg::from("k"), Arg::Int(3)]);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::args::Arg::from($arg)),*]
    };
}

impl Arg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(i) => Some(*i),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<&str> for Arg { fn from(v: &str) -> Self { Arg::Text(v.to_owned()) } }
impl From<String> for Arg { fn from(v: String) -> Self { Arg::Text(v) } }
impl From<&String> for Arg { fn from(v: &String) -> Self { Arg::Text(v.clone()) } }
impl From<i64> for Arg { fn from(v: i64) -> Self { Arg::Int(v) } }
impl From<i32> for Arg { fn from(v: i32) -> Self { Arg::Int(v as i64) } }
impl From<u32> for Arg { fn from(v: u32) -> Self { Arg::Int(v as i64) } }
impl From<usize> for Arg { fn from(v: usize) -> Self { Arg::Int(v as i64) } }
impl From<f64> for Arg { fn from(v: f64) -> Self { Arg::Float(v) } }
impl From<&[u8]> for Arg { fn from(v: &[u8]) -> Self { Arg::Bytes(v.to_vec()) } }

// ============================================================================
// Display (as the wire would carry it)
// ============================================================================

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(s) => write!(f, "{s}"),
            Arg::Int(i) => write!(f, "{i}"),
            Arg::Float(v) => write!(f, "{v}"),
            Arg::Bytes(b) => write!(f, "<bytes[{}]>", b.len()),
        }
    }
}

#[cfg(feature = "redis")]
impl redis::ToRedisArgs for Arg {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + redis::RedisWrite,
    {
        match self {
            Arg::Text(s) => s.write_redis_args(out),
            Arg::Int(i) => i.write_redis_args(out),
            Arg::Float(v) => v.write_redis_args(out),
            Arg::Bytes(b) => b.write_redis_args(out),
        }
    }
}

// ============================================================================
// Shared builders
// ============================================================================

/// `COMMAND key item...`
pub fn by_key_and_items<S: AsRef<str>>(command: &str, key: &str, items: &[S]) -> Vec<Arg> {
    let mut args = Vec::with_capacity(2 + items.len());
    args.push(Arg::from(command));
    args.push(Arg::from(key));
    args.extend(items.iter().map(|i| Arg::from(i.as_ref())));
    args
}

/// `COMMAND key item amount item amount...`
pub fn by_key_and_item_amounts(command: &str, key: &str, item_amounts: &[ItemAmount]) -> Vec<Arg> {
    let mut args = Vec::with_capacity(2 + item_amounts.len() * 2);
    args.push(Arg::from(command));
    args.push(Arg::from(key));
    for ia in item_amounts {
        args.push(Arg::from(ia.item.as_str()));
        args.push(Arg::Int(ia.amount));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_key_and_items() {
        assert_eq!(
            by_key_and_items("BF.MADD", "k", &["a", "b"]),
            args!["BF.MADD", "k", "a", "b"],
        );
        assert_eq!(by_key_and_items::<&str>("BF.MADD", "k", &[]), args!["BF.MADD", "k"]);
    }

    #[test]
    fn test_by_key_and_item_amounts() {
        let ias = [ItemAmount::new("a", 2), ItemAmount::new("b", -1)];
        assert_eq!(
            by_key_and_item_amounts("CMS.INCRBY", "k", &ias),
            args!["CMS.INCRBY", "k", "a", 2i64, "b", -1i64],
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Arg::Float(0.01).to_string(), "0.01");
        assert_eq!(Arg::Int(-7).to_string(), "-7");
        assert_eq!(Arg::Bytes(vec![1, 2]).to_string(), "<bytes[2]>");
    }
}

//! Schema-free decoding combinators over [`Reply`].
//!
//! Every decoder in this crate is composed from the functions here. They
//! share two rules:
//!
//! - a variant mismatch is [`Error::InvalidType`], a length or arity
//!   violation is [`Error::InvalidData`];
//! - composite decoders stop at the first failing element and return that
//!   error, never a partial result.

use super::Reply;
use crate::model::{ItemAmount, Property};
use crate::{Error, Result};

/// Convert a scalar reply into a concrete type. The variant must match exactly.
pub trait FromReply: Sized {
    fn from_reply(reply: &Reply) -> Result<Self>;
}

fn type_error(expected: &'static str, got: &Reply) -> Error {
    Error::InvalidType { expected, got: got.type_name() }
}

impl FromReply for i64 {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply {
            Reply::Int(i) => Ok(*i),
            _ => Err(type_error("INTEGER", reply)),
        }
    }
}

impl FromReply for f64 {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply {
            Reply::Float(f) => Ok(*f),
            _ => Err(type_error("FLOAT", reply)),
        }
    }
}

impl FromReply for bool {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply {
            Reply::Bool(b) => Ok(*b),
            _ => Err(type_error("BOOLEAN", reply)),
        }
    }
}

impl FromReply for String {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply {
            Reply::Text(s) => Ok(s.clone()),
            _ => Err(type_error("TEXT", reply)),
        }
    }
}

impl FromReply for Vec<u8> {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply {
            Reply::Bytes(b) => Ok(b.clone()),
            _ => Err(type_error("BYTES", reply)),
        }
    }
}

impl FromReply for Reply {
    fn from_reply(reply: &Reply) -> Result<Self> {
        Ok(reply.clone())
    }
}

// ============================================================================
// Scalars
// ============================================================================

pub fn scalar<T: FromReply>(reply: &Reply) -> Result<T> {
    T::from_reply(reply)
}

/// Integer reply as a flag: nonzero is `true`.
pub fn int_bool(reply: &Reply) -> Result<bool> {
    scalar::<i64>(reply).map(|i| i != 0)
}

/// Like [`scalar`], but a variant mismatch decodes as `None`.
///
/// Used where the store marks a missing entry with a placeholder of a
/// different type (e.g. `TOPK.ADD` answering nil for "nothing expelled").
pub fn nullable_scalar<T: FromReply>(reply: &Reply) -> Result<Option<T>> {
    match T::from_reply(reply) {
        Ok(v) => Ok(Some(v)),
        Err(Error::InvalidType { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// A double that RESP2 sends as text and RESP3 sends natively.
pub fn float_text(reply: &Reply) -> Result<f64> {
    match reply {
        Reply::Float(f) => Ok(*f),
        Reply::Int(i) => Ok(*i as f64),
        Reply::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidData(format!("not a number: {s:?}"))),
        _ => Err(type_error("FLOAT", reply)),
    }
}

/// Opaque payload that may arrive as either text or bytes.
pub fn blob(reply: &Reply) -> Result<Vec<u8>> {
    match reply {
        Reply::Bytes(b) => Ok(b.clone()),
        Reply::Text(s) => Ok(s.as_bytes().to_vec()),
        _ => Err(type_error("BYTES", reply)),
    }
}

// ============================================================================
// Arrays
// ============================================================================

/// The reply as an array of at least `min_len` elements.
pub fn array(reply: &Reply, min_len: usize) -> Result<&[Reply]> {
    let items = match reply {
        Reply::Array(items) => items.as_slice(),
        _ => return Err(type_error("ARRAY", reply)),
    };
    if items.len() < min_len {
        return Err(Error::InvalidData(format!(
            "expected at least {min_len} elements, got {}",
            items.len()
        )));
    }
    Ok(items)
}

/// Decode every element of an array with `f`, in order.
pub fn map_array<'r, T, F>(reply: &'r Reply, min_len: usize, f: F) -> Result<Vec<T>>
where
    F: FnMut(&'r Reply) -> Result<T>,
{
    array(reply, min_len)?.iter().map(f).collect()
}

pub fn scalar_array<T: FromReply>(reply: &Reply, min_len: usize) -> Result<Vec<T>> {
    map_array(reply, min_len, scalar::<T>)
}

pub fn nullable_scalar_array<T: FromReply>(reply: &Reply, min_len: usize) -> Result<Vec<Option<T>>> {
    map_array(reply, min_len, nullable_scalar::<T>)
}

pub fn int_bool_array(reply: &Reply, min_len: usize) -> Result<Vec<bool>> {
    map_array(reply, min_len, int_bool)
}

/// Array of `[text, text]` pairs. A nil second element decodes as `""`
/// (a label that was selected but is not set on the series).
pub fn string_pair_array(reply: &Reply, min_len: usize) -> Result<Vec<(String, String)>> {
    map_array(reply, min_len, |e| {
        let pair = array(e, 2)?;
        let name = scalar::<String>(&pair[0])?;
        let value = nullable_scalar::<String>(&pair[1])?.unwrap_or_default();
        Ok((name, value))
    })
}

/// Array of `[key, value]` pairs with the value kept as a raw reply.
pub fn property_array(reply: &Reply, min_len: usize) -> Result<Vec<Property>> {
    map_array(reply, min_len, |e| {
        let pair = array(e, 2)?;
        Ok(Property {
            key: scalar(&pair[0])?,
            value: pair[1].clone(),
        })
    })
}

// ============================================================================
// Interlaced arrays: [k0, v0, k1, v1, ...]
// ============================================================================

/// Decode a flat array as consecutive pairs. The array must hold at least
/// `min_len` pairs and an even number of elements.
pub fn interlaced<'r, T, F>(reply: &'r Reply, min_len: usize, mut f: F) -> Result<Vec<T>>
where
    F: FnMut(&'r Reply, &'r Reply) -> Result<T>,
{
    let items = array(reply, min_len * 2)?;
    if items.len() % 2 != 0 {
        return Err(Error::InvalidData(format!(
            "interlaced array has odd length {}",
            items.len()
        )));
    }
    items.chunks_exact(2).map(|kv| f(&kv[0], &kv[1])).collect()
}

pub fn item_amount_interlaced(reply: &Reply, min_len: usize) -> Result<Vec<ItemAmount>> {
    interlaced(reply, min_len, |item, amount| {
        Ok(ItemAmount {
            item: scalar(item)?,
            amount: scalar(amount)?,
        })
    })
}

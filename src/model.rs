//! Small DTOs shared by several modules.

use serde::{Deserialize, Serialize};

use crate::reply::Reply;

/// An item with an associated count, used by `CMS.INCRBY`, `TOPK.INCRBY`
/// and `TOPK.LIST ... WITHCOUNT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemAmount {
    pub item: String,
    pub amount: i64,
}

impl ItemAmount {
    pub fn new(item: impl Into<String>, amount: i64) -> Self {
        Self { item: item.into(), amount }
    }
}

/// A property key with its value left as the raw reply, so callers can
/// inspect the variant themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Reply,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<Reply>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

//! Top-K (`TOPK.*`).

use serde::{Deserialize, Serialize};

use crate::args::{self, Arg};
use crate::model::ItemAmount;
use crate::reply::{parse, Reply};
use crate::Result;

/// `TOPK.INFO` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub k: i64,
    pub width: i64,
    pub depth: i64,
    pub decay: f64,
}

/// Sketch dimensions for `TOPK.RESERVE`. All three are sent together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReserveParams {
    pub width: i64,
    pub depth: i64,
    pub decay: f64,
}

pub fn add_args<S: AsRef<str>>(key: &str, items: &[S]) -> Vec<Arg> {
    args::by_key_and_items("TOPK.ADD", key, items)
}

/// For each added item, the item it expelled from the list, if any.
pub fn add_result(reply: &Reply) -> Result<Vec<Option<String>>> {
    parse::nullable_scalar_array(reply, 0)
}

pub fn count_args<S: AsRef<str>>(key: &str, items: &[S]) -> Vec<Arg> {
    args::by_key_and_items("TOPK.COUNT", key, items)
}

pub fn count_result(reply: &Reply) -> Result<Vec<i64>> {
    parse::scalar_array(reply, 0)
}

pub fn incr_by_args(key: &str, item_amounts: &[ItemAmount]) -> Vec<Arg> {
    args::by_key_and_item_amounts("TOPK.INCRBY", key, item_amounts)
}

pub fn incr_by_result(reply: &Reply) -> Result<Vec<Option<String>>> {
    parse::nullable_scalar_array(reply, 0)
}

pub fn info_args(key: &str) -> Vec<Arg> {
    args!["TOPK.INFO", key]
}

pub fn info_result(reply: &Reply) -> Result<Info> {
    let arr = parse::array(reply, 8)?;
    Ok(Info {
        k: parse::scalar(&arr[1])?,
        width: parse::scalar(&arr[3])?,
        depth: parse::scalar(&arr[5])?,
        decay: parse::float_text(&arr[7])?,
    })
}

pub fn list_args(key: &str) -> Vec<Arg> {
    args!["TOPK.LIST", key]
}

pub fn list_result(reply: &Reply) -> Result<Vec<String>> {
    parse::scalar_array(reply, 0)
}

pub fn list_with_count_args(key: &str) -> Vec<Arg> {
    args!["TOPK.LIST", key, "WITHCOUNT"]
}

/// `[item, count, item, count, ...]`
pub fn list_with_count_result(reply: &Reply) -> Result<Vec<ItemAmount>> {
    parse::item_amount_interlaced(reply, 0)
}

pub fn query_args<S: AsRef<str>>(key: &str, items: &[S]) -> Vec<Arg> {
    args::by_key_and_items("TOPK.QUERY", key, items)
}

pub fn query_result(reply: &Reply) -> Result<Vec<bool>> {
    parse::int_bool_array(reply, 0)
}

/// `TOPK.RESERVE key topk [width depth decay]`
pub fn reserve_args(key: &str, top_k: i64, params: Option<&ReserveParams>) -> Vec<Arg> {
    let mut args = Vec::with_capacity(6);
    args.extend(args!["TOPK.RESERVE", key, top_k]);
    if let Some(p) = params {
        args.extend(args![p.width, p.depth, p.decay]);
    }
    args
}

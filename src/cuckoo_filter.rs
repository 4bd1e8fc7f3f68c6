//! Cuckoo filter (`CF.*`).

use serde::{Deserialize, Serialize};

use crate::args::{self, Arg};
use crate::executor::Executor;
use crate::reply::{parse, Reply};
use crate::scan_dump::{self, ScanDump};
use crate::Result;

/// `CF.INFO` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub size: i64,
    pub num_buckets: i64,
    pub num_filters: i64,
    pub num_items_inserted: i64,
    pub num_items_deleted: i64,
    pub bucket_size: i64,
    pub expansion_rate: i64,
    pub max_iteration: i64,
}

/// Optional tuning for `CF.RESERVE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReserveOptions {
    pub bucket_size: Option<i64>,
    pub max_iterations: Option<i64>,
    pub expansion_rate: Option<i64>,
}

// ============================================================================
// Single item
// ============================================================================

pub fn add_args(key: &str, item: &str) -> Vec<Arg> {
    args!["CF.ADD", key, item]
}

pub fn add_result(reply: &Reply) -> Result<bool> {
    parse::int_bool(reply)
}

pub fn add_nx_args(key: &str, item: &str) -> Vec<Arg> {
    args!["CF.ADDNX", key, item]
}

pub fn add_nx_result(reply: &Reply) -> Result<bool> {
    parse::int_bool(reply)
}

pub fn count_args(key: &str, item: &str) -> Vec<Arg> {
    args!["CF.COUNT", key, item]
}

pub fn count_result(reply: &Reply) -> Result<i64> {
    parse::scalar(reply)
}

pub fn del_args(key: &str, item: &str) -> Vec<Arg> {
    args!["CF.DEL", key, item]
}

pub fn del_result(reply: &Reply) -> Result<bool> {
    parse::int_bool(reply)
}

pub fn exists_args(key: &str, item: &str) -> Vec<Arg> {
    args!["CF.EXISTS", key, item]
}

pub fn exists_result(reply: &Reply) -> Result<bool> {
    parse::int_bool(reply)
}

pub fn mexists_args<S: AsRef<str>>(key: &str, items: &[S]) -> Vec<Arg> {
    args::by_key_and_items("CF.MEXISTS", key, items)
}

pub fn mexists_result(reply: &Reply) -> Result<Vec<bool>> {
    parse::int_bool_array(reply, 0)
}

// ============================================================================
// Insert
// ============================================================================

fn insert_args_with<S: AsRef<str>>(
    command: &str,
    key: &str,
    capacity: Option<i64>,
    no_create: bool,
    items: &[S],
) -> Vec<Arg> {
    let mut args = Vec::with_capacity(6 + items.len());
    args.extend(args![command, key]);
    if let Some(c) = capacity {
        args.extend(args!["CAPACITY", c]);
    }
    if no_create {
        args.push(Arg::from("NOCREATE"));
    }
    args.push(Arg::from("ITEMS"));
    args.extend(items.iter().map(|i| Arg::from(i.as_ref())));
    args
}

/// `CF.INSERT key [CAPACITY c] [NOCREATE] ITEMS item...`
pub fn insert_args<S: AsRef<str>>(key: &str, capacity: Option<i64>, no_create: bool, items: &[S]) -> Vec<Arg> {
    insert_args_with("CF.INSERT", key, capacity, no_create, items)
}

/// Per item: `1` inserted, `-1` filter full.
pub fn insert_result(reply: &Reply) -> Result<Vec<i64>> {
    parse::scalar_array(reply, 0)
}

/// `CF.INSERTNX key [CAPACITY c] [NOCREATE] ITEMS item...`
pub fn insert_nx_args<S: AsRef<str>>(key: &str, capacity: Option<i64>, no_create: bool, items: &[S]) -> Vec<Arg> {
    insert_args_with("CF.INSERTNX", key, capacity, no_create, items)
}

/// Per item: `1` inserted, `0` already present, `-1` filter full.
pub fn insert_nx_result(reply: &Reply) -> Result<Vec<i64>> {
    parse::scalar_array(reply, 0)
}

// ============================================================================
// Lifecycle
// ============================================================================

/// `CF.RESERVE key capacity [BUCKETSIZE b] [MAXITERATIONS m] [EXPANSION x]`
pub fn reserve_args(key: &str, capacity: i64, options: &ReserveOptions) -> Vec<Arg> {
    let mut args = Vec::with_capacity(9);
    args.extend(args!["CF.RESERVE", key, capacity]);
    if let Some(b) = options.bucket_size {
        args.extend(args!["BUCKETSIZE", b]);
    }
    if let Some(m) = options.max_iterations {
        args.extend(args!["MAXITERATIONS", m]);
    }
    if let Some(x) = options.expansion_rate {
        args.extend(args!["EXPANSION", x]);
    }
    args
}

pub fn info_args(key: &str) -> Vec<Arg> {
    args!["CF.INFO", key]
}

pub fn info_result(reply: &Reply) -> Result<Info> {
    let arr = parse::array(reply, 16)?;
    Ok(Info {
        size: parse::scalar(&arr[1])?,
        num_buckets: parse::scalar(&arr[3])?,
        num_filters: parse::scalar(&arr[5])?,
        num_items_inserted: parse::scalar(&arr[7])?,
        num_items_deleted: parse::scalar(&arr[9])?,
        bucket_size: parse::scalar(&arr[11])?,
        expansion_rate: parse::scalar(&arr[13])?,
        max_iteration: parse::scalar(&arr[15])?,
    })
}

// ============================================================================
// Dump / restore
// ============================================================================

pub fn scan_dump_args(key: &str, iter: i64) -> Vec<Arg> {
    args!["CF.SCANDUMP", key, iter]
}

pub fn scan_dump_result(reply: &Reply) -> Result<ScanDump> {
    scan_dump::parse_scan_dump(reply)
}

pub fn load_chunk_args(key: &str, iter: i64, data: &[u8]) -> Vec<Arg> {
    args!["CF.LOADCHUNK", key, iter, data]
}

pub async fn dump_batch<E: Executor + ?Sized>(executor: &E, key: &str) -> Result<Vec<ScanDump>> {
    scan_dump::dump_batch(executor, key, scan_dump_args).await
}

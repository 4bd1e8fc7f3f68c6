//! Bloom filter (`BF.*`).

use serde::{Deserialize, Serialize};

use crate::args::{self, Arg};
use crate::executor::Executor;
use crate::reply::{parse, Reply};
use crate::scan_dump::{self, ScanDump};
use crate::Result;

/// `BF.INFO` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub capacity: i64,
    pub size: i64,
    pub num_filters: i64,
    pub num_items: i64,
    pub expansion_rate: i64,
}

/// Sizing settings for `BF.RESERVE` and `BF.INSERT`.
///
/// `BF.RESERVE` requires `error_rate` and `capacity`; leaving either unset
/// yields a command the server will reject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub error_rate: Option<f64>,
    pub capacity: Option<i64>,
    pub expansion_rate: Option<i64>,
    pub non_scaling: bool,
}

impl Options {
    pub fn new(error_rate: f64, capacity: i64) -> Self {
        Self {
            error_rate: Some(error_rate),
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn with_expansion(mut self, rate: i64) -> Self {
        self.expansion_rate = Some(rate);
        self
    }

    pub fn non_scaling(mut self) -> Self {
        self.non_scaling = true;
        self
    }

    fn append_scaling(&self, args: &mut Vec<Arg>) {
        if let Some(x) = self.expansion_rate {
            args.extend(args!["EXPANSION", x]);
        }
        if self.non_scaling {
            args.push(Arg::from("NONSCALING"));
        }
    }
}

// ============================================================================
// Single item
// ============================================================================

pub fn add_args(key: &str, item: &str) -> Vec<Arg> {
    args!["BF.ADD", key, item]
}

pub fn add_result(reply: &Reply) -> Result<bool> {
    parse::int_bool(reply)
}

pub fn exists_args(key: &str, item: &str) -> Vec<Arg> {
    args!["BF.EXISTS", key, item]
}

pub fn exists_result(reply: &Reply) -> Result<bool> {
    parse::int_bool(reply)
}

// ============================================================================
// Batches
// ============================================================================

pub fn madd_args<S: AsRef<str>>(key: &str, items: &[S]) -> Vec<Arg> {
    args::by_key_and_items("BF.MADD", key, items)
}

pub fn madd_result(reply: &Reply) -> Result<Vec<bool>> {
    parse::int_bool_array(reply, 0)
}

pub fn mexists_args<S: AsRef<str>>(key: &str, items: &[S]) -> Vec<Arg> {
    args::by_key_and_items("BF.MEXISTS", key, items)
}

pub fn mexists_result(reply: &Reply) -> Result<Vec<bool>> {
    parse::int_bool_array(reply, 0)
}

/// `BF.INSERT key [CAPACITY c] [ERROR e] [EXPANSION x] [NONSCALING] [NOCREATE] ITEMS item...`
pub fn insert_args<S: AsRef<str>>(
    key: &str,
    options: Option<&Options>,
    no_create: bool,
    items: &[S],
) -> Vec<Arg> {
    let mut args = Vec::with_capacity(11 + items.len());
    args.extend(args!["BF.INSERT", key]);
    if let Some(opt) = options {
        if let Some(c) = opt.capacity {
            args.extend(args!["CAPACITY", c]);
        }
        if let Some(e) = opt.error_rate {
            args.extend(args!["ERROR", e]);
        }
        opt.append_scaling(&mut args);
    }
    if no_create {
        args.push(Arg::from("NOCREATE"));
    }
    args.push(Arg::from("ITEMS"));
    args.extend(items.iter().map(|i| Arg::from(i.as_ref())));
    args
}

pub fn insert_result(reply: &Reply) -> Result<Vec<bool>> {
    parse::int_bool_array(reply, 0)
}

// ============================================================================
// Lifecycle
// ============================================================================

/// `BF.RESERVE key error_rate capacity [EXPANSION x] [NONSCALING]`
pub fn reserve_args(key: &str, options: &Options) -> Vec<Arg> {
    let mut args = Vec::with_capacity(7);
    args.extend(args!["BF.RESERVE", key]);
    args.extend(options.error_rate.map(Arg::from));
    args.extend(options.capacity.map(Arg::from));
    options.append_scaling(&mut args);
    args
}

pub fn info_args(key: &str) -> Vec<Arg> {
    args!["BF.INFO", key]
}

/// `[Capacity, c, Size, s, Number of filters, n, Number of items inserted, i, Expansion rate, x]`
pub fn info_result(reply: &Reply) -> Result<Info> {
    let arr = parse::array(reply, 10)?;
    Ok(Info {
        capacity: parse::scalar(&arr[1])?,
        size: parse::scalar(&arr[3])?,
        num_filters: parse::scalar(&arr[5])?,
        num_items: parse::scalar(&arr[7])?,
        expansion_rate: parse::scalar(&arr[9])?,
    })
}

// ============================================================================
// Dump / restore
// ============================================================================

pub fn scan_dump_args(key: &str, iter: i64) -> Vec<Arg> {
    args!["BF.SCANDUMP", key, iter]
}

pub fn scan_dump_result(reply: &Reply) -> Result<ScanDump> {
    scan_dump::parse_scan_dump(reply)
}

pub fn load_chunk_args(key: &str, iter: i64, data: &[u8]) -> Vec<Arg> {
    args!["BF.LOADCHUNK", key, iter, data]
}

/// Dump the whole filter as a sequence of chunks, ready for `BF.LOADCHUNK`.
pub async fn dump_batch<E: Executor + ?Sized>(executor: &E, key: &str) -> Result<Vec<ScanDump>> {
    scan_dump::dump_batch(executor, key, scan_dump_args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_args_exact() {
        assert_eq!(add_args("k", "x"), args!["BF.ADD", "k", "x"]);
        assert_eq!(exists_args("k", "x"), args!["BF.EXISTS", "k", "x"]);
    }

    #[test]
    fn test_insert_args_full_order() {
        let opt = Options {
            error_rate: Some(0.01),
            capacity: Some(1000),
            expansion_rate: Some(2),
            non_scaling: true,
        };
        assert_eq!(
            insert_args("k", Some(&opt), true, &["a", "b"]),
            args![
                "BF.INSERT", "k", "CAPACITY", 1000i64, "ERROR", 0.01, "EXPANSION", 2i64,
                "NONSCALING", "NOCREATE", "ITEMS", "a", "b"
            ],
        );
    }

    #[test]
    fn test_insert_args_minimal() {
        assert_eq!(
            insert_args("k", None, false, &["a"]),
            args!["BF.INSERT", "k", "ITEMS", "a"],
        );
    }

    #[test]
    fn test_reserve_args() {
        assert_eq!(
            reserve_args("k", &Options::new(0.001, 5000).with_expansion(4)),
            args!["BF.RESERVE", "k", 0.001, 5000i64, "EXPANSION", 4i64],
        );
        // missing sizing is passed through for the server to reject
        assert_eq!(
            reserve_args("k", &Options::default().non_scaling()),
            args!["BF.RESERVE", "k", "NONSCALING"],
        );
    }

    #[test]
    fn test_info_result() {
        let r = Reply::from(vec![
            Reply::from("Capacity"), Reply::Int(100),
            Reply::from("Size"), Reply::Int(296),
            Reply::from("Number of filters"), Reply::Int(1),
            Reply::from("Number of items inserted"), Reply::Int(3),
            Reply::from("Expansion rate"), Reply::Int(2),
        ]);
        assert_eq!(
            info_result(&r).unwrap(),
            Info { capacity: 100, size: 296, num_filters: 1, num_items: 3, expansion_rate: 2 }
        );
    }

    #[test]
    fn test_info_result_short_or_mistyped() {
        let short = Reply::from(vec![Reply::from("Capacity"), Reply::Int(100)]);
        assert!(matches!(info_result(&short), Err(Error::InvalidData(_))));

        let mut fields: Vec<Reply> = (0..10).map(|i| Reply::Int(i)).collect();
        fields[3] = Reply::from("296");
        assert!(matches!(info_result(&Reply::Array(fields)), Err(Error::InvalidType { .. })));
    }

    #[test]
    fn test_load_chunk_args_carries_bytes() {
        assert_eq!(
            load_chunk_args("k", 9, &[0, 1, 2]),
            vec![Arg::from("BF.LOADCHUNK"), Arg::from("k"), Arg::Int(9), Arg::Bytes(vec![0, 1, 2])],
        );
    }
}

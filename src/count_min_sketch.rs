//! Count-Min sketch (`CMS.*`).

use serde::{Deserialize, Serialize};

use crate::args::{self, Arg};
use crate::model::ItemAmount;
use crate::reply::{parse, Reply};
use crate::Result;

/// `CMS.INFO` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub width: i64,
    pub depth: i64,
    pub count: i64,
}

pub fn incr_by_args(key: &str, item_amounts: &[ItemAmount]) -> Vec<Arg> {
    args::by_key_and_item_amounts("CMS.INCRBY", key, item_amounts)
}

/// Estimated count of each item after the increment.
pub fn incr_by_result(reply: &Reply) -> Result<Vec<i64>> {
    parse::scalar_array(reply, 0)
}

pub fn info_args(key: &str) -> Vec<Arg> {
    args!["CMS.INFO", key]
}

pub fn info_result(reply: &Reply) -> Result<Info> {
    let arr = parse::array(reply, 6)?;
    Ok(Info {
        width: parse::scalar(&arr[1])?,
        depth: parse::scalar(&arr[3])?,
        count: parse::scalar(&arr[5])?,
    })
}

pub fn init_by_dim_args(key: &str, width: i64, depth: i64) -> Vec<Arg> {
    args!["CMS.INITBYDIM", key, width, depth]
}

pub fn init_by_prob_args(key: &str, error: f64, probability: f64) -> Vec<Arg> {
    args!["CMS.INITBYPROB", key, error, probability]
}

/// `CMS.MERGE dest numKeys src... [WEIGHTS w...]`
pub fn merge_args<S: AsRef<str>>(dest_key: &str, src_keys: &[S], weights: &[i64]) -> Vec<Arg> {
    let mut args = Vec::with_capacity(4 + src_keys.len() + weights.len());
    args.extend(args!["CMS.MERGE", dest_key, src_keys.len()]);
    args.extend(src_keys.iter().map(|k| Arg::from(k.as_ref())));
    if !weights.is_empty() {
        args.push(Arg::from("WEIGHTS"));
        args.extend(weights.iter().copied().map(Arg::Int));
    }
    args
}

pub fn query_args<S: AsRef<str>>(key: &str, items: &[S]) -> Vec<Arg> {
    args::by_key_and_items("CMS.QUERY", key, items)
}

pub fn query_result(reply: &Reply) -> Result<Vec<i64>> {
    parse::scalar_array(reply, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_args() {
        assert_eq!(
            merge_args("dest", &["a", "b"], &[1, 3]),
            args!["CMS.MERGE", "dest", 2i64, "a", "b", "WEIGHTS", 1i64, 3i64],
        );
        assert_eq!(
            merge_args("dest", &["a"], &[]),
            args!["CMS.MERGE", "dest", 1i64, "a"],
        );
    }

    #[test]
    fn test_init_args() {
        assert_eq!(init_by_dim_args("k", 2000, 5), args!["CMS.INITBYDIM", "k", 2000i64, 5i64]);
        assert_eq!(init_by_prob_args("k", 0.001, 0.01), args!["CMS.INITBYPROB", "k", 0.001, 0.01]);
    }

    #[test]
    fn test_incr_by_roundtrip_counts() {
        let ias = [ItemAmount::new("foo", 10), ItemAmount::new("bar", 42)];
        let args = incr_by_args("k", &ias);
        // the store echoes the estimated counts; with one increment each they equal the amounts
        let echoed: Vec<i64> = args[2..].chunks(2).filter_map(|c| c[1].as_int()).collect();
        assert_eq!(incr_by_result(&Reply::from(echoed)).unwrap(), vec![10, 42]);
    }

    #[test]
    fn test_info_result() {
        let r = Reply::from(vec![
            Reply::from("width"), Reply::Int(2000),
            Reply::from("depth"), Reply::Int(7),
            Reply::from("count"), Reply::Int(52),
        ]);
        assert_eq!(info_result(&r).unwrap(), Info { width: 2000, depth: 7, count: 52 });
        assert!(matches!(info_result(&Reply::from(vec![1i64])), Err(Error::InvalidData(_))));
    }
}

//! # Time series (`TS.*`)
//!
//! Timestamps travel as Unix milliseconds and are exposed as
//! `DateTime<Utc>`; durations (retention, buckets) as `chrono::Duration`.
//!
//! Sample values arrive as text under RESP2 and as doubles under RESP3;
//! both decode to `f64`.

pub mod options;
pub mod query;
pub mod info;

use chrono::{DateTime, Duration, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::args::Arg;
use crate::reply::{parse, Reply};
use crate::{Error, Result};

pub use info::{Info, Rule};
pub use options::{Aggregator, DuplicatePolicy, Options};
pub use query::{Aggregation, GroupBy, MultiQuery};
use options::append_options;

// ============================================================================
// Samples
// ============================================================================

/// A decoded `(timestamp, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// A sample to write. `time: None` lets the server stamp it (`*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedSample {
    pub key: String,
    pub time: Option<DateTime<Utc>>,
    pub value: f64,
}

impl KeyedSample {
    pub fn new(key: impl Into<String>, time: DateTime<Utc>, value: f64) -> Self {
        Self { key: key.into(), time: Some(time), value }
    }

    pub fn now(key: impl Into<String>, value: f64) -> Self {
        Self { key: key.into(), time: None, value }
    }
}

/// Labels plus samples of one series in a multi-series reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiSample {
    pub labels: Vec<(String, String)>,
    pub samples: Vec<Sample>,
}

fn timestamp_arg(time: Option<DateTime<Utc>>) -> Arg {
    time.map_or_else(|| Arg::from("*"), |t| Arg::Int(t.timestamp_millis()))
}

fn parse_time(reply: &Reply) -> Result<DateTime<Utc>> {
    let ms = parse::scalar::<i64>(reply)?;
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| Error::InvalidData(format!("timestamp out of range: {ms}")))
}

/// `[timestamp, value]`
pub fn parse_sample(reply: &Reply) -> Result<Sample> {
    let arr = parse::array(reply, 2)?;
    Ok(Sample {
        time: parse_time(&arr[0])?,
        value: parse::float_text(&arr[1])?,
    })
}

// ============================================================================
// Series lifecycle
// ============================================================================

pub fn create_args(key: &str, options: Option<&Options>) -> Vec<Arg> {
    let mut args = Vec::with_capacity(11 + options.map_or(0, Options::label_count) * 2);
    args.extend(args!["TS.CREATE", key]);
    append_options(&mut args, options, false, "DUPLICATE_POLICY");
    args
}

pub fn alter_args(key: &str, options: Option<&Options>) -> Vec<Arg> {
    let mut args = Vec::with_capacity(11 + options.map_or(0, Options::label_count) * 2);
    args.extend(args!["TS.ALTER", key]);
    append_options(&mut args, options, true, "DUPLICATE_POLICY");
    args
}

/// `TS.CREATERULE src dest AGGREGATION agg bucket [alignTimestamp]`
pub fn create_rule_args(
    src_key: &str,
    dest_key: &str,
    aggregator: Aggregator,
    bucket_duration: Duration,
    align: Option<Duration>,
) -> Vec<Arg> {
    let mut args = Vec::with_capacity(7);
    args.extend(args![
        "TS.CREATERULE",
        src_key,
        dest_key,
        "AGGREGATION",
        aggregator.as_str(),
        bucket_duration.num_milliseconds()
    ]);
    if let Some(a) = align {
        args.push(Arg::Int(a.num_milliseconds()));
    }
    args
}

pub fn delete_rule_args(src_key: &str, dest_key: &str) -> Vec<Arg> {
    args!["TS.DELETERULE", src_key, dest_key]
}

pub fn info_args(key: &str) -> Vec<Arg> {
    args!["TS.INFO", key]
}

pub fn info_result(reply: &Reply) -> Result<Info> {
    info::parse_info(reply)
}

// ============================================================================
// Writes
// ============================================================================

/// `TS.ADD key timestamp value [options]`, duplicate policy tagged `ON_DUPLICATE`.
pub fn add_args(sample: &KeyedSample, options: Option<&Options>) -> Vec<Arg> {
    let mut args = Vec::with_capacity(13 + options.map_or(0, Options::label_count) * 2);
    args.extend(args!["TS.ADD", &sample.key]);
    args.push(timestamp_arg(sample.time));
    args.push(Arg::Float(sample.value));
    append_options(&mut args, options, false, "ON_DUPLICATE");
    args
}

/// The timestamp the sample was stored under.
pub fn add_result(reply: &Reply) -> Result<DateTime<Utc>> {
    parse_time(reply)
}

fn incr_decr_args(
    command: &str,
    key: &str,
    value: f64,
    time: Option<DateTime<Utc>>,
    options: Option<&Options>,
) -> Vec<Arg> {
    let mut args = Vec::with_capacity(13 + options.map_or(0, Options::label_count) * 2);
    args.extend(args![command, key, value]);
    if let Some(t) = time {
        args.extend(args!["TIMESTAMP", t.timestamp_millis()]);
    }
    append_options(&mut args, options, false, "DUPLICATE_POLICY");
    args
}

/// `TS.INCRBY key value [TIMESTAMP ts] [options]`
pub fn incr_by_args(key: &str, value: f64, time: Option<DateTime<Utc>>, options: Option<&Options>) -> Vec<Arg> {
    incr_decr_args("TS.INCRBY", key, value, time, options)
}

/// `TS.DECRBY key value [TIMESTAMP ts] [options]`
pub fn decr_by_args(key: &str, value: f64, time: Option<DateTime<Utc>>, options: Option<&Options>) -> Vec<Arg> {
    incr_decr_args("TS.DECRBY", key, value, time, options)
}

/// Timestamp of the upserted sample (shared by `TS.INCRBY` and `TS.DECRBY`).
pub fn incr_by_result(reply: &Reply) -> Result<DateTime<Utc>> {
    parse_time(reply)
}

pub fn madd_args(samples: &[KeyedSample]) -> Vec<Arg> {
    let mut args = Vec::with_capacity(1 + samples.len() * 3);
    args.push(Arg::from("TS.MADD"));
    for s in samples {
        args.push(Arg::from(&s.key));
        args.push(timestamp_arg(s.time));
        args.push(Arg::Float(s.value));
    }
    args
}

/// Per sample: its stored timestamp, or `None` where the server answered with an error.
pub fn madd_result(reply: &Reply) -> Result<Vec<Option<DateTime<Utc>>>> {
    parse::map_array(reply, 0, |e| match parse::nullable_scalar::<i64>(e)? {
        Some(_) => parse_time(e).map(Some),
        None => Ok(None),
    })
}

/// `TS.DEL key from to`
pub fn del_args(key: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Arg> {
    args!["TS.DEL", key, from.timestamp_millis(), to.timestamp_millis()]
}

/// Number of samples removed.
pub fn del_result(reply: &Reply) -> Result<i64> {
    parse::scalar(reply)
}

// ============================================================================
// Reads
// ============================================================================

pub fn get_args(key: &str) -> Vec<Arg> {
    args!["TS.GET", key]
}

/// Last sample, or `None` for an empty series (`[]`).
pub fn get_result(reply: &Reply) -> Result<Option<Sample>> {
    if parse::array(reply, 0)?.is_empty() {
        return Ok(None);
    }
    parse_sample(reply).map(Some)
}

/// `TS.RANGE key from to [LATEST] [FILTER_BY_TS..] [FILTER_BY_VALUE..] [COUNT n] [aggregation]`
pub fn range_args(key: &str, q: &MultiQuery) -> Vec<Arg> {
    let mut args = Vec::with_capacity(19 + q.filter_by_ts.len());
    args.extend(args!["TS.RANGE", key]);
    q.append_range(&mut args);
    q.append_latest(&mut args);
    q.append_filter_by_ts(&mut args);
    q.append_filter_by_value(&mut args);
    q.append_count(&mut args);
    q.append_aggregation(&mut args);
    args
}

pub fn rev_range_args(key: &str, q: &MultiQuery) -> Vec<Arg> {
    let mut args = range_args(key, q);
    args[0] = Arg::from("TS.REVRANGE");
    args
}

/// Shared by `TS.RANGE` and `TS.REVRANGE`.
pub fn range_result(reply: &Reply) -> Result<Vec<Sample>> {
    parse::map_array(reply, 0, parse_sample)
}

/// `TS.MRANGE from to [LATEST] [FILTER_BY_TS..] [FILTER_BY_VALUE..] [WITHLABELS|SELECTED_LABELS..]
/// [COUNT n] [aggregation] FILTER expr.. [GROUPBY label REDUCE r]`
pub fn mrange_args(q: &MultiQuery) -> Vec<Arg> {
    let mut args = Vec::with_capacity(24 + q.filter_by_ts.len() + q.selected_labels.len() + q.filters.len());
    args.push(Arg::from("TS.MRANGE"));
    q.append_range(&mut args);
    q.append_latest(&mut args);
    q.append_filter_by_ts(&mut args);
    q.append_filter_by_value(&mut args);
    q.append_label_selection(&mut args);
    q.append_count(&mut args);
    q.append_aggregation(&mut args);
    q.append_filters(&mut args);
    q.append_group_by(&mut args);
    args
}

pub fn mrev_range_args(q: &MultiQuery) -> Vec<Arg> {
    let mut args = mrange_args(q);
    args[0] = Arg::from("TS.MREVRANGE");
    args
}

/// `[[key, labels, [[ts, v], ...]], ...]`, shared by `TS.MRANGE` and `TS.MREVRANGE`.
pub fn mrange_result(reply: &Reply) -> Result<HashMap<String, MultiSample>> {
    parse_multi(reply, range_result)
}

/// `TS.MGET [LATEST] [WITHLABELS|SELECTED_LABELS..] FILTER expr..`
pub fn mget_args(q: &MultiQuery) -> Vec<Arg> {
    let mut args = Vec::with_capacity(4 + q.selected_labels.len() + q.filters.len());
    args.push(Arg::from("TS.MGET"));
    q.append_latest(&mut args);
    q.append_label_selection(&mut args);
    q.append_filters(&mut args);
    args
}

/// `[[key, labels, [ts, v]], ...]`; a series without samples yields no samples.
pub fn mget_result(reply: &Reply) -> Result<HashMap<String, MultiSample>> {
    parse_multi(reply, |r| Ok(get_result(r)?.into_iter().collect()))
}

fn parse_multi<F>(reply: &Reply, mut samples: F) -> Result<HashMap<String, MultiSample>>
where
    F: FnMut(&Reply) -> Result<Vec<Sample>>,
{
    let series = parse::array(reply, 0)?;
    let mut res = HashMap::with_capacity(series.len());
    for e in series {
        let arr = parse::array(e, 3)?;
        let key = parse::scalar::<String>(&arr[0])?;
        let entry = MultiSample {
            labels: parse::string_pair_array(&arr[1], 0)?,
            samples: samples(&arr[2])?,
        };
        res.insert(key, entry);
    }
    Ok(res)
}

pub fn query_index_args<S: AsRef<str>>(filters: &[S]) -> Vec<Arg> {
    let mut args = Vec::with_capacity(1 + filters.len());
    args.push(Arg::from("TS.QUERYINDEX"));
    args.extend(filters.iter().map(|f| Arg::from(f.as_ref())));
    args
}

pub fn query_index_result(reply: &Reply) -> Result<Vec<String>> {
    parse::scalar_array(reply, 0)
}

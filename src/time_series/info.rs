//! `TS.INFO` decoding.
//!
//! The reply is a flat `[name, value, name, value, ...]` list whose set of
//! fields grows between module versions, so fields are looked up by name and
//! unknown ones are skipped.

use serde::{Deserialize, Serialize};

use crate::reply::{parse, Reply};
use crate::{Error, Result};

/// A compaction rule attached to a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub dest_key: String,
    pub bucket_duration_ms: i64,
    pub aggregator: String,
}

/// `TS.INFO` snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub total_samples: i64,
    pub memory_usage: i64,
    pub first_timestamp: i64,
    pub last_timestamp: i64,
    pub retention_time: i64,
    pub chunk_count: i64,
    pub chunk_size: i64,
    pub chunk_type: Option<String>,
    pub duplicate_policy: Option<String>,
    pub labels: Vec<(String, String)>,
    pub source_key: Option<String>,
    pub rules: Vec<Rule>,
}

pub(crate) fn parse_info(reply: &Reply) -> Result<Info> {
    let fields = parse::interlaced(reply, 0, |k, v| Ok((parse::scalar::<String>(k)?, v)))?;
    let find = |name: &str| fields.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
    let required = |name: &str| -> Result<i64> {
        let v = find(name).ok_or_else(|| Error::InvalidData(format!("TS.INFO: missing {name}")))?;
        parse::scalar(v)
    };
    let optional_text = |name: &str| -> Result<Option<String>> {
        find(name).map_or(Ok(None), parse::nullable_scalar::<String>)
    };

    Ok(Info {
        total_samples: required("totalSamples")?,
        memory_usage: required("memoryUsage")?,
        first_timestamp: required("firstTimestamp")?,
        last_timestamp: required("lastTimestamp")?,
        retention_time: required("retentionTime")?,
        chunk_count: required("chunkCount")?,
        chunk_size: required("chunkSize")?,
        chunk_type: optional_text("chunkType")?,
        duplicate_policy: optional_text("duplicatePolicy")?,
        labels: find("labels").map_or(Ok(Vec::new()), |v| parse::string_pair_array(v, 0))?,
        source_key: optional_text("sourceKey")?,
        rules: find("rules").map_or(Ok(Vec::new()), parse_rules)?,
    })
}

fn parse_rules(reply: &Reply) -> Result<Vec<Rule>> {
    parse::map_array(reply, 0, |r| {
        let arr = parse::array(r, 3)?;
        Ok(Rule {
            dest_key: parse::scalar(&arr[0])?,
            bucket_duration_ms: parse::scalar(&arr[1])?,
            aggregator: parse::scalar(&arr[2])?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<Reply> {
        vec![
            Reply::from("totalSamples"), Reply::Int(100),
            Reply::from("memoryUsage"), Reply::Int(4184),
            Reply::from("firstTimestamp"), Reply::Int(1_000),
            Reply::from("lastTimestamp"), Reply::Int(2_000),
            Reply::from("retentionTime"), Reply::Int(0),
            Reply::from("chunkCount"), Reply::Int(1),
            Reply::from("chunkSize"), Reply::Int(4096),
            Reply::from("chunkType"), Reply::from("compressed"),
            Reply::from("duplicatePolicy"), Reply::Null,
            Reply::from("labels"), Reply::from(vec![Reply::from(vec!["type", "temp"])]),
            Reply::from("sourceKey"), Reply::Null,
            Reply::from("rules"), Reply::from(vec![Reply::from(vec![
                Reply::from("temp:avg"), Reply::Int(60_000), Reply::from("AVG"),
            ])]),
            Reply::from("ignoreMaxTimeDiff"), Reply::Int(0),
        ]
    }

    #[test]
    fn test_parse_info() {
        let info = parse_info(&Reply::Array(fixture())).unwrap();
        assert_eq!(info.total_samples, 100);
        assert_eq!(info.chunk_size, 4096);
        assert_eq!(info.chunk_type.as_deref(), Some("compressed"));
        assert_eq!(info.duplicate_policy, None);
        assert_eq!(info.labels, vec![("type".to_string(), "temp".to_string())]);
        assert_eq!(info.source_key, None);
        assert_eq!(
            info.rules,
            vec![Rule { dest_key: "temp:avg".into(), bucket_duration_ms: 60_000, aggregator: "AVG".into() }]
        );
    }

    #[test]
    fn test_missing_required_field() {
        let f = fixture()[2..].to_vec();
        assert!(matches!(parse_info(&Reply::Array(f)), Err(Error::InvalidData(_))));
    }
}

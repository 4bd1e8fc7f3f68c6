//! Series settings shared by `TS.CREATE`, `TS.ALTER`, `TS.ADD`, `TS.INCRBY`
//! and `TS.DECRBY`, plus the policy and aggregator keywords.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::args::Arg;

/// What to do when a sample arrives for an existing timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    Block,
    First,
    Last,
    Min,
    Max,
    Sum,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Block => "BLOCK",
            DuplicatePolicy::First => "FIRST",
            DuplicatePolicy::Last => "LAST",
            DuplicatePolicy::Min => "MIN",
            DuplicatePolicy::Max => "MAX",
            DuplicatePolicy::Sum => "SUM",
        }
    }
}

/// Aggregation / reduction function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregator {
    Avg,
    First,
    Last,
    Min,
    Max,
    Sum,
    Range,
    Count,
    StdP,
    StdS,
    VarP,
    VarS,
    Twa,
}

impl Aggregator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregator::Avg => "AVG",
            Aggregator::First => "FIRST",
            Aggregator::Last => "LAST",
            Aggregator::Min => "MIN",
            Aggregator::Max => "MAX",
            Aggregator::Sum => "SUM",
            Aggregator::Range => "RANGE",
            Aggregator::Count => "COUNT",
            Aggregator::StdP => "STD.P",
            Aggregator::StdS => "STD.S",
            Aggregator::VarP => "VAR.P",
            Aggregator::VarS => "VAR.S",
            Aggregator::Twa => "TWA",
        }
    }
}

/// Optional series settings. Each set field adds one clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub retention: Option<Duration>,
    pub uncompressed: bool,
    pub chunk_size: Option<i64>,
    pub duplicate_policy: Option<DuplicatePolicy>,
    /// `Some(vec![])` only matters for `TS.ALTER`, where it clears all labels.
    pub labels: Option<Vec<(String, String)>>,
}

impl Options {
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = Some(policy);
        self
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.get_or_insert_with(Vec::new).push((name.into(), value.into()));
        self
    }

    /// Append `[RETENTION ms] [ENCODING UNCOMPRESSED] [CHUNK_SIZE n] [<dup_tag> policy] [LABELS k v...]`.
    pub(crate) fn append_args(&self, args: &mut Vec<Arg>, altering: bool, dup_tag: &str) {
        if let Some(r) = self.retention {
            args.extend(args!["RETENTION", r.num_milliseconds()]);
        }
        if self.uncompressed {
            args.extend(args!["ENCODING", "UNCOMPRESSED"]);
        }
        if let Some(n) = self.chunk_size {
            args.extend(args!["CHUNK_SIZE", n]);
        }
        if let Some(p) = self.duplicate_policy {
            args.extend(args![dup_tag, p.as_str()]);
        }
        match &self.labels {
            Some(labels) if !labels.is_empty() || altering => {
                args.push(Arg::from("LABELS"));
                for (name, value) in labels {
                    args.extend(args![name, value]);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn label_count(&self) -> usize {
        self.labels.as_ref().map_or(0, Vec::len)
    }
}

/// Apply `options` if present.
pub(crate) fn append_options(args: &mut Vec<Arg>, options: Option<&Options>, altering: bool, dup_tag: &str) {
    if let Some(opt) = options {
        opt.append_args(args, altering, dup_tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clause_order() {
        let opt = Options {
            retention: Some(Duration::hours(1)),
            uncompressed: true,
            chunk_size: Some(128),
            duplicate_policy: Some(DuplicatePolicy::Last),
            labels: Some(vec![("a".into(), "1".into())]),
        };
        let mut args = Vec::new();
        opt.append_args(&mut args, false, "DUPLICATE_POLICY");
        assert_eq!(
            args,
            args![
                "RETENTION", 3_600_000i64, "ENCODING", "UNCOMPRESSED", "CHUNK_SIZE", 128i64,
                "DUPLICATE_POLICY", "LAST", "LABELS", "a", "1"
            ],
        );
    }

    #[test]
    fn test_empty_labels_only_when_altering() {
        let opt = Options { labels: Some(vec![]), ..Default::default() };

        let mut create = Vec::new();
        opt.append_args(&mut create, false, "DUPLICATE_POLICY");
        assert!(create.is_empty());

        let mut alter = Vec::new();
        opt.append_args(&mut alter, true, "DUPLICATE_POLICY");
        assert_eq!(alter, args!["LABELS"]);
    }

    #[test]
    fn test_aggregator_keywords() {
        assert_eq!(Aggregator::StdP.as_str(), "STD.P");
        assert_eq!(Aggregator::Twa.as_str(), "TWA");
        assert_eq!(DuplicatePolicy::Block.as_str(), "BLOCK");
    }
}

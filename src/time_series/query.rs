//! Range / multi-series query settings and their clause order.

use chrono::{DateTime, Duration, Utc};

use crate::args::Arg;
use super::Aggregator;

/// `[ALIGN a] AGGREGATION agg bucket [BUCKETTIMESTAMP t] [EMPTY]`
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub align: Option<String>,
    pub aggregator: Aggregator,
    pub bucket_duration: Duration,
    pub bucket_timestamp: Option<String>,
    pub empty: bool,
}

impl Aggregation {
    pub fn new(aggregator: Aggregator, bucket_duration: Duration) -> Self {
        Self {
            align: None,
            aggregator,
            bucket_duration,
            bucket_timestamp: None,
            empty: false,
        }
    }

    fn append_args(&self, args: &mut Vec<Arg>) {
        if let Some(a) = &self.align {
            args.extend(args!["ALIGN", a]);
        }
        args.extend(args![
            "AGGREGATION",
            self.aggregator.as_str(),
            self.bucket_duration.num_milliseconds()
        ]);
        if let Some(t) = &self.bucket_timestamp {
            args.extend(args!["BUCKETTIMESTAMP", t]);
        }
        if self.empty {
            args.push(Arg::from("EMPTY"));
        }
    }
}

/// `GROUPBY label REDUCE reducer`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub label: String,
    pub reducer: Aggregator,
}

/// Query settings for `TS.RANGE`, `TS.MRANGE`, `TS.MGET` and their reverse
/// variants. Each command only reads the clauses it supports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiQuery {
    /// `None` renders `-` (earliest sample).
    pub from: Option<DateTime<Utc>>,
    /// `None` renders `+` (latest sample).
    pub to: Option<DateTime<Utc>>,
    pub latest: bool,
    pub filter_by_ts: Vec<DateTime<Utc>>,
    pub filter_by_value: Option<(f64, f64)>,
    pub with_labels: bool,
    pub selected_labels: Vec<String>,
    pub count: Option<i64>,
    pub aggregation: Option<Aggregation>,
    pub filters: Vec<String>,
    pub group_by: Option<GroupBy>,
}

impl MultiQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.filters.push(expr.into());
        self
    }

    pub fn with_labels(mut self) -> Self {
        self.with_labels = true;
        self
    }

    pub fn count(mut self, n: i64) -> Self {
        self.count = Some(n);
        self
    }

    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn group_by(mut self, label: impl Into<String>, reducer: Aggregator) -> Self {
        self.group_by = Some(GroupBy { label: label.into(), reducer });
        self
    }

    // ========================================================================
    // Clause appenders, called in protocol order by the command builders
    // ========================================================================

    pub(crate) fn append_range(&self, args: &mut Vec<Arg>) {
        args.push(self.from.map_or_else(|| Arg::from("-"), |t| Arg::Int(t.timestamp_millis())));
        args.push(self.to.map_or_else(|| Arg::from("+"), |t| Arg::Int(t.timestamp_millis())));
    }

    pub(crate) fn append_latest(&self, args: &mut Vec<Arg>) {
        if self.latest {
            args.push(Arg::from("LATEST"));
        }
    }

    pub(crate) fn append_filter_by_ts(&self, args: &mut Vec<Arg>) {
        if !self.filter_by_ts.is_empty() {
            args.push(Arg::from("FILTER_BY_TS"));
            args.extend(self.filter_by_ts.iter().map(|t| Arg::Int(t.timestamp_millis())));
        }
    }

    pub(crate) fn append_filter_by_value(&self, args: &mut Vec<Arg>) {
        if let Some((min, max)) = self.filter_by_value {
            args.extend(args!["FILTER_BY_VALUE", min, max]);
        }
    }

    /// `WITHLABELS` wins over `SELECTED_LABELS`.
    pub(crate) fn append_label_selection(&self, args: &mut Vec<Arg>) {
        if self.with_labels {
            args.push(Arg::from("WITHLABELS"));
        } else if !self.selected_labels.is_empty() {
            args.push(Arg::from("SELECTED_LABELS"));
            args.extend(self.selected_labels.iter().map(Arg::from));
        }
    }

    pub(crate) fn append_count(&self, args: &mut Vec<Arg>) {
        if let Some(n) = self.count {
            args.extend(args!["COUNT", n]);
        }
    }

    pub(crate) fn append_aggregation(&self, args: &mut Vec<Arg>) {
        if let Some(agg) = &self.aggregation {
            agg.append_args(args);
        }
    }

    /// `FILTER` is mandatory for the multi-series commands, so it is always emitted.
    pub(crate) fn append_filters(&self, args: &mut Vec<Arg>) {
        args.push(Arg::from("FILTER"));
        args.extend(self.filters.iter().map(Arg::from));
    }

    pub(crate) fn append_group_by(&self, args: &mut Vec<Arg>) {
        if let Some(g) = &self.group_by {
            if !g.label.is_empty() {
                args.extend(args!["GROUPBY", &g.label, "REDUCE", g.reducer.as_str()]);
            }
        }
    }
}

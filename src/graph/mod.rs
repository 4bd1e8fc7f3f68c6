//! # Graph (`GRAPH.*`)
//!
//! Command builders and result-set decoding, plus [`pattern`] for rendering
//! Cypher pattern text from typed entities.
//!
//! A query reply is `[header, rows, statistics?]`. Cells stay raw [`Reply`]s;
//! decode nodes and relationships out of them with [`parse_node`] and
//! [`parse_relationship`].

pub mod entity;
pub mod pattern;

use serde::{Deserialize, Serialize};

use crate::args::Arg;
use crate::reply::{parse, Reply};
use crate::{Error, Result};

pub use entity::{parse_node, parse_relationship, Node, Relationship};

// ============================================================================
// Commands
// ============================================================================

pub fn query_args(key: &str, query: &str) -> Vec<Arg> {
    args!["GRAPH.QUERY", key, query]
}

/// Read-only variant; the server rejects writes.
pub fn ro_query_args(key: &str, query: &str) -> Vec<Arg> {
    args!["GRAPH.RO_QUERY", key, query]
}

pub fn delete_args(key: &str) -> Vec<Arg> {
    args!["GRAPH.DELETE", key]
}

pub fn list_args() -> Vec<Arg> {
    args!["GRAPH.LIST"]
}

pub fn list_result(reply: &Reply) -> Result<Vec<String>> {
    parse::scalar_array(reply, 0)
}

// ============================================================================
// Result set
// ============================================================================

/// Tabular result of `GRAPH.QUERY` / `GRAPH.RO_QUERY`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Reply>>,
    /// Lines such as `"Nodes created: 1"`; empty when the server sent none.
    pub statistics: Vec<String>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index of a header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// A column name, sent either bare or as a compact `[column_type, name]` pair.
fn parse_column_name(reply: &Reply) -> Result<String> {
    match reply {
        Reply::Array(_) => parse::scalar(&parse::array(reply, 2)?[1]),
        _ => parse::scalar(reply),
    }
}

/// `[header, rows, statistics?]`; every row must be as wide as the header.
pub fn query_result(reply: &Reply) -> Result<ResultSet> {
    let parts = parse::array(reply, 2)?;
    let header = parse::map_array(&parts[0], 0, parse_column_name)?;
    let rows = parse::map_array(&parts[1], 0, |row| {
        let cells = parse::array(row, 0)?;
        if cells.len() != header.len() {
            return Err(Error::InvalidData(format!(
                "row has {} cells, header has {}",
                cells.len(),
                header.len()
            )));
        }
        Ok(cells.to_vec())
    })?;
    let statistics = match parts.get(2) {
        Some(stats) => parse::scalar_array(stats, 0)?,
        None => Vec::new(),
    };
    Ok(ResultSet { header, rows, statistics })
}

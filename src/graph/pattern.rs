//! Cypher pattern text rendering.
//!
//! A [`Pattern`] is one of a small, closed set of shapes (node,
//! relationship, relationship/node pair, path). [`PatternWriter`] walks it
//! and appends the pattern text to a caller-owned `String`, so larger queries
//! can be composed without intermediate allocations:
//!
//! ```
//! use redisstack::graph::pattern::{Node, Pattern};
//!
//! let mut query = String::from("MATCH ");
//! Pattern::from(Node::new("n").with_label("Person").with_property("age", 30))
//!     .render(&mut query)
//!     .unwrap();
//! assert_eq!(query, r#"MATCH (n:Person {"age":30})"#);
//! ```
//!
//! Rendering fails with [`Error::InvalidType`] for values that have no
//! Cypher literal (non-UTF-8 bytes, NaN, infinities). On failure the buffer
//! is restored to its length before the call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Property values
// ============================================================================

/// A property value as it is rendered into pattern text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<PropertyValue>),
    Map(PropertyMap),
}

/// Keys render in sorted order.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "NULL",
            PropertyValue::Bool(_) => "BOOLEAN",
            PropertyValue::Int(_) => "INTEGER",
            PropertyValue::Float(_) => "FLOAT",
            PropertyValue::Text(_) => "TEXT",
            PropertyValue::Bytes(_) => "BYTES",
            PropertyValue::List(_) => "LIST",
            PropertyValue::Map(_) => "MAP",
        }
    }
}

impl From<bool> for PropertyValue { fn from(v: bool) -> Self { PropertyValue::Bool(v) } }
impl From<i32> for PropertyValue { fn from(v: i32) -> Self { PropertyValue::Int(v as i64) } }
impl From<i64> for PropertyValue { fn from(v: i64) -> Self { PropertyValue::Int(v) } }
impl From<f64> for PropertyValue { fn from(v: f64) -> Self { PropertyValue::Float(v) } }
impl From<String> for PropertyValue { fn from(v: String) -> Self { PropertyValue::Text(v) } }
impl From<&str> for PropertyValue { fn from(v: &str) -> Self { PropertyValue::Text(v.to_owned()) } }
impl From<&[u8]> for PropertyValue { fn from(v: &[u8]) -> Self { PropertyValue::Bytes(v.to_vec()) } }
impl From<PropertyMap> for PropertyValue { fn from(v: PropertyMap) -> Self { PropertyValue::Map(v) } }
impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(v: Vec<T>) -> Self { PropertyValue::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(PropertyValue::Null) }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => PropertyValue::Null,
            J::Bool(b) => PropertyValue::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Int(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            J::String(s) => PropertyValue::Text(s),
            J::Array(items) => PropertyValue::List(items.into_iter().map(PropertyValue::from).collect()),
            J::Object(obj) => PropertyValue::Map(
                obj.into_iter().map(|(k, v)| (k, PropertyValue::from(v))).collect(),
            ),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// `(alias[:label][ {props}])`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub alias: String,
    pub label: Option<String>,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(alias: impl Into<String>) -> Self {
        Self { alias: alias.into(), ..Default::default() }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Variable-length hop bounds, `*[min]..[max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

/// `[alias[:type][ {props}]]`, or `[alias[:type]*min..max]` when a hop
/// range is set and there are no properties. With properties present the
/// hop range is not rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub alias: String,
    pub rel_type: Option<String>,
    pub properties: PropertyMap,
    pub hops: Option<HopRange>,
}

impl Relationship {
    pub fn new(alias: impl Into<String>) -> Self {
        Self { alias: alias.into(), ..Default::default() }
    }

    pub fn with_type(mut self, rel_type: impl Into<String>) -> Self {
        self.rel_type = Some(rel_type.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_hops(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.hops = Some(HopRange { min, max });
        self
    }
}

/// Edge direction token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connector {
    #[default]
    Both,
    Outgoing,
    Incoming,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::Both => "-",
            Connector::Outgoing => "->",
            Connector::Incoming => "<-",
        }
    }
}

/// `<leading><node><trailing><relationship>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipNodePair {
    pub leading: Connector,
    pub node: Node,
    pub trailing: Connector,
    pub relationship: Relationship,
}

impl RelationshipNodePair {
    pub fn new(leading: Connector, node: Node, trailing: Connector, relationship: Relationship) -> Self {
        Self { leading, node, trailing, relationship }
    }
}

/// Head node followed by pairs, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub head: Node,
    pub tail: Vec<RelationshipNodePair>,
}

impl Path {
    pub fn new(head: Node) -> Self {
        Self { head, tail: Vec::new() }
    }

    pub fn then(mut self, pair: RelationshipNodePair) -> Self {
        self.tail.push(pair);
        self
    }
}

/// Everything that renders to pattern text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Node(Node),
    Relationship(Relationship),
    Pair(RelationshipNodePair),
    Path(Path),
}

impl From<Node> for Pattern { fn from(v: Node) -> Self { Pattern::Node(v) } }
impl From<Relationship> for Pattern { fn from(v: Relationship) -> Self { Pattern::Relationship(v) } }
impl From<RelationshipNodePair> for Pattern { fn from(v: RelationshipNodePair) -> Self { Pattern::Pair(v) } }
impl From<Path> for Pattern { fn from(v: Path) -> Self { Pattern::Path(v) } }

impl Pattern {
    /// Append with the default [`RenderConfig`].
    pub fn render(&self, out: &mut String) -> Result<()> {
        self.render_with(out, &RenderConfig::default())
    }

    pub fn render_with(&self, out: &mut String, config: &RenderConfig) -> Result<()> {
        let start = out.len();
        let res = PatternWriter::new(out, config).pattern(self);
        if res.is_err() {
            out.truncate(start);
        }
        res
    }

    pub fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        self.render(&mut out)?;
        Ok(out)
    }
}

// ============================================================================
// Rendering configuration
// ============================================================================

/// How the quote character and backslash inside text values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscapePolicy {
    /// Text is written verbatim between quotes.
    #[default]
    None,
    /// The quote character and `\` are prefixed with `\`.
    Backslash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub quote: char,
    pub escape: EscapePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { quote: '"', escape: EscapePolicy::None }
    }
}

impl RenderConfig {
    pub fn escaped() -> Self {
        Self { escape: EscapePolicy::Backslash, ..Self::default() }
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Visitor appending pattern text to a buffer. Does not restore the buffer
/// on failure; [`Pattern::render_with`] does.
pub struct PatternWriter<'a> {
    out: &'a mut String,
    config: &'a RenderConfig,
}

impl<'a> PatternWriter<'a> {
    pub fn new(out: &'a mut String, config: &'a RenderConfig) -> Self {
        Self { out, config }
    }

    pub fn pattern(&mut self, pattern: &Pattern) -> Result<()> {
        match pattern {
            Pattern::Node(n) => self.node(n),
            Pattern::Relationship(r) => self.relationship(r),
            Pattern::Pair(p) => self.pair(p),
            Pattern::Path(p) => self.path(p),
        }
    }

    pub fn node(&mut self, node: &Node) -> Result<()> {
        self.out.push('(');
        self.out.push_str(&node.alias);
        if let Some(label) = node.label.as_deref().filter(|l| !l.is_empty()) {
            self.out.push(':');
            self.out.push_str(label);
        }
        if !node.properties.is_empty() {
            self.out.push(' ');
            self.map(&node.properties)?;
        }
        self.out.push(')');
        Ok(())
    }

    pub fn relationship(&mut self, rel: &Relationship) -> Result<()> {
        self.out.push('[');
        self.out.push_str(&rel.alias);
        if let Some(t) = rel.rel_type.as_deref().filter(|t| !t.is_empty()) {
            self.out.push(':');
            self.out.push_str(t);
        }
        if !rel.properties.is_empty() {
            self.out.push(' ');
            self.map(&rel.properties)?;
        } else if let Some(hops) = rel.hops {
            self.out.push('*');
            if let Some(min) = hops.min {
                self.out.push_str(&min.to_string());
            }
            self.out.push_str("..");
            if let Some(max) = hops.max {
                self.out.push_str(&max.to_string());
            }
        }
        self.out.push(']');
        Ok(())
    }

    pub fn pair(&mut self, pair: &RelationshipNodePair) -> Result<()> {
        self.out.push_str(pair.leading.as_str());
        self.node(&pair.node)?;
        self.out.push_str(pair.trailing.as_str());
        self.relationship(&pair.relationship)
    }

    pub fn path(&mut self, path: &Path) -> Result<()> {
        self.node(&path.head)?;
        path.tail.iter().try_for_each(|p| self.pair(p))
    }

    pub fn value(&mut self, value: &PropertyValue) -> Result<()> {
        match value {
            PropertyValue::Null => self.out.push_str("null"),
            PropertyValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            PropertyValue::Int(i) => self.out.push_str(&i.to_string()),
            PropertyValue::Float(f) => {
                if !f.is_finite() {
                    return Err(Error::InvalidType { expected: "FINITE FLOAT", got: value.type_name() });
                }
                self.out.push_str(&f.to_string());
            }
            PropertyValue::Text(s) => self.quoted(s),
            PropertyValue::Bytes(b) => match std::str::from_utf8(b) {
                Ok(s) => self.quoted(s),
                Err(_) => return Err(Error::InvalidType { expected: "TEXT", got: value.type_name() }),
            },
            PropertyValue::List(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.value(item)?;
                }
                self.out.push(']');
            }
            PropertyValue::Map(m) => self.map(m)?,
        }
        Ok(())
    }

    /// `{"k":v,...}` in key order.
    pub fn map(&mut self, map: &PropertyMap) -> Result<()> {
        self.out.push('{');
        for (i, (k, v)) in map.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.quoted(k);
            self.out.push(':');
            self.value(v)?;
        }
        self.out.push('}');
        Ok(())
    }

    fn quoted(&mut self, s: &str) {
        let quote = self.config.quote;
        self.out.push(quote);
        match self.config.escape {
            EscapePolicy::None => self.out.push_str(s),
            EscapePolicy::Backslash => {
                for c in s.chars() {
                    if c == quote || c == '\\' {
                        self.out.push('\\');
                    }
                    self.out.push(c);
                }
            }
        }
        self.out.push(quote);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(p: impl Into<Pattern>) -> String {
        let p: Pattern = p.into();
        p.to_text().unwrap()
    }

    #[test]
    fn test_node() {
        assert_eq!(text(Node::new("n")), "(n)");
        assert_eq!(text(Node::new("n").with_label("Person")), "(n:Person)");
        assert_eq!(
            text(Node::new("n").with_label("Person").with_property("age", 30)),
            r#"(n:Person {"age":30})"#
        );
    }

    #[test]
    fn test_empty_label_and_type_skipped() {
        assert_eq!(text(Node::new("n").with_label("")), "(n)");
        assert_eq!(text(Relationship::new("r").with_type("")), "[r]");
    }

    #[test]
    fn test_map_keys_sorted() {
        let n = Node::new("n").with_property("z", 1).with_property("a", "x");
        assert_eq!(text(n), r#"(n {"a":"x","z":1})"#);
    }

    #[test]
    fn test_relationship_hops() {
        let r = Relationship::new("r").with_type("KNOWS").with_hops(Some(1), Some(3));
        assert_eq!(text(r.clone()), "[r:KNOWS*1..3]");
        assert_eq!(text(Relationship::new("r").with_hops(None, Some(2))), "[r*..2]");
        assert_eq!(text(Relationship::new("r").with_hops(Some(2), None)), "[r*2..]");
        // properties suppress the hop range
        assert_eq!(text(r.with_property("w", true)), r#"[r:KNOWS {"w":true}]"#);
    }

    #[test]
    fn test_pair_and_path() {
        let pair = RelationshipNodePair::new(
            Connector::Both,
            Node::new("b"),
            Connector::Outgoing,
            Relationship::new("r").with_type("T"),
        );
        assert_eq!(text(pair.clone()), "-(b)->[r:T]");

        let path = Path::new(Node::new("a").with_label("A")).then(pair);
        assert_eq!(text(path), "(a:A)-(b)->[r:T]");
        assert_eq!(Connector::Incoming.as_str(), "<-");
    }

    #[test]
    fn test_values() {
        let n = Node::new("n")
            .with_property("f", 1.5)
            .with_property("l", vec![1i64, 2])
            .with_property("m", PropertyMap::from([("k".to_string(), PropertyValue::Null)]))
            .with_property("b", "ok".as_bytes());
        assert_eq!(text(n), r#"(n {"b":"ok","f":1.5,"l":[1,2],"m":{"k":null}})"#);
    }

    #[test]
    fn test_text_unescaped_by_default() {
        let n = Node::new("n").with_property("q", r#"say "hi""#);
        assert_eq!(text(n.clone()), r#"(n {"q":"say "hi""})"#);

        let mut out = String::new();
        Pattern::from(n).render_with(&mut out, &RenderConfig::escaped()).unwrap();
        assert_eq!(out, r#"(n {"q":"say \"hi\""})"#);
    }

    #[test]
    fn test_single_quote_config() {
        let cfg = RenderConfig { quote: '\'', escape: EscapePolicy::Backslash };
        let mut out = String::new();
        Pattern::from(Node::new("n").with_property("s", "it's"))
            .render_with(&mut out, &cfg)
            .unwrap();
        assert_eq!(out, r"(n {'s':'it\'s'})");
    }

    #[test]
    fn test_failure_restores_buffer() {
        let mut out = String::from("MATCH ");
        let bad = Path::new(Node::new("a")).then(RelationshipNodePair::new(
            Connector::Both,
            Node::new("b").with_property("x", f64::NAN),
            Connector::Both,
            Relationship::new("r"),
        ));
        let res = Pattern::from(bad).render(&mut out);
        assert!(matches!(res, Err(Error::InvalidType { .. })));
        assert_eq!(out, "MATCH ");

        let bytes = Node::new("n").with_property("b", &[0xffu8, 0xfe][..]);
        assert!(matches!(Pattern::from(bytes).render(&mut out), Err(Error::InvalidType { .. })));
        assert_eq!(out, "MATCH ");
    }

    #[test]
    fn test_from_json() {
        let v: PropertyValue = serde_json::json!({"name": "Ada", "tags": [1, 2.5], "ok": null}).into();
        let n = Node { alias: "n".into(), label: None, properties: match v {
            PropertyValue::Map(m) => m,
            _ => PropertyMap::new(),
        } };
        assert_eq!(text(n), r#"(n {"name":"Ada","ok":null,"tags":[1,2.5]})"#);
    }
}

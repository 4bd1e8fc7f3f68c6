//! Graph entities as they come back inside a `GRAPH.QUERY` result set.
//!
//! Each entity is a fixed-arity list of tagged pairs, e.g. for a node:
//!
//! ```text
//! [["id", 7], ["labels", ["Person"]], ["properties", [["name", "Ada"]]]]
//! ```
//!
//! Only the position of a pair decides its meaning; the tag is ignored.

use serde::{Deserialize, Serialize};

use crate::model::Property;
use crate::reply::{parse, Reply};
use crate::Result;

/// A node in a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub label: Option<String>,
    pub properties: Vec<Property>,
}

impl Node {
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }

    pub fn get(&self, key: &str) -> Option<&Reply> {
        self.properties.iter().find(|p| p.key == key).map(|p| &p.value)
    }
}

/// A relationship in a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: i64,
    pub rel_type: Option<String>,
    pub src_node_id: i64,
    pub dest_node_id: i64,
    pub properties: Vec<Property>,
}

impl Relationship {
    pub fn get(&self, key: &str) -> Option<&Reply> {
        self.properties.iter().find(|p| p.key == key).map(|p| &p.value)
    }
}

/// Value half of the tagged pair at `index`.
fn tagged(pairs: &[Reply], index: usize) -> Result<&Reply> {
    Ok(&parse::array(&pairs[index], 2)?[1])
}

/// First element of a possibly empty label list.
fn first_label(reply: &Reply) -> Result<Option<String>> {
    match reply {
        Reply::Text(s) => Ok(Some(s.clone())),
        _ => parse::array(reply, 0)?.first().map(parse::scalar::<String>).transpose(),
    }
}

/// Relationship type; empty text, nil or an empty list mean "no type".
fn rel_type(reply: &Reply) -> Result<Option<String>> {
    let t = match reply {
        Reply::Null => None,
        _ => first_label(reply)?,
    };
    Ok(t.filter(|t| !t.is_empty()))
}

/// `[[_, id], [_, labels], [_, properties]]`
pub fn parse_node(reply: &Reply) -> Result<Node> {
    let pairs = parse::array(reply, 3)?;
    Ok(Node {
        id: parse::scalar(tagged(pairs, 0)?)?,
        label: first_label(tagged(pairs, 1)?)?,
        properties: parse::property_array(tagged(pairs, 2)?, 0)?,
    })
}

/// `[[_, id], [_, type], [_, src], [_, dest], [_, properties]]`
pub fn parse_relationship(reply: &Reply) -> Result<Relationship> {
    let pairs = parse::array(reply, 5)?;
    Ok(Relationship {
        id: parse::scalar(tagged(pairs, 0)?)?,
        rel_type: rel_type(tagged(pairs, 1)?)?,
        src_node_id: parse::scalar(tagged(pairs, 2)?)?,
        dest_node_id: parse::scalar(tagged(pairs, 3)?)?,
        properties: parse::property_array(tagged(pairs, 4)?, 0)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn pair(tag: &str, value: impl Into<Reply>) -> Reply {
        Reply::from(vec![Reply::from(tag), value.into()])
    }

    #[test]
    fn test_parse_node() {
        let r = Reply::from(vec![
            pair("id", 7i64),
            pair("labels", vec!["Person"]),
            pair("properties", vec![Reply::from(vec![Reply::from("name"), Reply::from("Ada")])]),
        ]);
        let node = parse_node(&r).unwrap();
        assert_eq!(node.id, 7);
        assert!(node.has_label("Person"));
        assert_eq!(node.get("name"), Some(&Reply::from("Ada")));
    }

    #[test]
    fn test_parse_node_tolerates_empty_sections() {
        let r = Reply::from(vec![
            pair("id", 1i64),
            pair("labels", Reply::Array(vec![])),
            pair("properties", Reply::Array(vec![])),
        ]);
        let node = parse_node(&r).unwrap();
        assert_eq!(node.label, None);
        assert!(node.properties.is_empty());
    }

    #[test]
    fn test_position_not_tag_decides() {
        let r = Reply::from(vec![
            pair("x", 3i64),
            pair("y", vec!["City"]),
            pair("z", Reply::Array(vec![])),
        ]);
        assert_eq!(parse_node(&r).unwrap().id, 3);
    }

    #[test]
    fn test_parse_node_too_short() {
        let r = Reply::from(vec![pair("id", 1i64), pair("labels", Reply::Array(vec![]))]);
        assert!(matches!(parse_node(&r), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_parse_relationship() {
        let r = Reply::from(vec![
            pair("id", 11i64),
            pair("type", "KNOWS"),
            pair("src_node", 1i64),
            pair("dest_node", 2i64),
            pair("properties", vec![Reply::from(vec![Reply::from("since"), Reply::Int(2020)])]),
        ]);
        let rel = parse_relationship(&r).unwrap();
        assert_eq!(rel.rel_type.as_deref(), Some("KNOWS"));
        assert_eq!((rel.src_node_id, rel.dest_node_id), (1, 2));
        assert_eq!(rel.get("since"), Some(&Reply::Int(2020)));
    }

    #[test]
    fn test_relationship_without_type() {
        for empty in [Reply::Array(vec![]), Reply::Null, Reply::from("")] {
            let r = Reply::from(vec![
                pair("id", 4i64),
                pair("type", empty),
                pair("src_node", 1i64),
                pair("dest_node", 2i64),
                pair("properties", Reply::Array(vec![])),
            ]);
            assert_eq!(parse_relationship(&r).unwrap().rel_type, None);
        }
    }

    #[test]
    fn test_parse_relationship_wrong_id_type() {
        let r = Reply::from(vec![
            pair("id", "eleven"),
            pair("type", "KNOWS"),
            pair("src_node", 1i64),
            pair("dest_node", 2i64),
            pair("properties", Reply::Array(vec![])),
        ]);
        assert!(matches!(parse_relationship(&r), Err(Error::InvalidType { .. })));
    }
}

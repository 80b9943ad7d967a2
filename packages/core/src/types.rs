//! Wire-format types for JSON:API documents.
//!
//! This module defines the structures that make up a top-level document:
//! [`Document`], [`PrimaryData`], [`ResourceObject`], [`RelationshipObject`],
//! [`Identifier`], and [`ErrorObject`]. All types serialise to and from JSON
//! exactly as described by the JSON:API specification, including the omission
//! rules: empty `relationships`/`meta`/`links` disappear from the output,
//! while `attributes` is always present on a resource object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered JSON object, used for `attributes`, `meta`, and `links`.
///
/// Insertion order is preserved through serialisation, so the order in which
/// a resource mapping declares its attributes is the order they appear on
/// the wire.
pub type Object = IndexMap<String, Value>;

/// A top-level JSON:API document.
///
/// `data` and `errors` are mutually exclusive;
/// [`validate_document`](crate::validate_document) enforces this. All keys
/// except the one that carries the payload are omitted when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Document {
    /// The primary resource or resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,

    /// Error objects. Present only on error documents, and then non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,

    /// Document-level metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Object>,

    /// Document-level links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Object>,

    /// The deduplicated pool of related resources, in first-encountered order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
}

/// The `data` member: a single resource object or an array of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PrimaryData {
    /// A single-resource response.
    One(ResourceObject),
    /// A collection response. May be empty.
    Many(Vec<ResourceObject>),
}

/// One serialised resource: `{id, type, attributes, relationships?, meta?, links?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceObject {
    /// Resource id. Together with `type` it forms the resource key.
    pub id: String,

    /// Resource type (e.g. `"posts"`).
    #[serde(rename = "type")]
    pub kind: String,

    /// Flat attribute map. Always serialised, even when empty.
    #[serde(default)]
    pub attributes: Object,

    /// Relationship references, keyed by relation name. Omitted when empty.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<String, RelationshipObject>,

    /// Resource-level metadata. Omitted when empty.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub meta: Object,

    /// Resource-level links. Omitted when empty.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub links: Object,
}

impl ResourceObject {
    /// Create a resource object with the given identity and no other content.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            attributes: Object::new(),
            relationships: IndexMap::new(),
            meta: Object::new(),
            links: Object::new(),
        }
    }

    /// The minimal `{id, type}` identifier for this resource.
    pub fn identifier(&self) -> Identifier {
        Identifier {
            id: self.id.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// One entry under `relationships`: `{ "data": Ref | [Ref...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipObject {
    /// The reference or ordered references this relationship points at.
    pub data: RelationshipData,
}

/// The `data` member of a relationship: one reference or an ordered list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RelationshipData {
    /// A to-one reference.
    One(Identifier),
    /// A to-many reference list, preserving source collection order.
    Many(Vec<Identifier>),
}

/// The minimal JSON:API resource identifier: `{ "id": ..., "type": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Resource id.
    pub id: String,
    /// Resource type.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Identifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// One member of an `errors` array.
///
/// Every field is individually optional and omitted when unset; `status` is
/// a string on the wire even though the library handles status codes as
/// integers internally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ErrorObject {
    /// Application-specific error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code, stringified per the JSON:API spec.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// A pointer to the cause of the error, e.g. `{"pointer": "email"}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Object>,

    /// Short, human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Non-standard diagnostic information (e.g. debug-mode details).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Object>,
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post() -> ResourceObject {
        let mut r = ResourceObject::new("posts", "p1");
        r.attributes.insert("title".into(), json!("Hi"));
        r
    }

    #[test]
    fn empty_sections_are_omitted() {
        let doc = Document {
            data: Some(PrimaryData::One(post())),
            ..Document::default()
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "data": {
                    "id": "p1",
                    "type": "posts",
                    "attributes": { "title": "Hi" }
                }
            })
        );
    }

    #[test]
    fn attributes_key_survives_when_empty() {
        let doc = Document {
            data: Some(PrimaryData::One(ResourceObject::new("posts", "p1"))),
            ..Document::default()
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["data"]["attributes"], json!({}));
    }

    #[test]
    fn relationship_serialises_as_data_wrapper() {
        let mut r = post();
        r.relationships.insert(
            "author".into(),
            RelationshipObject {
                data: RelationshipData::One(Identifier::new("accounts", "a1")),
            },
        );
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(
            value["relationships"]["author"],
            json!({ "data": { "id": "a1", "type": "accounts" } })
        );
    }

    #[test]
    fn to_many_relationship_preserves_order() {
        let mut r = post();
        r.relationships.insert(
            "comments".into(),
            RelationshipObject {
                data: RelationshipData::Many(vec![
                    Identifier::new("comments", "c2"),
                    Identifier::new("comments", "c1"),
                ]),
            },
        );
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(
            value["relationships"]["comments"]["data"],
            json!([
                { "id": "c2", "type": "comments" },
                { "id": "c1", "type": "comments" }
            ])
        );
    }

    #[test]
    fn error_object_omits_unset_fields() {
        let e = ErrorObject {
            title: Some("Not Found".into()),
            detail: Some("The requested resource could not be found.".into()),
            ..ErrorObject::default()
        };
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Not Found",
                "detail": "The requested resource could not be found."
            })
        );
    }

    #[test]
    fn roundtrip_collection_document() {
        let json = r#"{
            "data": [
                { "id": "a1", "type": "accounts", "attributes": { "name": "Ann" } },
                { "id": "a2", "type": "accounts", "attributes": { "name": "Ben" } }
            ],
            "included": [
                { "id": "p1", "type": "posts", "attributes": { "title": "Hi" } }
            ]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        match &doc.data {
            Some(PrimaryData::Many(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected collection data, got {other:?}"),
        }
        let re = serde_json::to_string(&doc).unwrap();
        let doc2: Document = serde_json::from_str(&re).unwrap();
        assert_eq!(doc2, doc);
    }
}

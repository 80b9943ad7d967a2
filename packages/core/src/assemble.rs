//! Assembly of resolved nodes into top-level JSON:API documents.
//!
//! The assembler is the last stage of a serialisation call: it renders a
//! root [`ResourceNode`] (or a collection of them) plus the deduplicated
//! included pool into a [`Document`], applying sparse fieldsets along the
//! way. For collections, [`Collection`] additionally offers a
//! post-construction hook to annotate each serialised item with metadata
//! computed from its source record.

use indexmap::IndexMap;

use crate::resolver::{ResourceKey, ResourceNode, DEFAULT_MAX_DEPTH};
use crate::resource::{Resource, ResourceError};
use crate::types::{Document, Object, PrimaryData, ResourceObject};

/// Per-type attribute allowlists — the parsed form of
/// `fields[posts]=title,body` query parameters.
///
/// Filtering applies to attributes only, never to `id`, `type`, or
/// `relationships`, and each resource is filtered by its own type's list;
/// a type without an entry is left unfiltered.
#[derive(Debug, Clone, Default)]
pub struct Fieldsets {
    fields: IndexMap<String, Vec<String>>,
}

impl Fieldsets {
    /// No restrictions: every attribute of every type passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict resources of `kind` to the named attributes.
    pub fn allow<I, S>(mut self, kind: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .insert(kind.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    fn for_kind(&self, kind: &str) -> Option<&[String]> {
        self.fields.get(kind).map(Vec::as_slice)
    }
}

/// Render one node as a wire resource object, applying the fieldset for its
/// type. Attribute order follows the declaration order, intersected with
/// the allowlist.
fn render_node(node: &ResourceNode, fields: &Fieldsets) -> ResourceObject {
    let attributes: Object = match fields.for_kind(&node.key.kind) {
        Some(allowed) => node
            .attributes
            .iter()
            .filter(|(name, _)| allowed.iter().any(|a| a == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        None => node.attributes.clone(),
    };

    ResourceObject {
        id: node.key.id.clone(),
        kind: node.key.kind.clone(),
        attributes,
        relationships: node.relationships.clone(),
        meta: node.meta.clone(),
        links: node.links.clone(),
    }
}

/// Assemble a single-root document: the root as `data`, its pool (values,
/// first-encountered order) as `included`. The `included` key is omitted
/// entirely when the pool is empty.
pub fn assemble(root: &ResourceNode, fields: &Fieldsets) -> Document {
    let included: Vec<ResourceObject> = root
        .included()
        .map(|node| render_node(node, fields))
        .collect();

    Document {
        data: Some(PrimaryData::One(render_node(root, fields))),
        included: if included.is_empty() {
            None
        } else {
            Some(included)
        },
        ..Document::default()
    }
}

/// Assemble a collection document: the roots in order as `data`, their
/// pools unioned into one `included` array.
///
/// Deduplication across roots keeps the first occurrence of each resource
/// key; merging only happens within a single root's resolution.
pub fn assemble_collection<'n, I>(roots: I, fields: &Fieldsets) -> Document
where
    I: IntoIterator<Item = &'n ResourceNode>,
{
    let roots: Vec<&ResourceNode> = roots.into_iter().collect();

    let mut pool: IndexMap<ResourceKey, &ResourceNode> = IndexMap::new();
    for root in &roots {
        for node in root.included() {
            pool.entry(node.key().clone()).or_insert(node);
        }
    }

    let data: Vec<ResourceObject> = roots
        .iter()
        .map(|root| render_node(root, fields))
        .collect();
    let included: Vec<ResourceObject> = pool
        .values()
        .map(|node| render_node(node, fields))
        .collect();

    Document {
        data: Some(PrimaryData::Many(data)),
        included: if included.is_empty() {
            None
        } else {
            Some(included)
        },
        ..Document::default()
    }
}

/// A resolved collection that still remembers its source records, so
/// metadata can be injected per resource after resolution without
/// re-running it.
pub struct Collection<'a> {
    entries: Vec<(&'a dyn Resource, ResourceNode)>,
}

impl<'a> Collection<'a> {
    /// Resolve every resource independently; each root owns its own pool
    /// until [`assemble`](Collection::assemble) unions them.
    pub fn resolve<I>(resources: I, max_depth: usize) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = &'a dyn Resource>,
    {
        let mut entries = Vec::new();
        for resource in resources {
            entries.push((resource, ResourceNode::resolve(resource, max_depth)?));
        }
        Ok(Self { entries })
    }

    /// Annotate every resolved root with metadata computed from its source
    /// record. Colliding meta keys are overwritten by the annotation.
    pub fn add_meta(mut self, annotate: impl Fn(&dyn Resource) -> Object) -> Self {
        for (resource, node) in &mut self.entries {
            node.merge_meta(annotate(*resource));
        }
        self
    }

    /// Render the collection document.
    pub fn assemble(&self, fields: &Fieldsets) -> Document {
        assemble_collection(self.entries.iter().map(|(_, node)| node), fields)
    }
}

/// Serialise one resource with the default depth bound and no fieldsets.
pub fn to_document(resource: &dyn Resource) -> Result<Document, ResourceError> {
    to_document_with(resource, DEFAULT_MAX_DEPTH, &Fieldsets::default())
}

/// Serialise one resource with an explicit depth bound and fieldsets.
pub fn to_document_with(
    resource: &dyn Resource,
    max_depth: usize,
    fields: &Fieldsets,
) -> Result<Document, ResourceError> {
    let root = ResourceNode::resolve(resource, max_depth)?;
    Ok(assemble(&root, fields))
}

/// Serialise a collection of resources in one call.
pub fn collection_to_document<'a, I>(
    resources: I,
    max_depth: usize,
    fields: &Fieldsets,
) -> Result<Document, ResourceError>
where
    I: IntoIterator<Item = &'a dyn Resource>,
{
    Ok(Collection::resolve(resources, max_depth)?.assemble(fields))
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Descriptor, Relation};
    use serde_json::json;

    struct Author {
        id: &'static str,
        name: &'static str,
        email: &'static str,
    }

    impl Resource for Author {
        fn register(&self) -> Option<Descriptor<'_>> {
            Some(
                Descriptor::new()
                    .id(self.id)
                    .kind("accounts")
                    .attribute("name", self.name)
                    .attribute("email", self.email),
            )
        }
    }

    struct Article {
        id: &'static str,
        title: &'static str,
        body: &'static str,
        author: Option<Author>,
    }

    impl Resource for Article {
        fn register(&self) -> Option<Descriptor<'_>> {
            let mut descriptor = Descriptor::new()
                .id(self.id)
                .kind("posts")
                .attribute("title", self.title)
                .attribute("body", self.body);
            descriptor = match &self.author {
                Some(author) => descriptor.relation(Relation::one("author", author)),
                None => descriptor.relation(Relation::unloaded("author")),
            };
            Some(descriptor)
        }
    }

    fn article(id: &'static str, author: Option<Author>) -> Article {
        Article {
            id,
            title: "Hi",
            body: "Body",
            author,
        }
    }

    #[test]
    fn included_key_is_omitted_when_pool_is_empty() {
        let doc = to_document(&article("p1", None)).unwrap();
        assert!(doc.included.is_none());
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("included").is_none());
    }

    #[test]
    fn fieldsets_filter_attributes_per_type() {
        let fields = Fieldsets::new()
            .allow("posts", ["title"])
            .allow("accounts", ["name"]);
        let doc = to_document_with(
            &article(
                "p1",
                Some(Author {
                    id: "a1",
                    name: "Ann",
                    email: "ann@example.org",
                }),
            ),
            2,
            &fields,
        )
        .unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["data"]["attributes"], json!({ "title": "Hi" }));
        assert_eq!(value["included"][0]["attributes"], json!({ "name": "Ann" }));
        // id, type and relationships are untouched by the fieldset.
        assert_eq!(value["data"]["id"], json!("p1"));
        assert_eq!(
            value["data"]["relationships"]["author"]["data"]["id"],
            json!("a1")
        );
    }

    #[test]
    fn fieldset_for_another_type_leaves_attributes_alone() {
        let fields = Fieldsets::new().allow("accounts", ["name"]);
        let doc = to_document_with(&article("p1", None), 2, &fields).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["data"]["attributes"],
            json!({ "title": "Hi", "body": "Body" })
        );
    }

    #[test]
    fn fieldset_requesting_unknown_attribute_intersects_with_what_exists() {
        let fields = Fieldsets::new().allow("posts", ["title", "views"]);
        let doc = to_document_with(&article("p1", None), 2, &fields).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["data"]["attributes"], json!({ "title": "Hi" }));
    }

    #[test]
    fn collection_unions_pools_without_duplicates() {
        // Both articles share the same author.
        let a = article(
            "p1",
            Some(Author {
                id: "a1",
                name: "Ann",
                email: "ann@example.org",
            }),
        );
        let b = article(
            "p2",
            Some(Author {
                id: "a1",
                name: "Ann",
                email: "ann@example.org",
            }),
        );

        let doc = collection_to_document(
            [&a as &dyn Resource, &b as &dyn Resource],
            2,
            &Fieldsets::new(),
        )
        .unwrap();

        let included = doc.included.unwrap();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].id, "a1");
        match doc.data {
            Some(PrimaryData::Many(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected collection data, got {other:?}"),
        }
    }

    #[test]
    fn add_meta_annotates_each_resource_from_its_record() {
        let a = article("p1", None);
        let b = article("p2", None);

        let collection = Collection::resolve([&a as &dyn Resource, &b as &dyn Resource], 2)
            .unwrap()
            .add_meta(|resource| {
                let mut meta = Object::new();
                let id = resource.register().and_then(|d| d.id).unwrap_or_default();
                meta.insert("self_id".into(), json!(id));
                meta
            });

        let value = serde_json::to_value(collection.assemble(&Fieldsets::new())).unwrap();
        assert_eq!(value["data"][0]["meta"], json!({ "self_id": "p1" }));
        assert_eq!(value["data"][1]["meta"], json!({ "self_id": "p2" }));
    }
}

//! Depth-bounded resolution of relationship declarations into resource nodes.
//!
//! [`ResourceNode::resolve`] walks a root resource's declared relationships,
//! recursively building one node per related resource, collecting `{id, type}`
//! reference tuples, and accumulating a flat, deduplicated pool of included
//! nodes. The node is a traversal result, not a storage structure: it lives
//! for one serialisation call and is consumed by the assembler.
//!
//! Three rules shape the traversal:
//!
//! - Relationships expand only while `depth < max_depth`, which bounds the
//!   walk on cyclic domain graphs (author → posts → author).
//! - A node reached twice (via different paths) is stored once, merged with
//!   a right-biased deep combine — the later occurrence wins per key.
//! - While `depth < max_depth - 1` each direct child's own pool is folded
//!   upward, so the root's pool ends up holding the full transitive closure
//!   reachable within the bound.

use std::fmt;

use indexmap::IndexMap;

use crate::resource::{extract, Related, Relation, Resource, ResourceError};
use crate::types::{Identifier, Object, RelationshipData, RelationshipObject};

/// The default relationship depth bound.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// The `(type, id)` pair uniquely identifying one resource within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub kind: String,
    pub id: String,
}

/// Formats as `type.id`, e.g. `posts.p1`.
impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}

/// One resolved resource: its serialisable fields plus its own pool of
/// included nodes, keyed by [`ResourceKey`] in first-encountered order.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    pub(crate) key: ResourceKey,
    pub(crate) depth: usize,
    pub(crate) attributes: Object,
    pub(crate) relationships: IndexMap<String, RelationshipObject>,
    pub(crate) meta: Object,
    pub(crate) links: Object,
    pub(crate) included: IndexMap<ResourceKey, ResourceNode>,
}

impl ResourceNode {
    /// Resolve `resource` and everything reachable from it within
    /// `max_depth` relationship hops.
    pub fn resolve(resource: &dyn Resource, max_depth: usize) -> Result<Self, ResourceError> {
        Self::resolve_at(resource, 0, max_depth)
    }

    fn resolve_at(
        resource: &dyn Resource,
        depth: usize,
        max_depth: usize,
    ) -> Result<Self, ResourceError> {
        let shape = extract(resource)?;
        let mut node = ResourceNode {
            key: ResourceKey {
                kind: shape.kind,
                id: shape.id,
            },
            depth,
            attributes: shape.attributes,
            relationships: IndexMap::new(),
            meta: shape.meta,
            links: shape.links,
            included: IndexMap::new(),
        };

        if depth < max_depth {
            for relation in shape.relationships {
                node.resolve_relation(relation, depth, max_depth)?;
            }
        }

        if depth + 1 < max_depth {
            node.flatten_sub_includes();
        }

        Ok(node)
    }

    /// Turn one relationship declaration into a reference entry plus pool
    /// registrations. Unloaded and loaded-but-empty relations are omitted
    /// entirely — no key, no `data: null`.
    fn resolve_relation(
        &mut self,
        relation: Relation<'_>,
        depth: usize,
        max_depth: usize,
    ) -> Result<(), ResourceError> {
        match relation.data {
            Related::Unloaded | Related::One(None) => Ok(()),
            Related::Many(items) if items.is_empty() => Ok(()),
            Related::One(Some(item)) => {
                let child = Self::resolve_at(item, depth + 1, max_depth)?;
                let reference = child.reference();
                self.add_include(child);
                self.relationships.insert(
                    relation.name,
                    RelationshipObject {
                        data: RelationshipData::One(reference),
                    },
                );
                Ok(())
            }
            Related::Many(items) => {
                let mut references = Vec::with_capacity(items.len());
                for item in items {
                    let child = Self::resolve_at(item, depth + 1, max_depth)?;
                    references.push(child.reference());
                    self.add_include(child);
                }
                self.relationships.insert(
                    relation.name,
                    RelationshipObject {
                        data: RelationshipData::Many(references),
                    },
                );
                Ok(())
            }
        }
    }

    /// Register a child node in this node's pool. A key collision merges the
    /// two occurrences rather than duplicating; the first occurrence keeps
    /// its pool position and depth.
    fn add_include(&mut self, incoming: ResourceNode) {
        if let Some(existing) = self.included.get_mut(&incoming.key) {
            let merged = Self::merged(existing.clone(), incoming);
            *existing = merged;
        } else {
            self.included.insert(incoming.key.clone(), incoming);
        }
    }

    /// Pull each direct child's own pool up into this node's pool. Children
    /// flattened their own sub-pools during resolution, so one level here
    /// yields the transitive closure.
    fn flatten_sub_includes(&mut self) {
        let keys: Vec<ResourceKey> = self.included.keys().cloned().collect();
        for key in keys {
            let subs = match self.included.get_mut(&key) {
                Some(child) => std::mem::take(&mut child.included),
                None => continue,
            };
            for (_, sub) in subs {
                self.add_include(sub);
            }
        }
    }

    /// Right-biased deep merge of two nodes sharing a resource key.
    ///
    /// Attributes, relationship references, meta, and links combine with
    /// `second`'s keys winning on conflict; the included pools union,
    /// merging recursively on key collision. This is a pure combine — the
    /// inputs are consumed, nothing is mutated in place.
    pub fn merged(first: ResourceNode, second: ResourceNode) -> ResourceNode {
        let mut out = first;
        deep_merge_objects(&mut out.attributes, second.attributes);
        for (name, reference) in second.relationships {
            out.relationships.insert(name, reference);
        }
        deep_merge_objects(&mut out.meta, second.meta);
        deep_merge_objects(&mut out.links, second.links);
        for (_, node) in second.included {
            out.add_include(node);
        }
        out
    }

    /// The minimal `{id, type}` reference tuple for this node.
    pub fn reference(&self) -> Identifier {
        Identifier::new(self.key.kind.clone(), self.key.id.clone())
    }

    /// This node's resource key.
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// Number of relationship hops from the traversal root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The included pool, in first-encountered order.
    pub fn included(&self) -> impl Iterator<Item = &ResourceNode> {
        self.included.values()
    }

    /// Merge extra metadata into this node, overwriting colliding keys.
    pub(crate) fn merge_meta(&mut self, extra: Object) {
        for (key, value) in extra {
            self.meta.insert(key, value);
        }
    }
}

fn deep_merge_objects(target: &mut Object, incoming: Object) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(existing) => deep_merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

fn deep_merge_value(target: &mut serde_json::Value, incoming: serde_json::Value) {
    use serde_json::Value;
    match incoming {
        Value::Object(source) => {
            if let Value::Object(existing) = target {
                for (key, value) in source {
                    match existing.get_mut(&key) {
                        Some(slot) => deep_merge_value(slot, value),
                        None => {
                            existing.insert(key, value);
                        }
                    }
                }
            } else {
                *target = Value::Object(source);
            }
        }
        other => *target = other,
    }
}

// --- tests -------------------------------------------------------------------

//! The [`Resource`] trait: how a domain object declares its JSON:API shape.
//!
//! A resource mapping supplies six things: id, type, attributes,
//! relationship declarations, meta, and links. Two construction modes are
//! supported and behave identically from the caller's perspective:
//!
//! - **Declarative** — override [`Resource::register`] and return the whole
//!   shape at once as a [`Descriptor`].
//! - **Method-based** — override [`Resource::id`], [`Resource::kind`],
//!   [`Resource::attributes`], [`Resource::relationships`],
//!   [`Resource::meta`], and [`Resource::links`] individually; each defaults
//!   to an empty value.
//!
//! Relationships are declared with an explicit tag ([`Related::One`] /
//! [`Related::Many`] / [`Related::Unloaded`]), so "is this relation a
//! collection" is decided by the declaration, never by runtime inspection
//! of the related mapper.

use thiserror::Error;

use crate::types::Object;

/// Errors raised for programmer misuse of a resource mapping.
///
/// These fail fast and loudly: an unresolvable identity is a configuration
/// mistake, never something to paper over with an empty string.
#[derive(Debug, Error, PartialEq)]
pub enum ResourceError {
    #[error(
        "cannot resolve an id for a {kind:?} resource; \
         provide one via id(), register(), or identifier()"
    )]
    NoId { kind: String },

    #[error("cannot resolve a type for a resource; provide one via kind() or register()")]
    NoKind,
}

/// The declarative registration form: every field of a resource's shape in
/// one value.
///
/// All fields are optional; unset identity fields fall back through the
/// resolution order described on [`Resource`].
#[derive(Default)]
pub struct Descriptor<'a> {
    /// Explicit resource id.
    pub id: Option<String>,
    /// Explicit resource type.
    pub kind: Option<String>,
    /// Attribute key/value pairs, in output order.
    pub attributes: Object,
    /// Relationship declarations, in output order.
    pub relationships: Vec<Relation<'a>>,
    /// Resource-level metadata.
    pub meta: Object,
    /// Resource-level links.
    pub links: Object,
}

impl<'a> Descriptor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn relation(mut self, relation: Relation<'a>) -> Self {
        self.relationships.push(relation);
        self
    }

    pub fn meta_entry(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }

    pub fn link(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.links.insert(name.into(), value.into());
        self
    }
}

/// One declared relationship: a name plus what it currently holds.
pub struct Relation<'a> {
    /// The relationship name as it appears under `relationships`.
    pub name: String,
    /// The related data, tagged to-one or to-many.
    pub data: Related<'a>,
}

impl<'a> Relation<'a> {
    /// A loaded to-one relation.
    pub fn one(name: impl Into<String>, resource: &'a dyn Resource) -> Self {
        Self {
            name: name.into(),
            data: Related::One(Some(resource)),
        }
    }

    /// A loaded to-one relation that may be empty.
    ///
    /// `None` means "loaded, but no related record exists". Like an unloaded
    /// relation this is omitted from the output; the distinction is kept in
    /// the API so callers can still express it.
    pub fn maybe_one(name: impl Into<String>, resource: Option<&'a dyn Resource>) -> Self {
        Self {
            name: name.into(),
            data: Related::One(resource),
        }
    }

    /// A loaded to-many relation. An empty vector is omitted from the output.
    pub fn many(name: impl Into<String>, resources: Vec<&'a dyn Resource>) -> Self {
        Self {
            name: name.into(),
            data: Related::Many(resources),
        }
    }

    /// A relation that was declared but not eagerly loaded.
    ///
    /// Always omitted from the output — the serialiser must not lie about
    /// data it never saw.
    pub fn unloaded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Related::Unloaded,
        }
    }
}

/// The data side of a relationship declaration.
pub enum Related<'a> {
    /// To-one. `None` means loaded-but-empty.
    One(Option<&'a dyn Resource>),
    /// To-many, in source collection order.
    Many(Vec<&'a dyn Resource>),
    /// Not eagerly loaded; the relationship is omitted entirely.
    Unloaded,
}

/// A domain object (or a mapper wrapping one) that can be serialised as a
/// JSON:API resource.
///
/// # Identity resolution
///
/// The id is resolved in order: the [`id`](Resource::id) override, then the
/// id field of [`register`](Resource::register) data, then the conventional
/// [`identifier`](Resource::identifier) field. If none yields a value,
/// serialisation fails with [`ResourceError::NoId`].
///
/// The type is resolved in order: the [`kind`](Resource::kind) override,
/// then the type field of register data, then
/// [`derived_kind`](Resource::derived_kind) — a snake_cased plural of the
/// implementing Rust type's name (`PullRequest` → `"pull_requests"`).
pub trait Resource {
    /// Declarative registration: return the full shape at once.
    ///
    /// When this returns `Some`, the descriptor supplies attributes,
    /// relationships, meta, and links; the method-based accessors below are
    /// not consulted for those fields.
    fn register(&self) -> Option<Descriptor<'_>> {
        None
    }

    /// Explicit id override.
    fn id(&self) -> Option<String> {
        None
    }

    /// Explicit type override.
    fn kind(&self) -> Option<String> {
        None
    }

    /// The conventional identifier field of the underlying object, used as
    /// the last resort of id resolution.
    fn identifier(&self) -> Option<String> {
        None
    }

    /// Attribute key/value pairs, in output order. Values may be computed
    /// on demand; the serialiser calls this once per resource per document.
    fn attributes(&self) -> Object {
        Object::new()
    }

    /// Relationship declarations, in output order.
    fn relationships(&self) -> Vec<Relation<'_>> {
        Vec::new()
    }

    /// Resource-level metadata.
    fn meta(&self) -> Object {
        Object::new()
    }

    /// Resource-level links.
    fn links(&self) -> Object {
        Object::new()
    }

    /// Fallback type name derived from the implementing Rust type.
    ///
    /// The default body is instantiated per implementor, so
    /// `type_name_of_val` sees the concrete type even through
    /// `&dyn Resource`.
    fn derived_kind(&self) -> String {
        kind_from_type_name(std::any::type_name_of_val(self))
    }
}

/// The fully-resolved shape of one resource, ready for the resolver.
pub(crate) struct Extracted<'a> {
    pub id: String,
    pub kind: String,
    pub attributes: Object,
    pub relationships: Vec<Relation<'a>>,
    pub meta: Object,
    pub links: Object,
}

impl std::fmt::Debug for Extracted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extracted")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("attributes", &self.attributes)
            .field("relationships", &self.relationships.len())
            .field("meta", &self.meta)
            .field("links", &self.links)
            .finish()
    }
}

/// Resolve a resource's shape, applying the identity resolution order and
/// failing loudly when no path yields an id or type.
pub(crate) fn extract(resource: &dyn Resource) -> Result<Extracted<'_>, ResourceError> {
    let (reg_id, reg_kind, attributes, relationships, meta, links) = match resource.register() {
        Some(d) => (d.id, d.kind, d.attributes, d.relationships, d.meta, d.links),
        None => (
            None,
            None,
            resource.attributes(),
            resource.relationships(),
            resource.meta(),
            resource.links(),
        ),
    };

    let kind = resource
        .kind()
        .or(reg_kind)
        .unwrap_or_else(|| resource.derived_kind());
    if kind.is_empty() {
        return Err(ResourceError::NoKind);
    }

    let id = resource
        .id()
        .or(reg_id)
        .or_else(|| resource.identifier())
        .ok_or_else(|| ResourceError::NoId { kind: kind.clone() })?;

    Ok(Extracted {
        id,
        kind,
        attributes,
        relationships,
        meta,
        links,
    })
}

/// Derive a JSON:API type from a full Rust type path:
/// `my_app::models::PullRequest` → `"pull_requests"`.
fn kind_from_type_name(full: &str) -> String {
    // Drop generic arguments, then take the last path segment.
    let base = full.split('<').next().unwrap_or(full);
    let name = base.rsplit("::").next().unwrap_or(base);
    pluralize(&snake_case(name))
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = i + 1 < chars.len() && chars[i + 1].is_lowercase();
            if i > 0 && (prev_lower || next_lower) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if word.ends_with('s') || word.ends_with('x') || word.ends_with('z')
        || word.ends_with("ch") || word.ends_with("sh")
    {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before_is_consonant = stem
            .chars()
            .last()
            .map_or(false, |c| !"aeiou".contains(c));
        if before_is_consonant {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Account {
        identifier: String,
        name: String,
    }

    impl Resource for Account {
        fn identifier(&self) -> Option<String> {
            Some(self.identifier.clone())
        }

        fn attributes(&self) -> Object {
            let mut attrs = Object::new();
            attrs.insert("name".into(), json!(self.name));
            attrs
        }
    }

    struct PullRequest;

    impl Resource for PullRequest {
        fn id(&self) -> Option<String> {
            Some("pr-1".into())
        }
    }

    struct Registered;

    impl Resource for Registered {
        fn register(&self) -> Option<Descriptor<'_>> {
            Some(
                Descriptor::new()
                    .id("r1")
                    .kind("things")
                    .attribute("label", "registered"),
            )
        }
    }

    struct Anonymous;

    impl Resource for Anonymous {}

    #[test]
    fn kind_derives_from_type_name() {
        let account = Account {
            identifier: "a1".into(),
            name: "Ann".into(),
        };
        let extracted = extract(&account).unwrap();
        assert_eq!(extracted.kind, "accounts");
        assert_eq!(extracted.id, "a1");
    }

    #[test]
    fn kind_snake_cases_and_pluralizes() {
        let extracted = extract(&PullRequest).unwrap();
        assert_eq!(extracted.kind, "pull_requests");
    }

    #[test]
    fn register_data_supplies_everything() {
        let extracted = extract(&Registered).unwrap();
        assert_eq!(extracted.id, "r1");
        assert_eq!(extracted.kind, "things");
        assert_eq!(extracted.attributes.get("label"), Some(&json!("registered")));
    }

    #[test]
    fn explicit_kind_override_beats_register_data() {
        struct Both;
        impl Resource for Both {
            fn register(&self) -> Option<Descriptor<'_>> {
                Some(Descriptor::new().id("b1").kind("from_register"))
            }
            fn kind(&self) -> Option<String> {
                Some("from_override".into())
            }
        }
        assert_eq!(extract(&Both).unwrap().kind, "from_override");
    }

    #[test]
    fn missing_id_fails_loudly() {
        let err = extract(&Anonymous).unwrap_err();
        assert_eq!(
            err,
            ResourceError::NoId {
                kind: "anonymouses".into()
            }
        );
    }

    #[test]
    fn pluralize_rules() {
        assert_eq!(pluralize("account"), "accounts");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("branch"), "branches");
        assert_eq!(pluralize("company"), "companies");
        assert_eq!(pluralize("day"), "days");
    }

    #[test]
    fn snake_case_handles_camel_and_acronyms() {
        assert_eq!(snake_case("PullRequest"), "pull_request");
        assert_eq!(snake_case("Account"), "account");
        assert_eq!(snake_case("HTTPServer"), "http_server");
    }
}

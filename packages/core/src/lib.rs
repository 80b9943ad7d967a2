//! JSON:API response serialization.
//!
//! This crate turns domain objects into JSON:API documents: it walks a root
//! object's declared relationships, recursively builds related resources up
//! to a depth bound, deduplicates repeated references into a flat `included`
//! pool, and assembles a spec-compliant top-level document. A separate path
//! converts application errors into JSON:API error documents. It is the
//! foundation for the `jweld` CLI and the `jsonapi-weld-conformance` test
//! suite.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Wire format: [`Document`], [`ResourceObject`], [`Identifier`], [`ErrorObject`] |
//! | [`resource`] | The [`Resource`] mapping trait, [`Descriptor`], relationship declarations |
//! | [`resolver`] | Depth-bounded relationship resolution into [`ResourceNode`]s |
//! | [`assemble`] | Sparse fieldsets and document assembly, single and collection |
//! | [`error`] | [`ApiError`] tuples and error-document building |
//! | [`validation`] | Structural conformance checking via [`validate_document`] |
//! | [`render`] | Human-readable text rendering of documents |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use jsonapi_weld::{to_document, Descriptor, Relation, Resource};
//!
//! struct Post { id: String, title: String, author: Option<Author> }
//!
//! impl Resource for Post {
//!     fn register(&self) -> Option<Descriptor<'_>> {
//!         let mut d = Descriptor::new()
//!             .id(&self.id)
//!             .kind("posts")
//!             .attribute("title", self.title.clone());
//!         d = match &self.author {
//!             Some(author) => d.relation(Relation::one("author", author)),
//!             None => d.relation(Relation::unloaded("author")),
//!         };
//!         Some(d)
//!     }
//! }
//!
//! let doc = to_document(&post)?;
//! let json = serde_json::to_string_pretty(&doc).unwrap();
//! ```

pub mod assemble;
pub mod error;
pub mod render;
pub mod resolver;
pub mod resource;
pub mod types;
pub mod validation;

pub use assemble::{
    assemble, assemble_collection, collection_to_document, to_document, to_document_with,
    Collection, Fieldsets,
};
pub use error::{error_document, internal_error, validation_errors, ApiError, ErrorKind};
pub use resolver::{ResourceKey, ResourceNode, DEFAULT_MAX_DEPTH};
pub use resource::{Descriptor, Related, Relation, Resource, ResourceError};
pub use types::{
    Document, ErrorObject, Identifier, Object, PrimaryData, RelationshipData, RelationshipObject,
    ResourceObject,
};
pub use validation::{validate_document, DocumentError};

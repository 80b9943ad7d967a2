use thiserror::Error;

use crate::types::{Document, ErrorObject, PrimaryData, RelationshipData, ResourceObject};

/// Errors returned when a [`Document`] fails structural validation.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("a document must not contain both data and errors")]
    DataAndErrors,

    #[error("a document must contain data, errors, or meta")]
    Empty,

    #[error("errors must contain at least one item when present")]
    EmptyErrors,

    #[error("error object at errors[{0}] sets no fields")]
    BlankError(usize),

    #[error("resource at {0} has an empty id")]
    EmptyId(String),

    #[error("resource at {0} has an empty type")]
    EmptyKind(String),

    #[error("relationship {name:?} at {at} holds a reference with an empty id or type")]
    EmptyReference { at: String, name: String },

    #[error("included contains duplicate resource {0}")]
    DuplicateIncluded(String),
}

/// Validate a [`Document`] against the JSON:API structural rules.
///
/// Returns `Ok(())` if the document is well formed, or the first
/// [`DocumentError`] found. Checks run in document order: the top-level
/// payload rules, then `data`, then `included`.
pub fn validate_document(doc: &Document) -> Result<(), DocumentError> {
    if doc.data.is_some() && doc.errors.is_some() {
        return Err(DocumentError::DataAndErrors);
    }
    if doc.data.is_none() && doc.errors.is_none() && doc.meta.is_none() {
        return Err(DocumentError::Empty);
    }
    if let Some(errors) = &doc.errors {
        if errors.is_empty() {
            return Err(DocumentError::EmptyErrors);
        }
        for (i, error) in errors.iter().enumerate() {
            if *error == ErrorObject::default() {
                return Err(DocumentError::BlankError(i));
            }
        }
    }

    match &doc.data {
        Some(PrimaryData::One(resource)) => validate_resource(resource, "data".to_string())?,
        Some(PrimaryData::Many(resources)) => {
            for (i, resource) in resources.iter().enumerate() {
                validate_resource(resource, format!("data[{i}]"))?;
            }
        }
        None => {}
    }

    if let Some(included) = &doc.included {
        let mut seen: Vec<(&str, &str)> = Vec::with_capacity(included.len());
        for (i, resource) in included.iter().enumerate() {
            validate_resource(resource, format!("included[{i}]"))?;
            let key = (resource.kind.as_str(), resource.id.as_str());
            if seen.contains(&key) {
                return Err(DocumentError::DuplicateIncluded(format!(
                    "{}.{}",
                    resource.kind, resource.id
                )));
            }
            seen.push(key);
        }
    }

    Ok(())
}

fn validate_resource(resource: &ResourceObject, at: String) -> Result<(), DocumentError> {
    if resource.id.is_empty() {
        return Err(DocumentError::EmptyId(at));
    }
    if resource.kind.is_empty() {
        return Err(DocumentError::EmptyKind(at));
    }

    for (name, relationship) in &resource.relationships {
        let empty = match &relationship.data {
            RelationshipData::One(reference) => reference.id.is_empty() || reference.kind.is_empty(),
            RelationshipData::Many(references) => references
                .iter()
                .any(|r| r.id.is_empty() || r.kind.is_empty()),
        };
        if empty {
            return Err(DocumentError::EmptyReference {
                at,
                name: name.clone(),
            });
        }
    }

    Ok(())
}

// --- tests -------------------------------------------------------------------

//! Human-readable text rendering of resource objects and documents.
//!
//! The output is stable plain text suitable for terminals and logs. It is a
//! debugging aid, not a canonical format — only the JSON wire format is
//! normative.

use crate::types::{Document, PrimaryData, RelationshipData, ResourceObject};

/// Render a single resource object as indented plain text.
///
/// ```text
/// [posts] p1
///   title: "Hi"
///   body: "A longer body…"
///
/// Relationships:
///   author    accounts.a1
///   comments  comments.c1, comments.c2
/// ```
pub fn render_resource(resource: &ResourceObject) -> String {
    let mut out = String::new();

    out.push_str(&format!("[{}] {}\n", resource.kind, resource.id));

    for (name, value) in &resource.attributes {
        out.push_str(&format!("  {}: {}\n", name, compact(value)));
    }

    if !resource.relationships.is_empty() {
        let width = resource
            .relationships
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0);
        out.push('\n');
        out.push_str("Relationships:\n");
        for (name, relationship) in &resource.relationships {
            let refs = match &relationship.data {
                RelationshipData::One(r) => format!("{}.{}", r.kind, r.id),
                RelationshipData::Many(rs) => rs
                    .iter()
                    .map(|r| format!("{}.{}", r.kind, r.id))
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            out.push_str(&format!("  {:width$}  {}\n", name, refs));
        }
    }

    if !resource.meta.is_empty() {
        out.push('\n');
        out.push_str("Meta:\n");
        for (name, value) in &resource.meta {
            out.push_str(&format!("  {}: {}\n", name, compact(value)));
        }
    }

    out
}

/// Render an entire document as a summary.
///
/// ```text
/// JSON:API document  2 resources, 3 included
/// ──────────────────────────────────────────
///
/// [posts] p1  title: "Hi"
/// [posts] p2  title: "Second"
///
/// Included (3):
///   [accounts] a1  name: "Ann"
///   [comments] c1  body: "Nice"
///   [comments] c2  body: "Indeed"
/// ```
///
/// Error documents render each error on one line instead.
pub fn render_document(doc: &Document) -> String {
    if let Some(errors) = &doc.errors {
        let header = format!(
            "JSON:API errors  {} error{}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        );
        let mut out = format!("{}\n{}\n\n", header, "─".repeat(header.len()));
        for error in errors {
            let status = error.status.as_deref().unwrap_or("-");
            let title = error.title.as_deref().unwrap_or("(no title)");
            out.push_str(&format!("  {status}  {title}"));
            if let Some(detail) = &error.detail {
                out.push_str(&format!(" — {}", truncate(detail, 72)));
            }
            if let Some(pointer) = error
                .source
                .as_ref()
                .and_then(|s| s.get("pointer"))
                .and_then(|p| p.as_str())
            {
                out.push_str(&format!(" (pointer: {pointer})"));
            }
            out.push('\n');
        }
        return out;
    }

    let resources: Vec<&ResourceObject> = match &doc.data {
        Some(PrimaryData::One(resource)) => vec![resource],
        Some(PrimaryData::Many(resources)) => resources.iter().collect(),
        None => vec![],
    };
    let included = doc.included.as_deref().unwrap_or(&[]);

    let header = format!(
        "JSON:API document  {} resource{}, {} included",
        resources.len(),
        if resources.len() == 1 { "" } else { "s" },
        included.len()
    );
    let mut out = format!("{}\n{}\n\n", header, "─".repeat(header.len()));

    for resource in resources {
        out.push_str(&summary_line(resource, 0));
    }

    if !included.is_empty() {
        out.push('\n');
        out.push_str(&format!("Included ({}):\n", included.len()));
        for resource in included {
            out.push_str(&summary_line(resource, 2));
        }
    }

    out
}

// One line per resource: identity plus its first attribute as an excerpt.
fn summary_line(resource: &ResourceObject, indent: usize) -> String {
    let mut line = format!(
        "{}[{}] {}",
        " ".repeat(indent),
        resource.kind,
        resource.id
    );
    if let Some((name, value)) = resource.attributes.first() {
        line.push_str(&format!("  {}: {}", name, truncate(&compact(value), 56)));
    }
    line.push('\n');
    line
}

// --- helpers -----------------------------------------------------------------

fn compact(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.len() <= max {
        s.to_string()
    } else {
        // truncate at a character boundary
        let boundary = s
            .char_indices()
            .take_while(|(i, _)| *i < max - 1)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(max);
        format!("{}…", &s[..boundary])
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Identifier, RelationshipObject};
    use serde_json::json;

    fn post() -> ResourceObject {
        let mut r = ResourceObject::new("posts", "p1");
        r.attributes.insert("title".into(), json!("Hi"));
        r.relationships.insert(
            "author".into(),
            RelationshipObject {
                data: RelationshipData::One(Identifier::new("accounts", "a1")),
            },
        );
        r
    }

    #[test]
    fn render_resource_contains_key_fields() {
        let rendered = render_resource(&post());
        assert!(rendered.contains("[posts] p1"));
        assert!(rendered.contains("title: \"Hi\""));
        assert!(rendered.contains("author"));
        assert!(rendered.contains("accounts.a1"));
    }

    #[test]
    fn render_document_summarises_included() {
        let doc = Document {
            data: Some(PrimaryData::One(post())),
            included: Some(vec![ResourceObject::new("accounts", "a1")]),
            ..Document::default()
        };
        let rendered = render_document(&doc);
        assert!(rendered.contains("1 resource, 1 included"));
        assert!(rendered.contains("Included (1):"));
        assert!(rendered.contains("[accounts] a1"));
    }

    #[test]
    fn render_error_document_lists_errors() {
        let doc = crate::error::ApiError::new(crate::error::ErrorKind::NotFound).into_document();
        let rendered = render_document(&doc);
        assert!(rendered.contains("1 error"));
        assert!(rendered.contains("404  Not Found"));
    }
}

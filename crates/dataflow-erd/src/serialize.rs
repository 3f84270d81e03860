//! Diagram text emission for a [`DocumentModel`].

use std::fmt::Write;

use crate::consts::{FOREIGN_KEY_MARKER, INDENT, PRIMARY_KEY_MARKER, ROOT_KEYWORD};
use crate::model::{Attribute, DocumentModel, Entity, Relationship};

/// Remove every character that is not alphanumeric.
///
/// Grammar tokens are whitespace-delimited, so names like `Order Item` become
/// `OrderItem`. Distinct names can collapse into the same identifier.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Attribute names additionally keep underscores (`user_id`).
fn sanitize_attribute_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Serialize a document to Mermaid `erDiagram` text.
///
/// Entity blocks come first in model order, then one line per relationship.
/// Entity and attribute descriptions are not part of the grammar and are
/// dropped; relationship descriptions become the quoted label.
#[must_use]
pub fn serialize(model: &DocumentModel) -> String {
    let mut out = String::new();
    out.push_str(ROOT_KEYWORD);
    out.push('\n');

    for entity in &model.entities {
        write_entity(&mut out, entity);
    }
    for relationship in &model.relationships {
        write_relationship(&mut out, relationship);
    }

    out
}

fn write_entity(out: &mut String, entity: &Entity) {
    let name = sanitize_identifier(&entity.name);
    if name.is_empty() {
        return;
    }

    let _ = writeln!(out, "{INDENT}{name} {{");
    for attribute in &entity.attributes {
        write_attribute(out, attribute);
    }
    let _ = writeln!(out, "{INDENT}}}");
}

fn write_attribute(out: &mut String, attribute: &Attribute) {
    let name = sanitize_attribute_name(&attribute.name);
    if name.is_empty() {
        return;
    }

    let _ = write!(out, "{INDENT}{INDENT}{} {name}", attribute.attr_type.as_str());
    match (attribute.is_primary_key, attribute.is_foreign_key) {
        (true, true) => {
            let _ = write!(out, " {PRIMARY_KEY_MARKER}, {FOREIGN_KEY_MARKER}");
        }
        (true, false) => {
            let _ = write!(out, " {PRIMARY_KEY_MARKER}");
        }
        (false, true) => {
            let _ = write!(out, " {FOREIGN_KEY_MARKER}");
        }
        (false, false) => {}
    }
    out.push('\n');
}

fn write_relationship(out: &mut String, relationship: &Relationship) {
    let from = sanitize_identifier(&relationship.from);
    let to = sanitize_identifier(&relationship.to);
    if from.is_empty() || to.is_empty() {
        return;
    }

    let _ = writeln!(
        out,
        "{INDENT}{from} {} {to} : \"{}\"",
        relationship.kind.connector(),
        label_text(&relationship.description)
    );
}

/// Relationship label safe for a single quoted grammar line.
fn label_text(description: &str) -> String {
    description
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('"', "'")
}

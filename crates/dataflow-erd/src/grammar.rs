//! Line-oriented parser for Mermaid `erDiagram` text.
//!
//! Parsing is a single scan: every non-blank line is classified into a
//! [`Line`] variant, then folded into a [`DocumentModel`]. Lines that fit
//! no variant are dropped, so the parser never fails. Generated diagrams are
//! often slightly off-grammar and a partial model beats none.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::consts::{
    BLOCK_CLOSE, BLOCK_OPEN, COMMENT_PREFIX, CONNECTOR_TOKENS, DESCRIPTION_SEPARATOR,
    FOREIGN_KEY_MARKER, PRIMARY_KEY_MARKER, ROOT_KEYWORD,
};
use crate::model::{Attribute, AttributeType, DocumentModel, Entity, Relationship, RelationshipKind};

/// `From <connector> To`, where the connector is two cardinality markers
/// joined by `--` (identifying) or `..` (non-identifying).
static RELATIONSHIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\s|}]+)\s*([|}][|o](?:--|\.\.)[|o][|{])\s*(\S+)$").unwrap()
});

/// Classification of a single diagram line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// The `erDiagram` start marker.
    Root,
    /// A complete relationship declaration.
    Relationship(Relationship),
    /// `Name {` opening an entity block.
    EntityOpen(&'a str),
    /// `}` closing the open entity block.
    EntityClose,
    /// `type name [PK|FK]` inside an entity block.
    Attribute(AttributeDecl<'a>),
    /// Anything the grammar does not cover.
    Ignored,
}

/// Attribute declaration before the entity name is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDecl<'a> {
    pub attr_type: AttributeType,
    pub name: &'a str,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
}

/// Classify one trimmed, non-blank line.
///
/// `in_entity` is true while an entity block is open; attribute declarations
/// are only recognized there.
#[must_use]
pub fn classify_line(line: &str, in_entity: bool) -> Line<'_> {
    if line == ROOT_KEYWORD {
        return Line::Root;
    }

    if line.starts_with(COMMENT_PREFIX) {
        return Line::Ignored;
    }

    let has_connector = CONNECTOR_TOKENS.iter().any(|token| line.contains(token));

    if has_connector && line.contains(DESCRIPTION_SEPARATOR) {
        return parse_relationship(line).map_or(Line::Ignored, Line::Relationship);
    }

    if let Some(head) = line.strip_suffix(BLOCK_OPEN) {
        return match head.split_whitespace().last() {
            Some(name) => Line::EntityOpen(name),
            None => Line::Ignored,
        };
    }

    if line == BLOCK_CLOSE {
        return if in_entity {
            Line::EntityClose
        } else {
            Line::Ignored
        };
    }

    if in_entity && !has_connector {
        return parse_attribute(line).map_or(Line::Ignored, Line::Attribute);
    }

    Line::Ignored
}

/// Parse diagram text into a [`DocumentModel`].
///
/// Descriptions are synthesized from names because the grammar carries none
/// for entities and attributes. An entity block that is never closed is
/// dropped.
#[must_use]
pub fn parse(text: &str) -> DocumentModel {
    let mut model = DocumentModel::default();
    let mut open: Option<Entity> = None;

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match classify_line(line, open.is_some()) {
            Line::Root => {}
            Line::Relationship(relationship) => model.relationships.push(relationship),
            Line::EntityOpen(name) => {
                if let Some(unclosed) = open.take() {
                    debug!(
                        "line {}: dropping unclosed entity '{}'",
                        number + 1,
                        unclosed.name
                    );
                }
                open = Some(Entity {
                    name: name.to_owned(),
                    description: format!("Represents a {} in the system", name.to_lowercase()),
                    attributes: Vec::new(),
                });
            }
            Line::EntityClose => {
                if let Some(entity) = open.take() {
                    model.entities.push(entity);
                }
            }
            Line::Attribute(decl) => {
                if let Some(entity) = open.as_mut() {
                    let description =
                        format!("The {} of the {}", decl.name.to_lowercase(), entity.name);
                    entity.attributes.push(Attribute {
                        name: decl.name.to_owned(),
                        attr_type: decl.attr_type,
                        is_primary_key: decl.is_primary_key,
                        is_foreign_key: decl.is_foreign_key,
                        description,
                    });
                }
            }
            Line::Ignored => debug!("line {}: ignored '{}'", number + 1, line),
        }
    }

    if let Some(unclosed) = open {
        debug!("dropping unclosed entity '{}' at end of input", unclosed.name);
    }

    model
}

fn parse_relationship(line: &str) -> Option<Relationship> {
    let (left, label) = line.split_once(DESCRIPTION_SEPARATOR)?;
    let caps = RELATIONSHIP_PATTERN.captures(left.trim())?;

    let label = label.trim();
    let label = label.strip_prefix('"').unwrap_or(label);
    let label = label.strip_suffix('"').unwrap_or(label);

    let kind = RelationshipKind::from_connector(&caps[2]).unwrap_or_default();

    Some(Relationship {
        from: caps[1].to_owned(),
        to: caps[3].to_owned(),
        kind,
        description: label.to_owned(),
        cardinality: kind.cardinality().to_owned(),
    })
}

fn parse_attribute(line: &str) -> Option<AttributeDecl<'_>> {
    let mut tokens = line.split_whitespace();
    let type_token = tokens.next()?;
    let name = tokens.next()?;

    let mut decl = AttributeDecl {
        attr_type: AttributeType::parse(type_token).unwrap_or_default(),
        name,
        is_primary_key: false,
        is_foreign_key: false,
    };

    // Key markers may be written `PK`, `FK` or `PK, FK`; a quoted comment ends them.
    for token in tokens.take_while(|t| !t.starts_with('"')) {
        for marker in token.split(',').map(str::trim) {
            if marker == PRIMARY_KEY_MARKER {
                decl.is_primary_key = true;
            } else if marker == FOREIGN_KEY_MARKER {
                decl.is_foreign_key = true;
            }
        }
    }

    Some(decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "erDiagram\n    User {\n        string id PK\n        string name\n    }\n    Order {\n        string id PK\n    }\n    User ||--o{ Order : \"places\"\n";

    #[test]
    fn test_parse_sample_entities() {
        let model = parse(SAMPLE);

        let names: Vec<_> = model.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Order"]);

        let user = &model.entities[0];
        assert_eq!(user.attributes.len(), 2);
        assert_eq!(user.attributes[0].name, "id");
        assert!(user.attributes[0].is_primary_key);
        assert_eq!(user.attributes[1].name, "name");
        assert!(!user.attributes[1].is_primary_key);

        let order = &model.entities[1];
        assert_eq!(order.attributes.len(), 1);
        assert!(order.attributes[0].is_primary_key);
    }

    #[test]
    fn test_parse_sample_relationship() {
        let model = parse(SAMPLE);

        assert_eq!(model.relationships.len(), 1);
        let rel = &model.relationships[0];
        assert_eq!(rel.from, "User");
        assert_eq!(rel.to, "Order");
        assert_eq!(rel.kind, RelationshipKind::OneToMany);
        assert_eq!(rel.description, "places");
        assert_eq!(rel.cardinality, "1:N");
    }

    #[test]
    fn test_synthesized_descriptions() {
        let model = parse(SAMPLE);

        assert_eq!(model.entities[0].description, "Represents a user in the system");
        assert_eq!(model.entities[0].attributes[1].description, "The name of the User");
    }

    #[test]
    fn test_all_connectors() {
        let text = "erDiagram\n  A ||--|| B : \"one\"\n  A ||--o{ B : \"many\"\n  A }o--|| B : \"back\"\n  A }o--o{ B : \"both\"\n";
        let kinds: Vec<_> = parse(text).relationships.iter().map(|r| r.kind).collect();

        assert_eq!(
            kinds,
            vec![
                RelationshipKind::OneToOne,
                RelationshipKind::OneToMany,
                RelationshipKind::ManyToOne,
                RelationshipKind::ManyToMany,
            ]
        );
    }

    #[test]
    fn test_ambiguous_connector_defaults_to_one_to_many() {
        let model = parse("erDiagram\n  Customer |o..o{ Address : uses\n");

        let rel = &model.relationships[0];
        assert_eq!(rel.from, "Customer");
        assert_eq!(rel.to, "Address");
        assert_eq!(rel.kind, RelationshipKind::OneToMany);
        assert_eq!(rel.cardinality, "1:N");
        assert_eq!(rel.description, "uses");
    }

    #[test]
    fn test_connector_without_spaces() {
        let model = parse("erDiagram\n  User||--o{Order : \"places\"\n");

        assert_eq!(model.relationships[0].from, "User");
        assert_eq!(model.relationships[0].to, "Order");
    }

    #[test]
    fn test_relationship_without_label_is_ignored() {
        let model = parse("erDiagram\n  User ||--o{ Order\n");
        assert!(model.relationships.is_empty());
    }

    #[test]
    fn test_relationship_endpoints_not_checked() {
        let model = parse("erDiagram\n  Ghost ||--o{ Phantom : \"haunts\"\n");

        assert!(model.entities.is_empty());
        assert_eq!(model.relationships.len(), 1);
    }

    #[test]
    fn test_relationship_inside_entity_block() {
        let text = "erDiagram\n  User {\n    int id PK\n    User ||--o{ Order : \"places\"\n  }\n";
        let model = parse(text);

        assert_eq!(model.entities[0].attributes.len(), 1);
        assert_eq!(model.relationships.len(), 1);
    }

    #[test]
    fn test_foreign_key_and_combined_markers() {
        let text = "erDiagram\n  Order {\n    int user_id FK\n    int id PK, FK\n    int code PK,FK \"comment\"\n  }\n";
        let attrs = &parse(text).entities[0].attributes;

        assert!(attrs[0].is_foreign_key && !attrs[0].is_primary_key);
        assert!(attrs[1].is_primary_key && attrs[1].is_foreign_key);
        assert!(attrs[2].is_primary_key && attrs[2].is_foreign_key);
    }

    #[test]
    fn test_quoted_comment_does_not_set_keys() {
        let text = "erDiagram\n  User {\n    string email \"PK of nothing\"\n  }\n";
        let attr = &parse(text).entities[0].attributes[0];

        assert!(!attr.is_primary_key);
        assert!(!attr.is_foreign_key);
    }

    #[test]
    fn test_unknown_type_falls_back_to_string() {
        let model = parse("erDiagram\n  File {\n    blob data\n  }\n");
        assert_eq!(model.entities[0].attributes[0].attr_type, AttributeType::String);
    }

    #[test]
    fn test_malformed_lines_dropped() {
        let text = "erDiagram\n  %% comment\n  User {\n    %% inline note\n    lonely\n    int id PK\n  }\n  }\n  random prose here\n";
        let model = parse(text);

        assert_eq!(model.entities.len(), 1);
        assert_eq!(model.entities[0].attributes.len(), 1);
        assert!(model.relationships.is_empty());
    }

    #[test]
    fn test_unclosed_entity_dropped() {
        let text = "erDiagram\n  User {\n    int id PK\n  Order {\n    int id PK\n  }\n  Item {\n    int id\n";
        let model = parse(text);

        let names: Vec<_> = model.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Order"]);
    }

    #[test]
    fn test_attributes_outside_entity_ignored() {
        let model = parse("erDiagram\n  int id PK\n");
        assert!(model.entities.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), DocumentModel::default());
        assert_eq!(parse("\n\n   \n"), DocumentModel::default());
    }

    #[test]
    fn test_without_root_keyword() {
        let model = parse("User {\n  int id PK\n}\n");
        assert_eq!(model.entities.len(), 1);
    }

    #[test]
    fn test_classify_line_variants() {
        assert_eq!(classify_line("erDiagram", false), Line::Root);
        assert_eq!(classify_line("User {", false), Line::EntityOpen("User"));
        assert_eq!(classify_line("}", true), Line::EntityClose);
        assert_eq!(classify_line("}", false), Line::Ignored);
        assert_eq!(classify_line("{", false), Line::Ignored);
        assert_eq!(classify_line("int id PK", false), Line::Ignored);
        assert_eq!(
            classify_line("int id PK", true),
            Line::Attribute(AttributeDecl {
                attr_type: AttributeType::Int,
                name: "id",
                is_primary_key: true,
                is_foreign_key: false,
            })
        );
        assert!(matches!(
            classify_line("A ||--o{ B : \"x\"", true),
            Line::Relationship(_)
        ));
        assert_eq!(classify_line("A --- B : \"x\"", false), Line::Ignored);
    }
}

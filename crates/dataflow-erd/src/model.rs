//! Structured form of an entity-relationship diagram.
//!
//! The JSON shape is `{ "entities": [...], "relationships": [...] }` with
//! camelCase field names. Attribute types and relationship kinds are read
//! leniently: unknown values fall back to [`AttributeType::String`] and
//! [`RelationshipKind::OneToMany`].

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::validate::validate_document_shape;

/// Entities and relationships of one diagram.
///
/// Built fresh by every translation call and handed to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Entities in declaration order.
    pub entities: Vec<Entity>,
    /// Relationships in declaration order.
    pub relationships: Vec<Relationship>,
}

impl DocumentModel {
    /// Load a document from its JSON form.
    ///
    /// The top-level shape is checked with [`validate_document_shape`] first, so a
    /// response missing `entities` or `relationships` is reported as
    /// [`DocumentError::MissingField`] rather than a generic decode error.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        validate_document_shape(&value)?;

        let mut model: Self = serde_json::from_value(value)?;
        for relationship in &mut model.relationships {
            if relationship.cardinality.is_empty() {
                relationship.cardinality = relationship.kind.cardinality().to_owned();
            }
        }
        Ok(model)
    }

    /// Render the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find an entity by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// A table-like entity with ordered attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// A single column of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub description: String,
}

/// Column types recognized by the diagram grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AttributeType {
    Int,
    #[default]
    String,
    Date,
    Decimal,
    Boolean,
    Float,
}

impl AttributeType {
    /// Parse a type token, accepting common SQL spellings.
    ///
    /// Returns None for tokens that name none of the supported types.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" | "bigint" | "smallint" | "long" | "serial" => Some(Self::Int),
            "string" | "text" | "varchar" | "char" | "uuid" => Some(Self::String),
            "date" | "datetime" | "timestamp" | "time" => Some(Self::Date),
            "decimal" | "numeric" | "money" | "number" => Some(Self::Decimal),
            "boolean" | "bool" => Some(Self::Boolean),
            "float" | "double" | "real" => Some(Self::Float),
            _ => None,
        }
    }

    /// Token emitted in diagram text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::String => "string",
            Self::Date => "date",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Float => "float",
        }
    }
}

impl From<String> for AttributeType {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_default()
    }
}

/// A link between two entities.
///
/// `from` and `to` are not checked against the declared entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    #[serde(default, alias = "type", alias = "relationshipType")]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub description: String,
    /// Short cardinality label such as `1:N`.
    #[serde(default)]
    pub cardinality: String,
}

/// Cardinality of a [`Relationship`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum RelationshipKind {
    OneToOne,
    #[default]
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    /// Parse a kind name (`one-to-many`, `one_to_many`, `1:N`, ...).
    ///
    /// Returns None for unrecognized names.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "one-to-one" | "1:1" => Some(Self::OneToOne),
            "one-to-many" | "1:n" | "1:m" => Some(Self::OneToMany),
            "many-to-one" | "n:1" | "m:1" => Some(Self::ManyToOne),
            "many-to-many" | "n:m" | "m:n" | "n:n" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    /// Look up the kind for an exact Mermaid connector.
    ///
    /// Only the four connectors emitted by [`connector`](Self::connector) are
    /// recognized; anything else is ambiguous and returns None.
    #[must_use]
    pub fn from_connector(connector: &str) -> Option<Self> {
        match connector {
            "||--||" => Some(Self::OneToOne),
            "||--o{" => Some(Self::OneToMany),
            "}o--||" => Some(Self::ManyToOne),
            "}o--o{" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    /// Mermaid connector symbol for this kind.
    #[must_use]
    pub fn connector(self) -> &'static str {
        match self {
            Self::OneToOne => "||--||",
            Self::OneToMany => "||--o{",
            Self::ManyToOne => "}o--||",
            Self::ManyToMany => "}o--o{",
        }
    }

    /// Cardinality label for this kind.
    #[must_use]
    pub fn cardinality(self) -> &'static str {
        match self {
            Self::OneToOne => "1:1",
            Self::OneToMany => "1:N",
            Self::ManyToOne => "N:1",
            Self::ManyToMany => "N:M",
        }
    }

    /// Kind name as used in JSON documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }
}

impl From<String> for RelationshipKind {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_default()
    }
}

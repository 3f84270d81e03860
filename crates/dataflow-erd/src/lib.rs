//! Entity-relationship diagrams for dataflow.
//!
//! This crate converts between the Mermaid `erDiagram` grammar and a structured
//! [`DocumentModel`], and cleans up raw text returned by the generation service:
//! - [`normalize`] strips code fences and classifies text as JSON or diagram
//! - [`parse`] scans diagram text into a [`DocumentModel`] (lenient, never fails)
//! - [`serialize`] emits diagram text from a [`DocumentModel`]
//! - [`DocumentModel::from_json`] loads the JSON form after [`validate_document_shape`]
//!
//! # Example
//!
//! ```
//! use dataflow_erd::{parse, serialize};
//!
//! let text = "erDiagram\n    User {\n        string id PK\n    }\n";
//! let model = parse(text);
//! assert_eq!(model.entities[0].name, "User");
//! assert!(serialize(&model).starts_with("erDiagram"));
//! ```

mod consts;
mod error;
mod grammar;
mod model;
mod normalize;
mod serialize;
mod validate;

pub use consts::ROOT_KEYWORD;
pub use error::DocumentError;
pub use grammar::{AttributeDecl, Line, classify_line, parse};
pub use model::{Attribute, AttributeType, DocumentModel, Entity, Relationship, RelationshipKind};
pub use normalize::{ResponseShape, classify, normalize};
pub use serialize::{sanitize_identifier, serialize};
pub use validate::validate_document_shape;

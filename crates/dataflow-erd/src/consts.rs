//! Tokens of the `erDiagram` grammar.

/// Root keyword that starts every diagram.
pub const ROOT_KEYWORD: &str = "erDiagram";

/// Opens an entity block (`User {`).
pub(crate) const BLOCK_OPEN: &str = "{";

/// Closes an entity block.
pub(crate) const BLOCK_CLOSE: &str = "}";

/// Separates a relationship from its label (`A ||--o{ B : "label"`).
pub(crate) const DESCRIPTION_SEPARATOR: &str = " : ";

/// Mark a line as a relationship candidate (identifying and non-identifying).
pub(crate) const CONNECTOR_TOKENS: [&str; 2] = ["--", ".."];

/// Starts a Mermaid comment line.
pub(crate) const COMMENT_PREFIX: &str = "%%";

/// Primary key marker in attribute declarations.
pub(crate) const PRIMARY_KEY_MARKER: &str = "PK";

/// Foreign key marker in attribute declarations.
pub(crate) const FOREIGN_KEY_MARKER: &str = "FK";

/// Indentation for entity and relationship lines.
pub(crate) const INDENT: &str = "    ";

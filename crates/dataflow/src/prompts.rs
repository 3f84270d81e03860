//! Prompt builders and fallback payloads for each generation task.

use clap::ValueEnum;
use dataflow_erd::{DocumentError, DocumentModel, ResponseShape, classify, parse, serialize};

/// Leading keyword of a Mermaid top-down flowchart.
const FLOWCHART_KEYWORD: &str = "flowchart TD";

const ER_DIAGRAM_INSTRUCTIONS: &str = r#"Given the following system description, design the database and return it as a Mermaid erDiagram.
Rules:
1. Start with 'erDiagram'
2. Declare every entity as a block: Name { type name PK }
3. Entity and attribute names use letters, digits and underscores only
4. Attribute types are one of: int, string, date, decimal, boolean, float
5. Mark primary keys with PK and foreign keys with FK
6. Declare relationships as: From ||--o{ To : "description"
7. Use ||--|| for one-to-one, ||--o{ for one-to-many, }o--|| for many-to-one, }o--o{ for many-to-many
8. Example:
erDiagram
    User {
        int id PK
        string email
    }
    Order {
        int id PK
        int userId FK
        date placedAt
    }
    User ||--o{ Order : "places""#;

const ER_DOCUMENT_INSTRUCTIONS: &str = r#"Given the following system description, design the database and return it as a JSON object with this structure:
{
    "entities": [
        {
            "name": "PascalCase entity name without spaces",
            "description": "What the entity represents",
            "attributes": [
                {
                    "name": "attribute name without spaces",
                    "type": "int | string | date | decimal | boolean | float",
                    "isPrimaryKey": true,
                    "isForeignKey": false,
                    "description": "What the attribute holds"
                }
            ]
        }
    ],
    "relationships": [
        {
            "from": "Entity name",
            "to": "Entity name",
            "type": "one-to-one | one-to-many | many-to-one | many-to-many",
            "description": "How the entities relate",
            "cardinality": "1:1 | 1:N | N:1 | N:M"
        }
    ]
}"#;

const API_DOC_INSTRUCTIONS: &str = "Given the following system description, generate OpenAPI (Swagger) documentation in JSON format.
Include endpoints, request and response schemas, and descriptions.
The response must be a single valid OpenAPI 3.0 JSON object.";

const DFD_DOC_INSTRUCTIONS: &str = r#"Given the following system description, document its data flows as a JSON object with this structure:
{
    "systemOverview": "Brief description of the system and its purpose",
    "level0DFD": "Description of the Level 0 DFD: main processes and data flows",
    "externalEntities": [
        {"name": "User", "description": "Role of the entity", "interactions": "How it interacts with the system"}
    ],
    "processes": [
        {"name": "Process Order", "description": "What the process does", "inputs": "Incoming data", "outputs": "Outgoing data"}
    ],
    "dataStores": [
        {"name": "Order Database", "description": "What is stored", "data": "Kinds of records kept"}
    ],
    "dataFlows": [
        {"from": "Source", "to": "Destination", "description": "What is transferred", "data": "Specific data items"}
    ],
    "systemBoundaries": "What lies inside and outside the system"
}"#;

const DFD_INSTRUCTIONS: &str = "Given the following system description, generate a Level 0 Data Flow Diagram as a Mermaid flowchart.
Identify the main processes, external entities, data stores and data flows.
Rules:
1. Start with 'flowchart TD'
2. Use square brackets [] for external entities
3. Use round brackets () for processes
4. Use double curly brackets {{}} for data stores
5. Use --> for connections
6. Use simple node IDs like A, B, C
7. Example:
flowchart TD
    A[User] --> B(Login Process)
    B --> C{{Database}}
    C --> B
    B --> A";

const DIAGRAM_CLOSING: &str =
    "Important: Return ONLY the diagram code. Do not include markdown formatting, backticks or any other text.";

const JSON_CLOSING: &str =
    "Important: Return ONLY the JSON object. Do not include markdown formatting, backticks or any other text.";

const ER_DIAGRAM_FALLBACK: &str = "erDiagram\n";

const ER_DOCUMENT_FALLBACK: &str = r#"{
  "entities": [],
  "relationships": []
}"#;

const API_DOC_FALLBACK: &str = r#"{
  "openapi": "3.0.0",
  "info": {
    "title": "Default API",
    "version": "1.0.0",
    "description": "Default API documentation"
  },
  "paths": {}
}"#;

const DFD_DOC_FALLBACK: &str = r#"{
  "systemOverview": "Default system overview",
  "level0DFD": "Default Level 0 DFD description",
  "externalEntities": [],
  "processes": [],
  "dataStores": [],
  "dataFlows": [],
  "systemBoundaries": "Default system boundaries"
}"#;

const DFD_FALLBACK: &str = "flowchart TD
    A[User] --> B(Process)
    B --> C{{Data Store}}
    C --> B
    B --> A";

/// Artifact a generation run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Task {
    /// Mermaid `erDiagram` text.
    ErDiagram,
    /// Entity-relationship document as JSON.
    ErDocument,
    /// OpenAPI documentation as JSON.
    ApiDoc,
    /// Data flow documentation as JSON.
    DfdDoc,
    /// Level 0 data flow diagram as a Mermaid flowchart.
    Dfd,
}

/// Final text of a task, either accepted from the service or substituted.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Artifact {
    Generated(String),
    Fallback(&'static str),
}

impl Artifact {
    pub(crate) fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text.as_str(),
            Self::Fallback(text) => text,
        }
    }

    pub(crate) fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

impl Task {
    /// Build the full prompt for a system description.
    pub(crate) fn prompt(self, description: &str) -> String {
        let (instructions, closing) = match self {
            Self::ErDiagram => (ER_DIAGRAM_INSTRUCTIONS, DIAGRAM_CLOSING),
            Self::ErDocument => (ER_DOCUMENT_INSTRUCTIONS, JSON_CLOSING),
            Self::ApiDoc => (API_DOC_INSTRUCTIONS, JSON_CLOSING),
            Self::DfdDoc => (DFD_DOC_INSTRUCTIONS, JSON_CLOSING),
            Self::Dfd => (DFD_INSTRUCTIONS, DIAGRAM_CLOSING),
        };
        format!(
            "{instructions}\n\nSystem description:\n{}\n\n{closing}",
            description.trim()
        )
    }

    /// Payload substituted when the service answers with the wrong shape.
    pub(crate) fn fallback(self) -> &'static str {
        match self {
            Self::ErDiagram => ER_DIAGRAM_FALLBACK,
            Self::ErDocument => ER_DOCUMENT_FALLBACK,
            Self::ApiDoc => API_DOC_FALLBACK,
            Self::DfdDoc => DFD_DOC_FALLBACK,
            Self::Dfd => DFD_FALLBACK,
        }
    }

    /// Turn normalized service output into the task's artifact.
    ///
    /// ER tasks accept either ER form and convert through the translator.
    /// An ER document that fails shape validation is an error, not a fallback.
    pub(crate) fn accept(self, text: &str) -> Result<Artifact, DocumentError> {
        let shape = classify(text);
        let artifact = match (self, shape) {
            (Self::ErDiagram, ResponseShape::Diagram)
            | (Self::ApiDoc | Self::DfdDoc, ResponseShape::Json) => {
                Artifact::Generated(text.to_owned())
            }
            (Self::ErDiagram, ResponseShape::Json) => {
                Artifact::Generated(serialize(&DocumentModel::from_json(text)?))
            }
            (Self::ErDocument, ResponseShape::Json) => {
                Artifact::Generated(DocumentModel::from_json(text)?.to_json()?)
            }
            (Self::ErDocument, ResponseShape::Diagram) => {
                Artifact::Generated(parse(text).to_json()?)
            }
            (Self::Dfd, _) if text.starts_with(FLOWCHART_KEYWORD) => {
                Artifact::Generated(text.to_owned())
            }
            _ => Artifact::Fallback(self.fallback()),
        };
        Ok(artifact)
    }
}

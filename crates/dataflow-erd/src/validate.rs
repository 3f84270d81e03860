//! Shape check for JSON documents.

use serde_json::Value;

use crate::error::DocumentError;

const REQUIRED_FIELDS: [&str; 2] = ["entities", "relationships"];

/// Confirm that a JSON value carries both `entities` and `relationships` arrays.
///
/// Missing fields are not repaired: the caller decides whether to fall back
/// to a default document.
pub fn validate_document_shape(value: &Value) -> Result<(), DocumentError> {
    let Some(object) = value.as_object() else {
        return Err(DocumentError::InvalidField {
            field: "document",
            message: "expected a JSON object".to_owned(),
        });
    };

    for field in REQUIRED_FIELDS {
        match object.get(field) {
            None => return Err(DocumentError::MissingField(field)),
            Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(DocumentError::InvalidField {
                    field,
                    message: format!("expected an array, found {}", json_type_name(other)),
                });
            }
        }
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_shape() {
        let value = json!({"entities": [], "relationships": []});
        assert!(validate_document_shape(&value).is_ok());
    }

    #[test]
    fn test_missing_entities() {
        let value = json!({"relationships": []});
        let err = validate_document_shape(&value).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField("entities")));
        assert!(err.to_string().contains("entities"));
    }

    #[test]
    fn test_missing_relationships() {
        let value = json!({"entities": []});
        let err = validate_document_shape(&value).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField("relationships")));
    }

    #[test]
    fn test_wrong_field_type() {
        let value = json!({"entities": {}, "relationships": []});
        let err = validate_document_shape(&value).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::InvalidField {
                field: "entities",
                ..
            }
        ));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_not_an_object() {
        let value = json!([1, 2, 3]);
        let err = validate_document_shape(&value).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::InvalidField {
                field: "document",
                ..
            }
        ));
    }

    #[test]
    fn test_extra_fields_allowed() {
        let value = json!({"entities": [], "relationships": [], "title": "Shop"});
        assert!(validate_document_shape(&value).is_ok());
    }
}

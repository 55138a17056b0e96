use std::borrow::Cow;

use serde_json::Value;

use crate::error::{NotebookError, Result};

/// Read a multi-part text field as one string.
///
/// Notebooks store text either as a single string or as an array of
/// fragments that are joined without a separator. Anything else is a
/// structural error.
pub fn collapse<'a>(value: &'a Value, location: &str, field: &str) -> Result<Cow<'a, str>> {
    match value {
        Value::String(text) => Ok(Cow::Borrowed(text)),
        Value::Array(parts) => join_fragments(parts, location, field).map(Cow::Owned),
        _ => Err(NotebookError::wrong_type(
            location,
            field,
            "a string or an array of strings",
        )),
    }
}

/// Replace a fragment array with its joined string.
///
/// Values that are not arrays are left as they are. Returns whether the
/// value was rewritten.
pub fn collapse_in_place(value: &mut Value, location: &str, field: &str) -> Result<bool> {
    let Value::Array(parts) = value else {
        return Ok(false);
    };
    let joined = join_fragments(parts, location, field)?;
    *value = Value::String(joined);
    Ok(true)
}

/// Whether a value is stored in fragment form
pub fn is_fragmented(value: &Value) -> bool {
    value.is_array()
}

/// Null, an empty string and an empty array all count as no text
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(parts) => parts.is_empty(),
        _ => false,
    }
}

fn join_fragments(parts: &[Value], location: &str, field: &str) -> Result<String> {
    let mut joined = String::new();
    for (position, part) in parts.iter().enumerate() {
        let Some(fragment) = part.as_str() else {
            return Err(NotebookError::NonStringFragment {
                location: location.to_string(),
                field: field.to_string(),
                position,
            });
        };
        joined.push_str(fragment);
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_collapse_joins_without_separator() {
        let value = json!(["import os\n", "print(os.getcwd())", "\n"]);
        let text = collapse(&value, "cell 0", "source").unwrap();
        assert_eq!(text, "import os\nprint(os.getcwd())\n");
    }

    #[test]
    fn test_collapse_plain_string_is_borrowed() {
        let value = json!("already flat");
        let text = collapse(&value, "cell 0", "source").unwrap();
        assert!(matches!(text, Cow::Borrowed("already flat")));
    }

    #[test]
    fn test_collapse_rejects_other_types() {
        let value = json!(42);
        let err = collapse(&value, "cell 2", "source").unwrap_err();
        assert!(matches!(err, NotebookError::WrongType { .. }));
    }

    #[test]
    fn test_non_string_fragment_reports_position() {
        let value = json!(["a", "b", 3]);
        let err = collapse(&value, "cell 1", "source").unwrap_err();
        match err {
            NotebookError::NonStringFragment { position, field, .. } => {
                assert_eq!(position, 2);
                assert_eq!(field, "source");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collapse_in_place() {
        let mut value = json!(["a", "b", "c"]);
        assert!(collapse_in_place(&mut value, "cell 0", "text").unwrap());
        assert_eq!(value, json!("abc"));

        // Second pass is a no-op
        assert!(!collapse_in_place(&mut value, "cell 0", "text").unwrap());
        assert_eq!(value, json!("abc"));
    }

    #[test]
    fn test_collapse_in_place_leaves_objects_alone() {
        let mut value = json!({"a": [1, 2]});
        assert!(!collapse_in_place(&mut value, "cell 0", "data.application/json").unwrap());
        assert_eq!(value, json!({"a": [1, 2]}));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!([])));
        assert!(!is_blank(&json!(["x"])));
        assert!(!is_blank(&json!("x")));
    }
}

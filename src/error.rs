use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotebookError>;

/// Structural problems found while normalizing a notebook document
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("{location}: missing field `{field}`")]
    MissingField {
        location: String,
        field: &'static str,
    },

    #[error("{location}: `{field}` should be {expected}")]
    WrongType {
        location: String,
        field: String,
        expected: &'static str,
    },

    #[error("{location}: fragment {position} of `{field}` is not a string")]
    NonStringFragment {
        location: String,
        field: String,
        position: usize,
    },

    #[error("invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl NotebookError {
    pub(crate) fn missing(location: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            location: location.into(),
            field,
        }
    }

    pub(crate) fn wrong_type(
        location: impl Into<String>,
        field: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::WrongType {
            location: location.into(),
            field: field.into(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_location() {
        let err = NotebookError::missing("cell 3", "cell_type");
        assert_eq!(err.to_string(), "cell 3: missing field `cell_type`");

        let err = NotebookError::wrong_type("cell 0 output 1", "data", "an object");
        assert_eq!(err.to_string(), "cell 0 output 1: `data` should be an object");
    }
}

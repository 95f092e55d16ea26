//! Request body validation for `POST /analyze`.
//!
//! Rules run in order and stop at the first failure, so a rejected body
//! always carries exactly one error for `filePath`.

use serde::Serialize;

pub const FILE_PATH_FIELD: &str = "filePath";

/// Extensions accepted for submitted file paths.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".ts", ".js"];

/// One failed rule, in the shape clients receive under `errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    NotEmpty,
    IsString,
    SupportedExtension,
}

impl Rule {
    fn message(self) -> String {
        match self {
            Self::Required => format!("{FILE_PATH_FIELD} is required"),
            Self::NotEmpty => format!("{FILE_PATH_FIELD} cannot be empty"),
            Self::IsString => format!("{FILE_PATH_FIELD} must be a string"),
            Self::SupportedExtension => format!(
                "{FILE_PATH_FIELD} must end with {}",
                SUPPORTED_EXTENSIONS.join(" or ")
            ),
        }
    }

    fn into_error(self) -> FieldError {
        FieldError {
            kind: "field",
            msg: self.message(),
            path: FILE_PATH_FIELD.to_owned(),
            location: "body",
        }
    }
}

/// Extract a valid `filePath` from a request body.
///
/// `None` stands for a body that could not be read as JSON at all and is
/// treated like a body without the field.
pub fn validate_file_path(body: Option<&serde_json::Value>) -> Result<String, Vec<FieldError>> {
    check_file_path(body).map_err(|rule| vec![rule.into_error()])
}

fn check_file_path(body: Option<&serde_json::Value>) -> Result<String, Rule> {
    use serde_json::Value;

    let value = body
        .and_then(|b| b.get(FILE_PATH_FIELD))
        .ok_or(Rule::Required)?;

    let empty = match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return Err(Rule::NotEmpty);
    }

    let Value::String(path) = value else {
        return Err(Rule::IsString);
    };

    if !SUPPORTED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return Err(Rule::SupportedExtension);
    }

    Ok(path.clone())
}

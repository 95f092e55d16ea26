use serde::{Deserialize, Serialize};

/// One persisted analysis entry.
///
/// `result` is kept as the raw JSON string the store holds; use
/// [`AnalysisRecord::parsed_result`] to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: i64,
    pub file_path: String,
    pub result: String,
    pub created_at: String,
}

impl AnalysisRecord {
    /// Parse the stored payload, falling back to an empty result when the
    /// stored JSON is malformed or has the wrong shape.
    pub fn parsed_result(&self) -> AnalysisResult {
        AnalysisResult::parse_lenient(&self.result)
    }
}

/// Structured payload embedded in a record's `result` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub line_count: i64,
    pub functions: Vec<String>,
    pub imports: Vec<String>,
    pub issues: Vec<Issue>,
}

impl AnalysisResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn parse_lenient(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }
}

/// A single diagnostic inside an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub line: i64,
    pub message: String,
    pub severity: Severity,
}

/// Issue severity. Labels other than `info`, `warning` and `error` are kept
/// verbatim in [`Severity::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        match label.as_str() {
            "info" => Self::Info,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Other(label),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

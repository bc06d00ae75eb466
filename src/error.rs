use thiserror::Error;

/// Failures of the aggregation core.
///
/// Every variant except [`ReportError::EmptyInput`] on the discovered file
/// set is scoped to one file or one metric: callers log it and move on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("filename not recognized: {filename}")]
    NotRecognized { filename: String },

    #[error("dimension mismatch: {real} real values vs {estimated} estimated values")]
    DimensionMismatch { real: usize, estimated: usize },

    #[error("nothing to do: {0}")]
    EmptyInput(String),

    #[error("{file}: missing column '{column}'")]
    MissingColumn { file: String, column: String },

    #[error("{file}: column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        file: String,
        column: String,
        expected: usize,
        found: usize,
    },
}

impl ReportError {
    pub fn not_recognized<T: Into<String>>(filename: T) -> Self {
        ReportError::NotRecognized {
            filename: filename.into(),
        }
    }

    pub fn empty<T: Into<String>>(what: T) -> Self {
        ReportError::EmptyInput(what.into())
    }

    pub fn missing_column<F: Into<String>, C: Into<String>>(file: F, column: C) -> Self {
        ReportError::MissingColumn {
            file: file.into(),
            column: column.into(),
        }
    }
}

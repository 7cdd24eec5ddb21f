use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a load failure, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// The input file does not exist.
    FileNotFound,
    /// The file exists but does not have the expected layout or content.
    Schema,
}

/// Everything that can go wrong while turning an input file into a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "{} not found. Please ensure the data file is in the working directory.",
        path.display()
    )]
    FileNotFound { path: PathBuf },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("missing expected column '{column}' (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidCell {
        column: String,
        row: usize,
        value: String,
    },

    #[error("header row {header_row} is past the end of the sheet")]
    MissingHeader { header_row: usize },

    #[error("table has a header but no data rows")]
    Empty,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::FileNotFound { .. } => LoadErrorKind::FileNotFound,
            _ => LoadErrorKind::Schema,
        }
    }

    pub(crate) fn unreadable<E>(path: &std::path::Path, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LoadError::Unreadable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

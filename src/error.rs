use std::path::PathBuf;

use thiserror::Error;

/// Failures while building the song index. Empty selections and short
/// result lists are not errors and never surface here.
#[derive(Debug, Error)]
pub enum VibeError {
    #[error("the dataset file '{}' was not found", path.display())]
    DataSourceNotFound { path: PathBuf },

    #[error("malformed dataset: {0}")]
    MalformedData(String),

    #[error("none of the expected feature columns are usable (expected one of: {})", expected.join(", "))]
    MissingFeatureColumns { expected: Vec<&'static str> },
}

pub type Result<T> = std::result::Result<T, VibeError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeNavError>;

#[derive(Debug, Error)]
pub enum TreeNavError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A script command that could not be parsed.
    #[error("Command error: {0}")]
    Command(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<String> for TreeNavError {
    fn from(error: String) -> Self {
        TreeNavError::Command(error)
    }
}

impl From<&str> for TreeNavError {
    fn from(error: &str) -> Self {
        TreeNavError::Command(error.to_string())
    }
}

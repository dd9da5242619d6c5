use thiserror::Error;

/// Errors raised while extracting, assembling or printing a conversation
#[derive(Debug, Error)]
pub enum PrintError {
    /// No registry key is a substring of the current host
    #[error("Unsupported platform '{host}'; supported platforms are: {}", .supported.join(", "))]
    UnsupportedPlatform { host: String, supported: Vec<String> },

    /// The host refused to open a new print surface
    #[error("Print pop-up window blocked. Please allow pop-ups and try again.")]
    PopupBlocked,

    /// Extraction ran but kept no message
    #[error("No conversation found.")]
    EmptyExtraction,

    /// Unexpected structural failure during extraction
    #[error("Extraction failed: {0}")]
    ExtractionFault(String),

    /// A selector string could not be compiled
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A platform profile or registry is malformed
    #[error("Invalid platform configuration: {0}")]
    ProfileConfig(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The print surface failed while being populated or printed
    #[error("Print failed: {0}")]
    PrintFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PrintError {
    /// The single user-visible message shown when a run aborts
    pub fn alert_message(&self) -> String {
        match self {
            PrintError::UnsupportedPlatform { supported, .. } => {
                let list = supported
                    .iter()
                    .map(|key| format!(" • {}", key))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Unsupported platform; currently supported platforms are:\n{}", list)
            }
            PrintError::PopupBlocked | PrintError::EmptyExtraction => self.to_string(),
            other => format!("Error while printing: {}", other),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PrintError>;

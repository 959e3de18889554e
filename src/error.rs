use thiserror::Error;

/// Structured error context for configuration and input validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "models[2].patchSize", "images[0].width")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "catalog", "model_validator")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the calculator.
///
/// Every check runs before any output is produced, so a call that returns
/// one of these has committed no partial totals.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid dimension for image {index}: {width}x{height} (both sides must be positive)")]
    InvalidDimension { index: usize, width: u32, height: u32 },

    #[error("Invalid multiplier for image {index}: must be at least 1")]
    InvalidMultiplier { index: usize },

    #[error("Invalid model configuration: {message}{}", format_context(.context))]
    InvalidModelConfig {
        message: String,
        context: ErrorContext,
    },

    #[error("Unknown calculation type '{0}' (expected 'tile' or 'patch')")]
    UnknownCalculationType(String),

    #[error("Token count for image {index} does not fit in 64 bits")]
    TokenOverflow { index: usize },

    #[error("Model not found: {name}{}", .hint.as_ref().map(|h| format!("\n Hint: {}", h)).unwrap_or_default())]
    ModelNotFound { name: String, hint: Option<String> },

    #[error("No model selected")]
    NoModelSelected,

    #[error("Image index {index} out of range (list has {len} images)")]
    ImageIndexOutOfRange { index: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML syntax error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a model configuration error with structured context
    pub fn model_config_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidModelConfig {
            message: msg.into(),
            context,
        }
    }

    /// Attach an actionable hint to a lookup error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        if let Error::ModelNotFound {
            hint: ref mut slot, ..
        } = self
        {
            *slot = Some(hint.into());
        }
        self
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::InvalidModelConfig { context, .. } => Some(context),
            _ => None,
        }
    }
}

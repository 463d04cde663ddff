//! Error types for Bibit Core
//!
//! Every failure a caller can observe is one of the variants below. We use
//! `thiserror` for the Display/Error implementations, as the rest of the
//! workspace does.

use thiserror::Error;

use crate::feature::Feature;

/// Result type alias for Bibit operations
pub type Result<T> = std::result::Result<T, BibitError>;

/// Main error type for Bibit operations
#[derive(Error, Debug)]
pub enum BibitError {
    /// A feature value outside that feature's closed label set
    #[error("Nilai '{value}' tidak valid untuk {feature}. Pilihan: {}", .allowed.join(", "))]
    InvalidFeatureValue {
        feature: Feature,
        value: String,
        allowed: Vec<String>,
    },

    /// The classifier or one of the encoders is missing or corrupt
    #[error("Model tidak tersedia: {reason}")]
    ModelUnavailable { reason: String },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<BibitError>,
    },
}

impl BibitError {
    /// Build an `InvalidFeatureValue` error
    pub fn invalid_value(feature: Feature, value: impl Into<String>, allowed: &[String]) -> Self {
        Self::InvalidFeatureValue {
            feature,
            value: value.into(),
            allowed: allowed.to_vec(),
        }
    }

    /// Build a `ModelUnavailable` error
    pub fn model_unavailable(reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            reason: reason.into(),
        }
    }

    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every context layer peeled off
    pub fn root(&self) -> &BibitError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Message without the `ModelUnavailable` prefix, context layers kept
    pub fn reason(&self) -> String {
        match self {
            Self::ModelUnavailable { reason } => reason.clone(),
            Self::WithContext { context, source } => format!("{context}: {}", source.reason()),
            other => other.to_string(),
        }
    }

    /// Collapse any error into `ModelUnavailable`, keeping its context in the reason
    pub fn into_model_unavailable(self) -> Self {
        match self {
            Self::ModelUnavailable { .. } => self,
            other => Self::model_unavailable(other.reason()),
        }
    }

    /// True when the caller can fix the request by changing its input
    pub fn is_user_error(&self) -> bool {
        matches!(self.root(), Self::InvalidFeatureValue { .. })
    }

    /// True when no prediction can be served until the artifacts are fixed
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self.root(), Self::ModelUnavailable { .. })
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }
}

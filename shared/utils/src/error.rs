use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CoaError {
    #[error("I/O error: {path} - {message}")]
    Io { path: String, message: String },

    #[error("PDF extraction error: {message}")]
    PdfExtraction { message: String },

    #[error("Empty input: {source_name} contains no text")]
    EmptyInput { source_name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("No valid test results found in {source_name}")]
    NoResults { source_name: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoaError {
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn pdf_extraction(message: impl Into<String>) -> Self {
        Self::PdfExtraction {
            message: message.into(),
        }
    }

    pub fn empty_input(source_name: impl Into<String>) -> Self {
        Self::EmptyInput {
            source_name: source_name.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn no_results(source_name: impl Into<String>) -> Self {
        Self::NoResults {
            source_name: source_name.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO_ERROR",
            Self::PdfExtraction { .. } => "PDF_EXTRACTION_ERROR",
            Self::EmptyInput { .. } => "EMPTY_INPUT",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Export { .. } => "EXPORT_ERROR",
            Self::NoResults { .. } => "NO_RESULTS",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Io { .. } => 500,
            Self::PdfExtraction { .. } => 422,
            Self::EmptyInput { .. } => 422,
            Self::Configuration { .. } => 500,
            Self::Validation { .. } => 400,
            Self::Export { .. } => 500,
            Self::NoResults { .. } => 422,
            Self::NotFound { .. } => 404,
            Self::Internal { .. } => 500,
        }
    }

    /// Process exit status for the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration { .. } | Self::Validation { .. } => 2,
            _ => 1,
        }
    }
}

pub type CoaResult<T> = Result<T, CoaError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<CoaError> for ErrorResponse {
    fn from(error: CoaError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for CoaError {
    fn from(error: std::io::Error) -> Self {
        Self::io("<unknown>", error.to_string())
    }
}

impl From<csv::Error> for CoaError {
    fn from(error: csv::Error) -> Self {
        Self::export(error.to_string())
    }
}

impl From<serde_json::Error> for CoaError {
    fn from(error: serde_json::Error) -> Self {
        Self::export(error.to_string())
    }
}

impl From<config::ConfigError> for CoaError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

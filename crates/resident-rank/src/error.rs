use crate::config::ConfigError;
use crate::interviews::{ExportError, IngestError, SessionError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Ingest(IngestError),
    Export(ExportError),
    Session(SessionError),
    UnknownApplicant(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Ingest(err) => write!(f, "import error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Session(err) => write!(f, "{}", err),
            AppError::UnknownApplicant(name) => {
                write!(f, "no completed evaluations for applicant '{}'", name)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Ingest(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::UnknownApplicant(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Ingest(IngestError::MissingColumn { .. })
            | AppError::Session(SessionError::Ingest(IngestError::MissingColumn { .. })) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Ingest(_) | AppError::Session(SessionError::Ingest(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnknownApplicant(_)
            | AppError::Session(SessionError::NotLoaded(_))
            | AppError::Session(SessionError::UnknownApplicant { .. }) => StatusCode::NOT_FOUND,
            AppError::Session(SessionError::Reorder { source, current }) => {
                let body = Json(json!({
                    "error": source.to_string(),
                    "entries": current,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Export(_)
            | AppError::Session(SessionError::Export(_))
            | AppError::Session(SessionError::Store(_)) => {
                error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::assistant::AssistantError;
use crate::export::ExportError;
use crate::plan::ParseError;

/// Domain error taxonomy. Transport and structural failures never touch
/// existing state; the handler mapping below is the single place errors
/// become HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("profile is incomplete; fill in all fields and save it first")]
    IncompleteProfile,
    #[error("another assistant request is in flight; try again when it settles")]
    Busy,
    #[error(transparent)]
    Assistant(#[from] AssistantError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no meal plan has been generated yet")]
    NoPlan,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::IncompleteProfile => StatusCode::PRECONDITION_FAILED,
            Self::Busy => StatusCode::CONFLICT,
            Self::Assistant(_) | Self::Parse(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) | Self::NoPlan => StatusCode::NOT_FOUND,
            Self::Export(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

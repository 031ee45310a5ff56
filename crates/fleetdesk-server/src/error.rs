//! Mapping of domain failures onto HTTP statuses and the envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fleetdesk_auth::error::AuthError;
use fleetdesk_auth::gate::GateRejection;
use fleetdesk_core::error::{ErrorKind, FleetError};
use serde_json::Value;
use tracing::error;

use crate::response::ApiResponse;

#[derive(Debug)]
pub enum ApiError {
    /// A failure raised by a service.
    Domain(FleetError),
    /// The bearer gate refused the request.
    Rejected(GateRejection),
    /// The request body or query did not pass validation.
    Invalid { message: String, errors: Option<Value> },
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid {
            message: message.into(),
            errors: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected(_) => StatusCode::UNAUTHORIZED,
            ApiError::Invalid { .. } => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::AccountInactive | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<FleetError> for ApiError {
    fn from(err: FleetError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

fn client_message(err: &FleetError) -> String {
    match err {
        FleetError::InvalidCredentials => "Invalid email or password".into(),
        FleetError::AccountInactive => "Account is inactive".into(),
        FleetError::TokenExpired => GateRejection::Expired.message().into(),
        FleetError::TokenInvalid => GateRejection::Invalid.message().into(),
        FleetError::Validation { message } => message.clone(),
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match self {
            ApiError::Rejected(rejection) => (rejection.message().to_string(), None),
            ApiError::Invalid { message, errors } => (message, errors),
            ApiError::Domain(err) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!(error = %err, "request failed");
                ("Internal server error".to_string(), None)
            }
            ApiError::Domain(err) => (client_message(&err), None),
        };
        ApiResponse::failure(status, message, errors).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

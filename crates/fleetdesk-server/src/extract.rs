//! Request extractors: validated JSON bodies, path and query values
//! that fail into the envelope, and the caller identity placed in
//! request extensions by the bearer middleware.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use fleetdesk_auth::gate::{GateRejection, Identity};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON body that must also pass its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::Invalid {
                message: "Invalid request body".into(),
                errors: Some(json!([{ "field": "body", "message": rejection.body_text() }])),
            })?;
        value.validate().map_err(|errors| ApiError::Invalid {
            message: "Validation failed".into(),
            errors: Some(field_errors(&errors)),
        })?;
        Ok(ValidatedJson(value))
    }
}

/// Path parameters; a malformed segment is a 400 envelope.
#[derive(Debug, Clone)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| ApiError::Invalid {
                message: "Invalid path parameter".into(),
                errors: Some(json!([{ "field": "path", "message": rejection.body_text() }])),
            })?;
        Ok(Path(value))
    }
}

/// Query string parameters; a malformed value is a 400 envelope.
#[derive(Debug, Clone, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection: QueryRejection| ApiError::Invalid {
                    message: "Invalid query parameter".into(),
                    errors: Some(json!([{ "field": "query", "message": rejection.body_text() }])),
                })?;
        Ok(Query(value))
    }
}

/// Flatten validator output into `[{field, message}]`, sorted by field.
fn field_errors(errors: &ValidationErrors) -> Value {
    let mut list: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", e.code));
                (field.clone(), message)
            })
        })
        .collect();
    list.sort();
    Value::Array(
        list.into_iter()
            .map(|(field, message)| json!({ "field": field, "message": message }))
            .collect(),
    )
}

/// The authenticated tenant admin.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

/// The authenticated end user.
#[derive(Debug, Clone)]
pub struct UserIdentity(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for AdminIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminIdentity>()
            .cloned()
            .ok_or(ApiError::Rejected(GateRejection::MissingHeader))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for UserIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .cloned()
            .ok_or(ApiError::Rejected(GateRejection::MissingHeader))
    }
}

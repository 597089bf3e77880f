//! API request handlers

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::routes::AppState;
use crate::config::LookupMode;
use crate::error::Error;
use crate::types::{Country, NewCountry};

// Response types

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Number of stored countries
    pub countries: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Errors

/// Error returned from handlers, rendered as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {}", self.message);
        } else {
            tracing::warn!("Request rejected ({}): {}", self.status, self.message);
        }

        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            Error::InvalidPosition(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// JSON body extractor whose rejections use [`ErrorResponse`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

// Handlers

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        countries: state.store.len().await,
    })
}

/// List all countries in insertion order
#[utoipa::path(
    get,
    path = "/countries",
    responses(
        (status = 200, description = "All countries", body = [Country])
    ),
    tag = "countries"
)]
pub async fn list_countries(State(state): State<AppState>) -> Json<Vec<Country>> {
    Json(state.store.list().await)
}

/// Get a single country
///
/// By default the path segment is a 1-based position in insertion order.
/// With `lookup = "id"` it is matched against the country id.
#[utoipa::path(
    get,
    path = "/countries/{position}",
    params(
        ("position" = i64, Path, description = "1-based position (or id, depending on lookup mode)")
    ),
    responses(
        (status = 200, description = "Country found", body = Country),
        (status = 400, description = "Path segment is not an integer", body = ErrorResponse),
        (status = 404, description = "Country not found", body = ErrorResponse)
    ),
    tag = "countries"
)]
pub async fn get_country(
    State(state): State<AppState>,
    Path(position): Path<String>,
) -> Result<Json<Country>, ApiError> {
    let position: i64 = position
        .trim()
        .parse()
        .map_err(|_| Error::InvalidPosition(position.clone()))?;

    let country = match state.lookup {
        LookupMode::Position => state.store.get_by_position(position).await?,
        LookupMode::Id => {
            let id = u64::try_from(position)
                .map_err(|_| Error::InvalidPosition(position.to_string()))?;
            state.store.get_by_id(id).await?
        }
    };

    Ok(Json(country))
}

/// Create a new country
#[utoipa::path(
    post,
    path = "/countries",
    request_body = NewCountry,
    responses(
        (status = 201, description = "Country created", body = Country),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 415, description = "Missing JSON content type", body = ErrorResponse),
        (status = 422, description = "Missing or invalid fields", body = ErrorResponse)
    ),
    tag = "countries"
)]
pub async fn create_country(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewCountry>,
) -> (StatusCode, Json<Country>) {
    let country = state.store.create(new).await;
    tracing::info!("Added country {} with id {}", country.name, country.id);
    (StatusCode::CREATED, Json(country))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

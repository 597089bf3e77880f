//! API route definitions

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, ErrorResponse, HealthResponse};
use crate::config::LookupMode;
use crate::store::CountryStore;
use crate::types::{Country, NewCountry};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Countries API",
        version = "0.1.0",
        description = "In-memory list of country records"
    ),
    tags(
        (name = "countries", description = "Country records"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::health,
        handlers::list_countries,
        handlers::get_country,
        handlers::create_country,
    ),
    components(schemas(
        Country,
        NewCountry,
        HealthResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CountryStore>,
    pub lookup: LookupMode,
}

impl AppState {
    pub fn new(store: CountryStore, lookup: LookupMode) -> Self {
        Self {
            store: Arc::new(store),
            lookup,
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    Router::new()
        // Countries
        .route(
            "/countries",
            get(handlers::list_countries).post(handlers::create_country),
        )
        .route("/countries/{position}", get(handlers::get_country))

        // Health
        .route("/health", get(handlers::health))

        // OpenAPI spec and Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi))

        .fallback(handlers::not_found)

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

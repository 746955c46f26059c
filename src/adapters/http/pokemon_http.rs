//! Pokemon HTTP Server.
//!
//! Thin axum adapter over [`PokemonService`]: each route maps one request to
//! one coordinator operation and the outcome to a status code.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::errors::DomainError;
use crate::domain::models::{PageRequest, Pokemon, PokemonPage, ServerConfig};
use crate::domain::ports::{PokemonSource, PokemonStore};
use crate::services::PokemonService;

/// Configuration for the Pokemon HTTP server.
#[derive(Debug, Clone)]
pub struct PokemonHttpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for PokemonHttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

impl From<&ServerConfig> for PokemonHttpConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared state for the Pokemon HTTP server.
struct AppState<S: PokemonStore, F: PokemonSource> {
    service: PokemonService<S, F>,
}

/// Pokemon HTTP Server.
pub struct PokemonHttpServer<S: PokemonStore + 'static, F: PokemonSource + 'static> {
    config: PokemonHttpConfig,
    service: PokemonService<S, F>,
}

impl<S: PokemonStore + 'static, F: PokemonSource + 'static> PokemonHttpServer<S, F> {
    pub fn new(service: PokemonService<S, F>, config: PokemonHttpConfig) -> Self {
        Self { config, service }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            service: self.service.clone(),
        });

        let app = Router::new()
            .route("/api/v1/pokemon", get(list_pokemon::<S, F>))
            .route("/api/v1/pokemon/", get(list_pokemon::<S, F>))
            .route("/api/v1/pokemon/{pokemon_id}", get(get_pokemon::<S, F>))
            .route("/api/v1/pokemon/search/{name}", get(search_pokemon::<S, F>))
            .route("/api/v1/pokemon/fetch/{pokemon_id}", post(fetch_pokemon::<S, F>))
            .route("/health", get(health_check))
            .with_state(state);

        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<Fut>(
        self,
        shutdown: Fut,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.router();

        tracing::info!("Pokemon HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_pokemon<S: PokemonStore + 'static, F: PokemonSource + 'static>(
    State(state): State<Arc<AppState<S, F>>>,
    Path(pokemon_id): Path<i64>,
) -> Result<Json<Pokemon>, ApiError> {
    match state.service.get_or_fetch(pokemon_id).await {
        Ok(Some(pokemon)) => Ok(Json(pokemon)),
        Ok(None) => Err(not_found(format!(
            "Pokemon with ID {pokemon_id} not found in DB or PokeAPI"
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

async fn fetch_pokemon<S: PokemonStore + 'static, F: PokemonSource + 'static>(
    State(state): State<Arc<AppState<S, F>>>,
    Path(pokemon_id): Path<i64>,
) -> Result<Json<Pokemon>, ApiError> {
    match state.service.force_fetch_and_upsert(pokemon_id).await {
        Ok(Some(pokemon)) => Ok(Json(pokemon)),
        Ok(None) => Err(not_found(format!(
            "Pokemon with ID {pokemon_id} not found in PokeAPI, or an error occurred during fetching"
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

async fn list_pokemon<S: PokemonStore + 'static, F: PokemonSource + 'static>(
    State(state): State<Arc<AppState<S, F>>>,
    Query(request): Query<PageRequest>,
) -> Result<Json<PokemonPage>, ApiError> {
    request.validate().map_err(|e| error_response(&e))?;

    match state.service.list(request.offset(), request.limit()).await {
        Ok((items, total)) => Ok(Json(PokemonPage::new(items, total, request))),
        Err(e) => Err(error_response(&e)),
    }
}

async fn search_pokemon<S: PokemonStore + 'static, F: PokemonSource + 'static>(
    State(state): State<Arc<AppState<S, F>>>,
    Path(name): Path<String>,
) -> Result<Json<Pokemon>, ApiError> {
    match state.service.search_by_name(&name).await {
        Ok(Some(pokemon)) => Ok(Json(pokemon)),
        Ok(None) => Err(not_found(format!(
            "Pokemon with name '{name}' not found in database. Try fetching it first if it exists in PokeAPI."
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

fn not_found(message: String) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message,
            code: "NOT_FOUND".to_string(),
        }),
    )
}

fn error_response(err: &DomainError) -> ApiError {
    let (status, code) = match err {
        DomainError::ValidationFailed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        _ => {
            tracing::error!(error = %err, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
}

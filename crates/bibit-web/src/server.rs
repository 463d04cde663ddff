//! Web server
//!
//! Serves the HTML form, the JSON prediction API and a health check. The
//! model handle is loaded once before the router is built and shared
//! read-only by every request.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use bibit_core::{BibitConfig, FeatureInput, RecommenderHandle};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{Result, WebError};
use crate::pages;

/// State shared across handlers
#[derive(Debug, Clone)]
pub struct WebState {
    pub config: BibitConfig,
    pub handle: RecommenderHandle,
}

impl WebState {
    /// Load the model named by `config`
    pub fn new(config: BibitConfig) -> Self {
        let handle = RecommenderHandle::from_config(&config);
        Self { config, handle }
    }

    /// Use an already loaded handle
    pub fn with_handle(config: BibitConfig, handle: RecommenderHandle) -> Self {
        Self { config, handle }
    }
}

/// Main web server
#[derive(Debug)]
pub struct WebServer {
    state: Arc<WebState>,
}

impl WebServer {
    /// Create a new server with configuration
    pub fn new(config: BibitConfig) -> Self {
        Self::from_state(WebState::new(config))
    }

    pub fn from_state(state: WebState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Get server state
    pub fn state(&self) -> Arc<WebState> {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(Self::handle_index).post(Self::handle_form))
            .route("/static/style.css", get(Self::handle_style))
            .route("/api/predict", post(Self::handle_api_predict))
            .route("/health", get(Self::handle_health))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the server
    pub async fn start(&self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;
        let router = self.build_router();

        if self.state.handle.is_ready() {
            tracing::info!("Bibit web starting on {}", addr);
        } else {
            tracing::warn!(
                "Bibit web starting on {} without a model; predictions will fail",
                addr
            );
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| WebError::Internal(e.to_string()))?;

        Ok(())
    }

    // HTTP handlers

    async fn handle_index() -> Html<&'static str> {
        Html(pages::INDEX_HTML)
    }

    async fn handle_style() -> impl IntoResponse {
        ([(header::CONTENT_TYPE, "text/css")], pages::STYLE_CSS)
    }

    async fn handle_form(
        State(state): State<Arc<WebState>>,
        Form(input): Form<FeatureInput>,
    ) -> Response {
        match state.handle.recommend(&input) {
            Ok(rec) => Html(pages::result(&rec.view())).into_response(),
            Err(e) => {
                let err = WebError::from(e);
                if err.status().is_server_error() {
                    tracing::error!("Form prediction failed: {}", err);
                }
                (err.status(), Html(pages::error(&err.to_string()))).into_response()
            }
        }
    }

    async fn handle_api_predict(
        State(state): State<Arc<WebState>>,
        Json(input): Json<FeatureInput>,
    ) -> Result<impl IntoResponse> {
        let rec = state.handle.recommend(&input)?;
        Ok(Json(rec.view()))
    }

    async fn handle_health(State(state): State<Arc<WebState>>) -> impl IntoResponse {
        let ready = state.handle.is_ready();
        let status = if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            status,
            Json(serde_json::json!({
                "status": if ready { "healthy" } else { "degraded" },
                "version": crate::VERSION,
                "model_ready": ready,
            })),
        )
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::extract::FromRef;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, TextEncoder};
use rand::Rng;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes::{category_router, questions_router, quiz_router};

/// Index source for the quiz draw. Production uses a fresh `thread_rng` draw
/// per call; tests swap in a fixed picker to pin the selection.
#[derive(Clone)]
pub struct RandomPicker(Arc<dyn Fn(usize) -> usize + Send + Sync>);

impl RandomPicker {
    pub fn uniform() -> Self {
        RandomPicker(Arc::new(|len| rand::thread_rng().gen_range(0..len)))
    }

    pub fn fixed(index: usize) -> Self {
        RandomPicker(Arc::new(move |len| index.min(len - 1)))
    }

    /// `len` must be non-zero.
    pub fn pick(&self, len: usize) -> usize {
        (self.0)(len)
    }
}

#[derive(FromRef, Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub picker: RandomPicker,
}

impl AppState {
    pub fn new(pool: SqlitePool, picker: RandomPicker) -> Self {
        AppState { pool, picker }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quiz_router(state))
        .fallback(|| async { ApiError::NotFound })
        .layer(map_response(render_method_not_allowed))
        // the original backend stamped these two on every response in an
        // after-request hook, not only on preflights
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type,Authorization,true"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,PUT,POST,PATCH,DELETE,OPTIONS"),
        ))
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
}

// axum answers a matched path with a bare 405 when the method has no handler;
// rewrite it into the JSON envelope
async fn render_method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        ApiError::MethodNotAllowed.into_response()
    } else {
        response
    }
}

pub async fn run_server(pool: SqlitePool) -> anyhow::Result<()> {
    let addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    let state = AppState::new(pool, RandomPicker::uniform());
    let app = app(state);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder.encode(&metrics, &mut buf).unwrap();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(buf))
        .unwrap()
}

//! # Colloquy Server
//!
//! JSON over HTTP plus a server-sent events stream of the scheduled dialogue.
//!
//! | Method | Path            | Body                 |
//! |--------|-----------------|----------------------|
//! | POST   | `/ask`          | `{speaker, input}`   |
//! | POST   | `/askBoth`      | `{input}`            |
//! | GET    | `/brain/:agent` |                      |
//! | POST   | `/learn`        | `{speaker, phrase}`  |
//! | POST   | `/start`        |                      |
//! | POST   | `/stop`         |                      |
//! | GET    | `/status`       |                      |
//! | GET    | `/events`       | SSE `{speaker, text, ts}` |

pub mod config;
pub mod error;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use colloquy_core::Colloquy;
use config::LogFormat;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub use config::{Cli, ServerConfig};
pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// The engine behind every route
    pub engine: Arc<Colloquy>,
}

impl AppState {
    /// Wrap an engine
    pub fn new(engine: Arc<Colloquy>) -> Self {
        Self { engine }
    }
}

/// Build the router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(routes::ask))
        .route("/askBoth", post(routes::ask_both))
        .route("/brain/:agent", get(routes::brain_line))
        .route("/learn", post(routes::learn))
        .route("/start", post(routes::start))
        .route("/stop", post(routes::stop))
        .route("/status", get(routes::status))
        .route("/events", get(routes::events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the default `colloquy=info,tower_http=info` filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("colloquy=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Plain => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

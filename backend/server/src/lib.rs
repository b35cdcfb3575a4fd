//! Documentation of the Nootropic Nexus catalog API.
//!
//!
//!
//! # General Infrastructure
//! - Single axum server, JSON in and out, everything under `/api`
//! - MongoDB holds two collections, `nootropics` and `stacks`
//! - Every request reads and writes the database directly, nothing cached in between
//! - Frontend talks to the server only, never to MongoDB
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/nootropics` | 200, list | |
//! | GET | `/api/nootropics/:name` | 200 | 404 |
//! | POST | `/api/nootropics` | 201 | 400 duplicate name or missing field |
//! | GET | `/api/stacks` | 200, list, components resolved | |
//! | GET | `/api/stacks/:id` | 200, resolved | 404 |
//! | POST | `/api/stacks` | 201, resolved | 400 unknown component |
//! | PUT | `/api/stacks/:id` | 200, resolved | 400 / 404 |
//! | POST | `/api/stacks/:id/rate` | 200, resolved | 400 rating outside 1-5 / 404 |
//!
//! Errors are `{"message": "..."}`. 500s carry a generic message, details go to the log.
//!
//!
//!
//! # Notes
//!
//! ## Ratings
//! Rating is read, append, replace. Two simultaneous ratings on one stack can lose one of them.
//! Acceptable for community scores, and the average is always recomputed from the stored list so
//! it never drifts from the ratings that did land.
//!
//! ## References
//! Stack components point at nootropics by `_id`. Checked on write, looked up on read. Nothing
//! deletes nootropics through the API; a reseed or import can, and the affected components then
//! come back as `null`.
//!
//!
//!
//! # Setup
//!
//! Environment (or `.env`):
//! - `RUST_PORT`, default `5000`
//! - `MONGODB_URI`, default `mongodb://localhost:27017`, also read from `/run/secrets/MONGODB_URI`
//! - `MONGODB_DB`, default `nootropic-nexus`
//! - `RUST_LOG`, e.g. `info` or `server=debug,tower_http=debug`
//!
//! Run the server.
//! ```sh
//! cargo run -p nexus
//! ```
//!
//! Reseed before serving.
//! ```sh
//! cargo run -p nexus --features seed
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use error::StartupError;
use routes::{
    create_nootropic_handler, create_stack_handler, get_nootropic_handler, get_stack_handler,
    list_nootropics_handler, list_stacks_handler, rate_stack_handler, root_handler,
    update_stack_handler,
};
use state::AppState;

/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route(
            "/nootropics",
            get(list_nootropics_handler).post(create_nootropic_handler),
        )
        .route("/nootropics/:name", get(get_nootropic_handler))
        .route("/stacks", get(list_stacks_handler).post(create_stack_handler))
        .route("/stacks/:id", get(get_stack_handler).put(update_stack_handler))
        .route("/stacks/:id/rate", post(rate_stack_handler));

    Router::new()
        .route("/", get(root_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), StartupError> {
    init_tracing();

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

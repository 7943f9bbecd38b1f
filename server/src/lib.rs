//! # Pacer
//!
//! Backend for the marathon log's location map.
//!
//! # General Infrastructure
//! - The events collaborator (the CRUD backend) owns the race records; we
//!   pull a read-only snapshot on startup and refresh it on an interval
//! - The map frontend talks only to this service: aggregated counts, event
//!   lists per region, and boundary geometry
//! - Geometry goes through us instead of the browser hitting the geometry
//!   source directly, which sidesteps cross-origin restrictions and lets
//!   one in-memory cache serve every client
//!
//! # Endpoints
//! - `GET /api/map/regions?level=country|province[&province=..][&event_type=..]`
//! - `GET /api/map/events?region=..[&province=..][&event_type=..]`
//! - `GET /api/geo?code=<6-digit admin code or 100000>`
//!
//! # Environment
//! - `RUST_PORT`: listen port, default 1111
//! - `EVENTS_URL`: events collaborator endpoint
//! - `GEO_BASE_URL`: upstream geometry source
//! - `EVENTS_REFRESH_SECS`: snapshot refresh period, 0 disables
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod events;
pub mod routes;
pub mod state;

use routes::{geometry_handler, region_events_handler, regions_handler};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    tokio::spawn(events::refresh_loop(state.clone()));

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/api/map/regions", get(regions_handler))
        .route("/api/map/events", get(region_events_handler))
        .route("/api/geo", get(geometry_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

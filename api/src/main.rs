//! RuralHub API Server
//!
//! Registry of rural producers, their farms, harvests and planted crops,
//! with an aggregated dashboard over all registered farms.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{ensure_schema, seed_demo_data, PostgresProducerRepository};
use app::{DashboardService, ProducerService};
use config::Config;
use domain::ports::ProducerRepository;

/// Application state shared across all handlers
pub struct AppState<R: ProducerRepository> {
    pub producer_service: Arc<ProducerService<R>>,
    pub dashboard_service: Arc<DashboardService<R>>,
}

// Derived Clone would require R: Clone
impl<R: ProducerRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            producer_service: self.producer_service.clone(),
            dashboard_service: self.dashboard_service.clone(),
        }
    }
}

impl<R: ProducerRepository> AppState<R> {
    pub fn new(producer_repo: Arc<R>) -> Self {
        Self {
            producer_service: Arc::new(ProducerService::new(producer_repo.clone())),
            dashboard_service: Arc::new(DashboardService::new(producer_repo)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the API routes over any producer repository
pub fn router<R: ProducerRepository + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/producers",
            get(handlers::list_producers::<R>).post(handlers::create_producer::<R>),
        )
        // Static segment wins over the :id capture
        .route("/producers/dashboard", get(handlers::get_dashboard::<R>))
        .route(
            "/producers/:id",
            get(handlers::get_producer::<R>)
                .put(handlers::update_producer::<R>)
                .delete(handlers::delete_producer::<R>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ruralhub_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RuralHub API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.auto_migrate {
        ensure_schema(&db)
            .await
            .context("Failed to create database schema")?;
        tracing::info!("Database schema ready");
    }

    if config.seed_demo_data {
        tracing::warn!("SEED_DEMO_DATA is set, replacing stored producers");
        seed_demo_data(&db)
            .await
            .context("Failed to seed demo data")?;
    }

    // Create adapters and services
    let producer_repo = Arc::new(PostgresProducerRepository::new(db));
    let state = AppState::new(producer_repo);

    // Uses PeerIpKeyExtractor to get client IP from socket connection
    // (SmartIpKeyExtractor requires X-Forwarded-For headers from reverse proxy)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .context("Invalid rate limit configuration")?,
    );

    let mut app = router(state).layer(GovernorLayer {
        config: governor_config,
    });

    if config.cors_allow_any {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

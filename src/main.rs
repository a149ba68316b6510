// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gateway Service
//!
//! The contact-form backend of a personal portfolio site: a single
//! `POST /api/contact` endpoint that throttles repeated submissions per
//! originating client and relays admitted submissions to the site
//! owner's mailbox over SMTP.
//!
//! - 2 submissions per client per rolling hour (fixed policy)
//! - Clients without a forwarded-for address share one bucket
//! - One delivery attempt per submission, bounded by a timeout
//! - Uniform failure response; causes are logged server-side only
//!
//! ## Configuration
//!
//! Deployment values are loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `SMTP_HOST`: SMTP relay host (default: 127.0.0.1)
//! - `SMTP_PORT`: SMTP relay port (default: 587)
//! - `MAIL_ACCOUNT`: Submission account, also the destination mailbox
//! - `OWNER_MAILBOX`: Destination override (default: `MAIL_ACCOUNT`)
//! - `MAIL_APP_PASSWORD`: Application credential for AUTH
//! - `SMTP_TIMEOUT_SECS`: Per-attempt delivery timeout (default: 30)
//!
//! Throttle policy is not configurable; see `config::ThrottleConfig`.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gateway::{
    config::{Config, MailConfig},
    handlers::{health, submit, AppState},
    mailer::Mailer,
    metrics::metrics_handler,
    throttle::SubmissionThrottle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        relay = %config.mail.relay_addr(),
        owner_mailbox = %config.mail.owner_mailbox,
        max_submissions = config.throttle.max_submissions,
        window_secs = config.throttle.window_secs,
        "Starting contact gateway"
    );

    // Create application state
    let throttle = SubmissionThrottle::new(config.throttle.clone());
    let mailer = Mailer::new(config.mail.clone());

    let state = Arc::new(AppState {
        throttle,
        mailer,
        config: config.clone(),
    });

    // Spawn sweep task for expired throttle records
    let sweep_state = state.clone();
    let sweep_interval = config.throttle.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            sweep_state.throttle.sweep().await;
        }
    });

    // Build router
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(submit));
    if config.metrics.enabled {
        app = app.route(&config.metrics.path, get(metrics_handler));
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables. Throttle policy is
/// deliberately not read from the environment.
fn load_config() -> Config {
    let account = std::env::var("MAIL_ACCOUNT").unwrap_or_default();
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        mail: MailConfig {
            relay_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            relay_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            owner_mailbox: std::env::var("OWNER_MAILBOX").unwrap_or_else(|_| account.clone()),
            account,
            credential: std::env::var("MAIL_APP_PASSWORD").unwrap_or_default(),
            timeout_secs: std::env::var("SMTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            ..Default::default()
        },
        ..Default::default()
    }
}

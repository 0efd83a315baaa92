use std::{future::IntoFuture, net::SocketAddr, sync::Arc};

use anyhow::{Context, anyhow};
use axum::{Json, Router, http::StatusCode, middleware::from_fn_with_state, routing::post};
use chrono::Duration;
use clap::Parser;
use lockout_axum::{LockoutState, LoginIdentity, admin_router, login_guard};
use lockout_core::{LockoutTracker, SystemClock};
use serde::Deserialize;
use serde_json::json;
use tokio::{net::TcpListener, sync::watch};
use tracing_subscriber::EnvFilter;

/// Demo banking login server protected by the lockout tracker
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address for the public API
    #[arg(long, env = "BANK_LISTEN", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Address for the internal admin API
    #[arg(long, env = "BANK_ADMIN_LISTEN", default_value = "127.0.0.1:3001")]
    admin_listen: SocketAddr,

    /// Failed logins before an identity is locked
    #[arg(long, env = "LOCKOUT_MAX_ATTEMPTS", default_value_t = 5)]
    max_attempts: u32,

    /// Lock duration in minutes
    #[arg(long, env = "LOCKOUT_DURATION_MINUTES", default_value_t = 15)]
    lock_minutes: i64,

    /// Attempt window in minutes
    #[arg(long, env = "LOCKOUT_WINDOW_MINUTES", default_value_t = 60)]
    window_minutes: i64,

    /// Reclamation sweep interval in seconds
    #[arg(long, env = "LOCKOUT_SWEEP_SECONDS", default_value_t = 300)]
    sweep_seconds: i64,

    /// Disable lockout protection entirely
    #[arg(long, env = "LOCKOUT_DISABLED")]
    disabled: bool,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

// Stand-in for the real credential check
const DEMO_EMAIL: &str = "demo@bank.com";
const DEMO_PASSWORD: &str = "correct-horse-battery-staple";

async fn login_handler(
    LoginIdentity(identity): LoginIdentity,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let valid = request.email.trim().eq_ignore_ascii_case(DEMO_EMAIL)
        && request.password == DEMO_PASSWORD;

    if valid {
        tracing::info!(identity = ?identity, "Login succeeded");
        (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Logged in" })),
        )
    } else {
        tracing::info!(identity = ?identity, "Login failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "Invalid credentials" })),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let tracker = LockoutTracker::builder()
        .enabled(!cli.disabled)
        .with_max_attempts(cli.max_attempts)
        .with_lock_duration(
            Duration::try_minutes(cli.lock_minutes).ok_or_else(|| anyhow!("lock duration too large"))?,
        )
        .with_attempt_window(
            Duration::try_minutes(cli.window_minutes)
                .ok_or_else(|| anyhow!("attempt window too large"))?,
        )
        .with_sweep_interval(
            Duration::try_seconds(cli.sweep_seconds)
                .ok_or_else(|| anyhow!("sweep interval too large"))?,
        )
        .build()
        .context("invalid lockout configuration")?;
    let tracker = Arc::new(tracker);
    let state = LockoutState::new(tracker.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tracker.clone().spawn_sweeper(shutdown_rx.clone());

    let app = Router::new()
        .route("/auth/login", post(login_handler))
        .layer(from_fn_with_state(state.clone(), login_guard::<SystemClock>));
    let admin = Router::new().nest("/admin", admin_router(state));

    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    let admin_listener = TcpListener::bind(cli.admin_listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.admin_listen))?;

    tracing::info!(
        listen = %cli.listen,
        admin_listen = %cli.admin_listen,
        max_attempts = cli.max_attempts,
        "Bank login demo running"
    );

    let public = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for(shutdown_rx.clone()))
        .into_future();
    let internal = axum::serve(admin_listener, admin)
        .with_graceful_shutdown(wait_for(shutdown_rx))
        .into_future();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        let _ = shutdown_tx.send(true);
    });

    let (public, internal) = tokio::join!(public, internal);
    public.context("public server failed")?;
    internal.context("admin server failed")?;

    sweeper.await.context("sweep task panicked")?;
    tracing::info!("Shut down cleanly");

    Ok(())
}

async fn wait_for(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.changed().await;
}

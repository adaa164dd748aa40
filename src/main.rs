//! Application entry point for the `irrigation-dashboard` service.
//!
//! Startup sequence:
//! - Load configuration from environment variables or `.env`
//! - Initialize structured logging/tracing
//! - Build the station and alert collaborators (built-in mocks or `STATIONS_FILE`)
//! - Start the session reaper
//! - Bind the Axum HTTP server and serve until Ctrl-C, then unmount every
//!   live page session
//!
//! # Environment Variables
//! - `DASHBOARD_PORT` (optional) – listen port (default: 8080)
//! - `STATIONS_FILE` (optional) – JSON fixture with `stations` and `alerts`
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
//! - `FORCE_COLOR` (optional) – override TTY color detection
//!
//! See `config.rs` for the timer and session settings.
use std::{env, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use irrigation_dashboard::{app, config, AppState, MockFeed};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let feed = match &cfg.stations_file {
        Some(path) => Arc::new(MockFeed::from_file(path)?),
        None => Arc::new(MockFeed::sample()),
    };

    let port = cfg.port;
    let state = AppState::new(cfg, feed.clone(), feed);
    let sessions = state.sessions.clone();
    let _reaper = sessions.spawn_reaper();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let dropped = sessions.unmount_all();
    tracing::info!("Shut down; unmounted {} live page session(s)", dropped);

    Ok(())
}

async fn shutdown_signal() {
    // ---
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, shutting down");
}

// ---

/// Initialize the global tracing subscriber.
///
/// - Color output: `FORCE_COLOR=1|true|yes` forces it on, `0|false|no`
///   forces it off, anything else auto-detects a TTY on stdout.
/// - Span events: `AXUM_SPAN_EVENTS=full` emits ENTER, EXIT and CLOSE;
///   `enter_exit` emits ENTER and EXIT; default is CLOSE only.
/// - Level: `RUST_LOG` when set, otherwise `AXUM_LOG_LEVEL` (default `debug`).
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},hyper=info"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}

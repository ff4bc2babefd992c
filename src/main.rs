use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sushidare::{app, bank::QuestionBank, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sushidare=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sushi Dare...");

    let config = AppConfig::from_env();

    let bank = match &config.questions_path {
        Some(path) => {
            tracing::info!("Loading questions from {}", path.display());
            QuestionBank::from_path(path)
        }
        None => QuestionBank::builtin(),
    };
    let bank = match bank {
        Ok(bank) => Arc::new(bank),
        Err(e) => {
            tracing::error!("Cannot start without a question catalog: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::spawn(bank, config.game.clone()));
    let app = app::build_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

//! Humor interpreter gateway: one page, session-scoped history, one outbound call per submit.

mod app;
mod render;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use humor_core::{GenerationSettings, Interpreter, InterpreterConfig, OpenAiClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppState;

#[tokio::main]
async fn main() {
    // .env may carry the fallback credential; the process environment still applies without it.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[humor-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match InterpreterConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let env_credential = config.env_credential();
    if env_credential.as_deref().map_or(true, |k| k.trim().is_empty()) {
        tracing::warn!(
            var = %config.credential_env_var,
            "no fallback credential in environment; users must enter a key in the sidebar"
        );
    }

    let client = OpenAiClient::from_config(&config);
    tracing::info!(
        version = humor_core::version(),
        model = %client.model(),
        api_base = %config.api_base,
        "generation client ready"
    );
    let interpreter = Interpreter::new(Arc::new(client), GenerationSettings::from(&config));
    let idle_ttl = Duration::from_secs(config.session_idle_secs);
    let state = Arc::new(
        AppState::new(interpreter, env_credential)
            .with_session_idle(idle_ttl)
            .with_credential_env_var(config.credential_env_var.clone()),
    );
    spawn_session_pruner(Arc::clone(&state), idle_ttl);
    let app = app::router(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "bind failed");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %config.bind_addr, "humor interpreter listening");

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}

/// Evict idle sessions on a timer so the registry stays bounded even when no new sessions
/// are being created.
fn spawn_session_pruner(state: Arc<AppState>, idle_ttl: Duration) {
    let period = (idle_ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            state.sessions.prune_idle();
        }
    });
}

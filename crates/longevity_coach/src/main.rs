use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::info;

use fitbit_client::http_client::ReqwestFitbitClient;
use longevity_coach::{AppState, InsightClient, ProfileStore, build_router};

/// Resolve the bind address from an optional env value, falling back to the
/// loopback default.
fn resolve_addr(raw: Option<String>) -> SocketAddr {
    raw.and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Configure logging from env var `COACH_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("COACH_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(log_env.clone())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!(%log_env, "longevity_coach: log filter");

    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    let config = match fitbit_client::config::Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "missing upstream credentials; aborting startup");
            std::process::exit(1);
        }
    };
    let client = Arc::new(ReqwestFitbitClient::new(
        &config.base_url,
        config.access_token,
    ));

    let insight_endpoint = std::env::var("COACH_INSIGHT_URL").ok();
    if insight_endpoint.is_none() {
        tracing::warn!(
            "COACH_INSIGHT_URL not set; insight and chat replies will use the fallback text"
        );
    }
    let insight = InsightClient::new(insight_endpoint);

    let profile_path =
        std::env::var("COACH_PROFILE_PATH").unwrap_or_else(|_| "profile.json".to_string());
    let store = ProfileStore::open(&profile_path);

    let state = Arc::new(AppState::new(client, insight, store, handle));
    let app = build_router(state);

    let addr = resolve_addr(std::env::var("ADDRESS").ok());
    info!(%addr, profile_path, "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service());
    if let Err(e) = server
        .with_graceful_shutdown(async {
            signal::ctrl_c()
                .await
                .expect("failed to install ctrl+c handler");
        })
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_addr_falls_back_to_loopback() {
        let addr = resolve_addr(None);
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        let addr = resolve_addr(Some("nonsense".into()));
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
    }

    #[test]
    fn resolve_addr_parses_explicit_values() {
        let addr = resolve_addr(Some("0.0.0.0:8080".into()));
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }
}

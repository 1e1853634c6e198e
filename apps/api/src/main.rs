use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::{bail, Context};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use shared_config::{AppConfig, StoreBackend};
use shared_database::{AppState, ClinicStore, InMemoryClinicStore, SupabaseClinicStore};

fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ClinicStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory clinic store");
            Ok(Arc::new(InMemoryClinicStore::new()))
        }
        StoreBackend::Supabase => {
            if !config.is_configured() {
                bail!("STORE_BACKEND=supabase requires SUPABASE_URL and SUPABASE_ANON_PUBLIC_KEY");
            }
            info!("Using Supabase clinic store at {}", config.supabase_url);
            Ok(Arc::new(SupabaseClinicStore::new(config)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic booking API server");

    let config = AppConfig::from_env();
    let store = build_store(&config)?;
    let port = config.server_port;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(AppState::new(config, store));

    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

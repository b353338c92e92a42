use standin::{build_router, AppConfig, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "standin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting StandIn meeting-room service");

    let config = AppConfig::from_env().expect("Invalid STANDIN_* configuration");
    let bind_addr = config.bind_addr.clone();
    info!(
        backend = %config.backend_base_url,
        presentation_topic = %config.presentation_topic,
        agent_ready_timeout_secs = config.agent_ready_timeout.as_secs(),
        "Configuration loaded"
    );

    let app = build_router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await.unwrap();
}

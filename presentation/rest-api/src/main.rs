use dotenvy::dotenv;

mod api;
mod config;
mod setup;

use config::{app_config::AppConfig, firebase_config};
use setup::{dependency_injection::DependencyContainer, server::Server};

/// REST API Entry Point
///
/// Startup runs once and in order; any configuration or initialization
/// failure aborts it before the listener is bound.
/// - config/: Application configuration (server, CORS, admin, Firebase)
/// - setup/: Dependency injection, route table and server setup
/// - api/: Route handlers and DTOs
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 2. Load environment variables
    dotenv().ok();

    // 3. Load configuration
    let config = AppConfig::from_env();

    // 4. Initialize Firebase
    let firebase = firebase_config::init_firebase()?;

    // 5. Wire dependencies
    let container = DependencyContainer::new(firebase.clone(), &config.admin);

    // 6. Run server
    let served = Server::run(config, container).await;

    // 7. Release the Firebase client
    firebase.close();

    served
}

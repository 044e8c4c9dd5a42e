use poem::{EndpointExt, Server as PoemServer, listener::TcpListener, middleware::Tracing};
use tracing::info;

use crate::config::app_config::AppConfig;
use crate::setup::{dependency_injection::DependencyContainer, route_table::RouteTable};

pub struct Server;

impl Server {
    /// Serves until Ctrl-C, then lets in-flight requests finish.
    pub async fn run(config: AppConfig, container: DependencyContainer) -> anyhow::Result<()> {
        let addr = config.server.bind_address();
        let table = RouteTable::standard(&config.admin.path_prefix);
        let app = table.into_route(container).with(config.cors).with(Tracing);

        info!("Server running at http://{}", addr);
        info!("Swagger UI at http://{}/docs", addr);

        PoemServer::new(TcpListener::bind(&addr))
            .run_with_graceful_shutdown(
                app,
                async {
                    let _ = tokio::signal::ctrl_c().await;
                    info!("Shutdown signal received");
                },
                None,
            )
            .await?;
        Ok(())
    }
}

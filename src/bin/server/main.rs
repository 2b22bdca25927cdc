use fleet::config::Config;
use fleet::domain::device::service::Service;
use fleet::inbound::http::{HttpServer, HttpServerConfig};
use fleet::outbound::memory::InMemory;
use fleet::outbound::sqlite::Sqlite;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt::init();

    let server_config = HttpServerConfig {
        port: &config.server_port,
    };

    if config.uses_in_memory_store() {
        tracing::warn!("using the in-memory device store, data is lost on shutdown");
        let device_service = Service::new(InMemory::default());
        HttpServer::new(device_service, server_config)
            .await?
            .run()
            .await
    } else {
        let sqlite = Sqlite::new(&config.database_url).await?;
        let device_service = Service::new(sqlite);
        HttpServer::new(device_service, server_config)
            .await?
            .run()
            .await
    }
}

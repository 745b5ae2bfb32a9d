use mongosnap::config::Config;
use mongosnap::{create_app, create_app_state, server_info, server_info_with_fields};
use std::error::Error;

pub async fn execute(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn Error>> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    // Bucket and targets are validated per request.
    if config.bucket.is_none() {
        tracing::warn!("GCS_BUCKET is not set; backup requests will fail until it is");
    }
    if config.mongo_list.is_none() && config.mongo_list_file.is_none() {
        tracing::warn!("Neither MONGO_LIST nor MONGO_LIST_FILE is set");
    }

    let addr = format!("{}:{}", config.host, config.port);
    server_info_with_fields!(storage = config.storage_backend.as_str(); "Starting mongosnap");
    let app_state = create_app_state(config).await?;
    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    server_info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

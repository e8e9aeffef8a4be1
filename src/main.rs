use dotenvy::dotenv;
use snafu::ResultExt as _;

use stats_server::api::{create_app, create_router};
use stats_server::config;
use stats_server::database::Database;
use stats_server::error::{
    ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, WebServerSnafu,
};
use stats_server::logger;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = config::load()?;

    let _guard = logger::init(&config)?;

    let database = Database::connect(&config.database)
        .await
        .context(ConnectDatabaseSnafu)?;
    let router = create_router(create_app(database));

    let listener = tokio::net::TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!(address = %config.host, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown())
        .await
        .context(WebServerSnafu)
}

async fn shutdown() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for ctrl-c, shutting down");
    }
    tracing::info!("shutting down");
}

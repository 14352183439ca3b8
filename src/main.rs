use tpcc_console::database::client;
use tpcc_console::server;
use tpcc_console::util::logging;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_file_path = logging::init()?;

    info!("Starting TPC-C Console");
    info!("Logs are being written to: {}", log_file_path);

    info!("Connecting to database...");
    client::init_db().await?;
    info!("Database connection pool ready");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::run_server().await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    info!("Press Ctrl+C to shutdown");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    server_handle.abort();
    Ok(())
}

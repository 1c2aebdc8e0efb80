use clap::Parser;
use tcp_dump_server::{run, Cli, ServerConfig};
use tracing::error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();

    let config = ServerConfig::from(Cli::parse());
    if let Err(error) = run(config).await {
        error!(%error, "server stopped");
        std::process::exit(error.exit_code());
    }
    Ok(())
}

mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use roombook_api::create_app;
use roombook_core::{
    bootstrap::{load_config, ConnectivityProber},
    logging,
};

#[derive(Parser, Debug)]
#[command(name = "roombook")]
#[command(about = "Roombook room reservation server", long_about = None)]
struct Args {
    /// Config file (YAML or TOML)
    #[arg(long, short, env = "ROOMBOOK_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Serve the HTTP API (default)
    #[default]
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load and validate configuration
    let config = load_config(args.config.as_deref())?;

    // 2. Initialize logging
    let log_control = logging::init_logging(&config.logging, config.server.debug)?;
    info!("Roombook starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Assemble the application (datastore probe, fallback, extensions, routes)
    let prober = ConnectivityProber::from_config(&config);
    let app = create_app(config, &prober, &log_control).await?;

    match args.command.unwrap_or_default() {
        Command::Migrate => {
            app.extensions().migrations.run().await?;
            app.extensions().database.close().await;
            Ok(())
        }
        Command::Serve => {
            if app.config().database.auto_migrate {
                app.extensions().migrations.run().await?;
            }
            server::serve(app).await
        }
    }
}

use clap::{Parser, Subcommand};
use tracing::info;

use lockbox::{
    api::{build_router, start_api_server},
    observability::{self, init_tracing},
    startup::build_context,
    AppConfig, Result, APP_NAME, VERSION,
};

#[derive(Parser)]
#[command(name = "lockbox", version, about = "Capability-scoped secret store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API with the periodic expiry sweeper
    Serve,
    /// Run one expiry sweep and exit (cron entry point)
    Expire,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; must happen before config is read.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    observability::log_config_info(&config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Expire => expire(config).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    info!(app_name = APP_NAME, version = VERSION, "Starting Lockbox secret store");

    let context = build_context(&config).await?;

    let sweeper = (*context.sweeper).clone();
    let interval = config.sweeper.interval();
    tokio::spawn(async move {
        sweeper.run(interval).await;
    });

    let router = build_router(context.state, context.registry);
    start_api_server(&config.server, router).await
}

async fn expire(config: AppConfig) -> Result<()> {
    let context = build_context(&config).await?;
    let purged = context.sweeper.run_once().await?;
    info!(purged, "Expiry sweep finished");
    Ok(())
}

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tinypaste::commands;
use tinypaste::config::Config;
use tinypaste::db::Database;
use tinypaste::App;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, env = "TINYPASTE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, env = "HOST")]
    host: Option<IpAddr>,

    /// Port to listen on.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Database connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Run the HTTP server (the default).
    Serve,
    /// Create the database schema and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tinypaste=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    let database = Database::connect(&config.database.url, config.database.max_connections)
        .await
        .context("failed to connect to database")?;
    let app = App::new(config, database);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve::run(app).await,
        Command::Migrate => commands::migrate::run(app).await,
    }
}

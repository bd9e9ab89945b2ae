// CLI tool for tontines on Aptos
//
// Reads tontine state from a fullnode and the membership index, shows which
// actions the given account may take, and prints entry function payloads for
// an external wallet to sign.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tontine_sdk::{ClientConfig, Network};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tontine")]
#[command(about = "Tontine client CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults plus environment otherwise)
    #[arg(long, short)]
    config: Option<String>,

    /// Named network to use
    #[arg(long)]
    network: Option<Network>,

    /// Fullnode URL, overrides the named network
    #[arg(long)]
    node_url: Option<String>,

    /// Log level (RUST_LOG wins when set)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a tontine: configuration, members and available actions
    Show(commands::show::ShowCmd),

    /// List the tontines an account created, joined or was invited to
    List(commands::list::ListCmd),

    /// Resolve a page URL's tontine selection against an account's memberships
    Open(commands::open::OpenCmd),

    /// Print the entry function payload for an action, if it is available
    Payload(commands::payload::PayloadCmd),

    /// Poll a tontine and print its state on every refresh
    Watch(commands::watch::WatchCmd),

    /// Write a config file with default values
    InitConfig(commands::init_config::InitConfigCmd),
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => ClientConfig::from_env().context("Invalid configuration")?,
    };

    if let Some(network) = cli.network {
        config.network.name = network;
    }
    if let Some(node_url) = &cli.node_url {
        config.network.node_url = Some(node_url.clone());
    }
    if let Some(level) = &cli.log_level {
        config.monitoring.log_level = level.clone();
    }
    config.validate_all().context("Invalid configuration")?;

    Ok(config)
}

fn init_logging(config: &ClientConfig) -> Result<()> {
    let level = &config.monitoring.log_level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("tontine={0},tontine_sdk={0},tontine_core={0}", level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.monitoring.structured_logging {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // init-config must work without a valid config
    if let Commands::InitConfig(cmd) = &cli.command {
        return commands::init_config::execute(cmd);
    }

    let config = load_config(&cli)?;
    init_logging(&config)?;

    // Execute command
    match cli.command {
        Commands::Show(cmd) => commands::show::execute(cmd, &config).await,
        Commands::List(cmd) => commands::list::execute(cmd, &config).await,
        Commands::Open(cmd) => commands::open::execute(cmd, &config).await,
        Commands::Payload(cmd) => commands::payload::execute(cmd, &config).await,
        Commands::Watch(cmd) => commands::watch::execute(cmd, &config).await,
        Commands::InitConfig(_) => Ok(()),
    }
}

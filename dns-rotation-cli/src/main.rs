//! DNS rotation CLI
//!
//! Lists servers and cluster records, and adds or removes one server's IP in
//! its cluster's A record. Configuration comes from the environment
//! (`SECRET_KEY`, `DNS_ZONE_DOMAIN`, `CLOUDFLARE_API_TOKEN`, ...). Logs go to
//! stderr; stdout carries only command output.
//!
//! With `--memory` every invocation starts from the same seeded in-memory
//! zone, so a rotation is visible only in that invocation's own output.

mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dns_rotation_app::config::ENV_PROVIDER;
use dns_rotation_app::{AppConfig, AppState, AppStateBuilder, RotationAction};
use dns_rotation_core::ServerId;
use output::{OutputFormat, RecordRow, ServerRow, print_output};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dns-rotation")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    output: OutputFormat,

    /// Use an in-memory zone instead of the configured provider. The first
    /// server of each cluster starts published; changes last for this run only.
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Servers and the record each one is published in
    Servers,
    /// Cluster records and the servers behind them
    Dns,
    /// Add a server's IP to its cluster record
    Add { server_id: ServerId },
    /// Remove a server's IP from its cluster record
    Remove { server_id: ServerId },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let memory = cli.memory;
    let config = AppConfig::from_lookup(|key| {
        if memory && key == ENV_PROVIDER {
            Some("memory".to_string())
        } else {
            std::env::var(key).ok()
        }
    })?;
    tracing::debug!(?config, "Configuration loaded");

    let state = AppStateBuilder::from_config(&config)?.build().await?;

    match cli.command {
        Commands::Servers => {
            let servers = state.refresh_servers().await?;
            let rows: Vec<ServerRow> = servers.iter().map(ServerRow::from).collect();
            print_output(&servers, &rows, cli.output)
        }
        Commands::Dns => {
            let records = state.dns_view().await?;
            let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
            print_output(&records, &rows, cli.output)
        }
        Commands::Add { server_id } => {
            rotate(&state, server_id, RotationAction::Add, cli.output).await
        }
        Commands::Remove { server_id } => {
            rotate(&state, server_id, RotationAction::Remove, cli.output).await
        }
    }
}

async fn rotate(
    state: &AppState,
    server_id: ServerId,
    action: RotationAction,
    format: OutputFormat,
) -> Result<()> {
    let outcome = state.rotate(server_id, action).await?;
    match format {
        OutputFormat::Table => println!("{}", outcome.message),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["dns-rotation", "add", "3", "--memory", "-o", "json"])
            .unwrap();
        assert!(cli.memory);
        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Add { server_id: 3 }));
    }

    #[test]
    fn server_id_must_be_numeric() {
        assert!(Cli::try_parse_from(["dns-rotation", "remove", "hk-1"]).is_err());
    }
}

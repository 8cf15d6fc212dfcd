use std::process;

use azdo_mcp::{CredentialStore, McpServer, ServerConfig};
use azdo_mcp_cli::cli::{Cli, Commands};
use azdo_mcp_cli::error::{handle_cli_result, CliError, CliResult, IntoCliResult};
use azdo_mcp_cli::exit_codes::EXIT_WARNING;
use azdo_mcp_cli::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let command = cli.selected_command();
    let config = build_config(&cli);

    let level = logging::level_for(cli.quiet, cli.debug, cli.verbose);
    match command {
        Commands::Serve => logging::init(level, Some(&config.log_file_path())),
        _ => logging::init(level, None),
    }

    let exit_code = match command {
        Commands::Serve => {
            tracing::info!("Starting MCP server");
            handle_cli_result(run_server(config).await)
        }
        Commands::Orgs { json } => handle_cli_result(run_orgs(&config, json).await),
        Commands::Check => handle_cli_result(run_check(&config).await),
    };

    process::exit(exit_code);
}

/// Defaults and environment, then command-line overrides
fn build_config(cli: &Cli) -> ServerConfig {
    let mut config = ServerConfig::new();
    if let Some(path) = &cli.config {
        config = config.with_credentials_path(path);
    }
    if let Some(host) = &cli.service_host {
        config = config.with_service_host(host);
    }
    config
}

async fn run_server(config: ServerConfig) -> CliResult<()> {
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;
    use tokio_util::sync::CancellationToken;

    if Cli::is_tty() {
        eprintln!(
            "azdo-mcp speaks MCP on stdin/stdout; logs go to {}",
            config.log_file_path().display()
        );
    }

    let server = McpServer::from_config(&config).await;

    let ct = CancellationToken::new();
    let ct_clone = ct.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::warn!("Failed to listen for ctrl+c: {}", e),
        }
        ct_clone.cancel();
    });

    let running = match serve_server(server, stdio()).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!("MCP server error: {}", e);
            return Err(CliError::new(format!("MCP server error: {e}"), EXIT_WARNING));
        }
    };
    tracing::info!("MCP server started successfully");

    tokio::select! {
        result = running.waiting() => {
            let quit_reason = result.cli_error(EXIT_WARNING)?;
            tracing::info!("MCP server shut down: {:?}", quit_reason);
        }
        _ = ct.cancelled() => {
            tracing::info!("MCP server shutting down due to signal");
        }
    }

    Ok(())
}

async fn run_orgs(config: &ServerConfig, json: bool) -> CliResult<()> {
    let store = CredentialStore::try_load(&config.credentials_path)
        .await
        .cli_config_error()?;
    let organizations = store.list_tenants();

    if json {
        let text = serde_json::to_string_pretty(&organizations).cli_error(EXIT_WARNING)?;
        println!("{text}");
    } else {
        for organization in organizations {
            println!("{organization}");
        }
    }
    Ok(())
}

async fn run_check(config: &ServerConfig) -> CliResult<()> {
    let store = CredentialStore::try_load(&config.credentials_path)
        .await
        .cli_config_error()?;

    if store.is_empty() {
        println!(
            "{} is valid but lists no organizations",
            config.credentials_path.display()
        );
    } else {
        println!(
            "{} is valid: {} organization(s) configured",
            config.credentials_path.display(),
            store.len()
        );
    }
    Ok(())
}

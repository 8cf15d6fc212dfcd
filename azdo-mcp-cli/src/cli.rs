use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "azdo-mcp")]
#[command(version)]
#[command(about = "An MCP server for Azure DevOps")]
#[command(long_about = "
azdo-mcp is an MCP (Model Context Protocol) server that exposes Azure DevOps
projects, Git repositories, pull requests, builds and pipeline runs as tools.
Each organization is authenticated with its own personal access token, read
from a JSON file mapping organization names to tokens.

Example usage:
  azdo-mcp                  # Run as MCP server over stdio
  azdo-mcp orgs             # List the configured organizations
  azdo-mcp check            # Validate the credential file
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Credential file mapping organization names to PATs
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Host organization URLs are built on
    #[arg(long, global = true, value_name = "HOST")]
    pub service_host: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run as MCP server over stdio (default)
    #[command(long_about = "
Runs azdo-mcp as an MCP server on stdin/stdout. This is the default when no
subcommand is given. The server runs until the client disconnects or Ctrl-C
is pressed. Logs are written to ~/.azdo-mcp/mcp.log because stdout carries
the protocol.

Example:
  azdo-mcp serve
  # Or configure the bare `azdo-mcp` command in your MCP client settings
")]
    Serve,
    /// List the configured organizations
    #[command(long_about = "
Prints every organization that has a PAT in the credential file, one per
line, sorted by name. Tokens are never printed.

Examples:
  azdo-mcp orgs
  azdo-mcp orgs --json
  azdo-mcp --config ./config.json orgs
")]
    Orgs {
        /// Print the organizations as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Validate the credential file
    #[command(long_about = "
Reads the credential file and reports whether it is usable. The file must be
a JSON object whose values are all strings.

Exit codes:
  0 - File is valid
  2 - File is missing or malformed

Example:
  azdo-mcp check
")]
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    /// Whether stdin is an interactive terminal rather than an MCP client
    pub fn is_tty() -> bool {
        io::stdin().is_terminal()
    }

    /// The subcommand to run, `serve` when none was given
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from_args(["azdo-mcp"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.selected_command(), Commands::Serve);
    }

    #[test]
    fn test_orgs_json_flag() {
        let cli = Cli::try_parse_from_args(["azdo-mcp", "orgs", "--json"]).unwrap();
        assert_eq!(cli.selected_command(), Commands::Orgs { json: true });
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from_args([
            "azdo-mcp",
            "check",
            "--config",
            "/tmp/pats.json",
            "--service-host",
            "devops.example.com",
            "-q",
        ])
        .unwrap();

        assert_eq!(cli.selected_command(), Commands::Check);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pats.json")));
        assert_eq!(cli.service_host.as_deref(), Some("devops.example.com"));
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from_args(["azdo-mcp", "-v", "-d", "serve"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.debug);
        assert_eq!(cli.selected_command(), Commands::Serve);
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from_args(["azdo-mcp", "doctor"]).is_err());
    }
}

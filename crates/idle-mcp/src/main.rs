//! idle-mcp server — entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use idle_mcp::config::resolve_contract_path;
use idle_mcp::protocol::ProtocolHandler;
use idle_mcp::session::ServerSession;
use idle_mcp::tools::ToolRegistry;
use idle_mcp::transport::StdioTransport;
use idle_mcp::types::{InitializeResult, SERVER_VERSION};

#[derive(Parser)]
#[command(
    name = "idle-mcp",
    about = "MCP server exposing the idle CLI to agents over stdio JSON-RPC",
    version
)]
struct Cli {
    /// Path to the agent contract document (AGENTS.md).
    #[arg(short, long)]
    contract: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server over stdio (default).
    Serve {
        /// Path to the agent contract document (AGENTS.md).
        #[arg(short, long)]
        contract: Option<String>,
    },

    /// Print server identity, protocol version, and tool names as JSON.
    Info,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    // stdout carries the protocol; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve { contract: None }) {
        Commands::Serve { contract } => {
            let effective_contract = contract.or(cli.contract);
            let contract_path = resolve_contract_path(effective_contract.as_deref());
            let session = Arc::new(ServerSession::load(&contract_path));
            let handler = ProtocolHandler::new(session);
            let transport = StdioTransport::new(handler);
            tracing::info!("idle-mcp started (v{SERVER_VERSION})");
            transport.run().await?;
        }

        Commands::Info => {
            let capabilities = InitializeResult::for_request(None);
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "idle-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}

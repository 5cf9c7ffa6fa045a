//! Jira MCP Server
//!
//! A Model Context Protocol (MCP) server exposing Jira project lookup and
//! attachment transfer as tools, over stdio or HTTP.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use jira_mcp_server::config::Config;
use jira_mcp_server::error::Result;
use jira_mcp_server::http;
use jira_mcp_server::jira::client::JiraClient;
use jira_mcp_server::mcp::server::McpServer;

/// Jira MCP Server
#[derive(Parser)]
#[command(name = "jira-mcp-server")]
#[command(author, version, about = "Jira MCP Server - A Model Context Protocol server for Jira")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout (for local agents)
    Stdio,

    /// Serve over HTTP (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        host: IpAddr,

        /// Port to listen on; defaults to PORT or 8000
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays reserved for the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let command = cli.command.unwrap_or(Commands::Serve {
        host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        port: None,
    });
    let transport = match command {
        Commands::Stdio => "stdio",
        Commands::Serve { .. } => "http",
    };

    tracing::info!("Starting Jira MCP server with {} transport", transport);
    tracing::info!("Jira URL: {}", config.jira_url.as_deref().unwrap_or("<unset>"));
    tracing::info!("Username: {}", config.username.as_deref().unwrap_or("<unset>"));
    tracing::info!("Project Key: {}", config.project_key.as_deref().unwrap_or("<unset>"));
    for var in config.missing_vars() {
        tracing::warn!("{} is not set; Jira tools that need it will fail", var);
    }

    let port = config.port;
    let server = Arc::new(McpServer::new(Arc::new(JiraClient::new(config))));

    match command {
        Commands::Stdio => server.run_stdio().await?,
        Commands::Serve { host, port: port_arg } => {
            let addr = SocketAddr::new(host, port_arg.unwrap_or(port));
            http::serve(server, addr).await?;
        }
    }

    Ok(())
}

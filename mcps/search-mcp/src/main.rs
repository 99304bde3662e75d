//! Search MCP Server
//!
//! Web, news and image search over MCP, backed by DuckDuckGo or a
//! self-hosted SearXNG instance.
//!
//! # Usage
//!
//! Run directly: `search-mcp` (stdio), `search-mcp --transport http --port 8765`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "search": { "command": "./search-mcp" } } }
//! ```
//!
//! # Configuration
//! Set `SEARCH_BACKEND` / `SEARXNG_URL` or configure in `~/.binks/search.toml`

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

use search_mcp::{logging, transport, BackendKind, Config, SearchMcpServer};

#[derive(Parser)]
#[command(name = "search-mcp", version)]
#[command(about = "Web, news and image search MCP server (DuckDuckGo / SearXNG)")]
struct Cli {
    /// Transport to serve the MCP protocol on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Address to bind in http mode
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind in http mode
    #[arg(long, default_value_t = 8765)]
    port: u16,

    /// Backend override (duckduckgo or searxng)
    #[arg(long)]
    backend: Option<BackendKind>,

    /// SearXNG instance URL override
    #[arg(long)]
    searxng_url: Option<String>,

    /// Print the available tools and a client configuration example, then exit
    #[arg(long)]
    list_tools: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

fn print_banner(server: &SearchMcpServer, config: &Config) {
    println!("Search MCP Server");
    println!("{}", "=".repeat(50));
    println!("Backend: {}", config.search.backend);
    if config.search.backend == BackendKind::SearXNG {
        println!("SearXNG URL: {}", config.searxng.url);
    }
    println!("Available tools:");
    for tool in server.list_tools() {
        println!(
            "  - {}: {}",
            tool.name,
            tool.description.as_deref().unwrap_or_default()
        );
    }
    println!("{}", "=".repeat(50));
    println!();

    let command = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "search-mcp".to_string());
    let example = serde_json::json!({
        "mcpServers": {
            "search": {
                "command": command,
                "env": { "SEARCH_BACKEND": config.search.backend.as_str() }
            }
        }
    });

    println!("Client configuration example:");
    println!(
        "{}",
        serde_json::to_string_pretty(&example).unwrap_or_default()
    );
    println!();
    println!("HTTP mode: search-mcp --transport http --port 8765");
    println!("  MCP endpoint: http://localhost:8765{}", transport::MCP_PATH);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_tracing("search_mcp")?;

    tracing::info!("Starting Search MCP Server");

    let mut config = Config::load()?;
    if let Some(backend) = cli.backend {
        config.search.backend = backend;
    }
    if let Some(url) = cli.searxng_url {
        config.searxng.url = url;
    }

    let server = SearchMcpServer::from_config(&config)?;

    if cli.list_tools {
        print_banner(&server, &config);
        return Ok(());
    }

    match cli.transport {
        Transport::Stdio => transport::serve_stdio(server).await,
        Transport::Http => {
            let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
            transport::serve_http(server, addr).await
        }
    }
}

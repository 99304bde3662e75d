//! Serving the MCP server over stdio or streamable HTTP

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use std::net::SocketAddr;

use crate::server::SearchMcpServer;

/// Path the HTTP transport is mounted on
pub const MCP_PATH: &str = "/mcp";

/// Serve over stdin/stdout until the client disconnects
pub async fn serve_stdio(server: SearchMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running on stdio, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}

/// Serve the streamable HTTP transport at `http://<addr>/mcp` until Ctrl-C
pub async fn serve_http(server: SearchMcpServer, addr: SocketAddr) -> Result<()> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, tower::StreamableHttpService,
    };
    use rmcp::transport::StreamableHttpServerConfig;

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let router = axum::Router::new().nest_service(MCP_PATH, service);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}{}", addr, MCP_PATH);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    tracing::info!("Server shutting down");
    Ok(())
}

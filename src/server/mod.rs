//! MCP server implementation for delivery address management.
//!
//! This module provides the MCP protocol server that exposes the address
//! service to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::AddressMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the address MCP server with stdio transport.
///
/// Communicates via stdin/stdout using the MCP protocol and returns when the
/// client disconnects.
pub async fn run_server(server: AddressMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

//! MediNexus Reports
//!
//! An MCP server for appointment analytics reports.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use medinexus_reports::build_info;
use medinexus_reports::config::ReportConfig;
use medinexus_reports::mcp::ReportService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("medinexus_reports=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ReportConfig::from_env();

    // Print startup banner to stderr
    build_info::print_startup_banner(&config);
    eprintln!("Starting MCP server on stdio...");

    // Create the report service
    let service = ReportService::new(&config);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}

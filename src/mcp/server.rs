//! MediNexus Reports MCP Server Implementation
//!
//! Implements the MCP server with all report tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api::{HttpReportSource, ReportSource};
use crate::config::ReportConfig;
use crate::tools::reports::{self, ReportSession};
use crate::tools::status::{StatusTracker, REPORT_INSTRUCTIONS};

/// MediNexus report MCP service
#[derive(Clone)]
pub struct ReportService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    session: Arc<Mutex<ReportSession>>,
    source: Arc<dyn ReportSource>,
    export_dir: PathBuf,
    tool_router: ToolRouter<ReportService>,
}

impl ReportService {
    pub fn new(config: &ReportConfig) -> Self {
        Self::with_source(config, Arc::new(HttpReportSource::new(config)))
    }

    pub fn with_source(config: &ReportConfig, source: Arc<dyn ReportSource>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config))),
            session: Arc::new(Mutex::new(ReportSession::new(chrono::Local::now().date_naive()))),
            source,
            export_dir: config.export_dir.clone(),
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetReportKindParams {
    /// Report kind: "weekly" or "monthly"
    pub kind: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportReportParams {
    /// Include one row per appointment (default false)
    #[serde(default)]
    pub include_details: bool,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl ReportService {
    // ---- Status ----

    #[tool(description = "Get the current status of the MediNexus report service including build info, API and export configuration, and process information")]
    async fn report_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for producing appointment reports. Call this when unsure how to use the report tools.")]
    async fn report_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(REPORT_INSTRUCTIONS)]))
    }

    // ---- Period Navigation ----

    #[tool(description = "Get the active report kind and period")]
    async fn get_report_period(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        json_result(&reports::get_period(&session))
    }

    #[tool(description = "Switch between weekly and monthly reports. Discards the loaded report if the kind changes.")]
    async fn set_report_kind(
        &self,
        Parameters(p): Parameters<SetReportKindParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let result = reports::set_report_kind(&mut session, &p.kind)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Move to the next week or month, depending on the active report kind")]
    async fn next_report_period(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        json_result(&reports::next_period(&mut session))
    }

    #[tool(description = "Move to the previous week or month, depending on the active report kind")]
    async fn previous_report_period(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        json_result(&reports::previous_period(&mut session))
    }

    // ---- Report Data ----

    #[tool(description = "Fetch appointment statistics for the active period. Missing values are reported as 0; an unreachable API yields an all-zero report.")]
    async fn load_report(&self) -> Result<CallToolResult, McpError> {
        let result = reports::load_report(&self.session, self.source.as_ref()).await;
        json_result(&result)
    }

    #[tool(description = "Get the loaded report: totals, gender and status breakdowns, and detail rows")]
    async fn get_report(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let result = reports::get_report(&session).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the gender and status chart series (label, value, color) for the loaded report")]
    async fn get_chart_series(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        json_result(&reports::chart_series(&session))
    }

    // ---- Exports ----

    #[tool(description = "Export the active period's report as CSV to the export directory. Loads the report first if needed.")]
    async fn export_report_csv(
        &self,
        Parameters(p): Parameters<ExportReportParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = reports::export_report_csv(
            &self.session,
            self.source.as_ref(),
            &self.export_dir,
            p.include_details,
        )
        .await;
        json_result(&result)
    }

    #[tool(description = "Export the active period's report as an A4 PDF with summary tiles and charts to the export directory. Loads the report first if needed.")]
    async fn export_report_pdf(
        &self,
        Parameters(p): Parameters<ExportReportParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = reports::export_report_pdf(
            &self.session,
            self.source.as_ref(),
            self.export_dir.clone(),
            p.include_details,
        )
        .await;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for ReportService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "medinexus-reports".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("MediNexus Appointment Reports".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MediNexus Reports - weekly and monthly appointment analytics. \
                 IMPORTANT: Call report_instructions before the first report. \
                 Period: get_report_period, set_report_kind, next_report_period, previous_report_period. \
                 Data: load_report, get_report, get_chart_series. \
                 Exports: export_report_csv, export_report_pdf (include_details adds per-appointment rows). \
                 Status: report_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fetcher::test_support::StubSource;

    fn service(dir: &std::path::Path) -> ReportService {
        let config = ReportConfig::new("http://localhost:5000/api", None, dir.to_path_buf());
        ReportService::with_source(&config, Arc::new(StubSource::failing()))
    }

    #[test]
    fn test_server_info() {
        let dir = tempfile::tempdir().unwrap();
        let info = service(dir.path()).get_info();
        assert_eq!(info.server_info.name, "medinexus-reports");
        assert!(info.instructions.unwrap().contains("export_report_pdf"));
    }

    #[tokio::test]
    async fn test_service_shares_session() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let clone = service.clone();

        {
            let mut session = clone.session.lock().await;
            reports::set_report_kind(&mut session, "monthly").unwrap();
        }

        let session = service.session.lock().await;
        assert_eq!(session.kind(), crate::models::ReportKind::Monthly);
    }
}

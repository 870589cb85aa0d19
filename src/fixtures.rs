//! Bundled demo dataset served instead of calling the analyzer.

use crate::error::ClientError;
use crate::models::AnalysisReport;

const DEMO_REPORT_JSON: &str = include_str!("../fixtures/demo_report.json");

/// The fixed report returned in demo mode.
pub fn demo_report() -> Result<AnalysisReport, ClientError> {
    serde_json::from_str(DEMO_REPORT_JSON).map_err(|e| ClientError::Decode(e.to_string()))
}

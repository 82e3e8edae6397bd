use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::airtable::models::ProjectSnapshot;
use crate::update::analysis::UpdateAnalysis;

const DEFAULT_CONFIDENCE: &str = "MEDIUM";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRequest {
    pub job_number: Option<String>,
    pub email_content: Option<String>,
}

/// Body returned by `POST /update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub job_number: String,
    pub project_name: String,
    pub previous_stage: String,
    pub previous_status: String,
    pub new_stage: Option<String>,
    pub new_status: Option<String>,
    pub with_client: Option<bool>,
    pub update_summary: String,
    pub update_due: String,
    pub has_blocker: bool,
    pub blocker_note: Option<String>,
    pub confidence: String,
    pub confidence_note: Option<String>,
    pub teams_message: Value,
    pub airtable_updated: bool,
    pub fields_updated: Vec<&'static str>,
}

impl UpdateResponse {
    /// Combines the record as it was before the update with the model's
    /// analysis and the outcome of the Airtable write.
    pub fn build(
        job_number: String,
        previous: ProjectSnapshot,
        analysis: UpdateAnalysis,
        update_due: String,
        airtable_updated: bool,
        fields_updated: Vec<&'static str>,
    ) -> Self {
        Self {
            job_number,
            project_name: previous.project_name.unwrap_or_default(),
            previous_stage: previous.stage.unwrap_or_default(),
            previous_status: previous.status.unwrap_or_default(),
            new_stage: analysis.stage,
            new_status: analysis.status,
            with_client: analysis.with_client,
            update_summary: analysis.update_summary.unwrap_or_default(),
            update_due,
            has_blocker: analysis.has_blocker.unwrap_or(false),
            blocker_note: analysis.blocker_note,
            confidence: analysis
                .confidence
                .unwrap_or_else(|| DEFAULT_CONFIDENCE.to_string()),
            confidence_note: analysis.confidence_note,
            teams_message: analysis.teams_message.unwrap_or_else(|| json!({})),
            airtable_updated,
            fields_updated,
        }
    }
}

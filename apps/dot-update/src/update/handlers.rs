use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{Local, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::update::analysis::UpdateAnalysis;
use crate::update::models::{UpdateRequest, UpdateResponse};
use crate::update::prompts::build_user_message;

/// POST /update
pub async fn handle_update(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;
    let req = parse_request(body)?;

    let email_content = req
        .email_content
        .filter(|s| !s.trim().is_empty())
        .ok_or(AppError::Validation("No email content provided"))?;
    let job_number = req
        .job_number
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(AppError::Validation("No job number provided"))?;

    let span = info_span!("update", request_id = %Uuid::new_v4(), job_number = %job_number);
    process_update(&state, job_number, &email_content)
        .instrument(span)
        .await
        .map(Json)
}

/// Decodes the request body, which must be a JSON object. Serde would
/// otherwise read a JSON array positionally into the request fields.
fn parse_request(body: Value) -> Result<UpdateRequest, AppError> {
    if !body.is_object() {
        return Err(AppError::InvalidBody(
            "Request body must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(body).map_err(|e| AppError::InvalidBody(e.to_string()))
}

async fn process_update(
    state: &AppState,
    job_number: String,
    email_content: &str,
) -> Result<UpdateResponse, AppError> {
    let record = state
        .airtable
        .find_project_by_job_number(&job_number)
        .await?
        .ok_or_else(|| AppError::JobNotFound {
            job_number: job_number.clone(),
        })?;

    let prompt = build_user_message(&job_number, &record.fields, email_content);
    let analysis: UpdateAnalysis = state.llm.call_json(&prompt, &state.update_prompt).await?;

    let update_due = analysis.resolve_update_due(Local::now().date_naive());
    let status_changed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let fields = analysis.to_project_fields(&update_due, &status_changed_at);
    let fields_updated = fields.field_names();

    let airtable_updated = if fields.is_empty() {
        info!("Email produced no field changes; skipping Airtable write");
        false
    } else {
        match state.airtable.update_project(&record.id, &fields).await {
            Ok(()) => true,
            Err(e) => {
                error!("Error updating project {}: {e}", record.id);
                false
            }
        }
    };

    info!(
        "Processed update: fields={:?}, airtable_updated={airtable_updated}",
        fields_updated
    );

    Ok(UpdateResponse::build(
        job_number,
        record.fields,
        analysis,
        update_due,
        airtable_updated,
        fields_updated,
    ))
}

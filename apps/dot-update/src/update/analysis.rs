use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::airtable::ProjectFields;
use crate::update::schedule::{add_working_days, DEFAULT_UPDATE_WORKING_DAYS};

/// Structured fields the model extracts from an update email.
/// Every key is optional; the model may omit or null any of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAnalysis {
    pub stage: Option<String>,
    pub status: Option<String>,
    pub with_client: Option<bool>,
    pub update_summary: Option<String>,
    pub update_due: Option<String>,
    pub has_blocker: Option<bool>,
    pub blocker_note: Option<String>,
    pub confidence: Option<String>,
    pub confidence_note: Option<String>,
    /// Team channel message; passed through to the caller untouched.
    pub teams_message: Option<Value>,
}

impl UpdateAnalysis {
    /// The model's next-update date when it is a valid `YYYY-MM-DD`,
    /// otherwise `DEFAULT_UPDATE_WORKING_DAYS` working days after `today`.
    pub fn resolve_update_due(&self, today: NaiveDate) -> String {
        let proposed = self
            .update_due
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if let Some(raw) = proposed {
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => return date.format("%Y-%m-%d").to_string(),
                Err(_) => warn!("Ignoring unparseable updateDue from model: {raw:?}"),
            }
        }

        add_working_days(today, DEFAULT_UPDATE_WORKING_DAYS)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Maps the analysis onto the Airtable columns it changes.
    /// Empty strings count as "no change".
    pub fn to_project_fields(&self, update_due: &str, status_changed_at: &str) -> ProjectFields {
        let mut fields = ProjectFields::default();

        if let Some(stage) = non_empty(&self.stage) {
            fields.stage = Some(title_case(stage));
        }

        if let Some(status) = non_empty(&self.status) {
            fields.status = Some(title_case(status));
            fields.status_changed = Some(status_changed_at.to_string());
        }

        fields.with_client = self.with_client;

        if let Some(summary) = non_empty(&self.update_summary) {
            fields.update = Some(summary.to_string());
            fields.update_due = Some(update_due.to_string());
        }

        fields
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest, so `"ON HOLD"` becomes `"On Hold"` and `"in-progress"` becomes `"In-Progress"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alphabetic = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(c);
            prev_alphabetic = false;
        }
    }
    out
}

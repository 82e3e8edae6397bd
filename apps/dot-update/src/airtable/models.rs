use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A row of the Projects table as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    #[serde(default)]
    pub fields: ProjectSnapshot,
}

/// The project fields the update flow reads. Airtable omits empty cells,
/// so every field is optional. A cell of an unexpected type reads as empty
/// instead of failing the whole lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSnapshot {
    #[serde(rename = "Project Name", default, deserialize_with = "lenient")]
    pub project_name: Option<String>,
    #[serde(rename = "Stage", default, deserialize_with = "lenient")]
    pub stage: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(rename = "With Client?", default, deserialize_with = "lenient")]
    pub with_client: Option<bool>,
    #[serde(rename = "Update", default, deserialize_with = "lenient")]
    pub update: Option<String>,
}

/// Reads a cell as `T`. Lookup and rollup columns arrive as arrays, so a
/// single-element array is unwrapped; anything else that does not fit is `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    };
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
pub(super) struct ListRecordsResponse {
    #[serde(default)]
    pub records: Vec<ProjectRecord>,
}

/// Field changes written back to a project. Unset members are left out of
/// the PATCH body so Airtable keeps their current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectFields {
    #[serde(rename = "Stage", skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Status Changed", skip_serializing_if = "Option::is_none")]
    pub status_changed: Option<String>,
    #[serde(rename = "With Client?", skip_serializing_if = "Option::is_none")]
    pub with_client: Option<bool>,
    #[serde(rename = "Update", skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    #[serde(rename = "Update due", skip_serializing_if = "Option::is_none")]
    pub update_due: Option<String>,
}

impl ProjectFields {
    /// Airtable column names of the fields that are set, in write order.
    pub fn field_names(&self) -> Vec<&'static str> {
        [
            ("Stage", self.stage.is_some()),
            ("Status", self.status.is_some()),
            ("Status Changed", self.status_changed.is_some()),
            ("With Client?", self.with_client.is_some()),
            ("Update", self.update.is_some()),
            ("Update due", self.update_due.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateRecordRequest<'a> {
    pub fields: &'a ProjectFields,
}

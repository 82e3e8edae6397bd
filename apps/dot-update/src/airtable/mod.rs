//! Airtable client for the Projects table.
//!
//! Records are looked up by their `Job Number` column and updated in place
//! by record id. Only the fields the update flow reads or writes are modelled.

use std::time::Duration;

use reqwest::{Client, Response};
use thiserror::Error;
use tracing::{debug, info};

pub mod models;

use models::{ListRecordsResponse, UpdateRecordRequest};
pub use models::{ProjectFields, ProjectRecord};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum AirtableError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Airtable API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_key: String,
    table_url: String,
}

impl AirtableClient {
    pub fn new(
        api_key: String,
        api_url: &str,
        base_id: &str,
        table: &str,
    ) -> Result<Self, AirtableError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            table_url: format!("{}/v0/{base_id}/{table}", api_url.trim_end_matches('/')),
        })
    }

    /// Fetches the first project whose `Job Number` equals `job_number`.
    pub async fn find_project_by_job_number(
        &self,
        job_number: &str,
    ) -> Result<Option<ProjectRecord>, AirtableError> {
        let formula = job_number_formula(job_number);

        let response = self
            .client
            .get(&self.table_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .query(&[("filterByFormula", formula.as_str())])
            .send()
            .await?;

        let list: ListRecordsResponse = check_status(response).await?.json().await?;

        let record = list.records.into_iter().next();
        match &record {
            Some(r) => debug!("Job '{job_number}' resolved to record {}", r.id),
            None => info!("Job '{job_number}' not found in Airtable"),
        }
        Ok(record)
    }

    /// Writes `fields` to the project record, leaving unset fields untouched.
    pub async fn update_project(
        &self,
        record_id: &str,
        fields: &ProjectFields,
    ) -> Result<(), AirtableError> {
        let response = self
            .client
            .patch(format!("{}/{record_id}", self.table_url))
            .bearer_auth(&self.api_key)
            .json(&UpdateRecordRequest { fields })
            .send()
            .await?;

        check_status(response).await?;

        info!("Updated project record: {record_id}");
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, AirtableError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(AirtableError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Builds `{Job Number}='<job>'`, escaping the job number for use inside an
/// Airtable single-quoted string literal.
fn job_number_formula(job_number: &str) -> String {
    let escaped = job_number.replace('\\', "\\\\").replace('\'', "\\'");
    format!("{{Job Number}}='{escaped}'")
}

use std::sync::Arc;

use crate::airtable::AirtableClient;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub airtable: AirtableClient,
    /// System prompt for update analysis, resolved once at startup.
    pub update_prompt: Arc<str>,
}

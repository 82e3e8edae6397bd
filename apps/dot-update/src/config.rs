use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::update::prompts::UPDATE_SYSTEM_PROMPT;

const DEFAULT_AIRTABLE_BASE_ID: &str = "app8CI7NAZqhQ4G1Y";
const DEFAULT_AIRTABLE_PROJECTS_TABLE: &str = "Projects";
const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub airtable_api_key: String,
    pub airtable_api_url: String,
    pub airtable_base_id: String,
    pub airtable_projects_table: String,
    /// Overrides the built-in update prompt when set.
    pub update_prompt_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            anthropic_api_url: or_default("ANTHROPIC_API_URL", DEFAULT_ANTHROPIC_API_URL),
            airtable_api_key: require("AIRTABLE_API_KEY")?,
            airtable_api_url: or_default("AIRTABLE_API_URL", DEFAULT_AIRTABLE_API_URL),
            airtable_base_id: or_default("AIRTABLE_BASE_ID", DEFAULT_AIRTABLE_BASE_ID),
            airtable_projects_table: or_default(
                "AIRTABLE_PROJECTS_TABLE",
                DEFAULT_AIRTABLE_PROJECTS_TABLE,
            ),
            update_prompt_path: lookup("UPDATE_PROMPT_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    /// Returns the system prompt for update analysis: the contents of
    /// `UPDATE_PROMPT_PATH` if configured, the built-in prompt otherwise.
    pub fn load_update_prompt(&self) -> Result<String> {
        let Some(path) = &self.update_prompt_path else {
            return Ok(UPDATE_SYSTEM_PROMPT.to_string());
        };

        let prompt = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read update prompt from '{}'", path.display()))?;
        if prompt.trim().is_empty() {
            bail!("Update prompt file '{}' is empty", path.display());
        }
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![("ANTHROPIC_API_KEY", "sk-ant"), ("AIRTABLE_API_KEY", "pat-air")]
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&required())).unwrap();
        assert_eq!(config.airtable_base_id, "app8CI7NAZqhQ4G1Y");
        assert_eq!(config.airtable_projects_table, "Projects");
        assert_eq!(config.anthropic_api_url, "https://api.anthropic.com");
        assert_eq!(config.airtable_api_url, "https://api.airtable.com");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.update_prompt_path.is_none());
    }

    #[test]
    fn test_missing_anthropic_key_is_named() {
        let err = Config::from_lookup(lookup_from(&[("AIRTABLE_API_KEY", "pat")])).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_blank_airtable_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("AIRTABLE_API_KEY", "  "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("AIRTABLE_API_KEY"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut vars = required();
        vars.push(("PORT", "eighty"));
        assert!(Config::from_lookup(lookup_from(&vars)).is_err());
    }

    #[test]
    fn test_overrides_respected() {
        let mut vars = required();
        vars.extend([
            ("AIRTABLE_BASE_ID", "appOther"),
            ("AIRTABLE_PROJECTS_TABLE", "Jobs"),
            ("PORT", "3000"),
        ]);
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.airtable_base_id, "appOther");
        assert_eq!(config.airtable_projects_table, "Jobs");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_builtin_prompt_without_path() {
        let config = Config::from_lookup(lookup_from(&required())).unwrap();
        assert_eq!(config.load_update_prompt().unwrap(), UPDATE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_prompt_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Custom instructions").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let mut vars: Vec<(&str, &str)> = required();
        vars.push(("UPDATE_PROMPT_PATH", path.as_str()));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.load_update_prompt().unwrap(), "Custom instructions");
    }

    #[test]
    fn test_empty_prompt_file_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let mut vars: Vec<(&str, &str)> = required();
        vars.push(("UPDATE_PROMPT_PATH", path.as_str()));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.load_update_prompt().is_err());
    }

    #[test]
    fn test_missing_prompt_file_names_path() {
        let mut vars = required();
        vars.push(("UPDATE_PROMPT_PATH", "/nonexistent/prompt.txt"));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        let err = config.load_update_prompt().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/prompt.txt"));
    }
}

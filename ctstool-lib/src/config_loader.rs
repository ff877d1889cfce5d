use crate::config::Config;
use crate::test_list::validate_suite_name;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Parse a YAML configuration file
pub async fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

    let config = parse_config_string(&content)
        .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;

    tracing::debug!(path = %path.as_ref().display(), "loaded config");
    Ok(config)
}

/// Parse a YAML configuration string
pub fn parse_config_string(content: &str) -> Result<Config> {
    // An empty document deserializes as unit, not as an empty mapping
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config =
        serde_yaml::from_str(content).with_context(|| "Failed to parse YAML content")?;

    if let Some(suite) = &config.suite {
        validate_suite_name(suite)?;
    }

    Ok(config)
}

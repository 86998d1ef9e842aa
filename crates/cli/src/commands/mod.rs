pub mod bucket;
pub mod chat;
pub mod config_cmd;
pub mod ingest;

use std::path::Path;

use groundrag_config::AppConfig;
use groundrag_core::Error;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load config and insist on credentials, explaining what to set if any
/// are missing.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}"))?;

    let missing = config.missing_required();
    if !missing.is_empty() {
        eprintln!();
        eprintln!("  ERROR: required configuration is missing!");
        eprintln!();
        eprintln!("  Set these environment variables (or put them in a .env file):");
        for var in &missing {
            eprintln!("    {var}");
        }
        eprintln!();
        return Err(Error::ConfigurationMissing {
            vars: missing.into_iter().map(String::from).collect(),
        }
        .into());
    }

    Ok(config)
}

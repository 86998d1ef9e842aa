//! `groundrag config`: configuration inspection.

use std::path::Path;

use groundrag_config::AppConfig;

use super::CommandResult;

pub fn validate(config_path: &Path) -> CommandResult {
    println!("Validating configuration...");

    let config = match AppConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    };
    println!("   Config parsed and value ranges OK");

    let missing = config.missing_required();
    if missing.is_empty() {
        println!("   All required variables set");
        return Ok(());
    }

    println!();
    for var in &missing {
        println!("   Missing: {var}");
    }
    config.require_credentials()?;
    Ok(())
}

pub fn show(config_path: &Path) -> CommandResult {
    let config =
        AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    println!("Config file: {}", config_path.display());
    for line in config.summary_lines() {
        println!("  {line}");
    }
    Ok(())
}

use anyhow::Result;
use care_compare::config;
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the config show command
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Server: {}:{}", cfg.server.host, cfg.server.port);
    println!(
        "  Radius bounds: {}-{} miles",
        cfg.query.min_radius_miles, cfg.query.max_radius_miles
    );
    println!("  Rating threshold: {}", cfg.query.rating_threshold);
    println!(
        "  Add-on frequency threshold: {}",
        cfg.query.addon_frequency_threshold
    );
    println!(
        "  Catalog: {}",
        cfg.catalog
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );

    info!("Configuration validation successful");
    Ok(())
}

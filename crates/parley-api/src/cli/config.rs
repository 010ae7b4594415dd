//! Effective configuration display.

use std::path::Path;

use anyhow::Result;
use console::style;

use parley_types::config::ParleyConfig;

/// Print the configuration after file loading, env overrides and floors.
pub fn show_config(data_dir: &Path, config: &ParleyConfig, json: bool) -> Result<()> {
    if json {
        let mut value = serde_json::to_value(config)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "data_dir".to_string(),
                serde_json::Value::String(data_dir.display().to_string()),
            );
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let on_off = |enabled: bool| {
        if enabled {
            style("enabled").green().to_string()
        } else {
            style("disabled").yellow().to_string()
        }
    };

    println!();
    println!("  {}", style("── Paths ──").dim());
    println!("  Data dir:  {}", data_dir.display());
    if let Some(url) = &config.database_url {
        println!("  Database:  {url}");
    }
    println!();
    println!("  {}", style("── Backend ──").dim());
    println!(
        "  Endpoint:  {}{}",
        style(&config.backend.base_url).cyan(),
        style(&config.backend.analyze_path).cyan()
    );
    println!("  Timeout:   {}s", config.backend.timeout_secs);
    println!();
    println!("  {}", style("── Cache ──").dim());
    println!("  Status:    {}", on_off(config.cache.enabled));
    println!("  TTL:       {} min", config.cache.ttl_minutes);
    println!("  Max size:  {}", config.cache.max_size);
    println!("  Sweep:     every {} min", config.cache.sweep_interval_minutes);
    println!();

    Ok(())
}

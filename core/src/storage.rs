use std::path::Path;

use crate::config::AnalyticsConfig;
use crate::error::ConfigError;

/// Leser inn analysekonfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres standardkonfig.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalyticsConfig, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let cfg = AnalyticsConfig::from_json_str(&contents)?;
        log::info!("config loaded from {} ({} zones)", path.display(), cfg.zones.len());
        Ok(cfg)
    } else {
        log::info!("no config at {}, using defaults", path.display());
        Ok(AnalyticsConfig::default())
    }
}

/// Lagrer config til disk som JSON (pretty-print). Ugyldig config skrives ikke.
pub fn save_config(cfg: &AnalyticsConfig, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    cfg.validate()?;
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json)?;
    log::info!("config saved to {}", path.display());
    Ok(())
}

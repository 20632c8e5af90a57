use std::fs;
use std::path::PathBuf;

use sessiongraph_core::config::{AnalyticsConfig, HrBounds};
use sessiongraph_core::error::ConfigError;
use sessiongraph_core::storage::{load_config, save_config};

fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sessiongraph_{}_{}.json", name, std::process::id()))
}

#[test]
fn missing_file_gives_default_config() {
    let path = tmp_path("missing");
    fs::remove_file(&path).ok();
    let cfg = load_config(&path).expect("default ved manglende fil");
    assert_eq!(cfg, AnalyticsConfig::default());
}

#[test]
fn save_and_load_config() -> anyhow::Result<()> {
    let path = tmp_path("roundtrip");
    let cfg = AnalyticsConfig {
        hr_bounds: HrBounds { min: 35, max: 220 },
        single_sample_seconds: 1,
        recent_sessions_limit: 10,
        ..AnalyticsConfig::default()
    };

    save_config(&cfg, &path)?;
    let loaded = load_config(&path)?;
    assert_eq!(loaded, cfg);

    fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn invalid_config_file_reports_path() {
    let path = tmp_path("invalid");
    fs::write(&path, r#"{"zones": {"zones": [{"zone": 1, "min": "low"}]}}"#).unwrap();

    let err = load_config(&path).unwrap_err();
    match err {
        ConfigError::Parse { path: p, .. } => assert_eq!(p, "zones.zones[0].min"),
        other => panic!("unexpected error: {other}"),
    }
    fs::remove_file(&path).ok();
}

#[test]
fn invalid_config_is_not_saved() {
    let path = tmp_path("not_saved");
    fs::remove_file(&path).ok();
    let cfg = AnalyticsConfig { single_sample_seconds: 0, ..AnalyticsConfig::default() };
    assert!(matches!(save_config(&cfg, &path), Err(ConfigError::InvalidValue(_))));
    assert!(!path.exists());
}

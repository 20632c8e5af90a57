use serde_json::json;
use sessiongraph_core::analyzer::Analyzer;
use sessiongraph_core::config::AnalyticsConfig;
use sessiongraph_core::laps::LapEncoding;
use sessiongraph_core::telemetry::EngineMetrics;

#[test]
fn analyzer_records_into_attached_metrics() -> anyhow::Result<()> {
    let metrics = EngineMetrics::new()?;
    let cfg = AnalyticsConfig::default();
    let analyzer = Analyzer::new(&cfg).with_metrics(&metrics);

    analyzer.analyze_export(&json!({
        "sessions": [
            {
                "hr_samples": [
                    {"time_seconds": 0, "hr": 12},
                    {"time_seconds": 5, "hr": 130},
                    {"time_seconds": 10}
                ],
                "laps": [{"duration_seconds": 60}, {"duration_seconds": 60}]
            },
            {"laps": [{"time_seconds": 300}]},
            42
        ]
    }))?;

    assert_eq!(metrics.sessions_analyzed(), 2);
    assert_eq!(metrics.hr_samples_rejected(), 2);
    assert_eq!(metrics.lap_sequences(LapEncoding::Duration), 1);
    assert_eq!(metrics.lap_sequences(LapEncoding::AbsoluteTime), 1);
    assert_eq!(metrics.lap_sequences(LapEncoding::Approximate), 0);
    assert_eq!(metrics.entries_ignored(), 1);

    let text = metrics.render_text()?;
    assert!(text.contains("sessiongraph_sessions_analyzed_total 2"), "{text}");
    assert!(text.contains(r#"encoding="duration""#), "{text}");
    Ok(())
}

#[test]
fn analyzer_without_metrics_records_nothing() -> anyhow::Result<()> {
    let metrics = EngineMetrics::new()?;
    Analyzer::default().analyze_export(&json!({"sessions": [{}]}))?;
    assert_eq!(metrics.sessions_analyzed(), 0);
    Ok(())
}

#[test]
fn global_instance_is_shared() {
    let a = EngineMetrics::global().expect("global metrics");
    let b = EngineMetrics::global().expect("global metrics");
    assert!(std::ptr::eq(a, b));
}

use serde_json::json;
use sessiongraph_core::analyze_session::analyze_session;
use sessiongraph_core::config::AnalyticsConfig;
use sessiongraph_core::laps::LapEncoding;
use sessiongraph_core::metrics::HrSource;
use sessiongraph_core::models::TrainingSession;
use sessiongraph_core::types::SessionDetail;

fn session(v: serde_json::Value) -> TrainingSession {
    serde_json::from_value(v).unwrap()
}

#[test]
fn full_session_has_timeline_zones_and_laps() {
    let s = session(json!({
        "id": "2024-01-05-0730",
        "start_time": "2024-01-05T07:30:00",
        "duration_seconds": 240,
        "has_hr": true,
        "has_laps": true,
        "num_laps": 2,
        "parseable": true,
        "hr_samples": [
            {"time_seconds": 0, "hr": 90},
            {"time_seconds": 30, "hr": 0},
            {"time_seconds": 60, "hr": 120},
            {"time_seconds": 120, "hr": 160},
            {"time_seconds": 180, "hr": 185}
        ],
        "laps": [
            {"lap_number": 1, "duration_seconds": 120},
            {"lap_number": 2, "duration_seconds": 120}
        ]
    }));
    let r = analyze_session(&s, &AnalyticsConfig::default());

    assert_eq!(r.detail, SessionDetail::Timeline);
    assert_eq!(r.month.as_deref(), Some("2024-01"));
    assert_eq!(r.rejected_samples, 1);
    assert_eq!(r.zones.total_seconds, 240);
    assert_eq!(r.zones.bucket(4).unwrap().percentage, 25.0);

    let hr = r.hr.unwrap();
    assert_eq!(hr.source, HrSource::Samples);
    assert_eq!(hr.samples, 4);
    assert_eq!(hr.max, Some(185));
    assert_eq!(hr.min, Some(90));
    assert!((hr.avg.unwrap() - 138.75).abs() < 1e-9);

    assert_eq!(r.lap_encoding, Some(LapEncoding::Duration));
    assert_eq!(r.lap_separators.len(), 1);
    assert_eq!(r.lap_separators[0].time_seconds, 120);
    assert_eq!(r.lap_segments.len(), 2);
    assert!(!r.basic_only);
    assert!(r.has_hr_detail);
}

#[test]
fn summary_only_session_keeps_scalar_stats() {
    let s = session(json!({
        "start_time": "2023-11-20T18:00:00",
        "duration_seconds": 3600,
        "has_hr": true,
        "parseable": false,
        "hr_avg": 142,
        "hr_max": 260,
        "hr_min": 55
    }));
    let r = analyze_session(&s, &AnalyticsConfig::default());

    assert_eq!(r.detail, SessionDetail::SummaryOnly);
    assert!(r.zones.is_empty());
    assert!(r.lap_separators.is_empty());
    assert!(r.basic_only);
    assert!(!r.has_hr_detail);

    let hr = r.hr.unwrap();
    assert_eq!(hr.source, HrSource::Summary);
    assert_eq!(hr.avg, Some(142.0));
    assert_eq!(hr.max, Some(250), "hr_max klemmes til gyldig område");
    assert_eq!(hr.min, Some(55));
}

#[test]
fn session_without_any_hr_has_no_stats() {
    let s = session(json!({"duration_seconds": 1800, "distance_meters": 5000.0}));
    let r = analyze_session(&s, &AnalyticsConfig::default());
    assert_eq!(r.detail, SessionDetail::SummaryOnly);
    assert!(r.hr.is_none());
    assert!(r.month.is_none());
    assert_eq!(r.lap_encoding, None);
}

#[test]
fn repeated_runs_are_identical() {
    let s = session(json!({
        "start_time": "2024-02-10T09:00:00Z",
        "duration_seconds": 600,
        "has_hr": true,
        "hr_samples": [
            {"time_seconds": 300, "hr": 150},
            {"time_seconds": 0, "hr": 110},
            {"time_seconds": 120, "hr": 135}
        ],
        "laps": [{"time_seconds": 300}, {"time_seconds": 0}]
    }));
    let cfg = AnalyticsConfig::default();
    let a = analyze_session(&s, &cfg);
    let b = analyze_session(&s, &cfg);
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

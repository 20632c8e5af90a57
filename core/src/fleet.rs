use chrono::NaiveDateTime;

use crate::config::AnalyticsConfig;
use crate::metrics::{mean, summary_hr_avg, summary_hr_max, summary_hr_min};
use crate::models::TrainingSession;
use crate::types::{FleetReport, FleetTotals, GlobalHr, HrTrendPoint, MonthlySeries, RecentSession};

/// Fold alle økter til totaler, globale HR-verdier og månedsserier.
pub fn aggregate_fleet(sessions: &[TrainingSession], cfg: &AnalyticsConfig) -> FleetReport {
    let report = FleetReport {
        totals: totals(sessions),
        hr: global_hr(sessions, cfg),
        monthly: monthly_series(sessions),
        recent: recent_sessions(sessions, cfg),
        hr_trend: hr_trend(sessions, cfg),
    };
    log::debug!(
        "fleet: {} sessions over {} months",
        report.totals.sessions,
        report.monthly.sessions.len()
    );
    report
}

pub fn totals(sessions: &[TrainingSession]) -> FleetTotals {
    sessions.iter().fold(
        FleetTotals { sessions: sessions.len(), ..Default::default() },
        |mut t, s| {
            t.duration_seconds += u64::from(s.duration_seconds);
            t.with_hr += usize::from(s.has_hr);
            t.with_gps += usize::from(s.has_gps_data());
            t.distance_meters += s.distance_meters.filter(|d| *d > 0.0).unwrap_or(0.0);
            t.basic_only += usize::from(s.is_basic_only());
            t
        },
    )
}

/// Snitt av gyldige `hr_avg`, maks av `hr_max`, min av `hr_min`.
pub fn global_hr(sessions: &[TrainingSession], cfg: &AnalyticsConfig) -> GlobalHr {
    let bounds = &cfg.hr_bounds;
    let avgs: Vec<f64> = sessions
        .iter()
        .filter_map(|s| summary_hr_avg(s, bounds))
        .map(f64::from)
        .collect();
    GlobalHr {
        avg: (!avgs.is_empty()).then(|| mean(&avgs)),
        max: sessions.iter().filter_map(|s| summary_hr_max(s, bounds)).max(),
        min: sessions.iter().filter_map(|s| summary_hr_min(s, bounds)).min(),
        sessions: avgs.len(),
    }
}

/// Antall og varighet per `YYYY-MM`. Økter uten starttid telles ikke her.
pub fn monthly_series(sessions: &[TrainingSession]) -> MonthlySeries {
    let mut out = MonthlySeries::default();
    for s in sessions {
        let Some(month) = s.month_key() else {
            continue;
        };
        *out.sessions.entry(month.clone()).or_insert(0) += 1;
        *out.duration_seconds.entry(month).or_insert(0) += u64::from(s.duration_seconds);
    }
    out.hours = out
        .duration_seconds
        .iter()
        .map(|(m, secs)| (m.clone(), round1(*secs as f64 / 3600.0)))
        .collect();
    out
}

/// De N nyeste øktene, nyeste først.
pub fn recent_sessions(sessions: &[TrainingSession], cfg: &AnalyticsConfig) -> Vec<RecentSession> {
    let mut dated = dated(sessions);
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated
        .into_iter()
        .take(cfg.recent_sessions_limit)
        .map(|(start_time, s)| RecentSession {
            id: s.id.clone(),
            start_time,
            duration_seconds: s.duration_seconds,
            hr_avg: summary_hr_avg(s, &cfg.hr_bounds),
            num_laps: s.num_laps,
            distance_meters: s.distance_meters,
            basic_only: s.is_basic_only(),
        })
        .collect()
}

/// Siste N økter med gyldig `hr_avg`, eldste først.
pub fn hr_trend(sessions: &[TrainingSession], cfg: &AnalyticsConfig) -> Vec<HrTrendPoint> {
    let mut points: Vec<HrTrendPoint> = dated(sessions)
        .into_iter()
        .filter_map(|(start_time, s)| {
            summary_hr_avg(s, &cfg.hr_bounds).map(|hr_avg| HrTrendPoint { start_time, hr_avg })
        })
        .collect();
    points.sort_by_key(|p| p.start_time);
    let skip = points.len().saturating_sub(cfg.hr_trend_limit);
    points.split_off(skip)
}

fn dated(sessions: &[TrainingSession]) -> Vec<(NaiveDateTime, &TrainingSession)> {
    sessions
        .iter()
        .filter_map(|s| s.start_time.map(|t| (t, s)))
        .collect()
}

#[inline]
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

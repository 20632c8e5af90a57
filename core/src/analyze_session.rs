use crate::config::AnalyticsConfig;
use crate::filter::filter_valid_samples;
use crate::laps::{bound_to_session, lap_segments, LapSequence};
use crate::metrics::{sample_hr_stats, summary_hr_stats};
use crate::models::TrainingSession;
use crate::types::{SessionDetail, SessionReport};
use crate::zones::{zone_distribution, ZoneDistribution};

/// Per-økt sammendrag: soner, lap-grenser og HR-statistikk.
///
/// Ren funksjon av økten og configen. Mangler økten HR-samples (eller alle er
/// ugyldige) faller vi tilbake til sammendragsfeltene og hopper over alt som
/// trenger tidslinje.
pub fn analyze_session(session: &TrainingSession, cfg: &AnalyticsConfig) -> SessionReport {
    // 1️⃣ Filtrer HR-samples
    let raw = session.hr_samples.as_deref().unwrap_or(&[]);
    let valid = filter_valid_samples(raw, &cfg.hr_bounds);
    let rejected_samples = raw.len() - valid.len();

    // 2️⃣ Soner + HR-stats (fallback til sammendrag uten gyldige samples)
    let (detail, zones, hr) = match sample_hr_stats(&valid) {
        Some(stats) => (
            SessionDetail::Timeline,
            zone_distribution(&valid, cfg),
            Some(stats),
        ),
        None => (
            SessionDetail::SummaryOnly,
            ZoneDistribution::default(),
            summary_hr_stats(session, &cfg.hr_bounds),
        ),
    };

    // 3️⃣ Lap-grenser, holdt innenfor øktens varighet
    let sequence = session.laps.as_deref().and_then(LapSequence::from_records);
    let lap_encoding = sequence.as_ref().map(|s| s.encoding());
    let separators = sequence.map(|s| s.separators()).unwrap_or_default();
    let lap_separators = bound_to_session(separators, session.duration_seconds);
    let segments = lap_encoding
        .map(|enc| lap_segments(&lap_separators, session.duration_seconds, enc))
        .unwrap_or_default();

    log::debug!(
        "session {}: {:?}, {} valid / {} rejected samples, laps={:?} ({} separators)",
        session.id.as_deref().unwrap_or("<no id>"),
        detail,
        valid.len(),
        rejected_samples,
        lap_encoding,
        lap_separators.len()
    );

    SessionReport {
        id: session.id.clone(),
        start_time: session.start_time,
        month: session.month_key(),
        duration_seconds: session.duration_seconds,
        detail,
        basic_only: session.is_basic_only(),
        has_hr_detail: session.has_hr_detail(),
        zones,
        hr,
        rejected_samples,
        lap_encoding,
        lap_separators,
        lap_segments: segments,
    }
}

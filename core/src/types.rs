use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::laps::{LapEncoding, LapSegment, LapSeparator};
use crate::metrics::HrStats;
use crate::models::ExportMeta;
use crate::zones::ZoneDistribution;

// ──────────────────────────────────────────────────────────────────────────────
// OUTPUT: ren data til presentasjonslaget. Sekunder, bpm og prosent; ingen
// farger eller geometri.
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionDetail {
    /// Minst ett gyldig HR-sample: soner og tidslinje er tilgjengelig.
    Timeline,
    /// Bare skalarverdier fra sammendraget.
    SummaryOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub id: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    /// `YYYY-MM`; `None` når starttiden mangler.
    pub month: Option<String>,
    pub duration_seconds: u32,
    pub detail: SessionDetail,
    pub basic_only: bool,
    pub has_hr_detail: bool,
    pub zones: ZoneDistribution,
    pub hr: Option<HrStats>,
    /// Samples forkastet av filteret (manglende eller utenfor gyldig område).
    pub rejected_samples: usize,
    pub lap_encoding: Option<LapEncoding>,
    pub lap_separators: Vec<LapSeparator>,
    pub lap_segments: Vec<LapSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetTotals {
    pub sessions: usize,
    pub duration_seconds: u64,
    pub with_hr: usize,
    pub with_gps: usize,
    pub distance_meters: f64,
    pub basic_only: usize,
}

/// Over øktenes sammendragsfelt, ikke rå samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalHr {
    pub avg: Option<f64>,
    pub max: Option<u16>,
    pub min: Option<u16>,
    /// Økter med gyldig `hr_avg` bak snittet.
    pub sessions: usize,
}

/// Månedsserier, alltid i kronologisk nøkkelrekkefølge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub sessions: BTreeMap<String, usize>,
    pub duration_seconds: BTreeMap<String, u64>,
    /// Timer per måned, én desimal.
    pub hours: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSession {
    pub id: Option<String>,
    pub start_time: NaiveDateTime,
    pub duration_seconds: u32,
    pub hr_avg: Option<u16>,
    pub num_laps: Option<u32>,
    pub distance_meters: Option<f64>,
    pub basic_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrTrendPoint {
    pub start_time: NaiveDateTime,
    pub hr_avg: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    pub totals: FleetTotals,
    pub hr: GlobalHr,
    pub monthly: MonthlySeries,
    /// Nyeste først.
    pub recent: Vec<RecentSession>,
    /// Eldste først.
    pub hr_trend: Vec<HrTrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    pub sessions: Vec<SessionReport>,
    pub fleet: FleetReport,
    pub export: ExportMeta,
    pub ignored_entries: usize,
}

use serde::{Deserialize, Serialize};

use crate::config::{AnalyticsConfig, ZoneTable};
use crate::filter::{sorted_by_time, ValidSample};
use crate::metrics::percentage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBucket {
    pub zone: u8,
    pub seconds: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDistribution {
    /// Én bøtte per sone i tabellrekkefølge; tom når økten mangler gyldige samples.
    pub buckets: Vec<ZoneBucket>,
    pub total_seconds: u64,
    /// Sekunder i aktive soner (Z2–Z5 som standard).
    pub active_seconds: u64,
}

impl ZoneDistribution {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket(&self, zone: u8) -> Option<&ZoneBucket> {
        self.buckets.iter().find(|b| b.zone == zone)
    }

    /// Aktive minutter, rundet ned.
    pub fn active_minutes(&self) -> u64 {
        self.active_seconds / 60
    }
}

/// Første sone der `min <= hr < max`. `None` hvis ingen sone dekker verdien.
pub fn classify(hr: u16, table: &ZoneTable) -> Option<u8> {
    zone_index(hr, table).map(|i| table.zones[i].zone)
}

fn zone_index(hr: u16, table: &ZoneTable) -> Option<usize> {
    table.zones.iter().position(|z| z.contains(hr))
}

/// Tid hver sample "eier": gapet til neste sample, for siste sample gapet
/// til forrige, og `single_sample_seconds` når det bare finnes ett.
///
/// Forventer tidssortert input (via `sorted_by_time`).
fn sample_intervals(sorted: &[ValidSample], single_sample_seconds: u32) -> Vec<u64> {
    let n = sorted.len();
    (0..n)
        .map(|i| {
            if i + 1 < n {
                u64::from(sorted[i + 1].time_seconds.saturating_sub(sorted[i].time_seconds))
            } else if i > 0 {
                u64::from(sorted[i].time_seconds.saturating_sub(sorted[i - 1].time_seconds))
            } else {
                u64::from(single_sample_seconds)
            }
        })
        .collect()
}

/// Intervallvektet tid i sone for filtrerte samples.
///
/// Samples sorteres på tid først, så usortert kilde gir samme resultat.
pub fn zone_distribution(samples: &[ValidSample], cfg: &AnalyticsConfig) -> ZoneDistribution {
    if samples.is_empty() {
        return ZoneDistribution::default();
    }

    let sorted = sorted_by_time(samples);
    let intervals = sample_intervals(&sorted, cfg.single_sample_seconds);

    let mut seconds = vec![0u64; cfg.zones.len()];
    for (s, dt) in sorted.iter().zip(intervals) {
        if let Some(i) = zone_index(s.hr, &cfg.zones) {
            seconds[i] += dt;
        }
    }

    let total_seconds: u64 = seconds.iter().sum();
    let active_seconds: u64 = cfg
        .zones
        .zones
        .iter()
        .zip(&seconds)
        .filter(|(z, _)| z.zone >= cfg.first_active_zone)
        .map(|(_, s)| *s)
        .sum();

    let buckets = cfg
        .zones
        .zones
        .iter()
        .zip(&seconds)
        .map(|(z, &secs)| ZoneBucket {
            zone: z.zone,
            seconds: secs,
            percentage: percentage(secs, total_seconds),
        })
        .collect();

    ZoneDistribution { buckets, total_seconds, active_seconds }
}

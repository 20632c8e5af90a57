use serde::{Deserialize, Serialize};

use crate::config::HrBounds;
use crate::filter::ValidSample;
use crate::models::TrainingSession;

/// Null i nevneren gir 0, aldri NaN/inf. Alle andeler og snitt går via denne.
#[inline]
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Andel i prosent (0–100), 0 når totalen er 0.
#[inline]
pub fn percentage(part: u64, total: u64) -> f64 {
    ratio(part as f64, total as f64) * 100.0
}

#[inline]
pub fn mean(xs: &[f64]) -> f64 {
    ratio(xs.iter().sum::<f64>(), xs.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HrSource {
    /// Beregnet fra filtrerte samples.
    Samples,
    /// Ferdige hr_avg/hr_max/hr_min fra eksporten (ingen samples tilgjengelig).
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrStats {
    pub avg: Option<f64>,
    pub max: Option<u16>,
    pub min: Option<u16>,
    /// Antall samples bak tallene (0 for `Summary`).
    pub samples: usize,
    pub source: HrSource,
}

/// Min/maks/snitt over filtrerte samples. `None` hvis tom.
pub fn sample_hr_stats(samples: &[ValidSample]) -> Option<HrStats> {
    if samples.is_empty() {
        return None;
    }
    let hrs: Vec<f64> = samples.iter().map(|s| f64::from(s.hr)).collect();
    Some(HrStats {
        avg: Some(mean(&hrs)),
        max: samples.iter().map(|s| s.hr).max(),
        min: samples.iter().map(|s| s.hr).min(),
        samples: samples.len(),
        source: HrSource::Samples,
    })
}

/// Snitt fra sammendraget, bare hvis innenfor gyldig område.
pub fn summary_hr_avg(session: &TrainingSession, bounds: &HrBounds) -> Option<u16> {
    session
        .hr_avg
        .filter(|hr| bounds.contains(*hr))
        .map(|hr| hr as u16)
}

/// hr_max/hr_min fra sammendraget klemmes inn i gyldig område (som eksporten gjør).
pub fn summary_hr_max(session: &TrainingSession, bounds: &HrBounds) -> Option<u16> {
    session.hr_max.map(|hr| bounds.clamp(hr))
}

pub fn summary_hr_min(session: &TrainingSession, bounds: &HrBounds) -> Option<u16> {
    session.hr_min.map(|hr| bounds.clamp(hr))
}

/// HR-statistikk fra sammendragsfeltene. `None` hvis ingen av dem finnes.
pub fn summary_hr_stats(session: &TrainingSession, bounds: &HrBounds) -> Option<HrStats> {
    let avg = summary_hr_avg(session, bounds);
    let max = summary_hr_max(session, bounds);
    let min = summary_hr_min(session, bounds);
    if avg.is_none() && max.is_none() && min.is_none() {
        return None;
    }
    Some(HrStats {
        avg: avg.map(f64::from),
        max,
        min,
        samples: 0,
        source: HrSource::Summary,
    })
}

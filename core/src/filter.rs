use serde::{Deserialize, Serialize};

use crate::config::HrBounds;
use crate::models::HeartRateSample;

/// Sample som har passert filteret: HR finnes og er innenfor gyldig område.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidSample {
    pub time_seconds: u32,
    pub hr: u16,
}

/// Behold samples med `hr` satt og `min <= hr <= max`. Rekkefølgen bevares.
///
/// Alle som leser HR-verdier går via denne; sensorutfall og artefakter
/// (0, 255, negative) skal aldri påvirke statistikk.
pub fn filter_valid_samples(samples: &[HeartRateSample], bounds: &HrBounds) -> Vec<ValidSample> {
    samples
        .iter()
        .filter_map(|s| match s.hr {
            Some(hr) if bounds.contains(hr) => Some(ValidSample {
                time_seconds: s.time_seconds,
                hr: hr as u16,
            }),
            _ => None,
        })
        .collect()
}

/// Sorter en kopi etter tid (stabil). Kilden er som regel allerede sortert.
pub fn sorted_by_time(samples: &[ValidSample]) -> Vec<ValidSample> {
    let mut out = samples.to_vec();
    if out.windows(2).any(|w| w[1].time_seconds < w[0].time_seconds) {
        out.sort_by_key(|s| s.time_seconds);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(t: u32, hr: Option<i64>) -> HeartRateSample {
        HeartRateSample { time_seconds: t, hr }
    }

    #[test]
    fn bounds_are_inclusive() {
        let samples = [s(0, Some(29)), s(5, Some(30)), s(10, Some(250)), s(15, Some(251))];
        let out = filter_valid_samples(&samples, &HrBounds::default());
        assert_eq!(
            out,
            vec![
                ValidSample { time_seconds: 5, hr: 30 },
                ValidSample { time_seconds: 10, hr: 250 },
            ]
        );
    }

    #[test]
    fn sorting_is_stable_for_equal_times() {
        let v = [
            ValidSample { time_seconds: 10, hr: 120 },
            ValidSample { time_seconds: 0, hr: 90 },
            ValidSample { time_seconds: 10, hr: 121 },
        ];
        let sorted = sorted_by_time(&v);
        assert_eq!(sorted[0].time_seconds, 0);
        assert_eq!(sorted[1].hr, 120);
        assert_eq!(sorted[2].hr, 121);
    }
}

use serde::{Deserialize, Serialize};

use crate::models::LapRecord;

/// Kanonisk lap-grense: absolutt tid (sek) fra øktstart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapSeparator {
    pub lap_number: u32,
    pub time_seconds: u32,
}

/// Tidsrommet én lap dekker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapSegment {
    pub lap_number: u32,
    pub start_seconds: u32,
    pub end_seconds: u32,
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapEncoding {
    AbsoluteTime,
    Duration,
    Approximate,
}

impl LapEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LapEncoding::AbsoluteTime => "absolute_time",
            LapEncoding::Duration => "duration",
            LapEncoding::Approximate => "approximate",
        }
    }

    /// Absolutte formater merker lap-en som *starter* ved grensen;
    /// varighetsformatet merker lap-en som *slutter* der.
    pub fn separator_opens_lap(&self) -> bool {
        !matches!(self, LapEncoding::Duration)
    }
}

/// Et tidspunkt med valgfritt lap-nummer fra kilden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedLap {
    pub lap_number: Option<u32>,
    /// Manglende verdi teller som 0 og filtreres bort.
    pub at_seconds: i64,
}

/// Lap-sekvens etter at formatet er bestemt. Formatet avgjøres én gang,
/// fra første element, og blandes aldri innenfor en sekvens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LapSequence {
    AbsoluteTime(Vec<TimedLap>),
    /// Varighet per lap; manglende varighet bidrar med 0.
    Duration(Vec<i64>),
    Approximate(Vec<TimedLap>),
}

impl LapSequence {
    /// `None` for tom liste eller ukjent (fremtidig) format.
    pub fn from_records(laps: &[LapRecord]) -> Option<Self> {
        let first = laps.first()?;
        if first.time_seconds.is_some() {
            Some(LapSequence::AbsoluteTime(timed(laps, |l| l.time_seconds)))
        } else if first.duration_seconds.is_some() {
            Some(LapSequence::Duration(
                laps.iter().map(|l| l.duration_seconds.unwrap_or(0)).collect(),
            ))
        } else if first.approximate_time_seconds.is_some() {
            Some(LapSequence::Approximate(timed(laps, |l| l.approximate_time_seconds)))
        } else {
            None
        }
    }

    pub fn encoding(&self) -> LapEncoding {
        match self {
            LapSequence::AbsoluteTime(_) => LapEncoding::AbsoluteTime,
            LapSequence::Duration(_) => LapEncoding::Duration,
            LapSequence::Approximate(_) => LapEncoding::Approximate,
        }
    }

    pub fn separators(&self) -> Vec<LapSeparator> {
        match self {
            LapSequence::AbsoluteTime(laps) | LapSequence::Approximate(laps) => {
                absolute_separators(laps)
            }
            LapSequence::Duration(durations) => duration_separators(durations),
        }
    }
}

fn timed(laps: &[LapRecord], field: impl Fn(&LapRecord) -> Option<i64>) -> Vec<TimedLap> {
    laps.iter()
        .map(|l| TimedLap { lap_number: l.lap_number, at_seconds: field(l).unwrap_or(0) })
        .collect()
}

/// Absolutte kuttpunkt; `<= 0` bærer ingen informasjon og droppes.
/// Lap-nummer følger kildefeltet, ellers posisjon + 1.
fn absolute_separators(laps: &[TimedLap]) -> Vec<LapSeparator> {
    laps.iter()
        .enumerate()
        .filter(|(_, l)| l.at_seconds > 0)
        .map(|(i, l)| LapSeparator {
            lap_number: l.lap_number.unwrap_or(i as u32 + 1),
            time_seconds: to_u32(l.at_seconds),
        })
        .collect()
}

/// Løpende sum over alle unntatt siste lap (den slutter med økten).
/// Punkt med sum `<= 0` hoppes over, men summen akkumuleres likevel.
fn duration_separators(durations: &[i64]) -> Vec<LapSeparator> {
    let Some((_, cut)) = durations.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(cut.len());
    let mut cum = 0i64;
    for (i, d) in cut.iter().enumerate() {
        cum = cum.saturating_add(*d);
        if cum > 0 {
            out.push(LapSeparator { lap_number: i as u32 + 1, time_seconds: to_u32(cum) });
        }
    }
    out
}

#[inline]
fn to_u32(x: i64) -> u32 {
    u32::try_from(x).unwrap_or(u32::MAX)
}

/// Normaliser en økts rå laps til lap-grenser. Tom/ukjent => tom.
pub fn normalize_laps(laps: Option<&[LapRecord]>) -> Vec<LapSeparator> {
    laps.and_then(LapSequence::from_records)
        .map(|seq| seq.separators())
        .unwrap_or_default()
}

/// Tving grensene til å være strengt stigende og innenfor `[0, duration]`.
///
/// En grense som ikke ligger etter forrige beholdte grense (duplikat eller
/// baklengs, f.eks. fra negativ varighet) droppes. `duration_seconds == 0`
/// betyr ukjent varighet: da finnes ingen øvre grense og bare rekkefølgen
/// håndheves.
pub fn bound_to_session(separators: Vec<LapSeparator>, duration_seconds: u32) -> Vec<LapSeparator> {
    let before = separators.len();
    let mut kept: Vec<LapSeparator> = Vec::with_capacity(before);
    for s in separators {
        if duration_seconds > 0 && s.time_seconds > duration_seconds {
            continue;
        }
        if s.time_seconds == 0 || kept.last().map_or(false, |p| s.time_seconds <= p.time_seconds) {
            continue;
        }
        kept.push(s);
    }
    if kept.len() < before {
        log::debug!(
            "dropped {} lap separators (out of order or past session end {}s)",
            before - kept.len(),
            duration_seconds
        );
    }
    kept
}

/// Segment per lap mellom grensene, pluss siste segment frem til øktslutt
/// hvis økten varer lenger enn siste grense.
///
/// Lap-nummer følger formatets betydning av grensen (se
/// `LapEncoding::separator_opens_lap`). Gir kilden ikke entydige, stigende
/// nummer, nummereres segmentene etter posisjon.
pub fn lap_segments(
    separators: &[LapSeparator],
    duration_seconds: u32,
    encoding: LapEncoding,
) -> Vec<LapSegment> {
    let Some(last) = separators.last() else {
        return Vec::new();
    };

    let mut bounds: Vec<u32> = Vec::with_capacity(separators.len() + 2);
    bounds.push(0);
    bounds.extend(separators.iter().map(|s| s.time_seconds));
    if duration_seconds > last.time_seconds {
        bounds.push(duration_seconds);
    }

    let labels = segment_labels(separators, encoding);
    bounds
        .windows(2)
        .zip(labels)
        .map(|(w, lap_number)| LapSegment {
            lap_number,
            start_seconds: w[0],
            end_seconds: w[1],
            duration_seconds: w[1].saturating_sub(w[0]),
        })
        .collect()
}

/// `separators.len() + 1` etiketter, én per mulig segment.
fn segment_labels(separators: &[LapSeparator], encoding: LapEncoding) -> Vec<u32> {
    let nums: Vec<u32> = separators.iter().map(|s| s.lap_number).collect();
    let labels: Vec<u32> = match (nums.first(), nums.last()) {
        (Some(first), _) if encoding.separator_opens_lap() => {
            std::iter::once(first.saturating_sub(1)).chain(nums.iter().copied()).collect()
        }
        (_, Some(last)) => nums.iter().copied().chain(std::iter::once(last.saturating_add(1))).collect(),
        _ => Vec::new(),
    };
    let usable = labels.first().map_or(false, |n| *n >= 1) && labels.windows(2).all(|w| w[0] < w[1]);
    if usable {
        labels
    } else {
        (1..=nums.len() as u32 + 1).collect()
    }
}

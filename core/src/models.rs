use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_path_to_error as spte;

use crate::error::{json_kind, EngineError};

// ──────────────────────────────────────────────────────────────────────────────
// INPUT-MODELL: allerede dekodet JSON fra eksporten, ikke skjemavalidert.
// Alle felt er tolerante: feil type => None/default, aldri en feil.
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub time_seconds: u32,
    pub hr: Option<i64>,
}

/// Rå lap slik eksporten skriver den. Hvilket felt som er satt varierer med
/// eksportversjonen; se `laps::LapSequence` for tolkningen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapRecord {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub lap_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub time_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub duration_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub approximate_time_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub duration_seconds: u32,
    #[serde(default, deserialize_with = "lenient::opt_samples")]
    pub hr_samples: Option<Vec<HeartRateSample>>,
    #[serde(default, deserialize_with = "lenient::opt_laps")]
    pub laps: Option<Vec<LapRecord>>,
    #[serde(default, deserialize_with = "lenient::bool_or_false")]
    pub has_hr: bool,
    #[serde(default, deserialize_with = "lenient::bool_or_false")]
    pub has_laps: bool,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub num_laps: Option<u32>,
    /// `None` betyr at eksporten ikke merket økten; bare `Some(false)` er "basic".
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub parseable: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub distance_meters: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub has_gps: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub hr_avg: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub hr_max: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub hr_min: Option<i64>,
}

impl TrainingSession {
    /// Eksporten markerte økten som bare grunnleggende info.
    pub fn is_basic_only(&self) -> bool {
        self.parseable == Some(false)
    }

    /// Kan vise HR-tidslinje: har HR og minst ett rått sample.
    pub fn has_hr_detail(&self) -> bool {
        self.has_hr && self.hr_samples.as_ref().map_or(false, |s| !s.is_empty())
    }

    /// GPS: eksplisitt flagg hvis eksporten har det, ellers positiv distanse.
    pub fn has_gps_data(&self) -> bool {
        match self.has_gps {
            Some(flag) => flag,
            None => self.distance_meters.map_or(false, |d| d > 0.0),
        }
    }

    /// Månedsnøkkel `YYYY-MM` fra starttid.
    pub fn month_key(&self) -> Option<String> {
        self.start_time.map(|t| t.format("%Y-%m").to_string())
    }
}

/// Metadata fra eksport-konvolutten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub export_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub total_sessions: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub sessions_fully_parseable: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub sessions_basic_info_only: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingExport {
    pub meta: ExportMeta,
    pub sessions: Vec<TrainingSession>,
    /// Elementer i `sessions` som ikke var objekter.
    pub ignored_entries: usize,
}

impl TrainingExport {
    /// Hent ut øktene fra en dekodet blob.
    ///
    /// Eneste harde feil: `sessions` mangler eller er ikke en liste.
    pub fn from_value(value: &Value) -> Result<Self, EngineError> {
        let obj = value
            .as_object()
            .ok_or(EngineError::NotAnObject { found: json_kind(value) })?;

        let raw_sessions = match obj.get("sessions") {
            None | Some(Value::Null) => return Err(EngineError::MissingSessions),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(EngineError::SessionsNotSequence { found: json_kind(other) })
            }
        };

        // Konvolutten er valgfri; feil her gir bare tom metadata.
        let meta = ExportMeta::deserialize(value).unwrap_or_default();

        let mut sessions = Vec::with_capacity(raw_sessions.len());
        let mut ignored_entries = 0usize;
        for (i, raw) in raw_sessions.iter().enumerate() {
            if !raw.is_object() {
                log::warn!("sessions[{}] ignored: expected object, found {}", i, json_kind(raw));
                ignored_entries += 1;
                continue;
            }
            let parsed: Result<TrainingSession, _> = spte::deserialize(raw);
            match parsed {
                Ok(s) => sessions.push(s),
                Err(e) => {
                    log::warn!(
                        "sessions[{}] ignored ({}): {} at {}",
                        i,
                        json_kind(raw),
                        e.inner(),
                        e.path()
                    );
                    ignored_entries += 1;
                }
            }
        }

        log::debug!(
            "decoded {} sessions ({} ignored entries)",
            sessions.len(),
            ignored_entries
        );

        Ok(Self { meta, sessions, ignored_entries })
    }
}

/// Tolerante feltlesere. Hver leser tar imot hva som helst og gir `None`
/// (eller standardverdi) når typen ikke passer.
pub(crate) mod lenient {
    use super::*;

    /// Heltall fra JSON-tall; flyttall avrundes.
    pub(crate) fn as_i64(v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|x| x.is_finite() && x.abs() < i64::MAX as f64)
                    .map(|x| x.round() as i64)
            }),
            _ => None,
        }
    }

    pub(crate) fn as_u32(v: &Value) -> Option<u32> {
        as_i64(v).and_then(|x| u32::try_from(x).ok())
    }

    pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            // Behold lokal veggklokke-tid; måneden skal følge klokken på håndleddet.
            return Some(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }

    fn sample(v: &Value) -> Option<HeartRateSample> {
        let obj = v.as_object()?;
        let time_seconds = obj.get("time_seconds").and_then(as_u32)?;
        let hr = obj.get("hr").and_then(as_i64);
        Some(HeartRateSample { time_seconds, hr })
    }

    pub(crate) fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(as_i64(&Value::deserialize(d)?))
    }

    pub(crate) fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(as_u32(&Value::deserialize(d)?))
    }

    pub(crate) fn u32_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(opt_u32(d)?.unwrap_or(0))
    }

    pub(crate) fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Value::deserialize(d)?.as_f64().filter(|x| x.is_finite()))
    }

    pub(crate) fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(Value::deserialize(d)?.as_bool())
    }

    pub(crate) fn bool_or_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(opt_bool(d)?.unwrap_or(false))
    }

    pub(crate) fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub(crate) fn opt_timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => {
                let parsed = parse_timestamp(&s);
                if parsed.is_none() {
                    log::warn!("unparseable timestamp {:?}", s);
                }
                parsed
            }
            _ => None,
        })
    }

    /// Samples uten gyldig `time_seconds` kan ikke plasseres og droppes.
    pub(crate) fn opt_samples<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<HeartRateSample>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => Some(items.iter().filter_map(sample).collect()),
            _ => None,
        })
    }

    /// Laps beholder posisjonen sin (varighetssummen og lap-nummer avhenger av den),
    /// så ikke-objekter blir en tom `LapRecord`.
    pub(crate) fn opt_laps<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<LapRecord>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| LapRecord::deserialize(v).unwrap_or_default())
                    .collect(),
            ),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrong_types_degrade_to_none() {
        let s: TrainingSession = serde_json::from_value(json!({
            "start_time": 12345,
            "duration_seconds": "long",
            "hr_avg": "n/a",
            "has_hr": "yes",
            "laps": {"not": "a list"}
        }))
        .unwrap();
        assert_eq!(s.start_time, None);
        assert_eq!(s.duration_seconds, 0);
        assert_eq!(s.hr_avg, None);
        assert!(!s.has_hr);
        assert_eq!(s.laps, None);
    }

    #[test]
    fn samples_without_time_are_dropped() {
        let s: TrainingSession = serde_json::from_value(json!({
            "hr_samples": [
                {"time_seconds": 0, "hr": 90},
                {"hr": 100},
                {"time_seconds": -5, "hr": 100},
                {"time_seconds": 10, "hr": null},
                "garbage"
            ]
        }))
        .unwrap();
        let samples = s.hr_samples.unwrap();
        assert_eq!(
            samples,
            vec![
                HeartRateSample { time_seconds: 0, hr: Some(90) },
                HeartRateSample { time_seconds: 10, hr: None },
            ]
        );
    }

    #[test]
    fn null_lap_field_is_not_present() {
        let lap: LapRecord =
            serde_json::from_value(json!({"time_seconds": null, "duration_seconds": 300})).unwrap();
        assert_eq!(lap.time_seconds, None);
        assert_eq!(lap.duration_seconds, Some(300));
    }

    #[test]
    fn float_seconds_are_rounded() {
        let lap: LapRecord =
            serde_json::from_value(json!({"approximate_time_seconds": 599.6})).unwrap();
        assert_eq!(lap.approximate_time_seconds, Some(600));
    }

    #[test]
    fn timestamp_formats() {
        let iso = lenient::parse_timestamp("2024-01-05T07:30:00").unwrap();
        let frac = lenient::parse_timestamp("2024-01-05T07:30:00.250000").unwrap();
        let offset = lenient::parse_timestamp("2024-01-31T23:30:00-02:00").unwrap();
        let spaced = lenient::parse_timestamp("2024-01-05 07:30:00").unwrap();
        assert_eq!(iso.format("%Y-%m").to_string(), "2024-01");
        assert_eq!(frac.format("%H:%M:%S").to_string(), "07:30:00");
        // Lokal tid beholdes, ikke konvertert til UTC (som ville gitt februar).
        assert_eq!(offset.format("%Y-%m").to_string(), "2024-01");
        assert_eq!(spaced, iso);
        assert!(lenient::parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn gps_falls_back_to_distance() {
        let mut s = TrainingSession { distance_meters: Some(1200.0), ..Default::default() };
        assert!(s.has_gps_data());
        s.has_gps = Some(false);
        assert!(!s.has_gps_data());
        s.has_gps = None;
        s.distance_meters = Some(0.0);
        assert!(!s.has_gps_data());
    }
}

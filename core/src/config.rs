use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::error::ConfigError;

/// Fysiologisk gyldig HR-område (bpm), inklusive begge ender.
pub const HR_MIN_VALID: u16 = 30;
pub const HR_MAX_VALID: u16 = 250;

/// Intervall som krediteres når en økt bare har ett gyldig sample.
pub const SINGLE_SAMPLE_SECONDS: u32 = 5;

pub const RECENT_SESSIONS_LIMIT: usize = 15;
pub const HR_TREND_LIMIT: usize = 20;

static DEFAULT_CONFIG: Lazy<AnalyticsConfig> = Lazy::new(AnalyticsConfig::default);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HrBounds {
    pub min: u16,
    pub max: u16,
}

impl Default for HrBounds {
    fn default() -> Self {
        Self { min: HR_MIN_VALID, max: HR_MAX_VALID }
    }
}

impl HrBounds {
    #[inline]
    pub fn contains(&self, hr: i64) -> bool {
        hr >= i64::from(self.min) && hr <= i64::from(self.max)
    }

    /// Klem en verdi inn i området (brukes for hr_max/hr_min fra sammendrag).
    #[inline]
    pub fn clamp(&self, hr: i64) -> u16 {
        hr.clamp(i64::from(self.min), i64::from(self.max)) as u16
    }
}

/// Én rad i sonetabellen. `max = None` betyr ubegrenset oppover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneBound {
    pub zone: u8,
    pub min: u16,
    #[serde(default)]
    pub max: Option<u16>,
}

impl ZoneBound {
    #[inline]
    pub fn contains(&self, hr: u16) -> bool {
        hr >= self.min && self.max.map_or(true, |max| hr < max)
    }
}

/// Ordnet, sammenhengende sonetabell: [min, max) per sone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTable {
    pub zones: Vec<ZoneBound>,
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self {
            zones: vec![
                ZoneBound { zone: 1, min: 0, max: Some(100) },
                ZoneBound { zone: 2, min: 100, max: Some(130) },
                ZoneBound { zone: 3, min: 130, max: Some(155) },
                ZoneBound { zone: 4, min: 155, max: Some(175) },
                ZoneBound { zone: 5, min: 175, max: None },
            ],
        }
    }
}

impl ZoneTable {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zones.is_empty() {
            return Err(ConfigError::InvalidZoneTable("no zones".into()));
        }
        let last = self.zones.len() - 1;
        for (i, z) in self.zones.iter().enumerate() {
            if usize::from(z.zone) != i + 1 {
                return Err(ConfigError::InvalidZoneTable(format!(
                    "zone at position {} is numbered {}, expected {}",
                    i,
                    z.zone,
                    i + 1
                )));
            }
            match (z.max, i == last) {
                (None, true) => {}
                (None, false) => {
                    return Err(ConfigError::InvalidZoneTable(format!(
                        "only the last zone may be unbounded (zone {})",
                        z.zone
                    )))
                }
                (Some(max), _) if max <= z.min => {
                    return Err(ConfigError::InvalidZoneTable(format!(
                        "zone {} is empty: [{}, {})",
                        z.zone, z.min, max
                    )))
                }
                (Some(max), false) => {
                    let next = self.zones[i + 1].min;
                    if next != max {
                        return Err(ConfigError::InvalidZoneTable(format!(
                            "gap or overlap between zone {} (max {}) and zone {} (min {})",
                            z.zone,
                            max,
                            z.zone + 1,
                            next
                        )));
                    }
                }
                (Some(_), true) => {}
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub hr_bounds: HrBounds,
    pub zones: ZoneTable,
    pub single_sample_seconds: u32,
    /// Første sone som teller som "aktiv" tid (Z2–Z5 som standard).
    pub first_active_zone: u8,
    pub recent_sessions_limit: usize,
    pub hr_trend_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            hr_bounds: HrBounds::default(),
            zones: ZoneTable::default(),
            single_sample_seconds: SINGLE_SAMPLE_SECONDS,
            first_active_zone: 2,
            recent_sessions_limit: RECENT_SESSIONS_LIMIT,
            hr_trend_limit: HR_TREND_LIMIT,
        }
    }
}

impl AnalyticsConfig {
    /// Delt standardkonfig; samme tabell for alle konsumenter.
    pub fn default_ref() -> &'static AnalyticsConfig {
        &DEFAULT_CONFIG
    }

    /// Les config fra JSON. Manglende felt får standardverdier.
    pub fn from_json_str(txt: &str) -> Result<Self, ConfigError> {
        let mut de = serde_json::Deserializer::from_str(txt);
        let cfg: AnalyticsConfig = spte::deserialize(&mut de).map_err(|e| ConfigError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hr_bounds.min > self.hr_bounds.max {
            return Err(ConfigError::InvalidBounds {
                min: self.hr_bounds.min,
                max: self.hr_bounds.max,
            });
        }
        if self.single_sample_seconds == 0 {
            return Err(ConfigError::InvalidValue("single_sample_seconds must be > 0"));
        }
        self.zones.validate()?;
        if usize::from(self.first_active_zone) > self.zones.len() {
            return Err(ConfigError::InvalidValue(
                "first_active_zone is beyond the zone table",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert!(AnalyticsConfig::default().validate().is_ok());
        assert_eq!(AnalyticsConfig::default_ref().zones.len(), 5);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = AnalyticsConfig::from_json_str(r#"{"single_sample_seconds": 1}"#).unwrap();
        assert_eq!(cfg.single_sample_seconds, 1);
        assert_eq!(cfg.hr_bounds, HrBounds::default());
        assert_eq!(cfg.zones, ZoneTable::default());
    }

    #[test]
    fn parse_error_reports_path() {
        let err = AnalyticsConfig::from_json_str(r#"{"hr_bounds": {"min": "x", "max": 200}}"#)
            .unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, "hr_bounds.min"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn gap_between_zones_is_rejected() {
        let table = ZoneTable {
            zones: vec![
                ZoneBound { zone: 1, min: 0, max: Some(100) },
                ZoneBound { zone: 2, min: 110, max: None },
            ],
        };
        assert!(matches!(table.validate(), Err(ConfigError::InvalidZoneTable(_))));
    }

    #[test]
    fn unbounded_middle_zone_is_rejected() {
        let table = ZoneTable {
            zones: vec![
                ZoneBound { zone: 1, min: 0, max: None },
                ZoneBound { zone: 2, min: 100, max: None },
            ],
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let cfg = AnalyticsConfig {
            hr_bounds: HrBounds { min: 200, max: 100 },
            ..AnalyticsConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidBounds { .. })));
    }
}

use once_cell::sync::OnceCell;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::EngineError;
use crate::laps::LapEncoding;

static GLOBAL: OnceCell<EngineMetrics> = OnceCell::new();

/// Tellere for motoren, i eget register (blandes ikke med vertens).
#[derive(Clone)]
pub struct EngineMetrics {
    registry: Registry,
    sessions_analyzed: IntCounter,
    hr_samples_rejected: IntCounter,
    lap_sequences: IntCounterVec,
    entries_ignored: IntCounter,
}

impl EngineMetrics {
    pub fn new() -> Result<Self, EngineError> {
        let registry = Registry::new();

        let sessions_analyzed = IntCounter::with_opts(Opts::new(
            "sessiongraph_sessions_analyzed_total",
            "Sessions run through the session aggregator",
        ))?;
        let hr_samples_rejected = IntCounter::with_opts(Opts::new(
            "sessiongraph_hr_samples_rejected_total",
            "Heart-rate samples missing or outside the valid range",
        ))?;
        let lap_sequences = IntCounterVec::new(
            Opts::new(
                "sessiongraph_lap_sequences_total",
                "Lap sequences normalized, by detected encoding",
            ),
            &["encoding"],
        )?;
        let entries_ignored = IntCounter::with_opts(Opts::new(
            "sessiongraph_entries_ignored_total",
            "Entries of `sessions` that were not session objects",
        ))?;

        registry.register(Box::new(sessions_analyzed.clone()))?;
        registry.register(Box::new(hr_samples_rejected.clone()))?;
        registry.register(Box::new(lap_sequences.clone()))?;
        registry.register(Box::new(entries_ignored.clone()))?;

        Ok(Self {
            registry,
            sessions_analyzed,
            hr_samples_rejected,
            lap_sequences,
            entries_ignored,
        })
    }

    /// Prosessvid instans. `None` hvis registreringen feilet (logges).
    pub fn global() -> Option<&'static EngineMetrics> {
        match GLOBAL.get_or_try_init(EngineMetrics::new) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("engine metrics unavailable: {}", e);
                None
            }
        }
    }

    pub fn record_session(&self, rejected_samples: usize, lap_encoding: Option<LapEncoding>) {
        self.sessions_analyzed.inc();
        self.hr_samples_rejected.inc_by(rejected_samples as u64);
        if let Some(enc) = lap_encoding {
            self.lap_sequences.with_label_values(&[enc.as_str()]).inc();
        }
    }

    pub fn record_ignored(&self, entries: usize) {
        self.entries_ignored.inc_by(entries as u64);
    }

    pub fn sessions_analyzed(&self) -> u64 {
        self.sessions_analyzed.get()
    }

    pub fn hr_samples_rejected(&self) -> u64 {
        self.hr_samples_rejected.get()
    }

    pub fn lap_sequences(&self, encoding: LapEncoding) -> u64 {
        self.lap_sequences.with_label_values(&[encoding.as_str()]).get()
    }

    pub fn entries_ignored(&self) -> u64 {
        self.entries_ignored.get()
    }

    /// Prometheus tekstformat.
    pub fn render_text(&self) -> Result<String, EngineError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

use serde_json::Value;

use crate::analyze_session::analyze_session;
use crate::config::AnalyticsConfig;
use crate::error::EngineError;
use crate::fleet::aggregate_fleet;
use crate::models::{ExportMeta, TrainingExport, TrainingSession};
use crate::telemetry::EngineMetrics;
use crate::types::{ExportReport, SessionReport};

/// Inngangen presentasjonslaget kaller: dekodet eksport inn, rapport ut.
///
/// Holder ingen tilstand mellom kall utover config og (valgfrie) tellere;
/// samme input gir alltid samme rapport.
#[derive(Clone, Copy)]
pub struct Analyzer<'a> {
    config: &'a AnalyticsConfig,
    metrics: Option<&'a EngineMetrics>,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default_ref())
    }
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a AnalyticsConfig) -> Self {
        Self { config, metrics: None }
    }

    pub fn with_metrics(mut self, metrics: &'a EngineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        self.config
    }

    /// Analyser en hel eksport. Feiler bare når `sessions` mangler eller
    /// ikke er en liste; alt annet degraderes per økt.
    pub fn analyze_export(&self, blob: &Value) -> Result<ExportReport, EngineError> {
        let export = TrainingExport::from_value(blob)?;
        if let Some(m) = self.metrics {
            m.record_ignored(export.ignored_entries);
        }
        let mut report = self.report(&export.sessions, export.meta);
        report.ignored_entries = export.ignored_entries;
        Ok(report)
    }

    /// For kall som allerede har typede økter.
    pub fn analyze_sessions(&self, sessions: &[TrainingSession]) -> ExportReport {
        self.report(sessions, ExportMeta::default())
    }

    /// Som `analyze_export`, men som JSON-verdi.
    pub fn analyze_to_value(&self, blob: &Value) -> Result<Value, EngineError> {
        let report = self.analyze_export(blob)?;
        Ok(serde_json::to_value(report)?)
    }

    fn report(&self, sessions: &[TrainingSession], meta: ExportMeta) -> ExportReport {
        let per_session: Vec<SessionReport> = sessions
            .iter()
            .map(|s| {
                let r = analyze_session(s, self.config);
                if let Some(m) = self.metrics {
                    m.record_session(r.rejected_samples, r.lap_encoding);
                }
                r
            })
            .collect();

        if let Some(declared) = meta.total_sessions {
            if declared as usize != sessions.len() {
                log::warn!(
                    "export declares {} sessions, found {}",
                    declared,
                    sessions.len()
                );
            }
        }

        ExportReport {
            sessions: per_session,
            fleet: aggregate_fleet(sessions, self.config),
            export: meta,
            ignored_entries: 0,
        }
    }
}

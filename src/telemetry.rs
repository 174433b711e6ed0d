//! Fire-and-forget usage telemetry.
//!
//! Sinks may fail; [`emit`] logs the failure and never passes it on, so a
//! broken sink cannot affect an analysis.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::issue::Severity;
use crate::result::AnalysisResult;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AnalysisCompleted,
    /// Analysis stopped at an unclosed quote.
    AnalysisAborted,
    AnalysisCancelled,
    IssuesExported,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::AnalysisCompleted => "analysis_completed",
            EventKind::AnalysisAborted => "analysis_aborted",
            EventKind::AnalysisCancelled => "analysis_cancelled",
            EventKind::IssuesExported => "issues_exported",
        };
        f.write_str(name)
    }
}

/// One telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub row_count: Option<usize>,
    pub column_count: Option<usize>,
    pub file_size: usize,
    pub issue_count: usize,
    pub message: Option<String>,
}

impl TelemetryEvent {
    pub fn new(kind: EventKind, file_size: usize) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            row_count: None,
            column_count: None,
            file_size,
            issue_count: 0,
            message: None,
        }
    }

    /// Summarize a finished analysis.
    pub fn for_result(result: &AnalysisResult) -> Self {
        let kind = if result.is_aborted() {
            EventKind::AnalysisAborted
        } else {
            EventKind::AnalysisCompleted
        };
        let errors = result.count_by_severity(Severity::Error);

        Self {
            row_count: result.row_count,
            column_count: result.column_count,
            issue_count: result.issues.len(),
            message: (errors > 0).then(|| format!("{errors} error(s)")),
            ..Self::new(kind, result.byte_size)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Destination for telemetry events.
pub trait TelemetrySink: Send + Sync + fmt::Debug {
    fn record(&self, event: &TelemetryEvent) -> Result<()>;
}

/// Record an event, logging and swallowing any sink failure.
pub fn emit(sink: &dyn TelemetrySink, event: TelemetryEvent) {
    if let Err(err) = sink.record(&event) {
        tracing::warn!(%err, kind = %event.kind, "telemetry sink failed; event dropped");
    }
}

/// Sink that writes events to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, event: &TelemetryEvent) -> Result<()> {
        tracing::info!(
            target: "csv_lint::telemetry",
            kind = %event.kind,
            row_count = ?event.row_count,
            column_count = ?event.column_count,
            file_size = event.file_size,
            issue_count = event.issue_count,
            note = event.message.as_deref().unwrap_or(""),
            "telemetry event"
        );
        Ok(())
    }
}

/// Sink that appends one JSON object per line to a writer.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLinesSink").finish_non_exhaustive()
    }
}

impl<W: Write + Send> TelemetrySink for JsonLinesSink<W> {
    fn record(&self, event: &TelemetryEvent) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, event)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug)]
    struct FailingSink;

    impl TelemetrySink for FailingSink {
        fn record(&self, _event: &TelemetryEvent) -> Result<()> {
            Err(io::Error::other("disk full").into())
        }
    }

    #[test]
    fn test_emit_swallows_failures() {
        emit(&FailingSink, TelemetryEvent::new(EventKind::AnalysisCompleted, 10));
    }

    #[test]
    fn test_json_lines_sink() {
        let sink = JsonLinesSink::new(Vec::new());
        emit(
            &sink,
            TelemetryEvent::new(EventKind::IssuesExported, 42).with_message("3 issues"),
        );
        emit(&sink, TelemetryEvent::new(EventKind::AnalysisCancelled, 7));

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["kind"], "issues_exported");
        assert_eq!(lines[0]["file_size"], 42);
        assert_eq!(lines[0]["message"], "3 issues");
        assert_eq!(lines[1]["kind"], "analysis_cancelled");
        assert!(lines[1]["row_count"].is_null());
    }

    #[test]
    fn test_tracing_sink_never_fails() {
        assert!(TracingSink.record(&TelemetryEvent::new(EventKind::AnalysisCompleted, 1)).is_ok());
    }
}

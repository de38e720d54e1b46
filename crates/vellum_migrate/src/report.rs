// SPDX-License-Identifier: MIT OR Apache-2.0
//! Migration reports returned to the loader.

/// Severity of a report entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    /// Expected repair or noteworthy change
    Info,
    /// An entity was left unconverted
    Warning,
}

/// One report entry, naming the affected entity
#[derive(Debug, Clone)]
pub struct Report {
    /// Severity
    pub level: ReportLevel,
    /// Name of the affected entity
    pub entity: String,
    /// Human readable message
    pub message: String,
}

/// Accumulated reports and summary counters for one load.
///
/// Migration never aborts; everything that could not be converted cleanly
/// ends up here for the host to surface after the document finishes loading.
#[derive(Debug, Default)]
pub struct Reports {
    /// Ordered report entries
    pub entries: Vec<Report>,
    /// Count of legacy references that could not be resolved
    pub unresolved_references: usize,
}

impl Reports {
    /// Create an empty report list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational entry
    pub fn info(&mut self, entity: impl Into<String>, message: impl Into<String>) {
        let entity = entity.into();
        let message = message.into();
        tracing::info!(entity = %entity, "{message}");
        self.entries.push(Report {
            level: ReportLevel::Info,
            entity,
            message,
        });
    }

    /// Record a warning entry
    pub fn warn(&mut self, entity: impl Into<String>, message: impl Into<String>) {
        let entity = entity.into();
        let message = message.into();
        tracing::warn!(entity = %entity, "{message}");
        self.entries.push(Report {
            level: ReportLevel::Warning,
            entity,
            message,
        });
    }

    /// Number of warning entries
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|r| r.level == ReportLevel::Warning)
            .count()
    }
}

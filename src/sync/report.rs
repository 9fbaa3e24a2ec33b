//! Structured results of a sync run.
//!
//! Non-fatal events are collected as [`Diagnostic`]s next to the per-file
//! outcomes instead of only being logged, so callers can inspect or print
//! them. Every diagnostic is also emitted through `tracing` when recorded.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::manifest::{Policy, VarMap};
use crate::policy::FileAction;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// A non-fatal event with the manifest location it concerns.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            message: message.into(),
            bundle: None,
            component: None,
            source: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            ..Self::info(message)
        }
    }

    pub fn in_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = Some(bundle.into());
        self
    }

    pub fn in_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn for_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.level == DiagnosticLevel::Warning
    }
}

/// Outcome for one file that reached its policy handler.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub bundle: String,
    pub component: String,
    pub source: String,
    pub destination: PathBuf,
    pub policy: Policy,
    pub action: FileAction,
    /// Effective variables the file was resolved with.
    #[serde(skip_serializing_if = "VarMap::is_empty")]
    pub vars: VarMap,
}

/// Everything a run decided and did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// When true, `files` lists predicted actions and nothing was written.
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Record a diagnostic and mirror it to the log.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Info => info!("{}", diagnostic.message),
            DiagnosticLevel::Warning => warn!("{}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Number of files with the given action.
    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }

    /// Number of files whose destination is (or would be) written.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.action.writes()).count()
    }

    /// Outcome for a catalog source path, if it was processed.
    pub fn file(&self, source: &str) -> Option<&FileOutcome> {
        self.files.iter().find(|f| f.source == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(source: &str, action: FileAction) -> FileOutcome {
        FileOutcome {
            bundle: "b".into(),
            component: "c".into(),
            source: source.into(),
            destination: PathBuf::from(source),
            policy: Policy::Init,
            action,
            vars: VarMap::new(),
        }
    }

    #[test]
    fn counts_actions() {
        let mut report = SyncReport::new(false);
        report.files.push(outcome("a", FileAction::Copied));
        report.files.push(outcome("b", FileAction::Preserved));
        report.files.push(outcome("c", FileAction::Merged));

        assert_eq!(report.count(FileAction::Copied), 1);
        assert_eq!(report.written(), 2);
        assert_eq!(report.file("b").unwrap().action, FileAction::Preserved);
    }

    #[test]
    fn separates_warnings() {
        let mut report = SyncReport::new(false);
        report.record(Diagnostic::info("skipped"));
        report.record(Diagnostic::warning("unknown bundle").in_bundle("x"));

        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].bundle.as_deref(), Some("x"));
    }

    #[test]
    fn serializes_without_empty_fields() {
        let mut report = SyncReport::new(true);
        report.record(Diagnostic::warning("w").in_component("c"));
        report.files.push(outcome("a", FileAction::Rendered));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["files"][0]["action"], "rendered");
        assert_eq!(json["files"][0]["policy"], "init");
        assert!(json["files"][0].get("vars").is_none());
        assert_eq!(json["diagnostics"][0]["level"], "warning");
        assert!(json["diagnostics"][0].get("bundle").is_none());
    }
}

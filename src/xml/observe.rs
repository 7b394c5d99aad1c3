use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::NormalizeError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NormalizeSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Where the markup came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlSource {
    /// Markup supplied directly as a string.
    Inline,
    /// Markup read from a file.
    Path(PathBuf),
}

impl fmt::Display for XmlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlSource::Inline => f.write_str("inline"),
            XmlSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Context about one normalization attempt.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// The input source.
    pub source: XmlSource,
    /// The record path in effect, if any.
    pub record_path: Option<String>,
}

/// Minimal stats reported on successful normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Rows in the produced DataFrame.
    pub rows: usize,
    /// Columns in the produced DataFrame.
    pub columns: usize,
}

/// Observer interface for normalization outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait NormalizeObserver: Send + Sync {
    /// Called when normalization succeeds.
    fn on_success(&self, _ctx: &NormalizeContext, _stats: NormalizeStats) {}

    /// Called when normalization fails.
    fn on_failure(
        &self,
        _ctx: &NormalizeContext,
        _severity: NormalizeSeverity,
        _error: &NormalizeError,
    ) {
    }

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(
        &self,
        ctx: &NormalizeContext,
        severity: NormalizeSeverity,
        error: &NormalizeError,
    ) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn NormalizeObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn NormalizeObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl NormalizeObserver for CompositeObserver {
    fn on_success(&self, ctx: &NormalizeContext, stats: NormalizeStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(
        &self,
        ctx: &NormalizeContext,
        severity: NormalizeSeverity,
        error: &NormalizeError,
    ) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(
        &self,
        ctx: &NormalizeContext,
        severity: NormalizeSeverity,
        error: &NormalizeError,
    ) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs normalization events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl NormalizeObserver for StdErrObserver {
    fn on_success(&self, ctx: &NormalizeContext, stats: NormalizeStats) {
        eprintln!(
            "[normalize][ok] source={} record_path={:?} rows={} columns={}",
            ctx.source, ctx.record_path, stats.rows, stats.columns
        );
    }

    fn on_failure(
        &self,
        ctx: &NormalizeContext,
        severity: NormalizeSeverity,
        error: &NormalizeError,
    ) {
        eprintln!(
            "[normalize][{:?}] source={} record_path={:?} err={}",
            severity, ctx.source, ctx.record_path, error
        );
    }

    fn on_alert(
        &self,
        ctx: &NormalizeContext,
        severity: NormalizeSeverity,
        error: &NormalizeError,
    ) {
        eprintln!(
            "[ALERT][normalize][{:?}] source={} record_path={:?} err={}",
            severity, ctx.source, ctx.record_path, error
        );
    }
}

/// Appends normalization events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl NormalizeObserver for FileObserver {
    fn on_success(&self, ctx: &NormalizeContext, stats: NormalizeStats) {
        self.append_line(&format!(
            "{} ok source={} record_path={:?} rows={} columns={}",
            unix_ts(),
            ctx.source,
            ctx.record_path,
            stats.rows,
            stats.columns
        ));
    }

    fn on_failure(
        &self,
        ctx: &NormalizeContext,
        severity: NormalizeSeverity,
        error: &NormalizeError,
    ) {
        self.append_line(&format!(
            "{} fail severity={:?} source={} record_path={:?} err={}",
            unix_ts(),
            severity,
            ctx.source,
            ctx.record_path,
            error
        ));
    }

    fn on_alert(
        &self,
        ctx: &NormalizeContext,
        severity: NormalizeSeverity,
        error: &NormalizeError,
    ) {
        self.append_line(&format!(
            "{} ALERT severity={:?} source={} record_path={:?} err={}",
            unix_ts(),
            severity,
            ctx.source,
            ctx.record_path,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

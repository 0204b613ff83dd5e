//! Typed progress events for an upload run.
//!
//! Events are transient status reports, one per attempted file plus a single
//! terminal event per run. Consumers implement [`ProgressSink`]; closures get
//! a blanket impl so a CLI renderer and a test collector look the same to the
//! uploader.

/// Status of a single progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// A file upload attempt is starting.
    Uploading,
    /// Terminal: the whole run completed.
    Success,
    /// Terminal: the run aborted on this file.
    Error,
}

/// A discrete status report emitted after each file attempt.
///
/// `current` never decreases within a run and never exceeds `total`. Exactly
/// one terminal event (`Success` or `Error`) is emitted per run, as the last
/// event.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    /// 1-based index of the file this event refers to (== `total` for the
    /// terminal success event).
    pub current: usize,
    /// Number of files in the run.
    pub total: usize,
    /// Repo-relative path of the file in flight; empty on the terminal
    /// success event.
    pub current_file: String,
    pub status: UploadStatus,
    /// Human-readable description, including remote error detail on failure.
    pub message: String,
}

/// Receiver for progress events, invoked synchronously after every attempt.
pub trait ProgressSink {
    fn emit(&mut self, progress: UploadProgress);
}

impl<F: FnMut(UploadProgress)> ProgressSink for F {
    fn emit(&mut self, progress: UploadProgress) {
        self(progress)
    }
}

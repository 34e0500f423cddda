//! Background execution with a single-flight gate.
//!
//! [`RenameWorker::start`] validates a request on the caller's thread, then
//! runs the rename on a dedicated thread. The returned [`RenameHandle`]
//! resolves exactly once. While a rename runs, further starts are refused.
//!
//! A rename that fails partway leaves the gate jammed: the completion path
//! that reopens it never runs. [`RenameWorker::rearm`] clears that state.

use crate::renamer::{RenameError, RenameReport, RenameResult};
use crate::request::RenameRequest;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Idle,
    Running,
    Jammed,
}

/// Starts renames on a background thread, at most one at a time.
#[derive(Debug, Clone)]
pub struct RenameWorker {
    gate: Arc<Mutex<GateState>>,
}

impl Default for RenameWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl RenameWorker {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Mutex::new(GateState::Idle)),
        }
    }

    fn lock(gate: &Mutex<GateState>) -> MutexGuard<'_, GateState> {
        gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns true while a new rename cannot be started.
    pub fn is_busy(&self) -> bool {
        *Self::lock(&self.gate) != GateState::Idle
    }

    /// Returns true if the last rename failed and the gate was never reopened.
    pub fn is_jammed(&self) -> bool {
        *Self::lock(&self.gate) == GateState::Jammed
    }

    /// Reopens a jammed gate. Returns false if there was nothing to clear.
    pub fn rearm(&self) -> bool {
        let mut state = Self::lock(&self.gate);
        if *state == GateState::Jammed {
            *state = GateState::Idle;
            true
        } else {
            false
        }
    }

    /// Validates `request` and starts renaming in the background.
    ///
    /// Validation errors are returned here, before any thread is spawned and
    /// before the gate closes.
    ///
    /// # Errors
    ///
    /// * `Busy` if a rename is running
    /// * `Jammed` if the last rename failed and the gate was not re-armed
    /// * any error from [`RenameRequest::prepare`]
    /// * `WorkerFailed` if the thread could not be spawned
    pub fn start(&self, request: &RenameRequest) -> RenameResult<RenameHandle> {
        let mut state = Self::lock(&self.gate);
        match *state {
            GateState::Running => return Err(RenameError::Busy),
            GateState::Jammed => return Err(RenameError::Jammed),
            GateState::Idle => {}
        }

        let prepared = request.prepare()?;
        *state = GateState::Running;
        drop(state);

        let (sender, receiver) = mpsc::channel();
        let gate = Arc::clone(&self.gate);

        let spawned = thread::Builder::new()
            .name("multirename-worker".to_string())
            .spawn(move || {
                let result = prepared.execute();
                // The gate must be settled before the caller hears back.
                *Self::lock(&gate) = match &result {
                    Ok(_) => GateState::Idle,
                    Err(e) => {
                        log::error!("Rename aborted: {}", e);
                        GateState::Jammed
                    }
                };
                let _ = sender.send(result);
            });

        match spawned {
            Ok(thread) => Ok(RenameHandle {
                receiver,
                thread: Some(thread),
            }),
            Err(e) => {
                *Self::lock(&self.gate) = GateState::Idle;
                Err(RenameError::WorkerFailed {
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Completion handle for a background rename.
#[derive(Debug)]
pub struct RenameHandle {
    receiver: Receiver<RenameResult<RenameReport>>,
    thread: Option<JoinHandle<()>>,
}

impl RenameHandle {
    /// Blocks until the rename finishes.
    pub fn wait(mut self) -> RenameResult<RenameReport> {
        let result = self.receiver.recv().map_err(|_| RenameError::WorkerFailed {
            reason: "worker exited without reporting".to_string(),
        });
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        result?
    }

    /// Polls for completion without blocking.
    ///
    /// Returns `None` while the rename is still running. The outcome is
    /// delivered once; later calls return `WorkerFailed`.
    pub fn try_wait(&mut self) -> Option<RenameResult<RenameReport>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                if let Some(thread) = self.thread.take() {
                    let _ = thread.join();
                }
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(RenameError::WorkerFailed {
                reason: "worker exited without reporting".to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_start_and_wait_reopens_gate() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("cat.txt"), "x").expect("Failed to write test file");

        let worker = RenameWorker::new();
        let request =
            RenameRequest::new(temp_dir.path().to_string_lossy(), Vec::new()).with_row("cat", "dog");

        let handle = worker.start(&request).expect("start failed");
        let report = handle.wait().expect("rename failed");

        assert_eq!(report.renames.len(), 1);
        assert!(!worker.is_busy());
        assert!(temp_dir.path().join("dog.txt").exists());
    }

    #[test]
    fn test_try_wait_delivers_result_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("cat.txt"), "x").expect("Failed to write test file");

        let worker = RenameWorker::new();
        let request =
            RenameRequest::new(temp_dir.path().to_string_lossy(), Vec::new()).with_row("cat", "dog");
        let mut handle = worker.start(&request).expect("start failed");

        let result = loop {
            if let Some(result) = handle.try_wait() {
                break result;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        };

        assert_eq!(result.expect("rename failed").renames.len(), 1);
        assert!(matches!(
            handle.try_wait(),
            Some(Err(RenameError::WorkerFailed { .. }))
        ));
    }

    #[test]
    fn test_validation_error_leaves_gate_open() {
        let worker = RenameWorker::new();
        let request = RenameRequest::new("", Vec::new()).with_row("a", "b");

        assert!(matches!(
            worker.start(&request),
            Err(RenameError::InvalidPath { .. })
        ));
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_running_gate_refuses_second_start() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let worker = RenameWorker::new();
        *RenameWorker::lock(&worker.gate) = GateState::Running;

        let request =
            RenameRequest::new(temp_dir.path().to_string_lossy(), Vec::new()).with_row("a", "b");
        assert!(matches!(worker.start(&request), Err(RenameError::Busy)));
    }

    #[test]
    fn test_failure_jams_gate_until_rearmed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), "x").expect("Failed to write test file");

        let worker = RenameWorker::new();
        let request = RenameRequest::new(temp_dir.path().to_string_lossy(), Vec::new())
            .with_row("a.txt", "missing/a.txt");

        let result = worker.start(&request).expect("start failed").wait();
        assert!(matches!(result, Err(RenameError::RenameFailed { .. })));
        assert!(worker.is_jammed());
        assert!(matches!(worker.start(&request), Err(RenameError::Jammed)));

        assert!(worker.rearm());
        assert!(!worker.is_busy());
        assert!(!worker.rearm());
    }
}

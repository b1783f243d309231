//! Compensating actions for multi-file operations.
//!
//! The filesystem gives no transactions, so every completed step registers
//! how to undo itself. On failure the actions run newest first; on success
//! they are discarded. Undo is best effort: a failing action is recorded and
//! the remaining ones still run.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

type UndoAction = Box<dyn FnOnce() -> io::Result<()>>;

/// Stack of pending undo actions.
#[derive(Default)]
pub struct UndoStack {
    actions: Vec<(String, UndoAction)>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an undo action with a short description.
    pub fn push(
        &mut self,
        description: impl Into<String>,
        action: impl FnOnce() -> io::Result<()> + 'static,
    ) {
        self.actions.push((description.into(), Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Keep the work: drop every pending action without running it.
    pub fn commit(mut self) {
        self.actions.clear();
    }

    /// Run every pending action in reverse registration order.
    pub fn unwind(mut self) -> RollbackReport {
        let mut report = RollbackReport::default();

        while let Some((description, action)) = self.actions.pop() {
            match action() {
                Ok(()) => {
                    tracing::debug!("Undone: {}", description);
                    report.undone.push(description);
                }
                Err(e) => {
                    tracing::warn!("Undo failed for {}: {}", description, e);
                    report.failed.push((description, e.to_string()));
                }
            }
        }

        report
    }
}

impl fmt::Debug for UndoStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoStack")
            .field(
                "actions",
                &self.actions.iter().map(|(d, _)| d).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Outcome of unwinding an [`UndoStack`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    /// Actions that ran successfully, newest first.
    pub undone: Vec<String>,
    /// Actions that failed, with the error message.
    pub failed: Vec<(String, String)>,
}

impl RollbackReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove a file if it is there.
///
/// Returns `Ok(true)` if a file was removed and `Ok(false)` if there was
/// nothing to remove.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

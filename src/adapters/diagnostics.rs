use crate::error::ScanError;
use crate::ports::DiagnosticPort;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Logs each diagnostic at warn level and counts them.
#[derive(Debug, Default)]
pub struct TracingDiagnostics {
    reported: AtomicUsize,
}

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.reported.load(Ordering::Relaxed)
    }
}

impl DiagnosticPort for TracingDiagnostics {
    fn report(&self, error: ScanError) {
        self.reported.fetch_add(1, Ordering::Relaxed);
        match &error {
            ScanError::Traversal { .. } => tracing::warn!(kind = "traversal", "{error}"),
            ScanError::FileRead { .. } => tracing::warn!(kind = "file_read", "{error}"),
        }
    }
}

/// Keeps every diagnostic as its rendered message.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // a poisoned list is still a valid list of strings
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticPort for CollectingDiagnostics {
    fn report(&self, error: ScanError) {
        self.lock().push(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn collects_from_many_threads() {
        let diagnostics = Arc::new(CollectingDiagnostics::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let diagnostics = Arc::clone(&diagnostics);
                thread::spawn(move || {
                    diagnostics.report(ScanError::file_read(
                        format!("file-{i}"),
                        io::Error::from(io::ErrorKind::PermissionDenied),
                    ));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(diagnostics.len(), 4);
        assert!(diagnostics.messages().iter().all(|m| m.starts_with("cannot read file-")));
    }

    #[test]
    fn tracing_sink_counts() {
        let diagnostics = TracingDiagnostics::new();
        diagnostics.report(ScanError::traversal(None, "denied"));
        diagnostics.report(ScanError::traversal(None, "vanished"));
        assert_eq!(diagnostics.count(), 2);
    }
}

use crate::domain::{Digest, Grouping, HashAlgorithm};
use crate::error::ScanError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Enumerates regular files under a root. Walk errors go to `diagnostics`
/// and never end the sequence early.
pub trait FileSystemPort {
    fn regular_files<'a>(
        &'a self,
        root: &Path,
        diagnostics: &'a dyn DiagnosticPort,
    ) -> Box<dyn Iterator<Item = PathBuf> + 'a>;
}

pub trait HashingPort {
    fn hash_file(&self, path: &Path, algorithm: HashAlgorithm) -> Result<Digest, ScanError>;
}

/// Sink for non-fatal errors. Shared by the walker and every worker.
pub trait DiagnosticPort: Send + Sync {
    fn report(&self, error: ScanError);
}

pub trait OutputPort {
    fn write_results(&self, results: &Grouping) -> Result<()>;
}

pub trait ProgressPort {
    fn start(&self);
    fn update(&self, processed: u64);
    fn finish(&self);
}

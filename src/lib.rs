//! Content-based duplicate file detection.
//!
//! A single walker feeds regular-file paths to a fixed pool of hashing
//! workers over a rendezvous channel; their digests flow, again through a
//! rendezvous channel, to one aggregator that owns the resulting
//! [`Grouping`](domain::Grouping).
//!
//! ```no_run
//! use dupwalk::adapters::TracingDiagnostics;
//!
//! let diagnostics = TracingDiagnostics::new();
//! let grouping = dupwalk::run("some/dir", 4, &diagnostics)?;
//! for set in grouping.duplicates() {
//!     println!("{} -> {:?}", set.digest, set.paths);
//! }
//! # Ok::<(), dupwalk::error::FinderError>(())
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod ports;
pub mod services;

use adapters::{FileSystemAdapter, MultiAlgorithmHasher, NoProgress};
use domain::{Grouping, ScanConfig};
use error::FinderError;
use ports::DiagnosticPort;
use services::DuplicateFinderService;
use std::path::Path;

/// Walk `root` with `workers` hashing threads using the default adapters
/// (SHA-256, no progress output). Blocks until every file is hashed.
pub fn run(
    root: impl AsRef<Path>,
    workers: usize,
    diagnostics: &dyn DiagnosticPort,
) -> Result<Grouping, FinderError> {
    let config = ScanConfig::new()
        .with_root(root.as_ref())
        .with_workers(workers);
    let finder =
        DuplicateFinderService::new(FileSystemAdapter::new(), MultiAlgorithmHasher::new(), NoProgress);
    finder.find_duplicates(&config, diagnostics)
}

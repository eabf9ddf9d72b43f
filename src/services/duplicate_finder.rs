use crate::domain::{FileDigest, Grouping, HashAlgorithm, ScanConfig};
use crate::error::FinderError;
use crate::ports::{DiagnosticPort, FileSystemPort, HashingPort, ProgressPort};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

/// Walker → hashing workers → aggregator, connected by rendezvous channels.
///
/// The walker owns the only path sender, so its exit is the end-of-stream
/// signal for the workers. Each worker owns a clone of the result sender;
/// the aggregator drains results until every clone is gone and hands the
/// finished `Grouping` back through its join handle. Joining the aggregator,
/// not the workers, is what makes the grouping final.
pub struct DuplicateFinderService<F, H, P> {
    filesystem: F,
    hasher: H,
    progress: P,
}

impl<F, H, P> DuplicateFinderService<F, H, P>
where
    F: FileSystemPort + Sync,
    H: HashingPort + Sync,
    P: ProgressPort + Sync,
{
    pub fn new(filesystem: F, hasher: H, progress: P) -> Self {
        Self {
            filesystem,
            hasher,
            progress,
        }
    }

    pub fn find_duplicates(
        &self,
        config: &ScanConfig,
        diagnostics: &dyn DiagnosticPort,
    ) -> Result<Grouping, FinderError> {
        config.validate()?;

        let started = Instant::now();
        let root = config.root.as_path();
        let algorithm = config.hash_algorithm;

        let (path_tx, path_rx) = bounded::<PathBuf>(0);
        let (result_tx, result_rx) = bounded::<FileDigest>(0);

        tracing::debug!(
            root = %root.display(),
            workers = config.workers,
            algorithm = algorithm.as_str(),
            "starting scan"
        );
        self.progress.start();

        let outcome = thread::scope(|scope| {
            let aggregator = scope.spawn(move || self.aggregate(result_rx));
            let walker = scope.spawn(move || self.walk(root, path_tx, diagnostics));

            let workers: Vec<_> = (0..config.workers)
                .map(|id| {
                    let paths = path_rx.clone();
                    let results = result_tx.clone();
                    scope.spawn(move || self.hash_worker(id, paths, results, algorithm, diagnostics))
                })
                .collect();

            // Only the workers may hold these from here on; otherwise the
            // aggregator would never see its channel close.
            drop(path_rx);
            drop(result_tx);

            let mut hashed = 0usize;
            let mut worker_panicked = false;
            for worker in workers {
                match worker.join() {
                    Ok(count) => hashed += count,
                    Err(_) => worker_panicked = true,
                }
            }
            let enumerated = walker.join();
            let grouping = aggregator.join();

            if worker_panicked {
                return Err(FinderError::WorkerPanicked { stage: "worker" });
            }
            let enumerated = enumerated.map_err(|_| FinderError::WorkerPanicked { stage: "walker" })?;
            let grouping =
                grouping.map_err(|_| FinderError::WorkerPanicked { stage: "aggregator" })?;
            Ok((enumerated, hashed, grouping))
        });

        self.progress.finish();
        let (enumerated, hashed, grouping) = outcome?;

        tracing::info!(
            enumerated,
            hashed,
            skipped = enumerated.saturating_sub(hashed),
            digests = grouping.len(),
            elapsed = ?started.elapsed(),
            "scan complete"
        );

        Ok(grouping)
    }

    /// Path Source stage. Returns how many paths were handed to workers.
    fn walk(&self, root: &Path, paths: Sender<PathBuf>, diagnostics: &dyn DiagnosticPort) -> usize {
        let mut sent = 0;
        for path in self.filesystem.regular_files(root, diagnostics) {
            if paths.send(path).is_err() {
                // every worker is gone
                break;
            }
            sent += 1;
        }
        tracing::debug!(sent, "walker finished");
        sent
    }

    /// One pool member. Returns how many files it hashed successfully.
    fn hash_worker(
        &self,
        id: usize,
        paths: Receiver<PathBuf>,
        results: Sender<FileDigest>,
        algorithm: HashAlgorithm,
        diagnostics: &dyn DiagnosticPort,
    ) -> usize {
        let mut hashed = 0;
        for path in paths.iter() {
            match self.hasher.hash_file(&path, algorithm) {
                Ok(digest) => {
                    tracing::trace!(worker = id, path = %path.display(), %digest, "hashed");
                    if results.send(FileDigest::new(path, digest)).is_err() {
                        break;
                    }
                    hashed += 1;
                }
                Err(err) => diagnostics.report(err),
            }
        }
        tracing::debug!(worker = id, hashed, "worker finished");
        hashed
    }

    fn aggregate(&self, results: Receiver<FileDigest>) -> Grouping {
        let mut grouping = Grouping::new();
        let mut processed = 0u64;
        for entry in results.iter() {
            grouping.insert(entry);
            processed += 1;
            self.progress.update(processed);
        }
        grouping
    }
}

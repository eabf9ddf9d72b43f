use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
    Sha1,
    Md5,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Md5 => "md5",
        }
    }

    /// Length of the rendered hex digest.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 64,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Md5 => 32,
        }
    }
}

/// Lowercase hex fingerprint of a file's full content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Digest(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One successfully hashed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub path: PathBuf,
    pub digest: Digest,
}

impl FileDigest {
    pub fn new(path: PathBuf, digest: Digest) -> Self {
        Self { path, digest }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSet {
    pub digest: Digest,
    pub paths: Vec<PathBuf>,
}

impl DuplicateSet {
    pub fn new(digest: Digest, paths: Vec<PathBuf>) -> Self {
        Self { digest, paths }
    }

    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Digest → paths that produced it, in the order the aggregator saw them.
///
/// Only the aggregator mutates a `Grouping`; callers receive it once the run
/// has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    groups: HashMap<Digest, Vec<PathBuf>>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: FileDigest) {
        self.groups.entry(entry.digest).or_default().push(entry.path);
    }

    pub fn get(&self, digest: &Digest) -> Option<&[PathBuf]> {
        self.groups.get(digest).map(Vec::as_slice)
    }

    /// Number of distinct digests.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of paths across all entries.
    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Digest, Vec<PathBuf>> {
        self.groups.iter()
    }

    /// Entries holding two or more paths, ordered by digest.
    pub fn duplicates(&self) -> Vec<DuplicateSet> {
        let mut sets: Vec<DuplicateSet> = self
            .groups
            .iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(digest, paths)| DuplicateSet::new(digest.clone(), paths.clone()))
            .collect();
        sets.sort_by(|a, b| a.digest.cmp(&b.digest));
        sets
    }
}

impl<'a> IntoIterator for &'a Grouping {
    type Item = (&'a Digest, &'a Vec<PathBuf>);
    type IntoIter = hash_map::Iter<'a, Digest, Vec<PathBuf>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

pub const DEFAULT_MMAP_THRESHOLD: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub workers: usize,
    pub hash_algorithm: HashAlgorithm,
    pub mmap_threshold: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            workers: default_workers(),
            hash_algorithm: HashAlgorithm::default(),
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount { requested: 0 });
        }
        if self.mmap_threshold == 0 {
            return Err(ConfigError::InvalidMmapThreshold);
        }
        Ok(())
    }
}

/// One worker per available CPU, or a single worker if that is unknown.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

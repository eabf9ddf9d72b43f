use crate::domain::{DEFAULT_MMAP_THRESHOLD, Digest, HashAlgorithm};
use crate::error::ScanError;
use crate::ports::HashingPort;
use blake3::Hasher as Blake3Hasher;
use memmap2::MmapOptions;
use sha1::Sha1;
use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming content accumulator, freshly built for every file.
enum Accumulator {
    Sha256(Sha256),
    Blake3(Box<Blake3Hasher>),
    Sha1(Sha1),
    Md5(md5::Context),
}

impl Accumulator {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Accumulator::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => Accumulator::Blake3(Box::new(Blake3Hasher::new())),
            HashAlgorithm::Sha1 => Accumulator::Sha1(Sha1::new()),
            HashAlgorithm::Md5 => Accumulator::Md5(md5::Context::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Accumulator::Sha256(hasher) => hasher.update(data),
            Accumulator::Blake3(hasher) => {
                hasher.update(data);
            }
            Accumulator::Sha1(hasher) => hasher.update(data),
            Accumulator::Md5(hasher) => hasher.consume(data),
        }
    }

    fn finalize(self) -> Digest {
        let hex = match self {
            Accumulator::Sha256(hasher) => format!("{:x}", hasher.finalize()),
            Accumulator::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
            Accumulator::Sha1(hasher) => format!("{:x}", hasher.finalize()),
            Accumulator::Md5(hasher) => format!("{:x}", hasher.compute()),
        };
        Digest::from_hex(hex)
    }
}

pub struct MultiAlgorithmHasher {
    mmap_threshold: u64,
}

impl MultiAlgorithmHasher {
    pub fn new() -> Self {
        Self {
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }

    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    fn hash_with_mmap(&self, file: &File, algorithm: HashAlgorithm) -> io::Result<Digest> {
        // SAFETY: the map is read-only and dropped before this call returns.
        // A concurrent writer truncating the file is outside what we guard.
        let mmap = unsafe { MmapOptions::new().map(file)? };
        let mut accumulator = Accumulator::new(algorithm);
        accumulator.update(&mmap[..]);
        Ok(accumulator.finalize())
    }

    fn hash_with_buffered_io(&self, file: File, algorithm: HashAlgorithm) -> io::Result<Digest> {
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];
        let mut accumulator = Accumulator::new(algorithm);

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            accumulator.update(&buffer[..bytes_read]);
        }

        Ok(accumulator.finalize())
    }

    fn hash_open_file(&self, file: File, algorithm: HashAlgorithm) -> io::Result<Digest> {
        let file_size = file.metadata()?.len();

        if file_size >= self.mmap_threshold {
            self.hash_with_mmap(&file, algorithm)
        } else {
            self.hash_with_buffered_io(file, algorithm)
        }
    }
}

impl Default for MultiAlgorithmHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashingPort for MultiAlgorithmHasher {
    fn hash_file(&self, path: &Path, algorithm: HashAlgorithm) -> Result<Digest, ScanError> {
        File::open(path)
            .and_then(|file| self.hash_open_file(file, algorithm))
            .map_err(|source| ScanError::file_read(path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
    const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";
    const HELLO_SHA1: &str = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn known_digests() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "hello.txt", b"hello");
        let hasher = MultiAlgorithmHasher::new();

        let sha256 = hasher.hash_file(&path, HashAlgorithm::Sha256).unwrap();
        assert_eq!(sha256.as_str(), HELLO_SHA256);
        let md5 = hasher.hash_file(&path, HashAlgorithm::Md5).unwrap();
        assert_eq!(md5.as_str(), HELLO_MD5);
        let sha1 = hasher.hash_file(&path, HashAlgorithm::Sha1).unwrap();
        assert_eq!(sha1.as_str(), HELLO_SHA1);
        let blake3 = hasher.hash_file(&path, HashAlgorithm::Blake3).unwrap();
        assert_eq!(blake3.as_str(), blake3::hash(b"hello").to_hex().as_str());
    }

    #[test]
    fn digest_length_matches_algorithm() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.bin", &[7u8; 1000]);
        let hasher = MultiAlgorithmHasher::new();

        for algorithm in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Blake3,
            HashAlgorithm::Sha1,
            HashAlgorithm::Md5,
        ] {
            let digest = hasher.hash_file(&path, algorithm).unwrap();
            assert_eq!(digest.as_str().len(), algorithm.hex_len(), "{}", algorithm.as_str());
        }
    }

    #[test]
    fn empty_file_hashes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty", b"");
        let digest = MultiAlgorithmHasher::new()
            .hash_file(&path, HashAlgorithm::Sha256)
            .unwrap();
        assert_eq!(digest.as_str(), EMPTY_SHA256);
    }

    #[test]
    fn mmap_and_buffered_paths_agree() {
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
        let path = write(&dir, "large.bin", &content);

        let buffered = MultiAlgorithmHasher::new()
            .hash_file(&path, HashAlgorithm::Sha256)
            .unwrap();
        let mapped = MultiAlgorithmHasher::new()
            .with_mmap_threshold(1)
            .hash_file(&path, HashAlgorithm::Sha256)
            .unwrap();
        assert_eq!(buffered, mapped);
    }

    #[test]
    fn content_does_not_leak_between_files() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "first", b"hello");
        let second = write(&dir, "second", b"hello");
        let hasher = MultiAlgorithmHasher::new();

        let a = hasher.hash_file(&first, HashAlgorithm::Sha256).unwrap();
        let b = hasher.hash_file(&second, HashAlgorithm::Sha256).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let err = MultiAlgorithmHasher::new()
            .hash_file(&missing, HashAlgorithm::Sha256)
            .unwrap_err();

        match err {
            ScanError::FileRead { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected FileRead, got {other:?}"),
        }
    }
}

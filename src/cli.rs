use crate::domain::{DEFAULT_MMAP_THRESHOLD, HashAlgorithm, ScanConfig, default_workers};
use crate::error::ConfigError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum HashAlgorithmChoice {
    #[value(help = "Cryptographic hash")]
    Sha256,
    #[value(help = "Cryptographic hash, faster on large files")]
    Blake3,
    #[value(help = "Legacy hash")]
    Sha1,
    #[value(help = "Legacy hash")]
    Md5,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl From<HashAlgorithmChoice> for HashAlgorithm {
    fn from(choice: HashAlgorithmChoice) -> Self {
        match choice {
            HashAlgorithmChoice::Sha256 => HashAlgorithm::Sha256,
            HashAlgorithmChoice::Blake3 => HashAlgorithm::Blake3,
            HashAlgorithmChoice::Sha1 => HashAlgorithm::Sha1,
            HashAlgorithmChoice::Md5 => HashAlgorithm::Md5,
        }
    }
}

#[derive(Parser)]
#[command(name = "dupwalk")]
#[command(about = "Find files with identical content under a directory")]
#[command(version)]
pub struct Cli {
    #[arg(
        short = 'd',
        long = "dir",
        help = "Directory to search",
        default_value = "."
    )]
    pub dir: PathBuf,

    #[arg(
        short = 'w',
        long = "workers",
        help = "Number of hashing workers [default: number of CPUs]",
        allow_negative_numbers = true
    )]
    pub workers: Option<i64>,

    #[arg(
        short = 'a',
        long = "algorithm",
        help = "Hash algorithm to use",
        value_enum,
        default_value = "sha256"
    )]
    pub hash_algorithm: HashAlgorithmChoice,

    #[arg(
        long = "mmap-threshold",
        help = "File size in bytes from which files are memory mapped",
        default_value_t = DEFAULT_MMAP_THRESHOLD
    )]
    pub mmap_threshold: u64,

    #[arg(
        short = 'f',
        long = "format",
        help = "Output format",
        value_enum,
        default_value = "text"
    )]
    pub output_format: OutputFormat,

    #[arg(
        short = 'o',
        long = "output",
        help = "Output file path (stdout if not specified)"
    )]
    pub output_file: Option<PathBuf>,

    #[arg(
        long = "summary-only",
        help = "Show only summary statistics, not the duplicate groups"
    )]
    pub summary_only: bool,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress progress output and warnings"
    )]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Increase log verbosity (-v debug, -vv trace)",
        action = clap::ArgAction::Count
    )]
    pub verbose: u8,
}

impl Cli {
    pub fn to_scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let workers = match self.workers {
            None => default_workers(),
            Some(requested) => match usize::try_from(requested) {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidWorkerCount { requested }),
            },
        };

        let config = ScanConfig::new()
            .with_root(self.dir.clone())
            .with_workers(workers)
            .with_hash_algorithm(self.hash_algorithm.clone().into())
            .with_mmap_threshold(self.mmap_threshold);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dupwalk").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        let config = cli.to_scan_config().unwrap();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.workers, default_workers());
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
    }

    #[test]
    fn explicit_values() {
        let cli = parse(&["--dir", "/data", "-w", "3", "-a", "blake3", "-f", "json"]);
        let config = cli.to_scan_config().unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.hash_algorithm, HashAlgorithm::Blake3);
        assert!(matches!(cli.output_format, OutputFormat::Json));
    }

    #[test]
    fn zero_and_negative_workers_are_config_errors() {
        for value in ["0", "-2"] {
            let cli = parse(&["--workers", value]);
            let requested: i64 = value.parse().unwrap();
            assert_eq!(
                cli.to_scan_config().unwrap_err(),
                ConfigError::InvalidWorkerCount { requested }
            );
        }
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
    }
}

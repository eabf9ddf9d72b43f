use crate::domain::Grouping;
use crate::ports::OutputPort;
use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

struct OutputWriter {
    output_file: Option<PathBuf>,
}

impl OutputWriter {
    fn new() -> Self {
        Self { output_file: None }
    }

    fn with_file(path: &Path) -> Self {
        Self {
            output_file: Some(path.to_path_buf()),
        }
    }

    fn write_content(&self, content: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => fs::write(path, content)
                .with_context(|| format!("writing report to {}", path.display()))?,
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

pub struct ConsoleOutputAdapter {
    summary_only: bool,
    writer: OutputWriter,
}

impl ConsoleOutputAdapter {
    pub fn new() -> Self {
        Self {
            summary_only: false,
            writer: OutputWriter::new(),
        }
    }

    pub fn with_file(path: &Path) -> Self {
        Self {
            summary_only: false,
            writer: OutputWriter::with_file(path),
        }
    }

    pub fn with_summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }

    pub fn format_report(&self, results: &Grouping) -> String {
        let duplicates = results.duplicates();
        let duplicate_files: usize = duplicates.iter().map(|d| d.duplicate_count()).sum();
        let mut output = String::new();

        if !self.summary_only {
            for set in &duplicates {
                output.push_str(&format!(
                    "Found {} duplicates for {}:\n",
                    set.paths.len(),
                    style(&set.digest).bold()
                ));
                for path in &set.paths {
                    output.push_str(&format!("->  {}\n", path.display()));
                }
            }
            if !duplicates.is_empty() {
                output.push('\n');
            }
        }

        output.push_str(&format!("Files hashed: {}\n", results.file_count()));
        output.push_str(&format!("Distinct contents: {}\n", results.len()));
        output.push_str(&format!("Duplicate groups: {}\n", duplicates.len()));
        output.push_str(&format!("Redundant copies: {}\n", duplicate_files));
        if duplicates.is_empty() {
            output.push_str(&format!("{}\n", style("No duplicates found!").green()));
        }
        output
    }
}

impl Default for ConsoleOutputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for ConsoleOutputAdapter {
    fn write_results(&self, results: &Grouping) -> Result<()> {
        self.writer.write_content(&self.format_report(results))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_hashed: usize,
    distinct_digests: usize,
    duplicates: &'a [crate::domain::DuplicateSet],
}

pub struct JsonOutputAdapter {
    writer: OutputWriter,
}

impl JsonOutputAdapter {
    pub fn with_file(path: &Path) -> Self {
        Self {
            writer: OutputWriter::with_file(path),
        }
    }

    pub fn with_stdout() -> Self {
        Self {
            writer: OutputWriter::new(),
        }
    }

    pub fn format_json(&self, results: &Grouping) -> Result<String> {
        let duplicates = results.duplicates();
        let report = JsonReport {
            files_hashed: results.file_count(),
            distinct_digests: results.len(),
            duplicates: &duplicates,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

impl OutputPort for JsonOutputAdapter {
    fn write_results(&self, results: &Grouping) -> Result<()> {
        let json = self.format_json(results)?;
        self.writer.write_content(&format!("{}\n", json))
    }
}

pub struct CsvOutputAdapter {
    writer: OutputWriter,
}

impl CsvOutputAdapter {
    pub fn with_file(path: &Path) -> Self {
        Self {
            writer: OutputWriter::with_file(path),
        }
    }

    pub fn with_stdout() -> Self {
        Self {
            writer: OutputWriter::new(),
        }
    }

    pub fn format_csv_string(&self, results: &Grouping) -> String {
        let mut output = String::new();
        output.push_str("group_id,digest,file_path,group_size\n");
        for (group_id, set) in results.duplicates().iter().enumerate() {
            for path in &set.paths {
                output.push_str(&format!(
                    "{},{},{},{}\n",
                    group_id + 1,
                    set.digest,
                    csv_field(&path.display().to_string()),
                    set.paths.len()
                ));
            }
        }
        output
    }
}

impl OutputPort for CsvOutputAdapter {
    fn write_results(&self, results: &Grouping) -> Result<()> {
        self.writer.write_content(&self.format_csv_string(results))
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Digest, FileDigest};

    fn sample() -> Grouping {
        let mut grouping = Grouping::new();
        for (path, hex) in [("a.txt", "aa"), ("b.txt", "aa"), ("c.txt", "cc")] {
            grouping.insert(FileDigest::new(PathBuf::from(path), Digest::from_hex(hex)));
        }
        grouping
    }

    #[test]
    fn text_report_lists_only_duplicate_groups() {
        console::set_colors_enabled(false);
        let report = ConsoleOutputAdapter::new().format_report(&sample());

        assert!(report.contains("Found 2 duplicates for aa:"));
        assert!(report.contains("->  a.txt"));
        assert!(report.contains("->  b.txt"));
        assert!(!report.contains("c.txt"));
        assert!(report.contains("Duplicate groups: 1"));
    }

    #[test]
    fn summary_only_omits_paths() {
        let report = ConsoleOutputAdapter::new()
            .with_summary_only(true)
            .format_report(&sample());
        assert!(!report.contains("a.txt"));
        assert!(report.contains("Files hashed: 3"));
    }

    #[test]
    fn json_report_shape() {
        let json = JsonOutputAdapter::with_stdout().format_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["files_hashed"], 3);
        assert_eq!(value["distinct_digests"], 2);
        assert_eq!(value["duplicates"][0]["digest"], "aa");
        assert_eq!(value["duplicates"][0]["paths"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn csv_quotes_awkward_paths() {
        let mut grouping = Grouping::new();
        grouping.insert(FileDigest::new(PathBuf::from("x,1"), Digest::from_hex("dd")));
        grouping.insert(FileDigest::new(PathBuf::from("y"), Digest::from_hex("dd")));

        let csv = CsvOutputAdapter::with_stdout().format_csv_string(&grouping);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "group_id,digest,file_path,group_size");
        assert_eq!(lines[1], "1,dd,\"x,1\",2");
        assert_eq!(lines[2], "1,dd,y,2");
    }

    #[test]
    fn writes_report_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("report.csv");
        CsvOutputAdapter::with_file(&target)
            .write_results(&sample())
            .unwrap();
        let written = fs::read_to_string(&target).unwrap();
        assert!(written.starts_with("group_id,digest"));
    }
}

use anyhow::Result;
use clap::Parser;
use dupwalk::adapters::{
    ConsoleOutputAdapter, CsvOutputAdapter, FileSystemAdapter, JsonOutputAdapter,
    MultiAlgorithmHasher, ProgressBarAdapter, TracingDiagnostics,
};
use dupwalk::cli::{Cli, OutputFormat};
use dupwalk::logging::init_logging;
use dupwalk::ports::OutputPort;
use dupwalk::services::DuplicateFinderService;
use std::process;

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Cli) -> Result<()> {
    let config = args.to_scan_config()?;
    if !args.quiet {
        eprintln!(
            "Searching in {} using {} workers...",
            config.root.display(),
            config.workers
        );
    }

    let filesystem = FileSystemAdapter::new();
    let hasher = MultiAlgorithmHasher::new().with_mmap_threshold(config.mmap_threshold);
    let progress = ProgressBarAdapter::new().with_quiet(args.quiet);
    let diagnostics = TracingDiagnostics::new();

    let finder = DuplicateFinderService::new(filesystem, hasher, progress);
    let grouping = finder.find_duplicates(&config, &diagnostics)?;

    let output: Box<dyn OutputPort> = match (&args.output_format, &args.output_file) {
        (OutputFormat::Text, Some(path)) => {
            Box::new(ConsoleOutputAdapter::with_file(path).with_summary_only(args.summary_only))
        }
        (OutputFormat::Text, None) => {
            Box::new(ConsoleOutputAdapter::new().with_summary_only(args.summary_only))
        }
        (OutputFormat::Json, Some(path)) => Box::new(JsonOutputAdapter::with_file(path)),
        (OutputFormat::Json, None) => Box::new(JsonOutputAdapter::with_stdout()),
        (OutputFormat::Csv, Some(path)) => Box::new(CsvOutputAdapter::with_file(path)),
        (OutputFormat::Csv, None) => Box::new(CsvOutputAdapter::with_stdout()),
    };
    output.write_results(&grouping)?;

    if diagnostics.count() > 0 && !args.quiet {
        eprintln!("{} entries could not be read", diagnostics.count());
    }
    Ok(())
}

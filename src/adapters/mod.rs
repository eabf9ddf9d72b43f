pub mod diagnostics;
pub mod filesystem;
pub mod multi_hasher;
pub mod output;
pub mod progress;

pub use diagnostics::{CollectingDiagnostics, TracingDiagnostics};
pub use filesystem::FileSystemAdapter;
pub use multi_hasher::MultiAlgorithmHasher;
pub use output::{ConsoleOutputAdapter, CsvOutputAdapter, JsonOutputAdapter};
pub use progress::{NoProgress, ProgressBarAdapter};

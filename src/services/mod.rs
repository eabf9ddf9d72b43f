pub mod duplicate_finder;

pub use duplicate_finder::DuplicateFinderService;

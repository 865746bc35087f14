pub mod config;
pub mod delay_manager;
pub mod error;
pub mod extractor;
pub mod input_loader;
pub mod logger;
pub mod output;
pub mod scraper;

// Exporting types for convenience
pub use config::SiteConfig;
pub use error::ScrapeError;
pub use extractor::{Extraction, Extractor, ProfessorRecord, SkipReason};
pub use input_loader::InputRecord;
pub use output::ResultDocument;
pub use scraper::Scraper;

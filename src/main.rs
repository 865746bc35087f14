use professor_scraper_lib::{delay_manager, input_loader, logger, output};
use professor_scraper_lib::{ResultDocument, Scraper, SiteConfig};

use std::error::Error;
use std::path::Path;

use log::{error, info, warn};

const INPUT_FILE: &str = "school_list.csv";
const OUTPUT_FILE: &str = "professor_ratings.json";

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting professor scraper...");

    let records = input_loader::load_records(INPUT_FILE);
    if records.is_empty() {
        error!(
            "No schools found in {}. Ensure the file exists with a 'School Name' header.",
            INPUT_FILE
        );
        return Ok(());
    }

    let scraper = Scraper::new(SiteConfig::default());

    let mut document = ResultDocument::new();
    let mut failures: Vec<(String, String)> = Vec::new();
    let total = records.len();

    for (i, record) in records.iter().enumerate() {
        info!("Processing {} / {} : {}", i + 1, total, record.school);

        if i > 0 {
            delay_manager::random_school_delay();
        }

        // One school failing must not cost us the others.
        match scraper.scrape_school(&record.school) {
            Ok(professors) => {
                document.insert(record.school.clone(), professors);
            }
            Err(e) => {
                warn!("Scrape failed for '{}': {}", record.school, e);
                failures.push((record.school.clone(), e.to_string()));
            }
        }
    }

    output::write_document(Path::new(OUTPUT_FILE), &document)?;

    if failures.is_empty() {
        info!("Scraping completed. All {} schools collected.", total);
    } else {
        warn!(
            "Scraping completed with {} of {} schools failed:",
            failures.len(),
            total
        );
        for (school, reason) in &failures {
            warn!("  {}: {}", school, reason);
        }
    }

    Ok(())
}

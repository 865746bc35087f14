use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::error::ScrapeError;

/// Department sentinel used when the detail page has no department header.
pub const NO_DEPARTMENT: &str = "NA";

/// One professor's extracted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorRecord {
    pub name: String,
    pub rating: f64,
    pub difficulty: f64,
    pub department: String,
}

/// Outcome of extracting one detail page. A page missing a required field
/// yields `Skip`, never a partial record.
#[derive(Debug, PartialEq)]
pub enum Extraction {
    Record(ProfessorRecord),
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingName,
    MissingRating,
    MissingDifficulty,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingName => "missing name",
            SkipReason::MissingRating => "missing rating",
            SkipReason::MissingDifficulty => "missing difficulty",
        }
    }
}

/// Pulls the professor fields out of a detail page.
pub struct Extractor {
    name_selector: Selector,
    rating_selector: Selector,
    difficulty_selector: Selector,
    department_selector: Selector,
    department_suffix: String,
}

impl Extractor {
    pub fn new(config: &SiteConfig) -> Self {
        Extractor {
            name_selector: Selector::parse(&config.name_selector)
                .expect("invalid name selector"),
            rating_selector: Selector::parse(&config.rating_selector)
                .expect("invalid rating selector"),
            difficulty_selector: Selector::parse(&config.difficulty_selector)
                .expect("invalid difficulty selector"),
            department_selector: Selector::parse(&config.department_selector)
                .expect("invalid department selector"),
            department_suffix: config.department_suffix.clone(),
        }
    }

    /// Extracts one record from a detail page.
    ///
    /// Name, rating and difficulty are required; if any is absent the page
    /// is skipped with a reason. Non-numeric rating/difficulty text is an
    /// error, surfaced to the per-school boundary rather than swallowed.
    pub fn extract_detail(&self, html: &str) -> Result<Extraction, ScrapeError> {
        let document = Html::parse_document(html);

        let name = match self.first_text(&document, &self.name_selector) {
            Some(n) => n,
            None => return Ok(Extraction::Skip(SkipReason::MissingName)),
        };

        let rating_text = match self.first_text(&document, &self.rating_selector) {
            Some(r) => r,
            None => return Ok(Extraction::Skip(SkipReason::MissingRating)),
        };

        // The difficulty class shows up once or twice; when a second match
        // exists it is the real difficulty (the first belongs to the
        // "would take again" block on that layout).
        let difficulty_text = match self.last_text(&document, &self.difficulty_selector) {
            Some(d) => d,
            None => return Ok(Extraction::Skip(SkipReason::MissingDifficulty)),
        };

        let rating = parse_number("rating", &rating_text)?;
        let difficulty = parse_number("difficulty", &difficulty_text)?;

        let department = self
            .first_text(&document, &self.department_selector)
            .map(|text| self.strip_department_suffix(&text))
            .unwrap_or_else(|| NO_DEPARTMENT.to_string());

        Ok(Extraction::Record(ProfessorRecord {
            name,
            rating,
            difficulty,
            department,
        }))
    }

    fn first_text(&self, document: &Html, selector: &Selector) -> Option<String> {
        document
            .select(selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
    }

    fn last_text(&self, document: &Html, selector: &Selector) -> Option<String> {
        document
            .select(selector)
            .last()
            .map(element_text)
            .filter(|t| !t.is_empty())
    }

    fn strip_department_suffix(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let suffix = self.department_suffix.to_lowercase();
        if lower.ends_with(&suffix) {
            text[..text.len() - suffix.len()].trim().to_string()
        } else {
            text.to_string()
        }
    }
}

fn element_text(element: scraper::ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ScrapeError> {
    value.trim().parse::<f64>().map_err(|_| ScrapeError::BadNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(&SiteConfig::default())
    }

    fn detail_page(name: &str, rating: &str, difficulties: &[&str], dept: Option<&str>) -> String {
        let mut html = String::from("<html><body>");
        if !name.is_empty() {
            html.push_str(&format!(
                "<div class=\"NameTitle__Name-dowf0z-0 cjgLEI\">{}</div>",
                name
            ));
        }
        if !rating.is_empty() {
            html.push_str(&format!(
                "<div class=\"RatingValue__Numerator-qw8sqy-2 gxuTRq\">{}</div>",
                rating
            ));
        }
        for d in difficulties {
            html.push_str(&format!(
                "<div class=\"FeedbackItem__FeedbackNumber-uof32n-1 bGrrmf\">{}</div>",
                d
            ));
        }
        if let Some(dept) = dept {
            html.push_str(&format!("<b>{}</b>", dept));
        }
        html.push_str("</body></html>");
        html
    }

    #[test]
    fn extracts_complete_record() {
        let html = detail_page("Jane Doe", "4.5", &["2.8"], Some("Biology department"));
        let result = extractor().extract_detail(&html).unwrap();
        assert_eq!(
            result,
            Extraction::Record(ProfessorRecord {
                name: "Jane Doe".to_string(),
                rating: 4.5,
                difficulty: 2.8,
                department: "Biology".to_string(),
            })
        );
    }

    #[test]
    fn second_difficulty_field_wins() {
        let html = detail_page("Jane Doe", "4.5", &["87", "3.1"], None);
        match extractor().extract_detail(&html).unwrap() {
            Extraction::Record(record) => assert_eq!(record.difficulty, 3.1),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn missing_department_yields_sentinel() {
        let html = detail_page("Jane Doe", "4.5", &["2.8"], None);
        match extractor().extract_detail(&html).unwrap() {
            Extraction::Record(record) => assert_eq!(record.department, NO_DEPARTMENT),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn department_without_suffix_kept_verbatim() {
        let html = detail_page("Jane Doe", "4.5", &["2.8"], Some("Mathematics"));
        match extractor().extract_detail(&html).unwrap() {
            Extraction::Record(record) => assert_eq!(record.department, "Mathematics"),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn missing_name_skips() {
        let html = detail_page("", "4.5", &["2.8"], None);
        let result = extractor().extract_detail(&html).unwrap();
        assert_eq!(result, Extraction::Skip(SkipReason::MissingName));
    }

    #[test]
    fn missing_rating_skips() {
        let html = detail_page("Jane Doe", "", &["2.8"], None);
        let result = extractor().extract_detail(&html).unwrap();
        assert_eq!(result, Extraction::Skip(SkipReason::MissingRating));
    }

    #[test]
    fn missing_difficulty_skips() {
        let html = detail_page("Jane Doe", "4.5", &[], None);
        let result = extractor().extract_detail(&html).unwrap();
        assert_eq!(result, Extraction::Skip(SkipReason::MissingDifficulty));
    }

    #[test]
    fn malformed_rating_is_an_error() {
        let html = detail_page("Jane Doe", "N/A", &["2.8"], None);
        match extractor().extract_detail(&html) {
            Err(ScrapeError::BadNumber { field, value }) => {
                assert_eq!(field, "rating");
                assert_eq!(value, "N/A");
            }
            other => panic!("expected BadNumber, got {:?}", other),
        }
    }
}

//! Site-specific configuration: base URL, CSS selectors and text markers.
//!
//! Everything the scraper needs to know about the target site lives here,
//! so tests can point a `Scraper` at a local fixture server instead of the
//! real host.

/// Where the scraper looks for things on the target site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Origin the search path and all relative links resolve against.
    pub base_url: String,
    /// Selector matching one entity row on a listing page.
    pub listing_selector: String,
    /// Selector for the professor's display name on a detail page.
    pub name_selector: String,
    /// Selector for the overall rating number on a detail page.
    pub rating_selector: String,
    /// Selector for difficulty numbers. The page sometimes shows two
    /// matches; the second one is the actual difficulty.
    pub difficulty_selector: String,
    /// Selector for the bold department header on a detail page.
    pub department_selector: String,
    /// Selector matching pagination links on a listing page.
    pub pagination_selector: String,
    /// Body-text marker indicating the search found no professors.
    pub not_found_marker: String,
    /// Label suffix stripped from the department header text.
    pub department_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            base_url: "https://www.ratemyprofessors.com".to_string(),
            listing_selector: ".listing.PROFESSOR".to_string(),
            name_selector: ".NameTitle__Name-dowf0z-0.cjgLEI".to_string(),
            rating_selector: ".RatingValue__Numerator-qw8sqy-2.gxuTRq".to_string(),
            difficulty_selector: ".FeedbackItem__FeedbackNumber-uof32n-1.bGrrmf".to_string(),
            department_selector: "b".to_string(),
            pagination_selector: ".step".to_string(),
            not_found_marker: "No professors with".to_string(),
            department_suffix: " department".to_string(),
        }
    }
}

impl SiteConfig {
    /// Builds the search-listing URL for one school.
    ///
    /// School names from the input file sometimes carry a parenthetical
    /// campus suffix ("Indiana University (Bloomington)") that the site's
    /// search chokes on, so it gets stripped before the query is built.
    pub fn search_url(&self, school: &str) -> String {
        let name = normalize_school_name(school);
        format!(
            "{}/search.jsp?queryoption=HEADER&queryBy=teacherName&schoolName={}&query=*",
            self.base_url,
            name.replace(' ', "+")
        )
    }
}

/// Trims whitespace and drops a trailing parenthetical suffix.
pub fn normalize_school_name(school: &str) -> &str {
    let trimmed = school.trim();
    match trimmed.find(" (") {
        Some(idx) => trimmed[..idx].trim_end(),
        None => trimmed,
    }
}

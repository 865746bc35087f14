use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{Html, Selector};
use url::Url;

use crate::config::SiteConfig;
use crate::delay_manager;
use crate::error::ScrapeError;
use crate::extractor::{Extraction, Extractor, ProfessorRecord};

/// Sequential scraper for one target site. One request in flight at a time,
/// with politeness delays between fetches.
pub struct Scraper {
    client: Client,
    base_url: Url,
    config: SiteConfig,
    listing_selector: Selector,
    pagination_selector: Selector,
    link_selector: Selector,
    extractor: Extractor,
}

impl Scraper {
    pub fn new(config: SiteConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        let base_url = Url::parse(&config.base_url).expect("invalid base URL");

        Scraper {
            client,
            base_url,
            listing_selector: Selector::parse(&config.listing_selector)
                .expect("invalid listing selector"),
            pagination_selector: Selector::parse(&config.pagination_selector)
                .expect("invalid pagination selector"),
            link_selector: Selector::parse("a").expect("invalid link selector"),
            extractor: Extractor::new(&config),
            config,
        }
    }

    fn get_random_user_agent(&self) -> &str {
        let uas = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
        ];
        use rand::Rng;
        let mut rng = rand::thread_rng();
        uas[rng.gen_range(0..uas.len())]
    }

    /// Collects every professor listed for one school, across all pages of
    /// the search listing.
    ///
    /// A search response carrying the not-found marker yields an empty list
    /// without any detail-page fetches.
    pub fn scrape_school(&self, school: &str) -> Result<Vec<ProfessorRecord>, ScrapeError> {
        let search_url = self.config.search_url(school);
        info!("Searching listing: {}", search_url);

        let body = self.fetch(&search_url)?;
        if body.contains(&self.config.not_found_marker) {
            info!("No professors listed for '{}'", school);
            return Ok(Vec::new());
        }

        let mut records = self.parse_page(&body)?;

        let page_links = {
            let document = Html::parse_document(&body);
            self.pagination_links(&document)
        };

        for page_link in page_links {
            delay_manager::random_page_delay();
            info!("Following listing page: {}", page_link);
            let page_body = self.fetch(&page_link)?;
            records.extend(self.parse_page(&page_body)?);
        }

        info!("Collected {} professors for '{}'", records.len(), school);
        Ok(records)
    }

    /// Extracts all records from one listing page, fetching each entity's
    /// detail page in listing order.
    ///
    /// An entity with no resolvable detail link is skipped. A failed detail
    /// fetch degrades to a dropped record so one flaky page cannot sink the
    /// rest of the listing.
    pub fn parse_page(&self, html: &str) -> Result<Vec<ProfessorRecord>, ScrapeError> {
        let links = {
            let document = Html::parse_document(html);
            self.listing_links(&document)
        };

        let mut records = Vec::new();
        for (i, link) in links.iter().enumerate() {
            if i > 0 {
                delay_manager::random_detail_delay();
            }
            let detail_body = match self.fetch(link) {
                Ok(body) => body,
                Err(e) => {
                    warn!("Dropping entry, detail fetch failed for {}: {}", link, e);
                    continue;
                }
            };
            match self.extractor.extract_detail(&detail_body)? {
                Extraction::Record(record) => records.push(record),
                Extraction::Skip(reason) => {
                    debug!("Skipping {}: {}", link, reason.as_str());
                }
            }
        }
        Ok(records)
    }

    /// Detail-page links for every entity row on a listing page, resolved
    /// against the base URL. Rows with no link are skipped.
    pub fn listing_links(&self, document: &Html) -> Vec<String> {
        let mut links = Vec::new();
        for row in document.select(&self.listing_selector) {
            let href = row
                .select(&self.link_selector)
                .next()
                .and_then(|a| a.value().attr("href"));
            match href {
                Some(href) => match self.base_url.join(href) {
                    Ok(url) => links.push(url.to_string()),
                    Err(e) => warn!("Skipping unresolvable detail link {:?}: {}", href, e),
                },
                None => debug!("Listing row without a detail link, skipping"),
            }
        }
        links
    }

    /// Pagination links on a listing page, in document order. Entries with
    /// a null href (the current-page marker) are skipped.
    pub fn pagination_links(&self, document: &Html) -> Vec<String> {
        let mut links = Vec::new();
        for element in document.select(&self.pagination_selector) {
            if let Some(href) = element.value().attr("href") {
                match self.base_url.join(href) {
                    Ok(url) => links.push(url.to_string()),
                    Err(e) => warn!("Skipping unresolvable page link {:?}: {}", href, e),
                }
            }
        }
        links
    }

    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let ua = self.get_random_user_agent();
        let resp = self.client.get(url).header(USER_AGENT, ua).send()?;

        let status = resp.status();
        if status.as_u16() == 403 || status.as_u16() == 429 {
            warn!("Blocked at {}: {}", url, status);
            return Err(ScrapeError::Blocked(status));
        }

        let text = resp.error_for_status()?.text()?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> Scraper {
        Scraper::new(SiteConfig::default())
    }

    #[test]
    fn listing_links_resolve_against_base() {
        let html = r#"
            <div class="listing PROFESSOR"><a href="/ShowRatings.jsp?tid=1"></a></div>
            <div class="listing PROFESSOR"><a href="/ShowRatings.jsp?tid=2"></a></div>
        "#;
        let document = Html::parse_document(html);
        let links = scraper().listing_links(&document);
        assert_eq!(
            links,
            vec![
                "https://www.ratemyprofessors.com/ShowRatings.jsp?tid=1",
                "https://www.ratemyprofessors.com/ShowRatings.jsp?tid=2",
            ]
        );
    }

    #[test]
    fn listing_row_without_link_is_skipped() {
        let html = r#"
            <div class="listing PROFESSOR"><span>no anchor here</span></div>
            <div class="listing PROFESSOR"><a href="/ShowRatings.jsp?tid=7"></a></div>
        "#;
        let document = Html::parse_document(html);
        let links = scraper().listing_links(&document);
        assert_eq!(
            links,
            vec!["https://www.ratemyprofessors.com/ShowRatings.jsp?tid=7"]
        );
    }

    #[test]
    fn pagination_skips_null_href() {
        let html = r#"
            <span class="step">1</span>
            <a class="step" href="/search.jsp?page=2">2</a>
            <a class="step" href="/search.jsp?page=3">3</a>
        "#;
        let document = Html::parse_document(html);
        let links = scraper().pagination_links(&document);
        assert_eq!(
            links,
            vec![
                "https://www.ratemyprofessors.com/search.jsp?page=2",
                "https://www.ratemyprofessors.com/search.jsp?page=3",
            ]
        );
    }

    #[test]
    fn empty_listing_yields_no_links() {
        let html = "<html><body><p>nothing listed</p></body></html>";
        let document = Html::parse_document(html);
        assert!(scraper().listing_links(&document).is_empty());
        assert!(scraper().pagination_links(&document).is_empty());
    }
}

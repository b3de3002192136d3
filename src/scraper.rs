use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;

use crate::parser::Extractor;
use crate::types::Entry;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Word not found: {0}")]
    WordNotFound(String),
}

/// How to resolve a word to a page URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Direct headword page under `/definition/english/`.
    Define,
    /// Search endpoint; the site redirects to the best match.
    Search,
}

impl Lookup {
    pub fn url(&self, word: &str) -> String {
        match self {
            Lookup::Define => format!("{}{}", crate::DEFINE_BASE_URL, word),
            Lookup::Search => format!("{}{}", crate::SEARCH_BASE_URL, word),
        }
    }
}

/// One-shot dictionary page fetcher: one blocking GET per lookup, nothing
/// cached or retried between calls. The client carries no cookie store, so
/// no cookie is ever kept or sent back.
#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_headers(HeaderMap::new())
    }

    /// Build a scraper with caller-supplied default headers (user-agent
    /// override and the like). Headers set here accompany every request.
    pub fn with_headers(headers: HeaderMap) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a word's page and extract its [`Entry`].
    ///
    /// `WordNotFound` covers both an HTTP 404 and a search-results page
    /// whose heading reports no exact match. Any other transport failure
    /// propagates as-is.
    pub fn fetch_entry(&self, word: &str, mode: Lookup) -> Result<Entry, ScraperError> {
        let url = mode.url(word);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ScraperError::WordNotFound(word.to_string()));
        }
        let html = response.error_for_status()?.text()?;

        let extractor = Extractor::parse(&html);
        if extractor.is_no_match() {
            return Err(ScraperError::WordNotFound(word.to_string()));
        }

        Ok(extractor.entry())
    }
}

pub mod parser;
pub mod scraper;
pub mod types;

pub use parser::Extractor;
pub use scraper::{Lookup, ScraperError, WebScraper};

pub(crate) const DEFINE_BASE_URL: &str =
    "https://www.oxfordlearnersdictionaries.com/definition/english/";
pub(crate) const SEARCH_BASE_URL: &str =
    "https://www.oxfordlearnersdictionaries.com/search/english/?q=";

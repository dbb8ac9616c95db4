use url::Url;

use crate::error::AppError;

/// Default origin of the classifieds site.
pub const DEFAULT_BASE_URL: &str = "https://auto.ria.com";

/// Fixed search filters: used cars, customs-cleared, not imported from the
/// USA, prices in USD. These mirror the site's own search form.
const FIXED_PARAMS: [(&str, &str); 6] = [
    ("indexName", "auto,order_auto,newauto_search"),
    ("categories.main.id", "1"),
    ("country.import.usa.not", "-1"),
    ("price.currency", "1"),
    ("abroad.not", "0"),
    ("custom.not", "1"),
];

/// Builds search-results URLs and resolves detail-page links.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    base: Url,
    search: Url,
    page_size: u32,
}

impl SearchQuery {
    /// Query against the production site with the given page size.
    pub fn new(page_size: u32) -> Result<Self, AppError> {
        Self::with_base(DEFAULT_BASE_URL, page_size)
    }

    /// Query against an alternate origin (e.g., a local fixture server).
    pub fn with_base(base: &str, page_size: u32) -> Result<Self, AppError> {
        let base = Url::parse(base)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL '{base}': {e}")))?;
        let search = base
            .join("/uk/search/")
            .map_err(|e| AppError::ConfigError(format!("Base URL '{base}' cannot be joined: {e}")))?;
        Ok(Self {
            base,
            search,
            page_size,
        })
    }

    /// URL of the search-results page for the given zero-based page index.
    pub fn page_url(&self, page: u32) -> String {
        let mut url = self.search.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in FIXED_PARAMS {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("size", &self.page_size.to_string());
        }
        url.into()
    }

    /// Resolve a stub's site-relative detail link against the base origin.
    pub fn detail_url(&self, link: &str) -> Result<String, AppError> {
        self.base
            .join(link)
            .map(Into::into)
            .map_err(|e| AppError::ParseError(format!("Invalid detail link '{link}': {e}")))
    }
}

use crate::error::AppError;
use crate::models::Listing;
use crate::search::SearchQuery;
use crate::throttle::PageThrottle;
use crate::traits::{Fetcher, ListParser, ListingSink, PriceParser};

/// Crawl loop settings.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Zero-based page index to start from.
    pub start_page: u32,
    /// Stop after this many harvested pages, even if more remain.
    pub max_pages: Option<u32>,
    /// Pause before each search-page fetch.
    pub throttle: PageThrottle,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_page: 0,
            max_pages: None,
            throttle: PageThrottle::default(),
        }
    }
}

/// Totals reported after a completed crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages that yielded at least one listing.
    pub pages: u32,
    /// Records written to every sink.
    pub listings: u64,
}

/// Orchestrates the two-level harvest: page → stubs → detail price → sinks.
///
/// Generic over all external dependencies via traits, enabling dependency
/// injection and testability without real HTTP calls. The crawl is strictly
/// sequential; it ends at the first search page that yields no stubs.
pub struct CrawlService<F, L, P, S>
where
    F: Fetcher,
    L: ListParser,
    P: PriceParser,
    S: ListingSink,
{
    fetcher: F,
    list_parser: L,
    price_parser: P,
    sinks: Vec<S>,
    query: SearchQuery,
    config: CrawlConfig,
}

impl<F, L, P, S> CrawlService<F, L, P, S>
where
    F: Fetcher,
    L: ListParser,
    P: PriceParser,
    S: ListingSink,
{
    pub fn new(
        fetcher: F,
        list_parser: L,
        price_parser: P,
        sinks: Vec<S>,
        query: SearchQuery,
        config: CrawlConfig,
    ) -> Self {
        Self {
            fetcher,
            list_parser,
            price_parser,
            sinks,
            query,
            config,
        }
    }

    /// Run the harvest to completion.
    ///
    /// 1. Pause (throttle), then fetch the search page for the current index
    /// 2. Parse listing stubs; an empty page ends the crawl
    /// 3. For each stub, fetch its detail page and recover the price
    /// 4. Fan the assembled record out to every sink
    /// 5. Advance the page index and repeat
    ///
    /// Errors abort the crawl and propagate; sinks are closed only on
    /// normal completion.
    pub async fn run(&mut self) -> Result<CrawlSummary, AppError> {
        let mut page = self.config.start_page;
        let mut pages = 0u32;
        let mut listings = 0u64;

        loop {
            if let Some(max) = self.config.max_pages
                && pages >= max
            {
                tracing::info!(pages, "Reached page cap");
                break;
            }

            self.config.throttle.pause().await;

            tracing::info!(page, "Processing page");
            let url = self.query.page_url(page);
            let html = self.fetcher.fetch(&url).await?;
            let stubs = self.list_parser.parse_listings(&html)?;

            if stubs.is_empty() {
                tracing::info!(page, "No more listings");
                break;
            }
            tracing::info!(page, count = stubs.len(), "Found listings");

            for stub in stubs {
                let detail_url = self.query.detail_url(&stub.link)?;
                let detail_html = self.fetcher.fetch(&detail_url).await?;
                let price = self.price_parser.parse_price(&detail_html);
                if price.is_none() {
                    tracing::debug!(id = %stub.id, "No price element on detail page");
                }

                let listing = Listing::from_stub(stub, price);
                for sink in self.sinks.iter_mut() {
                    sink.write(&listing).await?;
                }
                listings += 1;
            }

            page += 1;
            pages += 1;
        }

        for sink in self.sinks.iter_mut() {
            sink.close().await?;
        }

        tracing::info!(pages, listings, "Crawl complete");
        Ok(CrawlSummary { pages, listings })
    }
}

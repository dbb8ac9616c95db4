use std::future::Future;

use crate::error::AppError;
use crate::models::{Listing, ListingStub};

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Extracts listing stubs from a search-results page.
pub trait ListParser: Send + Sync {
    /// Returns the stubs found on the page, in document order.
    /// An empty vec means the page is past the end of the result set.
    fn parse_listings(&self, html: &str) -> Result<Vec<ListingStub>, AppError>;
}

/// Recovers the price from a listing's detail page.
pub trait PriceParser: Send + Sync {
    /// `None` when the page carries no recognizable price element.
    fn parse_price(&self, html: &str) -> Option<String>;
}

/// Persists assembled listing records.
///
/// Sinks take `&mut self` so file/connection handles need no interior
/// mutability; the crawl loop owns its sinks and writes sequentially.
pub trait ListingSink: Send {
    /// Write one record.
    fn write(&mut self, listing: &Listing) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Flush and release any underlying resources. Called once, after the
    /// last page. Defaults to a no-op.
    fn close(&mut self) -> impl Future<Output = Result<(), AppError>> + Send {
        async { Ok(()) }
    }
}

/// A no-op sink for use when persistence is not needed.
#[derive(Debug, Clone)]
pub struct NullSink;

impl ListingSink for NullSink {
    async fn write(&mut self, _listing: &Listing) -> Result<(), AppError> {
        Ok(())
    }
}

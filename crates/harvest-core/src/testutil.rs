//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{Listing, ListingStub};
use crate::traits::{Fetcher, ListParser, ListingSink, PriceParser};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response and records every
/// requested URL.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    /// Every URL passed to `fetch`, in call order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockListParser
// ---------------------------------------------------------------------------

/// Mock list parser driven by a queue of per-page results.
pub struct MockListParser {
    /// Queue of page results. Each call pops the first element.
    /// If empty, returns an empty page (end of result set).
    pages: Mutex<Vec<Result<Vec<ListingStub>, AppError>>>,
    /// When set, every call returns this page instead of consuming the queue.
    repeat: Option<Vec<ListingStub>>,
}

impl MockListParser {
    /// Parser that yields the given pages in order, then empty pages.
    pub fn with_pages(pages: Vec<Result<Vec<ListingStub>, AppError>>) -> Self {
        Self {
            pages: Mutex::new(pages),
            repeat: None,
        }
    }

    /// Parser that yields the same stubs on every page, forever.
    pub fn always(stubs: Vec<ListingStub>) -> Self {
        Self {
            pages: Mutex::new(Vec::new()),
            repeat: Some(stubs),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_pages(vec![Err(error)])
    }
}

impl ListParser for MockListParser {
    fn parse_listings(&self, _html: &str) -> Result<Vec<ListingStub>, AppError> {
        if let Some(stubs) = &self.repeat {
            return Ok(stubs.clone());
        }
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            Ok(Vec::new())
        } else {
            pages.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockPriceParser
// ---------------------------------------------------------------------------

/// Mock price parser that returns a fixed price for every detail page.
pub struct MockPriceParser {
    price: Option<String>,
}

impl MockPriceParser {
    pub fn with_price(price: &str) -> Self {
        Self {
            price: Some(price.to_string()),
        }
    }

    /// Simulates a detail page with no recognizable price element.
    pub fn missing() -> Self {
        Self { price: None }
    }
}

impl PriceParser for MockPriceParser {
    fn parse_price(&self, _html: &str) -> Option<String> {
        self.price.clone()
    }
}

// ---------------------------------------------------------------------------
// MockSink
// ---------------------------------------------------------------------------

/// Mock sink that records writes and whether it was closed.
#[derive(Clone)]
pub struct MockSink {
    pub written: Arc<Mutex<Vec<Listing>>>,
    pub closed: Arc<Mutex<bool>>,
    write_error: Arc<Mutex<Option<AppError>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            written: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
            write_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Sink that fails the first write.
    pub fn with_write_error(error: AppError) -> Self {
        let sink = Self::new();
        *sink.write_error.lock().unwrap() = Some(error);
        sink
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingSink for MockSink {
    async fn write(&mut self, listing: &Listing) -> Result<(), AppError> {
        let mut err = self.write_error.lock().unwrap();
        if let Some(e) = err.take() {
            return Err(e);
        }
        self.written.lock().unwrap().push(listing.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AppError> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a dummy ListingStub for testing.
pub fn make_test_stub(id: &str) -> ListingStub {
    ListingStub {
        id: id.to_string(),
        make: "Audi".to_string(),
        model: "A4".to_string(),
        year: "2018".to_string(),
        link: format!("/auto_audi_a4_{id}.html"),
    }
}

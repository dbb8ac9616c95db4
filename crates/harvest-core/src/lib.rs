pub mod crawl;
pub mod error;
pub mod models;
pub mod search;
pub mod testutil;
pub mod throttle;
pub mod traits;

pub use crawl::{CrawlConfig, CrawlService, CrawlSummary};
pub use error::AppError;
pub use models::{Listing, ListingStub};
pub use search::SearchQuery;
pub use traits::{Fetcher, ListParser, ListingSink, PriceParser};

pub mod config;
pub mod repository;

pub use config::DatabaseConfig;
pub use repository::ListingRepository;

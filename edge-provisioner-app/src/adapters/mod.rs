//! Storage and cache adapters for the core traits.

mod cache_invalidators;
mod memory_site_repository;

pub use cache_invalidators::NoopCacheInvalidator;
pub use memory_site_repository::InMemorySiteRepository;

#[cfg(feature = "sqlite-store")]
mod sqlite;

#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;

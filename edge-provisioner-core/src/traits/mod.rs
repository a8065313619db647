//! Storage layer abstraction trait definition

mod cache_invalidator;
mod site_repository;

pub use cache_invalidator::CacheInvalidator;
pub use site_repository::SiteRepository;

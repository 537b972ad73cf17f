//! Seams to the outside world: document fetching and rate lookup.

pub mod fetcher;
pub mod rate;

pub use fetcher::DocumentFetcher;
pub use rate::RateProvider;

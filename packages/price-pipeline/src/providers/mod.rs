//! Rate provider implementations.

pub mod exchangerate_api;

pub use exchangerate_api::ExchangeRateApiProvider;

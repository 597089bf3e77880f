//! Storage layer for country records

mod country_store;

pub use country_store::CountryStore;

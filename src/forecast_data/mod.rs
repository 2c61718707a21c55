pub mod error;
pub mod exporter;
pub mod fetcher;
pub mod transformer;

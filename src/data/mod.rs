pub mod dataset;
pub mod datetime;
pub mod fetcher;
pub mod worker;

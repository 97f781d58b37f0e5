// Library for tests to access modules

pub mod aggregation;
pub mod cli;
pub mod collector;
pub mod config;
pub mod couchbase_repo;
pub mod dns_repo;
pub mod emit;
pub mod error;
pub mod models;
pub mod version;

//! Shared test utilities

#![allow(dead_code)]

mod fetcher;

pub use fetcher::StubFetcher;

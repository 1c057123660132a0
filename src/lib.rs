pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod version;

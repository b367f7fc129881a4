pub mod config;
pub mod dataset;
pub mod export;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod storage;

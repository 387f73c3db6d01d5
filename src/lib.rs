pub mod catalog;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod filter;
pub mod logging;
pub mod types;

pub mod apis;
pub mod observability;

// Application layer and its adapters
pub mod app;
pub mod infra;

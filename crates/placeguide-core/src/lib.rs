pub mod config;
pub mod logging;

pub mod control;
pub mod fetcher;
pub mod generate;
pub mod http;
pub mod notify;
pub mod retry;
pub mod search;

//! Live adapters that talk to real HTTP services.

pub mod chat_completions;
pub mod http_fetcher;

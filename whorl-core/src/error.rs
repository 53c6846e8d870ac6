use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhoisError {
    #[error("Invalid lookup target: {0}")]
    InvalidTarget(String),

    #[error("WHOIS server not found for TLD: {0}")]
    NoServer(String),

    #[error("WHOIS connection to {server} failed: {message}")]
    Connection { server: String, message: String },

    #[error("No results retrieved from {server} for {query}")]
    EmptyResult { server: String, query: String },

    #[error("WHOIS query to {server} was cancelled")]
    Cancelled { server: String },

    #[error("DNS error: {0}")]
    Dns(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WhoisError {
    pub(crate) fn connection(server: &str, cause: impl Display) -> Self {
        WhoisError::Connection {
            server: server.to_string(),
            message: cause.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WhoisError>;

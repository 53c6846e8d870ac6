//! WHOIS resolution and parsing.
//!
//! Classifies a lookup target, picks the registry that answers for it,
//! follows referrals to the authoritative server and parses the text reply
//! into an ordered field map. IP addresses and AS numbers are swept across
//! every regional registry.

pub mod config;
pub mod dns;
pub mod error;
pub mod output;
pub mod target;
pub mod validation;
pub mod whois;

pub use config::WhoisConfig;
pub use dns::{DnsChecker, HickoryChecker};
pub use error::{Result, WhoisError};
pub use target::{classify, clean, Target};

pub use output::{get_formatter, OutputFormat, OutputFormatter};
pub use whois::{
    FieldValue, Lookup, Record, RecordKind, ResultSet, ServerDirectory, WhoisClient,
    WhoisTransport,
};

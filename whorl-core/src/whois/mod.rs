//! WHOIS lookups: server selection, transport, referral chasing, parsing.

mod aggregate;
mod client;
mod parser;
pub mod parsers;
mod referral;
mod servers;
mod transport;

pub use aggregate::Aggregator;
pub use client::{Lookup, WhoisClient};
pub use parser::{clean_payload, FieldValue, Fields, RawResponse, Record, RecordKind, ResultSet};
pub use parsers::{parse, parse_multi, ParseFormat};
pub use referral::{extract_referral, ReferralResolver, DEFAULT_MAX_REFERRAL_HOPS};
pub use servers::{default_server_for_tld, ServerDirectory, REGIONAL_REGISTRY_SERVERS};
pub use transport::{TcpTransport, WhoisTransport, DEFAULT_TIMEOUT, MAX_RESPONSE_SIZE, WHOIS_PORT};

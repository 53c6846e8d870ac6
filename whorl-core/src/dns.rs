//! DNS presence check used to guess whether a domain is still unregistered.
//!
//! A registered domain nearly always publishes SOA/NS records in its parent
//! zone, so "no records of any common type" is a cheap availability hint
//! that needs no WHOIS round trip.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, instrument};

use crate::error::{Result, WhoisError};

/// Default timeout for each DNS query (5 seconds).
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// Queried one by one in place of ANY, which most resolvers now refuse.
const PRESENCE_RECORD_TYPES: &[RecordType] = &[
    RecordType::SOA,
    RecordType::NS,
    RecordType::A,
    RecordType::AAAA,
    RecordType::MX,
];

#[async_trait]
pub trait DnsChecker: Send + Sync + fmt::Debug {
    /// True when `name` has at least one record of a checked type.
    async fn has_records(&self, name: &str) -> Result<bool>;
}

/// Queries Google public DNS through hickory.
#[derive(Debug, Clone)]
pub struct HickoryChecker {
    timeout: Duration,
}

impl Default for HickoryChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HickoryChecker {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_DNS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn create_resolver(&self) -> TokioAsyncResolver {
        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 2;
        opts.use_hosts_file = false;

        TokioAsyncResolver::tokio(ResolverConfig::google(), opts)
    }
}

#[async_trait]
impl DnsChecker for HickoryChecker {
    #[instrument(skip(self))]
    async fn has_records(&self, name: &str) -> Result<bool> {
        let resolver = self.create_resolver();
        let fqdn = fully_qualified(name);

        for &record_type in PRESENCE_RECORD_TYPES {
            match resolver.lookup(fqdn.as_str(), record_type).await {
                Ok(lookup) if lookup.iter().next().is_some() => {
                    debug!(record_type = %record_type, "Found DNS records");
                    return Ok(true);
                }
                Ok(_) => continue,
                Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => continue,
                Err(e) => {
                    return Err(WhoisError::Dns(format!(
                        "{} lookup for {} failed: {}",
                        record_type, name, e
                    )));
                }
            }
        }

        Ok(false)
    }
}

/// Absolute form of `name`, so resolver search domains never apply.
fn fully_qualified(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

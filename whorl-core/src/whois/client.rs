use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::aggregate::Aggregator;
use super::parser::{Record, ResultSet};
use super::parsers::{parse, ParseFormat};
use super::referral::{ReferralResolver, DEFAULT_MAX_REFERRAL_HOPS};
use super::servers::ServerDirectory;
use super::transport::{TcpTransport, WhoisTransport, DEFAULT_TIMEOUT, MAX_RESPONSE_SIZE};
use crate::config::WhoisConfig;
use crate::dns::{DnsChecker, HickoryChecker};
use crate::error::{Result, WhoisError};
use crate::target::{classify, Target};

/// Outcome of a structured lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lookup {
    /// A domain answered by its registry (after referrals).
    Record(Record),
    /// An IP or AS number answered by one or more regional registries.
    ResultSet(ResultSet),
}

#[derive(Debug, Clone)]
pub struct WhoisClient {
    transport: Option<Arc<dyn WhoisTransport>>,
    dns: Option<Arc<dyn DnsChecker>>,
    directory: ServerDirectory,
    timeout: Duration,
    max_response_size: usize,
    max_referral_hops: usize,
    concurrency: Option<usize>,
    cancel: CancellationToken,
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisClient {
    pub fn new() -> Self {
        Self {
            transport: None,
            dns: None,
            directory: ServerDirectory::new(),
            timeout: DEFAULT_TIMEOUT,
            max_response_size: MAX_RESPONSE_SIZE,
            max_referral_hops: DEFAULT_MAX_REFERRAL_HOPS,
            concurrency: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: &WhoisConfig) -> Self {
        self.directory = ServerDirectory::from_config(config);
        self.timeout = config.timeout();
        self.max_response_size = config.max_response_bytes;
        self.max_referral_hops = config.max_referral_hops;
        self.concurrency = config.concurrency;
        self
    }

    /// Replace the TCP transport. Timeout and size limits no longer apply.
    pub fn with_transport(mut self, transport: Arc<dyn WhoisTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_dns_checker(mut self, checker: Arc<dyn DnsChecker>) -> Self {
        self.dns = Some(checker);
        self
    }

    pub fn with_directory(mut self, directory: ServerDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_referral_hops(mut self, max_hops: usize) -> Self {
        self.max_referral_hops = max_hops;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn directory(&self) -> &ServerDirectory {
        &self.directory
    }

    /// Look up a domain, IP address or AS number.
    ///
    /// Sweeps over regional registries are collapsed into one text record
    /// listing every server that answered; use [`lookup_structured`] to keep
    /// them apart.
    ///
    /// [`lookup_structured`]: WhoisClient::lookup_structured
    #[instrument(skip(self))]
    pub async fn lookup(&self, input: &str) -> Result<Record> {
        match self.lookup_structured(input).await? {
            Lookup::Record(record) => Ok(record),
            Lookup::ResultSet(set) => Ok(set.summary()),
        }
    }

    #[instrument(skip(self))]
    pub async fn lookup_structured(&self, input: &str) -> Result<Lookup> {
        let target = classify(input)?;
        debug!(target = ?target, "Classified lookup target");

        match &target {
            Target::Domain { tld, .. } => {
                let server = self
                    .directory
                    .server_for_tld(tld)
                    .ok_or_else(|| WhoisError::NoServer(tld.clone()))?;
                self.lookup_domain(&target, server).await.map(Lookup::Record)
            }
            Target::IpAddress { .. } | Target::Asn { .. } => {
                let mut aggregator = Aggregator::new(
                    self.resolver(),
                    self.directory.regional_registry_servers().to_vec(),
                );
                if let Some(concurrency) = self.concurrency {
                    aggregator = aggregator.with_concurrency(concurrency);
                }
                aggregator.aggregate(&target).await.map(Lookup::ResultSet)
            }
        }
    }

    /// Query `server` directly instead of the directory's choice. Referrals
    /// are still followed.
    #[instrument(skip(self))]
    pub async fn lookup_with_server(&self, input: &str, server: &str) -> Result<Record> {
        let target = classify(input)?;
        self.lookup_domain(&target, server).await
    }

    /// Whether a domain looks unregistered: nothing answers for it in DNS.
    ///
    /// A hint only. Registered domains without any delegation also report
    /// as available.
    #[instrument(skip(self))]
    pub async fn is_available(&self, input: &str) -> Result<bool> {
        let target = classify(input)?;
        let Target::Domain { name, .. } = &target else {
            return Err(WhoisError::InvalidTarget(format!(
                "{} is not a domain name",
                target
            )));
        };

        let dns = self.dns_checker();
        let registered = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                return Err(WhoisError::Cancelled { server: "dns".to_string() });
            }
            result = dns.has_records(name) => result?,
        };

        debug!(domain = %name, registered, "DNS presence checked");
        Ok(!registered)
    }

    async fn lookup_domain(&self, target: &Target, server: &str) -> Result<Record> {
        let request = target.request_line();
        let raw = self
            .resolver()
            .resolve_with_referrals(server, &request)
            .await?;

        debug!(server = %raw.server, "Parsing WHOIS response");
        Ok(parse(ParseFormat::for_target(target), &request, &raw))
    }

    fn resolver(&self) -> ReferralResolver {
        ReferralResolver::new(self.transport())
            .with_max_hops(self.max_referral_hops)
            .with_cancellation(self.cancel.clone())
    }

    fn dns_checker(&self) -> Arc<dyn DnsChecker> {
        match &self.dns {
            Some(dns) => dns.clone(),
            None => Arc::new(HickoryChecker::new().with_timeout(self.timeout)),
        }
    }

    fn transport(&self) -> Arc<dyn WhoisTransport> {
        match &self.transport {
            Some(transport) => transport.clone(),
            None => Arc::new(
                TcpTransport::new()
                    .with_timeout(self.timeout)
                    .with_max_response_size(self.max_response_size),
            ),
        }
    }
}

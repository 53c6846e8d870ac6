//! Sweep of the regional registries for IP and ASN targets.
//!
//! No single registry is authoritative for an arbitrary address or AS
//! number, so every registry in the directory is asked and whatever comes
//! back is merged. Registries that mirror each other return identical
//! text; only the first copy in directory order is kept.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use super::parser::{RawResponse, ResultSet};
use super::parsers::parse_multi;
use super::referral::ReferralResolver;
use crate::error::{Result, WhoisError};
use crate::target::Target;

#[derive(Debug, Clone)]
pub struct Aggregator {
    resolver: ReferralResolver,
    servers: Vec<String>,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(resolver: ReferralResolver, servers: Vec<String>) -> Self {
        let concurrency = servers.len().max(1);
        Self {
            resolver,
            servers,
            concurrency,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[instrument(skip(self, target), fields(target = %target))]
    pub async fn aggregate(&self, target: &Target) -> Result<ResultSet> {
        if let Target::Domain { name, .. } = target {
            return Err(WhoisError::InvalidTarget(format!(
                "{} is a domain; regional registries only answer for IPs and AS numbers",
                name
            )));
        }

        let request = target.request_line();
        debug!(
            servers = self.servers.len(),
            concurrency = self.concurrency,
            "Starting regional registry sweep"
        );

        // `buffered` yields in input order, which keeps first-seen dedup stable.
        let outcomes: Vec<(&str, Result<RawResponse>)> = stream::iter(self.servers.iter())
            .map(|server| {
                let resolver = &self.resolver;
                let request = request.as_str();
                async move { (server.as_str(), resolver.resolve(server, request).await) }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut seen = HashSet::new();
        let mut responses = Vec::new();

        for (server, outcome) in outcomes {
            match outcome {
                Ok(raw) if raw.is_empty() => {
                    debug!(server = %server, "No data from registry");
                }
                Ok(raw) => {
                    if seen.insert(raw.body.clone()) {
                        responses.push(raw);
                    } else {
                        debug!(server = %server, "Duplicate response, skipping");
                    }
                }
                Err(e @ WhoisError::Cancelled { .. }) => return Err(e),
                Err(e) => {
                    warn!(server = %server, error = %e, "Registry query failed");
                }
            }
        }

        Ok(parse_multi(target.kind(), target.query(), responses))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::target::classify;
    use crate::whois::parser::RecordKind;
    use crate::whois::transport::testing::ScriptedTransport;

    const RIRS: &[&str] = &[
        "whois.arin.net",
        "whois.ripe.net",
        "whois.apnic.net",
        "whois.lacnic.net",
        "whois.afrinic.net",
    ];

    fn aggregator(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, Aggregator) {
        let transport = Arc::new(transport);
        let resolver = ReferralResolver::new(transport.clone());
        let servers = RIRS.iter().map(|s| s.to_string()).collect();
        (transport, Aggregator::new(resolver, servers))
    }

    #[tokio::test]
    async fn test_rejects_domain_targets() {
        let (transport, aggregator) = aggregator(ScriptedTransport::new());
        let err = aggregator
            .aggregate(&classify("example.com").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, WhoisError::InvalidTarget(_)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_queries_every_registry_once() {
        let (transport, aggregator) = aggregator(
            ScriptedTransport::new()
                .respond("whois.arin.net", "NetRange: 8.0.0.0 - 8.255.255.255\n")
                .respond("whois.ripe.net", "% not managed by RIPE\n"),
        );

        let set = aggregator
            .aggregate(&classify("8.8.8.8").unwrap())
            .await
            .unwrap();

        let mut called = transport.servers_called();
        called.sort();
        let mut expected: Vec<String> = RIRS.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(called, expected);
        assert!(transport.calls().iter().all(|(_, request)| request == "8.8.8.8"));

        assert_eq!(set.kind, RecordKind::Ip);
        assert_eq!(set.search, "8.8.8.8");
        assert_eq!(set.servers().collect::<Vec<_>>(), vec!["whois.arin.net"]);
    }

    #[tokio::test]
    async fn test_duplicate_bodies_keep_first_in_directory_order() {
        let mirrored = "aut-num: AS3333\nas-name: RIPE-NCC-AS\n";
        let (_, aggregator) = aggregator(
            ScriptedTransport::new()
                .respond("whois.ripe.net", mirrored)
                .respond("whois.apnic.net", mirrored)
                .respond("whois.afrinic.net", "% comment only\n"),
        );

        let set = aggregator
            .aggregate(&classify("AS3333").unwrap())
            .await
            .unwrap();

        assert_eq!(set.len(), 1);
        let record = set.get("whois.ripe.net").unwrap();
        assert_eq!(record.kind, RecordKind::Asn);
        assert_eq!(record.rawdata, mirrored);
        assert!(set.get("whois.apnic.net").is_none());
    }

    #[tokio::test]
    async fn test_failures_are_swallowed_and_records_ordered_by_server() {
        let (_, aggregator) = aggregator(
            ScriptedTransport::new()
                .respond("whois.ripe.net", "inetnum: 193.0.0.0 - 193.0.7.255\n")
                .respond("whois.arin.net", "NetRange: 193.0.0.0 - 193.255.255.255\n")
                .fail("whois.apnic.net", "connection reset"),
        );

        let set = aggregator
            .aggregate(&classify("193.0.6.139").unwrap())
            .await
            .unwrap();

        assert_eq!(
            set.servers().collect::<Vec<_>>(),
            vec!["whois.arin.net", "whois.ripe.net"]
        );
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_set() {
        let (_, aggregator) = aggregator(ScriptedTransport::new());
        let set = aggregator
            .aggregate(&classify("2001:db8::1").unwrap())
            .await
            .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_aborts_sweep() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let transport = Arc::new(
            ScriptedTransport::new().respond("whois.arin.net", "NetRange: x\n"),
        );
        let resolver = ReferralResolver::new(transport).with_cancellation(cancel);
        let aggregator = Aggregator::new(resolver, vec!["whois.arin.net".to_string()])
            .with_concurrency(1);

        let err = aggregator
            .aggregate(&classify("8.8.8.8").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, WhoisError::Cancelled { .. }));
    }
}

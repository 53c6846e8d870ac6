//! Follows `Whois Server:` referrals from thin registries to the
//! authoritative server.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::parser::RawResponse;
use super::transport::WhoisTransport;
use crate::error::{Result, WhoisError};

pub const DEFAULT_MAX_REFERRAL_HOPS: usize = 5;

static REFERRAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)whois server:[ \t]*(?:whois://)?(\S+)").expect("Invalid regex")
});

/// Server named by the first `Whois Server:` line, if any.
pub fn extract_referral(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        REFERRAL_REGEX
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end_matches('/').to_string())
            .filter(|server| !server.is_empty())
    })
}

#[derive(Debug, Clone)]
pub struct ReferralResolver {
    transport: Arc<dyn WhoisTransport>,
    max_hops: usize,
    cancel: CancellationToken,
}

impl ReferralResolver {
    pub fn new(transport: Arc<dyn WhoisTransport>) -> Self {
        Self {
            transport,
            max_hops: DEFAULT_MAX_REFERRAL_HOPS,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Query one server and clean its reply. No referral chasing.
    #[instrument(skip(self))]
    pub async fn resolve(&self, server: &str, query: &str) -> Result<RawResponse> {
        let payload = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                return Err(WhoisError::Cancelled { server: server.to_string() });
            }
            result = self.transport.query(server, query) => result?,
        };

        let raw = RawResponse::from_payload(server, &payload);
        debug!(bytes = raw.body.len(), "Cleaned WHOIS response");
        Ok(raw)
    }

    /// Query `initial`, then follow referrals until a server answers
    /// without one. Fails with `EmptyResult` if `initial` has nothing.
    #[instrument(skip(self))]
    pub async fn resolve_with_referrals(&self, initial: &str, query: &str) -> Result<RawResponse> {
        let mut current = self.resolve(initial, query).await?;
        if current.is_empty() {
            return Err(WhoisError::EmptyResult {
                server: initial.to_string(),
                query: query.to_string(),
            });
        }

        let mut visited = HashSet::new();
        visited.insert(initial.to_ascii_lowercase());
        let mut hops = 0;

        while let Some(next) = extract_referral(&current.body) {
            if !visited.insert(next.to_ascii_lowercase()) {
                debug!(server = %next, "Referral already visited, stopping");
                break;
            }
            if hops >= self.max_hops {
                warn!(
                    server = %current.server,
                    max_hops = self.max_hops,
                    "Referral hop limit reached, returning last response"
                );
                break;
            }
            hops += 1;

            debug!(from = %current.server, to = %next, hop = hops, "Following referral");
            let referred = self.resolve(&next, query).await?;
            if referred.is_empty() {
                warn!(
                    server = %next,
                    "Referred server returned nothing, keeping previous response"
                );
                break;
            }
            current = referred;
        }

        Ok(current)
    }
}

//! Syntax predicates for lookup targets.
//!
//! These checks are purely lexical: nothing here touches the network.

use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// `AS15169`, `as15169` or a bare `15169`.
static ASN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:AS)?\d{1,10}$").expect("Invalid ASN regex"));

/// Returns true for an IPv4 or IPv6 literal.
pub fn is_ip_literal(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// Returns true for a dotted hostname made of LDH labels.
///
/// This rejects:
/// - names without a dot
/// - empty labels (`example..com`, `.example.com`, `example.com.`)
/// - labels starting or ending with a hyphen
/// - anything other than ASCII alphanumerics, hyphens and dots
pub fn is_domain_syntax(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_DOMAIN_LEN || !s.contains('.') {
        return false;
    }

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Returns true for an autonomous-system number.
pub fn is_asn_syntax(s: &str) -> bool {
    ASN_PATTERN.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ip_literal() {
        assert!(is_ip_literal("8.8.8.8"));
        assert!(is_ip_literal("2001:4860:4860::8888"));
        assert!(is_ip_literal("::1"));
        assert!(!is_ip_literal("8.8.8"));
        assert!(!is_ip_literal("example.com"));
        assert!(!is_ip_literal("192.0.2.0/24"));
    }

    #[test]
    fn test_is_domain_syntax() {
        assert!(is_domain_syntax("example.com"));
        assert!(is_domain_syntax("Example.CO.uk"));
        assert!(is_domain_syntax("xn--80ak6aa92e.com"));

        assert!(!is_domain_syntax(""));
        assert!(!is_domain_syntax("nodots"));
        assert!(!is_domain_syntax("example..com"));
        assert!(!is_domain_syntax(".example.com"));
        assert!(!is_domain_syntax("example.com."));
        assert!(!is_domain_syntax("-example.com"));
        assert!(!is_domain_syntax("example-.com"));
        assert!(!is_domain_syntax("exa_mple.com"));
        assert!(!is_domain_syntax(&format!("{}.com", "a".repeat(64))));
    }

    #[test]
    fn test_is_asn_syntax() {
        assert!(is_asn_syntax("AS15169"));
        assert!(is_asn_syntax("as3333"));
        assert!(is_asn_syntax("15169"));

        assert!(!is_asn_syntax("AS"));
        assert!(!is_asn_syntax("ASX15169"));
        assert!(!is_asn_syntax("AS12345678901"));
        assert!(!is_asn_syntax("example"));
    }
}

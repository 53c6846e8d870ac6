//! Classification of user input into a lookup target.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WhoisError};
use crate::validation::{is_asn_syntax, is_domain_syntax, is_ip_literal};
use crate::whois::RecordKind;

/// Request suffix asking JPRS for English, extended output.
pub const EXTENDED_OUTPUT_SUFFIX: &str = "/e";

/// TLDs whose registries expect [`EXTENDED_OUTPUT_SUFFIX`] on the request line.
const EXTENDED_OUTPUT_TLDS: &[&str] = &["jp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Target {
    Domain {
        name: String,
        tld: String,
    },
    #[serde(rename = "ip")]
    IpAddress {
        value: String,
    },
    Asn {
        value: String,
    },
}

impl Target {
    /// The text identifying this target, as the user meant it.
    pub fn query(&self) -> &str {
        match self {
            Target::Domain { name, .. } => name,
            Target::IpAddress { value } | Target::Asn { value } => value,
        }
    }

    pub fn tld(&self) -> Option<&str> {
        match self {
            Target::Domain { tld, .. } => Some(tld),
            _ => None,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Target::Domain { .. } => RecordKind::Domain,
            Target::IpAddress { .. } => RecordKind::Ip,
            Target::Asn { .. } => RecordKind::Asn,
        }
    }

    /// The line actually written to the WHOIS server.
    ///
    /// Some registries need a suffix to return full output; the target itself
    /// is left untouched.
    pub fn request_line(&self) -> String {
        match self {
            Target::Domain { name, tld } if EXTENDED_OUTPUT_TLDS.contains(&tld.as_str()) => {
                format!("{}{}", name, EXTENDED_OUTPUT_SUFFIX)
            }
            _ => self.query().to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query())
    }
}

/// Classify raw input as an IP address, a domain or an AS number, in that order.
pub fn classify(input: &str) -> Result<Target> {
    let cleaned = clean(input);

    if is_ip_literal(&cleaned) {
        return Ok(Target::IpAddress { value: cleaned });
    }

    if is_domain_syntax(&cleaned) {
        let name = cleaned.to_ascii_lowercase();
        let tld = name.rsplit('.').next().unwrap_or_default().to_string();
        return Ok(Target::Domain { name, tld });
    }

    if is_asn_syntax(&cleaned) {
        return Ok(Target::Asn { value: cleaned });
    }

    Err(WhoisError::InvalidTarget(if cleaned.is_empty() {
        input.trim().to_string()
    } else {
        cleaned
    }))
}

/// Strip surrounding whitespace, an `http://`/`https://` scheme, any path and
/// a leading `www.` label.
///
/// Case is preserved. The result is a fixed point: cleaning it again is a no-op.
pub fn clean(input: &str) -> String {
    let mut current = input;
    loop {
        let next = clean_once(current);
        if next == current {
            return next.to_string();
        }
        current = next;
    }
}

fn clean_once(input: &str) -> &str {
    let s = input.trim();

    let s = strip_prefix_ignore_case(s, "http://")
        .or_else(|| strip_prefix_ignore_case(s, "https://"))
        .unwrap_or(s);

    let s = s.split('/').next().unwrap_or(s);

    strip_prefix_ignore_case(s, "www.").unwrap_or(s)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean("example.com"), "example.com");
        assert_eq!(clean("  WWW.Example.COM  "), "Example.COM");
        assert_eq!(clean("https://www.example.com/path"), "example.com");
        assert_eq!(clean("HTTP://example.com/"), "example.com");
        assert_eq!(clean("www.www.example.com"), "example.com");
        assert_eq!(clean("8.8.8.8"), "8.8.8.8");
    }

    #[test]
    fn test_clean_is_idempotent() {
        for input in [
            " HTTP://WWW.Example.COM ",
            "https://www.example.org/a/b",
            "www.example.net",
            "AS15169",
            "2001:db8::1",
        ] {
            let once = clean(input);
            assert_eq!(clean(&once), once, "cleaning {:?} twice changed it", input);
        }
    }

    #[test]
    fn test_classify_domain() {
        let target = classify(" HTTP://WWW.Example.COM ").unwrap();
        assert_eq!(
            target,
            Target::Domain {
                name: "example.com".to_string(),
                tld: "com".to_string(),
            }
        );
        assert_eq!(target.tld(), Some("com"));
        assert_eq!(target.kind(), RecordKind::Domain);
    }

    #[test]
    fn test_classify_tld_is_last_label_lowercased() {
        let target = classify("www.Example.CO.UK").unwrap();
        assert_eq!(target.tld(), Some("uk"));
        assert_eq!(target.query(), "example.co.uk");
    }

    #[test]
    fn test_classify_ip_before_domain() {
        // Dotted quads also satisfy the domain grammar; IP wins.
        assert_eq!(
            classify("8.8.8.8").unwrap(),
            Target::IpAddress {
                value: "8.8.8.8".to_string()
            }
        );
        assert_eq!(
            classify("2001:DB8::1").unwrap(),
            Target::IpAddress {
                value: "2001:DB8::1".to_string()
            }
        );
    }

    #[test]
    fn test_classify_asn() {
        assert_eq!(
            classify("AS15169").unwrap(),
            Target::Asn {
                value: "AS15169".to_string()
            }
        );
        assert_eq!(classify("15169").unwrap().kind(), RecordKind::Asn);
    }

    #[test]
    fn test_classify_invalid() {
        assert!(matches!(
            classify("not a target"),
            Err(WhoisError::InvalidTarget(_))
        ));
        assert!(matches!(classify("   "), Err(WhoisError::InvalidTarget(_))));
        assert!(matches!(
            classify("example..com"),
            Err(WhoisError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_request_line_decoration() {
        let jp = classify("example.jp").unwrap();
        assert_eq!(jp.request_line(), "example.jp/e");
        assert_eq!(jp.query(), "example.jp");

        let com = classify("example.com").unwrap();
        assert_eq!(com.request_line(), "example.com");

        let asn = classify("AS3333").unwrap();
        assert_eq!(asn.request_line(), "AS3333");
    }
}

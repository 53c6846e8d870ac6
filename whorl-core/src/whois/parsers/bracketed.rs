//! Parser for the JPRS `[Field] value` layout.
//!
//! Example (English output, requested with the `/e` suffix):
//! ```text
//! Domain Information:
//! a. [Domain Name]                EXAMPLE.JP
//! g. [Organization]               Example Corp.
//! p. [Name Server]                ns1.example.jp
//! p. [Name Server]                ns2.example.jp
//! ```

use super::collect_fields;
use crate::target::EXTENDED_OUTPUT_SUFFIX;
use crate::whois::parser::{RawResponse, Record, RecordKind};

pub(super) fn parse(search: &str, raw: &RawResponse) -> Record {
    let search = search
        .strip_suffix(EXTENDED_OUTPUT_SUFFIX)
        .unwrap_or(search);

    Record {
        search: search.to_string(),
        server: raw.server.clone(),
        kind: RecordKind::Domain,
        rawdata: raw.body.clone(),
        fields: collect_fields(&raw.body, split_line),
    }
}

/// The field name is whatever precedes the first `]`, minus its opening
/// bracket and any item marker (`a. `) in front of it.
fn split_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(']')?;
    let name = match name.rfind('[') {
        Some(open) => &name[open + 1..],
        None => name,
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::parser::FieldValue;

    const JPRS_SAMPLE: &str = "Domain Information:\n\
a. [Domain Name]                EXAMPLE.JP\n\
g. [Organization]               Example Corp.\n\
p. [Name Server]                ns1.example.jp\n\
p. [Name Server]                ns2.example.jp\n\
[State]                         Connected (2025/01/31)\n\
-- end of record --\n\
[Registered Date]               2001/01/31\n";

    #[test]
    fn test_bracketed_fields() {
        let raw = RawResponse::new("whois.jprs.jp", JPRS_SAMPLE);
        let record = parse("example.jp/e", &raw);

        assert_eq!(record.field("Domain Name"), Some(&FieldValue::from("EXAMPLE.JP")));
        assert_eq!(record.field("Organization"), Some(&FieldValue::from("Example Corp.")));
        assert_eq!(
            record.field("Name Server"),
            Some(&FieldValue::from(vec!["ns1.example.jp", "ns2.example.jp"]))
        );
        assert_eq!(
            record.field("State"),
            Some(&FieldValue::from("Connected (2025/01/31)"))
        );
    }

    #[test]
    fn test_bracketed_stops_at_terminator() {
        let raw = RawResponse::new("whois.jprs.jp", JPRS_SAMPLE);
        let record = parse("example.jp/e", &raw);
        assert!(!record.fields.contains("Registered Date"));
        assert!(!record.fields.contains("Domain Information:"));
    }

    #[test]
    fn test_bracketed_search_drops_request_suffix() {
        let raw = RawResponse::new("whois.jprs.jp", JPRS_SAMPLE);
        let record = parse("example.jp/e", &raw);
        assert_eq!(record.search, "example.jp");
        assert_eq!(record.server, "whois.jprs.jp");
        assert_eq!(record.kind, RecordKind::Domain);
    }

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line("[Domain Name] EXAMPLE.JP"),
            Some(("Domain Name".to_string(), "EXAMPLE.JP".to_string()))
        );
        assert_eq!(split_line("Domain Information:"), None);
        assert_eq!(split_line("[] nothing"), None);
    }
}

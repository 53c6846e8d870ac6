//! `Field: value` grammar shared by gTLD registries, registrars and the RIRs.

use super::collect_fields;
use crate::whois::parser::{RawResponse, Record, RecordKind};

/// Canonical key for the registered name in domain records.
const DOMAIN_FIELD: &str = "domain";

pub(super) fn parse(kind: RecordKind, search: &str, raw: &RawResponse) -> Record {
    let fields = collect_fields(&raw.body, |line| {
        let (name, value) = split_line(line)?;
        if kind == RecordKind::Domain && name.eq_ignore_ascii_case("domain name") {
            return Some((DOMAIN_FIELD.to_string(), value.to_string()));
        }
        Some((name.to_string(), value.to_string()))
    });

    Record {
        search: search.to_string(),
        server: raw.server.clone(),
        kind,
        rawdata: raw.body.clone(),
        fields,
    }
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

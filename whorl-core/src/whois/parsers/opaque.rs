//! Pass-through for registries without a line grammar (Nominet's `.uk`
//! output is indented prose blocks). Callers read `rawdata` directly.

use crate::whois::parser::{Fields, RawResponse, Record, RecordKind};

pub(super) fn parse(search: &str, raw: &RawResponse) -> Record {
    Record {
        search: search.to_string(),
        server: raw.server.clone(),
        kind: RecordKind::Unparsed,
        rawdata: raw.body.clone(),
        fields: Fields::new(),
    }
}

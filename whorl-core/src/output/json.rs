use super::OutputFormatter;
use crate::whois::{Record, ResultSet};

pub struct JsonFormatter {
    pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_record(&self, record: &Record) -> String {
        self.to_json(record)
    }

    fn format_result_set(&self, set: &ResultSet) -> String {
        self.to_json(set)
    }

    fn format_availability(&self, domain: &str, available: bool) -> String {
        self.to_json(&serde_json::json!({
            "domain": domain,
            "available": available,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::{Lookup, RawResponse, RecordKind};

    fn record() -> Record {
        let raw = RawResponse::from_payload(
            "whois.verisign-grs.com",
            "Registrar: Example\nDomain Name: EXAMPLE.COM\nName Server: A\nName Server: B\n",
        );
        crate::whois::parse(
            crate::whois::ParseFormat::Generic(RecordKind::Domain),
            "example.com",
            &raw,
        )
    }

    #[test]
    fn test_record_json_keeps_field_order() {
        let json = JsonFormatter::new().compact().format_record(&record());
        assert_eq!(
            json,
            "{\"search\":\"example.com\",\"server\":\"whois.verisign-grs.com\",\"type\":\"domain\",\
\"rawdata\":\"Registrar: Example\\nDomain Name: EXAMPLE.COM\\nName Server: A\\nName Server: B\\n\",\
\"fields\":{\"Registrar\":\"Example\",\"domain\":\"EXAMPLE.COM\",\"Name Server\":[\"A\",\"B\"]}}"
        );
    }

    #[test]
    fn test_lookup_json_is_untagged() {
        let formatter = JsonFormatter::new().compact();
        let lookup = Lookup::Record(record());
        assert_eq!(formatter.format_lookup(&lookup), formatter.format_record(&record()));

        let parsed: Lookup = serde_json::from_str(&formatter.format_lookup(&lookup)).unwrap();
        assert_eq!(parsed, lookup);
    }

    #[test]
    fn test_availability_json() {
        let json = JsonFormatter::new()
            .compact()
            .format_availability("example.com", false);
        assert_eq!(json, r#"{"available":false,"domain":"example.com"}"#);
    }

    #[test]
    fn test_result_set_json() {
        let set = crate::whois::parse_multi(
            RecordKind::Ip,
            "192.0.2.1",
            vec![RawResponse::new("whois.ripe.net", "netname: TEST-NET\n")],
        );
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter::new().format_result_set(&set)).unwrap();

        assert_eq!(value["type"], "ip");
        assert_eq!(
            value["records"]["whois.ripe.net"]["fields"]["netname"],
            "TEST-NET"
        );
    }
}

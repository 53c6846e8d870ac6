use colored::Colorize;

use super::OutputFormatter;
use crate::whois::{FieldValue, Record, ResultSet};

pub struct HumanFormatter {
    use_colors: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn label(&self, text: &str) -> String {
        if self.use_colors {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.use_colors {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.use_colors {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(&self, text: &str) -> String {
        if self.use_colors {
            text.white().to_string()
        } else {
            text.to_string()
        }
    }

    fn muted(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        if self.use_colors {
            format!("\n{}\n{}", text.magenta().bold(), "─".repeat(text.len()).dimmed())
        } else {
            format!("\n{}\n{}", text, "-".repeat(text.len()))
        }
    }

    fn record_body(&self, record: &Record, output: &mut Vec<String>) {
        output.push(format!(
            "  {}: {}",
            self.label("WHOIS Server"),
            self.value(&record.server)
        ));
        output.push(format!(
            "  {}: {}",
            self.label("Type"),
            self.value(&record.kind.to_string())
        ));

        // Unparsed records and empty parses fall back to the cleaned text.
        if record.fields.is_empty() {
            output.push(String::new());
            for line in record.rawdata.lines() {
                output.push(format!("  {}", self.muted(line)));
            }
            return;
        }

        for (name, value) in record.fields.iter() {
            match value {
                FieldValue::Single(v) => {
                    output.push(format!("  {}: {}", self.label(name), self.value(v)));
                }
                FieldValue::List(values) => {
                    output.push(format!("  {}:", self.label(name)));
                    for v in values {
                        output.push(format!("    - {}", self.value(v)));
                    }
                }
            }
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_record(&self, record: &Record) -> String {
        let mut output = vec![self.header(&format!("WHOIS: {}", record.search))];
        self.record_body(record, &mut output);
        output.join("\n")
    }

    fn format_result_set(&self, set: &ResultSet) -> String {
        let mut output = vec![self.header(&format!(
            "WHOIS: {} ({} result{})",
            set.search,
            set.len(),
            if set.len() == 1 { "" } else { "s" }
        ))];

        if set.is_empty() {
            output.push(format!("  {}", self.muted("No registry returned data")));
        }

        for (_, record) in set.iter() {
            output.push(String::new());
            self.record_body(record, &mut output);
        }

        output.join("\n")
    }

    fn format_availability(&self, domain: &str, available: bool) -> String {
        let status = if available {
            format!("{} No DNS records, likely available", self.success("✓"))
        } else {
            format!("{} Registered", self.warning("✗"))
        };
        format!("{}\n  {}", self.header(&format!("Availability: {}", domain)), status)
    }
}

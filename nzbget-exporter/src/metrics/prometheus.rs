//! Prometheus text exposition format.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::{MetricDesc, MetricId, MetricSink};
use crate::Error;
use crate::collector::FetchUnit;

/// Content type of the rendered output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

struct Family {
    desc: MetricDesc,
    /// Label values and the rendered line(s) for each series.
    series: Vec<(Vec<String>, String)>,
}

/// Buffers one scrape and renders it grouped by family.
#[derive(Default)]
pub struct TextEncoder {
    families: BTreeMap<MetricId, Family>,
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, desc: &MetricDesc, labels: Vec<String>, text: String) {
        self.families
            .entry(desc.id)
            .or_insert_with(|| Family {
                desc: desc.clone(),
                series: Vec::new(),
            })
            .series
            .push((labels, text));
    }

    /// Render every buffered family.
    pub fn finish(mut self) -> String {
        let mut output = String::new();

        for family in self.families.values_mut() {
            let name = &family.desc.name;
            let _ = writeln!(output, "# HELP {} {}", name, escape_help(family.desc.help));
            let _ = writeln!(output, "# TYPE {} {}", name, family.desc.kind);

            family.series.sort_by(|a, b| a.0.cmp(&b.0));
            for (_, text) in &family.series {
                output.push_str(text);
            }
        }

        output
    }
}

impl MetricSink for TextEncoder {
    fn sample(&mut self, desc: &MetricDesc, labels: &[String], value: f64) {
        let line = format!(
            "{}{} {}\n",
            desc.name,
            format_labels(desc.labels, labels),
            format_value(value)
        );
        self.push(desc, labels.to_vec(), line);
    }

    fn fault(&mut self, desc: &MetricDesc, unit: FetchUnit, error: &Error) {
        let labels = vec![unit.to_string()];
        let text = format!(
            "# ERROR collecting {}: {}\n{}{} 0\n",
            unit,
            error.to_string().replace('\n', " "),
            desc.name,
            format_labels(desc.labels, &labels),
        );
        self.push(desc, labels, text);
    }
}

fn format_labels(names: &[&str], values: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }

    let labels_str = names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect::<Vec<_>>()
        .join(",");

    format!("{{{}}}", labels_str)
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

use crate::core::client::composite_store_id;
use crate::core::{LookupOutcome, OrderResult, ResultSink, StatusCategory, Tally};
use crate::domain::model::{Locale, Store};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Width of the label column in the text report; fits `unrecognized`.
const LABEL_WIDTH: usize = 12;

/// Where per-order lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Stdout,
    Stderr,
}

/// Prints `<order_id> <label>` for every completed lookup.
#[derive(Debug, Clone)]
pub struct LineSink {
    target: LineTarget,
}

impl LineSink {
    pub fn new(target: LineTarget) -> Self {
        Self { target }
    }
}

impl ResultSink for LineSink {
    fn emit(&self, result: &OrderResult) {
        if let LookupOutcome::Success { raw_text } = &result.outcome {
            tracing::debug!(order_id = %result.order_id, "Status text: {:?}", raw_text);
        }

        // one locked write per line
        let line = result.line();
        let written = match self.target {
            LineTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            LineTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
        if let Err(e) = written {
            tracing::warn!("Could not write result line for {}: {}", result.order_id, e);
        }
    }
}

/// Final tally as aligned `label count` lines followed by the total.
pub fn render_text(tally: &Tally) -> String {
    let mut lines: Vec<String> = tally
        .iter()
        .map(|(category, count)| {
            format!("{:<width$} {}", category.label(), count, width = LABEL_WIDTH)
        })
        .collect();
    lines.push(format!("{:<width$} {}", "total", tally.total(), width = LABEL_WIDTH));
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub placed: u64,
    pub processing: u64,
    pub shipped: u64,
    pub delivered: u64,
    pub cancelled: u64,
    pub unrecognized: u64,
    pub lookup_failed: u64,
}

impl From<&Tally> for ReportCounts {
    fn from(tally: &Tally) -> Self {
        Self {
            placed: tally.get(StatusCategory::Placed),
            processing: tally.get(StatusCategory::Processing),
            shipped: tally.get(StatusCategory::Shipped),
            delivered: tally.get(StatusCategory::Delivered),
            cancelled: tally.get(StatusCategory::Cancelled),
            unrecognized: tally.get(StatusCategory::Unrecognized),
            lookup_failed: tally.get(StatusCategory::LookupFailed),
        }
    }
}

/// Machine-readable summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub store: Store,
    pub locale: Locale,
    pub fascia: String,
    pub total: u64,
    pub counts: ReportCounts,
}

impl RunReport {
    pub fn new(store: Store, locale: Locale, tally: &Tally) -> Self {
        Self {
            generated_at: Utc::now(),
            store,
            locale,
            fascia: composite_store_id(store, locale),
            total: tally.total(),
            counts: ReportCounts::from(tally),
        }
    }

    pub fn to_json(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_lists_every_category() {
        let tally = Tally::from_counts([1, 0, 0, 1, 0, 0, 1]);
        let text = render_text(&tally);

        let expected = "\
placed       1
processing   0
shipped      0
delivered    1
cancelled    0
unrecognized 0
error        1
total        3";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_run_report_json() {
        let tally = Tally::from_counts([2, 1, 0, 0, 0, 3, 4]);
        let report = RunReport::new(Store::Footpatrol, Locale::Uk, &tally);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["store"], "footpatrol");
        assert_eq!(json["locale"], "uk");
        assert_eq!(json["fascia"], "footpatrolgb");
        assert_eq!(json["total"], 10);
        assert_eq!(json["counts"]["placed"], 2);
        assert_eq!(json["counts"]["processing"], 1);
        assert_eq!(json["counts"]["unrecognized"], 3);
        assert_eq!(json["counts"]["lookup_failed"], 4);
        assert!(json["generated_at"].as_str().is_some());
    }
}

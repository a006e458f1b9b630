use std::collections::HashMap;

use super::record::{status_is_active, Record};
use super::schema::SheetSchema;
use super::snapshot::{safe_cell, Snapshot};

/// Group label used when the grouping cell is empty or missing.
pub const UNKNOWN_GROUP: &str = "Noma'lum";

/// Headline counts over a result set or over the whole sheet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub percentage: f64,
}

impl Summary {
    fn from_counts(total: usize, active: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            round2(active as f64 / total as f64 * 100.0)
        };
        Self {
            total,
            active,
            percentage,
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Counts over an already-filtered result set.
pub fn summarize(records: &[Record], required_status: &str) -> Summary {
    let active = records
        .iter()
        .filter(|r| r.is_active(required_status))
        .count();
    Summary::from_counts(records.len(), active)
}

/// Counts over every data row of the snapshot, ignoring any filter.
pub fn summarize_snapshot(
    snapshot: &Snapshot,
    schema: &SheetSchema,
    required_status: &str,
) -> Summary {
    let total = snapshot.record_count();
    let active = snapshot
        .data_rows()
        .iter()
        .filter(|row| status_is_active(safe_cell(row, schema.status), required_status))
        .count();
    Summary::from_counts(total, active)
}

/// Per-group counts keyed by a chosen column, ordered case-insensitively
/// by label so reports are reproducible run to run.
pub fn summarize_grouped(
    snapshot: &Snapshot,
    schema: &SheetSchema,
    group_column: usize,
    required_status: &str,
) -> Vec<(String, Summary)> {
    let mut totals: HashMap<String, (usize, usize)> = HashMap::new();
    for row in snapshot.data_rows() {
        let raw = safe_cell(row, group_column);
        let label = if raw.is_empty() { UNKNOWN_GROUP } else { raw };
        let entry = totals.entry(label.to_string()).or_default();
        entry.0 += 1;
        if status_is_active(safe_cell(row, schema.status), required_status) {
            entry.1 += 1;
        }
    }

    let mut groups: Vec<(String, Summary)> = totals
        .into_iter()
        .map(|(label, (total, active))| (label, Summary::from_counts(total, active)))
        .collect();
    groups.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
    groups
}

/// Row counts per distinct value of a column, most frequent first, for
/// the distribution chart. Empty cells are dropped rather than bucketed.
pub fn distribution(snapshot: &Snapshot, column: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in snapshot.data_rows() {
        let value = safe_cell(row, column);
        if value.is_empty() {
            continue;
        }
        *counts.entry(value.to_string()).or_default() += 1;
    }

    let mut items: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable report order: count descending, label as tie-break.
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

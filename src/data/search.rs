use tracing::debug;

use super::record::Record;
use super::schema::SheetSchema;
use super::snapshot::{safe_cell, Snapshot};

/// Substring search over the registry snapshot.
///
/// No I/O, no snapshot mutation: the caller owns where the snapshot came
/// from (usually the cache) and what happens to the result set.
pub struct RecordFilter;

impl RecordFilter {
    /// Scan data rows in order and project every match into a `Record`.
    ///
    /// The query is trimmed and case-folded; an empty query returns no
    /// results without touching the snapshot. A row matches when the
    /// folded query is a substring of the full name, HEMIS id, personal
    /// number, or UID. Rows with all four of those fields empty are
    /// skipped outright.
    pub fn search(
        snapshot: &Snapshot,
        query: &str,
        schema: &SheetSchema,
        required_status: &str,
    ) -> Vec<Record> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();
        for row in snapshot.data_rows() {
            let full_name = safe_cell(row, schema.full_name);
            let hemis_id = safe_cell(row, schema.hemis_id);
            let personal_number = safe_cell(row, schema.personal_number);
            let uid = safe_cell(row, schema.uid);

            if full_name.is_empty()
                && hemis_id.is_empty()
                && personal_number.is_empty()
                && uid.is_empty()
            {
                continue;
            }

            let matched = full_name.to_lowercase().contains(&q)
                || hemis_id.to_lowercase().contains(&q)
                || personal_number.to_lowercase().contains(&q)
                || uid.to_lowercase().contains(&q);

            if matched {
                results.push(Record::from_row(row, schema, required_status));
            }
        }

        debug!(target: "search", query = %q, hits = results.len(), "snapshot scan complete");
        results
    }
}

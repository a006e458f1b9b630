/// Full tabular read of the registry worksheet at one point in time.
///
/// Row 0 is the header; rows 1.. are student records. The snapshot is
/// immutable once fetched and replaced wholesale on refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    rows: Vec<Vec<String>>,
}

impl Snapshot {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Raw rows including the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Data rows only (header excluded). Empty when the sheet holds
    /// nothing but a header, or nothing at all.
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(|r| r.as_slice())
    }

    pub fn record_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Bounds-safe cell access: anything outside the row or blank normalizes
/// to an empty string, trimmed.
pub fn safe_cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|v| v.trim()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn safe_cell_normalizes_missing_and_padded_cells() {
        let r = row(&["a", "  b  ", ""]);
        assert_eq!(safe_cell(&r, 0), "a");
        assert_eq!(safe_cell(&r, 1), "b");
        assert_eq!(safe_cell(&r, 2), "");
        assert_eq!(safe_cell(&r, 99), "");
    }

    #[test]
    fn data_rows_skip_header() {
        let snap = Snapshot::new(vec![row(&["header"]), row(&["data"])]);
        assert_eq!(snap.record_count(), 1);
        assert_eq!(snap.data_rows().len(), 1);
        assert_eq!(snap.data_rows()[0][0], "data");

        let empty = Snapshot::new(vec![]);
        assert!(empty.data_rows().is_empty());
        assert!(empty.is_empty());
    }
}

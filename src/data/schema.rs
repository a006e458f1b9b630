use crate::error::BotError;

use super::snapshot::Snapshot;

/// Column layout of the registry worksheet, 0-based offsets into the
/// A:AI range. The sheet is maintained externally; this is the one place
/// that records which column means what, so a layout change fails fast
/// instead of silently reading wrong fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSchema {
    pub version: u32,
    pub uid: usize,
    pub hemis_id: usize,
    pub full_name: usize,
    pub status: usize,
    pub personal_number: usize,
    pub group: usize,
    pub specialization: usize,
    pub faculty: usize,
    pub position: usize,
    pub organization: usize,
    pub contract_date: usize,
}

/// Layout currently used by the registry sheet (columns A..AI).
pub const SHEET_SCHEMA_V1: SheetSchema = SheetSchema {
    version: 1,
    uid: 0,              // A
    hemis_id: 2,         // C
    full_name: 3,        // D
    status: 4,           // E
    personal_number: 5,  // F
    group: 14,           // O
    specialization: 22,  // W
    faculty: 23,         // X
    position: 29,        // AD
    organization: 30,    // AE
    contract_date: 34,   // AI
};

impl SheetSchema {
    /// Number of columns a fetched row must span to cover every offset.
    pub fn min_columns(&self) -> usize {
        [
            self.uid,
            self.hemis_id,
            self.full_name,
            self.status,
            self.personal_number,
            self.group,
            self.specialization,
            self.faculty,
            self.position,
            self.organization,
            self.contract_date,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }

    /// A1-notation range covering the schema, e.g. "A:AI".
    pub fn range(&self) -> String {
        format!("A:{}", column_letters(self.min_columns() - 1))
    }

    /// Validate a freshly fetched snapshot against this layout.
    ///
    /// Only the header row is checked: data rows are legitimately ragged
    /// (trailing empty cells are not transferred by the sheets API) and
    /// cell access is bounds-safe anyway.
    pub fn validate(&self, snapshot: &Snapshot) -> Result<(), BotError> {
        let width = snapshot.header().map(|h| h.len()).unwrap_or(0);
        if width < self.min_columns() {
            return Err(BotError::SchemaMismatch {
                expected: self.min_columns(),
                actual: width,
            });
        }
        Ok(())
    }
}

/// 0-based column index to sheet letters (0 -> "A", 34 -> "AI").
fn column_letters(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ascii column letters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_covers_the_ai_range() {
        assert_eq!(SHEET_SCHEMA_V1.min_columns(), 35);
        assert_eq!(SHEET_SCHEMA_V1.range(), "A:AI");
    }

    #[test]
    fn column_letters_roundtrip() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(34), "AI");
    }

    #[test]
    fn validate_rejects_narrow_header() {
        let narrow = Snapshot::new(vec![vec!["only".to_string(); 10]]);
        let err = SHEET_SCHEMA_V1.validate(&narrow).unwrap_err();
        match err {
            BotError::SchemaMismatch { expected, actual } => {
                assert_eq!(expected, 35);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_accepts_full_width_header() {
        let wide = Snapshot::new(vec![vec![String::new(); 35]]);
        assert!(SHEET_SCHEMA_V1.validate(&wide).is_ok());
    }
}

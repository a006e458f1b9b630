use serde::Serialize;

use super::schema::SheetSchema;
use super::snapshot::safe_cell;

/// One student row projected into named fields.
///
/// `employment` is populated only when the status text contains the
/// configured required-status phrase; for everyone else the three fields
/// are absent from the record entirely, not blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub uid: String,
    pub hemis_id: String,
    pub full_name: String,
    pub status: String,
    pub personal_number: String,
    pub faculty: String,
    pub specialization: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment: Option<Employment>,
}

/// Contract details exposed only for students with an active contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employment {
    pub position: String,
    pub organization: String,
    pub contract_date: String,
}

impl Record {
    /// Project one data row through the schema. Redaction rule: the
    /// employment block exists iff `status` contains `required_status`
    /// case-insensitively.
    pub fn from_row(row: &[String], schema: &SheetSchema, required_status: &str) -> Self {
        let status = safe_cell(row, schema.status).to_string();
        let employment = if status_is_active(&status, required_status) {
            Some(Employment {
                position: safe_cell(row, schema.position).to_string(),
                organization: safe_cell(row, schema.organization).to_string(),
                contract_date: safe_cell(row, schema.contract_date).to_string(),
            })
        } else {
            None
        };

        Self {
            uid: safe_cell(row, schema.uid).to_string(),
            hemis_id: safe_cell(row, schema.hemis_id).to_string(),
            full_name: safe_cell(row, schema.full_name).to_string(),
            status,
            personal_number: safe_cell(row, schema.personal_number).to_string(),
            faculty: safe_cell(row, schema.faculty).to_string(),
            specialization: safe_cell(row, schema.specialization).to_string(),
            group: safe_cell(row, schema.group).to_string(),
            employment,
        }
    }

    pub fn is_active(&self, required_status: &str) -> bool {
        status_is_active(&self.status, required_status)
    }
}

/// Substring containment, case-folded. Deliberately not a whole-phrase
/// equality check: the sheet's status texts embed the phrase in longer
/// wordings.
pub fn status_is_active(status: &str, required_status: &str) -> bool {
    if required_status.is_empty() {
        return false;
    }
    status.to_lowercase().contains(&required_status.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::SHEET_SCHEMA_V1;

    const REQUIRED: &str = "faol mehnat shartnomasiga ega";

    fn sheet_row(status: &str) -> Vec<String> {
        let mut row = vec![String::new(); 35];
        row[0] = "UID-1".into();
        row[2] = "12345".into();
        row[3] = "Aliyev Ali".into();
        row[4] = status.into();
        row[5] = "30101001234567".into();
        row[29] = "Muhandis".into();
        row[30] = "ABC MChJ".into();
        row[34] = "2023-10-01".into();
        row
    }

    #[test]
    fn active_status_exposes_employment() {
        let row = sheet_row("Faol mehnat shartnomasiga ega (my.mehnat.uz)");
        let rec = Record::from_row(&row, &SHEET_SCHEMA_V1, REQUIRED);
        let emp = rec.employment.expect("employment present");
        assert_eq!(emp.position, "Muhandis");
        assert_eq!(emp.organization, "ABC MChJ");
        assert_eq!(emp.contract_date, "2023-10-01");
    }

    #[test]
    fn inactive_status_omits_employment_even_when_cells_are_filled() {
        let row = sheet_row("nofaol");
        let rec = Record::from_row(&row, &SHEET_SCHEMA_V1, REQUIRED);
        assert!(rec.employment.is_none());
    }

    #[test]
    fn status_match_is_case_insensitive_substring() {
        assert!(status_is_active("FAOL MEHNAT SHARTNOMASIGA EGA", REQUIRED));
        assert!(status_is_active(
            "talaba faol mehnat shartnomasiga ega emasmi tekshirilmoqda",
            REQUIRED
        ));
        assert!(!status_is_active("nofaol", REQUIRED));
        assert!(!status_is_active("anything", ""));
    }
}

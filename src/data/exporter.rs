use chrono::Local;
use tracing::info;

use crate::error::BotError;

use super::record::Record;

/// Telegram rejects documents above 50 MB; gate before sending.
pub const MAX_EXPORT_BYTES: usize = 50 * 1024 * 1024;

/// A serialized export ready to hand to the transport.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Serializes result sets to CSV for document delivery.
pub struct ResultExporter;

impl ResultExporter {
    /// Export the full (unpaged) result set. Employment columns are blank
    /// for records without an active contract.
    pub fn to_csv(results: &[Record]) -> Result<ExportFile, BotError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "hemisuid",
                "hemis",
                "fio",
                "fakultet",
                "mutaxassislik",
                "guruh",
                "jshshir",
                "status",
                "lavozim",
                "tashkilot",
                "sanasi",
            ])
            .map_err(csv_error)?;

        for record in results {
            let (position, organization, contract_date) = match &record.employment {
                Some(emp) => (
                    emp.position.as_str(),
                    emp.organization.as_str(),
                    emp.contract_date.as_str(),
                ),
                None => ("", "", ""),
            };
            writer
                .write_record([
                    record.uid.as_str(),
                    record.hemis_id.as_str(),
                    record.full_name.as_str(),
                    record.faculty.as_str(),
                    record.specialization.as_str(),
                    record.group.as_str(),
                    record.personal_number.as_str(),
                    record.status.as_str(),
                    position,
                    organization,
                    contract_date,
                ])
                .map_err(csv_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        if bytes.len() > MAX_EXPORT_BYTES {
            return Err(BotError::ExportTooLarge {
                size: bytes.len(),
                limit: MAX_EXPORT_BYTES,
            });
        }

        let filename = format!("Result-{}.csv", Local::now().format("%Y-%m-%d_%H-%M-%S"));
        info!(target: "export", rows = results.len(), bytes = bytes.len(), %filename, "export serialized");
        Ok(ExportFile { filename, bytes })
    }
}

fn csv_error(e: csv::Error) -> BotError {
    BotError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Employment;

    fn record(name: &str, employment: Option<Employment>) -> Record {
        Record {
            uid: "u1".into(),
            hemis_id: "h1".into(),
            full_name: name.into(),
            status: "faol mehnat shartnomasiga ega".into(),
            personal_number: "p1".into(),
            faculty: "Fizika".into(),
            specialization: "Fizika".into(),
            group: "101".into(),
            employment,
        }
    }

    #[test]
    fn export_includes_header_and_one_line_per_record() {
        let results = vec![
            record(
                "Aliyev Ali",
                Some(Employment {
                    position: "Muhandis".into(),
                    organization: "ABC MChJ".into(),
                    contract_date: "2023-10-01".into(),
                }),
            ),
            record("Karimov Karim", None),
        ];

        let file = ResultExporter::to_csv(&results).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("hemisuid,hemis,fio"));
        assert!(lines[1].contains("Muhandis"));
        // Redacted records export with blank employment columns.
        assert!(lines[2].ends_with(",,,"));
        assert!(file.filename.starts_with("Result-"));
        assert!(file.filename.ends_with(".csv"));
    }
}

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::BotError;

use super::schema::SheetSchema;
use super::snapshot::Snapshot;

/// Seam between the bot and the remote registry store. The cache talks to
/// this; tests substitute an in-memory source.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch the header row plus all data rows of one worksheet, cells as
    /// strings. Any remote failure surfaces as `SourceUnavailable`.
    async fn fetch(&self, sheet_id: &str, worksheet: &str) -> Result<Snapshot, BotError>;

    /// Overwrite one row starting at column A (1-based row index).
    async fn update_row(
        &self,
        sheet_id: &str,
        worksheet: &str,
        row_index: usize,
        values: &[String],
    ) -> Result<(), BotError>;
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Thin Google Sheets values-API client.
pub struct SheetsClient {
    client: reqwest::Client,
    api_token: String,
    schema: SheetSchema,
}

impl SheetsClient {
    pub fn new(api_token: String, schema: SheetSchema) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token,
            schema,
        }
    }

    fn values_url(&self, sheet_id: &str, range: &str) -> String {
        format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            sheet_id, range
        )
    }
}

#[async_trait]
impl RowSource for SheetsClient {
    async fn fetch(&self, sheet_id: &str, worksheet: &str) -> Result<Snapshot, BotError> {
        let range = format!("{}!{}", worksheet, self.schema.range());
        let url = self.values_url(sheet_id, &range);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| BotError::SourceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(target: "sheets", %status, "values fetch failed: {}", body);
            return Err(BotError::SourceUnavailable(format!(
                "sheets API returned {status}"
            )));
        }

        let parsed: ValuesResponse = response
            .json()
            .await
            .map_err(|e| BotError::SourceUnavailable(e.to_string()))?;

        info!(target: "sheets", rows = parsed.values.len(), %range, "fetched worksheet");
        Ok(Snapshot::new(parsed.values))
    }

    async fn update_row(
        &self,
        sheet_id: &str,
        worksheet: &str,
        row_index: usize,
        values: &[String],
    ) -> Result<(), BotError> {
        let range = format!("{}!A{}", worksheet, row_index);
        let url = format!(
            "{}?valueInputOption=RAW",
            self.values_url(sheet_id, &range)
        );

        let body = serde_json::json!({ "values": [values] });
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::SourceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BotError::SourceUnavailable(format!(
                "row update returned {status}"
            )));
        }

        info!(target: "sheets", row = row_index, "row updated");
        Ok(())
    }
}

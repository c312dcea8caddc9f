use std::sync::Arc;

use formdesk_core::error::{FormdeskError, Result};
use serde_json::Value;

use crate::auth::SheetsAuth;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Thin client over the Sheets v4 values endpoints.
///
/// Transport and auth failures surface as `Sheets`/`Http` errors; an empty
/// value grid is a successful, empty result. Callers decide what emptiness
/// means.
pub struct SheetsClient {
    auth: Arc<SheetsAuth>,
    spreadsheet_id: String,
    http: reqwest::Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new(auth: Arc<SheetsAuth>, spreadsheet_id: String) -> Self {
        Self {
            auth,
            spreadsheet_id,
            http: reqwest::Client::new(),
            base_url: SHEETS_API.to_string(),
        }
    }

    /// Read a rectangular grid of strings from an A1 range.
    pub async fn values_get(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{}/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            encode_range(range)
        );
        let data = self.get(&url).await?;
        Ok(parse_values(&data))
    }

    /// Append one row after the last row of the range's table.
    pub async fn values_append(&self, range: &str, row: &[String]) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}:append?valueInputOption=USER_ENTERED",
            self.base_url,
            self.spreadsheet_id,
            encode_range(range)
        );
        let body = serde_json::json!({ "values": [row] });
        self.post(&url, &body).await.map(|_| ())
    }

    /// Overwrite the cells of an exact A1 range with one row.
    pub async fn values_update(&self, range: &str, row: &[String]) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            self.base_url,
            self.spreadsheet_id,
            encode_range(range)
        );
        let body = serde_json::json!({ "values": [row] });
        self.put(&url, &body).await.map(|_| ())
    }

    async fn get(&self, url: &str) -> Result<Value> {
        let token = self.auth.access_token().await?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("sheets request failed: {e}")))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("sheets response read failed: {e}")))?;

        if status != 200 {
            return Err(FormdeskError::Http { status, body: text });
        }

        serde_json::from_str(&text)
            .map_err(|e| FormdeskError::Sheets(format!("sheets json parse failed: {e}")))
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let token = self.auth.access_token().await?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("sheets request failed: {e}")))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("sheets response read failed: {e}")))?;

        if status != 200 {
            return Err(FormdeskError::Http { status, body: text });
        }

        serde_json::from_str(&text)
            .map_err(|e| FormdeskError::Sheets(format!("sheets json parse failed: {e}")))
    }

    async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        let token = self.auth.access_token().await?;
        let resp = self
            .http
            .put(url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("sheets request failed: {e}")))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("sheets response read failed: {e}")))?;

        if status != 200 {
            return Err(FormdeskError::Http { status, body: text });
        }

        serde_json::from_str(&text)
            .map_err(|e| FormdeskError::Sheets(format!("sheets json parse failed: {e}")))
    }
}

/// Unpack a values response (`{"values": [[...], ...]}`) into a grid of
/// strings. Non-string cells are stringified; a missing values key is an
/// empty grid.
fn parse_values(data: &Value) -> Vec<Vec<String>> {
    data["values"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| cells.iter().map(cell_to_string).collect())
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Minimal percent-encoding for an A1 range in a URL path segment.
fn encode_range(range: &str) -> String {
    range
        .replace('%', "%25")
        .replace(' ', "%20")
        .replace('!', "%21")
        .replace(':', "%3A")
        .replace('\'', "%27")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values_grid() {
        let data = serde_json::json!({
            "range": "Sheet1!A1:C2",
            "values": [["Code", "Name"], ["F001", "Leave Form", "HR Drive"]],
        });
        let grid = parse_values(&data);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec!["Code".to_string(), "Name".to_string()]);
        assert_eq!(grid[1][2], "HR Drive");
    }

    #[test]
    fn test_parse_values_missing_key_is_empty() {
        let data = serde_json::json!({ "range": "Sheet1!A1:C1" });
        assert!(parse_values(&data).is_empty());
    }

    #[test]
    fn test_parse_values_stringifies_numbers() {
        let data = serde_json::json!({ "values": [[42, "x", null]] });
        let grid = parse_values(&data);
        assert_eq!(grid[0], vec!["42".to_string(), "x".to_string(), String::new()]);
    }

    #[test]
    fn test_encode_range() {
        assert_eq!(encode_range("Sheet1!A:F"), "Sheet1%21A%3AF");
        assert_eq!(encode_range("'My Sheet'!A1"), "%27My%20Sheet%27%21A1");
    }
}

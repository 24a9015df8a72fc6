// [libs/infra/gsuite/src/client.rs]
/*!
 * =================================================================
 * APARATO: GOOGLE REST UPLINK (V4.4 - HARNESS BOUND)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: TRANSPORTE AUTENTICADO HACIA DOCS Y SHEETS
 *
 * # Logic:
 * El intercambio credencial->token es un colaborador externo; este
 * uplink recibe el bearer token ya emitido y concentra la traducción
 * de respuestas HTTP al catálogo RpcError, incluido Retry-After.
 * =================================================================
 */

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::info;

use sequoia_infra_rpc::{RpcError, RpcHarness};

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DOCS_ENDPOINT: &str = "https://docs.googleapis.com/v1/documents";

/// Propiedades mínimas de una pestaña del spreadsheet.
#[derive(Debug, Clone)]
pub struct TabProperties {
    pub sheet_id: i64,
    pub title: String,
}

/// Cliente REST compartido para Docs y Sheets, disciplinado por el arnés.
#[derive(Clone)]
pub struct GoogleApiClient {
    http_client: reqwest::Client,
    access_token: String,
    harness: Arc<RpcHarness>,
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn rows_from_values(payload: &Value) -> Vec<Vec<String>> {
    payload
        .get("values")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| row.as_array().map(|cells| cells.iter().map(cell_to_string).collect()).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

impl GoogleApiClient {
    pub fn new(access_token: String, harness: Arc<RpcHarness>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("Sequoia-Voyage-Ingest/0.4")
            .timeout(Duration::from_secs(60))
            .build()
            .expect("FATAL: HTTP client initialization failed.");
        Self { http_client, access_token, harness }
    }

    /// Traduce una respuesta HTTP al catálogo del arnés, preservando
    /// el Retry-After del servidor cuando viene presente.
    async fn decode(response: reqwest::Response) -> Result<Value, RpcError> {
        let status = response.status();
        if !status.is_success() {
            let retry_after_seconds = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(300).collect();
            return Err(RpcError::Status { code: status.as_u16(), message, retry_after_seconds });
        }
        response
            .json::<Value>()
            .await
            .map_err(|fault| RpcError::Payload(fault.to_string()))
    }

    async fn get_json(&self, label: &str, url: String) -> Result<Value, RpcError> {
        self.harness
            .execute(label, || async {
                let response = self
                    .http_client
                    .get(&url)
                    .bearer_auth(&self.access_token)
                    .send()
                    .await
                    .map_err(|fault| RpcError::Transport(fault.to_string()))?;
                Self::decode(response).await
            })
            .await
    }

    async fn post_json(&self, label: &str, url: String, body: Value) -> Result<Value, RpcError> {
        self.harness
            .execute(label, || async {
                let response = self
                    .http_client
                    .post(&url)
                    .bearer_auth(&self.access_token)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|fault| RpcError::Transport(fault.to_string()))?;
                Self::decode(response).await
            })
            .await
    }

    async fn put_json(&self, label: &str, url: String, body: Value) -> Result<Value, RpcError> {
        self.harness
            .execute(label, || async {
                let response = self
                    .http_client
                    .put(&url)
                    .bearer_auth(&self.access_token)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|fault| RpcError::Transport(fault.to_string()))?;
                Self::decode(response).await
            })
            .await
    }

    // ------- Docs -------

    /// Lee un documento y aplana sus párrafos a texto plano.
    pub async fn read_document_text(&self, doc_id: &str) -> Result<String, RpcError> {
        let payload = self.get_json("docs.documents.get", format!("{DOCS_ENDPOINT}/{doc_id}")).await?;
        let mut chunks: Vec<&str> = Vec::new();
        if let Some(content) = payload.pointer("/body/content").and_then(Value::as_array) {
            for block in content {
                let Some(elements) = block.pointer("/paragraph/elements").and_then(Value::as_array) else {
                    continue;
                };
                for element in elements {
                    if let Some(text) = element.pointer("/textRun/content").and_then(Value::as_str) {
                        chunks.push(text);
                    }
                }
            }
        }
        info!("📜 [GSUITE]: Document {doc_id} flattened ({} paragraph chunks)", chunks.len());
        Ok(chunks.concat())
    }

    // ------- Sheets: lecturas -------

    /// Metadatos de pestañas (título y sheetId numérico).
    pub async fn spreadsheet_tabs(&self, spreadsheet_id: &str) -> Result<Vec<TabProperties>, RpcError> {
        let url = format!("{SHEETS_ENDPOINT}/{spreadsheet_id}?fields=sheets.properties");
        let payload = self.get_json("sheets.spreadsheets.get", url).await?;
        let mut tabs = Vec::new();
        if let Some(sheets) = payload.get("sheets").and_then(Value::as_array) {
            for sheet in sheets {
                let Some(properties) = sheet.get("properties") else { continue };
                let sheet_id = properties.get("sheetId").and_then(Value::as_i64).unwrap_or_default();
                let title = properties.get("title").and_then(Value::as_str).unwrap_or_default().to_string();
                tabs.push(TabProperties { sheet_id, title });
            }
        }
        Ok(tabs)
    }

    /// Lectura completa de un rango (`tab!A:ZZ`), celdas como texto.
    pub async fn values_get(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>, RpcError> {
        let url = format!("{SHEETS_ENDPOINT}/{spreadsheet_id}/values/{range}");
        let payload = self.get_json(&format!("sheets.values.get({range})"), url).await?;
        Ok(rows_from_values(&payload))
    }

    // ------- Sheets: escrituras -------

    pub async fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), RpcError> {
        let url = format!("{SHEETS_ENDPOINT}/{spreadsheet_id}/values/{range}?valueInputOption=RAW");
        self.put_json(&format!("sheets.values.update({range})"), url, json!({ "values": values }))
            .await
            .map(|_| ())
    }

    /// Corrección de múltiples rangos en un único lote.
    pub async fn values_batch_update(
        &self,
        spreadsheet_id: &str,
        data: Vec<(String, Vec<Vec<String>>)>,
    ) -> Result<(), RpcError> {
        if data.is_empty() {
            return Ok(());
        }
        let url = format!("{SHEETS_ENDPOINT}/{spreadsheet_id}/values:batchUpdate");
        let payload = json!({
            "valueInputOption": "RAW",
            "data": data
                .into_iter()
                .map(|(range, values)| json!({ "range": range, "values": values }))
                .collect::<Vec<Value>>(),
        });
        self.post_json("sheets.values.batchUpdate", url, payload).await.map(|_| ())
    }

    pub async fn values_append(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), RpcError> {
        let url = format!(
            "{SHEETS_ENDPOINT}/{spreadsheet_id}/values/{range}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS"
        );
        self.post_json(&format!("sheets.values.append({range})"), url, json!({ "values": values }))
            .await
            .map(|_| ())
    }

    pub async fn values_clear(&self, spreadsheet_id: &str, range: &str) -> Result<(), RpcError> {
        let url = format!("{SHEETS_ENDPOINT}/{spreadsheet_id}/values/{range}:clear");
        self.post_json(&format!("sheets.values.clear({range})"), url, json!({})).await.map(|_| ())
    }

    /// batchUpdate estructural (addSheet, deleteDimension).
    pub async fn spreadsheet_batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<(), RpcError> {
        if requests.is_empty() {
            return Ok(());
        }
        let url = format!("{SHEETS_ENDPOINT}/{spreadsheet_id}:batchUpdate");
        self.post_json("sheets.spreadsheets.batchUpdate", url, json!({ "requests": requests }))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_values_payload_flattening() {
        let payload = json!({
            "range": "media!A1:C2",
            "values": [["media_slug", "sort_order"], ["x-01", 1]]
        });
        let rows = rows_from_values(&payload);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["x-01".to_string(), "1".to_string()]);
    }

    #[test]
    fn certify_missing_values_yield_empty_grid() {
        assert!(rows_from_values(&json!({ "range": "voyages!A1" })).is_empty());
    }
}

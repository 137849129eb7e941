//! Clipboard text and spreadsheet webhook export.

use std::time::Duration;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{PickerError, Result};
use crate::geometry::{apply_export_scale, ExportScale, ScaledBox};
use crate::store::{BoxStore, SelectionBox};

pub const DEFAULT_BATCH_NAME: &str = "Untitled Batch";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ── Text ────────────────────────────────────────────────────────────────────

pub fn format_line(b: ScaledBox) -> String {
    format!("{}, {}, {}, {}", b.x, b.y, b.w, b.h)
}

pub fn box_line(b: &SelectionBox, scale: ExportScale) -> String {
    format_line(apply_export_scale(b.geometry, scale))
}

/// One `x, y, w, h` line per box, in store order.
pub fn all_lines(store: &BoxStore, scale: ExportScale) -> Result<String> {
    if store.is_empty() {
        return Err(PickerError::EmptyStore);
    }
    let lines: Vec<String> = store.list().iter().map(|b| box_line(b, scale)).collect();
    Ok(lines.join("\n"))
}

// ── Webhook payload ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    pub id: u32,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPayload {
    pub batch_name: String,
    pub rows: Vec<SheetRow>,
}

impl SheetPayload {
    /// Snapshot the store with the current scale applied.
    pub fn from_store(store: &BoxStore, batch_name: &str, scale: ExportScale) -> Result<Self> {
        if store.is_empty() {
            return Err(PickerError::EmptyStore);
        }
        let batch_name = match batch_name.trim() {
            "" => DEFAULT_BATCH_NAME.to_string(),
            name => name.to_string(),
        };
        let rows = store
            .list()
            .iter()
            .map(|b| {
                let s = apply_export_scale(b.geometry, scale);
                SheetRow {
                    id: b.id,
                    x: s.x,
                    y: s.y,
                    w: s.w,
                    h: s.h,
                }
            })
            .collect();
        Ok(Self { batch_name, rows })
    }
}

/// Success only for a JSON object whose `result` is the string `"success"`.
pub fn check_response(json: &Value) -> Result<()> {
    match json.get("result").and_then(Value::as_str) {
        Some("success") => Ok(()),
        _ => Err(PickerError::UnexpectedResponse(json.to_string())),
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

pub struct SheetClient {
    pub url: String,
    client: reqwest::blocking::Client,
}

impl SheetClient {
    pub fn new(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PickerError::MissingEndpoint);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(url, client))
    }

    fn with_client(url: &str, client: reqwest::blocking::Client) -> Self {
        SheetClient {
            url: url.to_string(),
            client,
        }
    }

    pub fn send(&self, payload: &SheetPayload) -> Result<()> {
        debug!(
            "posting {} rows for batch {:?} to {}",
            payload.rows.len(),
            payload.batch_name,
            self.url
        );

        let res = self.client.post(&self.url).json(payload).send()?;
        let text = res.text()?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|_| PickerError::UnexpectedResponse(text.clone()))?;

        check_response(&json)
    }
}

/// Send on a worker thread. The receiver yields exactly one result.
pub fn spawn_send(url: String, payload: SheetPayload) -> Receiver<Result<()>> {
    let (tx, rx) = crossbeam_channel::bounded(1);

    std::thread::spawn(move || {
        let res = SheetClient::new(&url).and_then(|client| client.send(&payload));
        match &res {
            Ok(()) => info!("sent {} rows to sheet", payload.rows.len()),
            Err(e) => error!("sheet export failed: {}", e),
        }
        // UI may have gone away; nothing to do then.
        let _ = tx.send(res);
    });

    rx
}

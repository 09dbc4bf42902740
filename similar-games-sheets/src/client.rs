use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::credentials::{AccessToken, ServiceAccountKey};
use crate::error::SheetsError;
use crate::worksheet::Worksheet;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_API: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How a spreadsheet is addressed in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    /// Bare spreadsheet id.
    Id(String),
    /// Spreadsheet title, resolved through Drive.
    Name(String),
}

impl SpreadsheetRef {
    /// Accepts a full browser URL, a bare id, or a title.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if let Some(rest) = value.split("/spreadsheets/d/").nth(1) {
            let id = rest.split(['/', '?', '#']).next().unwrap_or(rest);
            return Self::Id(id.to_string());
        }
        if looks_like_id(value) {
            Self::Id(value.to_string())
        } else {
            Self::Name(value.to_string())
        }
    }
}

impl std::fmt::Display for SpreadsheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {}", id),
            Self::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Spreadsheet ids are long runs of URL-safe base64 characters.
fn looks_like_id(value: &str) -> bool {
    value.len() >= 30
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetMeta {
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Authenticated client for the Sheets and Drive REST APIs.
///
/// Cheap to clone; clones share the HTTP pool and the cached token.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    key: Arc<ServiceAccountKey>,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl SheetsClient {
    /// Create a client and authenticate immediately, so bad credentials
    /// fail before any scraping starts.
    pub async fn connect(key: ServiceAccountKey) -> Result<Self, SheetsError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let client = Self {
            http,
            key: Arc::new(key),
            token: Arc::new(Mutex::new(None)),
        };
        client.bearer().await?;
        log::info!("Authenticated as {}", client.key.client_email);
        Ok(client)
    }

    /// Open a spreadsheet and list its tabs.
    pub async fn open(&self, spreadsheet: &SpreadsheetRef) -> Result<Spreadsheet, SheetsError> {
        let id = match spreadsheet {
            SpreadsheetRef::Id(id) => id.clone(),
            SpreadsheetRef::Name(name) => self.find_by_name(name).await?,
        };

        let mut url = Self::spreadsheet_url(&id, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties(sheetId,title)");

        let meta: SpreadsheetMeta = match self.send(Method::GET, url, None).await {
            Err(SheetsError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(SheetsError::SpreadsheetNotFound(spreadsheet.to_string()));
            }
            other => other?,
        };

        log::debug!(
            "Opened spreadsheet '{}' ({} tabs)",
            meta.properties.title,
            meta.sheets.len()
        );
        Ok(Spreadsheet {
            client: self.clone(),
            id,
            title: meta.properties.title,
            sheets: meta.sheets.into_iter().map(|s| s.properties).collect(),
        })
    }

    async fn find_by_name(&self, name: &str) -> Result<String, SheetsError> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let mut url = parse_url(DRIVE_FILES_API)?;
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("fields", "files(id,name)")
            .append_pair("supportsAllDrives", "true")
            .append_pair("includeItemsFromAllDrives", "true");

        let list: DriveFileList = self.send(Method::GET, url, None).await?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(format!("'{name}'")))
    }

    /// A valid bearer token, refreshed when close to expiry.
    async fn bearer(&self) -> Result<String, SheetsError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.token.clone());
        }
        let token = self.key.fetch_token(&self.http).await?;
        let bearer = token.token.clone();
        *cached = Some(token);
        Ok(bearer)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, SheetsError> {
        let bearer = self.bearer().await?;
        let mut req = self.http.request(method, url).bearer_auth(bearer);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SheetsError::auth(format!(
                "access denied (HTTP {}): {}",
                status.as_u16(),
                api_message(&text)
            )));
        }
        if !status.is_success() {
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: api_message(&text),
            });
        }

        let body = if text.trim().is_empty() { "{}" } else { &text };
        Ok(serde_json::from_str(body)?)
    }

    /// `<SHEETS_API>/<id>` followed by extra path segments, each
    /// percent-encoded.
    fn spreadsheet_url(id: &str, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = parse_url(SHEETS_API)?;
        url.path_segments_mut()
            .map_err(|_| url_error(SHEETS_API, "cannot hold a path"))?
            .push(id)
            .extend(segments);
        Ok(url)
    }
}

fn parse_url(url: &str) -> Result<Url, SheetsError> {
    Url::parse(url).map_err(|e| url_error(url, e))
}

fn url_error(url: &str, reason: impl std::fmt::Display) -> SheetsError {
    SheetsError::Api {
        status: 0,
        message: format!("invalid URL {url}: {reason}"),
    }
}

/// Best-effort extraction of the `error.message` field of an API error.
fn api_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

/// An opened spreadsheet.
pub struct Spreadsheet {
    client: SheetsClient,
    id: String,
    title: String,
    sheets: Vec<SheetProperties>,
}

impl Spreadsheet {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn worksheet_titles(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.title.as_str()).collect()
    }

    /// Look up a tab by exact title.
    pub fn worksheet(&self, title: &str) -> Result<GoogleWorksheet, SheetsError> {
        let props = self
            .sheets
            .iter()
            .find(|s| s.title == title)
            .ok_or_else(|| SheetsError::WorksheetNotFound(title.to_string()))?;
        Ok(GoogleWorksheet {
            client: self.client.clone(),
            spreadsheet_id: self.id.clone(),
            sheet_id: props.sheet_id,
            title: props.title.clone(),
        })
    }
}

/// One tab of a Google spreadsheet.
pub struct GoogleWorksheet {
    client: SheetsClient,
    spreadsheet_id: String,
    sheet_id: i64,
    title: String,
}

impl GoogleWorksheet {
    /// A1 range scoped to this tab, e.g. `'Jogos Similares'!A:A`.
    fn range(&self, cells: &str) -> String {
        format!("'{}'!{}", self.title.replace('\'', "''"), cells)
    }

    async fn get_values(&self, cells: &str, major: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let range = self.range(cells);
        let mut url = SheetsClient::spreadsheet_url(&self.spreadsheet_id, &["values", &range])?;
        url.query_pairs_mut().append_pair("majorDimension", major);
        let values: ValueRange = self.client.send(Method::GET, url, None).await?;
        Ok(values.values)
    }
}

/// Column letters for a 1-based index (1 -> A, 27 -> AA).
fn column_letter(mut col: usize) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

#[async_trait]
impl Worksheet for GoogleWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn column_values(&self, col: usize) -> Result<Vec<String>, SheetsError> {
        let letter = column_letter(col);
        let columns = self
            .get_values(&format!("{letter}:{letter}"), "COLUMNS")
            .await?;
        Ok(columns.into_iter().next().unwrap_or_default())
    }

    async fn row_values(&self, row: usize) -> Result<Vec<String>, SheetsError> {
        let rows = self.get_values(&format!("{row}:{row}"), "ROWS").await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn update_row(&self, row: usize, values: &[String]) -> Result<(), SheetsError> {
        let range = self.range(&format!("A{row}"));
        let mut url = SheetsClient::spreadsheet_url(&self.spreadsheet_id, &["values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({ "range": range, "majorDimension": "ROWS", "values": [values] });
        let _: serde_json::Value = self.client.send(Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), SheetsError> {
        if rows.is_empty() {
            return Ok(());
        }
        let range = self.range("A1");
        let append = format!("{range}:append");
        let mut url = SheetsClient::spreadsheet_url(&self.spreadsheet_id, &["values", &append])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = json!({ "range": range, "majorDimension": "ROWS", "values": rows });
        let _: serde_json::Value = self.client.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    async fn delete_rows(&self, rows: &[usize]) -> Result<(), SheetsError> {
        if rows.is_empty() {
            return Ok(());
        }
        // Bottom-up so earlier deletions do not shift later indices.
        let mut sorted: Vec<usize> = rows.iter().copied().filter(|&r| r >= 1).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let requests: Vec<_> = sorted
            .iter()
            .map(|&row| {
                json!({
                    "deleteDimension": {
                        "range": {
                            "sheetId": self.sheet_id,
                            "dimension": "ROWS",
                            "startIndex": row - 1,
                            "endIndex": row,
                        }
                    }
                })
            })
            .collect();

        let batch = format!("{}:batchUpdate", self.spreadsheet_id);
        let mut url = parse_url(SHEETS_API)?;
        url.path_segments_mut()
            .map_err(|_| url_error(SHEETS_API, "cannot hold a path"))?
            .push(&batch);
        let body = json!({ "requests": requests });
        let _: serde_json::Value = self.client.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }
}

//! Raw tabular datasets: CSV with a header row, loaded from disk or HTTP.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::{Result, VicinoError};
use crate::retry::{retry, RetryPolicy};

/// Rectangular data with named columns. Every cell is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Parse CSV (comma separated, header row required)
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(String::from).collect());
        }

        debug!("Parsed {} rows x {} columns for '{}'", rows.len(), headers.len(), name);
        Ok(Self::new(name, headers, rows))
    }

    /// Load a local CSV, transparently decompressing `.gz` files
    pub fn from_path(name: &str, path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Self::from_reader(name, reader)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or a schema error naming it
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| VicinoError::schema(&self.name, column))
    }

    /// Cell at (`row`, `column`); short rows yield an empty string
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Copy of the table without `columns`. Every listed column must exist.
    pub fn drop_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<RawTable> {
        let mut dropped = vec![false; self.headers.len()];
        for column in columns {
            dropped[self.column_index(column.as_ref())?] = true;
        }

        let keep: Vec<usize> = (0..self.headers.len()).filter(|i| !dropped[*i]).collect();
        let headers = keep.iter().map(|i| self.headers[*i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                keep.iter()
                    .map(|i| row.get(*i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(RawTable::new(&self.name, headers, rows))
    }

    /// Copy of the table keeping only the rows for which `keep` returns true
    pub fn retain_rows<F>(&self, mut keep: F) -> RawTable
    where
        F: FnMut(&[String]) -> bool,
    {
        let rows = self.rows.iter().filter(|r| keep(r)).cloned().collect();
        RawTable::new(&self.name, self.headers.clone(), rows)
    }
}

/// Request timeout for dataset downloads
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for [`DatasetSource::load`]
pub fn download_client() -> Result<Client> {
    Ok(Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?)
}

/// Where a dataset lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Remote(Url),
    Local(PathBuf),
}

impl DatasetSource {
    /// `http(s)://` URLs are remote, anything else is a filesystem path
    pub fn parse(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                DatasetSource::Remote(url)
            }
            _ => DatasetSource::Local(PathBuf::from(source)),
        }
    }

    /// Load the dataset. Remote downloads are retried on transient failures.
    pub async fn load(&self, name: &str, client: &Client, policy: &RetryPolicy) -> Result<RawTable> {
        info!("Loading dataset '{}' from {}", name, self);

        match self {
            DatasetSource::Local(path) => RawTable::from_path(name, path),
            DatasetSource::Remote(url) => {
                let body = retry(policy, is_transient_http, |_| fetch_bytes(client, url))
                    .await
                    .map_err(|e| VicinoError::Http(e.last))?;

                let table = if url.path().ends_with(".gz") {
                    RawTable::from_reader(name, GzDecoder::new(body.as_slice()))?
                } else {
                    RawTable::from_reader(name, body.as_slice())?
                };
                info!("Loaded {} rows for '{}'", table.len(), name);
                Ok(table)
            }
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Remote(url) => write!(f, "{}", url),
            DatasetSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

async fn fetch_bytes(client: &Client, url: &Url) -> std::result::Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

fn is_transient_http(e: &reqwest::Error) -> bool {
    e.is_timeout()
        || e.is_connect()
        || e.status().map_or(false, |s| s.is_server_error() || s.as_u16() == 429)
}

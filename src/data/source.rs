use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::embedded::embedded_table;
use super::loader::{load_file, parse_csv};
use super::model::FoodTable;
use crate::error::{FetchError, LoadError};

/// Timeout applied to the spreadsheet export request unless configured.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Fetch – the network seam
// ---------------------------------------------------------------------------

/// Retrieves the raw bytes behind a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP GET with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        Ok(body.to_vec())
    }
}

// ---------------------------------------------------------------------------
// DataSource – where the table comes from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// The built-in literal table; no I/O.
    Embedded,
    /// A CSV export fetched over HTTP.
    Remote { url: String },
    /// A local `.csv` or `.json` file.
    File { path: PathBuf },
}

impl DataSource {
    /// CSV export endpoint of a Google Sheets document.
    pub fn google_sheet(sheet_id: &str, gid: Option<&str>) -> Self {
        let mut url = format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv");
        if let Some(gid) = gid {
            url.push_str("&gid=");
            url.push_str(gid);
        }
        DataSource::Remote { url }
    }

    /// Load and normalize the table. Only `Remote` touches `fetcher`.
    pub fn load<F: Fetch>(&self, fetcher: &F) -> Result<FoodTable, LoadError> {
        let table = match self {
            DataSource::Embedded => embedded_table(),
            DataSource::Remote { url } => parse_csv(&fetcher.fetch(url)?)?,
            DataSource::File { path } => load_file(path)?,
        };
        log::info!("Loaded {} items from {self}", table.len());
        Ok(table)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Embedded => write!(f, "embedded table"),
            DataSource::Remote { url } => write!(f, "{url}"),
            DataSource::File { path } => write!(f, "{}", path.display()),
        }
    }
}

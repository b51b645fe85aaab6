//! Configuration file support.
//!
//! Settings are read from a TOML file, then selectively overridden from
//! environment variables. Every section is optional.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::cache::{DatasetCache, DEFAULT_TTL};
use crate::data::filter::{Selection, SortKey};
use crate::data::model::PARKS;
use crate::data::source::{DataSource, Fetch, HttpFetcher, DEFAULT_HTTP_TIMEOUT};

/// Path of the TOML file read by [`Config::from_env`].
pub const CONFIG_PATH_VAR: &str = "PARK_EATS_CONFIG";
/// Overrides `source.url` and forces a remote source.
pub const SOURCE_URL_VAR: &str = "PARK_EATS_SOURCE_URL";
/// Overrides `cache.ttl_secs`.
pub const CACHE_TTL_VAR: &str = "PARK_EATS_CACHE_TTL_SECS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceSettings,
    pub cache: CacheSettings,
    pub http: HttpSettings,
    pub view: ViewSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Embedded,
    Remote,
    File,
}

/// Where the table is read from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub kind: SourceKind,
    /// Full CSV export URL (remote).
    pub url: Option<String>,
    /// Google Sheets document id, used when `url` is not set (remote).
    pub sheet_id: Option<String>,
    /// Worksheet id within the document.
    pub gid: Option<String>,
    /// Local `.csv` / `.json` file (file).
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub default_park: String,
    pub sort: SortKey,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_park: PARKS[0].to_string(),
            sort: SortKey::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read the file named by `PARK_EATS_CONFIG` (defaults if unset), then
    /// apply the environment overrides.
    ///
    /// # Environment Variables
    /// - `PARK_EATS_CONFIG` (optional): path to a TOML config file
    /// - `PARK_EATS_SOURCE_URL` (optional): remote CSV URL
    /// - `PARK_EATS_CACHE_TTL_SECS` (optional): cache window in seconds
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Ok(url) = env::var(SOURCE_URL_VAR) {
            config.source.kind = SourceKind::Remote;
            config.source.url = Some(url);
        }
        if let Ok(ttl) = env::var(CACHE_TTL_VAR) {
            config.cache.ttl_secs = ttl
                .trim()
                .parse()
                .with_context(|| format!("{CACHE_TTL_VAR}='{ttl}' is not a number of seconds"))?;
        }
        Ok(config)
    }

    /// Resolve the configured source.
    pub fn data_source(&self) -> Result<DataSource> {
        let src = &self.source;
        match src.kind {
            SourceKind::Embedded => Ok(DataSource::Embedded),
            SourceKind::Remote => match (&src.url, &src.sheet_id) {
                (Some(url), _) => Ok(DataSource::Remote { url: url.clone() }),
                (None, Some(id)) => Ok(DataSource::google_sheet(id, src.gid.as_deref())),
                (None, None) => bail!("remote source needs `url` or `sheet_id`"),
            },
            SourceKind::File => match &src.path {
                Some(path) => Ok(DataSource::File { path: path.clone() }),
                None => bail!("file source needs `path`"),
            },
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn http_fetcher(&self) -> Result<HttpFetcher> {
        HttpFetcher::new(Duration::from_secs(self.http.timeout_secs)).context("building HTTP client")
    }

    /// A cache over the configured source using `fetcher`.
    pub fn cache<F: Fetch>(&self, fetcher: F) -> Result<DatasetCache<F>> {
        Ok(DatasetCache::with_ttl(self.data_source()?, fetcher, self.ttl()))
    }

    /// Starting selection for a new session.
    pub fn initial_selection(&self) -> Selection {
        Selection {
            sort: self.view.sort,
            ..Selection::for_park(self.view.default_park.clone())
        }
    }
}

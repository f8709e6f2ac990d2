use backon::{ExponentialBuilder, Retryable};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::data::YearCollection;
use crate::load_error::LoadError;

/// Where a snapshot is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` values are URLs, anything else is a file path
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Parse a snapshot document into a [`YearCollection`]
pub fn parse_snapshot(json: &str) -> Result<YearCollection, LoadError> {
    let collection: YearCollection = serde_json::from_str(json)?;
    debug!(
        "Parsed snapshot: {} years, {} days",
        collection.available_years().len(),
        collection.total_days()
    );
    Ok(collection)
}

/// Loads the JSON snapshot once, from disk or over HTTP
#[derive(Clone)]
pub struct SnapshotLoader {
    client: reqwest::Client,
    source: DataSource,
    max_retries: usize,
    retry_delay: Duration,
}

impl SnapshotLoader {
    pub fn new(source: DataSource) -> Result<Self, LoadError> {
        Self::with_timeout(source, Duration::from_secs(60))
    }

    pub fn with_timeout(source: DataSource, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            source,
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let loader = Self::with_timeout(
            DataSource::parse(&config.data_source),
            Duration::from_secs(config.http_timeout_secs),
        )?;
        Ok(loader.with_retry_policy(
            config.fetch_max_retries,
            Duration::from_millis(config.fetch_retry_delay_ms),
        ))
    }

    /// Retries apply to transient HTTP failures only
    pub fn with_retry_policy(mut self, max_retries: usize, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load(&self) -> Result<YearCollection, LoadError> {
        let json = match &self.source {
            DataSource::Path(path) => Self::read_file(path).await?,
            DataSource::Url(url) => self.download_with_retry(url).await?,
        };

        let collection = parse_snapshot(&json)?;
        info!(
            "Loaded snapshot with {} years and {} days",
            collection.available_years().len(),
            collection.total_days()
        );
        if collection.is_empty() {
            warn!("Snapshot contains no years");
        }
        Ok(collection)
    }

    async fn read_file(path: &Path) -> Result<String, LoadError> {
        debug!("Reading snapshot file {}", path.display());
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::FileNotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn download_with_retry(&self, url: &str) -> Result<String, LoadError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(self.max_retries);

        (|| self.download(url))
            .retry(backoff)
            .when(LoadError::is_retryable)
            .notify(|err: &LoadError, delay: Duration| {
                warn!("Snapshot download failed ({}), retrying in {:?}", err, delay);
            })
            .await
    }

    async fn download(&self, url: &str) -> Result<String, LoadError> {
        debug!("Sending HTTP request for snapshot");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if status.is_success() {
            let text = response.text().await?;
            debug!("Downloaded snapshot ({} bytes)", text.len());
            Ok(text)
        } else if status.as_u16() == 404 {
            Err(LoadError::NotFound(url.to_string()))
        } else if status.is_server_error() {
            Err(LoadError::ServerError(format!("{status} from {url}")))
        } else {
            Err(LoadError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }
}

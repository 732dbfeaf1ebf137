//! Input providers: where the pipeline's text comes from.
//!
//! A provider either hands back the full text or fails with
//! [`PipelineError::InputUnavailable`]; the pipeline never runs on a partial
//! or missing buffer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};
use url::Url;

use crate::error::{PipelineError, Result};

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Something that can produce the complete input text for a run.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch the whole text.
    async fn fetch(&self) -> Result<String>;

    /// Human readable description, used in logs and errors.
    fn describe(&self) -> String;
}

/// Resolves a user supplied location to a provider.
///
/// `http` and `https` URLs are downloaded, `file` URLs and anything that is
/// not a URL are read from the local filesystem.
pub fn from_location(location: &str) -> Result<Box<dyn TextSource>> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(HttpSource::new(url)?))
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url.to_file_path().map_err(|_| {
                PipelineError::input_unavailable(location, "not a local file path")
            })?;
            Ok(Box::new(FileSource::new(path)))
        }
        _ => Ok(Box::new(FileSource::new(location))),
    }
}

/////////////////////////////////////////////////////////////////////////////
// HTTP
/////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::input_unavailable(url.as_str(), e))?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: Url, client: reqwest::Client) -> Self {
        Self { url, client }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl TextSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        info!("Downloading text from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                error!("request to {} failed: {e}", self.url);
                PipelineError::input_unavailable(self.describe(), e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("failed to download text, HTTP status code {status}");
            return Err(PipelineError::input_unavailable(
                self.describe(),
                format!("HTTP status code {}", status.as_u16()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| PipelineError::input_unavailable(self.describe(), e))?;

        info!("Text downloaded successfully ({} bytes)", text.len());
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("url `{}`", self.url)
    }
}

/////////////////////////////////////////////////////////////////////////////
// Local files
/////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TextSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        debug!("Reading text from {}", self.path.display());

        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!("failed reading {}: {e}", self.path.display());
            PipelineError::input_unavailable(self.describe(), e)
        })
    }

    fn describe(&self) -> String {
        format!("file `{}`", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn file_source_reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "the cat\nsat on the mat").unwrap();

        let source = FileSource::new(file.path());
        let text = source.fetch().await.unwrap();
        assert_eq!(text, "the cat\nsat on the mat");
    }

    #[tokio::test]
    async fn missing_file_is_input_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("does-not-exist.txt"));

        let err = source.fetch().await.unwrap_err();
        assert!(err.is_input_unavailable());
        assert!(err.to_string().contains("does-not-exist.txt"));
    }

    #[tokio::test]
    async fn refused_connection_is_input_unavailable() {
        let url = Url::parse("http://127.0.0.1:1/book.txt").unwrap();
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let source = HttpSource::with_client(url, client);

        let err = source.fetch().await.unwrap_err();
        assert!(err.is_input_unavailable());
    }

    #[test]
    fn locations_resolve_to_the_right_provider() {
        let http = from_location("https://www.gutenberg.org/files/1342/1342-0.txt").unwrap();
        assert_eq!(
            http.describe(),
            "url `https://www.gutenberg.org/files/1342/1342-0.txt`"
        );

        let file = from_location("corpus/book.txt").unwrap();
        assert_eq!(file.describe(), "file `corpus/book.txt`");

        let file_url = from_location("file:///tmp/book.txt").unwrap();
        assert_eq!(file_url.describe(), "file `/tmp/book.txt`");
    }
}

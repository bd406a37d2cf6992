//! Infrastructure implementation of the `ProfileFetcher` port.
//!
//! Supports `file://` (and bare paths) plus `http(s)://`. Blocking
//! transports run under `spawn_blocking` so the port stays async.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::ProfileFetcher;
use crate::domain::error::SourceError;
use crate::domain::source::SourceDescriptor;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Production fetcher over the supported transport schemes.
pub struct UriFetcher {
    timeout: Duration,
}

impl UriFetcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for UriFetcher {
    fn default() -> Self {
        Self::new(FETCH_TIMEOUT)
    }
}

impl ProfileFetcher for UriFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<u8>> {
        let source = source.clone();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || fetch_blocking(&source, timeout))
            .await
            .context("profile fetch task panicked")?
    }
}

fn fetch_blocking(source: &SourceDescriptor, timeout: Duration) -> Result<Vec<u8>> {
    match source.scheme.as_str() {
        "file" => std::fs::read(&source.path).with_context(|| format!("reading {}", source.path)),
        "http" | "https" => {
            let url = format!("{}://{}{}", source.scheme, source.host, source.path);
            match ureq::get(&url).timeout(timeout).call() {
                Ok(response) => {
                    let mut bytes = Vec::new();
                    response
                        .into_reader()
                        .read_to_end(&mut bytes)
                        .with_context(|| format!("downloading {url}"))?;
                    Ok(bytes)
                }
                Err(ureq::Error::Status(code, _)) => anyhow::bail!("{url} answered HTTP {code}"),
                Err(error) => Err(error).with_context(|| format!("requesting {url}")),
            }
        }
        other => Err(SourceError::UnsupportedScheme(other.to_string()).into()),
    }
}

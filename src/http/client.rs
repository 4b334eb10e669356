//! HTTP client that follows release-download redirects itself.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use log::debug;
use reqwest::{Client, StatusCode, Url, header::LOCATION, redirect};
use std::io::Write;

use crate::error::{DownloadError, InstallError};

/// Maximum number of redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// HTTP client for release downloads.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Wraps an existing reqwest Client. The client must be built with
    /// `redirect::Policy::none()`, otherwise reqwest follows redirects before
    /// the hop limit here is applied.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client that leaves redirects to [`HttpClient::download_file`].
    pub fn build(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Downloads `url`, following up to [`MAX_REDIRECTS`] redirects, and
    /// streams the final 200 body into the writer returned by `create_writer`.
    ///
    /// The writer is only created once a 200 response arrives, so failed
    /// requests leave no file behind.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        let mut current = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        let mut redirects = 0;

        let response = loop {
            debug!("GET {}", current);
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| download_error(DownloadError::Transport(format!("{:#}", e))))?;

            let status = response.status();
            if is_redirect(status) {
                if redirects == MAX_REDIRECTS {
                    return Err(download_error(DownloadError::TooManyRedirects(
                        MAX_REDIRECTS,
                    )));
                }
                redirects += 1;
                current = redirect_target(&current, &response)?;
                debug!("Redirect {} -> {}", status.as_u16(), current);
                continue;
            }

            if status != StatusCode::OK {
                return Err(download_error(DownloadError::Status(status.as_u16())));
            }

            break response;
        };

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| download_error(DownloadError::Transport(format!("{:#}", e))))?;
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}

fn download_error(e: DownloadError) -> anyhow::Error {
    anyhow::Error::from(InstallError::Download(e))
}

/// 301 and 302 are what GitHub sends; the others behave the same for a GET.
fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolves the `Location` header of a redirect against the URL that was
/// requested, so relative locations work.
fn redirect_target(current: &Url, response: &reqwest::Response) -> Result<Url> {
    let status = response.status().as_u16();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| download_error(DownloadError::MissingLocation(status)))?;

    current
        .join(location)
        .map_err(|_| download_error(DownloadError::MissingLocation(status)))
}

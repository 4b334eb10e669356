use crate::error::InstallError;
use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::path::{Path, PathBuf};

/// Fetches a release archive to a local file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// [`Fetcher`] backed by [`HttpClient`] and a [`Runtime`] for file creation.
pub struct HttpFetcher<'a, R: Runtime> {
    runtime: &'a R,
    http_client: HttpClient,
}

impl<'a, R: Runtime> HttpFetcher<'a, R> {
    pub fn new(runtime: &'a R, http_client: HttpClient) -> Self {
        Self {
            runtime,
            http_client,
        }
    }
}

#[async_trait]
impl<R: Runtime> Fetcher for HttpFetcher<'_, R> {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        download_file(self.runtime, url, dest, &self.http_client).await
    }
}

/// Downloads a file from a URL to `dest`, overwriting it if present.
#[tracing::instrument(skip(runtime, dest, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<()> {
    info!("Downloading file from {}...", url);

    let dest: PathBuf = dest.to_path_buf();
    http_client
        .download_file(url, || {
            runtime.create_file(&dest).map_err(|e| {
                anyhow::Error::from(InstallError::Filesystem {
                    path: dest.clone(),
                    reason: format!("{:#}", e),
                })
            })
        })
        .await?;

    info!("Download complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DownloadError;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn http_client() -> HttpClient {
        HttpClient::build("git-ai-install-test").unwrap()
    }

    #[tokio::test]
    async fn test_download_file() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test.file")
            .with_status(200)
            .with_body("test content")
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_file()
            .with(eq(Path::new("test.file").to_path_buf()))
            .returning(|_| Ok(Box::new(std::io::sink())));

        let result = download_file(
            &runtime,
            &format!("{}/test.file", url),
            Path::new("test.file"),
            &http_client(),
        )
        .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_download_file_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test.file")
            .with_status(404)
            .create_async()
            .await;

        // No expectations: the file must never be created
        let runtime = MockRuntime::new();

        let result = download_file(
            &runtime,
            &format!("{}/test.file", url),
            Path::new("test.file"),
            &http_client(),
        )
        .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert_eq!(
            crate::error::download_error(&err),
            Some(&DownloadError::Status(404))
        );
    }

    #[tokio::test]
    async fn test_download_file_create_failure_is_filesystem_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/test.file")
            .with_status(200)
            .with_body("x")
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_file()
            .returning(|_| Err(anyhow::anyhow!("Permission denied")));

        let err = download_file(
            &runtime,
            &format!("{}/test.file", url),
            Path::new("/readonly/test.file"),
            &http_client(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::Filesystem { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_fetcher_redirect_then_ok_writes_identical_bytes() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let payload = b"\x1f\x8b\x08\x00binary payload\x00\xff".to_vec();

        let _redirect = server
            .mock("GET", "/release")
            .with_status(302)
            .with_header("location", "/storage/release")
            .create_async()
            .await;
        let _asset = server
            .mock("GET", "/storage/release")
            .with_status(200)
            .with_body(&payload)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("git-ai-linux-x64.tar.gz");
        std::fs::write(&dest, b"stale archive from an earlier run").unwrap();

        let runtime = RealRuntime;
        let fetcher = HttpFetcher::new(&runtime, http_client());
        fetcher
            .fetch(&format!("{}/release", url), &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), payload);
    }
}

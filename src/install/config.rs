use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::asset::DEFAULT_BASE_URL;
use crate::http::HttpClient;
use crate::locate::InstallMode;
use crate::platform::PlatformInfo;
use crate::runtime::Runtime;

const USER_AGENT: &str = concat!("git-ai-install/", env!("GIT_AI_INSTALL_VERSION"));

/// Settings shared by `install`, `locate` and `exec`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory containing package.json; `bin/` is created here.
    pub package_root: PathBuf,
    pub mode: InstallMode,
    /// Host serving `<owner>/<repo>/releases/download/...`
    pub base_url: String,
    /// Overrides for the detected OS/arch, in either Rust or Node spelling.
    pub os: Option<String>,
    pub arch: Option<String>,
}

impl Config {
    /// Fills in defaults: the package root falls back to the working
    /// directory, which is where npm runs lifecycle scripts.
    pub fn new<R: Runtime>(
        runtime: &R,
        package_root: Option<PathBuf>,
        mode: InstallMode,
        base_url: Option<String>,
        os: Option<String>,
        arch: Option<String>,
    ) -> Result<Self> {
        let package_root = match package_root {
            Some(path) => path,
            None => runtime.current_dir()?,
        };
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        debug!(
            "Package root {:?}, mode {:?}, base URL {}",
            package_root, mode, base_url
        );

        Ok(Self {
            package_root,
            mode,
            base_url,
            os,
            arch,
        })
    }

    /// Resolve the target platform, honouring the OS/arch overrides.
    pub fn platform(&self) -> Result<PlatformInfo> {
        match (self.os.as_deref(), self.arch.as_deref()) {
            (None, None) => PlatformInfo::detect(),
            (os, arch) => PlatformInfo::resolve(
                os.unwrap_or(std::env::consts::OS),
                arch.unwrap_or(std::env::consts::ARCH),
            ),
        }
    }

    /// HTTP client for release downloads. Redirects are followed by
    /// [`HttpClient::download_file`], not by reqwest.
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::build(USER_AGENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Os};
    use crate::runtime::MockRuntime;
    use crate::test_utils::test_package_root;

    #[test]
    fn test_config_defaults_to_current_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_current_dir()
            .returning(|| Ok(test_package_root()));

        let config = Config::new(&runtime, None, InstallMode::LocalBin, None, None, None).unwrap();

        assert_eq!(config.package_root, test_package_root());
        assert_eq!(config.base_url, "https://github.com");
    }

    #[test]
    fn test_config_explicit_values() {
        // No expectations: current_dir must not be consulted
        let runtime = MockRuntime::new();

        let config = Config::new(
            &runtime,
            Some(PathBuf::from("/opt/git-ai")),
            InstallMode::BundledPackage,
            Some("http://127.0.0.1:8080".into()),
            Some("win32".into()),
            Some("arm64".into()),
        )
        .unwrap();

        assert_eq!(config.package_root, PathBuf::from("/opt/git-ai"));
        assert_eq!(config.mode, InstallMode::BundledPackage);
        assert_eq!(config.base_url, "http://127.0.0.1:8080");

        let platform = config.platform().unwrap();
        assert_eq!(platform.platform, Os::Windows);
        assert_eq!(platform.arch, Arch::Arm64);
    }

    #[test]
    fn test_config_platform_without_overrides_matches_host() {
        let runtime = MockRuntime::new();
        let config = Config::new(
            &runtime,
            Some(PathBuf::from("/opt/git-ai")),
            InstallMode::LocalBin,
            None,
            None,
            None,
        )
        .unwrap();

        // Hosts without a release asset get the same error from both paths
        match (config.platform(), PlatformInfo::detect()) {
            (Ok(configured), Ok(detected)) => assert_eq!(configured, detected),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
            (a, b) => panic!("platform() {:?} disagrees with detect() {:?}", a, b),
        }
    }

    #[test]
    fn test_config_platform_override_unsupported() {
        let runtime = MockRuntime::new();
        let config = Config::new(
            &runtime,
            Some(PathBuf::from("/opt/git-ai")),
            InstallMode::LocalBin,
            None,
            Some("sunos".into()),
            None,
        )
        .unwrap();

        assert!(config.platform().unwrap_err().to_string().contains("sunos"));
    }

    #[tokio::test]
    async fn test_http_client_sends_versioned_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/asset")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let runtime = MockRuntime::new();
        let config = Config::new(
            &runtime,
            Some(PathBuf::from("/opt/git-ai")),
            InstallMode::LocalBin,
            None,
            None,
            None,
        )
        .unwrap();

        let mut buffer = Vec::new();
        config
            .http_client()
            .unwrap()
            .download_file(&format!("{}/asset", server.url()), || Ok(&mut buffer))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(USER_AGENT.starts_with("git-ai-install/"));
        assert_eq!(buffer, b"ok");
    }
}

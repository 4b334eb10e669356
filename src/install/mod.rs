//! Installer orchestrator
//!
//! Runs once from npm's postinstall hook: reads the package version, downloads
//! the matching release archive, unpacks it into `<package root>/bin` and
//! marks the binary executable.

mod config;

pub use config::Config;

use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveExtractor, ArchiveExtractorImpl};
use crate::asset::{InstallPaths, ReleaseAsset, releases_page};
use crate::download::{Fetcher, HttpFetcher};
use crate::error::InstallError;
use crate::locate::{BinaryLocator, InstallMode, platform_package_name};
use crate::package::PackageMeta;
use crate::platform::PlatformInfo;
use crate::runtime::Runtime;
use crate::MAIN_PACKAGE;

const EXECUTABLE_MODE: u32 = 0o755;

pub struct Installer<'a, R: Runtime, F: Fetcher, E: ArchiveExtractor> {
    runtime: &'a R,
    fetcher: F,
    extractor: E,
    package_root: PathBuf,
    mode: InstallMode,
    base_url: String,
}

impl<'a, R: Runtime + 'static, F: Fetcher, E: ArchiveExtractor> Installer<'a, R, F, E> {
    pub fn new(
        runtime: &'a R,
        fetcher: F,
        extractor: E,
        package_root: PathBuf,
        mode: InstallMode,
        base_url: String,
    ) -> Self {
        Self {
            runtime,
            fetcher,
            extractor,
            package_root,
            mode,
            base_url,
        }
    }

    /// Install git-ai for `platform` and print the outcome.
    ///
    /// Returns the process exit code: 0 on success, 1 on any failure. Failures
    /// are reported on stderr together with the manual download page.
    pub async fn run(&self, platform: &PlatformInfo) -> i32 {
        match self.install(platform).await {
            Ok(path) => {
                debug!("git-ai available at {:?}", path);
                0
            }
            Err(e) => {
                eprintln!("Failed to install git-ai: {:#}", e);
                eprintln!();
                eprintln!("You can manually download from: {}", releases_page());
                1
            }
        }
    }

    /// Install git-ai for `platform`, returning the path of the binary.
    #[tracing::instrument(skip(self))]
    pub async fn install(&self, platform: &PlatformInfo) -> Result<PathBuf> {
        if self.mode == InstallMode::BundledPackage {
            return self.verify_bundled(platform);
        }

        let meta = PackageMeta::load(self.runtime, &self.package_root.join("package.json"))?;
        info!(
            "Installing {} {} for {}",
            meta.name.as_deref().unwrap_or(MAIN_PACKAGE),
            meta.version,
            platform
        );

        let asset = ReleaseAsset::new(&meta.version, *platform);
        let paths = InstallPaths::new(&self.package_root, &asset);

        self.runtime
            .create_dir_all(&paths.bin_dir)
            .map_err(|e| filesystem_error(&paths.bin_dir, e))?;

        println!("Downloading git-ai for {}...", platform.target());
        let url = asset.download_url(&self.base_url);
        self.fetcher.fetch(&url, &paths.archive_path).await?;

        self.extractor
            .extract(self.runtime, &paths.archive_path, &paths.bin_dir)?;

        if !self.runtime.exists(&paths.binary_path) {
            return Err(InstallError::Extraction {
                archive: paths.archive_path.clone(),
                reason: format!("no {} after extraction", paths.binary_path.display()),
            }
            .into());
        }

        if !platform.is_windows() {
            self.runtime
                .set_permissions(&paths.binary_path, EXECUTABLE_MODE)
                .map_err(|e| filesystem_error(&paths.binary_path, e))?;
        }

        self.runtime
            .remove_file(&paths.archive_path)
            .map_err(|e| filesystem_error(&paths.archive_path, e))?;

        println!("git-ai installed successfully!");
        Ok(paths.binary_path)
    }

    /// The platform sub-package already ships the binary; nothing to download.
    fn verify_bundled(&self, platform: &PlatformInfo) -> Result<PathBuf> {
        let locator = BinaryLocator::new(self.runtime, self.package_root.clone(), self.mode);
        let path = locator.locate(platform)?;
        println!("git-ai is provided by {}", platform_package_name(platform));
        Ok(path)
    }
}

fn filesystem_error(path: &Path, e: anyhow::Error) -> anyhow::Error {
    InstallError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("{:#}", e),
    }
    .into()
}

/// Entry point of `git-ai-install install`.
///
/// An unsupported platform is returned as an error before anything is
/// attempted; every later failure is reported and turned into exit code 1.
pub async fn install<R: Runtime + 'static>(runtime: &R, config: &Config) -> Result<i32> {
    let platform = config.platform()?;
    if config.os.is_some() || config.arch.is_some() {
        warn!("Installing for {} instead of the host platform", platform);
    }

    let fetcher = HttpFetcher::new(runtime, config.http_client()?);
    let installer = Installer::new(
        runtime,
        fetcher,
        ArchiveExtractorImpl::new(),
        config.package_root.clone(),
        config.mode,
        config.base_url.clone(),
    );

    Ok(installer.run(&platform).await)
}

//! Binary locator
//!
//! Finds the installed git-ai executable for the wrapper command. Nothing is
//! cached: every call checks the disk again.

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::asset::paths::{bin_dir, binary_path};
use crate::error::InstallError;
use crate::package::resolve_package_dir;
use crate::platform::PlatformInfo;
use crate::runtime::Runtime;
use crate::{MAIN_PACKAGE, PLATFORM_PACKAGE_PREFIX};

/// Where the binary lives once the package is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InstallMode {
    /// Inside the platform sub-package `@daleseo/git-ai-<platform>-<arch>`.
    #[value(name = "bundled")]
    BundledPackage,
    /// In `<package root>/bin`, downloaded by `git-ai-install install`.
    #[default]
    #[value(name = "local-bin")]
    LocalBin,
}

/// npm name of the sub-package shipping the binary for `platform`.
pub fn platform_package_name(platform: &PlatformInfo) -> String {
    format!("{}{}", PLATFORM_PACKAGE_PREFIX, platform.target())
}

pub struct BinaryLocator<'a, R: Runtime> {
    runtime: &'a R,
    package_root: PathBuf,
    mode: InstallMode,
}

impl<'a, R: Runtime> BinaryLocator<'a, R> {
    pub fn new(runtime: &'a R, package_root: PathBuf, mode: InstallMode) -> Self {
        Self {
            runtime,
            package_root,
            mode,
        }
    }

    /// Path of the installed binary, or [`InstallError::BinaryNotFound`].
    #[tracing::instrument(skip(self))]
    pub fn locate(&self, platform: &PlatformInfo) -> Result<PathBuf> {
        match self.mode {
            InstallMode::BundledPackage => self.locate_bundled(platform),
            InstallMode::LocalBin => self.locate_local(platform),
        }
    }

    fn locate_bundled(&self, platform: &PlatformInfo) -> Result<PathBuf> {
        let package_name = platform_package_name(platform);
        let hint = format!(
            "Platform-specific package not found: {}\n\
             This usually means the package was not installed correctly.\n\
             Please try reinstalling: npm install -g {}",
            package_name, MAIN_PACKAGE
        );

        let Some(package_dir) =
            resolve_package_dir(self.runtime, &self.package_root, &package_name)
        else {
            return Err(InstallError::BinaryNotFound {
                path: self.package_root.join("node_modules").join(&package_name),
                hint,
            }
            .into());
        };

        let path = binary_path(&bin_dir(&package_dir), platform.platform);
        self.existing(path, hint)
    }

    fn locate_local(&self, platform: &PlatformInfo) -> Result<PathBuf> {
        let path = binary_path(&bin_dir(&self.package_root), platform.platform);
        let hint = format!(
            "git-ai has not been downloaded yet.\n\
             Run `git-ai-install install` in {} or reinstall: npm install -g {}",
            self.package_root.display(),
            MAIN_PACKAGE
        );
        self.existing(path, hint)
    }

    fn existing(&self, path: PathBuf, hint: String) -> Result<PathBuf> {
        if self.runtime.exists(&path) {
            debug!("Found binary at {:?}", path);
            Ok(path)
        } else {
            Err(InstallError::BinaryNotFound { path, hint }.into())
        }
    }
}

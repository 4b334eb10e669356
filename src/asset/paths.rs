use std::path::{Path, PathBuf};

use super::ReleaseAsset;
use crate::BINARY_NAME;
use crate::platform::Os;

/// On-disk locations used by one install run.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallPaths {
    pub bin_dir: PathBuf,
    pub archive_path: PathBuf,
    pub binary_path: PathBuf,
}

impl InstallPaths {
    /// Paths for installing `asset` into the package at `root`.
    pub fn new(root: &Path, asset: &ReleaseAsset) -> Self {
        let bin_dir = bin_dir(root);
        Self {
            binary_path: binary_path(&bin_dir, asset.platform.platform),
            archive_path: root.join(asset.name()),
            bin_dir,
        }
    }
}

/// `<root>/bin`
pub(crate) fn bin_dir(root: &Path) -> PathBuf {
    root.join("bin")
}

/// `<bin_dir>/git-ai[.exe]`
pub(crate) fn binary_path(bin_dir: &Path, os: Os) -> PathBuf {
    bin_dir.join(format!("{}{}", BINARY_NAME, os.exe_suffix()))
}

//! Release asset naming
//!
//! Derives the archive name, download URL and on-disk paths for one git-ai
//! release on one platform.

pub(crate) mod paths;

pub use paths::InstallPaths;

use crate::platform::PlatformInfo;
use crate::{BINARY_NAME, REPO_NAME, REPO_OWNER};

/// Base URL release downloads are served from.
pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// A release archive for one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseAsset {
    pub owner: String,
    pub repo: String,
    /// Semantic version without the leading "v"
    pub version: String,
    pub platform: PlatformInfo,
}

impl ReleaseAsset {
    /// git-ai's own release asset for `version` on `platform`.
    pub fn new(version: &str, platform: PlatformInfo) -> Self {
        Self {
            owner: REPO_OWNER.to_string(),
            repo: REPO_NAME.to_string(),
            version: version.to_string(),
            platform,
        }
    }

    pub fn archive_extension(&self) -> &'static str {
        self.platform.platform.archive_extension()
    }

    /// `git-ai-<platform>-<arch>.<tar.gz|zip>`
    pub fn name(&self) -> String {
        format!(
            "{}-{}{}",
            BINARY_NAME,
            self.platform.target(),
            self.archive_extension()
        )
    }

    /// `<base>/<owner>/<repo>/releases/download/v<version>/<name>`
    pub fn download_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}/releases/download/v{}/{}",
            base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.version,
            self.name()
        )
    }
}

/// Where users can fetch a release by hand when the install fails.
pub fn releases_page() -> String {
    format!("{}/{}/{}/releases", DEFAULT_BASE_URL, REPO_OWNER, REPO_NAME)
}

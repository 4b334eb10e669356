//! Error kinds callers need to tell apart.
//!
//! These travel inside `anyhow::Error`; use `downcast_ref::<InstallError>()`
//! to recover the kind.

use std::path::PathBuf;

/// Failures of a single release download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// The server answered with a status that is neither a redirect nor 200.
    Status(u16),
    /// DNS, TLS, connection reset or a broken body stream.
    Transport(String),
    /// More redirects than the fetcher is willing to follow.
    TooManyRedirects(usize),
    /// A redirect response without a usable `Location` header.
    MissingLocation(u16),
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadError::Status(code) => write!(f, "Failed to download: {}", code),
            DownloadError::Transport(msg) => write!(f, "Failed to download: {}", msg),
            DownloadError::TooManyRedirects(limit) => {
                write!(f, "Failed to download: more than {} redirects", limit)
            }
            DownloadError::MissingLocation(code) => {
                write!(
                    f,
                    "Failed to download: redirect {} without a Location header",
                    code
                )
            }
        }
    }
}

impl std::error::Error for DownloadError {}

/// Everything that can go wrong while resolving, locating or installing git-ai.
#[derive(Debug)]
pub enum InstallError {
    /// The raw OS/arch pair has no release asset.
    UnsupportedPlatform { os: String, arch: String },
    /// The binary is not where the locator expects it.
    BinaryNotFound { path: PathBuf, hint: String },
    /// package.json is missing, unreadable or has no version.
    Metadata { path: PathBuf, reason: String },
    Download(DownloadError),
    Extraction { archive: PathBuf, reason: String },
    Filesystem { path: PathBuf, reason: String },
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallError::UnsupportedPlatform { os, arch } => {
                write!(f, "Unsupported platform: {}-{}", os, arch)
            }
            InstallError::BinaryNotFound { path, hint } => {
                write!(f, "Binary not found at {}\n{}", path.display(), hint)
            }
            InstallError::Metadata { path, reason } => {
                write!(
                    f,
                    "Invalid package metadata at {}: {}",
                    path.display(),
                    reason
                )
            }
            InstallError::Download(e) => write!(f, "{}", e),
            InstallError::Extraction { archive, reason } => {
                write!(f, "Failed to extract {}: {}", archive.display(), reason)
            }
            InstallError::Filesystem { path, reason } => {
                write!(f, "Filesystem error at {}: {}", path.display(), reason)
            }
        }
    }
}

// No source(): `Download` already displays the inner DownloadError.
impl std::error::Error for InstallError {}

impl From<DownloadError> for InstallError {
    fn from(e: DownloadError) -> Self {
        InstallError::Download(e)
    }
}

/// Returns the [`DownloadError`] carried by `err`, whether it was raised bare
/// or wrapped in [`InstallError::Download`].
pub fn download_error(err: &anyhow::Error) -> Option<&DownloadError> {
    if let Some(e) = err.downcast_ref::<DownloadError>() {
        return Some(e);
    }
    match err.downcast_ref::<InstallError>() {
        Some(InstallError::Download(e)) => Some(e),
        _ => None,
    }
}

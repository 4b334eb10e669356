//! Platform detection
//!
//! Maps the operating system and CPU architecture reported by the host to the
//! tokens used in git-ai release asset names (`darwin`/`linux`/`windows`,
//! `x64`/`arm64`).

use anyhow::Result;
use std::fmt;

use crate::error::InstallError;

/// Operating systems git-ai publishes binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }

    /// Accepts both Rust (`macos`) and Node (`win32`) spellings.
    fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "macos" | "darwin" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" | "win32" => Some(Os::Windows),
            _ => None,
        }
    }

    /// Suffix of executables on this OS.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Os::Windows => ".exe",
            _ => "",
        }
    }

    /// Suffix of release archives for this OS.
    pub fn archive_extension(&self) -> &'static str {
        match self {
            Os::Windows => ".zip",
            _ => ".tar.gz",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architectures git-ai publishes binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }

    fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "x86_64" | "x64" | "amd64" => Some(Arch::X64),
            "aarch64" | "arm64" => Some(Arch::Arm64),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved platform information for asset selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub platform: Os,
    pub arch: Arch,
}

impl PlatformInfo {
    /// Map raw OS/arch identifiers. Fails with
    /// [`InstallError::UnsupportedPlatform`] if either side is unknown.
    pub fn resolve(os: &str, arch: &str) -> Result<Self> {
        match (Os::from_raw(os), Arch::from_raw(arch)) {
            (Some(platform), Some(arch)) => Ok(Self { platform, arch }),
            _ => Err(InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }
            .into()),
        }
    }

    /// Resolve the platform this process is running on.
    pub fn detect() -> Result<Self> {
        Self::resolve(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// `<platform>-<arch>`, as used in asset and sub-package names.
    pub fn target(&self) -> String {
        format!("{}-{}", self.platform, self.arch)
    }

    pub fn is_windows(&self) -> bool {
        self.platform == Os::Windows
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)
    }
}

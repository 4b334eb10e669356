pub mod archive;
pub mod asset;
pub mod download;
pub mod error;
pub mod exec;
pub mod http;
pub mod install;
pub mod locate;
pub mod package;
pub mod platform;
pub mod runtime;

/// Name of the executable inside every release archive.
pub const BINARY_NAME: &str = "git-ai";

/// GitHub repository that publishes the releases.
pub const REPO_OWNER: &str = "DaleSeo";
pub const REPO_NAME: &str = "git-ai";

/// npm package this installer ships in.
pub const MAIN_PACKAGE: &str = "@daleseo/git-ai";

/// Platform sub-packages are named `<prefix><platform>-<arch>`.
pub const PLATFORM_PACKAGE_PREFIX: &str = "@daleseo/git-ai-";

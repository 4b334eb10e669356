use anyhow::Result;
use log::warn;
use serde::Deserialize;
use std::path::Path;

use crate::error::InstallError;
use crate::runtime::Runtime;

/// The subset of `package.json` the installer reads.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PackageMeta {
    pub name: Option<String>,
    #[serde(default)]
    pub version: String,
}

impl PackageMeta {
    #[tracing::instrument(skip(runtime, path))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let metadata_error = |reason: String| InstallError::Metadata {
            path: path.to_path_buf(),
            reason,
        };

        let content = runtime
            .read_to_string(path)
            .map_err(|e| metadata_error(format!("{:#}", e)))?;
        let mut meta: PackageMeta =
            serde_json::from_str(&content).map_err(|e| metadata_error(e.to_string()))?;

        let version = meta.version.trim();
        if version.is_empty() {
            return Err(metadata_error("missing \"version\" field".to_string()).into());
        }

        // Release tags add the "v" themselves
        let version = match version.strip_prefix('v') {
            Some(stripped) => {
                warn!(
                    "package.json version {:?} has a leading 'v'; using {:?}",
                    version, stripped
                );
                stripped
            }
            None => version,
        };
        meta.version = version.to_string();

        Ok(meta)
    }
}

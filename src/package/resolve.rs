use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Find the directory of the installed npm package `name`, starting the
/// search at `start` and walking up through each ancestor's `node_modules`,
/// the same lookup `require.resolve("<name>/package.json")` performs.
///
/// Scoped names (`@scope/pkg`) map to nested directories.
#[tracing::instrument(skip(runtime))]
pub fn resolve_package_dir<R: Runtime>(runtime: &R, start: &Path, name: &str) -> Option<PathBuf> {
    for dir in start.ancestors() {
        // node_modules/node_modules is never searched
        if dir.file_name().is_some_and(|n| n == "node_modules") {
            continue;
        }

        let candidate = name
            .split('/')
            .fold(dir.join("node_modules"), |path, part| path.join(part));

        if runtime.exists(&candidate.join("package.json")) {
            debug!("Resolved {} to {:?}", name, candidate);
            return Some(candidate);
        }
    }

    debug!("Package {} not found above {:?}", name, start);
    None
}

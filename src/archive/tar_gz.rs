use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow};
use flate2::read::GzDecoder;
use log::{debug, info};
use std::path::Path;
use tar::{Archive, EntryType};

use super::{ArchiveExtractor, entry_destination};

/// Extractor for .tar.gz archives
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting tar.gz archive to {:?}...", extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        let mut archive = Archive::new(GzDecoder::new(file));
        let mut extracted = 0usize;

        for entry in archive
            .entries()
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?
        {
            let mut entry = entry.context("Failed to read tar entry")?;
            let entry_path = entry.path().context("Invalid tar entry path")?.into_owned();

            let Some(full_path) = entry_destination(extract_to, &entry_path) else {
                debug!("Skipping entry with unsafe path {:?}", entry_path);
                continue;
            };

            match entry.header().entry_type() {
                EntryType::Directory => {
                    runtime.create_dir_all(&full_path)?;
                }
                EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => {
                    if let Some(parent) = full_path.parent() {
                        runtime.create_dir_all(parent)?;
                    }
                    // Replace rather than truncate: the old binary may still be running
                    if runtime.exists(&full_path) {
                        runtime.remove_file(&full_path)?;
                    }
                    let mut dest_file = runtime.create_file(&full_path)?;
                    std::io::copy(&mut entry, &mut dest_file)
                        .with_context(|| format!("Failed to extract file {:?}", full_path))?;
                    drop(dest_file);

                    #[cfg(unix)]
                    if let Ok(mode) = entry.header().mode()
                        && let Err(e) = runtime.set_permissions(&full_path, mode & 0o7777)
                    {
                        debug!("Failed to set permissions on {:?}: {}", full_path, e);
                    }

                    extracted += 1;
                }
                other => {
                    debug!("Skipping {:?} entry {:?}", other, entry_path);
                }
            }
        }

        if extracted == 0 {
            return Err(anyhow!("Archive appears to be empty."));
        }

        info!("Extraction complete.");
        Ok(())
    }
}

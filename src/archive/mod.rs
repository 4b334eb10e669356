mod tar_gz;
mod zip;

use crate::error::InstallError;
use crate::runtime::Runtime;
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

pub use tar_gz::TarGzExtractor;
pub use zip::ZipExtractor;

/// Trait for format-specific archive extractors
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Check if this extractor can handle the given archive format
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Unpack the archive into `extract_to`, keeping the archive's layout.
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Dispatcher that selects the appropriate extractor based on archive format.
///
/// Release archives are `.zip` on windows and `.tar.gz` everywhere else, so
/// dispatching on the file name is the same as dispatching on the platform.
pub struct ArchiveExtractorImpl {
    tar_gz: TarGzExtractor,
    zip: ZipExtractor,
}

impl Default for ArchiveExtractorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractorImpl {
    pub fn new() -> Self {
        Self {
            tar_gz: TarGzExtractor,
            zip: ZipExtractor,
        }
    }
}

impl ArchiveExtractor for ArchiveExtractorImpl {
    fn can_handle(&self, archive_path: &Path) -> bool {
        self.tar_gz.can_handle(archive_path) || self.zip.can_handle(archive_path)
    }

    #[tracing::instrument(skip(self, runtime, archive_path, extract_to))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        let result = if self.tar_gz.can_handle(archive_path) {
            self.tar_gz.extract(runtime, archive_path, extract_to)
        } else if self.zip.can_handle(archive_path) {
            self.zip.extract(runtime, archive_path, extract_to)
        } else {
            Err(anyhow::anyhow!("Unsupported archive format"))
        };

        result.map_err(|e| {
            anyhow::Error::from(InstallError::Extraction {
                archive: archive_path.to_path_buf(),
                reason: format!("{:#}", e),
            })
        })
    }
}

/// Joins an archive entry path onto `root`, refusing anything that would land
/// outside of it (absolute paths, `..`, drive prefixes).
pub(crate) fn entry_destination(root: &Path, entry: &Path) -> Option<PathBuf> {
    let mut dest = root.to_path_buf();
    for component in entry.components() {
        match component {
            Component::Normal(part) => dest.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if dest == root { None } else { Some(dest) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use anyhow::Result;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs::{self, File};
    use tar::Builder;
    use tempfile::tempdir;

    fn create_test_archive(path: &Path, files: &[(&str, &str)]) -> Result<()> {
        let file = File::create(path)?;
        let enc = GzEncoder::new(file, Compression::default());
        let mut tar = Builder::new(enc);

        for (f, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(f)?;
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            tar.append(&header, content.as_bytes())?;
        }

        tar.into_inner()?.finish()?;
        Ok(())
    }

    fn create_test_zip_archive(path: &Path, files: &[(&str, &str)]) -> Result<()> {
        use ::zip::CompressionMethod;
        use ::zip::ZipWriter;
        use ::zip::write::FileOptions;
        use std::io::Write;

        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in files {
            zip.start_file(*name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }

    #[test]
    fn test_extractor_impl_can_handle() {
        let extractor = ArchiveExtractorImpl::new();
        assert!(extractor.can_handle(Path::new("git-ai-linux-x64.tar.gz")));
        assert!(extractor.can_handle(Path::new("git-ai-windows-x64.zip")));
        assert!(!extractor.can_handle(Path::new("git-ai.unknown")));
    }

    #[test]
    fn test_extractor_impl_dispatches_to_tar_gz() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("git-ai-linux-x64.tar.gz");
        let extract_path = dir.path().join("bin");
        fs::create_dir(&extract_path)?;

        create_test_archive(&archive_path, &[("git-ai", "#!/bin/sh\necho tar")])?;

        ArchiveExtractorImpl::new().extract(&RealRuntime, &archive_path, &extract_path)?;

        assert_eq!(
            fs::read_to_string(extract_path.join("git-ai"))?,
            "#!/bin/sh\necho tar"
        );
        Ok(())
    }

    #[test]
    fn test_extractor_impl_dispatches_to_zip() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("git-ai-windows-x64.zip");
        let extract_path = dir.path().join("bin");
        fs::create_dir(&extract_path)?;

        create_test_zip_archive(&archive_path, &[("git-ai.exe", "MZ fake exe")])?;

        ArchiveExtractorImpl::new().extract(&RealRuntime, &archive_path, &extract_path)?;

        assert_eq!(
            fs::read_to_string(extract_path.join("git-ai.exe"))?,
            "MZ fake exe"
        );
        Ok(())
    }

    #[test]
    fn test_extractor_impl_unsupported_format() {
        let result = ArchiveExtractorImpl::new().extract(
            &RealRuntime,
            Path::new("/tmp/git-ai.unknown"),
            Path::new("/tmp/out"),
        );
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::Extraction { .. })
        ));
        assert!(err.to_string().contains("Unsupported archive format"));
    }

    #[test]
    fn test_extractor_impl_corrupted_archive_is_extraction_error() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("git-ai-linux-x64.tar.gz");
        fs::write(&archive_path, "<html>Not Found</html>").unwrap();

        let err = ArchiveExtractorImpl::new()
            .extract(&RealRuntime, &archive_path, dir.path())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::Extraction { .. })
        ));
    }

    #[test]
    fn test_entry_destination() {
        let root = Path::new("/pkg/bin");
        assert_eq!(
            entry_destination(root, Path::new("git-ai")),
            Some(PathBuf::from("/pkg/bin/git-ai"))
        );
        assert_eq!(
            entry_destination(root, Path::new("./docs/README.md")),
            Some(PathBuf::from("/pkg/bin/docs/README.md"))
        );
        assert_eq!(entry_destination(root, Path::new("../escape")), None);
        assert_eq!(entry_destination(root, Path::new("/etc/passwd")), None);
        assert_eq!(entry_destination(root, Path::new("./")), None);
    }
}

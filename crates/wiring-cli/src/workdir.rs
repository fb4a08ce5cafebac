use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEMP_PREFIX: &str = "doc_pack_";

/// Directory holding a build's intermediate PDFs
#[derive(Debug)]
pub enum WorkingDirectory {
    /// Created for this run and removed afterwards unless kept
    Temporary(TempDir),
    /// Named in the configuration. Left in place.
    Configured(PathBuf),
}

impl WorkingDirectory {
    pub async fn create(configured: Option<&Path>) -> std::io::Result<Self> {
        let dir = match configured {
            Some(path) => {
                tokio::fs::create_dir_all(path).await?;
                Self::Configured(path.to_owned())
            }
            None => Self::Temporary(tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?),
        };
        println!("Working directory: {}", dir.path().display());
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Configured(path) => path,
        }
    }

    /// Path for an intermediate file named after a tab or room
    pub fn file(&self, prefix: &str, name: &str) -> PathBuf {
        self.path().join(format!("{}_{}.pdf", prefix, file_safe(name)))
    }

    /// Remove a temporary directory, or keep it when asked to. Returns the
    /// path when the directory survives.
    pub fn finish(self, retain: bool, cleanup: bool) -> Option<PathBuf> {
        match self {
            Self::Temporary(dir) if retain || !cleanup => {
                let path = dir.keep();
                println!("Working directory retained: {}", path.display());
                Some(path)
            }
            Self::Temporary(dir) => {
                let path = dir.path().to_owned();
                match dir.close() {
                    Ok(()) => log::info!("Cleaned up working directory: {}", path.display()),
                    Err(e) => log::warn!("Could not remove {}: {}", path.display(), e),
                }
                None
            }
            Self::Configured(path) => Some(path),
        }
    }
}

/// Spaces and path separators become underscores
pub fn file_safe(name: &str) -> String {
    name.trim()
        .chars()
        .map(|ch| match ch {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_safe() {
        assert_eq!(file_safe("Main Hall"), "Main_Hall");
        assert_eq!(file_safe("Plant/Store"), "Plant_Store");
        assert_eq!(file_safe("O'Brien Room"), "O'Brien_Room");
    }

    #[tokio::test]
    async fn test_temporary_directory_is_removed() {
        let dir = WorkingDirectory::create(None).await.unwrap();
        let path = dir.path().to_owned();
        assert!(path.exists());

        assert_eq!(dir.finish(false, true), None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_retained_directory_survives() {
        let dir = WorkingDirectory::create(None).await.unwrap();
        let kept = dir.finish(true, true).unwrap();
        assert!(kept.exists());
        std::fs::remove_dir_all(kept).unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_disabled_keeps_temporary_directory() {
        let dir = WorkingDirectory::create(None).await.unwrap();
        let kept = dir.finish(false, false).unwrap();
        assert!(kept.exists());
        std::fs::remove_dir_all(kept).unwrap();
    }

    #[tokio::test]
    async fn test_configured_directory_is_never_removed() {
        let parent = TempDir::new().unwrap();
        let configured = parent.path().join("work");

        let dir = WorkingDirectory::create(Some(&configured)).await.unwrap();
        assert!(configured.is_dir());
        assert_eq!(
            dir.file("cropped", "Small Power"),
            configured.join("cropped_Small_Power.pdf")
        );

        dir.finish(false, true);
        assert!(configured.is_dir());
    }
}

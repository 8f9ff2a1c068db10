//! Plain-text storage for the threshold value.

use std::path::{Path, PathBuf};

use super::error::PersistenceError;

/// The durable storage location for the threshold.
///
/// The on-disk format is a single unadorned fixed-point decimal with six
/// fractional digits, e.g. `130.000000`.
#[derive(Debug, Clone)]
pub struct ThresholdFile {
    path: PathBuf,
}

impl ThresholdFile {
    /// Creates a handle for the threshold file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this handle reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory of the threshold file if it is missing.
    pub async fn ensure_parent_dir(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Loads the persisted threshold value.
    pub async fn load(&self) -> Result<f64, PersistenceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let trimmed = content.trim();
        trimmed.parse::<f64>().map_err(|_| PersistenceError::Malformed(trimmed.to_string()))
    }

    /// Durably writes the threshold value.
    pub async fn save(&self, value: f64) -> Result<(), PersistenceError> {
        tokio::fs::write(&self.path, format!("{value:.6}")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_in_tempdir(dir: &tempfile::TempDir) -> ThresholdFile {
        ThresholdFile::new(dir.path().join("threshold.txt"))
    }

    #[tokio::test]
    async fn round_trips_at_six_digit_precision() {
        let dir = tempfile::tempdir().unwrap();
        let file = file_in_tempdir(&dir);

        file.save(130.123456789).await.unwrap();

        let content = tokio::fs::read_to_string(file.path()).await.unwrap();
        assert_eq!(content, "130.123457");
        assert_eq!(file.load().await.unwrap(), 130.123457);
    }

    #[tokio::test]
    async fn load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = file_in_tempdir(&dir);

        assert!(matches!(file.load().await, Err(PersistenceError::Io(_))));
    }

    #[tokio::test]
    async fn load_fails_on_corrupt_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = file_in_tempdir(&dir);
        tokio::fs::write(file.path(), "not a number").await.unwrap();

        assert!(matches!(file.load().await, Err(PersistenceError::Malformed(_))));
    }

    #[tokio::test]
    async fn tolerates_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let file = file_in_tempdir(&dir);
        tokio::fs::write(file.path(), " 55.500000\n").await.unwrap();

        assert_eq!(file.load().await.unwrap(), 55.5);
    }

    #[tokio::test]
    async fn ensure_parent_dir_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = ThresholdFile::new(dir.path().join("nested/state/threshold.txt"));

        file.ensure_parent_dir().await.unwrap();
        file.save(42.0).await.unwrap();

        assert_eq!(file.load().await.unwrap(), 42.0);
    }
}

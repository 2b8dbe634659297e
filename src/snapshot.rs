use std::io;
use std::path::PathBuf;
use tokio::fs::{self, File, OpenOptions};
use tracing::info;

/// Location of the on-disk snapshot. The file is created on startup if missing but its contents
/// are never read or written, the location is only reported through `CONFIG GET`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPath {
    dir: String,
    dbfilename: String,
}

impl SnapshotPath {
    pub fn new(dir: impl Into<String>, dbfilename: impl Into<String>) -> SnapshotPath {
        SnapshotPath {
            dir: dir.into(),
            dbfilename: dbfilename.into(),
        }
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn dbfilename(&self) -> &str {
        &self.dbfilename
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(&self.dbfilename)
    }

    /// Creates the snapshot directory when needed and opens the snapshot file, creating it when it
    /// does not exist yet.
    pub async fn open(&self) -> io::Result<File> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await?;

        info!(path = %path.display(), "Opened snapshot file");

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kvcache-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn open_creates_missing_dir_and_file() {
        let dir = scratch_dir("snapshot").join("nested");
        let snapshot = SnapshotPath::new(dir.to_string_lossy(), "dump.rdb");

        let file = snapshot.open().await.unwrap();
        drop(file);

        assert!(dir.join("dump.rdb").is_file());

        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[tokio::test]
    async fn open_keeps_existing_contents() {
        let dir = scratch_dir("existing");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("dump.rdb"), b"REDIS0011").unwrap();

        let snapshot = SnapshotPath::new(dir.to_string_lossy(), "dump.rdb");
        drop(snapshot.open().await.unwrap());

        assert_eq!(std::fs::read(dir.join("dump.rdb")).unwrap(), b"REDIS0011");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn accessors() {
        let snapshot = SnapshotPath::new("/tmp/data", "dump.rdb");

        assert_eq!(snapshot.dir(), "/tmp/data");
        assert_eq!(snapshot.dbfilename(), "dump.rdb");
        assert_eq!(snapshot.path(), PathBuf::from("/tmp/data/dump.rdb"));
    }
}

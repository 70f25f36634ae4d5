use super::error::RelayError;
use async_trait::async_trait;
use log::*;
#[cfg(test)]
use mockall::automock;
use serde_json::{json, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait StoresState {
    /// Last notified video id. Missing, unreadable or malformed state reads as `None`.
    async fn read(&self) -> Option<String>;
    async fn write(&self, id: &str) -> Result<(), RelayError>;
}

const LAST_VIDEO_ID: &str = "lastVideoId";

pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl StoresState for FileStateStore {
    async fn read(&self) -> Option<String> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No state file at {}.", self.path.display());
                return None;
            }
            Err(err) => {
                warn!("Could not read state file {}: {err}", self.path.display());
                return None;
            }
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(state) => state
                .get(LAST_VIDEO_ID)
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_owned),
            Err(err) => {
                warn!("Ignoring malformed state file {}: {err}", self.path.display());
                None
            }
        }
    }

    async fn write(&self, id: &str) -> Result<(), RelayError> {
        let body = serde_json::to_vec(&json!({ LAST_VIDEO_ID: id }))?;
        let temp_path = self.temp_path();
        if let Err(err) = write_and_replace(&temp_path, &self.path, &body).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }
        debug!("Saved last video id {id} to {}.", self.path.display());
        Ok(())
    }
}

async fn write_and_replace(temp_path: &Path, path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(temp_path).await?;
    file.write_all(body).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(temp_path, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("lastVideo.json"));
        assert_eq!(store.read().await, None);
    }

    #[tokio::test]
    async fn written_id_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("lastVideo.json"));
        store.write("7301").await.unwrap();
        assert_eq!(store.read().await, Some("7301".to_owned()));
        store.write("7302").await.unwrap();
        assert_eq!(store.read().await, Some("7302".to_owned()));
    }

    #[tokio::test]
    async fn write_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastVideo.json");
        std::fs::write(&path, r#"{"lastVideoId":"a much longer previous id","other":true}"#).unwrap();
        let store = FileStateStore::new(&path);
        store.write("1").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"lastVideoId":"1"}"#);
        assert!(!dir.path().join("lastVideo.json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastVideo.json");
        // A directory at the target makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        let store = FileStateStore::new(&path);
        assert!(store.write("1").await.is_err());
        assert!(!dir.path().join("lastVideo.json.tmp").exists());
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn invalid_json_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastVideo.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(FileStateStore::new(&path).read().await, None);
    }

    #[tokio::test]
    async fn unexpected_shapes_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastVideo.json");
        let store = FileStateStore::new(&path);
        for content in [r#"{"lastVideoId":123}"#, r#"{"somethingElse":"1"}"#, r#"["1"]"#, r#"{"lastVideoId":""}"#] {
            std::fs::write(&path, content).unwrap();
            assert_eq!(store.read().await, None, "content: {content}");
        }
    }
}

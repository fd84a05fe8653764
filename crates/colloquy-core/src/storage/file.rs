//! File-backed append log
//!
//! Each key maps to one text file under a root directory: `agent::veya::brain`
//! lives at `<root>/agent/veya/brain.log`. Lines are written with a trailing
//! newline in append mode, so an existing file is never rewritten.

use super::KeyedAppendLog;
use crate::error::{ColloquyError, ColloquyResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// [`KeyedAppendLog`] persisted as plain text files
#[derive(Debug)]
pub struct FileLog {
    /// Root directory
    root: PathBuf,

    /// Serializes appends so concurrent writers never interleave lines
    write_lock: Mutex<()>,
}

impl FileLog {
    /// Create a file log rooted at `root`
    ///
    /// The directory is created lazily on first append.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Root directory of this log
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its file path
    pub fn path_for(&self, key: &str) -> ColloquyResult<PathBuf> {
        let mut path = self.root.clone();
        let segments: Vec<&str> = key.split("::").collect();

        for segment in &segments {
            let valid = !segment.is_empty()
                && *segment != "."
                && *segment != ".."
                && !segment.contains(['/', '\\']);
            if !valid {
                return Err(ColloquyError::validation(
                    "storage_key",
                    "segments must be non-empty plain names",
                    key,
                ));
            }
            path.push(segment);
        }

        path.set_extension("log");
        Ok(path)
    }
}

#[async_trait]
impl KeyedAppendLog for FileLog {
    async fn read(&self, key: &str) -> ColloquyResult<Vec<String>> {
        let path = self.path_for(key)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ColloquyError::storage("read_log", e)),
        };

        Ok(content.lines().map(String::from).collect())
    }

    async fn append(&self, key: &str, line: &str) -> ColloquyResult<()> {
        let path = self.path_for(key)?;
        let flat = line.replace(['\r', '\n'], " ");

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ColloquyError::storage("create_log_dir", e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| ColloquyError::storage("open_log", e))?;

        file.write_all(format!("{}\n", flat).as_bytes())
            .await
            .map_err(|e| ColloquyError::storage("append_log", e))?;
        file.flush()
            .await
            .map_err(|e| ColloquyError::storage("flush_log", e))?;

        tracing::trace!(key, path = %path.display(), "Appended line");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_log_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(dir.path());

        log.append("agent::veya::brain", "I like the stars.").await.unwrap();
        log.append("agent::veya::brain", "Comets are shy.").await.unwrap();

        let lines = log.read("agent::veya::brain").await.unwrap();
        assert_eq!(lines, vec!["I like the stars.", "Comets are shy."]);
        assert!(dir.path().join("agent/veya/brain.log").exists());
    }

    #[tokio::test]
    async fn test_newlines_are_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(dir.path());

        log.append("log::learning", "line one\nline two").await.unwrap();

        let lines = log.read("log::learning").await.unwrap();
        assert_eq!(lines, vec!["line one line two"]);
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(dir.path());

        assert!(log.read("global::qa").await.unwrap().is_empty());
    }

    #[test]
    fn test_path_traversal_is_rejected() {
        let log = FileLog::new("/tmp/colloquy");

        assert!(log.path_for("agent::..::brain").is_err());
        assert!(log.path_for("agent::a/b::brain").is_err());
        assert!(log.path_for("agent::::brain").is_err());
        assert!(log.path_for("global::qa").is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = std::sync::Arc::new(FileLog::new(dir.path()));

        let mut handles = Vec::new();
        for i in 0..20 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append("log::interactions", &format!("record {}", i))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let lines = log.read("log::interactions").await.unwrap();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.starts_with("record ")));
    }
}

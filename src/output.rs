//! Where finished documents go.

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Receives each finished document. Returns a description of where it ended up.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn save(&self, name: &str, bytes: Vec<u8>) -> Result<PathBuf>;
}

/// Writes documents into a directory, creating it if needed. A document with the same
/// name as an existing file replaces it.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> DirectorySink {
        DirectorySink { dir: dir.into() }
    }
}

#[async_trait]
impl OutputSink for DirectorySink {
    async fn save(&self, name: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// Keeps documents in memory
#[derive(Debug, Default)]
pub struct MemoryOutput {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryOutput {
    pub fn new() -> MemoryOutput {
        MemoryOutput::default()
    }

    /// `(name, bytes)` of every saved document, oldest first
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OutputSink for MemoryOutput {
    async fn save(&self, name: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.to_string(), bytes));
        Ok(PathBuf::from(name))
    }
}

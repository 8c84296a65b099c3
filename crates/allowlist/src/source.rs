//! Allow-list source implementations

use std::path::{Path, PathBuf};

/// Produces the raw allow-list document on demand
///
/// One fetch returns the full replacement list or an error; there is no
/// partial read. The document format is handled by the consumer.
pub trait AllowListSource: Send + Sync {
    /// Human-readable source name, used in load errors and logs
    fn name(&self) -> String;

    /// Read the current list document
    fn fetch(&self) -> std::io::Result<String>;
}

/// Reads the allow-list from a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AllowListSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// Serves a fixed document, for tests and embedded defaults
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    body: String,
}

impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl AllowListSource for StaticSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    fn fetch(&self) -> std::io::Result<String> {
        Ok(self.body.clone())
    }
}

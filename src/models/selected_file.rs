use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A file the user picked for upload. The client never inspects its contents
/// beyond reading the bytes at upload time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    path: PathBuf,
    file_name: String,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name sent as the multipart file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

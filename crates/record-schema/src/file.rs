//! File-level facts from the local filesystem.

use serde::{Deserialize, Serialize};
use std::path::Path;
use synthprobe_common::Timestamp;

/// Filesystem facts about the analyzed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileDescriptor {
    pub path: String,
    pub filename: String,
    /// Lowercased extension without the dot, if any.
    pub extension: Option<String>,
    pub size_bytes: u64,
    /// Birth time when the OS reports one.
    pub created: Option<Timestamp>,
    pub modified: Option<Timestamp>,
    pub accessed: Option<Timestamp>,
}

impl FileDescriptor {
    /// Build a descriptor from filesystem metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            path: path.display().to_string(),
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase()),
            size_bytes: meta.len(),
            created: meta.created().ok().map(Timestamp::from_system_time),
            modified: meta.modified().ok().map(Timestamp::from_system_time),
            accessed: meta.accessed().ok().map(Timestamp::from_system_time),
        })
    }

    /// Human-readable size.
    pub fn size_human(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Format a byte count with a 1024 divisor: "0 B", "1023 B", "1.00 KB".
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

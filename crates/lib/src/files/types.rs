//! File record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::FileId;

/// Everything about a stored file except its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Store-assigned internal id
    pub id: Uuid,
    /// Composite external id, `<owner>_<sequential_id>`
    pub file_id: FileId,
    /// Per-owner sequence number, starting at 1
    pub sequential_id: i64,
    /// Display name; the only mutable attribute
    pub original_name: String,
    pub mimetype: String,
    /// Payload length in bytes
    pub size: u64,
    /// Internal id of the owning user
    pub uploaded_by: Uuid,
    pub upload_date: DateTime<Utc>,
}

/// A file record together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(flatten)]
    pub meta: FileMeta,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

/// An incoming upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub mimetype: String,
    pub data: Vec<u8>,
    /// Size claimed by the client, if it sent one. Must match `data.len()`.
    pub declared_size: Option<u64>,
}

impl Upload {
    pub fn new(
        original_name: impl Into<String>,
        mimetype: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            mimetype: mimetype.into(),
            data: data.into(),
            declared_size: None,
        }
    }

    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = Some(size);
        self
    }
}

/// What a successful download hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub mimetype: String,
    pub original_name: String,
    pub size: u64,
    pub data: Vec<u8>,
}

impl Download {
    /// `Content-Disposition` value forcing a save dialog under the original name.
    pub fn content_disposition(&self) -> String {
        let name: String = self
            .original_name
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| if c == '"' { '\'' } else { c })
            .collect();
        format!("attachment; filename=\"{name}\"")
    }
}

impl From<StoredFile> for Download {
    fn from(file: StoredFile) -> Self {
        Self {
            mimetype: file.meta.mimetype,
            original_name: file.meta.original_name,
            size: file.meta.size,
            data: file.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_disposition_quotes_name() {
        let download = Download {
            mimetype: "text/plain".to_string(),
            original_name: "my \"notes\".txt".to_string(),
            size: 0,
            data: Vec::new(),
        };
        assert_eq!(
            download.content_disposition(),
            "attachment; filename=\"my 'notes'.txt\""
        );
    }
}

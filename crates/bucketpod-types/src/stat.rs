use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a stored resource as observed through the object store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    File,
    Directory,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// Live stat of a storage key, recomputed on every call and never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageObjectStat {
    File { mtime: DateTime<Utc>, size: u64 },
    Directory { mtime: DateTime<Utc> },
}

impl StorageObjectStat {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::File { .. } => ObjectKind::File,
            Self::Directory { .. } => ObjectKind::Directory,
        }
    }

    pub fn mtime(&self) -> DateTime<Utc> {
        match self {
            Self::File { mtime, .. } | Self::Directory { mtime } => *mtime,
        }
    }

    /// Size in bytes; always 0 for directories.
    pub fn size(&self) -> u64 {
        match self {
            Self::File { size, .. } => *size,
            Self::Directory { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn directory_size_is_zero() {
        let mtime = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let dir = StorageObjectStat::Directory { mtime };
        assert_eq!(dir.size(), 0);
        assert_eq!(dir.kind(), ObjectKind::Directory);
        assert_eq!(dir.mtime(), mtime);
    }

    #[test]
    fn file_reports_size_and_kind() {
        let mtime = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let file = StorageObjectStat::File { mtime, size: 42 };
        assert_eq!(file.size(), 42);
        assert_eq!(file.kind(), ObjectKind::File);
        assert_eq!(format!("{}", file.kind()), "file");
    }
}

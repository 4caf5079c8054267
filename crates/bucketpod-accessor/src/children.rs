//! Child enumeration over a prefix listing.

use std::iter::Peekable;
use std::vec;

use bucketpod_store::ListEntry;
use bucketpod_types::{ObjectKind, SEPARATOR};
use chrono::{DateTime, Utc};

/// One direct child of a container, derived from the keys under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Child {
    /// Path segment below the container; ends in `/` for containers.
    pub name: String,
    /// Primary key for documents, key prefix for containers.
    pub key: String,
    pub kind: ObjectKind,
    pub size: u64,
    pub mtime: DateTime<Utc>,
}

/// Collapses a sorted listing into distinct direct children.
///
/// Keys below a child container share that container's prefix, so in a
/// sorted listing they are adjacent: one forward pass that swallows the run
/// yields each child exactly once. The container's own placeholder (empty
/// suffix) and sidecar keys are skipped.
pub(crate) struct ChildGrouper {
    prefix: String,
    metadata_suffix: String,
    entries: Peekable<vec::IntoIter<ListEntry>>,
}

impl ChildGrouper {
    /// `entries` must be sorted by key.
    pub(crate) fn new(
        prefix: impl Into<String>,
        metadata_suffix: impl Into<String>,
        entries: Vec<ListEntry>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            metadata_suffix: metadata_suffix.into(),
            entries: entries.into_iter().peekable(),
        }
    }
}

impl Iterator for ChildGrouper {
    type Item = Child;

    fn next(&mut self) -> Option<Child> {
        loop {
            let entry = self.entries.next()?;
            let Some(rest) = entry.key.strip_prefix(self.prefix.as_str()) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            match rest.find(SEPARATOR) {
                None => {
                    if rest.ends_with(self.metadata_suffix.as_str()) {
                        continue;
                    }
                    return Some(Child {
                        name: rest.to_string(),
                        key: entry.key.clone(),
                        kind: ObjectKind::File,
                        size: entry.size,
                        mtime: entry.modified_at,
                    });
                }
                Some(pos) => {
                    let name = rest[..=pos].to_string();
                    let child_prefix = format!("{}{name}", self.prefix);
                    let mut mtime = entry.modified_at;
                    while let Some(next) = self
                        .entries
                        .next_if(|e| e.key.starts_with(child_prefix.as_str()))
                    {
                        mtime = mtime.max(next.modified_at);
                    }
                    // `a//b` style keys have an empty segment; nothing to name.
                    if pos == 0 {
                        continue;
                    }
                    return Some(Child {
                        name,
                        key: child_prefix,
                        kind: ObjectKind::Directory,
                        size: 0,
                        mtime,
                    });
                }
            }
        }
    }
}

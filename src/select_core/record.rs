use serde::Serialize;
use std::path::{Path, PathBuf};

/// One selected image, as found in the digiKam database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute path of the album root
    pub root: PathBuf,
    /// Album path below the root, e.g. `/2017/Holiday` (may be empty)
    #[serde(rename = "path")]
    pub relative_path: String,
    /// File name of the image
    pub name: String,
}

impl FileRecord {
    pub fn new(root: impl Into<PathBuf>, relative_path: impl Into<String>, name: impl Into<String>) -> Self {
        FileRecord {
            root: root.into(),
            relative_path: relative_path.into(),
            name: name.into(),
        }
    }

    /// Album path with digiKam's leading separators removed, safe to `join`.
    pub fn album_dir(&self) -> &Path {
        Path::new(self.relative_path.trim_start_matches(['/', '\\']))
    }

    /// Where the image lives: root/relative_path/name.
    pub fn source_path(&self) -> PathBuf {
        self.root.join(self.album_dir()).join(&self.name)
    }

    /// Where the image goes: output/relative_path/name, or output/name without albums.
    pub fn target_path(&self, output: &Path, albums: bool) -> PathBuf {
        if albums {
            output.join(self.album_dir()).join(&self.name)
        } else {
            output.join(&self.name)
        }
    }
}

/// JSON view of a record, including the resolved source path.
#[derive(Debug, Serialize)]
pub struct RecordListing<'a> {
    #[serde(flatten)]
    pub record: &'a FileRecord,
    pub source: PathBuf,
}

impl<'a> From<&'a FileRecord> for RecordListing<'a> {
    fn from(record: &'a FileRecord) -> Self {
        RecordListing {
            record,
            source: record.source_path(),
        }
    }
}

use crate::select_core::error::{Result, SelectError};
use rusqlite::{Connection, OpenFlags, params};
use std::path::Path;

/// Tables the selection query reads from.
pub const REQUIRED_TABLES: [&str; 6] = [
    "Images",
    "ImageTags",
    "ImageInformation",
    "Tags",
    "Albums",
    "AlbumRoots",
];

/// Read-only handle on a digiKam database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `path` read-only and check that it has the digiKam tables.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let db = Database { conn };
        db.check_schema(path)?;
        Ok(db)
    }

    fn check_schema(&self, path: &Path) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        for table in REQUIRED_TABLES {
            let count: i64 = stmt.query_row(params![table], |row| row.get(0))?;
            if count == 0 {
                return Err(SelectError::InvalidSchema {
                    path: path.to_path_buf(),
                    table: table.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn connection_ref(&self) -> &Connection {
        &self.conn
    }
}

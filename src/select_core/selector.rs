use crate::select_core::database::Database;
use crate::select_core::error::Result;
use crate::select_core::record::FileRecord;
use rusqlite::ToSql;

/// Images joined with everything needed to filter them and locate their files.
/// Rows without an album root or album path cannot be located and are dropped.
const BASE_QUERY: &str = "SELECT DISTINCT r.specificPath AS root, a.relativePath AS path, i.name AS name
     FROM Images i
     LEFT JOIN ImageTags it ON it.imageid = i.id
     LEFT JOIN ImageInformation ii ON ii.imageid = i.id
     LEFT JOIN Tags t ON it.tagid = t.id
     LEFT JOIN Albums a ON i.album = a.id
     LEFT JOIN AlbumRoots r ON a.albumRoot = r.id
     WHERE r.specificPath != '' AND a.relativePath != ''";

/// Which images to select. All active filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionQuery {
    /// Exact flat tag names; an image matches if it carries any of them
    pub tags: Vec<String>,
    /// Inclusive lower bound on the star rating; 0 or less means no rating filter
    pub min_rating: i64,
    /// Case-sensitive substring of the album path
    pub album: Option<String>,
}

impl SelectionQuery {
    /// Build the SQL text and its bound parameters.
    pub fn to_sql(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut sql = String::from(BASE_QUERY);
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        // Tag filter
        if !self.tags.is_empty() {
            let placeholders: Vec<&str> = self.tags.iter().map(|_| "?").collect();
            sql.push_str(&format!(" AND t.name IN ({})", placeholders.join(",")));
            for tag in &self.tags {
                params.push(Box::new(tag.clone()));
            }
        }

        // Rating filter
        if self.min_rating > 0 {
            sql.push_str(" AND ii.rating >= ?");
            params.push(Box::new(self.min_rating));
        }

        // Album filter (instr is case-sensitive, LIKE is not)
        if let Some(ref album) = self.album {
            sql.push_str(" AND instr(a.relativePath, ?) > 0");
            params.push(Box::new(album.clone()));
        }

        sql.push_str(" ORDER BY root, path, name");
        (sql, params)
    }
}

/// Run the selection against the database.
pub fn select(db: &Database, query: &SelectionQuery) -> Result<Vec<FileRecord>> {
    let (sql, params) = query.to_sql();
    log::debug!("Selection query: {} ({} parameters)", sql, params.len());

    let conn = db.connection_ref();
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        Ok(FileRecord::new(
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let record = row?;
        log::trace!("Selected {:?}", record);
        records.push(record);
    }

    log::info!("Found {} matching images.", records.len());
    Ok(records)
}

//! SQLite persistence for documents and pages.
//!
//! Content is stored as JSON blobs; a handful of projection columns
//! (title, description, tags, dates) exist so listing and search never
//! deserialize whole documents.

use crate::core::document::Document;
use crate::core::error::{InkpadError, Result};
use crate::core::page::Page;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};

const SCHEMA_VERSION: i32 = 1;

/// A row of the document list, cheap enough to show without loading the
/// document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub modified_date: String,
}

/// Handle to the notes database.
///
/// Starts closed; [`Storage::initialize`] opens or creates the file and
/// applies migrations. Every query returns [`InkpadError::StorageClosed`]
/// when called before initialization or after [`Storage::close`].
#[derive(Debug, Default)]
pub struct Storage {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (creating if needed) the database at `path` and brings its
    /// schema up to date.
    ///
    /// # Errors
    ///
    /// Returns [`InkpadError::Database`] when the file exists but is not
    /// SQLite, or when migration fails.
    pub fn initialize<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        migrate(&conn)?;
        log::info!("storage initialized at {}", path.as_ref().display());
        self.conn = Some(conn);
        self.path = Some(path.as_ref().to_path_buf());
        Ok(())
    }

    /// Opens the database at the platform's per-user data directory.
    pub fn initialize_default(&mut self) -> Result<()> {
        let dirs = directories::ProjectDirs::from("org", "Inkpad", "Inkpad").ok_or_else(|| {
            InkpadError::InvalidPath("no home directory available".to_string())
        })?;
        let path = dirs.data_dir().join("notes.db");
        self.initialize(path)
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the connection. The path is remembered so a later restore can
    /// reopen the same file.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            log::info!("storage closed");
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(InkpadError::StorageClosed)
    }

    fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(InkpadError::StorageClosed)
    }

    // --- documents ---

    /// Writes a document and all of its pages in one transaction. Existing
    /// rows are replaced, removed pages are deleted.
    pub fn save_document(&mut self, document: &Document) -> Result<()> {
        let content = document.to_json().to_string();
        let created = format_date(document.created_date());
        let modified = format_date(document.modified_date());
        let tags = document.tags().join(",");

        let tx = self.conn_mut()?.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO documents
             (id, title, description, created_date, modified_date, tags, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                document.id(),
                document.title(),
                document.description(),
                created,
                modified,
                tags,
                content,
            ],
        )?;
        tx.execute(
            "DELETE FROM pages WHERE document_id = ?1",
            params![document.id()],
        )?;
        for (index, page) in document.pages().iter().enumerate() {
            tx.execute(
                "INSERT OR REPLACE INTO pages (id, document_id, title, page_index, data)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    page.id(),
                    document.id(),
                    page.title(),
                    index as i64,
                    page.to_json().to_string(),
                ],
            )?;
        }
        tx.commit()?;
        log::debug!(
            "saved document {} ({} pages)",
            document.id(),
            document.page_count()
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`InkpadError::DocumentNotFound`] for unknown ids.
    pub fn load_document(&self, document_id: &str) -> Result<Document> {
        let content: Option<String> = self
            .conn()?
            .query_row(
                "SELECT data FROM documents WHERE id = ?1",
                params![document_id],
                |row| row.get(0),
            )
            .optional()?;
        let content =
            content.ok_or_else(|| InkpadError::DocumentNotFound(document_id.to_string()))?;
        let json = parse_blob(&content, document_id)
            .ok_or_else(|| InkpadError::DocumentNotFound(document_id.to_string()))?;
        Ok(Document::from_json(&json))
    }

    /// Loads the most recently modified document with the given title.
    pub fn load_document_by_title(&self, title: &str) -> Result<Document> {
        let content: Option<String> = self
            .conn()?
            .query_row(
                "SELECT data FROM documents WHERE title = ?1
                 ORDER BY modified_date DESC LIMIT 1",
                params![title],
                |row| row.get(0),
            )
            .optional()?;
        let content = content.ok_or_else(|| InkpadError::DocumentNotFound(title.to_string()))?;
        let json = parse_blob(&content, title)
            .ok_or_else(|| InkpadError::DocumentNotFound(title.to_string()))?;
        Ok(Document::from_json(&json))
    }

    /// Deletes a document and its pages. Deleting an unknown id succeeds.
    pub fn delete_document(&mut self, document_id: &str) -> Result<()> {
        let tx = self.conn_mut()?.transaction()?;
        tx.execute(
            "DELETE FROM metadata WHERE document_id = ?1",
            params![document_id],
        )?;
        tx.execute(
            "DELETE FROM pages WHERE document_id = ?1",
            params![document_id],
        )?;
        tx.execute("DELETE FROM documents WHERE id = ?1", params![document_id])?;
        tx.commit()?;
        Ok(())
    }

    /// Document ids, most recently modified first.
    pub fn list_documents(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id FROM documents ORDER BY modified_date DESC")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// The `limit` most recently modified documents.
    pub fn recent_documents(&self, limit: usize) -> Result<Vec<DocumentSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, modified_date FROM documents
             ORDER BY modified_date DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(DocumentSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    modified_date: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Ids of documents whose title, description or content matches `query`,
    /// case-insensitively. An empty query matches nothing.
    pub fn search_documents(&self, query: &str) -> Result<Vec<String>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{query}%");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id FROM documents
             WHERE title LIKE ?1 OR description LIKE ?1 OR data LIKE ?1
             ORDER BY modified_date DESC",
        )?;
        let ids = stmt
            .query_map(params![pattern], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Ids of documents carrying `tag` in their tag list.
    pub fn find_documents_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        if tag.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{tag}%");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id FROM documents WHERE tags LIKE ?1 ORDER BY modified_date DESC",
        )?;
        let ids = stmt
            .query_map(params![pattern], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    // --- pages ---

    /// Writes one page row without touching its document.
    pub fn save_page(&mut self, document_id: &str, index: usize, page: &Page) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO pages (id, document_id, title, page_index, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                page.id(),
                document_id,
                page.title(),
                index as i64,
                page.to_json().to_string(),
            ],
        )?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`InkpadError::PageNotFound`] for unknown ids.
    pub fn load_page(&self, page_id: &str) -> Result<Page> {
        let content: Option<String> = self
            .conn()?
            .query_row(
                "SELECT data FROM pages WHERE id = ?1",
                params![page_id],
                |row| row.get(0),
            )
            .optional()?;
        let content = content.ok_or_else(|| InkpadError::PageNotFound(page_id.to_string()))?;
        let json = parse_blob(&content, page_id)
            .ok_or_else(|| InkpadError::PageNotFound(page_id.to_string()))?;
        Ok(Page::from_json(&json))
    }

    pub fn delete_page(&mut self, page_id: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM pages WHERE id = ?1", params![page_id])?;
        Ok(())
    }

    // --- metadata ---

    pub fn set_document_metadata(
        &mut self,
        document_id: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO metadata (document_id, key, value) VALUES (?1, ?2, ?3)",
            params![document_id, key, value],
        )?;
        Ok(())
    }

    pub fn document_metadata(&self, document_id: &str, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM metadata WHERE document_id = ?1 AND key = ?2",
                params![document_id, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    // --- statistics ---

    pub fn document_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn()?
                .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn page_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Size of the database file in bytes.
    pub fn database_size(&self) -> Result<u64> {
        let path = self
            .path
            .as_ref()
            .ok_or(InkpadError::StorageClosed)?;
        Ok(fs::metadata(path)?.len())
    }

    // --- backup ---

    /// Copies the database file to `backup_path`.
    pub fn create_backup<P: AsRef<Path>>(&self, backup_path: P) -> Result<()> {
        if !self.is_open() {
            return Err(InkpadError::StorageClosed);
        }
        let source = self.path.as_ref().ok_or(InkpadError::StorageClosed)?;
        fs::copy(source, &backup_path)?;
        log::info!("backup written to {}", backup_path.as_ref().display());
        Ok(())
    }

    /// Replaces the database with a backup file and reopens it.
    ///
    /// The backup is validated by staging it next to the live file first;
    /// the live database is only swapped once the copy succeeds, so a bad
    /// backup path cannot destroy existing data.
    pub fn restore_from_backup<P: AsRef<Path>>(&mut self, backup_path: P) -> Result<()> {
        let target = self
            .path
            .clone()
            .ok_or_else(|| InkpadError::InvalidPath("no database to restore into".to_string()))?;
        if !backup_path.as_ref().is_file() {
            return Err(InkpadError::InvalidPath(
                backup_path.as_ref().display().to_string(),
            ));
        }
        let staging = target.with_extension("db.restore");
        fs::copy(&backup_path, &staging)?;
        self.close();
        fs::rename(&staging, &target)?;
        self.initialize(target)
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        // Schema changes for future versions go here, keyed on `version`.
        log::debug!("migrating schema from version {version} to {SCHEMA_VERSION}");
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

/// Parses a stored JSON blob, warning instead of failing on corruption so a
/// single bad row cannot make a whole store unreadable.
fn parse_blob(content: &str, what: &str) -> Option<serde_json::Value> {
    match serde_json::from_str(content) {
        Ok(json) => Some(json),
        Err(err) => {
            log::warn!("discarding malformed stored blob for {what}: {err}");
            None
        }
    }
}

fn format_date(date: chrono::DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn open_storage() -> (Storage, NamedTempFile) {
        let temp = NamedTempFile::new().unwrap();
        let mut storage = Storage::new();
        storage.initialize(temp.path()).unwrap();
        (storage, temp)
    }

    #[test]
    fn test_initialize_creates_tables_and_version() {
        let (storage, _temp) = open_storage();
        let tables: Vec<String> = storage
            .conn()
            .unwrap()
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        for table in ["documents", "pages", "objects", "links", "metadata"] {
            assert!(tables.contains(&table.to_string()), "missing {table}");
        }
        let version: i32 = storage
            .conn()
            .unwrap()
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_keeps_interchange_column_names() {
        // Stores written by other builds of the application are read through
        // these exact column names; they are part of the on-disk format.
        let (storage, _temp) = open_storage();
        let has_column = |table: &str, name: &str| -> bool {
            storage
                .conn()
                .unwrap()
                .query_row(
                    "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                    params![table, name],
                    |row| row.get::<_, i64>(0),
                )
                .unwrap()
                > 0
        };
        assert!(has_column("documents", "data"));
        assert!(has_column("pages", "data"));
        assert!(has_column("objects", "type"));
        assert!(has_column("objects", "data"));
        assert!(has_column("links", "from_page_id"));
        assert!(has_column("links", "to_page_id"));
    }

    #[test]
    fn test_closed_storage_rejects_queries() {
        let storage = Storage::new();
        assert!(!storage.is_open());
        assert!(matches!(
            storage.list_documents(),
            Err(InkpadError::StorageClosed)
        ));
    }

    #[test]
    fn test_save_and_load_document() {
        let (mut storage, _temp) = open_storage();
        let mut doc = Document::with_title("Journal");
        doc.add_tag("daily");
        doc.add_page("Tuesday");
        storage.save_document(&doc).unwrap();

        let loaded = storage.load_document(doc.id()).unwrap();
        assert_eq!(loaded.id(), doc.id());
        assert_eq!(loaded.title(), "Journal");
        assert_eq!(loaded.tags(), doc.tags());
        assert_eq!(loaded.page_count(), 2);
        assert!(!loaded.is_modified());
    }

    #[test]
    fn test_load_unknown_document() {
        let (storage, _temp) = open_storage();
        assert!(matches!(
            storage.load_document("missing"),
            Err(InkpadError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_resave_replaces_pages() {
        let (mut storage, _temp) = open_storage();
        let mut doc = Document::new();
        let extra = doc.add_page("Extra");
        storage.save_document(&doc).unwrap();
        assert_eq!(storage.page_count().unwrap(), 2);

        doc.remove_page(&extra);
        storage.save_document(&doc).unwrap();
        assert_eq!(storage.page_count().unwrap(), 1);
        assert!(matches!(
            storage.load_page(&extra),
            Err(InkpadError::PageNotFound(_))
        ));
    }

    #[test]
    fn test_save_rolls_back_on_page_failure() {
        let (mut storage, _temp) = open_storage();
        let mut doc = Document::with_title("Fragile");
        storage.save_document(&doc).unwrap();

        // Make any further page insert for this document fail mid-transaction.
        storage
            .conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER poison BEFORE INSERT ON pages
                 WHEN NEW.title = 'poison'
                 BEGIN SELECT RAISE(ABORT, 'poisoned'); END",
            )
            .unwrap();
        doc.set_title("Updated");
        doc.add_page("poison");
        assert!(storage.save_document(&doc).is_err());

        // The earlier snapshot must be intact: title unchanged, one page.
        let reloaded = storage.load_document(doc.id()).unwrap();
        assert_eq!(reloaded.title(), "Fragile");
        assert_eq!(reloaded.page_count(), 1);
    }

    #[test]
    fn test_delete_document_removes_pages() {
        let (mut storage, _temp) = open_storage();
        let doc = Document::new();
        storage.save_document(&doc).unwrap();
        storage.delete_document(doc.id()).unwrap();
        assert_eq!(storage.document_count().unwrap(), 0);
        assert_eq!(storage.page_count().unwrap(), 0);
        // Unknown ids are fine.
        storage.delete_document("missing").unwrap();
    }

    #[test]
    fn test_list_and_recent_order_by_modified() {
        let (mut storage, _temp) = open_storage();
        let mut older = Document::with_title("Older");
        let mut newer = Document::with_title("Newer");
        storage.save_document(&older).unwrap();
        storage.save_document(&newer).unwrap();
        // Distinct second-resolution timestamps without sleeping.
        storage
            .conn()
            .unwrap()
            .execute(
                "UPDATE documents SET modified_date = '2020-01-01T00:00:00Z' WHERE id = ?1",
                params![older.id()],
            )
            .unwrap();

        let ids = storage.list_documents().unwrap();
        assert_eq!(ids, vec![newer.id().to_string(), older.id().to_string()]);

        let recent = storage.recent_documents(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, newer.id());
        assert_eq!(recent[0].title, "Newer");

        // Saving again refreshes the projection columns.
        older.set_title("Older Still");
        newer.set_description("touched");
        storage.save_document(&older).unwrap();
        storage.save_document(&newer).unwrap();
        assert_eq!(storage.document_count().unwrap(), 2);
    }

    #[test]
    fn test_search_documents_matches_title_and_content() {
        let (mut storage, _temp) = open_storage();
        let mut hit = Document::with_title("Garden Plan");
        if let Some(page) = hit.current_page_mut() {
            let mut obj = crate::core::object::PageObject::new_text();
            obj.set_text_content("plant tomatoes in May");
            page.add_object(obj);
        }
        let miss = Document::with_title("Taxes");
        storage.save_document(&hit).unwrap();
        storage.save_document(&miss).unwrap();

        assert_eq!(storage.search_documents("garden").unwrap(), vec![hit.id()]);
        assert_eq!(storage.search_documents("tomatoes").unwrap(), vec![hit.id()]);
        assert!(storage.search_documents("absent").unwrap().is_empty());
        assert!(storage.search_documents("").unwrap().is_empty());
    }

    #[test]
    fn test_find_documents_by_tag() {
        let (mut storage, _temp) = open_storage();
        let mut tagged = Document::with_title("A");
        tagged.add_tag("work");
        tagged.add_tag("urgent");
        let untagged = Document::with_title("B");
        storage.save_document(&tagged).unwrap();
        storage.save_document(&untagged).unwrap();

        assert_eq!(
            storage.find_documents_by_tag("work").unwrap(),
            vec![tagged.id()]
        );
        assert!(storage.find_documents_by_tag("home").unwrap().is_empty());
        assert!(storage.find_documents_by_tag("").unwrap().is_empty());
    }

    #[test]
    fn test_page_round_trip() {
        let (mut storage, _temp) = open_storage();
        let doc = Document::new();
        storage.save_document(&doc).unwrap();
        let page = Page::with_title("Standalone");
        storage.save_page(doc.id(), 1, &page).unwrap();

        let loaded = storage.load_page(page.id()).unwrap();
        assert_eq!(loaded.id(), page.id());
        assert_eq!(loaded.title(), "Standalone");

        storage.delete_page(page.id()).unwrap();
        assert!(storage.load_page(page.id()).is_err());
    }

    #[test]
    fn test_corrupt_blob_reads_as_not_found() {
        let (mut storage, _temp) = open_storage();
        let doc = Document::new();
        storage.save_document(&doc).unwrap();
        storage
            .conn()
            .unwrap()
            .execute(
                "UPDATE documents SET data = 'not json' WHERE id = ?1",
                params![doc.id()],
            )
            .unwrap();
        assert!(matches!(
            storage.load_document(doc.id()),
            Err(InkpadError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_document_metadata() {
        let (mut storage, _temp) = open_storage();
        storage
            .set_document_metadata("doc-1", "last_export", "/tmp/out.pdf")
            .unwrap();
        storage
            .set_document_metadata("doc-1", "last_export", "/tmp/out2.pdf")
            .unwrap();
        assert_eq!(
            storage.document_metadata("doc-1", "last_export").unwrap(),
            Some("/tmp/out2.pdf".to_string())
        );
        assert_eq!(storage.document_metadata("doc-1", "missing").unwrap(), None);
    }

    #[test]
    fn test_backup_and_restore() {
        let (mut storage, _temp) = open_storage();
        let keep = Document::with_title("Keep");
        storage.save_document(&keep).unwrap();

        let backup = NamedTempFile::new().unwrap();
        storage.create_backup(backup.path()).unwrap();

        // Diverge, then restore the snapshot.
        let late = Document::with_title("Late");
        storage.save_document(&late).unwrap();
        assert_eq!(storage.document_count().unwrap(), 2);

        storage.restore_from_backup(backup.path()).unwrap();
        assert!(storage.is_open());
        assert_eq!(storage.document_count().unwrap(), 1);
        assert_eq!(storage.load_document(keep.id()).unwrap().title(), "Keep");
    }

    #[test]
    fn test_restore_from_missing_backup_keeps_database() {
        let (mut storage, _temp) = open_storage();
        let doc = Document::new();
        storage.save_document(&doc).unwrap();

        assert!(matches!(
            storage.restore_from_backup("/no/such/backup.db"),
            Err(InkpadError::InvalidPath(_))
        ));
        assert!(storage.is_open());
        assert_eq!(storage.document_count().unwrap(), 1);
    }

    #[test]
    fn test_database_size() {
        let (storage, _temp) = open_storage();
        assert!(storage.database_size().unwrap() > 0);
    }
}

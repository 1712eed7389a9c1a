//! Application-facing coordinator: one open document on top of storage.
//!
//! The shell talks to [`Note`] almost exclusively. Operations that touch
//! storage report failures as [`ChangeEvent::StorageError`] and a `false`
//! or `None` return instead of surfacing `Result`s, so the UI event loop
//! can stay infallible.

use crate::core::document::Document;
use crate::core::error::{InkpadError, Result};
use crate::core::event::{ChangeEvent, EventQueue};
use crate::core::storage::{DocumentSummary, Storage};
use std::path::Path;
use std::time::{Duration, Instant};

/// Lower bound for the auto-save interval.
const MIN_AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(30);

/// The note-taking session: storage plus the currently open document.
#[derive(Debug)]
pub struct Note {
    storage: Storage,
    document: Option<Document>,
    auto_save_enabled: bool,
    auto_save_interval: Duration,
    last_save: Instant,
    events: EventQueue,
}

impl Note {
    pub fn new() -> Self {
        Self {
            storage: Storage::new(),
            document: None,
            auto_save_enabled: true,
            auto_save_interval: DEFAULT_AUTO_SAVE_INTERVAL,
            last_save: Instant::now(),
            events: EventQueue::new(),
        }
    }

    /// Opens storage at an explicit path.
    pub fn open_storage<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.storage.initialize(path)
    }

    /// Opens storage at the platform's default location.
    pub fn open_default_storage(&mut self) -> Result<()> {
        self.storage.initialize_default()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn is_storage_open(&self) -> bool {
        self.storage.is_open()
    }

    /// Closes the storage connection, saving a modified document first.
    /// The document stays open in memory; saves fail until storage is
    /// reopened.
    pub fn close_storage(&mut self) {
        self.stash_current_document();
        self.storage.close();
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Creates a new document, saves it, and makes it current. A modified
    /// predecessor is saved first.
    pub fn create_document(&mut self, title: &str) -> bool {
        self.stash_current_document();
        let document = Document::with_title(title);
        let saved = self.persist(&document);
        self.document = Some(document);
        self.events.push(ChangeEvent::DocumentChanged);
        saved
    }

    /// Loads a document by id and makes it current. A modified predecessor
    /// is saved first.
    pub fn open_document(&mut self, document_id: &str) -> bool {
        match self.storage.load_document(document_id) {
            Ok(document) => {
                self.stash_current_document();
                self.document = Some(document);
                self.last_save = Instant::now();
                self.events.push(ChangeEvent::DocumentChanged);
                true
            }
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    /// Saves the current document and clears its dirty flag.
    pub fn save(&mut self) -> bool {
        let Some(mut document) = self.document.take() else {
            return false;
        };
        let saved = self.persist(&document);
        if saved {
            document.set_modified(false);
            self.last_save = Instant::now();
        }
        self.document = Some(document);
        saved
    }

    /// Saves the current document's content under a new identity and title.
    /// The copy becomes the current document.
    pub fn save_as(&mut self, title: &str) -> bool {
        let Some(document) = &self.document else {
            return false;
        };
        let mut copy = document.duplicate();
        copy.set_title(title);
        copy.take_events();
        let saved = self.persist(&copy);
        if saved {
            copy.set_modified(false);
            self.document = Some(copy);
            self.last_save = Instant::now();
            self.events.push(ChangeEvent::DocumentChanged);
        }
        saved
    }

    /// Closes the current document, saving it first when modified.
    pub fn close_document(&mut self) -> bool {
        if self.document.is_none() {
            return false;
        }
        self.stash_current_document();
        self.document = None;
        self.events.push(ChangeEvent::DocumentChanged);
        true
    }

    /// Deletes a stored document. Deleting the current document closes it
    /// without saving.
    pub fn delete_document(&mut self, document_id: &str) -> bool {
        if self
            .document
            .as_ref()
            .is_some_and(|d| d.id() == document_id)
        {
            self.document = None;
            self.events.push(ChangeEvent::DocumentChanged);
        }
        match self.storage.delete_document(document_id) {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    /// Stores a copy of a document under a fresh identity, returning the
    /// copy's id. The current document is left as is.
    pub fn duplicate_document(&mut self, document_id: &str) -> Option<String> {
        let source = if self
            .document
            .as_ref()
            .is_some_and(|d| d.id() == document_id)
        {
            // Duplicate what the user sees, not the last saved state.
            self.document.as_ref().map(Document::duplicate)
        } else {
            match self.storage.load_document(document_id) {
                Ok(document) => Some(document.duplicate()),
                Err(err) => {
                    self.report(&err);
                    None
                }
            }
        };
        let copy = source?;
        if self.persist(&copy) {
            Some(copy.id().to_string())
        } else {
            None
        }
    }

    // --- auto-save ---

    pub fn auto_save_enabled(&self) -> bool {
        self.auto_save_enabled
    }

    pub fn set_auto_save_enabled(&mut self, enabled: bool) {
        self.auto_save_enabled = enabled;
    }

    pub fn auto_save_interval(&self) -> Duration {
        self.auto_save_interval
    }

    /// Sets the auto-save interval, clamped to at least five seconds.
    pub fn set_auto_save_interval(&mut self, interval: Duration) {
        self.auto_save_interval = interval.max(MIN_AUTO_SAVE_INTERVAL);
    }

    /// Periodic driver called from the shell's timer. Saves the current
    /// document when auto-save is enabled, the document is modified, and the
    /// interval has elapsed.
    pub fn tick(&mut self) -> bool {
        let due = self.auto_save_enabled
            && self
                .document
                .as_ref()
                .is_some_and(Document::is_modified)
            && self.last_save.elapsed() >= self.auto_save_interval;
        if !due {
            return false;
        }
        log::debug!("auto-saving current document");
        self.save()
    }

    // --- queries ---

    pub fn list_documents(&self) -> Result<Vec<String>> {
        self.storage.list_documents()
    }

    pub fn recent_documents(&self, limit: usize) -> Result<Vec<DocumentSummary>> {
        self.storage.recent_documents(limit)
    }

    pub fn search_documents(&self, query: &str) -> Result<Vec<String>> {
        self.storage.search_documents(query)
    }

    pub fn find_documents_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        self.storage.find_documents_by_tag(tag)
    }

    // --- backup ---

    pub fn create_backup<P: AsRef<Path>>(&mut self, backup_path: P) -> bool {
        // Flush the open document so the backup is current.
        if self.document.as_ref().is_some_and(Document::is_modified) {
            self.save();
        }
        match self.storage.create_backup(backup_path) {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    /// Restores the database from a backup. The open document is dropped
    /// without saving, since saving would overwrite the restored state.
    pub fn restore_from_backup<P: AsRef<Path>>(&mut self, backup_path: P) -> bool {
        match self.storage.restore_from_backup(backup_path) {
            Ok(()) => {
                self.document = None;
                self.events.push(ChangeEvent::DocumentChanged);
                true
            }
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    /// Drains pending events from the session and the open document.
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        let mut events = self.events.take();
        if let Some(document) = &mut self.document {
            events.extend(document.take_events());
        }
        events
    }

    /// Saves the current document if it has unsaved changes. Used before
    /// replacing or closing it.
    fn stash_current_document(&mut self) {
        if self.document.as_ref().is_some_and(Document::is_modified) {
            self.save();
        }
    }

    fn persist(&mut self, document: &Document) -> bool {
        match self.storage.save_document(document) {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    fn report(&mut self, err: &InkpadError) {
        log::error!("storage operation failed: {err}");
        self.events.push(ChangeEvent::StorageError(err.user_message()));
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn open_note() -> (Note, NamedTempFile) {
        let temp = NamedTempFile::new().unwrap();
        let mut note = Note::new();
        note.open_storage(temp.path()).unwrap();
        (note, temp)
    }

    #[test]
    fn test_create_document_is_saved_and_current() {
        let (mut note, _temp) = open_note();
        assert!(note.create_document("Ideas"));
        let id = note.document().unwrap().id().to_string();
        assert_eq!(note.list_documents().unwrap(), vec![id]);
    }

    #[test]
    fn test_open_replaces_and_saves_modified_predecessor() {
        let (mut note, _temp) = open_note();
        note.create_document("First");
        let first = note.document().unwrap().id().to_string();
        note.create_document("Second");
        let second = note.document().unwrap().id().to_string();

        note.document_mut().unwrap().set_description("unsaved edit");
        assert!(note.open_document(&first));
        assert_eq!(note.document().unwrap().id(), first);

        // The edit to "Second" was flushed before switching.
        let reloaded = note.storage().load_document(&second).unwrap();
        assert_eq!(reloaded.description(), "unsaved edit");
    }

    #[test]
    fn test_save_clears_dirty_flag() {
        let (mut note, _temp) = open_note();
        note.create_document("Doc");
        note.document_mut().unwrap().set_title("Renamed");
        assert!(note.document().unwrap().is_modified());
        assert!(note.save());
        assert!(!note.document().unwrap().is_modified());
    }

    #[test]
    fn test_save_as_creates_second_document() {
        let (mut note, _temp) = open_note();
        note.create_document("Original");
        let original = note.document().unwrap().id().to_string();
        note.document_mut().unwrap().add_page("Extra");
        assert!(note.save_as("Fork"));

        let fork = note.document().unwrap();
        assert_ne!(fork.id(), original);
        assert_eq!(fork.title(), "Fork");
        assert_eq!(fork.page_count(), 2);
        assert_eq!(note.list_documents().unwrap().len(), 2);
    }

    #[test]
    fn test_close_document_saves_when_modified() {
        let (mut note, _temp) = open_note();
        note.create_document("Doc");
        let id = note.document().unwrap().id().to_string();
        note.document_mut().unwrap().set_description("last words");
        assert!(note.close_document());
        assert!(!note.has_document());
        assert!(!note.close_document(), "nothing left to close");

        let reloaded = note.storage().load_document(&id).unwrap();
        assert_eq!(reloaded.description(), "last words");
    }

    #[test]
    fn test_delete_current_document_closes_it() {
        let (mut note, _temp) = open_note();
        note.create_document("Doomed");
        let id = note.document().unwrap().id().to_string();
        assert!(note.delete_document(&id));
        assert!(!note.has_document());
        assert!(note.list_documents().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_document() {
        let (mut note, _temp) = open_note();
        note.create_document("Source");
        let source = note.document().unwrap().id().to_string();
        let copy = note.duplicate_document(&source).unwrap();
        assert_ne!(copy, source);
        assert_eq!(note.document().unwrap().id(), source, "current unchanged");

        let loaded = note.storage().load_document(&copy).unwrap();
        assert_eq!(loaded.title(), "Source (Copy)");
    }

    #[test]
    fn test_failed_operations_emit_storage_error_events() {
        let mut note = Note::new(); // storage never opened
        assert!(!note.create_document("Orphan"));
        assert!(!note.open_document("missing"));
        let events = note.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, ChangeEvent::StorageError(_))));

        // A failed save must leave the dirty flag raised.
        note.document_mut().unwrap().set_description("unsaved");
        assert!(!note.save());
        assert!(note.document().unwrap().is_modified());
    }

    #[test]
    fn test_close_storage_flushes_and_reopens() {
        let (mut note, temp) = open_note();
        note.create_document("Kept");
        let id = note.document().unwrap().id().to_string();
        note.document_mut().unwrap().set_description("flushed on close");

        note.close_storage();
        assert!(!note.is_storage_open());
        assert!(note.has_document(), "document survives in memory");
        assert!(!note.save(), "saves fail while storage is closed");

        note.open_storage(temp.path()).unwrap();
        let reloaded = note.storage().load_document(&id).unwrap();
        assert_eq!(reloaded.description(), "flushed on close");
    }

    #[test]
    fn test_auto_save_interval_is_clamped() {
        let (mut note, _temp) = open_note();
        note.set_auto_save_interval(Duration::from_secs(1));
        assert_eq!(note.auto_save_interval(), Duration::from_secs(5));
        note.set_auto_save_interval(Duration::from_secs(120));
        assert_eq!(note.auto_save_interval(), Duration::from_secs(120));
    }

    #[test]
    fn test_tick_saves_only_when_due_and_dirty() {
        let (mut note, _temp) = open_note();
        note.create_document("Doc");
        assert!(!note.tick(), "clean document, nothing to save");

        note.document_mut().unwrap().set_description("dirty");
        assert!(!note.tick(), "interval not elapsed yet");

        note.last_save = Instant::now() - Duration::from_secs(600);
        note.set_auto_save_enabled(false);
        assert!(!note.tick(), "auto-save disabled");

        note.set_auto_save_enabled(true);
        assert!(note.tick());
        assert!(!note.document().unwrap().is_modified());
    }

    #[test]
    fn test_backup_flushes_and_restore_drops_open_document() {
        let (mut note, _temp) = open_note();
        note.create_document("Snapshot");
        note.document_mut().unwrap().set_description("in backup");
        let backup = NamedTempFile::new().unwrap();
        assert!(note.create_backup(backup.path()));

        note.create_document("After");
        assert!(note.restore_from_backup(backup.path()));
        assert!(!note.has_document());
        assert_eq!(note.list_documents().unwrap().len(), 1);
    }
}

//! A document: an ordered collection of pages plus notebook metadata.

use crate::core::event::{ChangeEvent, EventQueue};
use crate::core::object::{ObjectType, PageObject};
use crate::core::page::Page;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A notebook document.
///
/// Always holds at least one page while in use: a fresh document creates
/// "Page 1", and removing the last page immediately replaces it. The current
/// page is tracked by id so page reordering cannot invalidate it.
#[derive(Debug)]
pub struct Document {
    id: String,
    title: String,
    description: String,
    created_date: DateTime<Utc>,
    modified_date: DateTime<Utc>,
    tags: Vec<String>,
    pages: Vec<Page>,
    current_page_id: Option<String>,
    /// Outgoing links per page id. Kept ordered so serialization is stable.
    links: BTreeMap<String, Vec<String>>,
    modified: bool,
    events: EventQueue,
}

impl Document {
    pub fn new() -> Self {
        Self::with_title("Untitled Document")
    }

    pub fn with_title(title: &str) -> Self {
        let now = Utc::now();
        let first_page = Page::with_title("Page 1");
        let first_id = first_page.id().to_string();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: String::new(),
            created_date: now,
            modified_date: now,
            tags: Vec::new(),
            pages: vec![first_page],
            current_page_id: Some(first_id),
            links: BTreeMap::new(),
            modified: false,
            events: EventQueue::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title.to_string();
        self.mark_modified();
        true
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) -> bool {
        if self.description == description {
            return false;
        }
        self.description = description.to_string();
        self.mark_modified();
        true
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn modified_date(&self) -> DateTime<Utc> {
        self.modified_date
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears or raises the dirty flag without touching the modified date.
    /// Used after save and load.
    pub fn set_modified(&mut self, modified: bool) {
        if self.modified != modified {
            self.modified = modified;
            self.events.push(ChangeEvent::ModifiedChanged(modified));
        }
    }

    /// Records a content change: refreshes the modified date and raises the
    /// dirty flag, emitting [`ChangeEvent::ModifiedChanged`] on the
    /// false-to-true transition only.
    pub fn mark_modified(&mut self) {
        self.modified_date = Utc::now();
        self.events.push(ChangeEvent::DocumentChanged);
        if !self.modified {
            self.modified = true;
            self.events.push(ChangeEvent::ModifiedChanged(true));
        }
    }

    // --- pages ---

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == page_id)
    }

    /// Mutable page access.
    ///
    /// Counts as a content change even when the caller only reads: the
    /// document cannot observe what happens through the returned reference,
    /// so the dirty flag over-approximates rather than miss an edit. Use
    /// [`Document::page`] for read-only access.
    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        let index = self.pages.iter().position(|p| p.id() == page_id)?;
        self.mark_modified();
        self.pages.get_mut(index)
    }

    pub fn page_at(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == page_id)
    }

    /// Appends a new page and returns its id. The current page is left
    /// alone unless none is set; switching to the new page is the caller's
    /// decision via [`Document::set_current_page`].
    pub fn add_page(&mut self, title: &str) -> String {
        let page = Page::with_title(title);
        let id = page.id().to_string();
        self.pages.push(page);
        if self.current_page_id.is_none() {
            self.current_page_id = Some(id.clone());
        }
        self.mark_modified();
        id
    }

    /// Inserts a new page at `index` (clamped to the end). Current-page
    /// handling matches [`Document::add_page`].
    pub fn insert_page(&mut self, index: usize, title: &str) -> String {
        let page = Page::with_title(title);
        let id = page.id().to_string();
        self.pages.insert(index.min(self.pages.len()), page);
        if self.current_page_id.is_none() {
            self.current_page_id = Some(id.clone());
        }
        self.mark_modified();
        id
    }

    /// Removes a page by id, returning it. If it was the current page, the
    /// page before it (or the new first page) becomes current. Removing the
    /// last remaining page leaves the document with a fresh "Page 1".
    pub fn remove_page(&mut self, page_id: &str) -> Option<Page> {
        let index = self.page_index(page_id)?;
        let removed = self.pages.remove(index);
        self.links.remove(page_id);
        for targets in self.links.values_mut() {
            targets.retain(|t| t != page_id);
        }
        self.links.retain(|_, targets| !targets.is_empty());
        if self.pages.is_empty() {
            let replacement = Page::with_title("Page 1");
            self.current_page_id = Some(replacement.id().to_string());
            self.pages.push(replacement);
        } else if self.current_page_id.as_deref() == Some(page_id) {
            let neighbor = index.saturating_sub(1);
            self.current_page_id = Some(self.pages[neighbor].id().to_string());
        }
        self.mark_modified();
        Some(removed)
    }

    /// Moves a page to a new index, preserving the order of the others.
    pub fn move_page(&mut self, page_id: &str, to: usize) -> bool {
        let Some(from) = self.page_index(page_id) else {
            return false;
        };
        let to = to.min(self.pages.len() - 1);
        if from == to {
            return false;
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.mark_modified();
        true
    }

    /// Deep-copies a page, titles the copy "<title> (Copy)", and inserts it
    /// directly after the original. The copy becomes current.
    pub fn duplicate_page(&mut self, page_id: &str) -> Option<String> {
        let index = self.page_index(page_id)?;
        let mut copy = self.pages[index].duplicate();
        copy.set_title(&format!("{} (Copy)", self.pages[index].title()));
        copy.take_events();
        let copy_id = copy.id().to_string();
        self.pages.insert(index + 1, copy);
        self.current_page_id = Some(copy_id.clone());
        self.mark_modified();
        Some(copy_id)
    }

    pub fn current_page(&self) -> Option<&Page> {
        let id = self.current_page_id.as_deref()?;
        self.page(id)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        let id = self.current_page_id.clone()?;
        self.page_mut(&id)
    }

    pub fn current_page_id(&self) -> Option<&str> {
        self.current_page_id.as_deref()
    }

    /// Switches the current page. Unknown ids are rejected.
    pub fn set_current_page(&mut self, page_id: &str) -> bool {
        if self.current_page_id.as_deref() == Some(page_id) || self.page(page_id).is_none() {
            return false;
        }
        self.current_page_id = Some(page_id.to_string());
        self.events.push(ChangeEvent::PageChanged {
            page_id: page_id.to_string(),
        });
        true
    }

    // --- tags ---

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Adds a tag. Already-present tags are a no-op.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.mark_modified();
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        if self.tags.len() == before {
            return false;
        }
        self.mark_modified();
        true
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    // --- links ---

    /// Records a directed link between two pages of this document. Both
    /// ends must exist; duplicate links are a no-op.
    pub fn add_link(&mut self, from_page: &str, to_page: &str) -> bool {
        if self.page(from_page).is_none() || self.page(to_page).is_none() {
            return false;
        }
        let targets = self.links.entry(from_page.to_string()).or_default();
        if targets.iter().any(|t| t == to_page) {
            return false;
        }
        targets.push(to_page.to_string());
        self.mark_modified();
        true
    }

    pub fn remove_link(&mut self, from_page: &str, to_page: &str) -> bool {
        let Some(targets) = self.links.get_mut(from_page) else {
            return false;
        };
        let before = targets.len();
        targets.retain(|t| t != to_page);
        if targets.len() == before {
            return false;
        }
        if targets.is_empty() {
            self.links.remove(from_page);
        }
        self.mark_modified();
        true
    }

    /// Pages this page links to, in insertion order.
    pub fn links_from(&self, page_id: &str) -> &[String] {
        self.links.get(page_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pages linking to this page. Computed by scanning the link table.
    pub fn backlinks_to(&self, page_id: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|(_, targets)| targets.iter().any(|t| t == page_id))
            .map(|(from, _)| from.as_str())
            .collect()
    }

    // --- search ---

    /// Pages whose title contains `query` or which hold a matching text
    /// object. Case-insensitive; an empty query matches nothing.
    pub fn search_pages(&self, query: &str) -> Vec<&Page> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.pages
            .iter()
            .filter(|p| {
                p.title().to_lowercase().contains(&needle)
                    || !p.find_objects_containing(query).is_empty()
            })
            .collect()
    }

    /// Text objects across all pages whose content matches `query`, paired
    /// with their page id.
    pub fn search_objects(&self, query: &str) -> Vec<(&str, &PageObject)> {
        let mut hits = Vec::new();
        for page in &self.pages {
            for object in page.find_objects_containing(query) {
                hits.push((page.id(), object));
            }
        }
        hits
    }

    /// Pages whose title contains `tag` as a substring, case-insensitively.
    pub fn find_pages_by_tag(&self, tag: &str) -> Vec<&Page> {
        if tag.is_empty() {
            return Vec::new();
        }
        let needle = tag.to_lowercase();
        self.pages
            .iter()
            .filter(|p| p.title().to_lowercase().contains(&needle))
            .collect()
    }

    pub fn find_objects_by_type(&self, object_type: ObjectType) -> Vec<(&str, &PageObject)> {
        let mut hits = Vec::new();
        for page in &self.pages {
            for object in page.find_objects_by_type(object_type) {
                hits.push((page.id(), object));
            }
        }
        hits
    }

    // --- serialization ---

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("title".to_string(), Value::from(self.title.clone()));
        map.insert(
            "description".to_string(),
            Value::from(self.description.clone()),
        );
        map.insert(
            "createdDate".to_string(),
            Value::from(format_date(self.created_date)),
        );
        map.insert(
            "modifiedDate".to_string(),
            Value::from(format_date(self.modified_date)),
        );
        map.insert(
            "tags".to_string(),
            Value::Array(self.tags.iter().cloned().map(Value::from).collect()),
        );
        let pages: Vec<Value> = self.pages.iter().map(Page::to_json).collect();
        map.insert("pages".to_string(), Value::Array(pages));
        if let Some(current) = &self.current_page_id {
            map.insert("currentPage".to_string(), Value::from(current.clone()));
        }
        let links: Map<String, Value> = self
            .links
            .iter()
            .map(|(from, targets)| {
                (
                    from.clone(),
                    Value::Array(targets.iter().cloned().map(Value::from).collect()),
                )
            })
            .collect();
        map.insert("links".to_string(), Value::Object(links));
        Value::Object(map)
    }

    /// Reconstructs a document from its serialized form. Unparseable dates
    /// fall back to now; a document with no pages gets "Page 1". The result
    /// starts clean.
    pub fn from_json(json: &Value) -> Document {
        let mut pages = Vec::new();
        if let Some(values) = json.get("pages").and_then(Value::as_array) {
            for value in values {
                pages.push(Page::from_json(value));
            }
        }
        if pages.is_empty() {
            pages.push(Page::with_title("Page 1"));
        }
        let current_page_id = json
            .get("currentPage")
            .and_then(Value::as_str)
            .filter(|id| pages.iter().any(|p| p.id() == *id))
            .map(str::to_string)
            .or_else(|| Some(pages[0].id().to_string()));
        let mut links = BTreeMap::new();
        if let Some(table) = json.get("links").and_then(Value::as_object) {
            for (from, targets) in table {
                let targets: Vec<String> = targets
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                if !targets.is_empty() {
                    links.insert(from.clone(), targets);
                }
            }
        }
        Document {
            id: match json.get("id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => Uuid::new_v4().to_string(),
            },
            title: json
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("Untitled Document")
                .to_string(),
            description: json
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            created_date: parse_date(json.get("createdDate")),
            modified_date: parse_date(json.get("modifiedDate")),
            tags: json
                .get("tags")
                .and_then(Value::as_array)
                .map(|a| {
                    a.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            pages,
            current_page_id,
            links,
            modified: false,
            events: EventQueue::new(),
        }
    }

    /// Deep copy with fresh document and page identities, titled
    /// "<title> (Copy)". Links are dropped since they name the old page ids.
    pub fn duplicate(&self) -> Document {
        let mut copy = Document::from_json(&self.to_json());
        copy.id = Uuid::new_v4().to_string();
        copy.title = format!("{} (Copy)", self.title);
        copy.links.clear();
        let mut fresh_current = None;
        for (index, page) in copy.pages.iter_mut().enumerate() {
            let refreshed = page.duplicate();
            if Some(index) == self.current_index() {
                fresh_current = Some(refreshed.id().to_string());
            }
            *page = refreshed;
        }
        copy.current_page_id = fresh_current.or_else(|| copy.pages.first().map(|p| p.id().to_string()));
        copy
    }

    fn current_index(&self) -> Option<usize> {
        let id = self.current_page_id.as_deref()?;
        self.page_index(id)
    }

    /// Drains pending events from the document and all of its pages.
    /// Document-level events come first, then page events in page order.
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        let mut events = self.events.take();
        for page in &mut self.pages {
            events.extend(page.take_events());
        }
        events
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_date(value: Option<&Value>) -> DateTime<Utc> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

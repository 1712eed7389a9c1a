//! A freeform page: an ordered, layer-sorted collection of objects.

use crate::core::color::Color;
use crate::core::event::{ChangeEvent, EventQueue};
use crate::core::geometry::{Point, Rect, Size};
use crate::core::object::{ObjectType, PageObject};
use crate::core::render::Painter;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Offset applied to duplicated objects so copies do not land exactly on
/// top of their originals.
const DUPLICATE_OFFSET: Point = Point::new(20, 20);

/// A page canvas owning its objects.
///
/// The collection is kept sorted by layer (stable, so equal layers keep
/// insertion order) after every mutation that changes layering or
/// membership. Hit-testing walks the collection from the top down; painting
/// walks it bottom-up so higher layers occlude lower ones.
#[derive(Debug)]
pub struct Page {
    id: String,
    title: String,
    size: Size,
    background_color: Color,
    objects: Vec<PageObject>,
    events: EventQueue,
}

impl Page {
    pub fn new() -> Self {
        Self::with_title("Untitled Page")
    }

    pub fn with_title(title: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            size: Size::new(800, 600),
            background_color: Color::WHITE,
            objects: Vec::new(),
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
        self.push_page_changed();
        true
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) -> bool {
        if self.size == size {
            return false;
        }
        self.size = size;
        self.push_page_changed();
        true
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) -> bool {
        if self.background_color == color {
            return false;
        }
        self.background_color = color;
        self.push_page_changed();
        true
    }

    pub fn objects(&self) -> &[PageObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Adds an object and returns its id. The collection is re-sorted so
    /// the object lands at the position its layer dictates.
    pub fn add_object(&mut self, object: PageObject) -> String {
        let object_id = object.id().to_string();
        self.objects.push(object);
        self.sort_objects_by_layer();
        self.events.push(ChangeEvent::ObjectAdded {
            page_id: self.id.clone(),
            object_id: object_id.clone(),
        });
        object_id
    }

    /// Removes an object by id, returning it. Unknown ids are a no-op.
    pub fn remove_object(&mut self, object_id: &str) -> Option<PageObject> {
        let index = self.objects.iter().position(|o| o.id() == object_id)?;
        Some(self.remove_object_at(index))
    }

    fn remove_object_at(&mut self, index: usize) -> PageObject {
        let object = self.objects.remove(index);
        self.events.push(ChangeEvent::ObjectRemoved {
            page_id: self.id.clone(),
            object_id: object.id().to_string(),
        });
        object
    }

    pub fn clear_objects(&mut self) {
        for object in self.objects.drain(..) {
            self.events.push(ChangeEvent::ObjectRemoved {
                page_id: self.id.clone(),
                object_id: object.id().to_string(),
            });
        }
    }

    pub fn object(&self, object_id: &str) -> Option<&PageObject> {
        self.objects.iter().find(|o| o.id() == object_id)
    }

    /// Mutable access to one object.
    ///
    /// Handing out `&mut` counts as a mutation even when the caller only
    /// reads: a page-changed event is queued up front, since the page cannot
    /// observe what happens through the returned reference. Use
    /// [`Page::object`] for read-only access. Callers changing the layer
    /// directly must re-sort via [`Page::set_object_layer`].
    pub fn object_mut(&mut self, object_id: &str) -> Option<&mut PageObject> {
        let index = self.objects.iter().position(|o| o.id() == object_id)?;
        self.push_page_changed();
        self.objects.get_mut(index)
    }

    /// The topmost visible object containing `point`.
    pub fn object_at(&self, point: Point) -> Option<&PageObject> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.is_visible() && o.contains(point))
    }

    /// All visible objects intersecting `rect`, in no particular order.
    pub fn objects_in_rect(&self, rect: &Rect) -> Vec<&PageObject> {
        self.objects
            .iter()
            .filter(|o| o.is_visible() && o.intersects(rect))
            .collect()
    }

    pub fn selected_objects(&self) -> Vec<&PageObject> {
        self.objects.iter().filter(|o| o.is_selected()).collect()
    }

    pub fn select_object(&mut self, object_id: &str) {
        self.set_object_selected(object_id, true);
    }

    pub fn deselect_object(&mut self, object_id: &str) {
        self.set_object_selected(object_id, false);
    }

    fn set_object_selected(&mut self, object_id: &str, selected: bool) {
        let changed = self
            .objects
            .iter_mut()
            .find(|o| o.id() == object_id)
            .map(|o| o.set_selected(selected))
            .unwrap_or(false);
        if changed {
            self.push_selection_changed();
        }
    }

    /// Additively selects every visible object intersecting `rect`. Callers
    /// wanting an exclusive marquee clear the selection first.
    pub fn select_objects_in_rect(&mut self, rect: &Rect) {
        let mut changed = false;
        for object in &mut self.objects {
            if object.is_visible() && object.intersects(rect) {
                changed |= object.set_selected(true);
            }
        }
        if changed {
            self.push_selection_changed();
        }
    }

    pub fn clear_selection(&mut self) {
        let mut changed = false;
        for object in &mut self.objects {
            changed |= object.set_selected(false);
        }
        if changed {
            self.push_selection_changed();
        }
    }

    /// Selects every visible object.
    pub fn select_all(&mut self) {
        let mut changed = false;
        for object in &mut self.objects {
            if object.is_visible() {
                changed |= object.set_selected(true);
            }
        }
        if changed {
            self.push_selection_changed();
        }
    }

    /// Translates every selected object by the same delta.
    pub fn move_selected_objects(&mut self, delta: Point) {
        let mut moved = false;
        for object in &mut self.objects {
            if object.is_selected() {
                moved |= object.move_by(delta);
            }
        }
        if moved {
            self.push_page_changed();
        }
    }

    /// Removes every selected object, iterating in reverse so removals
    /// cannot shift indices still to be visited.
    pub fn delete_selected_objects(&mut self) {
        for index in (0..self.objects.len()).rev() {
            if self.objects[index].is_selected() {
                self.remove_object_at(index);
            }
        }
    }

    /// Clones every selected object, offsets the copies, and selects them
    /// in place of the originals.
    pub fn duplicate_selected_objects(&mut self) {
        let mut copies: Vec<PageObject> = self
            .objects
            .iter()
            .filter(|o| o.is_selected())
            .map(PageObject::duplicate)
            .collect();
        if copies.is_empty() {
            return;
        }
        self.clear_selection();
        for copy in &mut copies {
            copy.move_by(DUPLICATE_OFFSET);
            copy.set_selected(true);
        }
        for copy in copies {
            self.add_object(copy);
        }
        self.push_selection_changed();
    }

    pub fn bring_to_front(&mut self, object_id: &str) {
        let Some(index) = self.index_of(object_id) else {
            return;
        };
        let top = self.objects.len() - 1;
        let mut object = self.objects.remove(index);
        object.set_layer(top as i32);
        self.objects.push(object);
        self.sort_objects_by_layer();
        self.push_page_changed();
    }

    pub fn send_to_back(&mut self, object_id: &str) {
        let Some(index) = self.index_of(object_id) else {
            return;
        };
        let mut object = self.objects.remove(index);
        object.set_layer(0);
        self.objects.insert(0, object);
        self.sort_objects_by_layer();
        self.push_page_changed();
    }

    /// Moves the object one position up. No-op on the topmost object.
    pub fn bring_forward(&mut self, object_id: &str) {
        let Some(index) = self.index_of(object_id) else {
            return;
        };
        if index + 1 >= self.objects.len() {
            return;
        }
        self.objects.swap(index, index + 1);
        self.objects[index + 1].set_layer(index as i32 + 1);
        self.sort_objects_by_layer();
        self.push_page_changed();
    }

    /// Moves the object one position down. No-op on the bottommost object.
    pub fn send_backward(&mut self, object_id: &str) {
        let Some(index) = self.index_of(object_id) else {
            return;
        };
        if index == 0 {
            return;
        }
        self.objects.swap(index, index - 1);
        self.objects[index - 1].set_layer(index as i32 - 1);
        self.sort_objects_by_layer();
        self.push_page_changed();
    }

    /// Assigns an explicit layer value and re-sorts.
    pub fn set_object_layer(&mut self, object_id: &str, layer: i32) {
        let changed = self
            .objects
            .iter_mut()
            .find(|o| o.id() == object_id)
            .map(|o| o.set_layer(layer))
            .unwrap_or(false);
        if changed {
            self.sort_objects_by_layer();
            self.push_page_changed();
        }
    }

    /// Background fill, then every visible object in ascending layer order.
    pub fn paint(&self, painter: &mut dyn Painter, viewport: Rect) {
        painter.fill_rect(
            Rect::from_position_size(Point::default(), self.size),
            self.background_color,
        );
        for object in &self.objects {
            object.paint(painter, viewport);
        }
    }

    pub fn find_objects_by_type(&self, object_type: ObjectType) -> Vec<&PageObject> {
        self.objects
            .iter()
            .filter(|o| o.object_type() == object_type)
            .collect()
    }

    /// Text objects whose content contains `text`, case-insensitively.
    pub fn find_objects_containing(&self, text: &str) -> Vec<&PageObject> {
        self.objects
            .iter()
            .filter(|o| o.as_text().is_some_and(|t| t.matches(text)))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("title".to_string(), Value::from(self.title.clone()));
        map.insert(
            "size".to_string(),
            serde_json::json!({ "width": self.size.width, "height": self.size.height }),
        );
        map.insert(
            "backgroundColor".to_string(),
            Value::from(self.background_color.to_hex()),
        );
        let objects: Vec<Value> = self.objects.iter().map(PageObject::to_json).collect();
        map.insert("objects".to_string(), Value::Array(objects));
        Value::Object(map)
    }

    /// Reconstructs a page from its serialized form. Objects with unknown
    /// or unimplemented type tags are skipped, not errors.
    pub fn from_json(json: &Value) -> Page {
        let mut page = Page {
            id: match json.get("id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => Uuid::new_v4().to_string(),
            },
            title: json
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            size: Size::from_json(json.get("size")),
            background_color: json
                .get("backgroundColor")
                .and_then(Value::as_str)
                .map(Color::from_hex_lossy)
                .unwrap_or(Color::WHITE),
            objects: Vec::new(),
            events: EventQueue::new(),
        };
        if let Some(objects) = json.get("objects").and_then(Value::as_array) {
            for value in objects {
                match PageObject::from_json(value) {
                    Some(object) => page.objects.push(object),
                    None => log::warn!(
                        "skipping object with unsupported type tag {:?} on page {}",
                        value.get("type"),
                        page.id
                    ),
                }
            }
        }
        page.sort_objects_by_layer();
        page
    }

    /// Deep copy with a fresh page identity. Object ids within the copy are
    /// preserved; they only need to be unique within their owning page.
    pub fn duplicate(&self) -> Page {
        let mut copy = Page::from_json(&self.to_json());
        copy.id = Uuid::new_v4().to_string();
        copy
    }

    /// Drains pending change events, oldest first.
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        self.events.take()
    }

    fn index_of(&self, object_id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == object_id)
    }

    fn sort_objects_by_layer(&mut self) {
        self.objects.sort_by_key(PageObject::layer);
    }

    fn push_page_changed(&mut self) {
        self.events.push(ChangeEvent::PageChanged {
            page_id: self.id.clone(),
        });
    }

    fn push_selection_changed(&mut self) {
        self.events.push(ChangeEvent::SelectionChanged {
            page_id: self.id.clone(),
        });
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

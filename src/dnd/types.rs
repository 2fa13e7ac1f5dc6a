//! Type definitions for the drag-and-drop controller

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Payload in transit during a pointer or touch drag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragItem<T> {
    pub id: String,
    /// Capability tag checked against a zone's `accepts`
    #[serde(rename = "type")]
    pub item_type: String,
    pub data: T,
}

impl<T> DragItem<T> {
    pub fn new(id: impl Into<String>, item_type: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
            data,
        }
    }
}

/// Invoked with the dropped item and the target position, if any
pub type DropHandler<'a, T> = Box<dyn FnMut(&DragItem<T>, Option<usize>) + 'a>;

/// A named target that accepts items of specific capability tags
pub struct DropZone<'a, T> {
    pub id: String,
    pub accepts: Vec<String>,
    on_drop: DropHandler<'a, T>,
}

impl<T> std::fmt::Debug for DropZone<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropZone")
            .field("id", &self.id)
            .field("accepts", &self.accepts)
            .finish_non_exhaustive()
    }
}

impl<'a, T> DropZone<'a, T> {
    pub fn new<I, S, F>(id: impl Into<String>, accepts: I, on_drop: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&DragItem<T>, Option<usize>) + 'a,
    {
        Self {
            id: id.into(),
            accepts: accepts.into_iter().map(Into::into).collect(),
            on_drop: Box::new(on_drop),
        }
    }

    pub fn accepts(&self, item_type: &str) -> bool {
        self.accepts.iter().any(|t| t == item_type)
    }

    pub(crate) fn drop_item(&mut self, item: &DragItem<T>, index: Option<usize>) {
        (self.on_drop)(item, index);
    }
}

/// Interaction state. `is_dragging` is derived from the dragged item so the
/// two can never disagree; it is still written out as `isDragging`.
#[derive(Debug, Clone, PartialEq)]
pub struct DragAndDropState<T> {
    pub(crate) dragged_item: Option<DragItem<T>>,
    pub(crate) dragged_over_zone: Option<String>,
    pub(crate) dragged_over_index: Option<usize>,
}

impl<T> Default for DragAndDropState<T> {
    fn default() -> Self {
        Self {
            dragged_item: None,
            dragged_over_zone: None,
            dragged_over_index: None,
        }
    }
}

impl<T: Serialize> Serialize for DragAndDropState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DragAndDropState", 4)?;
        state.serialize_field("isDragging", &self.is_dragging())?;
        state.serialize_field("draggedItem", &self.dragged_item)?;
        state.serialize_field("draggedOverZone", &self.dragged_over_zone)?;
        state.serialize_field("draggedOverIndex", &self.dragged_over_index)?;
        state.end()
    }
}

impl<T> DragAndDropState<T> {
    pub fn is_dragging(&self) -> bool {
        self.dragged_item.is_some()
    }

    pub fn dragged_item(&self) -> Option<&DragItem<T>> {
        self.dragged_item.as_ref()
    }

    pub fn dragged_over_zone(&self) -> Option<&str> {
        self.dragged_over_zone.as_deref()
    }

    pub fn dragged_over_index(&self) -> Option<usize> {
        self.dragged_over_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of a rendered drop zone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// True only when `point` lies strictly outside; the edges count as inside
    pub fn is_outside(&self, point: Point) -> bool {
        point.x < self.left || point.x > self.right || point.y < self.top || point.y > self.bottom
    }
}

/// Pointer event as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: Point,
    default_prevented: bool,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Touch event for the primary touch point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchEvent {
    pub point: Point,
    default_prevented: bool,
}

impl TouchEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            default_prevented: false,
        }
    }

    /// Suppress scrolling for this touch
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Floating visual stand-in that follows a touch drag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragProxy {
    pub item_id: String,
    pub position: Point,
}

//! The bounded, ordered list of drawn boxes and the drag gesture that creates them.

use tracing::{debug, trace};

use crate::geometry::{screen_rect_to_image_box, Geometry, ImageFrame, ScreenPoint, ScreenRect};

/// Boxes held at once; the oldest is evicted beyond this.
pub const MAX_BOXES: usize = 20;

/// Drags narrower or shorter than this (screen pixels) are discarded.
pub const MIN_DRAG_SIZE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionBox {
    pub id: u32,
    pub geometry: Geometry,
}

/// Change notifications, drained by the UI once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Added(u32),
    Evicted(u32),
    Removed(u32),
    Cleared,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    start: ScreenPoint,
    rect: ScreenRect,
}

#[derive(Debug)]
pub struct BoxStore {
    boxes: Vec<SelectionBox>,
    next_id: u32,
    drag: Option<Drag>,
    events: Vec<StoreEvent>,
}

impl Default for BoxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxStore {
    pub fn new() -> Self {
        Self {
            boxes: Vec::with_capacity(MAX_BOXES + 1),
            next_id: 1,
            drag: None,
            events: Vec::new(),
        }
    }

    // ── Drag gesture ────────────────────────────────────────────────────────

    pub fn start_drag(&mut self, point: ScreenPoint) {
        trace!("drag start at ({:.1}, {:.1})", point.x, point.y);
        self.drag = Some(Drag {
            start: point,
            rect: ScreenRect::new(point.x, point.y, 0.0, 0.0),
        });
    }

    /// Clamp `point` into `bounds` and stretch the pending rect to it.
    pub fn update_drag(&mut self, point: ScreenPoint, bounds: ScreenRect) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let current = bounds.clamp(point);
        drag.rect = ScreenRect::from_corners(drag.start, current);
    }

    /// Turn the pending drag into a stored box. Returns the new id, or `None` if the
    /// drag was too small, there was no drag, or no image is loaded.
    pub fn finalize_drag(&mut self, frame: ImageFrame) -> Option<u32> {
        let drag = self.drag.take()?;
        let rect = drag.rect;
        if rect.width < MIN_DRAG_SIZE || rect.height < MIN_DRAG_SIZE {
            debug!(
                "discarding drag of {:.1}x{:.1} px",
                rect.width, rect.height
            );
            return None;
        }
        let geometry = screen_rect_to_image_box(rect, frame.displayed, frame.original)?;
        Some(self.push(geometry))
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Screen rect of the drag in progress, for the preview.
    pub fn pending_rect(&self) -> Option<ScreenRect> {
        self.drag.map(|d| d.rect)
    }

    // ── Mutation ────────────────────────────────────────────────────────────

    fn push(&mut self, geometry: Geometry) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.boxes.push(SelectionBox { id, geometry });
        self.events.push(StoreEvent::Added(id));

        while self.boxes.len() > MAX_BOXES {
            let evicted = self.boxes.remove(0);
            debug!("store full, evicting box {}", evicted.id);
            self.events.push(StoreEvent::Evicted(evicted.id));
        }
        id
    }

    /// Delete a box by id. Unknown ids are ignored.
    pub fn remove(&mut self, id: u32) -> bool {
        let Some(index) = self.boxes.iter().position(|b| b.id == id) else {
            return false;
        };
        self.boxes.remove(index);
        self.events.push(StoreEvent::Removed(id));
        true
    }

    pub fn clear_all(&mut self) {
        self.boxes.clear();
        self.next_id = 1;
        self.events.push(StoreEvent::Cleared);
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn list(&self) -> &[SelectionBox] {
        &self.boxes
    }

    pub fn get(&self, id: u32) -> Option<&SelectionBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Id the next finalized box will get.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }
}

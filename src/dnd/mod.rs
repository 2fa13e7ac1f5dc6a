//! Reorderable collection controller.
//!
//! A generic drag state machine shared by pointer and touch input:
//!
//! ```text
//! idle --start--> dragging --over--> dragging(over target)
//!                    ^                    |
//!                    +-------leave--------+
//! dragging --drop / end--> idle
//! ```
//!
//! Drops are gated by capability tags: a zone's handler only runs when the
//! item's type is in the zone's `accepts`. Mismatches are silent no-ops.
//! The touch path owns a floating [`DragProxy`] that is removed whenever the
//! drag ends.

pub mod list_ops;
pub mod registry;
pub mod sortable;
pub mod types;

pub use list_ops::{move_item_between_arrays, reorder_array, MovedItems};
pub use registry::{HitTarget, HitTest, ZoneRegistry};
pub use sortable::{SortableItem, SortableList};
pub use types::*;

/// Whether `zone` would accept `item`. Pure; use it for hover affordances.
pub fn can_drop<T>(item: &DragItem<T>, zone: &DropZone<'_, T>) -> bool {
    zone.accepts(&item.item_type)
}

/// Drag and touch state for one draggable collection
#[derive(Debug)]
pub struct DragAndDrop<T> {
    state: DragAndDropState<T>,
    proxy: Option<DragProxy>,
}

impl<T> Default for DragAndDrop<T> {
    fn default() -> Self {
        Self {
            state: DragAndDropState::default(),
            proxy: None,
        }
    }
}

impl<T> DragAndDrop<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragAndDropState<T> {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn dragged_item(&self) -> Option<&DragItem<T>> {
        self.state.dragged_item()
    }

    /// The floating touch proxy, present only during a touch drag that has moved
    pub fn proxy(&self) -> Option<&DragProxy> {
        self.proxy.as_ref()
    }

    pub fn can_drop(&self, item: &DragItem<T>, zone: &DropZone<'_, T>) -> bool {
        can_drop(item, zone)
    }

    // ─── Pointer path ───────────────────────────────────────────────────────

    pub fn handle_drag_start(&mut self, item: DragItem<T>) {
        tracing::trace!(item = %item.id, kind = %item.item_type, "drag start");
        self.state.dragged_item = Some(item);
        self.state.dragged_over_zone = None;
        self.state.dragged_over_index = None;
        self.proxy = None;
    }

    /// Record the zone under the pointer. Always prevents the default so the
    /// platform allows a drop; ignored when nothing is being dragged.
    pub fn handle_drag_over(
        &mut self,
        event: &mut PointerEvent,
        zone_id: &str,
        index: Option<usize>,
    ) {
        event.prevent_default();
        if !self.is_dragging() {
            return;
        }
        self.state.dragged_over_zone = Some(zone_id.to_string());
        self.state.dragged_over_index = index;
    }

    /// Clear the over-target only once the pointer is strictly outside the
    /// zone, so crossing into child elements does not flicker
    pub fn handle_drag_leave(&mut self, event: &PointerEvent, zone_bounds: Rect) {
        if zone_bounds.is_outside(event.position) {
            self.state.dragged_over_zone = None;
            self.state.dragged_over_index = None;
        }
    }

    /// Drop onto `zone`. Returns whether the zone accepted the item.
    /// The drag ends either way.
    pub fn handle_drop(
        &mut self,
        event: &mut PointerEvent,
        zone: &mut DropZone<'_, T>,
        index: Option<usize>,
    ) -> bool {
        event.prevent_default();
        let accepted = self.drop_into(zone, index);
        self.handle_drag_end();
        accepted
    }

    /// Unconditional cleanup back to idle
    pub fn handle_drag_end(&mut self) {
        if self.is_dragging() {
            tracing::trace!("drag end");
        }
        self.state = DragAndDropState::default();
        self.proxy = None;
    }

    // ─── Touch path ─────────────────────────────────────────────────────────

    pub fn handle_touch_start(&mut self, item: DragItem<T>, _event: &TouchEvent) {
        self.handle_drag_start(item);
    }

    /// Suppress scrolling, move the proxy to the touch point and track the
    /// zone under it
    pub fn handle_touch_move<H>(&mut self, event: &mut TouchEvent, hit: &H)
    where
        H: HitTest + ?Sized,
    {
        let Some(item) = self.state.dragged_item.as_ref() else {
            return;
        };
        event.prevent_default();

        match self.proxy.as_mut() {
            Some(proxy) => proxy.position = event.point,
            None => {
                self.proxy = Some(DragProxy {
                    item_id: item.id.clone(),
                    position: event.point,
                });
            }
        }

        match hit.zone_at(event.point) {
            Some(target) => {
                self.state.dragged_over_zone = Some(target.zone_id);
                self.state.dragged_over_index = target.index;
            }
            None => {
                self.state.dragged_over_zone = None;
                self.state.dragged_over_index = None;
            }
        }
    }

    /// Drop onto whichever registered zone lies under the release point, then
    /// clean up (proxy included). Returns whether a zone accepted the item.
    pub fn handle_touch_end<H>(
        &mut self,
        event: &TouchEvent,
        hit: &H,
        zones: &mut ZoneRegistry<'_, T>,
    ) -> bool
    where
        H: HitTest + ?Sized,
    {
        let mut accepted = false;
        if self.is_dragging() {
            if let Some(target) = hit.zone_at(event.point) {
                match zones.get_mut(&target.zone_id) {
                    Some(zone) => accepted = self.drop_into(zone, target.index),
                    None => {
                        tracing::debug!(zone = %target.zone_id, "touch released over unregistered zone");
                    }
                }
            }
        }
        self.handle_drag_end();
        accepted
    }

    fn drop_into(&self, zone: &mut DropZone<'_, T>, index: Option<usize>) -> bool {
        let Some(item) = self.state.dragged_item.as_ref() else {
            return false;
        };
        if !zone.accepts(&item.item_type) {
            tracing::trace!(zone = %zone.id, kind = %item.item_type, "drop rejected");
            return false;
        }
        tracing::trace!(zone = %zone.id, item = %item.id, ?index, "drop accepted");
        zone.drop_item(item, index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: &str) -> DragItem<String> {
        DragItem::new(id, "exercise", "Squat".to_string())
    }

    #[test]
    fn test_drag_start_and_end() {
        let mut dnd = DragAndDrop::new();
        dnd.handle_drag_start(exercise("x"));
        assert!(dnd.is_dragging());
        assert_eq!(dnd.dragged_item().map(|i| i.id.as_str()), Some("x"));

        dnd.handle_drag_end();
        assert!(!dnd.is_dragging());
        assert!(dnd.dragged_item().is_none());
    }

    #[test]
    fn test_drag_over_records_target() {
        let mut dnd = DragAndDrop::new();
        dnd.handle_drag_start(exercise("x"));

        let mut event = PointerEvent::at(5.0, 5.0);
        dnd.handle_drag_over(&mut event, "day-1", Some(2));

        assert!(event.default_prevented());
        assert_eq!(dnd.state().dragged_over_zone(), Some("day-1"));
        assert_eq!(dnd.state().dragged_over_index(), Some(2));
    }

    #[test]
    fn test_drag_over_while_idle_is_ignored() {
        let mut dnd: DragAndDrop<()> = DragAndDrop::new();
        let mut event = PointerEvent::at(5.0, 5.0);
        dnd.handle_drag_over(&mut event, "day-1", None);
        assert!(event.default_prevented());
        assert!(dnd.state().dragged_over_zone().is_none());
    }

    #[test]
    fn test_drag_leave_only_clears_outside() {
        let mut dnd = DragAndDrop::new();
        dnd.handle_drag_start(exercise("x"));
        dnd.handle_drag_over(&mut PointerEvent::at(5.0, 5.0), "day-1", Some(0));

        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        dnd.handle_drag_leave(&PointerEvent::at(10.0, 3.0), bounds);
        assert_eq!(dnd.state().dragged_over_zone(), Some("day-1"));

        dnd.handle_drag_leave(&PointerEvent::at(10.1, 3.0), bounds);
        assert!(dnd.state().dragged_over_zone().is_none());
        assert!(dnd.state().dragged_over_index().is_none());
        assert!(dnd.is_dragging());
    }

    #[test]
    fn test_drop_on_matching_zone() {
        let mut dropped = Vec::new();
        {
            let mut zone = DropZone::new("day-1", ["exercise"], |item: &DragItem<String>, index| {
                dropped.push((item.id.clone(), index));
            });
            let mut dnd = DragAndDrop::new();
            dnd.handle_drag_start(exercise("x"));
            assert!(dnd.can_drop(&exercise("x"), &zone));

            let mut event = PointerEvent::at(1.0, 1.0);
            assert!(dnd.handle_drop(&mut event, &mut zone, Some(1)));
            assert!(event.default_prevented());
            assert!(!dnd.is_dragging());
        }
        assert_eq!(dropped, vec![("x".to_string(), Some(1))]);
    }

    #[test]
    fn test_drop_on_mismatched_zone_is_silent() {
        let mut calls = 0;
        {
            let mut zone = DropZone::new("sets", ["set"], |_: &DragItem<String>, _| calls += 1);
            let mut dnd = DragAndDrop::new();
            dnd.handle_drag_start(exercise("x"));
            assert!(!can_drop(&exercise("x"), &zone));

            assert!(!dnd.handle_drop(&mut PointerEvent::default(), &mut zone, None));
            assert!(!dnd.is_dragging());
            dnd.handle_drag_end();
            assert!(!dnd.is_dragging());
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_drop_without_drag_does_nothing() {
        let mut calls = 0;
        {
            let mut zone = DropZone::new("day-1", ["exercise"], |_: &DragItem<String>, _| calls += 1);
            let mut dnd = DragAndDrop::new();
            assert!(!dnd.handle_drop(&mut PointerEvent::default(), &mut zone, None));
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_touch_drag_moves_proxy_and_tracks_zone() {
        let hit = |p: Point| (p.x >= 100.0).then(|| HitTarget::new("day-2", Some(0)));
        let mut dnd = DragAndDrop::new();
        dnd.handle_touch_start(exercise("x"), &TouchEvent::at(0.0, 0.0));
        assert!(dnd.proxy().is_none());

        let mut first = TouchEvent::at(20.0, 30.0);
        dnd.handle_touch_move(&mut first, &hit);
        assert!(first.default_prevented());
        assert_eq!(dnd.proxy().map(|p| p.position), Some(Point::new(20.0, 30.0)));
        assert!(dnd.state().dragged_over_zone().is_none());

        let mut second = TouchEvent::at(120.0, 30.0);
        dnd.handle_touch_move(&mut second, &hit);
        assert_eq!(dnd.proxy().map(|p| p.item_id.as_str()), Some("x"));
        assert_eq!(dnd.proxy().map(|p| p.position), Some(Point::new(120.0, 30.0)));
        assert_eq!(dnd.state().dragged_over_zone(), Some("day-2"));
    }

    #[test]
    fn test_new_drag_discards_previous_proxy() {
        let hit = |_: Point| -> Option<HitTarget> { None };
        let mut dnd = DragAndDrop::new();
        dnd.handle_touch_start(exercise("a"), &TouchEvent::at(0.0, 0.0));
        dnd.handle_touch_move(&mut TouchEvent::at(4.0, 4.0), &hit);
        assert_eq!(dnd.proxy().map(|p| p.item_id.as_str()), Some("a"));

        dnd.handle_drag_start(exercise("b"));
        assert!(dnd.proxy().is_none());

        dnd.handle_touch_move(&mut TouchEvent::at(9.0, 9.0), &hit);
        assert_eq!(dnd.dragged_item().map(|i| i.id.as_str()), Some("b"));
        assert_eq!(dnd.proxy().map(|p| p.item_id.as_str()), Some("b"));
        assert_eq!(dnd.proxy().map(|p| p.position), Some(Point::new(9.0, 9.0)));
    }

    #[test]
    fn test_touch_move_while_idle_keeps_scrolling() {
        let hit = |_: Point| -> Option<HitTarget> { None };
        let mut dnd: DragAndDrop<()> = DragAndDrop::new();
        let mut event = TouchEvent::at(1.0, 1.0);
        dnd.handle_touch_move(&mut event, &hit);
        assert!(!event.default_prevented());
        assert!(dnd.proxy().is_none());
    }

    #[test]
    fn test_touch_end_drops_through_registry() {
        let mut dropped = Vec::new();
        {
            let mut zones = ZoneRegistry::new();
            zones.register(DropZone::new(
                "day-2",
                ["exercise"],
                |item: &DragItem<String>, index| dropped.push((item.data.clone(), index)),
            ));
            let hit = |_: Point| Some(HitTarget::new("day-2", Some(3)));

            let mut dnd = DragAndDrop::new();
            dnd.handle_touch_start(exercise("x"), &TouchEvent::default());
            dnd.handle_touch_move(&mut TouchEvent::at(5.0, 5.0), &hit);
            assert!(dnd.handle_touch_end(&TouchEvent::at(5.0, 5.0), &hit, &mut zones));

            assert!(!dnd.is_dragging());
            assert!(dnd.proxy().is_none());
        }
        assert_eq!(dropped, vec![("Squat".to_string(), Some(3))]);
    }

    #[test]
    fn test_touch_end_over_nothing_still_cleans_up() {
        let mut zones: ZoneRegistry<'_, String> = ZoneRegistry::new();
        let hit = |_: Point| -> Option<HitTarget> { None };
        let mut dnd = DragAndDrop::new();
        dnd.handle_touch_start(exercise("x"), &TouchEvent::default());
        dnd.handle_touch_move(&mut TouchEvent::at(5.0, 5.0), &hit);
        assert!(dnd.proxy().is_some());

        assert!(!dnd.handle_touch_end(&TouchEvent::at(5.0, 5.0), &hit, &mut zones));
        assert!(!dnd.is_dragging());
        assert!(dnd.proxy().is_none());
    }

    #[test]
    fn test_touch_end_over_unregistered_zone() {
        let mut zones: ZoneRegistry<'_, String> = ZoneRegistry::new();
        let hit = |_: Point| Some(HitTarget::new("ghost", None));
        let mut dnd = DragAndDrop::new();
        dnd.handle_touch_start(exercise("x"), &TouchEvent::default());
        assert!(!dnd.handle_touch_end(&TouchEvent::default(), &hit, &mut zones));
        assert!(!dnd.is_dragging());
    }
}

//! Sortable list: an item sequence plus its own drag controller.
//!
//! Every mutation (`move_item`, `add_item`, `remove_item`) notifies the
//! reorder callback with the resulting sequence.

use super::list_ops::reorder_array;
use super::types::DragItem;
use super::DragAndDrop;

/// Items that can be located by a stable id
pub trait SortableItem {
    fn item_id(&self) -> &str;
}

/// Invoked with the full sequence after each mutation
pub type ReorderCallback<'a, T> = Box<dyn FnMut(&[T]) + 'a>;

pub struct SortableList<'a, T> {
    items: Vec<T>,
    drag: DragAndDrop<T>,
    on_reorder: Option<ReorderCallback<'a, T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for SortableList<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortableList")
            .field("items", &self.items)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl<'a, T> SortableList<'a, T>
where
    T: SortableItem + Clone,
{
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            drag: DragAndDrop::new(),
            on_reorder: None,
        }
    }

    pub fn on_reorder<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[T]) + 'a,
    {
        self.on_reorder = Some(Box::new(f));
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn drag(&self) -> &DragAndDrop<T> {
        &self.drag
    }

    pub fn drag_mut(&mut self) -> &mut DragAndDrop<T> {
        &mut self.drag
    }

    pub fn position(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.item_id() == item_id)
    }

    /// Drag item for the entry with `item_id`, tagged with `item_type`
    pub fn drag_item(&self, item_id: &str, item_type: &str) -> Option<DragItem<T>> {
        self.items
            .iter()
            .find(|item| item.item_id() == item_id)
            .map(|item| DragItem::new(item_id, item_type, item.clone()))
    }

    /// Move the entry with `item_id` to `new_index` (clamped to the last
    /// position). Returns false when the id is unknown or nothing moves.
    pub fn move_item(&mut self, item_id: &str, new_index: usize) -> bool {
        let Some(from) = self.position(item_id) else {
            return false;
        };
        let to = new_index.min(self.items.len() - 1);
        if from == to {
            return false;
        }

        match reorder_array(&self.items, from, to) {
            Ok(reordered) => {
                self.items = reordered;
                self.notify();
                true
            }
            Err(err) => {
                tracing::warn!(item = %item_id, %err, "reorder failed");
                false
            }
        }
    }

    /// Insert at `index`, or append when no index is given or it is past the end
    pub fn add_item(&mut self, item: T, index: Option<usize>) {
        match index {
            Some(i) if i <= self.items.len() => self.items.insert(i, item),
            _ => self.items.push(item),
        }
        self.notify();
    }

    pub fn remove_item(&mut self, item_id: &str) {
        self.items.retain(|item| item.item_id() != item_id);
        self.notify();
    }

    /// Complete a drag over this list: move the dragged entry to `index`
    /// and end the drag. Returns whether the list changed.
    pub fn drop_dragged_at(&mut self, index: usize) -> bool {
        let item_id = self.drag.dragged_item().map(|item| item.id.clone());
        self.drag.handle_drag_end();
        match item_id {
            Some(id) => self.move_item(&id, index),
            None => false,
        }
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_reorder.as_mut() {
            callback(&self.items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: String,
        reps: u32,
    }

    impl SortableItem for Entry {
        fn item_id(&self) -> &str {
            &self.id
        }
    }

    fn entries(ids: &[&str]) -> Vec<Entry> {
        ids.iter()
            .map(|id| Entry {
                id: (*id).to_string(),
                reps: 10,
            })
            .collect()
    }

    fn ids(items: &[Entry]) -> Vec<String> {
        items.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_move_item_to_front() {
        let mut calls = Vec::new();
        {
            let mut list =
                SortableList::new(entries(&["1", "2", "3"])).on_reorder(|items| calls.push(ids(items)));
            assert!(list.move_item("3", 0));
            assert_eq!(ids(list.items()), vec!["3", "1", "2"]);
        }
        assert_eq!(calls, vec![vec!["3", "1", "2"]]);
    }

    #[test]
    fn test_move_item_noops() {
        let mut calls = 0;
        {
            let mut list = SortableList::new(entries(&["1", "2", "3"])).on_reorder(|_| calls += 1);
            assert!(!list.move_item("2", 1));
            assert!(!list.move_item("9", 0));
            assert_eq!(ids(list.items()), vec!["1", "2", "3"]);
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_move_item_past_end_goes_last() {
        let mut list = SortableList::new(entries(&["1", "2", "3"]));
        assert!(list.move_item("1", 10));
        assert_eq!(ids(list.items()), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_add_item_positions() {
        let mut calls = Vec::new();
        {
            let mut list = SortableList::new(entries(&["1", "2"])).on_reorder(|items| calls.push(ids(items)));
            list.add_item(entries(&["a"]).remove(0), Some(1));
            list.add_item(entries(&["b"]).remove(0), None);
            list.add_item(entries(&["c"]).remove(0), Some(99));
        }
        assert_eq!(
            calls,
            vec![
                vec!["1", "a", "2"],
                vec!["1", "a", "2", "b"],
                vec!["1", "a", "2", "b", "c"],
            ]
        );
    }

    #[test]
    fn test_remove_item_notifies() {
        let mut calls = Vec::new();
        {
            let mut list = SortableList::new(entries(&["1", "2", "3"])).on_reorder(|items| calls.push(ids(items)));
            list.remove_item("2");
        }
        assert_eq!(calls, vec![vec!["1", "3"]]);
    }

    #[test]
    fn test_drop_dragged_at_reorders_and_ends_drag() {
        let mut list = SortableList::new(entries(&["1", "2", "3"]));
        let item = list.drag_item("1", "entry").unwrap();
        assert_eq!(item.data.reps, 10);

        list.drag_mut().handle_drag_start(item);
        assert!(list.drag().is_dragging());

        assert!(list.drop_dragged_at(2));
        assert!(!list.drag().is_dragging());
        assert_eq!(ids(list.items()), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let mut list = SortableList::new(entries(&["1", "2"]));
        assert!(!list.drop_dragged_at(0));
        assert_eq!(list.into_items(), entries(&["1", "2"]));
    }
}

//! Pure list transforms used by the drag paths and directly by consumers.
//! Inputs are never modified; each call returns new sequences.

use crate::error::ListError;

/// Result of moving an element from one list into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedItems<T> {
    pub source: Vec<T>,
    pub target: Vec<T>,
}

fn check_index(index: usize, len: usize) -> Result<(), ListError> {
    if index < len {
        Ok(())
    } else {
        Err(ListError::IndexOutOfBounds { index, len })
    }
}

/// Remove the element at `from` and reinsert it at `to`
pub fn reorder_array<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, ListError> {
    check_index(from, items.len())?;
    check_index(to, items.len())?;

    let mut result = items.to_vec();
    let item = result.remove(from);
    result.insert(to, item);
    Ok(result)
}

/// Move `source[source_index]` into `target` at `target_index`, appending
/// when no index is given or the index is past the end
pub fn move_item_between_arrays<T: Clone>(
    source: &[T],
    target: &[T],
    source_index: usize,
    target_index: Option<usize>,
) -> Result<MovedItems<T>, ListError> {
    check_index(source_index, source.len())?;

    let mut source = source.to_vec();
    let mut target = target.to_vec();
    let item = source.remove(source_index);

    match target_index {
        Some(index) if index < target.len() => target.insert(index, item),
        _ => target.push(item),
    }

    Ok(MovedItems { source, target })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_forward_and_back() {
        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(reorder_array(&items, 0, 2).unwrap(), vec!['b', 'c', 'a', 'd']);
        assert_eq!(reorder_array(&items, 3, 1).unwrap(), vec!['a', 'd', 'b', 'c']);
        assert_eq!(reorder_array(&items, 1, 1).unwrap(), items);
    }

    #[test]
    fn test_reorder_round_trip() {
        let items: Vec<u32> = (0..6).collect();
        for i in 0..items.len() {
            for j in 0..items.len() {
                let moved = reorder_array(&items, i, j).unwrap();
                assert_eq!(reorder_array(&moved, j, i).unwrap(), items, "i={i} j={j}");
            }
        }
    }

    #[test]
    fn test_reorder_leaves_input_alone() {
        let items = vec![1, 2, 3];
        let _ = reorder_array(&items, 0, 2).unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_reorder_out_of_bounds() {
        let items = vec![1, 2, 3];
        assert_eq!(
            reorder_array(&items, 3, 0),
            Err(ListError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(
            reorder_array(&items, 0, 5),
            Err(ListError::IndexOutOfBounds { index: 5, len: 3 })
        );
        assert!(reorder_array::<u8>(&[], 0, 0).is_err());
    }

    #[test]
    fn test_move_between_inserts_at_index() {
        let moved = move_item_between_arrays(&["a", "b", "c"], &["x", "y"], 1, Some(1)).unwrap();
        assert_eq!(moved.source, vec!["a", "c"]);
        assert_eq!(moved.target, vec!["x", "b", "y"]);
    }

    #[test]
    fn test_move_between_appends() {
        let moved = move_item_between_arrays(&["a", "b"], &["x"], 0, None).unwrap();
        assert_eq!(moved.target, vec!["x", "a"]);

        let past_end = move_item_between_arrays(&["a", "b"], &["x"], 0, Some(9)).unwrap();
        assert_eq!(past_end.target, vec!["x", "a"]);

        let into_empty = move_item_between_arrays(&["a"], &[], 0, Some(0)).unwrap();
        assert!(into_empty.source.is_empty());
        assert_eq!(into_empty.target, vec!["a"]);
    }

    #[test]
    fn test_move_between_preserves_count() {
        let source: Vec<u32> = (0..5).collect();
        let target: Vec<u32> = (10..13).collect();
        for i in 0..source.len() {
            for t in [None, Some(0), Some(2), Some(3)] {
                let moved = move_item_between_arrays(&source, &target, i, t).unwrap();
                assert_eq!(
                    moved.source.len() + moved.target.len(),
                    source.len() + target.len()
                );
            }
        }
    }

    #[test]
    fn test_move_between_bad_source_index() {
        let err = move_item_between_arrays(&[1], &[2], 1, None).unwrap_err();
        assert_eq!(err, ListError::IndexOutOfBounds { index: 1, len: 1 });
    }
}

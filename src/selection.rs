use std::collections::HashSet;

use crate::grid;
use crate::photo::PhotoId;

/// Multi-selection over whatever sequence is on screen.
///
/// The anchor is an index into that sequence; ids are kept as-is when the
/// sequence changes, so callers clear the selection on a context switch.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    anchor: Option<usize>,
    selected: HashSet<PhotoId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain click: only this photo, anchor moves here.
    pub fn single_click(&mut self, index: usize, id: PhotoId) {
        self.selected.clear();
        self.selected.insert(id);
        self.anchor = Some(index);
    }

    /// Ctrl-click toggles membership. The anchor moves either way.
    pub fn ctrl_click(&mut self, index: usize, id: PhotoId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.anchor = Some(index);
    }

    /// Indices covered by a shift-click at `clicked`, row-major.
    ///
    /// Rows strictly between the anchor row and the clicked row are taken
    /// whole; the first row starts at the earlier column and the last row
    /// stops at the later one. Cells at or past `total` are skipped. Without
    /// an anchor nothing is selected. The anchor stays where it is.
    pub fn shift_click(&self, clicked: usize, total: usize, columns: usize) -> Vec<usize> {
        let Some(anchor) = self.anchor else {
            return Vec::new();
        };
        if total == 0 {
            return Vec::new();
        }
        let columns = columns.max(1);
        let start = anchor.min(clicked);
        // Cells past the last photo never get selected, so stop there.
        let end = anchor.max(clicked).min(total - 1);
        if start > end {
            return Vec::new();
        }
        let (start_row, start_col) = (grid::row_of(start, columns), grid::col_of(start, columns));
        let (end_row, end_col) = (grid::row_of(end, columns), grid::col_of(end, columns));

        let mut indices = Vec::new();
        for row in start_row..=end_row {
            let first = if row == start_row { start_col } else { 0 };
            let last = if row == end_row { end_col } else { columns - 1 };
            for col in first..=last {
                indices.push(grid::index_of(row, col, columns));
            }
        }
        indices
    }

    /// Shift-click resolved against the displayed ids: the range replaces the
    /// current selection. Returns how many photos ended up selected.
    pub fn select_range(&mut self, sequence: &[PhotoId], clicked: usize, columns: usize) -> usize {
        if self.anchor.is_none() {
            return self.selected.len();
        }
        let indices = self.shift_click(clicked, sequence.len(), columns);
        self.clear();
        self.add_all(indices.iter().filter_map(|&i| sequence.get(i).copied()));
        self.selected.len()
    }

    /// Empties the set; the anchor is kept.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Forgets both the set and the anchor.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    pub fn is_selected(&self, id: PhotoId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_ids(&self) -> &HashSet<PhotoId> {
        &self.selected
    }

    pub fn add(&mut self, id: PhotoId) {
        self.selected.insert(id);
    }

    pub fn add_all(&mut self, ids: impl IntoIterator<Item = PhotoId>) {
        self.selected.extend(ids);
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in the order they appear in `sequence`.
    pub fn ordered(&self, sequence: &[PhotoId]) -> Vec<PhotoId> {
        sequence
            .iter()
            .copied()
            .filter(|id| self.selected.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<PhotoId> {
        (0..n).map(|_| PhotoId::new()).collect()
    }

    #[test]
    fn test_single_click_replaces_selection() {
        let ids = ids(3);
        let mut selection = Selection::new();
        selection.add_all([ids[0], ids[1]]);
        selection.single_click(2, ids[2]);
        assert_eq!(selection.len(), 1);
        assert!(selection.is_selected(ids[2]));
        assert_eq!(selection.anchor(), Some(2));
    }

    #[test]
    fn test_ctrl_click_toggles_and_moves_anchor() {
        let ids = ids(3);
        let mut selection = Selection::new();
        selection.ctrl_click(0, ids[0]);
        selection.ctrl_click(2, ids[2]);
        assert_eq!(selection.len(), 2);
        selection.ctrl_click(0, ids[0]);
        assert!(!selection.is_selected(ids[0]));
        assert_eq!(selection.anchor(), Some(0));
    }

    #[test]
    fn test_shift_click_spans_rows() {
        let mut selection = Selection::new();
        selection.single_click(1, PhotoId::new());
        assert_eq!(selection.shift_click(7, 10, 3), vec![1, 2, 3, 4, 5, 6, 7]);
        // direction does not matter
        selection.single_click(7, PhotoId::new());
        assert_eq!(selection.shift_click(1, 10, 3), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_shift_click_stops_at_total() {
        let mut selection = Selection::new();
        selection.single_click(0, PhotoId::new());
        assert_eq!(selection.shift_click(8, 8, 3), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_shift_click_far_past_the_end_is_clamped() {
        let mut selection = Selection::new();
        selection.single_click(0, PhotoId::new());
        assert_eq!(
            selection.shift_click(usize::MAX / 2, 10, 3),
            (0..10).collect::<Vec<_>>()
        );
        assert!(selection.shift_click(4, 0, 3).is_empty());

        // anchor itself beyond a shrunken sequence
        selection.single_click(12, PhotoId::new());
        assert!(selection.shift_click(15, 10, 3).is_empty());
    }

    #[test]
    fn test_select_range_without_anchor_changes_nothing() {
        let ids = ids(6);
        let mut selection = Selection::new();
        assert_eq!(selection.select_range(&ids, 4, 3), 0);
        assert!(selection.is_empty());

        selection.add(ids[1]);
        assert_eq!(selection.select_range(&ids, 4, 3), 1);
        assert_eq!(selection.ordered(&ids), vec![ids[1]]);
        assert_eq!(selection.anchor(), None);
    }

    #[test]
    fn test_shift_click_without_anchor_is_empty() {
        let selection = Selection::new();
        assert!(selection.shift_click(4, 10, 3).is_empty());
    }

    #[test]
    fn test_shift_click_on_anchor_selects_one() {
        let mut selection = Selection::new();
        selection.single_click(4, PhotoId::new());
        assert_eq!(selection.shift_click(4, 10, 3), vec![4]);
        assert_eq!(selection.shift_click(4, 10, 1), vec![4]);
    }

    #[test]
    fn test_select_range_keeps_anchor_and_replaces_ids() {
        let ids = ids(10);
        let mut selection = Selection::new();
        selection.single_click(2, ids[2]);
        selection.add(ids[9]);

        assert_eq!(selection.select_range(&ids, 5, 4), 4);
        assert!(!selection.is_selected(ids[9]));
        assert_eq!(selection.ordered(&ids), ids[2..=5].to_vec());
        assert_eq!(selection.anchor(), Some(2));

        // extends from the same anchor
        assert_eq!(selection.select_range(&ids, 0, 4), 3);
        assert_eq!(selection.ordered(&ids), ids[0..=2].to_vec());
    }

    #[test]
    fn test_clear_keeps_anchor() {
        let mut selection = Selection::new();
        selection.single_click(3, PhotoId::new());
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.anchor(), Some(3));
        selection.reset();
        assert_eq!(selection.anchor(), None);
    }
}

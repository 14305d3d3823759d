//! Index arithmetic for the reflowing thumbnail grid.
//!
//! Photos are laid out row-major; the column count follows the window width,
//! so every mapping takes the current column count explicitly.

pub fn row_of(index: usize, columns: usize) -> usize {
    index / columns.max(1)
}

pub fn col_of(index: usize, columns: usize) -> usize {
    index % columns.max(1)
}

pub fn index_of(row: usize, col: usize, columns: usize) -> usize {
    row * columns.max(1) + col
}

/// Number of thumbnail columns that fit into `width`. Never less than one.
pub fn columns_for_width(width: f32, cell: f32, spacing: f32, padding: f32) -> usize {
    let available = width - padding * 2.0;
    ((available + spacing) / cell).max(1.0) as usize
}

/// Pixel geometry of one rendered grid, used to turn pointer positions
/// (relative to the grid's top-left corner, scroll included) into indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    /// Thumbnail plus its padding and the spacing after it.
    pub cell: f32,
    pub padding: f32,
}

impl GridLayout {
    pub fn new(columns: usize, cell: f32, padding: f32) -> Self {
        Self {
            columns: columns.max(1),
            cell,
            padding,
        }
    }

    pub fn for_width(width: f32, cell: f32, spacing: f32, padding: f32) -> Self {
        Self::new(columns_for_width(width, cell, spacing, padding), cell, padding)
    }

    /// Index of the photo under the pointer, if any.
    pub fn cell_at(&self, x: f32, y: f32, count: usize) -> Option<usize> {
        let x = x - self.padding;
        let y = y - self.padding;
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.cell) as usize;
        if col >= self.columns {
            return None;
        }
        let row = (y / self.cell) as usize;
        let index = index_of(row, col, self.columns);
        (index < count).then_some(index)
    }

    /// Slot (`0..=count`) a drop at the pointer inserts before. The left half
    /// of a cell means "before this photo", the right half "after it".
    pub fn insertion_index(&self, x: f32, y: f32, count: usize) -> usize {
        let x = (x - self.padding).max(0.0);
        let y = (y - self.padding).max(0.0);
        let row = (y / self.cell) as usize;
        let col = ((x / self.cell).round() as usize).min(self.columns);
        index_of(row, col, self.columns).min(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_col_round_trip() {
        for columns in 1..6 {
            for index in 0..40 {
                let (r, c) = (row_of(index, columns), col_of(index, columns));
                assert!(c < columns);
                assert_eq!(index_of(r, c, columns), index);
            }
        }
    }

    #[test]
    fn test_zero_columns_does_not_divide_by_zero() {
        assert_eq!(row_of(5, 0), 5);
        assert_eq!(col_of(5, 0), 0);
    }

    #[test]
    fn test_columns_for_width() {
        // 3 cells of 216 minus the trailing spacing, plus padding on both sides
        assert_eq!(columns_for_width(3.0 * 216.0 - 8.0 + 20.0, 216.0, 8.0, 10.0), 3);
        assert_eq!(columns_for_width(3.0 * 216.0 - 9.0 + 20.0, 216.0, 8.0, 10.0), 2);
        assert_eq!(columns_for_width(10.0, 216.0, 8.0, 10.0), 1);
    }

    #[test]
    fn test_cell_at() {
        let grid = GridLayout::new(3, 100.0, 10.0);
        assert_eq!(grid.cell_at(15.0, 15.0, 10), Some(0));
        assert_eq!(grid.cell_at(260.0, 120.0, 10), Some(5));
        assert_eq!(grid.cell_at(150.0, 320.0, 10), None);
        assert_eq!(grid.cell_at(5.0, 50.0, 10), None);
        assert_eq!(grid.cell_at(400.0, 50.0, 10), None);
    }

    #[test]
    fn test_insertion_index() {
        let grid = GridLayout::new(3, 100.0, 10.0);
        assert_eq!(grid.insertion_index(20.0, 20.0, 7), 0);
        assert_eq!(grid.insertion_index(80.0, 20.0, 7), 1);
        assert_eq!(grid.insertion_index(305.0, 150.0, 7), 6);
        assert_eq!(grid.insertion_index(250.0, 250.0, 7), 7);
        assert_eq!(grid.insertion_index(-40.0, -40.0, 7), 0);
    }
}

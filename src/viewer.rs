use std::collections::HashMap;

use iced::widget::image;

use photo_sorter::photo::{PhotoId, Rotation};

/// Full-size preview of one photo of the displayed sequence.
#[derive(Default)]
pub struct ViewerState {
    pub current_index: Option<usize>,
    /// Decoded previews keyed by photo and the rotation they were decoded at.
    cache: HashMap<(PhotoId, Rotation), image::Handle>,
}

impl ViewerState {
    pub fn is_open(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn open_index(&mut self, index: usize) {
        self.current_index = Some(index);
    }

    pub fn close(&mut self) {
        self.current_index = None;
        self.cache.clear();
    }

    pub fn next(&mut self, total: usize) {
        if let Some(i) = self.current_index {
            if i + 1 < total {
                self.current_index = Some(i + 1);
            }
        }
    }

    pub fn prev(&mut self) {
        if let Some(i) = self.current_index {
            if i > 0 {
                self.current_index = Some(i - 1);
            }
        }
    }

    /// Keeps the index valid after the sequence shrank.
    pub fn clamp(&mut self, total: usize) {
        if let Some(i) = self.current_index {
            if total == 0 {
                self.close();
            } else if i >= total {
                self.current_index = Some(total - 1);
            }
        }
    }

    pub fn cached(&self, id: PhotoId, rotation: Rotation) -> Option<&image::Handle> {
        self.cache.get(&(id, rotation))
    }

    /// Stores a decoded preview, keeping only the photos in `keep`.
    pub fn insert(&mut self, id: PhotoId, rotation: Rotation, handle: image::Handle, keep: &[PhotoId]) {
        self.cache.insert((id, rotation), handle);
        self.cache.retain(|(k, _), _| keep.contains(k));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut viewer = ViewerState::default();
        viewer.next(5);
        assert_eq!(viewer.current_index, None);

        viewer.open_index(3);
        viewer.next(5);
        viewer.next(5);
        assert_eq!(viewer.current_index, Some(4));
        viewer.clamp(2);
        assert_eq!(viewer.current_index, Some(1));
        viewer.prev();
        viewer.prev();
        assert_eq!(viewer.current_index, Some(0));
        viewer.clamp(0);
        assert!(!viewer.is_open());
    }
}

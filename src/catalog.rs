use std::collections::HashSet;

use crate::photo::{Photo, PhotoId, Rotation};

/// The pool of photos not assigned to any category, kept in archive order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    photos: Vec<Photo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole catalog. Clearing the selection is up to the caller.
    pub fn set_all(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Removes by identity; absent photos are ignored.
    pub fn remove(&mut self, id: PhotoId) -> Option<Photo> {
        let index = self.index_of(id)?;
        Some(self.photos.remove(index))
    }

    /// Bulk remove. Returns the removed photos in catalog order.
    pub fn remove_by_ids(&mut self, ids: &HashSet<PhotoId>) -> Vec<Photo> {
        let mut removed = Vec::new();
        self.photos.retain(|p| {
            if ids.contains(&p.id) {
                removed.push(p.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Merges `photos` back in and re-sorts everything by original index, so
    /// the final order never depends on the order photos left or came back.
    /// Photos already present are not duplicated.
    pub fn restore(&mut self, photos: Vec<Photo>) {
        let present: HashSet<PhotoId> = self.photos.iter().map(|p| p.id).collect();
        self.photos
            .extend(photos.into_iter().filter(|p| !present.contains(&p.id)));
        self.photos.sort_by_key(|p| p.original_index);
    }

    pub fn by_index(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    pub fn by_id(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    /// Invalid indices are skipped; input order is kept.
    pub fn by_indices(&self, indices: &[usize]) -> Vec<Photo> {
        indices
            .iter()
            .filter_map(|&i| self.photos.get(i).cloned())
            .collect()
    }

    pub fn update_rotation(&mut self, id: PhotoId, rotation: Rotation) -> bool {
        match self.photos.iter_mut().find(|p| p.id == id) {
            Some(photo) => {
                photo.rotation = rotation;
                true
            }
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Read-only view of the current order.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Owned copy for background readers.
    pub fn snapshot(&self) -> Vec<Photo> {
        self.photos.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn photos(n: usize) -> Vec<Photo> {
        (0..n)
            .map(|i| Photo::new(PathBuf::from(format!("/x/{i}.jpg")), format!("{i}.jpg"), i))
            .collect()
    }

    fn order(catalog: &Catalog) -> Vec<usize> {
        catalog.photos().iter().map(|p| p.original_index).collect()
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut catalog = Catalog::new();
        let all = photos(3);
        let stranger = Photo::new(PathBuf::from("/y.jpg"), "y.jpg", 9);
        catalog.set_all(all);
        assert!(catalog.remove(stranger.id).is_none());
        assert_eq!(catalog.count(), 3);
    }

    #[test]
    fn test_restore_sorts_by_original_index_regardless_of_interleaving() {
        let all = photos(8);
        let mut catalog = Catalog::new();
        catalog.set_all(all.clone());

        let first: HashSet<PhotoId> = [all[6].id, all[1].id].into_iter().collect();
        let second: HashSet<PhotoId> = [all[3].id, all[7].id, all[0].id].into_iter().collect();
        let mut out_a = catalog.remove_by_ids(&first);
        let out_b = catalog.remove_by_ids(&second);
        assert_eq!(order(&catalog), vec![2, 4, 5]);

        out_a.reverse();
        catalog.restore(out_b);
        assert_eq!(order(&catalog), vec![0, 2, 3, 4, 5, 7]);
        catalog.restore(out_a);
        assert_eq!(order(&catalog), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_restore_does_not_duplicate() {
        let all = photos(2);
        let mut catalog = Catalog::new();
        catalog.set_all(all.clone());
        catalog.restore(vec![all[0].clone()]);
        assert_eq!(catalog.count(), 2);
    }

    #[test]
    fn test_lookups() {
        let all = photos(4);
        let mut catalog = Catalog::new();
        catalog.set_all(all.clone());

        assert_eq!(catalog.index_of(all[2].id), Some(2));
        assert_eq!(catalog.by_index(9), None);
        assert_eq!(catalog.by_id(all[3].id).map(|p| p.original_index), Some(3));
        let picked: Vec<usize> = catalog
            .by_indices(&[3, 10, 0])
            .iter()
            .map(|p| p.original_index)
            .collect();
        assert_eq!(picked, vec![3, 0]);
    }

    #[test]
    fn test_update_rotation() {
        let all = photos(1);
        let mut catalog = Catalog::new();
        catalog.set_all(all.clone());
        assert!(catalog.update_rotation(all[0].id, Rotation::Cw90));
        assert_eq!(catalog.by_index(0).map(|p| p.rotation), Some(Rotation::Cw90));
        assert!(!catalog.update_rotation(PhotoId::new(), Rotation::Cw90));
    }
}

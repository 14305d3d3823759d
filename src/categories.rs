use std::collections::HashSet;
use std::fmt;

use crate::photo::{Photo, PhotoId, Rotation};

/// Category identity, derived from the number it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(u32);

impl CategoryId {
    pub const fn from_number(number: u32) -> Self {
        CategoryId(number)
    }

    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "category-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    /// Display and export key. Never reused, may have gaps after deletions.
    pub number: u32,
    pub name: String,
    /// Insertion order is display and export order.
    pub photos: Vec<Photo>,
}

impl Category {
    fn new(number: u32) -> Self {
        Self {
            id: CategoryId(number),
            number,
            name: format!("Category {number}"),
            photos: Vec::new(),
        }
    }

    pub fn contains(&self, id: PhotoId) -> bool {
        self.photos.iter().any(|p| p.id == id)
    }

    pub fn position_of(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Ordered collection of categories plus the numbering counter.
///
/// The store itself does not stop a photo from being added twice; moving a
/// photo means removing it from where it is first. [`crate::session::Session`]
/// does that bookkeeping.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    categories: Vec<Category>,
    next_number: u32,
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            next_number: 1,
        }
    }
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Category {
        let category = Category::new(self.next_number);
        self.next_number += 1;
        self.categories.push(category.clone());
        category
    }

    /// Creation order.
    pub fn get_all(&self) -> &[Category] {
        &self.categories
    }

    pub fn snapshot(&self) -> Vec<Category> {
        self.categories.clone()
    }

    pub fn get_by_id(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    /// Inserts at `position` when it lies in `0..=len`, appends otherwise.
    /// Does not check whether the photo already lives elsewhere.
    pub fn add_photo(
        &mut self,
        photo: Photo,
        category: CategoryId,
        position: Option<usize>,
    ) -> Option<&Category> {
        let target = self.get_mut(category)?;
        match position {
            Some(pos) if pos <= target.photos.len() => target.photos.insert(pos, photo),
            _ => target.photos.push(photo),
        }
        Some(target)
    }

    pub fn remove_photo(&mut self, photo: PhotoId, category: CategoryId) -> Option<&Category> {
        let target = self.get_mut(category)?;
        target.photos.retain(|p| p.id != photo);
        Some(target)
    }

    /// Like [`Self::remove_photo`] but hands the removed photo back.
    pub fn take_photo(&mut self, photo: PhotoId, category: CategoryId) -> Option<Photo> {
        let target = self.get_mut(category)?;
        let index = target.position_of(photo)?;
        Some(target.photos.remove(index))
    }

    /// Moves a photo to the slot before `new_position` within its category.
    ///
    /// `new_position` is a slot in `0..=len` as seen before the move, so a
    /// target past the current index lands one lower once the photo has been
    /// taken out.
    pub fn reorder_photo(&mut self, photo: PhotoId, category: CategoryId, new_position: usize) -> bool {
        let Some(target) = self.get_mut(category) else {
            return false;
        };
        let Some(current) = target.position_of(photo) else {
            return false;
        };
        let len = target.photos.len();
        if new_position > len {
            return false;
        }
        if new_position == current {
            return true;
        }
        let moved = target.photos.remove(current);
        let insert_at = if new_position > current {
            new_position - 1
        } else {
            new_position
        };
        let insert_at = insert_at.min(target.photos.len());
        target.photos.insert(insert_at, moved);
        true
    }

    /// Block version of [`Self::reorder_photo`]: the listed photos keep their
    /// relative order and end up together before slot `new_position`.
    pub fn reorder_photos(
        &mut self,
        photos: &HashSet<PhotoId>,
        category: CategoryId,
        new_position: usize,
    ) -> bool {
        let Some(target) = self.get_mut(category) else {
            return false;
        };
        if new_position > target.photos.len() {
            return false;
        }
        let before_slot = target
            .photos
            .iter()
            .take(new_position)
            .filter(|p| photos.contains(&p.id))
            .count();

        let mut block = Vec::new();
        let mut rest = Vec::with_capacity(target.photos.len());
        for photo in target.photos.drain(..) {
            if photos.contains(&photo.id) {
                block.push(photo);
            } else {
                rest.push(photo);
            }
        }
        if block.is_empty() {
            target.photos = rest;
            return false;
        }

        let insert_at = (new_position - before_slot).min(rest.len());
        rest.splice(insert_at..insert_at, block);
        target.photos = rest;
        true
    }

    /// First category (in creation order) holding the photo.
    pub fn find_category_containing(&self, photo: PhotoId) -> Option<&Category> {
        self.categories.iter().find(|c| c.contains(photo))
    }

    pub fn find_photo_by_id(&self, photo: PhotoId) -> Option<&Photo> {
        self.categories
            .iter()
            .flat_map(|c| c.photos.iter())
            .find(|p| p.id == photo)
    }

    /// Drops the category together with its photos.
    pub fn remove(&mut self, category: CategoryId) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != category);
        self.categories.len() != before
    }

    /// Removes the category and returns what it held; empty when unknown.
    pub fn remove_and_return_photos(&mut self, category: CategoryId) -> Vec<Photo> {
        match self.categories.iter().position(|c| c.id == category) {
            Some(index) => self.categories.remove(index).photos,
            None => Vec::new(),
        }
    }

    pub fn update_photo_rotation(
        &mut self,
        photo: PhotoId,
        category: CategoryId,
        rotation: Rotation,
    ) -> Option<&Category> {
        let target = self.get_mut(category)?;
        let entry = target.photos.iter_mut().find(|p| p.id == photo)?;
        entry.rotation = rotation;
        Some(target)
    }

    /// Removes every category and restarts numbering at 1.
    pub fn clear(&mut self) {
        self.categories.clear();
        self.next_number = 1;
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn photo(i: usize) -> Photo {
        Photo::new(PathBuf::from(format!("/x/{i}.jpg")), format!("{i}.jpg"), i)
    }

    fn filled(store: &mut CategoryStore, n: usize) -> (CategoryId, Vec<Photo>) {
        let id = store.create().id;
        let photos: Vec<Photo> = (0..n).map(photo).collect();
        for p in &photos {
            store.add_photo(p.clone(), id, None);
        }
        (id, photos)
    }

    fn order(store: &CategoryStore, id: CategoryId) -> Vec<usize> {
        store
            .get_by_id(id)
            .map(|c| c.photos.iter().map(|p| p.original_index).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_numbers_are_never_reused() {
        let mut store = CategoryStore::new();
        let first: Vec<Category> = (0..5).map(|_| store.create()).collect();
        assert!(store.remove(first[1].id));
        assert!(store.remove(first[4].id));
        let later: Vec<u32> = (0..3).map(|_| store.create().number).collect();

        let mut numbers: Vec<u32> = first.iter().map(|c| c.number).collect();
        numbers.extend(later);
        assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
        assert_eq!(store.get_by_id(CategoryId(6)).map(|c| c.name.as_str()), Some("Category 6"));
    }

    #[test]
    fn test_clear_resets_numbering() {
        let mut store = CategoryStore::new();
        store.create();
        store.create();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.create().number, 1);
    }

    #[test]
    fn test_add_photo_position_handling() {
        let mut store = CategoryStore::new();
        let (id, _) = filled(&mut store, 2);
        store.add_photo(photo(7), id, Some(0));
        store.add_photo(photo(8), id, Some(99));
        store.add_photo(photo(9), id, Some(2));
        assert_eq!(order(&store, id), vec![7, 0, 9, 1, 8]);
        assert!(store.add_photo(photo(10), CategoryId(42), None).is_none());
    }

    #[test]
    fn test_reorder_same_slot_is_noop() {
        let mut store = CategoryStore::new();
        let (id, photos) = filled(&mut store, 4);
        assert!(store.reorder_photo(photos[2].id, id, 2));
        assert_eq!(order(&store, id), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_reorder_inserts_before_target_slot() {
        let mut store = CategoryStore::new();
        let (id, photos) = filled(&mut store, 4);
        assert!(store.reorder_photo(photos[0].id, id, 3));
        assert_eq!(order(&store, id), vec![1, 2, 0, 3]);
        assert!(store.reorder_photo(photos[3].id, id, 0));
        assert_eq!(order(&store, id), vec![3, 1, 2, 0]);
        assert!(store.reorder_photo(photos[1].id, id, 4));
        assert_eq!(order(&store, id), vec![3, 2, 0, 1]);
    }

    #[test]
    fn test_reorder_rejects_bad_input() {
        let mut store = CategoryStore::new();
        let (id, photos) = filled(&mut store, 3);
        assert!(!store.reorder_photo(photos[0].id, id, 4));
        assert!(!store.reorder_photo(photo(50).id, id, 0));
        assert!(!store.reorder_photo(photos[0].id, CategoryId(99), 0));
        assert_eq!(order(&store, id), vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_round_trip() {
        let n = 5;
        for i in 0..n {
            for j in 0..=n {
                let mut store = CategoryStore::new();
                let (id, photos) = filled(&mut store, n);
                let moving = photos[i].id;
                assert!(store.reorder_photo(moving, id, j));

                let now = store.get_by_id(id).and_then(|c| c.position_of(moving)).unwrap();
                let back = if i > now { i + 1 } else { i };
                assert!(store.reorder_photo(moving, id, back));
                assert_eq!(order(&store, id), (0..n).collect::<Vec<_>>(), "i={i} j={j}");
            }
        }
    }

    #[test]
    fn test_reorder_block_matches_single_semantics() {
        let mut store = CategoryStore::new();
        let (id, photos) = filled(&mut store, 6);
        let ids: HashSet<PhotoId> = [photos[1].id, photos[3].id].into_iter().collect();
        assert!(store.reorder_photos(&ids, id, 5));
        assert_eq!(order(&store, id), vec![0, 2, 4, 1, 3, 5]);

        let ids: HashSet<PhotoId> = [photos[4].id, photos[5].id].into_iter().collect();
        assert!(store.reorder_photos(&ids, id, 0));
        assert_eq!(order(&store, id), vec![4, 5, 0, 2, 1, 3]);

        let single: HashSet<PhotoId> = [photos[0].id].into_iter().collect();
        assert!(!store.reorder_photos(&single, id, 7));
        let none: HashSet<PhotoId> = HashSet::new();
        assert!(!store.reorder_photos(&none, id, 0));
        assert_eq!(order(&store, id), vec![4, 5, 0, 2, 1, 3]);
    }

    #[test]
    fn test_move_between_categories() {
        let mut store = CategoryStore::new();
        let (a, photos) = filled(&mut store, 2);
        let b = store.create().id;

        let moving = photos[1].clone();
        store.remove_photo(moving.id, a);
        store.add_photo(moving.clone(), b, None);

        assert_eq!(store.find_category_containing(moving.id).map(|c| c.id), Some(b));
        assert!(!store.get_by_id(a).is_some_and(|c| c.contains(moving.id)));
        assert_eq!(store.find_photo_by_id(moving.id).map(|p| p.original_index), Some(1));
    }

    #[test]
    fn test_remove_and_return_photos() {
        let mut store = CategoryStore::new();
        let (id, _) = filled(&mut store, 3);
        let returned = store.remove_and_return_photos(id);
        assert_eq!(returned.len(), 3);
        assert!(store.get_by_id(id).is_none());
        assert!(store.remove_and_return_photos(id).is_empty());
        assert!(!store.remove(id));
    }

    #[test]
    fn test_update_photo_rotation() {
        let mut store = CategoryStore::new();
        let (id, photos) = filled(&mut store, 1);
        let updated = store.update_photo_rotation(photos[0].id, id, Rotation::Cw180);
        assert_eq!(updated.map(|c| c.photos[0].rotation), Some(Rotation::Cw180));
        assert!(store.update_photo_rotation(photo(3).id, id, Rotation::Cw90).is_none());
    }
}

//! One sorting session: the unsorted catalog, the categories, and an index
//! of where each photo currently lives.
//!
//! Every move is a remove from the old container followed by an add to the
//! new one, with the index updated in the same call, so a photo is never
//! held by two containers once a call returns.

use std::collections::{HashMap, HashSet};

use crate::catalog::Catalog;
use crate::categories::{Category, CategoryId, CategoryStore};
use crate::export::{self, ExportPlan};
use crate::photo::{Photo, PhotoId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Catalog,
    Category(CategoryId),
}

/// The sequence shown in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Unsorted,
    Category(CategoryId),
}

#[derive(Debug, Default)]
pub struct Session {
    catalog: Catalog,
    categories: CategoryStore,
    locations: HashMap<PhotoId, Location>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts over with a freshly extracted archive.
    pub fn load(&mut self, photos: Vec<Photo>) {
        self.categories.clear();
        self.locations = photos.iter().map(|p| (p.id, Location::Catalog)).collect();
        self.catalog.set_all(photos);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn total_photos(&self) -> usize {
        self.locations.len()
    }

    pub fn location_of(&self, id: PhotoId) -> Option<Location> {
        self.locations.get(&id).copied()
    }

    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        match self.location_of(id)? {
            Location::Catalog => self.catalog.by_id(id),
            Location::Category(_) => self.categories.find_photo_by_id(id),
        }
    }

    pub fn create_category(&mut self) -> Category {
        let category = self.categories.create();
        log::info!("Created {}", category.name);
        category
    }

    /// Moves photos into `target`, inserting them consecutively from
    /// `position` (appending when it is out of range). Photos already in
    /// `target` and unknown ids are skipped. Returns how many moved.
    pub fn move_to_category(
        &mut self,
        ids: &[PhotoId],
        target: CategoryId,
        position: Option<usize>,
    ) -> usize {
        let Some(len) = self.categories.get_by_id(target).map(Category::len) else {
            return 0;
        };
        let mut slot = position.filter(|&p| p <= len);
        // Unsorted photos leave the catalog in one pass.
        let unsorted: HashSet<PhotoId> = ids
            .iter()
            .copied()
            .filter(|&id| self.location_of(id) == Some(Location::Catalog))
            .collect();
        let mut from_catalog: HashMap<PhotoId, Photo> = self
            .catalog
            .remove_by_ids(&unsorted)
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut moved = 0;
        for &id in ids {
            let Some(photo) = from_catalog.remove(&id).or_else(|| self.take(id, Some(target)))
            else {
                continue;
            };
            self.categories.add_photo(photo, target, slot);
            self.locations.insert(id, Location::Category(target));
            slot = slot.map(|s| s + 1);
            moved += 1;
        }
        moved
    }

    /// Sends categorized photos back to the unsorted pool.
    pub fn return_to_catalog(&mut self, ids: &[PhotoId]) -> usize {
        let mut returned = Vec::new();
        for &id in ids {
            if self.location_of(id) == Some(Location::Catalog) {
                continue;
            }
            if let Some(photo) = self.take(id, None) {
                returned.push(photo);
            }
        }
        let count = returned.len();
        self.restore(returned);
        count
    }

    /// Deletes the category and puts its photos back in the catalog.
    pub fn delete_category(&mut self, id: CategoryId) -> usize {
        let photos = self.categories.remove_and_return_photos(id);
        let count = photos.len();
        self.restore(photos);
        log::info!("Deleted {id}, {count} photos returned");
        count
    }

    /// Reorders photos inside one category; see
    /// [`CategoryStore::reorder_photo`] for slot semantics.
    pub fn reorder(&mut self, ids: &[PhotoId], category: CategoryId, position: usize) -> bool {
        match ids {
            [] => false,
            [single] => self.categories.reorder_photo(*single, category, position),
            _ => {
                let set: HashSet<PhotoId> = ids.iter().copied().collect();
                self.categories.reorder_photos(&set, category, position)
            }
        }
    }

    /// Turns every listed photo by `quarter_turns` clockwise steps.
    pub fn rotate(&mut self, ids: &[PhotoId], quarter_turns: i32) -> usize {
        let mut rotated = 0;
        for &id in ids {
            let Some(rotation) = self.photo(id).map(|p| p.rotation.turned(quarter_turns)) else {
                continue;
            };
            let updated = match self.location_of(id) {
                Some(Location::Catalog) => self.catalog.update_rotation(id, rotation),
                Some(Location::Category(category)) => self
                    .categories
                    .update_photo_rotation(id, category, rotation)
                    .is_some(),
                None => false,
            };
            if updated {
                rotated += 1;
            }
        }
        rotated
    }

    /// Snapshot of the displayed sequence; empty for an unknown category.
    pub fn sequence(&self, view: View) -> Vec<Photo> {
        match view {
            View::Unsorted => self.catalog.snapshot(),
            View::Category(id) => self
                .categories
                .get_by_id(id)
                .map(|c| c.photos.clone())
                .unwrap_or_default(),
        }
    }

    pub fn sequence_ids(&self, view: View) -> Vec<PhotoId> {
        match view {
            View::Unsorted => self.catalog.photos().iter().map(|p| p.id).collect(),
            View::Category(id) => self
                .categories
                .get_by_id(id)
                .map(|c| c.photos.iter().map(|p| p.id).collect())
                .unwrap_or_default(),
        }
    }

    pub fn view_exists(&self, view: View) -> bool {
        match view {
            View::Unsorted => true,
            View::Category(id) => self.categories.get_by_id(id).is_some(),
        }
    }

    pub fn export_plan(&self) -> ExportPlan {
        export::plan(self.categories.get_all())
    }

    /// Pulls a photo out of wherever it lives, unless it already sits in
    /// `keep_in`.
    fn take(&mut self, id: PhotoId, keep_in: Option<CategoryId>) -> Option<Photo> {
        match self.location_of(id)? {
            Location::Catalog => self.catalog.remove(id),
            Location::Category(current) if Some(current) == keep_in => None,
            Location::Category(current) => self.categories.take_photo(id, current),
        }
    }

    fn restore(&mut self, photos: Vec<Photo>) {
        for photo in &photos {
            self.locations.insert(photo.id, Location::Catalog);
        }
        self.catalog.restore(photos);
    }
}

//! Tunables and the few remembered preferences.

use std::path::{Path, PathBuf};

/// Extensions (lowercase) recognized as photos inside an archive.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

pub const THUMB_SIZE: f32 = 160.0;
/// Pixel size thumbnails are decoded at; a bit larger than shown for HiDPI.
pub const THUMB_DECODE_SIZE: u32 = 320;
pub const THUMB_PADDING: f32 = 4.0;
pub const GRID_SPACING: f32 = 8.0;
pub const GRID_PADDING: f32 = 10.0;
/// image + button padding + spacing
pub const THUMB_CELL: f32 = THUMB_SIZE + THUMB_PADDING * 2.0 + GRID_SPACING;

pub const THUMBNAIL_BATCH_SIZE: usize = 32;
pub const EXPORT_BATCH_SIZE: usize = 16;

const LAST_ARCHIVE_DIR: &str = "last_archive_dir";
const LAST_EXPORT_DIR: &str = "last_export_dir";

pub fn is_supported_image(name: &str) -> bool {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs_next::home_dir().map(|d| d.join(".photo-sorter"))
}

fn save_dir(key: &str, path: &Path) {
    let Some(dir) = config_dir() else {
        return;
    };
    if let Err(e) = std::fs::create_dir_all(&dir)
        .and_then(|()| std::fs::write(dir.join(key), path.to_string_lossy().as_bytes()))
    {
        log::warn!("Failed to remember {key}: {e}");
    }
}

fn load_dir(key: &str) -> Option<PathBuf> {
    let dir = config_dir()?;
    let data = std::fs::read_to_string(dir.join(key)).ok()?;
    let path = PathBuf::from(data.trim());
    path.is_dir().then_some(path)
}

/// Remembers the folder the last archive was picked from.
pub fn save_last_archive_dir(archive: &Path) {
    if let Some(parent) = archive.parent() {
        save_dir(LAST_ARCHIVE_DIR, parent);
    }
}

pub fn load_last_archive_dir() -> Option<PathBuf> {
    load_dir(LAST_ARCHIVE_DIR)
}

pub fn save_last_export_dir(path: &Path) {
    save_dir(LAST_EXPORT_DIR, path);
}

pub fn load_last_export_dir() -> Option<PathBuf> {
    load_dir(LAST_EXPORT_DIR)
}

//! Pulls the photos out of a zip archive into a scratch directory that lives
//! as long as the returned [`ExtractedArchive`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{ArchiveError, ArchiveResult};
use crate::photo::Photo;
use crate::settings;

#[derive(Debug)]
pub struct ExtractedArchive {
    source: PathBuf,
    /// Keeps the extracted files on disk until dropped.
    _dir: TempDir,
    photos: Vec<Photo>,
}

impl ExtractedArchive {
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Photos in archive entry order; `original_index` is the position here.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }
}

/// Extracts every supported image, skipping directories and macOS resource
/// forks. Entries with unsafe paths are ignored, and entries that fail to
/// read are logged and left out without shifting the others' indices.
pub fn extract(archive_path: &Path) -> ArchiveResult<ExtractedArchive> {
    let file = File::open(archive_path).map_err(|source| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let dir = tempfile::Builder::new().prefix("photo-sorter-").tempdir()?;

    let mut photos = Vec::new();
    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable archive entry {}: {}", i, e);
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        let Some(relative) = entry.enclosed_name() else {
            log::warn!("Skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        if relative.components().any(|c| c.as_os_str() == "__MACOSX") {
            continue;
        }
        let Some(file_name) = relative
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
        else {
            continue;
        };
        if file_name.starts_with("._") || !settings::is_supported_image(&file_name) {
            continue;
        }

        // Prefixed so equal names from different folders cannot collide.
        let target = dir.path().join(format!("{:05}_{}", photos.len(), file_name));
        if let Err(e) = write_entry(&mut entry, &target, &file_name) {
            log::warn!("{e}");
            let _ = std::fs::remove_file(&target);
            continue;
        }

        let index = photos.len();
        photos.push(Photo::new(target, file_name, index));
    }

    log::info!(
        "Extracted {} photos from {}",
        photos.len(),
        archive_path.display()
    );
    Ok(ExtractedArchive {
        source: archive_path.to_path_buf(),
        _dir: dir,
        photos,
    })
}

fn write_entry(entry: &mut impl std::io::Read, target: &Path, name: &str) -> ArchiveResult<()> {
    let extract_err = |source| ArchiveError::Extract {
        name: name.to_string(),
        source,
    };
    let mut out = File::create(target).map_err(extract_err)?;
    std::io::copy(entry, &mut out).map_err(extract_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_keeps_images_in_entry_order() {
        let scratch = tempfile::tempdir().unwrap();
        let zip_path = scratch.path().join("batch.zip");
        build_zip(
            &zip_path,
            &[
                ("z.JPG", "first"),
                ("notes.txt", "skip"),
                ("dir/", ""),
                ("dir/a.png", "second"),
                ("__MACOSX/dir/._a.png", "fork"),
                ("other/z.JPG", "third"),
            ],
        );

        let extracted = extract(&zip_path).unwrap();
        let photos = extracted.photos();
        let names: Vec<&str> = photos.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["z.JPG", "a.png", "z.JPG"]);
        assert_eq!(
            photos.iter().map(|p| p.original_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_ne!(photos[0].source_path, photos[2].source_path);
        assert_eq!(std::fs::read(&photos[2].source_path).unwrap(), b"third");
    }

    #[test]
    fn test_extracted_files_are_removed_on_drop() {
        let scratch = tempfile::tempdir().unwrap();
        let zip_path = scratch.path().join("one.zip");
        build_zip(&zip_path, &[("a.gif", "gif")]);

        let extracted = extract(&zip_path).unwrap();
        let path = extracted.photos()[0].source_path.clone();
        assert!(path.exists());
        drop(extracted);
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_entry_is_skipped() {
        let scratch = tempfile::tempdir().unwrap();
        let zip_path = scratch.path().join("damaged.zip");
        let mut zip = zip::ZipWriter::new(File::create(&zip_path).unwrap());
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in [("a.jpg", "aaaaaaaa"), ("b.jpg", "BBBBBBBB"), ("c.jpg", "cccccccc")] {
            zip.start_file(name, options).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
        zip.finish().unwrap();

        // Damage b.jpg's stored bytes so its checksum no longer matches.
        let mut bytes = std::fs::read(&zip_path).unwrap();
        let at = bytes.windows(8).position(|w| w == b"BBBBBBBB").unwrap();
        bytes[at] = b'X';
        std::fs::write(&zip_path, bytes).unwrap();

        let extracted = extract(&zip_path).unwrap();
        let photos = extracted.photos();
        let names: Vec<&str> = photos.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        assert_eq!(
            photos.iter().map(|p| p.original_index).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(std::fs::read(&photos[1].source_path).unwrap(), b"cccccccc");

        let dir = photos[0].source_path.parent().unwrap();
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 2);
    }

    #[test]
    fn test_not_a_zip() {
        let scratch = tempfile::tempdir().unwrap();
        let bogus = scratch.path().join("bogus.zip");
        std::fs::write(&bogus, b"definitely not a zip").unwrap();
        assert!(matches!(extract(&bogus), Err(ArchiveError::Read(_))));
        assert!(matches!(
            extract(&scratch.path().join("missing.zip")),
            Err(ArchiveError::Open { .. })
        ));
    }
}

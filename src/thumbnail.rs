use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::photo::{PhotoId, Rotation};

/// Decoded thumbnail pixels, already upright per EXIF but without the user's
/// rotation, so turning a photo never needs another decode.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    /// Pixels with `rotation` applied, as (rgba, width, height).
    pub fn rotated(&self, rotation: Rotation) -> (Vec<u8>, u32, u32) {
        if rotation.is_none() {
            return (self.rgba.clone(), self.width, self.height);
        }
        let Some(img) = RgbaImage::from_raw(self.width, self.height, self.rgba.clone()) else {
            return (self.rgba.clone(), self.width, self.height);
        };
        let turned = apply_rotation(DynamicImage::ImageRgba8(img), rotation).to_rgba8();
        let (w, h) = turned.dimensions();
        (turned.into_raw(), w, h)
    }
}

/// Generate a thumbnail no larger than `max_size` on either side.
pub fn generate_thumbnail(path: &Path, max_size: u32) -> Thumbnail {
    let (orientation, exif_thumb) = read_exif_info(path);

    // Embedded EXIF thumbnail avoids a full decode when it is big enough.
    if let Some(data) = exif_thumb {
        let large_enough = {
            let mut d = jpeg_decoder::Decoder::new(Cursor::new(&data));
            d.read_info()
                .ok()
                .and_then(|()| d.info())
                .is_some_and(|i| (i.width as u32).min(i.height as u32) >= max_size)
        };
        if large_enough {
            if let Ok(img) = image::load_from_memory(&data) {
                return finish(img, max_size, orientation);
            }
        }
    }

    if let Some(img) = decode_jpeg_scaled(path, max_size) {
        return finish(img, max_size, orientation);
    }

    match image::open(path) {
        Ok(img) => finish(img, max_size, orientation),
        Err(e) => {
            log::warn!("Failed to load image {}: {}", path.display(), e);
            placeholder_thumbnail(max_size)
        }
    }
}

fn finish(img: DynamicImage, max_size: u32, orientation: u32) -> Thumbnail {
    let thumb = img.resize(max_size, max_size, FilterType::Triangle);
    let thumb = apply_orientation(thumb, orientation);
    let (width, height) = thumb.dimensions();
    Thumbnail {
        rgba: thumb.to_rgba8().into_raw(),
        width,
        height,
    }
}

/// Decode a JPEG at reduced resolution using DCT scaling.
/// Returns None for non-JPEG files, small images, or on failure.
fn decode_jpeg_scaled(path: &Path, max_size: u32) -> Option<DynamicImage> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if ext != "jpg" && ext != "jpeg" {
        return None;
    }

    let file = std::fs::File::open(path).ok()?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));

    let max_u16 = max_size as u16;
    let (actual_w, actual_h) = decoder.scale(max_u16, max_u16).ok()?;

    let info = decoder.info()?;
    if actual_w == info.width && actual_h == info.height {
        return None;
    }

    let pixels = decoder.decode().ok()?;

    match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => {
            image::RgbImage::from_raw(actual_w as u32, actual_h as u32, pixels)
                .map(DynamicImage::ImageRgb8)
        }
        jpeg_decoder::PixelFormat::L8 => {
            image::GrayImage::from_raw(actual_w as u32, actual_h as u32, pixels)
                .map(DynamicImage::ImageLuma8)
        }
        _ => None,
    }
}

/// Single file open + EXIF parse: (orientation, embedded thumbnail JPEG bytes).
fn read_exif_info(path: &Path) -> (u32, Option<Vec<u8>>) {
    let Ok(file) = std::fs::File::open(path) else {
        return (1, None);
    };
    let mut reader = BufReader::new(file);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut reader) else {
        return (1, None);
    };

    let orientation = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1);

    let thumbnail = (|| {
        let offset = exif
            .get_field(exif::Tag::JPEGInterchangeFormat, exif::In::THUMBNAIL)?
            .value
            .get_uint(0)? as u64;
        let length = exif
            .get_field(exif::Tag::JPEGInterchangeFormatLength, exif::In::THUMBNAIL)?
            .value
            .get_uint(0)? as usize;
        if length == 0 || length > 1_000_000 {
            return None;
        }
        reader.seek(SeekFrom::Start(offset)).ok()?;
        let mut data = vec![0u8; length];
        reader.read_exact(&mut data).ok()?;
        Some(data)
    })();

    (orientation, thumbnail)
}

fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img, // 1 = normal, or unknown
    }
}

pub fn apply_rotation(img: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => img,
        Rotation::Cw90 => img.rotate90(),
        Rotation::Cw180 => img.rotate180(),
        Rotation::Cw270 => img.rotate270(),
    }
}

/// Full-size image, upright per EXIF and turned by the user's rotation.
pub fn open_oriented(path: &Path, rotation: Rotation) -> Option<RgbaImage> {
    let img = image::open(path).ok()?;
    let (orientation, _) = read_exif_info(path);
    let upright = apply_orientation(img, orientation);
    Some(apply_rotation(upright, rotation).to_rgba8())
}

fn placeholder_thumbnail(size: u32) -> Thumbnail {
    Thumbnail {
        rgba: vec![60u8; (size * size * 4) as usize],
        width: size,
        height: size,
    }
}

/// Generate thumbnails for a batch of photos in parallel using rayon.
pub fn generate_thumbnails_parallel(
    photos: &[(PhotoId, std::path::PathBuf)],
    max_size: u32,
) -> Vec<(PhotoId, Thumbnail)> {
    use rayon::prelude::*;

    photos
        .par_iter()
        .map(|(id, path)| (*id, generate_thumbnail(path, max_size)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_fits_and_keeps_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(400, 100).save(&path).unwrap();

        let thumb = generate_thumbnail(&path, 80);
        assert_eq!((thumb.width, thumb.height), (80, 20));
        assert_eq!(thumb.rgba.len(), 80 * 20 * 4);

        let (_, w, h) = thumb.rotated(Rotation::Cw90);
        assert_eq!((w, h), (20, 80));
    }

    #[test]
    fn test_unreadable_file_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"nope").unwrap();
        let thumb = generate_thumbnail(&path, 16);
        assert_eq!((thumb.width, thumb.height), (16, 16));
    }
}

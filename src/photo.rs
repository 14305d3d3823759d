use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

/// Opaque photo identity, minted once when the archive is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(Uuid);

impl PhotoId {
    pub fn new() -> Self {
        PhotoId(Uuid::new_v4())
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    /// Normalizes any multiple of 90 (negative values included). Other angles
    /// are rejected.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        (degrees % 90 == 0).then(|| Self::from_quarter_turns(degrees / 90))
    }

    fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::None,
            1 => Rotation::Cw90,
            2 => Rotation::Cw180,
            _ => Rotation::Cw270,
        }
    }

    /// Adds `quarter_turns` clockwise steps (negative turns go counter-clockwise).
    pub fn turned(self, quarter_turns: i32) -> Self {
        Self::from_quarter_turns(self.degrees() as i32 / 90 + quarter_turns)
    }

    pub fn is_none(self) -> bool {
        self == Rotation::None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    pub source_path: PathBuf,
    pub file_name: String,
    /// Position in the archive; the catalog sorts on it when photos come back.
    pub original_index: usize,
    pub rotation: Rotation,
}

impl Photo {
    pub fn new(source_path: PathBuf, file_name: impl Into<String>, original_index: usize) -> Self {
        Self {
            id: PhotoId::new(),
            source_path,
            file_name: file_name.into(),
            original_index,
            rotation: Rotation::None,
        }
    }

    /// Lowercased text after the last `.` of the file name, empty when there is none.
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps_both_ways() {
        assert_eq!(Rotation::Cw270.turned(1), Rotation::None);
        assert_eq!(Rotation::None.turned(-1), Rotation::Cw270);
        assert_eq!(Rotation::Cw90.turned(2), Rotation::Cw270);
        assert_eq!(Rotation::Cw180.turned(-7), Rotation::Cw270);
        assert_eq!(Rotation::from_degrees(-450), Some(Rotation::Cw270));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Cw270));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn test_photo_ids_are_distinct_for_identical_names() {
        let a = Photo::new(PathBuf::from("/tmp/x/a.jpg"), "a.jpg", 0);
        let b = Photo::new(PathBuf::from("/tmp/x/a.jpg"), "a.jpg", 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_extension_uses_last_dot_and_lowercases() {
        let p = Photo::new(PathBuf::from("x"), "holiday.2019.JPG", 0);
        assert_eq!(p.extension(), "jpg");
        let p = Photo::new(PathBuf::from("x"), "README", 0);
        assert_eq!(p.extension(), "");
    }
}

use std::path::PathBuf;

/// Subtitle used when a filename carries no artist part.
pub const UNKNOWN_ARTIST: &str = "Unknown artist";

/// One discovered audio asset: where it was found and how to open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Path as discovered, relative to the library root, `/`-separated.
    pub path: String,
    /// Locator handed to the playback backend.
    pub locator: PathBuf,
}

impl AssetEntry {
    pub fn new(path: impl Into<String>, locator: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            locator: locator.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub source: PathBuf,
    pub title: String,
    pub subtitle: String,
    /// Raw final path segment, used for ordering.
    pub file_name: String,
    /// Asset path; unique within a catalog.
    pub key: String,
}

/// The ordered, immutable track list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Wrap already-ordered tracks.
    pub(crate) fn from_sorted(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Map any integer onto a valid index using non-negative modulo.
    ///
    /// Returns `None` for an empty catalog.
    pub fn wrap_index(&self, index: i64) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len() as i64;
        Some(index.rem_euclid(len) as usize)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

//! Turn discovered assets into the sorted `Catalog`.
//!
//! Titles come from the `Artist - Title.ext` filename convention. Nothing in
//! here fails: odd names degrade to a fallback label.

use std::path::Path;

use lofty::prelude::*;
use percent_encoding::percent_decode_str;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::config::LibrarySettings;

use super::model::{AssetEntry, Catalog, Track, UNKNOWN_ARTIST};

const ARTIST_TITLE_SEPARATOR: &str = " - ";
const UNTITLED: &str = "Untitled";

/// Final path segment of an asset path, accepting `/` and `\` separators.
pub(crate) fn raw_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Percent-decode `raw` and strip a known audio extension (case-insensitive).
pub(crate) fn clean_name(raw: &str, extensions: &[String]) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy().into_owned();

    if let Some((stem, ext)) = decoded.rsplit_once('.') {
        let ext = ext.to_ascii_lowercase();
        let known = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.'))
            .any(|e| e.eq_ignore_ascii_case(&ext));
        if known {
            return stem.to_string();
        }
    }
    decoded
}

/// Derive `(title, subtitle)` from a raw filename.
pub(crate) fn title_and_subtitle(raw: &str, extensions: &[String]) -> (String, String) {
    let clean = clean_name(raw, extensions);

    if let Some((artist, title)) = clean.split_once(ARTIST_TITLE_SEPARATOR) {
        let (artist, title) = (artist.trim(), title.trim());
        if !title.is_empty() {
            let subtitle = if artist.is_empty() {
                UNKNOWN_ARTIST
            } else {
                artist
            };
            return (title.to_string(), subtitle.to_string());
        }
    }

    let title = [clean.trim(), raw.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(UNTITLED);
    (title.to_string(), UNKNOWN_ARTIST.to_string())
}

/// Ordering key: case and accent differences on the same base letter compare equal.
pub(crate) fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read title/artist tags, keeping only non-empty values.
fn read_tags(path: &Path) -> (Option<String>, Option<String>) {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return (None, None);
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return (None, None);
    };
    let clean = |v: Option<std::borrow::Cow<'_, str>>| {
        v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };
    (clean(tag.title()), clean(tag.artist()))
}

fn track_from_asset(asset: AssetEntry, settings: &LibrarySettings) -> Track {
    let file_name = raw_file_name(&asset.path).to_string();
    let (mut title, mut subtitle) = title_and_subtitle(&file_name, &settings.extensions);

    if settings.prefer_tags {
        let (tag_title, tag_artist) = read_tags(&asset.locator);
        if let Some(t) = tag_title {
            title = t;
        }
        if let Some(a) = tag_artist {
            subtitle = a;
        }
    }

    Track {
        source: asset.locator,
        title,
        subtitle,
        file_name,
        key: asset.path,
    }
}

/// Build the catalog from a set of assets.
///
/// Duplicate asset paths collapse to the first occurrence so keys stay unique.
pub fn build_catalog<I>(assets: I, settings: &LibrarySettings) -> Catalog
where
    I: IntoIterator<Item = AssetEntry>,
{
    let mut seen = std::collections::HashSet::new();
    let mut tracks: Vec<Track> = assets
        .into_iter()
        .filter(|a| seen.insert(a.path.clone()))
        .map(|a| track_from_asset(a, settings))
        .collect();

    tracks.sort_by_cached_key(|t| (collation_key(&t.file_name), t.file_name.clone(), t.key.clone()));

    tracing::debug!(tracks = tracks.len(), "catalog built");
    Catalog::from_sorted(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        LibrarySettings::default().extensions
    }

    #[test]
    fn raw_file_name_takes_last_segment() {
        assert_eq!(raw_file_name("assets/audio/a.mp3"), "a.mp3");
        assert_eq!(raw_file_name(r"C:\music\b.ogg"), "b.ogg");
        assert_eq!(raw_file_name("plain.wav"), "plain.wav");
        assert_eq!(raw_file_name("dir/"), "");
    }

    #[test]
    fn clean_name_decodes_and_strips_known_extensions_only() {
        assert_eq!(clean_name("My%20Song.MP3", &exts()), "My Song");
        assert_eq!(clean_name("notes.txt", &exts()), "notes.txt");
        assert_eq!(clean_name("no_extension", &exts()), "no_extension");
        assert_eq!(clean_name("caf%C3%A9.flac", &exts()), "café");
    }

    #[test]
    fn artist_and_title_are_split_on_first_separator() {
        let (t, s) = title_and_subtitle("Daft Punk - One More Time.mp3", &exts());
        assert_eq!(t, "One More Time");
        assert_eq!(s, "Daft Punk");

        let (t, s) = title_and_subtitle("A - B - C.mp3", &exts());
        assert_eq!(t, "B - C");
        assert_eq!(s, "A");
    }

    #[test]
    fn missing_artist_falls_back_to_unknown() {
        let (t, s) = title_and_subtitle("Interstellar Theme.mp3", &exts());
        assert_eq!(t, "Interstellar Theme");
        assert_eq!(s, UNKNOWN_ARTIST);

        let (t, s) = title_and_subtitle(" - Lonely Title.mp3", &exts());
        assert_eq!(t, "Lonely Title");
        assert_eq!(s, UNKNOWN_ARTIST);
    }

    #[test]
    fn empty_title_candidate_uses_whole_clean_name() {
        let (t, s) = title_and_subtitle("Artist - .mp3", &exts());
        assert_eq!(t, "Artist -");
        assert_eq!(s, UNKNOWN_ARTIST);
    }

    #[test]
    fn title_is_never_empty() {
        for raw in ["", ".mp3", "   .ogg", " - .wav", "%20", "-", " - "] {
            let (t, _) = title_and_subtitle(raw, &exts());
            assert!(!t.is_empty(), "empty title for {raw:?}");
        }
        assert_eq!(title_and_subtitle(".mp3", &exts()).0, ".mp3");
        assert_eq!(title_and_subtitle("", &exts()).0, UNTITLED);
    }

    #[test]
    fn collation_key_folds_case_and_accents() {
        assert_eq!(collation_key("Édith"), collation_key("edith"));
        assert_eq!(collation_key("ABC"), "abc");
    }

    #[test]
    fn catalog_sorts_case_insensitively() {
        let assets = ["b.mp3", "A.mp3", "a2.mp3"]
            .into_iter()
            .map(|n| AssetEntry::new(n, format!("/music/{n}")));
        let catalog = build_catalog(assets, &LibrarySettings::default());
        let names: Vec<&str> = catalog.iter().map(|t| t.file_name.as_str()).collect();
        assert_eq!(names, vec!["A.mp3", "a2.mp3", "b.mp3"]);
    }

    #[test]
    fn catalog_ties_are_broken_by_raw_bytes() {
        let assets = ["e.mp3", "é.mp3", "E.mp3"]
            .into_iter()
            .map(|n| AssetEntry::new(n, format!("/music/{n}")));
        let catalog = build_catalog(assets, &LibrarySettings::default());
        let names: Vec<&str> = catalog.iter().map(|t| t.file_name.as_str()).collect();
        assert_eq!(names, vec!["E.mp3", "e.mp3", "é.mp3"]);
    }

    #[test]
    fn empty_asset_set_yields_empty_catalog() {
        let catalog = build_catalog(Vec::new(), &LibrarySettings::default());
        assert!(catalog.is_empty());
        assert_eq!(catalog.wrap_index(3), None);
    }

    #[test]
    fn duplicate_paths_are_collapsed() {
        let assets = vec![
            AssetEntry::new("x.mp3", "/a/x.mp3"),
            AssetEntry::new("x.mp3", "/b/x.mp3"),
            AssetEntry::new("sub/x.mp3", "/a/sub/x.mp3"),
        ];
        let catalog = build_catalog(assets, &LibrarySettings::default());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().key, "sub/x.mp3");
        assert_eq!(catalog.get(1).unwrap().source, Path::new("/a/x.mp3"));
    }

    #[test]
    fn prefer_tags_keeps_filename_labels_when_tags_are_unreadable() {
        let settings = LibrarySettings {
            prefer_tags: true,
            ..LibrarySettings::default()
        };
        let catalog = build_catalog(
            vec![AssetEntry::new("Artist - Song.mp3", "/does/not/exist.mp3")],
            &settings,
        );
        let t = catalog.get(0).unwrap();
        assert_eq!(t.title, "Song");
        assert_eq!(t.subtitle, "Artist");
    }
}

use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::AssetEntry;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// `/`-joined path of `path` relative to `root`.
fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `dir` and collect every audio asset it holds.
///
/// The result is unordered; `build_catalog` owns the ordering.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<AssetEntry> {
    let mut assets: Vec<AssetEntry> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(%err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_audio_file(path, settings) {
            let locator = path
                .canonicalize()
                .unwrap_or_else(|_| path.to_path_buf());
            assets.push(AssetEntry::new(relative_key(dir, path), locator));
        }
    }

    tracing::info!(dir = %dir.display(), assets = assets.len(), "library scanned");
    assets
}

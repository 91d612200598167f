use std::path::{Path, PathBuf};

use lofty::prelude::*;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::Track;

/// Result of expanding a drop into tracks.
#[derive(Debug, Default)]
pub struct DropOutcome {
    /// Tracks in drop order; directories contribute their sorted contents.
    pub tracks: Vec<Track>,
    /// Dropped paths that did not exist.
    pub missing: Vec<PathBuf>,
}

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

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Build a `Track` for `path`, reading tags when the file has any.
///
/// Unreadable or tagless files are still accepted; playback is where an
/// unsupported file gets reported.
pub(super) fn read_track(path: &Path, settings: &LibrarySettings) -> Track {
    let mut track = Track::from_path(path);

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            track.duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                track.title = non_empty(tag.title());
                track.artist = non_empty(tag.artist());
                track.album = non_empty(tag.album());
            }
        }
        Err(e) => debug!("no tags for {}: {e}", path.display()),
    }

    track.display_name = display_from_fields(
        path,
        track.title.as_deref(),
        track.artist.as_deref(),
        track.album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );
    track
}

/// Collect the audio files below `dir`, sorted by display name.
pub(super) fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

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
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_audio_file(path, settings) {
            tracks.push(read_track(path, settings));
        }
    }

    tracks.sort_by_key(|t| t.display_name.to_lowercase());
    tracks
}

/// Turn dropped paths into tracks.
///
/// Files are taken as-is whatever their extension; directories are scanned
/// with the library settings. Paths that do not exist are reported back.
pub fn expand_drop(paths: &[PathBuf], settings: &LibrarySettings) -> DropOutcome {
    let mut outcome = DropOutcome::default();

    for path in paths {
        if path.is_dir() {
            let found = scan_dir(path, settings);
            debug!("dropped directory {} holds {} tracks", path.display(), found.len());
            outcome.tracks.extend(found);
        } else if path.is_file() {
            outcome.tracks.push(read_track(path, settings));
        } else {
            warn!("dropped path does not exist: {}", path.display());
            outcome.missing.push(path.clone());
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackDisplayField;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_dir_filters_non_audio_and_sorts_by_display_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan_dir(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].display_name, "A.ogg");
        assert_eq!(tracks[1].display_name, "b.MP3");
        assert!(tracks.iter().all(|t| t.title.is_none()));
    }

    #[test]
    fn scan_dir_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            display_fields: vec![TrackDisplayField::Stem],
            ..LibrarySettings::default()
        };
        let tracks = scan_dir(dir.path(), &settings);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display_name, "visible");
    }

    #[test]
    fn scan_dir_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let tracks = scan_dir(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display_name, "root.mp3");
    }

    #[test]
    fn scan_dir_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let tracks = scan_dir(dir.path(), &settings);

        let names: Vec<&str> = tracks.iter().map(|t| t.display_name.as_str()).collect();
        assert!(names.contains(&"root.mp3"));
        assert!(names.contains(&"one.mp3"));
        assert!(!names.contains(&"two.mp3"));
    }

    #[test]
    fn expand_drop_accepts_any_dropped_file_and_reports_missing_paths() {
        let dir = tempdir().unwrap();
        let song = dir.path().join("song1.mp3");
        let notes = dir.path().join("notes.txt");
        fs::write(&song, b"not real").unwrap();
        fs::write(&notes, b"still accepted").unwrap();
        let gone = dir.path().join("gone.mp3");

        let outcome = expand_drop(
            &[song.clone(), gone.clone(), notes.clone()],
            &LibrarySettings::default(),
        );

        let names: Vec<&str> = outcome
            .tracks
            .iter()
            .map(|t| t.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["song1.mp3", "notes.txt"]);
        assert_eq!(outcome.tracks[0].path, song);
        assert_eq!(outcome.missing, vec![gone]);
    }

    #[test]
    fn expand_drop_keeps_drop_order_across_files_and_directories() {
        let dir = tempdir().unwrap();
        let album = dir.path().join("album");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("02.flac"), b"x").unwrap();
        fs::write(album.join("01.flac"), b"x").unwrap();
        let single = dir.path().join("single.wav");
        fs::write(&single, b"x").unwrap();

        let outcome = expand_drop(&[single, album], &LibrarySettings::default());
        let names: Vec<&str> = outcome
            .tracks
            .iter()
            .map(|t| t.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["single.wav", "01.flac", "02.flac"]);
        assert!(outcome.missing.is_empty());
    }
}

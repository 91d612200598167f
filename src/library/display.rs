use std::path::Path;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes the file name and metadata fields in the configured order
/// and falls back to the file name when no parts were produced.
pub fn display_from_fields(
    path: &Path,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let part = match f {
            TrackDisplayField::Filename => Some(file_name.clone()),
            TrackDisplayField::Stem => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string),
            TrackDisplayField::Title => title.map(str::to_string),
            TrackDisplayField::Artist => artist.map(str::to_string),
            TrackDisplayField::Album => album.map(str::to_string),
        };

        if let Some(p) = part.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(p.to_string());
        }
    }

    if parts.is_empty() {
        file_name
    } else {
        parts.join(sep)
    }
}

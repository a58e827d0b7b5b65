//! Listing of rendered files on disk
//!
//! Purely a directory scan, newest first; nothing is cached.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::models::RenderFileEntry;

/// File size in megabytes, rounded to two decimals
pub(crate) fn size_in_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / 1024.0 / 1024.0;
    (mb * 100.0).round() / 100.0
}

/// List rendered MP4 files, sorted by creation time descending
pub fn list_renders(renders_dir: &Path, public_base_url: &str) -> io::Result<Vec<RenderFileEntry>> {
    let mut entries: Vec<(SystemTime, RenderFileEntry)> = Vec::new();

    for entry in fs::read_dir(renders_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("mp4") {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let metadata = entry.metadata()?;
        // Creation time is not available on every filesystem
        let created = metadata.created().or_else(|_| metadata.modified())?;

        entries.push((
            created,
            RenderFileEntry {
                filename: filename.to_string(),
                url: format!("{public_base_url}/renders/{filename}"),
                size_mb: size_in_mb(metadata.len()),
            },
        ));
    }

    entries.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(entries.into_iter().map(|(_, entry)| entry).collect())
}

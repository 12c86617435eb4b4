use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;
use walkdir::WalkDir;

/// File name suffix of snapshot files inside a snapshot directory.
pub const SNAPSHOT_SUFFIX: &str = ".classes.json";

/// Every `*.classes.json` file below `root`, sorted by path.
pub fn discover_snapshot_files(root: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = pathbuf_to_utf8(entry.into_path()) else {
            continue;
        };
        if path.as_str().ends_with(SNAPSHOT_SUFFIX) {
            out.push(path);
        }
    }

    // Stable order.
    out.sort();
    Ok(out)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}

//! Snapshot adapters: discover and read code-model snapshots from disk.
//!
//! This crate is allowed to do filesystem IO. Extracting the model from
//! compiled code is the job of an external exporter; this crate only reads
//! what it wrote.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use archrule_domain::{ClassModel, Classes};
use camino::Utf8Path;
use rayon::prelude::*;

pub use discover::{SNAPSHOT_SUFFIX, discover_snapshot_files};
pub use parse::{SnapshotFile, parse_snapshot};

/// Load a snapshot from a single JSON file or from every `*.classes.json`
/// file below a directory.
///
/// Classes from all files are merged and sorted by name. A class name that
/// appears twice is an error.
pub fn load_classes(path: &Utf8Path) -> anyhow::Result<Classes> {
    let files = if path.is_dir() {
        discover_snapshot_files(path).with_context(|| format!("discover snapshots in {path}"))?
    } else {
        vec![path.to_path_buf()]
    };

    let parts: Vec<Vec<ClassModel>> = files
        .par_iter()
        .map(|file| -> anyhow::Result<Vec<ClassModel>> {
            let text = std::fs::read_to_string(file).with_context(|| format!("read {file}"))?;
            let snapshot = parse_snapshot(&text).with_context(|| format!("parse {file}"))?;
            Ok(snapshot.classes)
        })
        .collect::<anyhow::Result<_>>()?;

    let classes = merge(parts)?;
    tracing::debug!(files = files.len(), classes = classes.len(), "loaded snapshot");
    Ok(Classes::new(classes))
}

/// Concatenate in input order, then sort by class name.
pub fn merge(parts: Vec<Vec<ClassModel>>) -> anyhow::Result<Vec<ClassModel>> {
    let mut classes: Vec<ClassModel> = parts.into_iter().flatten().collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));
    if let Some(dup) = classes.windows(2).find(|w| w[0].name == w[1].name) {
        anyhow::bail!("duplicate class in snapshot: {}", dup[0].name);
    }
    Ok(classes)
}

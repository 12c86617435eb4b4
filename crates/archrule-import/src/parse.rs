use archrule_domain::ClassModel;
use serde::{Deserialize, Serialize};

/// On-disk snapshot layout: `{"classes": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub classes: Vec<ClassModel>,
}

pub fn parse_snapshot(text: &str) -> anyhow::Result<SnapshotFile> {
    let snapshot: SnapshotFile = serde_json::from_str(text)?;
    if let Some(blank) = snapshot.classes.iter().position(|c| c.name.trim().is_empty()) {
        anyhow::bail!("class #{blank} has an empty name");
    }
    Ok(snapshot)
}

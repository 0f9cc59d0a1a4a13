use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::domain::product::Record;

const INDENT: &[u8] = b"    ";

/// Renders records as an indented JSON array. Output is a pure function of
/// the input, so identical records always give identical bytes.
pub fn to_json(records: &[Record]) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut serializer)?;

    Ok(String::from_utf8(buf)?)
}

/// Writes the records to a sibling temp file in one call, then renames it
/// over `path`.
pub fn save_to_json(records: &[Record], path: &Path) -> anyhow::Result<()> {
    log::info!("Saving data to {}", path.display());
    let json = to_json(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let staging = staging_path(path);
    std::fs::write(&staging, json)
        .with_context(|| format!("Failed to write {}", staging.display()))?;
    std::fs::rename(&staging, path)
        .with_context(|| format!("Failed to move output into {}", path.display()))?;

    log::info!("Data saved successfully ({} records)", records.len());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// File: src/persistence.rs
use crate::core::table::MappingTable;
use crate::core::types::{GlyphEntry, SequenceRule};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The on-disk override format: flat glyph records plus sequence rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFile {
    #[serde(default)]
    pub glyphs: Vec<GlyphEntry>,
    #[serde(default)]
    pub sequences: Vec<SequenceRule>,
}

impl OverrideFile {
    /// Merges these overrides onto the built-in table. Malformed records fail here.
    pub fn into_table(self) -> Result<MappingTable> {
        MappingTable::load_with_sequences(self.glyphs, self.sequences)
    }

    /// Every record of `table`, suitable for editing and loading back.
    pub fn from_table(table: &MappingTable) -> Self {
        Self {
            glyphs: table.entries().into_iter().cloned().collect(),
            sequences: table.sequences().to_vec(),
        }
    }
}

/// Writes through a temp file in the destination directory, then renames.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn save_overrides(overrides: &OverrideFile, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(writer, overrides)?;
        Ok(())
    })?;
    log::info!(
        "saved {} glyph and {} sequence overrides to {}",
        overrides.glyphs.len(),
        overrides.sequences.len(),
        path.display()
    );
    Ok(())
}

pub fn load_overrides(path: &Path) -> Result<OverrideFile> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let overrides: OverrideFile = serde_json::from_reader(reader)?;
    log::debug!(
        "read {} glyph overrides from {}",
        overrides.glyphs.len(),
        path.display()
    );
    Ok(overrides)
}

/// Compact binary snapshot of a fully built table.
pub fn save_table(table: &MappingTable, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        bincode::serialize_into(writer, table)?;
        Ok(())
    })?;
    log::info!("saved table snapshot ({} glyphs) to {}", table.len(), path.display());
    Ok(())
}

/// Loads a snapshot and re-checks every record. The sequence index is not
/// part of the file; it is rebuilt from the loaded rules.
pub fn load_table(path: &Path) -> Result<MappingTable> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let table: MappingTable = bincode::deserialize_from(reader)?;
    table.validate()?;
    Ok(table)
}

use super::{check_count, record_offset, RomTable};
use crate::config::RomConfig;
use crate::constants::{limits, text};
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;
use crate::utils::decode_text;

/// Region map names, indexed by map name id
#[derive(Debug, Clone, Default)]
pub struct MapNameTable {
    names: Vec<String>,
    first_id: u8,
}

impl MapNameTable {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up the name a map header refers to by its stored name id
    pub fn name_for(&self, name_id: u8) -> Option<&str> {
        let index = name_id.checked_sub(self.first_id)?;
        self.names.get(index as usize).map(String::as_str)
    }
}

impl RomTable for MapNameTable {
    const KIND: TableKind = TableKind::MapNames;

    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError> {
        check_count(config.map_name_count, limits::MAP_NAMES)?;

        let mut names = Vec::with_capacity(config.map_name_count);
        for i in 0..config.map_name_count {
            let entry = record_offset(config.map_names, i, config.map_name_stride)?;
            let pointer_at = u32::try_from(config.map_name_pointer_offset)
                .ok()
                .and_then(|delta| entry.checked_add(delta))
                .ok_or_else(|| TableReadError::Malformed {
                    index: i,
                    reason: format!("name pointer at +{} is outside the address space", config.map_name_pointer_offset),
                })?;
            let string = rom.read_pointer(pointer_at)?;
            names.push(read_string(rom, string)?);
        }

        Ok(Self {
            names,
            first_id: config.first_map_name_id,
        })
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

// Strings may sit at the very end of the image, so clamp the window
fn read_string<R: RomAccess + ?Sized>(rom: &R, offset: u32) -> Result<String, TableReadError> {
    let available = rom.size().saturating_sub(offset as usize);
    let bytes = rom.read_bytes(offset, available.min(text::MAX_LEN))?;
    Ok(decode_text(bytes))
}

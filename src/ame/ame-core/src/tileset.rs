use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::constants::records;
use crate::error::RomError;
use crate::rom::RomAccess;
use log::debug;

/// Anything holding decoded tileset data that must not outlive the map tables
pub trait TilesetStore {
    fn clear(&mut self);
}

/// Tileset header as referenced by a map layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub compressed: bool,
    pub secondary: bool,
    pub tiles: u32,
    pub palettes: u32,
    pub blocks: u32,
    pub animation: Option<u32>,
    pub behaviors: u32,
}

impl Tileset {
    fn read<R: RomAccess + ?Sized>(rom: &R, offset: u32) -> Result<Self, RomError> {
        let raw = rom.read_bytes(offset, records::TILESET_HEADER)?;
        Ok(Self {
            compressed: raw[0] != 0,
            secondary: raw[1] != 0,
            tiles: rom.read_pointer(offset + 4)?,
            palettes: rom.read_pointer(offset + 8)?,
            blocks: rom.read_pointer(offset + 12)?,
            animation: rom.read_optional_pointer(offset + 16)?,
            behaviors: rom.read_pointer(offset + 20)?,
        })
    }
}

/// Memoises tileset headers by file offset
#[derive(Debug, Default)]
pub struct TilesetCache {
    entries: HashMap<u32, Tileset>,
}

impl TilesetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<R: RomAccess + ?Sized>(&mut self, rom: &R, offset: u32) -> Result<&Tileset, RomError> {
        match self.entries.entry(offset) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let tileset = Tileset::read(rom, offset)?;
                debug!("Cached tileset at 0x{:06X}", offset);
                Ok(entry.insert(tileset))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TilesetStore for TilesetCache {
    fn clear(&mut self) {
        debug!("Clearing {} cached tilesets", self.entries.len());
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::RomImage;
    use ame_testrom::RomBuilder;

    #[test]
    fn caches_by_offset() {
        let built = RomBuilder::populated("BPRE").build();
        let (primary, secondary) = (built.layout.primary_tileset, built.layout.secondary_tileset);
        let rom = RomImage::from_bytes(built.bytes).unwrap();

        let mut cache = TilesetCache::new();
        assert!(!cache.load(&rom, primary).unwrap().secondary);
        assert!(cache.load(&rom, secondary).unwrap().secondary);
        cache.load(&rom, primary).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_load_is_not_cached() {
        let rom = RomImage::from_bytes(vec![0; 0x20]).unwrap();
        let mut cache = TilesetCache::new();
        assert!(cache.load(&rom, 0x10).is_err());
        assert!(cache.is_empty());
    }
}

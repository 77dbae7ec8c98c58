use log::{debug, warn};

use super::{check_count, record_offset, RomTable};
use crate::config::RomConfig;
use crate::constants::{limits, records};
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;
use crate::utils::offset_to_pointer;

/// Header of a single map within a bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapInstance {
    pub offset: u32,              // File offset of the header itself
    pub layout: u32,              // File offset of the layout header
    pub events: Option<u32>,      // Event (person/warp/sign) table
    pub scripts: Option<u32>,     // Map script table
    pub connections: Option<u32>, // Connection table
    pub music: u16,
    pub layout_id: u16,
    pub name_id: u8,
    pub cave: u8,
    pub weather: u8,
    pub map_type: u8,
    pub show_name: u8,
    pub battle_type: u8,
    /// Index into the wild Pokémon table, set by the linking pass.
    ///
    /// Only meaningful while the table it was taken from is loaded.
    pub wild_index: Option<usize>,
}

impl MapInstance {
    fn read<R: RomAccess + ?Sized>(rom: &R, offset: u32) -> Result<Self, TableReadError> {
        let raw = rom.read_bytes(offset, records::MAP_HEADER)?;
        Ok(Self {
            offset,
            layout: rom.read_pointer(offset)?,
            events: rom.read_optional_pointer(offset + 4)?,
            scripts: rom.read_optional_pointer(offset + 8)?,
            connections: rom.read_optional_pointer(offset + 12)?,
            music: u16::from_le_bytes([raw[16], raw[17]]),
            layout_id: u16::from_le_bytes([raw[18], raw[19]]),
            name_id: raw[20],
            cave: raw[21],
            weather: raw[22],
            map_type: raw[23],
            show_name: raw[26],
            battle_type: raw[27],
            wild_index: None,
        })
    }

    pub fn set_wild_table(&mut self, index: usize) {
        self.wild_index = Some(index);
    }
}

/// A bank owns an ordered run of maps
#[derive(Debug, Clone, Default)]
pub struct MapBank {
    maps: Vec<MapInstance>,
}

impl MapBank {
    pub fn maps(&self) -> &[MapInstance] {
        &self.maps
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapBankTable {
    banks: Vec<MapBank>,
}

impl MapBankTable {
    pub fn banks(&self) -> &[MapBank] {
        &self.banks
    }

    pub fn map(&self, bank: usize, map: usize) -> Option<&MapInstance> {
        self.banks.get(bank)?.maps.get(map)
    }

    /// Bounds-checked access; both indices use exclusive upper bounds
    pub fn map_mut(&mut self, bank: usize, map: usize) -> Option<&mut MapInstance> {
        self.banks.get_mut(bank)?.maps.get_mut(map)
    }

    pub fn map_count(&self) -> usize {
        self.banks.iter().map(|b| b.maps.len()).sum()
    }

    #[cfg(test)]
    pub(crate) fn from_bank_sizes(sizes: &[usize]) -> Self {
        let blank = MapInstance {
            offset: 0,
            layout: 0,
            events: None,
            scripts: None,
            connections: None,
            music: 0,
            layout_id: 0,
            name_id: 0,
            cave: 0,
            weather: 0,
            map_type: 0,
            show_name: 0,
            battle_type: 0,
            wild_index: None,
        };
        Self {
            banks: sizes
                .iter()
                .map(|&n| MapBank {
                    maps: vec![blank.clone(); n],
                })
                .collect(),
        }
    }
}

impl RomTable for MapBankTable {
    const KIND: TableKind = TableKind::MapBanks;

    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError> {
        check_count(config.map_bank_count, limits::MAP_BANKS)?;

        let mut lists = Vec::with_capacity(config.map_bank_count);
        for i in 0..config.map_bank_count {
            lists.push(rom.read_pointer(record_offset(config.map_banks, i, 4)?)?);
        }

        let mut banks = Vec::with_capacity(lists.len());
        for (i, &list) in lists.iter().enumerate() {
            // A bank ends where the next bank's list starts, or at the first non-pointer
            let next = lists.get(i + 1).copied();
            let mut maps = Vec::new();
            loop {
                let slot = record_offset(list, maps.len(), 4)?;
                if Some(slot) == next || maps.len() == limits::MAPS_PER_BANK {
                    break;
                }
                let pointer = match rom.read_u32(slot) {
                    Ok(value) => value,
                    Err(_) => break,
                };
                if !rom.is_valid_pointer(pointer) {
                    break;
                }
                let header = rom.read_pointer(slot)?;
                maps.push(MapInstance::read(rom, header)?);
            }

            if maps.is_empty() {
                warn!("Map bank {} at 0x{:08X} has no maps", i, offset_to_pointer(list));
            }
            banks.push(MapBank { maps });
        }

        let table = Self { banks };
        debug!("Read {} map banks holding {} maps", table.banks.len(), table.map_count());
        Ok(table)
    }

    fn len(&self) -> usize {
        self.banks.len()
    }
}

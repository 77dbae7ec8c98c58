use heapless::Vec as SlotVec;
use log::debug;

use super::{check_count, record_offset, RomTable};
use crate::config::RomConfig;
use crate::constants::{limits, records, wild};
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;

/// One encounter slot: a species and its level range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterSlot {
    pub min_level: u8,
    pub max_level: u8,
    pub species: u16,
}

/// Encounter rate plus a fixed number of slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habitat<const N: usize> {
    pub rate: u8,
    pub slots: SlotVec<EncounterSlot, N>,
}

/// Encounter data targeting one `(bank, map)` pair.
///
/// The pair is only a candidate reference; it is checked against the
/// bank table when the two are linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildPokemonEntry {
    pub bank: u8,
    pub map: u8,
    pub grass: Option<Habitat<{ wild::GRASS_SLOTS }>>,
    pub water: Option<Habitat<{ wild::WATER_SLOTS }>>,
    pub rock_smash: Option<Habitat<{ wild::ROCK_SMASH_SLOTS }>>,
    pub fishing: Option<Habitat<{ wild::FISHING_SLOTS }>>,
}

/// Wild encounter headers in stored order
#[derive(Debug, Clone, Default)]
pub struct WildPokemonTable {
    tables: Vec<WildPokemonEntry>,
}

impl WildPokemonTable {
    pub fn tables(&self) -> &[WildPokemonEntry] {
        &self.tables
    }

    pub fn get(&self, index: usize) -> Option<&WildPokemonEntry> {
        self.tables.get(index)
    }

    #[cfg(test)]
    pub(crate) fn from_entries(tables: Vec<WildPokemonEntry>) -> Self {
        Self { tables }
    }
}

impl RomTable for WildPokemonTable {
    const KIND: TableKind = TableKind::WildPokemon;

    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError> {
        let mut tables = Vec::new();

        // The list runs until a header targeting bank 0xFF, map 0xFF
        loop {
            let index = tables.len();
            let header = record_offset(config.wild_pokemon, index, records::WILD_HEADER)?;
            let bank = rom.read_u8(header)?;
            let map = rom.read_u8(header + 1)?;
            if bank == wild::TERMINATOR && map == wild::TERMINATOR {
                break;
            }
            check_count(index + 1, limits::WILD_TABLES)?;

            tables.push(WildPokemonEntry {
                bank,
                map,
                grass: read_habitat(rom, header + 4)?,
                water: read_habitat(rom, header + 8)?,
                rock_smash: read_habitat(rom, header + 12)?,
                fishing: read_habitat(rom, header + 16)?,
            });
        }

        debug!("Read {} wild Pokémon headers", tables.len());
        Ok(Self { tables })
    }

    fn len(&self) -> usize {
        self.tables.len()
    }
}

impl WildPokemonEntry {
    /// Entry with no habitats, used where only the target matters
    pub fn empty(bank: u8, map: u8) -> Self {
        Self {
            bank,
            map,
            grass: None,
            water: None,
            rock_smash: None,
            fishing: None,
        }
    }
}

fn read_habitat<R: RomAccess + ?Sized, const N: usize>(
    rom: &R,
    pointer_at: u32,
) -> Result<Option<Habitat<N>>, TableReadError> {
    let habitat = match rom.read_optional_pointer(pointer_at)? {
        Some(offset) => offset,
        None => return Ok(None),
    };

    let rate = rom.read_bytes(habitat, records::WILD_HABITAT)?[0];
    let slots_at = rom.read_pointer(habitat + 4)?;
    let raw = rom.read_bytes(slots_at, N * records::WILD_SLOT)?;

    let mut slots = SlotVec::new();
    for chunk in raw.chunks_exact(records::WILD_SLOT) {
        let slot = EncounterSlot {
            min_level: chunk[0],
            max_level: chunk[1],
            species: u16::from_le_bytes([chunk[2], chunk[3]]),
        };
        // Exactly N chunks, so this never overflows
        let _ = slots.push(slot);
    }
    Ok(Some(Habitat { rate, slots }))
}

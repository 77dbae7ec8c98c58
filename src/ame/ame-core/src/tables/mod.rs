pub mod items;
pub mod map_banks;
pub mod map_layouts;
pub mod map_names;
pub mod overworlds;
pub mod pokemon;
pub mod wild_pokemon;

pub use items::{Item, ItemTable};
pub use map_banks::{MapBank, MapBankTable, MapInstance};
pub use map_layouts::{MapLayout, MapLayoutTable};
pub use map_names::MapNameTable;
pub use overworlds::{OverworldSprite, OverworldTable};
pub use pokemon::{PokemonTable, Species};
pub use wild_pokemon::{EncounterSlot, Habitat, WildPokemonEntry, WildPokemonTable};

use crate::config::RomConfig;
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;

/// Common shape of every table decoded out of the ROM
pub trait RomTable: Sized {
    /// Which load step this table belongs to
    const KIND: TableKind;

    /// Decode the table from the image using the resolved profile
    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError>;

    /// Number of top-level records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Guards record counts taken from the profile before allocating for them
pub(crate) fn check_count(count: usize, limit: usize) -> Result<(), TableReadError> {
    if count > limit {
        return Err(TableReadError::BadCount { count, limit });
    }
    Ok(())
}

// Offset of record `index` in a table of fixed-size records
pub(crate) fn record_offset(base: u32, index: usize, size: usize) -> Result<u32, TableReadError> {
    index
        .checked_mul(size)
        .and_then(|delta| u32::try_from(delta).ok())
        .and_then(|delta| base.checked_add(delta))
        .ok_or_else(|| TableReadError::Malformed {
            index,
            reason: format!("record at 0x{:X} + {} * {} is outside the address space", base, index, size),
        })
}

use super::{check_count, RomTable};
use crate::config::RomConfig;
use crate::constants::{limits, records};
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;
use crate::utils::decode_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub id: u16,
    pub name: String,
}

/// Species names keyed by national index
#[derive(Debug, Clone, Default)]
pub struct PokemonTable {
    species: Vec<Species>,
}

impl PokemonTable {
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn get(&self, id: u16) -> Option<&Species> {
        self.species.get(id as usize)
    }

    pub fn name(&self, id: u16) -> Option<&str> {
        self.get(id).map(|s| s.name.as_str())
    }
}

impl RomTable for PokemonTable {
    const KIND: TableKind = TableKind::Pokemon;

    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError> {
        check_count(config.pokemon_count, limits::SPECIES)?;

        // Names are fixed width, so the whole table is one contiguous read
        let size = config.pokemon_count * records::SPECIES_NAME;
        let raw = rom.read_bytes(config.pokemon_names, size)?;
        let species = raw
            .chunks_exact(records::SPECIES_NAME)
            .enumerate()
            .map(|(id, name)| Species {
                id: id as u16,
                name: decode_text(name),
            })
            .collect();

        Ok(Self { species })
    }

    fn len(&self) -> usize {
        self.species.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_for;
    use crate::rom::RomImage;
    use ame_testrom::RomBuilder;

    #[test]
    fn reads_fixed_width_names() {
        let built = RomBuilder::populated("BPRE").build();
        let config = config_for(&built, "BPRE");
        let rom = RomImage::from_bytes(built.bytes).unwrap();

        let table = PokemonTable::read(&rom, &config).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.name(1), Some("BULBASAUR"));
        assert_eq!(table.get(3).map(|s| s.id), Some(3));
        assert_eq!(table.name(4), None);
    }

    #[test]
    fn table_past_end_fails() {
        let built = RomBuilder::populated("BPRE").build();
        let mut config = config_for(&built, "BPRE");
        config.pokemon_names = built.bytes.len() as u32 - 5;
        let rom = RomImage::from_bytes(built.bytes).unwrap();

        assert!(matches!(PokemonTable::read(&rom, &config), Err(TableReadError::Rom(_))));
    }

    #[test]
    fn oversized_count_is_rejected() {
        let built = RomBuilder::populated("BPRE").build();
        let mut config = config_for(&built, "BPRE");
        config.pokemon_count = limits::SPECIES + 1;
        let rom = RomImage::from_bytes(built.bytes).unwrap();

        assert!(matches!(
            PokemonTable::read(&rom, &config),
            Err(TableReadError::BadCount { .. })
        ));
    }
}

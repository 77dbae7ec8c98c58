use std::time::Duration;

use log::{debug, info};

use crate::config::ConfigProvider;
use crate::error::LoadError;
use crate::loader::{load_tables, load_tables_concurrent, LoadedTables};
use crate::rom::RomAccess;
use crate::tables::{
    ItemTable, MapBankTable, MapInstance, MapLayoutTable, MapNameTable, OverworldTable, PokemonTable,
    WildPokemonEntry, WildPokemonTable,
};
use crate::tileset::TilesetStore;

/// Owner of every table decoded from the current ROM.
///
/// Each table is held independently, so dropping or unloading releases
/// whatever is present without per-table checks. Tables are only ever
/// published together, after a load has fully succeeded.
#[derive(Debug, Default)]
pub struct LoadedData {
    map_names: Option<MapNameTable>,
    wild_pokemon: Option<WildPokemonTable>,
    pokemon: Option<PokemonTable>,
    items: Option<ItemTable>,
    overworlds: Option<OverworldTable>,
    map_banks: Option<MapBankTable>,
    map_layouts: Option<MapLayoutTable>,
}

impl LoadedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads all map data from `rom`, replacing anything already held.
    ///
    /// On failure nothing is published: the registry is left empty and the
    /// tables read so far are dropped.
    pub fn load_all<R, C>(&mut self, rom: &R, provider: &C) -> Result<Duration, LoadError>
    where
        R: RomAccess + ?Sized,
        C: ConfigProvider + ?Sized,
    {
        self.release();
        let (tables, elapsed) = load_tables(rom, provider)?;
        self.publish(tables);
        Ok(elapsed)
    }

    /// `load_all` with the table reads spread over threads
    pub fn load_all_concurrent<R, C>(&mut self, rom: &R, provider: &C) -> Result<Duration, LoadError>
    where
        R: RomAccess + Sync + ?Sized,
        C: ConfigProvider + ?Sized,
    {
        self.release();
        let (tables, elapsed) = load_tables_concurrent(rom, provider)?;
        self.publish(tables);
        Ok(elapsed)
    }

    /// Releases every held table and clears the tileset store.
    ///
    /// Safe to call at any time, any number of times.
    pub fn unload_all(&mut self, tilesets: &mut dyn TilesetStore) {
        let held = self.held_count();
        self.release();
        tilesets.clear();
        if held > 0 {
            info!("Unloaded {} map data tables", held);
        }
    }

    fn release(&mut self) {
        *self = Self::default();
    }

    fn publish(&mut self, tables: LoadedTables) {
        debug!("Publishing loaded map data");
        self.map_names = Some(tables.map_names);
        self.wild_pokemon = Some(tables.wild_pokemon);
        self.pokemon = Some(tables.pokemon);
        self.items = Some(tables.items);
        self.overworlds = Some(tables.overworlds);
        self.map_banks = Some(tables.map_banks);
        self.map_layouts = Some(tables.map_layouts);
    }

    fn held_count(&self) -> usize {
        [
            self.map_names.is_some(),
            self.wild_pokemon.is_some(),
            self.pokemon.is_some(),
            self.items.is_some(),
            self.overworlds.is_some(),
            self.map_banks.is_some(),
            self.map_layouts.is_some(),
        ]
        .iter()
        .filter(|&&held| held)
        .count()
    }

    /// True when all seven tables are held
    pub fn is_loaded(&self) -> bool {
        self.held_count() == 7
    }

    pub fn map_names(&self) -> Option<&MapNameTable> {
        self.map_names.as_ref()
    }

    pub fn wild_pokemon(&self) -> Option<&WildPokemonTable> {
        self.wild_pokemon.as_ref()
    }

    pub fn pokemon(&self) -> Option<&PokemonTable> {
        self.pokemon.as_ref()
    }

    pub fn items(&self) -> Option<&ItemTable> {
        self.items.as_ref()
    }

    pub fn overworlds(&self) -> Option<&OverworldTable> {
        self.overworlds.as_ref()
    }

    pub fn map_banks(&self) -> Option<&MapBankTable> {
        self.map_banks.as_ref()
    }

    pub fn map_layouts(&self) -> Option<&MapLayoutTable> {
        self.map_layouts.as_ref()
    }

    pub fn map(&self, bank: usize, map: usize) -> Option<&MapInstance> {
        self.map_banks.as_ref()?.map(bank, map)
    }

    /// Follows a map's back-reference into the wild Pokémon table
    pub fn wild_table_for(&self, bank: usize, map: usize) -> Option<&WildPokemonEntry> {
        let index = self.map(bank, map)?.wild_index?;
        self.wild_pokemon.as_ref()?.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_for;
    use crate::config::RomConfig;
    use crate::error::TableKind;
    use crate::rom::RomImage;
    use ame_testrom::RomBuilder;

    #[derive(Default)]
    struct CountingStore {
        clears: usize,
    }

    impl TilesetStore for CountingStore {
        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    fn scenario() -> (RomImage, RomConfig) {
        let built = RomBuilder::populated("BPRE")
            .wild_tables(&[(0, 2), (1, 0), (5, 0)])
            .build();
        let config = config_for(&built, "BPRE");
        (RomImage::from_bytes(built.bytes).unwrap(), config)
    }

    #[test]
    fn successful_load_publishes_everything() {
        let (rom, config) = scenario();
        let mut data = LoadedData::new();
        data.load_all(&rom, &config).unwrap();

        assert!(data.is_loaded());
        assert_eq!(data.map(0, 2).unwrap().wild_index, Some(0));
        assert_eq!(data.map(1, 0).unwrap().wild_index, Some(1));
        let entry = data.wild_table_for(1, 0).unwrap();
        assert_eq!((entry.bank, entry.map), (1, 0));
        assert!(data.wild_table_for(0, 0).is_none());
        assert_eq!(data.pokemon().unwrap().name(2), Some("IVYSAUR"));
    }

    #[test]
    fn failed_load_publishes_nothing() {
        let (rom, mut config) = scenario();
        config.map_banks = rom.bytes().len() as u32;
        let mut data = LoadedData::new();

        let err = data.load_all(&rom, &config).unwrap_err();
        assert_eq!(err.table(), Some(TableKind::MapBanks));
        assert!(data.map_names().is_none());
        assert!(data.pokemon().is_none());
        assert!(data.items().is_none());
        assert!(data.overworlds().is_none());
        assert!(data.map_layouts().is_none());

        let mut store = CountingStore::default();
        data.unload_all(&mut store);
        assert_eq!(store.clears, 1);
        assert!(!data.is_loaded());
    }

    #[test]
    fn failed_reload_drops_previous_tables() {
        let (rom, config) = scenario();
        let mut data = LoadedData::new();
        data.load_all(&rom, &config).unwrap();

        let mut broken = config.clone();
        broken.game_code = String::from("BPEE");
        assert!(data.load_all(&rom, &broken).is_err());
        assert_eq!(data.held_count(), 0);
    }

    #[test]
    fn unload_is_idempotent() {
        let (rom, config) = scenario();
        let mut data = LoadedData::new();
        let mut store = CountingStore::default();

        data.unload_all(&mut store);
        data.load_all(&rom, &config).unwrap();
        data.unload_all(&mut store);
        data.unload_all(&mut store);

        assert_eq!(store.clears, 3);
        assert_eq!(data.held_count(), 0);
        assert!(data.map_banks().is_none());
    }

    #[test]
    fn unload_tolerates_any_subset() {
        let mut data = LoadedData {
            pokemon: Some(PokemonTable::default()),
            map_banks: Some(MapBankTable::default()),
            ..LoadedData::default()
        };
        assert_eq!(data.held_count(), 2);
        assert!(!data.is_loaded());

        let mut store = CountingStore::default();
        data.unload_all(&mut store);
        assert_eq!(data.held_count(), 0);
    }

    #[test]
    fn concurrent_load_publishes_linked_tables() {
        let (rom, config) = scenario();
        let mut data = LoadedData::new();
        data.load_all_concurrent(&rom, &config).unwrap();

        assert!(data.is_loaded());
        assert_eq!(data.map(0, 2).unwrap().wild_index, Some(0));
        assert_eq!(data.map(1, 0).unwrap().wild_index, Some(1));
    }

    #[test]
    fn failed_concurrent_load_publishes_nothing() {
        let (rom, mut config) = scenario();
        let mut data = LoadedData::new();
        data.load_all_concurrent(&rom, &config).unwrap();

        config.map_banks = rom.bytes().len() as u32;
        let err = data.load_all_concurrent(&rom, &config).unwrap_err();
        assert_eq!(err.table(), Some(TableKind::MapBanks));
        assert_eq!(data.held_count(), 0);
        assert!(data.wild_table_for(1, 0).is_none());
    }
}

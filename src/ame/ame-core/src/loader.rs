use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use log::{debug, error, info};

use crate::config::{ConfigProvider, RomConfig};
use crate::error::{ConfigError, LoadError, TableKind};
use crate::rom::RomAccess;
use crate::tables::{
    ItemTable, MapBankTable, MapLayoutTable, MapNameTable, OverworldTable, PokemonTable, RomTable,
    WildPokemonTable,
};

/// The seven tables of one successful load, already cross-linked
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub map_names: MapNameTable,
    pub wild_pokemon: WildPokemonTable,
    pub pokemon: PokemonTable,
    pub items: ItemTable,
    pub overworlds: OverworldTable,
    pub map_banks: MapBankTable,
    pub map_layouts: MapLayoutTable,
}

impl LoadedTables {
    /// Store each wild table's index on the map it targets
    pub fn link(&mut self) -> usize {
        link_wild_tables(&self.wild_pokemon, &mut self.map_banks)
    }
}

/// Resolves every wild table's `(bank, map)` against the bank table.
///
/// Records are visited in stored order, so when two target the same map the
/// later one wins. Targets outside the bank table are skipped. Returns the
/// number of records that were linked.
pub fn link_wild_tables(wild: &WildPokemonTable, banks: &mut MapBankTable) -> usize {
    let mut linked = 0;
    for (index, entry) in wild.tables().iter().enumerate() {
        match banks.map_mut(entry.bank as usize, entry.map as usize) {
            Some(map) => {
                map.set_wild_table(index);
                linked += 1;
            }
            None => debug!(
                "Wild table {} targets missing map {}.{}, skipping",
                index, entry.bank, entry.map
            ),
        }
    }
    debug!("Linked {} of {} wild tables", linked, wild.tables().len());
    linked
}

/// Reads the cartridge header and asks the provider for matching offsets
pub fn resolve_config<R, C>(rom: &R, provider: &C) -> Result<RomConfig, LoadError>
where
    R: RomAccess + ?Sized,
    C: ConfigProvider + ?Sized,
{
    let header = rom.header().map_err(ConfigError::Header)?;
    let config = provider.resolve(&header).map_err(|e| {
        error!("No usable configuration for {:?}: {}", header.game_code, e);
        e
    })?;
    info!("Using configuration '{}' for {}", config.name, header.game_code);
    Ok(config)
}

fn read_table<T, R>(rom: &R, config: &RomConfig) -> Result<T, LoadError>
where
    T: RomTable,
    R: RomAccess + ?Sized,
{
    debug!("Reading {} table", T::KIND);
    let table = T::read(rom, config).map_err(|source| {
        error!("Failed to read the {} table: {}", T::KIND, source);
        LoadError::Table {
            table: T::KIND,
            source,
        }
    })?;
    debug!("Read {} table ({} records)", T::KIND, table.len());
    Ok(table)
}

/// Loads all seven tables in dependency order, stopping at the first failure.
///
/// Returns the linked tables and the time spent reading them; configuration
/// resolution is not part of the measured time.
pub fn load_tables<R, C>(rom: &R, provider: &C) -> Result<(LoadedTables, Duration), LoadError>
where
    R: RomAccess + ?Sized,
    C: ConfigProvider + ?Sized,
{
    let config = resolve_config(rom, provider)?;
    let stopwatch = Instant::now();

    let map_names = read_table::<MapNameTable, _>(rom, &config)?;
    let wild_pokemon = read_table::<WildPokemonTable, _>(rom, &config)?;
    let pokemon = read_table::<PokemonTable, _>(rom, &config)?;
    let items = read_table::<ItemTable, _>(rom, &config)?;
    let overworlds = read_table::<OverworldTable, _>(rom, &config)?;
    let map_banks = read_table::<MapBankTable, _>(rom, &config)?;
    let map_layouts = read_table::<MapLayoutTable, _>(rom, &config)?;

    let mut tables = LoadedTables {
        map_names,
        wild_pokemon,
        pokemon,
        items,
        overworlds,
        map_banks,
        map_layouts,
    };
    tables.link();

    let elapsed = stopwatch.elapsed();
    info!("Loaded map data in {} ms", elapsed.as_millis());
    Ok((tables, elapsed))
}

// One finished table, tagged by kind so results can travel over one channel
enum ReadOutcome {
    MapNames(MapNameTable),
    WildPokemon(WildPokemonTable),
    Pokemon(PokemonTable),
    Items(ItemTable),
    Overworlds(OverworldTable),
    MapBanks(MapBankTable),
    MapLayouts(MapLayoutTable),
}

fn read_kind<R: RomAccess + ?Sized>(
    kind: TableKind,
    rom: &R,
    config: &RomConfig,
) -> Result<ReadOutcome, LoadError> {
    Ok(match kind {
        TableKind::MapNames => ReadOutcome::MapNames(read_table(rom, config)?),
        TableKind::WildPokemon => ReadOutcome::WildPokemon(read_table(rom, config)?),
        TableKind::Pokemon => ReadOutcome::Pokemon(read_table(rom, config)?),
        TableKind::Items => ReadOutcome::Items(read_table(rom, config)?),
        TableKind::Overworlds => ReadOutcome::Overworlds(read_table(rom, config)?),
        TableKind::MapBanks => ReadOutcome::MapBanks(read_table(rom, config)?),
        TableKind::MapLayouts => ReadOutcome::MapLayouts(read_table(rom, config)?),
    })
}

#[derive(Default)]
struct PendingTables {
    map_names: Option<MapNameTable>,
    wild_pokemon: Option<WildPokemonTable>,
    pokemon: Option<PokemonTable>,
    items: Option<ItemTable>,
    overworlds: Option<OverworldTable>,
    map_banks: Option<MapBankTable>,
    map_layouts: Option<MapLayoutTable>,
}

impl PendingTables {
    fn store(&mut self, outcome: ReadOutcome) {
        match outcome {
            ReadOutcome::MapNames(t) => self.map_names = Some(t),
            ReadOutcome::WildPokemon(t) => self.wild_pokemon = Some(t),
            ReadOutcome::Pokemon(t) => self.pokemon = Some(t),
            ReadOutcome::Items(t) => self.items = Some(t),
            ReadOutcome::Overworlds(t) => self.overworlds = Some(t),
            ReadOutcome::MapBanks(t) => self.map_banks = Some(t),
            ReadOutcome::MapLayouts(t) => self.map_layouts = Some(t),
        }
    }

    fn finish(self) -> Result<LoadedTables, LoadError> {
        Ok(LoadedTables {
            map_names: self.map_names.ok_or(LoadError::Missing(TableKind::MapNames))?,
            wild_pokemon: self.wild_pokemon.ok_or(LoadError::Missing(TableKind::WildPokemon))?,
            pokemon: self.pokemon.ok_or(LoadError::Missing(TableKind::Pokemon))?,
            items: self.items.ok_or(LoadError::Missing(TableKind::Items))?,
            overworlds: self.overworlds.ok_or(LoadError::Missing(TableKind::Overworlds))?,
            map_banks: self.map_banks.ok_or(LoadError::Missing(TableKind::MapBanks))?,
            map_layouts: self.map_layouts.ok_or(LoadError::Missing(TableKind::MapLayouts))?,
        })
    }
}

/// Same result as `load_tables`, with the seven reads on separate threads.
///
/// Linking waits for every read. When several reads fail, the error of the
/// earliest step in load order is returned.
pub fn load_tables_concurrent<R, C>(rom: &R, provider: &C) -> Result<(LoadedTables, Duration), LoadError>
where
    R: RomAccess + Sync + ?Sized,
    C: ConfigProvider + ?Sized,
{
    let config = resolve_config(rom, provider)?;
    let stopwatch = Instant::now();

    let (tx, rx) = bounded(TableKind::ALL.len());
    thread::scope(|scope| {
        for kind in TableKind::ALL {
            let tx = tx.clone();
            let config = &config;
            scope.spawn(move || {
                // Capacity covers every reader, so this never blocks
                let _ = tx.send((kind, read_kind(kind, rom, config)));
            });
        }
    });
    drop(tx);

    let mut pending = PendingTables::default();
    let mut first_failure: Option<(TableKind, LoadError)> = None;
    for (kind, result) in rx.iter() {
        match result {
            Ok(outcome) => pending.store(outcome),
            Err(e) => {
                let earlier = match &first_failure {
                    Some((seen, _)) => (kind as usize) < (*seen as usize),
                    None => true,
                };
                if earlier {
                    first_failure = Some((kind, e));
                }
            }
        }
    }
    if let Some((_, e)) = first_failure {
        return Err(e);
    }

    let mut tables = pending.finish()?;
    tables.link();

    let elapsed = stopwatch.elapsed();
    info!("Loaded map data concurrently in {} ms", elapsed.as_millis());
    Ok((tables, elapsed))
}

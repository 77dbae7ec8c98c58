#[macro_use]
extern crate clap;
use anyhow::{bail, Context};
use env_logger;
use log::{error, info};

// Internal project modules
use ame_config::{parse_offset, Overrides, Profiles};
use ame_core::tables::RomTable;
use ame_core::{LoadedData, RomAccess, RomImage, TilesetCache};

/// Configures command-line interface using clap
fn get_cli_config<'a>() -> clap::ArgMatches<'a> {
    let description = "Loads the map data tables of a GBA Pokémon ROM";
    let offset_arg = |name: &'static str, help: &'static str| {
        clap::Arg::with_name(name)
            .long(name)
            .takes_value(true)
            .value_name("OFFSET")
            .help(help)
    };
    let rom_arg = clap::Arg::with_name("rom")
        .help("Path to the ROM image")
        .required(true)
        .index(1);

    clap::App::new("Awesome Map Editor data loader (AME)")
        .version("0.1")
        .about(description)
        .arg(
            clap::Arg::with_name("profile")
                .long("profile")
                .takes_value(true)
                .value_name("CODE")
                .help("Use this profile regardless of the header game code"),
        )
        .arg(offset_arg("map-names", "Override the map name table offset"))
        .arg(offset_arg("wild-pokemon", "Override the wild Pokémon table offset"))
        .arg(offset_arg("map-banks", "Override the map bank table offset"))
        .arg(offset_arg("map-layouts", "Override the map layout table offset"))
        .arg(
            clap::Arg::with_name("concurrent")
                .long("concurrent")
                .help("Read the tables on separate threads"),
        )
        .subcommand(
            clap::SubCommand::with_name("summary")
                .about("Load every table and print record counts")
                .arg(rom_arg.clone()),
        )
        .subcommand(
            clap::SubCommand::with_name("map")
                .about("Print one map header with its layout and wild Pokémon")
                .arg(rom_arg)
                .arg(clap::Arg::with_name("bank").required(true).index(2))
                .arg(clap::Arg::with_name("map").required(true).index(3)),
        )
        .subcommand(clap::SubCommand::with_name("profiles").about("List the built-in ROM profiles"))
        .get_matches()
}

/// Builds the configuration provider from the profile and override flags
fn get_profiles(cli_matches: &clap::ArgMatches) -> anyhow::Result<Profiles> {
    let offset = |name: &str| -> anyhow::Result<Option<u32>> {
        match cli_matches.value_of(name) {
            Some(text) => match parse_offset(text) {
                Some(value) => Ok(Some(value)),
                None => bail!("invalid offset for --{}: {:?}", name, text),
            },
            None => Ok(None),
        }
    };
    let overrides = Overrides {
        map_names: offset("map-names")?,
        wild_pokemon: offset("wild-pokemon")?,
        map_banks: offset("map-banks")?,
        map_layouts: offset("map-layouts")?,
    };

    let mut profiles = Profiles::builtin().with_overrides(overrides);
    if let Some(code) = cli_matches.value_of("profile") {
        if profiles.get(code).is_none() {
            bail!("no built-in profile for game code {:?}", code);
        }
        profiles = profiles.force(code);
    }
    Ok(profiles)
}

fn load(
    sub: &clap::ArgMatches,
    profiles: &Profiles,
    concurrent: bool,
) -> anyhow::Result<(RomImage, LoadedData)> {
    let path = sub.value_of("rom").unwrap_or_default();
    let rom = RomImage::from_file(path).with_context(|| format!("cannot open {}", path))?;

    let mut data = LoadedData::new();
    let elapsed = if concurrent {
        data.load_all_concurrent(&rom, profiles)
    } else {
        data.load_all(&rom, profiles)
    }
    .with_context(|| format!("cannot load map data from {}", path))?;

    info!("Map data ready after {} ms", elapsed.as_millis());
    Ok((rom, data))
}

fn print_summary(data: &LoadedData) {
    let count = |len: Option<usize>| len.unwrap_or(0);
    println!("map names      {:>5}", count(data.map_names().map(|t| t.len())));
    println!("wild tables    {:>5}", count(data.wild_pokemon().map(|t| t.len())));
    println!("species        {:>5}", count(data.pokemon().map(|t| t.len())));
    println!("items          {:>5}", count(data.items().map(|t| t.len())));
    println!("overworlds     {:>5}", count(data.overworlds().map(|t| t.len())));
    println!("map banks      {:>5}", count(data.map_banks().map(|t| t.len())));
    println!("maps           {:>5}", count(data.map_banks().map(|t| t.map_count())));
    println!("map layouts    {:>5}", count(data.map_layouts().map(|t| t.len())));

    let linked = data
        .map_banks()
        .map(|t| t.banks().iter().flat_map(|b| b.maps()).filter(|m| m.wild_index.is_some()).count())
        .unwrap_or(0);
    println!("maps with wild {:>5}", linked);
}

fn print_map(
    rom: &RomImage,
    data: &LoadedData,
    tilesets: &mut TilesetCache,
    bank: usize,
    map: usize,
) -> anyhow::Result<()> {
    let header = match data.map(bank, map) {
        Some(header) => header,
        None => bail!("map {}.{} does not exist", bank, map),
    };

    let name = data
        .map_names()
        .and_then(|t| t.name_for(header.name_id))
        .unwrap_or("-");
    println!("map {}.{} \"{}\" at 0x{:06X}", bank, map, name, header.offset);
    println!("  music 0x{:04X}  weather {}  type {}", header.music, header.weather, header.map_type);

    match data.map_layouts().and_then(|t| t.by_id(header.layout_id)) {
        Some(layout) => {
            println!("  layout {} ({}x{})", header.layout_id, layout.width, layout.height);
            for offset in [layout.primary_tileset, layout.secondary_tileset] {
                let tileset = tilesets.load(rom, offset)?;
                println!(
                    "    tileset 0x{:06X} secondary={} compressed={}",
                    offset, tileset.secondary, tileset.compressed
                );
            }
        }
        None => println!("  layout {} (missing)", header.layout_id),
    }

    let entry = match data.wild_table_for(bank, map) {
        Some(entry) => entry,
        None => {
            println!("  no wild Pokémon");
            return Ok(());
        }
    };
    let species = |id: u16| data.pokemon().and_then(|t| t.name(id)).unwrap_or("?");
    if let Some(grass) = &entry.grass {
        println!("  grass (rate {})", grass.rate);
        for slot in grass.slots.iter() {
            println!("    {:<12} lv {}-{}", species(slot.species), slot.min_level, slot.max_level);
        }
    }
    if let Some(fishing) = &entry.fishing {
        println!("  fishing (rate {})", fishing.rate);
        for slot in fishing.slots.iter() {
            println!("    {:<12} lv {}-{}", species(slot.species), slot.min_level, slot.max_level);
        }
    }
    for (label, rate) in [
        ("water", entry.water.as_ref().map(|h| h.rate)),
        ("rock smash", entry.rock_smash.as_ref().map(|h| h.rate)),
    ] {
        if let Some(rate) = rate {
            println!("  {} (rate {})", label, rate);
        }
    }
    Ok(())
}

fn run(cli_matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let profiles = get_profiles(cli_matches)?;
    let concurrent = cli_matches.is_present("concurrent");
    let mut tilesets = TilesetCache::new();

    match cli_matches.subcommand() {
        ("summary", Some(sub)) => {
            let (rom, mut data) = load(sub, &profiles, concurrent)?;
            let header = rom.header()?;
            println!("{} [{}] {} bytes", header.title, header.game_code, rom.size());
            print_summary(&data);
            data.unload_all(&mut tilesets);
        }
        ("map", Some(sub)) => {
            let bank = clap::value_t!(sub, "bank", usize)?;
            let map = clap::value_t!(sub, "map", usize)?;
            let (rom, mut data) = load(sub, &profiles, concurrent)?;
            let result = print_map(&rom, &data, &mut tilesets, bank, map);
            data.unload_all(&mut tilesets);
            result?;
        }
        ("profiles", Some(_)) => {
            for code in profiles.codes() {
                if let Some(config) = profiles.get(code) {
                    println!("{}  {}", code, config.name);
                }
            }
        }
        _ => bail!("no command given, see --help"),
    }
    Ok(())
}

/// Main entry point for the loader front end
fn main() {
    env_logger::init();

    // Parse command-line arguments
    let cli_matches = get_cli_config();

    if let Err(e) = run(&cli_matches) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

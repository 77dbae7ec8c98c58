use ame_core::{ConfigError, ConfigProvider, RomConfig, RomHeader};
use log::{debug, warn};

use crate::overrides::Overrides;

/// FireRed (USA 1.0)
fn firered() -> RomConfig {
    RomConfig {
        game_code: String::from("BPRE"),
        name: String::from("Pokémon FireRed (USA)"),
        map_names: 0x3F_1CAC,
        map_name_count: 109,
        map_name_stride: 4,
        map_name_pointer_offset: 0,
        first_map_name_id: 0x58,
        wild_pokemon: 0x3C_9CB8,
        pokemon_names: 0x24_5EE0,
        pokemon_count: 412,
        items: 0x3D_B028,
        item_count: 375,
        overworld_sprites: 0x39_FDB0,
        overworld_count: 152,
        map_banks: 0x35_26A8,
        map_bank_count: 43,
        map_layouts: 0x34_EB8C,
        map_layout_count: 383,
        layout_border_size: true,
    }
}

/// Emerald (USA)
fn emerald() -> RomConfig {
    RomConfig {
        game_code: String::from("BPEE"),
        name: String::from("Pokémon Emerald (USA)"),
        map_names: 0x5A_147C,
        map_name_count: 213,
        map_name_stride: 8, // Region map entries: x, y, w, h, name
        map_name_pointer_offset: 4,
        first_map_name_id: 0,
        wild_pokemon: 0x55_2D48,
        pokemon_names: 0x31_85C8,
        pokemon_count: 412,
        items: 0x58_39A0,
        item_count: 377,
        overworld_sprites: 0x50_5620,
        overworld_count: 239,
        map_banks: 0x48_6578,
        map_bank_count: 34,
        map_layouts: 0x48_1DD4,
        map_layout_count: 442,
        layout_border_size: false,
    }
}

/// Known ROM profiles, matched by the game code in the cartridge header
#[derive(Debug, Clone, Default)]
pub struct Profiles {
    entries: Vec<RomConfig>,
    forced: Option<String>,
    overrides: Overrides,
}

impl Profiles {
    /// Profiles shipped with the editor
    pub fn builtin() -> Self {
        Self {
            entries: vec![firered(), emerald()],
            ..Self::default()
        }
    }

    /// Adds a profile, replacing any existing one with the same game code
    pub fn insert(&mut self, config: RomConfig) {
        self.entries.retain(|c| c.game_code != config.game_code);
        self.entries.push(config);
    }

    /// Ignore the header and always use the profile for `game_code`
    pub fn force(mut self, game_code: &str) -> Self {
        self.forced = Some(game_code.to_string());
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn get(&self, game_code: &str) -> Option<&RomConfig> {
        self.entries.iter().find(|c| c.game_code == game_code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.game_code.as_str())
    }
}

impl ConfigProvider for Profiles {
    fn resolve(&self, header: &RomHeader) -> Result<RomConfig, ConfigError> {
        let code = match &self.forced {
            Some(forced) => {
                if *forced != header.game_code {
                    warn!("Using profile {} for a {} cartridge", forced, header.game_code);
                }
                forced.as_str()
            }
            None => header.game_code.as_str(),
        };

        let mut config = self
            .get(code)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownRom {
                code: code.to_string(),
            })?;
        if !self.overrides.is_empty() {
            debug!("Applying offset overrides to {}", code);
            self.overrides.apply(&mut config);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ame_core::{RomAccess, RomImage};
    use ame_testrom::RomBuilder;

    fn header(code: &str) -> RomHeader {
        let rom = RomImage::from_bytes(RomBuilder::new(code).build().bytes).unwrap();
        rom.header().unwrap()
    }

    #[test]
    fn builtin_profiles_are_valid() {
        let profiles = Profiles::builtin();
        for code in profiles.codes() {
            assert!(profiles.get(code).unwrap().validate().is_ok(), "{}", code);
        }
        assert_eq!(profiles.codes().count(), 2);
    }

    #[test]
    fn resolves_by_header_game_code() {
        let config = Profiles::builtin().resolve(&header("BPEE")).unwrap();
        assert_eq!(config.game_code, "BPEE");
        assert_eq!(config.map_name_stride, 8);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let result = Profiles::builtin().resolve(&header("AXVE"));
        assert!(matches!(result, Err(ConfigError::UnknownRom { code }) if code == "AXVE"));
    }

    #[test]
    fn forced_profile_ignores_header() {
        let config = Profiles::builtin().force("BPRE").resolve(&header("ZZZZ")).unwrap();
        assert_eq!(config.game_code, "BPRE");
    }

    #[test]
    fn overrides_replace_offsets() {
        let overrides = Overrides {
            map_banks: Some(0x71_0000),
            ..Overrides::default()
        };
        let config = Profiles::builtin()
            .with_overrides(overrides)
            .resolve(&header("BPRE"))
            .unwrap();
        assert_eq!(config.map_banks, 0x71_0000);
        assert_eq!(config.map_layouts, 0x34_EB8C);
    }

    #[test]
    fn override_outside_rom_is_malformed() {
        let overrides = Overrides {
            wild_pokemon: Some(0x0800_0000),
            ..Overrides::default()
        };
        let result = Profiles::builtin()
            .with_overrides(overrides)
            .resolve(&header("BPRE"));
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn inserted_profile_replaces_builtin() {
        let mut profiles = Profiles::builtin();
        let mut custom = profiles.get("BPRE").cloned().unwrap();
        custom.name = String::from("FireRed hack");
        profiles.insert(custom);
        assert_eq!(profiles.codes().count(), 2);
        assert_eq!(profiles.get("BPRE").unwrap().name, "FireRed hack");
    }

    #[test]
    fn loads_image_through_inserted_profile() {
        let built = RomBuilder::populated("BPRE").build();
        let layout = built.layout;
        let mut profiles = Profiles::default();
        profiles.insert(RomConfig {
            map_names: layout.map_names,
            map_name_count: 3,
            wild_pokemon: layout.wild_pokemon,
            pokemon_names: layout.pokemon_names,
            pokemon_count: 4,
            items: layout.items,
            item_count: 3,
            overworld_sprites: layout.overworld_sprites,
            overworld_count: 3,
            map_banks: layout.map_banks,
            map_bank_count: 2,
            map_layouts: layout.map_layouts,
            map_layout_count: 3,
            ..firered()
        });
        let rom = RomImage::from_bytes(built.bytes).unwrap();

        let mut data = ame_core::LoadedData::new();
        data.load_all(&rom, &profiles).unwrap();
        assert_eq!(data.map(0, 2).and_then(|m| m.wild_index), Some(0));
        assert_eq!(data.map(1, 0).and_then(|m| m.wild_index), Some(1));
        assert_eq!(
            data.map_names().and_then(|t| t.name_for(0x59)),
            Some("VIRIDIAN CITY")
        );

        let mut tilesets = ame_core::TilesetCache::new();
        data.unload_all(&mut tilesets);
        assert!(!data.is_loaded());
    }
}

use crate::constants::{limits, ROM_MAX_SIZE};
use crate::error::ConfigError;
use crate::rom::RomHeader;

/// Table offsets and record counts for one ROM revision.
///
/// Offsets are file offsets into the image, not GBA pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomConfig {
    pub game_code: String,
    pub name: String,

    pub map_names: u32,
    pub map_name_count: usize,
    pub map_name_stride: usize,         // Bytes per map name entry
    pub map_name_pointer_offset: usize, // Where the text pointer sits inside an entry
    pub first_map_name_id: u8,          // Name id stored in map headers for entry 0

    pub wild_pokemon: u32,

    pub pokemon_names: u32,
    pub pokemon_count: usize,

    pub items: u32,
    pub item_count: usize,

    pub overworld_sprites: u32,
    pub overworld_count: usize,

    pub map_banks: u32,
    pub map_bank_count: usize,

    pub map_layouts: u32,
    pub map_layout_count: usize,
    pub layout_border_size: bool, // FRLG headers store border width/height
}

impl RomConfig {
    /// Rejects profiles whose values could not describe a real cartridge
    pub fn validate(&self) -> Result<(), ConfigError> {
        let malformed = |reason: String| ConfigError::Malformed {
            code: self.game_code.clone(),
            reason,
        };

        let offsets = [
            ("map_names", self.map_names),
            ("wild_pokemon", self.wild_pokemon),
            ("pokemon_names", self.pokemon_names),
            ("items", self.items),
            ("overworld_sprites", self.overworld_sprites),
            ("map_banks", self.map_banks),
            ("map_layouts", self.map_layouts),
        ];
        for (field, offset) in offsets.iter() {
            if *offset >= ROM_MAX_SIZE {
                return Err(malformed(format!("{} offset 0x{:X} is outside the ROM window", field, offset)));
            }
        }

        let counts = [
            ("map_name_count", self.map_name_count, limits::MAP_NAMES),
            ("pokemon_count", self.pokemon_count, limits::SPECIES),
            ("item_count", self.item_count, limits::ITEMS),
            ("overworld_count", self.overworld_count, limits::OVERWORLDS),
            ("map_bank_count", self.map_bank_count, limits::MAP_BANKS),
            ("map_layout_count", self.map_layout_count, limits::MAP_LAYOUTS),
        ];
        for (field, count, limit) in counts.iter() {
            if *count == 0 || count > limit {
                return Err(malformed(format!("{} must be in 1..={}, got {}", field, limit, count)));
            }
        }

        if !(4..=limits::MAP_NAME_STRIDE).contains(&self.map_name_stride) {
            return Err(malformed(format!(
                "map_name_stride must be in 4..={}, got {}",
                limits::MAP_NAME_STRIDE,
                self.map_name_stride
            )));
        }
        let pointer_end = self.map_name_pointer_offset.checked_add(4);
        if pointer_end.map_or(true, |end| end > self.map_name_stride) {
            return Err(malformed(format!(
                "map name pointer at +{} does not fit a {}-byte entry",
                self.map_name_pointer_offset, self.map_name_stride
            )));
        }
        Ok(())
    }
}

/// Maps a cartridge to the table offsets used to decode it
pub trait ConfigProvider {
    fn resolve(&self, header: &RomHeader) -> Result<RomConfig, ConfigError>;
}

/// A single profile resolves for its own game code only
impl ConfigProvider for RomConfig {
    fn resolve(&self, header: &RomHeader) -> Result<RomConfig, ConfigError> {
        if header.game_code != self.game_code {
            return Err(ConfigError::UnknownRom {
                code: header.game_code.clone(),
            });
        }
        self.validate()?;
        Ok(self.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ame_testrom::TestRom;

    /// Profile matching an `ame_testrom::RomBuilder::populated` image
    pub fn config_for(rom: &TestRom, game_code: &str) -> RomConfig {
        let layout = rom.layout;
        RomConfig {
            game_code: game_code.to_string(),
            name: String::from("Test image"),
            map_names: layout.map_names,
            map_name_count: 3,
            map_name_stride: 4,
            map_name_pointer_offset: 0,
            first_map_name_id: 0x58,
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
            layout_border_size: true,
        }
    }

    fn header(code: &str) -> RomHeader {
        RomHeader {
            title: String::from("POKEMON TEST"),
            game_code: code.to_string(),
            maker_code: String::from("01"),
            version: 0,
        }
    }

    #[test]
    fn profile_resolves_own_code_only() {
        let rom = ame_testrom::RomBuilder::populated("BPRE").build();
        let config = config_for(&rom, "BPRE");
        assert_eq!(config.resolve(&header("BPRE")).unwrap(), config);
        assert!(matches!(
            config.resolve(&header("AXVE")),
            Err(ConfigError::UnknownRom { code }) if code == "AXVE"
        ));
    }

    #[test]
    fn zero_count_is_malformed() {
        let rom = ame_testrom::RomBuilder::populated("BPRE").build();
        let mut config = config_for(&rom, "BPRE");
        config.map_bank_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn offset_outside_window_is_malformed() {
        let rom = ame_testrom::RomBuilder::populated("BPRE").build();
        let mut config = config_for(&rom, "BPRE");
        config.items = 0x0200_0000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn name_pointer_must_fit_entry() {
        let rom = ame_testrom::RomBuilder::populated("BPRE").build();
        let mut config = config_for(&rom, "BPRE");
        config.map_name_stride = 8;
        config.map_name_pointer_offset = 4;
        assert!(config.validate().is_ok());
        config.map_name_pointer_offset = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn huge_name_pointer_offset_is_malformed() {
        let rom = ame_testrom::RomBuilder::populated("BPRE").build();
        let mut config = config_for(&rom, "BPRE");
        config.map_name_pointer_offset = usize::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn name_stride_is_capped() {
        let rom = ame_testrom::RomBuilder::populated("BPRE").build();
        let mut config = config_for(&rom, "BPRE");
        config.map_name_stride = limits::MAP_NAME_STRIDE;
        assert!(config.validate().is_ok());
        config.map_name_stride = 0x1_0000_0000;
        config.map_name_pointer_offset = 0xFFFF_FFF0;
        assert!(matches!(config.validate(), Err(ConfigError::Malformed { .. })));
    }
}

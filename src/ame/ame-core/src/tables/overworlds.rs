use super::{check_count, record_offset, RomTable};
use crate::config::RomConfig;
use crate::constants::{limits, records, sprites};
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;

/// Graphics header of one overworld sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverworldSprite {
    pub palette_tag: u16,
    pub reflection_palette_tag: u16,
    pub size: u16,
    pub width: u16,
    pub height: u16,
    pub images: Option<u32>, // File offset of the frame table
}

#[derive(Debug, Clone, Default)]
pub struct OverworldTable {
    sprites: Vec<OverworldSprite>,
}

impl OverworldTable {
    pub fn sprites(&self) -> &[OverworldSprite] {
        &self.sprites
    }

    pub fn get(&self, index: usize) -> Option<&OverworldSprite> {
        self.sprites.get(index)
    }
}

impl RomTable for OverworldTable {
    const KIND: TableKind = TableKind::Overworlds;

    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError> {
        check_count(config.overworld_count, limits::OVERWORLDS)?;

        let mut sprites = Vec::with_capacity(config.overworld_count);
        for i in 0..config.overworld_count {
            let header = rom.read_pointer(record_offset(config.overworld_sprites, i, 4)?)?;
            let raw = rom.read_bytes(header, records::SPRITE_HEADER)?;
            let word = |at: usize| u16::from_le_bytes([raw[at], raw[at + 1]]);

            if word(0) != sprites::TILE_TAG_NONE {
                return Err(TableReadError::Malformed {
                    index: i,
                    reason: format!("sprite header starts with 0x{:04X}, expected 0xFFFF", word(0)),
                });
            }

            sprites.push(OverworldSprite {
                palette_tag: word(2),
                reflection_palette_tag: word(4),
                size: word(6),
                width: word(8),
                height: word(10),
                images: rom.read_optional_pointer(header + 0x1C)?,
            });
        }

        Ok(Self { sprites })
    }

    fn len(&self) -> usize {
        self.sprites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_for;
    use crate::rom::RomImage;
    use ame_testrom::RomBuilder;

    #[test]
    fn reads_sprite_headers() {
        let built = RomBuilder::populated("BPRE").build();
        let config = config_for(&built, "BPRE");
        let rom = RomImage::from_bytes(built.bytes).unwrap();

        let table = OverworldTable::read(&rom, &config).unwrap();
        assert_eq!(table.len(), 3);
        let sprite = table.get(2).unwrap();
        assert_eq!(sprite.palette_tag, 0x1102);
        assert_eq!((sprite.width, sprite.height), (16, 32));
        assert_eq!(sprite.images, None);
    }

    #[test]
    fn header_without_tile_tag_is_malformed() {
        let mut built = RomBuilder::populated("BPRE").build();
        let config = config_for(&built, "BPRE");
        let first = built.bytes[built.layout.overworld_sprites as usize..][..4].to_vec();
        let header = u32::from_le_bytes([first[0], first[1], first[2], first[3]]) - ame_testrom::ROM_BASE;
        built.poke_u32(header, 0x1100_0000);
        let rom = RomImage::from_bytes(built.bytes).unwrap();

        assert!(matches!(
            OverworldTable::read(&rom, &config),
            Err(TableReadError::Malformed { index: 0, .. })
        ));
    }
}

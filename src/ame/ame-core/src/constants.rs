// Address window of the cartridge ROM as seen by the GBA CPU
pub const ROM_BASE: u32 = 0x0800_0000;
pub const ROM_MAX_SIZE: u32 = 0x0200_0000;

pub mod header {
    // Cartridge header fields
    pub const TITLE: u32 = 0xA0;
    pub const TITLE_LEN: usize = 12;
    pub const GAME_CODE: u32 = 0xAC;
    pub const MAKER_CODE: u32 = 0xB0;
    pub const FIXED_VALUE: u32 = 0xB2;
    pub const VERSION: u32 = 0xBC;
}

pub mod text {
    pub const TERMINATOR: u8 = 0xFF;
    pub const MAX_LEN: usize = 64; // Longest string a reader will follow
}

pub mod records {
    // Fixed record sizes, in bytes
    pub const SPECIES_NAME: usize = 11;
    pub const ITEM: usize = 44;
    pub const ITEM_NAME: usize = 14;
    pub const SPRITE_HEADER: usize = 36;
    pub const WILD_HEADER: usize = 20;
    pub const WILD_HABITAT: usize = 8;
    pub const WILD_SLOT: usize = 4;
    pub const MAP_HEADER: usize = 28;
    pub const LAYOUT_HEADER_RSE: usize = 24;
    pub const LAYOUT_HEADER_FRLG: usize = 28;
    pub const TILESET_HEADER: usize = 24;
}

pub mod limits {
    // Hard upper bounds used to catch runaway reads
    pub const WILD_TABLES: usize = 1024;
    pub const MAP_BANKS: usize = 255;
    pub const MAPS_PER_BANK: usize = 255;
    pub const MAP_NAMES: usize = 512;
    pub const MAP_NAME_STRIDE: usize = 32;
    pub const SPECIES: usize = 2048;
    pub const ITEMS: usize = 1024;
    pub const OVERWORLDS: usize = 1024;
    pub const MAP_LAYOUTS: usize = 1024;
    pub const LAYOUT_BLOCKS: u32 = 0x2800;
}

pub mod wild {
    // Encounter slots per habitat
    pub const GRASS_SLOTS: usize = 12;
    pub const WATER_SLOTS: usize = 5;
    pub const ROCK_SMASH_SLOTS: usize = 5;
    pub const FISHING_SLOTS: usize = 10;
    pub const TERMINATOR: u8 = 0xFF;
}

pub mod sprites {
    pub const TILE_TAG_NONE: u16 = 0xFFFF;
}

// Border size used by layouts that do not store one
pub const DEFAULT_BORDER_SIZE: u8 = 2;

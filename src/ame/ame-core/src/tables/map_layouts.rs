use super::{check_count, record_offset, RomTable};
use crate::config::RomConfig;
use crate::constants::{limits, records, DEFAULT_BORDER_SIZE};
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;

/// Block grid of a map plus the tilesets it draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLayout {
    pub width: u32,
    pub height: u32,
    pub border_width: u8,
    pub border_height: u8,
    pub border: Vec<u16>,
    pub blocks: Vec<u16>, // Row-major, `width * height` entries
    pub primary_tileset: u32,
    pub secondary_tileset: u32,
}

impl MapLayout {
    pub fn block(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.blocks.get((y * self.width + x) as usize).copied()
    }
}

/// Layout slots; empty slots are kept so layout ids stay aligned
#[derive(Debug, Clone, Default)]
pub struct MapLayoutTable {
    layouts: Vec<Option<MapLayout>>,
}

impl MapLayoutTable {
    pub fn layouts(&self) -> &[Option<MapLayout>] {
        &self.layouts
    }

    /// Layout ids stored in map headers are 1-based
    pub fn by_id(&self, layout_id: u16) -> Option<&MapLayout> {
        let index = (layout_id as usize).checked_sub(1)?;
        self.layouts.get(index)?.as_ref()
    }
}

impl RomTable for MapLayoutTable {
    const KIND: TableKind = TableKind::MapLayouts;

    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError> {
        check_count(config.map_layout_count, limits::MAP_LAYOUTS)?;

        let mut layouts = Vec::with_capacity(config.map_layout_count);
        for i in 0..config.map_layout_count {
            let layout = match rom.read_optional_pointer(record_offset(config.map_layouts, i, 4)?)? {
                Some(header) => Some(read_layout(rom, header, i, config.layout_border_size)?),
                None => None,
            };
            layouts.push(layout);
        }

        Ok(Self { layouts })
    }

    fn len(&self) -> usize {
        self.layouts.len()
    }
}

fn read_layout<R: RomAccess + ?Sized>(
    rom: &R,
    header: u32,
    index: usize,
    has_border_size: bool,
) -> Result<MapLayout, TableReadError> {
    let header_size = if has_border_size {
        records::LAYOUT_HEADER_FRLG
    } else {
        records::LAYOUT_HEADER_RSE
    };
    let raw = rom.read_bytes(header, header_size)?;

    let width = rom.read_u32(header)?;
    let height = rom.read_u32(header + 4)?;
    let area = width.checked_mul(height).filter(|&a| a > 0 && a <= limits::LAYOUT_BLOCKS);
    let area = match area {
        Some(area) => area as usize,
        None => {
            return Err(TableReadError::Malformed {
                index,
                reason: format!("layout dimensions {}x{} are out of range", width, height),
            })
        }
    };

    let (border_width, border_height) = if has_border_size {
        (raw[24], raw[25])
    } else {
        (DEFAULT_BORDER_SIZE, DEFAULT_BORDER_SIZE)
    };

    let border_at = rom.read_pointer(header + 8)?;
    let blocks_at = rom.read_pointer(header + 12)?;
    let border_len = border_width as usize * border_height as usize;

    Ok(MapLayout {
        width,
        height,
        border_width,
        border_height,
        border: read_blocks(rom, border_at, border_len)?,
        blocks: read_blocks(rom, blocks_at, area)?,
        primary_tileset: rom.read_pointer(header + 16)?,
        secondary_tileset: rom.read_pointer(header + 20)?,
    })
}

fn read_blocks<R: RomAccess + ?Sized>(rom: &R, offset: u32, count: usize) -> Result<Vec<u16>, TableReadError> {
    let raw = rom.read_bytes(offset, count * 2)?;
    Ok(raw
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect())
}

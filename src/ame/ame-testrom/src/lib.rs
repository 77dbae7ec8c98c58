//! Synthetic GBA cartridge images for exercising the table loaders.
//!
//! Every table is laid out the way the retail games store it, but the
//! content is small and predictable so tests can assert on exact values.

/// GBA address of the first ROM byte
pub const ROM_BASE: u32 = 0x0800_0000;

const HEADER_SIZE: usize = 0xC0;
const TITLE_OFFSET: usize = 0xA0;
const CODE_OFFSET: usize = 0xAC;
const MAKER_OFFSET: usize = 0xB0;
const FIXED_OFFSET: usize = 0xB2;
const VERSION_OFFSET: usize = 0xBC;

const SPECIES_NAME_LEN: usize = 11;
const ITEM_SIZE: usize = 44;
const ITEM_NAME_LEN: usize = 14;
const SPRITE_HEADER_SIZE: usize = 36;
const WILD_HEADER_SIZE: usize = 20;
const MAP_HEADER_SIZE: usize = 28;
const TILESET_HEADER_SIZE: usize = 24;

/// File offsets of every table written into the image
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout {
    pub map_names: u32,
    pub wild_pokemon: u32,
    pub pokemon_names: u32,
    pub items: u32,
    pub overworld_sprites: u32,
    pub map_banks: u32,
    pub map_layouts: u32,
    pub primary_tileset: u32,
    pub secondary_tileset: u32,
}

/// A finished image plus the offsets of its tables
pub struct TestRom {
    pub bytes: Vec<u8>,
    pub layout: Layout,
}

impl TestRom {
    /// Overwrites a little-endian word, used to corrupt a table on purpose
    pub fn poke_u32(&mut self, offset: u32, value: u32) {
        let at = offset as usize;
        self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Converts a file offset into the pointer form stored inside the image
    pub fn pointer(offset: u32) -> u32 {
        ROM_BASE + offset
    }
}

/// Incrementally describes the tables a test image should contain
pub struct RomBuilder {
    game_code: [u8; 4],
    title: String,
    map_names: Vec<String>,
    map_name_stride: usize,
    map_name_pointer_offset: usize,
    wild_targets: Vec<(u8, u8)>,
    species: Vec<String>,
    items: Vec<(String, u16)>,
    overworlds: usize,
    bank_sizes: Vec<usize>,
    layouts: Vec<Option<(u32, u32)>>,
    layout_border_size: bool,
}

impl RomBuilder {
    pub fn new(game_code: &str) -> Self {
        let mut code = [b' '; 4];
        for (slot, byte) in code.iter_mut().zip(game_code.bytes()) {
            *slot = byte;
        }
        Self {
            game_code: code,
            title: String::from("POKEMON TEST"),
            map_names: Vec::new(),
            map_name_stride: 4,
            map_name_pointer_offset: 0,
            wild_targets: Vec::new(),
            species: Vec::new(),
            items: Vec::new(),
            overworlds: 0,
            bank_sizes: Vec::new(),
            layouts: Vec::new(),
            layout_border_size: true,
        }
    }

    /// Fills every table with a few entries; banks get 3 and 1 maps
    pub fn populated(game_code: &str) -> Self {
        Self::new(game_code)
            .map_names(&["PALLET TOWN", "VIRIDIAN CITY", "ROUTE 1"])
            .wild_tables(&[(0, 2), (1, 0)])
            .species(&["??????????", "BULBASAUR", "IVYSAUR", "VENUSAUR"])
            .items(&[("????????", 0), ("MASTER BALL", 0), ("POTION", 300)])
            .overworlds(3)
            .map_banks(&[3, 1])
            .map_layouts(&[Some((4, 3)), None, Some((2, 2))])
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn map_names(mut self, names: &[&str]) -> Self {
        self.map_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Emerald-style entries carry the name pointer inside a larger record
    pub fn map_name_entries(mut self, stride: usize, pointer_offset: usize) -> Self {
        self.map_name_stride = stride;
        self.map_name_pointer_offset = pointer_offset;
        self
    }

    /// One encounter header per `(bank, map)` target, in the given order
    pub fn wild_tables(mut self, targets: &[(u8, u8)]) -> Self {
        self.wild_targets = targets.to_vec();
        self
    }

    pub fn species(mut self, names: &[&str]) -> Self {
        self.species = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn items(mut self, items: &[(&str, u16)]) -> Self {
        self.items = items.iter().map(|(n, p)| (n.to_string(), *p)).collect();
        self
    }

    pub fn overworlds(mut self, count: usize) -> Self {
        self.overworlds = count;
        self
    }

    /// Number of maps in each bank
    pub fn map_banks(mut self, sizes: &[usize]) -> Self {
        self.bank_sizes = sizes.to_vec();
        self
    }

    /// Layout dimensions per slot; `None` leaves a null pointer in the table
    pub fn map_layouts(mut self, layouts: &[Option<(u32, u32)>]) -> Self {
        self.layouts = layouts.to_vec();
        self
    }

    /// FRLG layouts store their border size; RSE ones always use 2x2
    pub fn layout_border_size(mut self, present: bool) -> Self {
        self.layout_border_size = present;
        self
    }

    pub fn build(self) -> TestRom {
        let mut image = Image::new();
        image.put(TITLE_OFFSET, &fixed_ascii(&self.title, 12));
        image.put(CODE_OFFSET, &self.game_code);
        image.put(MAKER_OFFSET, b"01");
        image.put(FIXED_OFFSET, &[0x96]);
        image.put(VERSION_OFFSET, &[0x00]);

        let mut layout = Layout::default();

        // Shared scratch area that stands in for graphics and script data
        let scratch = image.alloc(0x40);

        layout.map_names = self.write_map_names(&mut image);
        layout.wild_pokemon = self.write_wild_pokemon(&mut image);
        layout.pokemon_names = self.write_species(&mut image);
        layout.items = self.write_items(&mut image);
        layout.overworld_sprites = self.write_overworlds(&mut image);

        layout.primary_tileset = write_tileset(&mut image, false, scratch);
        layout.secondary_tileset = write_tileset(&mut image, true, scratch);
        layout.map_layouts = self.write_layouts(&mut image, &layout);
        layout.map_banks = self.write_banks(&mut image, scratch);

        TestRom {
            bytes: image.bytes,
            layout,
        }
    }

    fn write_map_names(&self, image: &mut Image) -> u32 {
        let table = image.alloc(self.map_names.len() * self.map_name_stride);
        for (i, name) in self.map_names.iter().enumerate() {
            let text = image.alloc_with(&encode_text(name));
            let entry = table as usize + i * self.map_name_stride;
            image.put_u32(entry + self.map_name_pointer_offset, TestRom::pointer(text));
        }
        table
    }

    fn write_wild_pokemon(&self, image: &mut Image) -> u32 {
        let table = image.alloc((self.wild_targets.len() + 1) * WILD_HEADER_SIZE);
        for (i, (bank, map)) in self.wild_targets.iter().enumerate() {
            let entry = table as usize + i * WILD_HEADER_SIZE;
            image.put(entry, &[*bank, *map]);
            let grass = write_habitat(image, 20, 12, i as u16 + 1);
            image.put_u32(entry + 4, TestRom::pointer(grass));
            if i % 2 == 1 {
                let fishing = write_habitat(image, 30, 10, i as u16 + 100);
                image.put_u32(entry + 16, TestRom::pointer(fishing));
            }
        }
        let end = table as usize + self.wild_targets.len() * WILD_HEADER_SIZE;
        image.put(end, &[0xFF, 0xFF]);
        table
    }

    fn write_species(&self, image: &mut Image) -> u32 {
        let table = image.alloc(self.species.len() * SPECIES_NAME_LEN);
        for (i, name) in self.species.iter().enumerate() {
            let at = table as usize + i * SPECIES_NAME_LEN;
            image.put(at, &padded_text(name, SPECIES_NAME_LEN));
        }
        table
    }

    fn write_items(&self, image: &mut Image) -> u32 {
        let table = image.alloc(self.items.len() * ITEM_SIZE);
        for (i, (name, price)) in self.items.iter().enumerate() {
            let at = table as usize + i * ITEM_SIZE;
            image.put(at, &padded_text(name, ITEM_NAME_LEN));
            image.put_u16(at + 0x0E, i as u16);
            image.put_u16(at + 0x10, *price);
            image.put(at + 0x1A, &[1, 4]);
        }
        table
    }

    fn write_overworlds(&self, image: &mut Image) -> u32 {
        let table = image.alloc(self.overworlds * 4);
        for i in 0..self.overworlds {
            let header = image.alloc(SPRITE_HEADER_SIZE) as usize;
            image.put_u16(header, 0xFFFF);
            image.put_u16(header + 2, 0x1100 + i as u16);
            image.put_u16(header + 4, 0x1102);
            image.put_u16(header + 6, 256);
            image.put_u16(header + 8, 16);
            image.put_u16(header + 10, 32);
            image.put_u32(table as usize + i * 4, TestRom::pointer(header as u32));
        }
        table
    }

    fn write_layouts(&self, image: &mut Image, layout: &Layout) -> u32 {
        let table = image.alloc(self.layouts.len() * 4);
        let header_size = if self.layout_border_size { 0x1C } else { 0x18 };
        for (i, dims) in self.layouts.iter().enumerate() {
            let (width, height) = match dims {
                Some(dims) => *dims,
                None => continue,
            };
            let border = image.alloc(2 * 2 * 2);
            let blocks_data: Vec<u8> = (0..width * height)
                .flat_map(|b| ((b as u16) | 0x3000).to_le_bytes())
                .collect();
            let blocks = image.alloc_with(&blocks_data);
            let header = image.alloc(header_size) as usize;
            image.put_u32(header, width);
            image.put_u32(header + 4, height);
            image.put_u32(header + 8, TestRom::pointer(border));
            image.put_u32(header + 12, TestRom::pointer(blocks));
            image.put_u32(header + 16, TestRom::pointer(layout.primary_tileset));
            image.put_u32(header + 20, TestRom::pointer(layout.secondary_tileset));
            if self.layout_border_size {
                image.put(header + 24, &[2, 2]);
            }
            image.put_u32(table as usize + i * 4, TestRom::pointer(header as u32));
        }
        table
    }

    fn write_banks(&self, image: &mut Image, scratch: u32) -> u32 {
        let table = image.alloc(self.bank_sizes.len() * 4);
        for (bank, maps) in self.bank_sizes.iter().enumerate() {
            // Trailing zero word ends the list
            let list = image.alloc((maps + 1) * 4);
            for map in 0..*maps {
                let header = image.alloc(MAP_HEADER_SIZE) as usize;
                image.put_u32(header, TestRom::pointer(scratch));
                image.put_u16(header + 16, 0x012C + map as u16);
                image.put_u16(header + 18, 1);
                image.put(header + 20, &[0x58 + bank as u8, 0, 2, 1, 0, 0, 1, 0]);
                image.put_u32(list as usize + map * 4, TestRom::pointer(header as u32));
            }
            image.put_u32(table as usize + bank * 4, TestRom::pointer(list));
        }
        table
    }
}

fn write_habitat(image: &mut Image, rate: u8, slots: usize, species: u16) -> u32 {
    let mut data = Vec::with_capacity(slots * 4);
    for slot in 0..slots {
        data.push(2 + slot as u8);
        data.push(4 + slot as u8);
        data.extend_from_slice(&species.to_le_bytes());
    }
    let slots_at = image.alloc_with(&data);
    let habitat = image.alloc(8);
    image.put(habitat as usize, &[rate]);
    image.put_u32(habitat as usize + 4, TestRom::pointer(slots_at));
    habitat
}

fn write_tileset(image: &mut Image, secondary: bool, scratch: u32) -> u32 {
    let header = image.alloc(TILESET_HEADER_SIZE) as usize;
    image.put(header, &[0, secondary as u8]);
    image.put_u32(header + 4, TestRom::pointer(scratch));
    image.put_u32(header + 8, TestRom::pointer(scratch));
    image.put_u32(header + 12, TestRom::pointer(scratch));
    image.put_u32(header + 20, TestRom::pointer(scratch));
    header as u32
}

/// Growable image with a bump allocator; every allocation is word aligned
struct Image {
    bytes: Vec<u8>,
}

impl Image {
    fn new() -> Self {
        Self {
            bytes: vec![0; HEADER_SIZE],
        }
    }

    fn alloc(&mut self, len: usize) -> u32 {
        let start = (self.bytes.len() + 3) & !3;
        self.bytes.resize(start + len.max(1), 0);
        start as u32
    }

    fn alloc_with(&mut self, data: &[u8]) -> u32 {
        let start = self.alloc(data.len());
        self.put(start as usize, data);
        start
    }

    fn put(&mut self, at: usize, data: &[u8]) {
        self.bytes[at..at + data.len()].copy_from_slice(data);
    }

    fn put_u16(&mut self, at: usize, value: u16) {
        self.put(at, &value.to_le_bytes());
    }

    fn put_u32(&mut self, at: usize, value: u32) {
        self.put(at, &value.to_le_bytes());
    }
}

fn fixed_ascii(text: &str, len: usize) -> Vec<u8> {
    let mut out: Vec<u8> = text.bytes().take(len).collect();
    out.resize(len, 0);
    out
}

/// Encodes ASCII into the in-game character set, 0xFF terminated
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut out: Vec<u8> = text.chars().map(encode_char).collect();
    out.push(0xFF);
    out
}

fn padded_text(text: &str, len: usize) -> Vec<u8> {
    let mut out = encode_text(text);
    out.truncate(len);
    out.resize(len, 0xFF);
    out
}

fn encode_char(c: char) -> u8 {
    match c {
        ' ' => 0x00,
        '0'..='9' => 0xA1 + (c as u8 - b'0'),
        '!' => 0xAB,
        '?' => 0xAC,
        '.' => 0xAD,
        '-' => 0xAE,
        '\'' => 0xB4,
        ',' => 0xB8,
        '/' => 0xBA,
        'A'..='Z' => 0xBB + (c as u8 - b'A'),
        'a'..='z' => 0xD5 + (c as u8 - b'a'),
        ':' => 0xF0,
        _ => 0xAC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_land_at_cartridge_offsets() {
        let rom = RomBuilder::new("BPRE").build();
        assert_eq!(&rom.bytes[CODE_OFFSET..CODE_OFFSET + 4], b"BPRE");
        assert_eq!(rom.bytes[FIXED_OFFSET], 0x96);
    }

    #[test]
    fn tables_do_not_overlap_the_header() {
        let rom = RomBuilder::populated("BPRE").build();
        let layout = rom.layout;
        for offset in [
            layout.map_names,
            layout.wild_pokemon,
            layout.pokemon_names,
            layout.items,
            layout.overworld_sprites,
            layout.map_banks,
            layout.map_layouts,
        ] {
            assert!(offset as usize >= HEADER_SIZE);
            assert_eq!(offset % 4, 0);
            assert!((offset as usize) < rom.bytes.len());
        }
    }

    #[test]
    fn wild_table_ends_with_terminator() {
        let rom = RomBuilder::new("BPRE").wild_tables(&[(3, 4)]).build();
        let end = rom.layout.wild_pokemon as usize + WILD_HEADER_SIZE;
        assert_eq!(&rom.bytes[end..end + 2], &[0xFF, 0xFF]);
    }
}

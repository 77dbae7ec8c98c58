use super::{check_count, record_offset, RomTable};
use crate::config::RomConfig;
use crate::constants::{limits, records};
use crate::error::{TableKind, TableReadError};
use crate::rom::RomAccess;
use crate::utils::decode_text;

/// One entry of the item data table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub index: u16,
    pub price: u16,
    pub hold_effect: u8,
    pub parameter: u8,
    pub pocket: u8,
    pub kind: u8,
}

#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    items: Vec<Item>,
}

impl ItemTable {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: u16) -> Option<&Item> {
        self.items.get(id as usize)
    }
}

impl RomTable for ItemTable {
    const KIND: TableKind = TableKind::Items;

    fn read<R: RomAccess + ?Sized>(rom: &R, config: &RomConfig) -> Result<Self, TableReadError> {
        check_count(config.item_count, limits::ITEMS)?;

        let mut items = Vec::with_capacity(config.item_count);
        for i in 0..config.item_count {
            let raw = rom.read_bytes(record_offset(config.items, i, records::ITEM)?, records::ITEM)?;
            items.push(Item {
                name: decode_text(&raw[..records::ITEM_NAME]),
                index: u16::from_le_bytes([raw[0x0E], raw[0x0F]]),
                price: u16::from_le_bytes([raw[0x10], raw[0x11]]),
                hold_effect: raw[0x12],
                parameter: raw[0x13],
                pocket: raw[0x1A],
                kind: raw[0x1B],
            });
        }

        Ok(Self { items })
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

use super::RomAccess;
use crate::constants::header;
use crate::error::RomError;

/// Identification fields of the cartridge header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHeader {
    pub title: String,
    pub game_code: String,
    pub maker_code: String,
    pub version: u8,
}

impl RomHeader {
    pub fn read<R: RomAccess + ?Sized>(rom: &R) -> Result<Self, RomError> {
        let title = rom.read_bytes(header::TITLE, header::TITLE_LEN)?;
        let code = rom.read_bytes(header::GAME_CODE, 4)?;
        let maker = rom.read_bytes(header::MAKER_CODE, 2)?;
        Ok(Self {
            title: ascii_field(title),
            game_code: ascii_field(code),
            maker_code: ascii_field(maker),
            version: rom.read_u8(header::VERSION)?,
        })
    }

    /// Header checksum byte must be the fixed value 0x96
    pub fn has_fixed_value<R: RomAccess + ?Sized>(rom: &R) -> bool {
        matches!(rom.read_u8(header::FIXED_VALUE), Ok(0x96))
    }
}

// Header strings are NUL padded ASCII
fn ascii_field(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect::<String>()
        .trim_end()
        .to_string()
}

mod header;
mod image;

pub use header::RomHeader;
pub use image::RomImage;

use crate::constants::ROM_BASE;
use crate::error::RomError;
use crate::utils::pointer_to_offset;

/// Byte-range access to a cartridge image, addressed by file offset
pub trait RomAccess {
    /// Total image size in bytes
    fn size(&self) -> usize;

    /// Borrow `len` bytes at `offset`; fails if any byte is out of range
    fn read_bytes(&self, offset: u32, len: usize) -> Result<&[u8], RomError>;

    fn read_u8(&self, offset: u32) -> Result<u8, RomError> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    fn read_u16(&self, offset: u32) -> Result<u16, RomError> {
        let b = self.read_bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&self, offset: u32) -> Result<u32, RomError> {
        let b = self.read_bytes(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Checks that a stored pointer addresses a byte inside this image
    fn is_valid_pointer(&self, pointer: u32) -> bool {
        pointer >= ROM_BASE && (pointer_to_offset(pointer) as usize) < self.size()
    }

    /// Read a stored pointer and return the file offset it refers to
    fn read_pointer(&self, offset: u32) -> Result<u32, RomError> {
        let pointer = self.read_u32(offset)?;
        if !self.is_valid_pointer(pointer) {
            return Err(RomError::BadPointer(pointer));
        }
        Ok(pointer_to_offset(pointer))
    }

    /// Like `read_pointer`, but a stored zero yields `None`
    fn read_optional_pointer(&self, offset: u32) -> Result<Option<u32>, RomError> {
        match self.read_u32(offset)? {
            0 => Ok(None),
            _ => self.read_pointer(offset).map(Some),
        }
    }

    fn header(&self) -> Result<RomHeader, RomError> {
        RomHeader::read(self)
    }
}

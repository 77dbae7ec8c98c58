use std::fs;
use std::path::Path;

use super::RomAccess;
use crate::constants::ROM_MAX_SIZE;
use crate::error::RomError;
use log::debug;

/// Cartridge image held fully in memory
pub struct RomImage {
    bytes: Vec<u8>,
}

impl RomImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RomError> {
        if bytes.len() > ROM_MAX_SIZE as usize {
            return Err(RomError::TooLarge(bytes.len()));
        }
        Ok(Self { bytes })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let bytes = fs::read(path.as_ref())?;
        debug!("Read {} bytes from {}", bytes.len(), path.as_ref().display());
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RomAccess for RomImage {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read_bytes(&self, offset: u32, len: usize) -> Result<&[u8], RomError> {
        let start = offset as usize;
        // Bounds check for the whole range, not just the start
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(&self.bytes[start..end]),
            _ => Err(RomError::OutOfRange {
                offset,
                len,
                size: self.bytes.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> RomImage {
        RomImage::from_bytes(vec![0x78, 0x56, 0x34, 0x12, 0xA8, 0x26, 0x35, 0x08]).unwrap()
    }

    #[test]
    fn reads_little_endian_words() {
        let rom = image();
        assert_eq!(rom.read_u8(0).unwrap(), 0x78);
        assert_eq!(rom.read_u16(0).unwrap(), 0x5678);
        assert_eq!(rom.read_u32(0).unwrap(), 0x1234_5678);
    }

    #[test]
    fn range_past_end_is_rejected() {
        let rom = image();
        assert!(rom.read_bytes(4, 4).is_ok());
        assert!(matches!(
            rom.read_bytes(5, 4),
            Err(RomError::OutOfRange { offset: 5, len: 4, size: 8 })
        ));
        assert!(rom.read_bytes(u32::MAX, 2).is_err());
    }

    #[test]
    fn pointer_must_land_inside_image() {
        let rom = image();
        // 0x083526A8 is a plausible pointer but this image is only 8 bytes
        assert!(matches!(rom.read_pointer(4), Err(RomError::BadPointer(0x0835_26A8))));
        assert!(matches!(rom.read_pointer(0), Err(RomError::BadPointer(_))));
        assert!(rom.is_valid_pointer(0x0800_0007));
        assert!(!rom.is_valid_pointer(0x0800_0008));
    }

    #[test]
    fn zero_is_an_absent_pointer() {
        let rom = RomImage::from_bytes(vec![0; 8]).unwrap();
        assert_eq!(rom.read_optional_pointer(0).unwrap(), None);
    }

    #[test]
    fn missing_file_reports_io() {
        let result = RomImage::from_file("/nonexistent/rom.gba");
        assert!(matches!(result, Err(RomError::Io(_))));
    }
}

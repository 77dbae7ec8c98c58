use crate::constants::{text, ROM_BASE, ROM_MAX_SIZE};

// Checks whether a raw word could address the ROM window at all
pub fn is_rom_pointer(value: u32) -> bool {
    value >= ROM_BASE && value < ROM_BASE + ROM_MAX_SIZE
}

// Converts a GBA ROM pointer into a file offset
pub fn pointer_to_offset(pointer: u32) -> u32 {
    pointer.wrapping_sub(ROM_BASE)
}

// Converts a file offset into the pointer form the games store
pub fn offset_to_pointer(offset: u32) -> u32 {
    offset.wrapping_add(ROM_BASE)
}

// Maps one byte of the in-game character set to a displayable char
pub fn decode_char(byte: u8) -> char {
    match byte {
        0x00 => ' ',
        0xA1..=0xAA => (b'0' + (byte - 0xA1)) as char,
        0xAB => '!',
        0xAC => '?',
        0xAD => '.',
        0xAE => '-',
        0xB0 => '…',
        0xB1 => '“',
        0xB2 => '”',
        0xB3 => '‘',
        0xB4 => '\'',
        0xB5 => '♂',
        0xB6 => '♀',
        0xB8 => ',',
        0xBA => '/',
        0xBB..=0xD4 => (b'A' + (byte - 0xBB)) as char,
        0xD5..=0xEE => (b'a' + (byte - 0xD5)) as char,
        0xF0 => ':',
        _ => '?',
    }
}

// Decodes a terminated string; stops at the terminator or the end of input
pub fn decode_text(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut iter = bytes.iter().take(text::MAX_LEN);
    while let Some(&byte) = iter.next() {
        match byte {
            text::TERMINATOR => break,
            0xFC | 0xFD => {
                // Control codes carry one argument byte
                iter.next();
            }
            0xFE => out.push('\n'),
            _ => out.push(decode_char(byte)),
        }
    }
    out
}

// Unit tests for text and pointer conversion
#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_pointer_window() {
        assert!(is_rom_pointer(0x0800_0000));
        assert!(is_rom_pointer(0x09FF_FFFF));
        assert!(!is_rom_pointer(0x0A00_0000));
        assert!(!is_rom_pointer(0x0200_0000));
        assert!(!is_rom_pointer(0));
    }

    #[test]
    fn test_pointer_offset_inverse() {
        for offset in [0u32, 0xC0, 0x3526A8, 0x01FF_FFFF] {
            assert_eq!(pointer_to_offset(offset_to_pointer(offset)), offset);
        }
    }

    #[test]
    fn test_decode_letters_and_digits() {
        let encoded = ame_testrom::encode_text("Route 12");
        assert_eq!(decode_text(&encoded), "Route 12");
    }

    #[test]
    fn test_decode_stops_at_terminator() {
        assert_eq!(decode_text(&[0xBB, 0xFF, 0xBC]), "A");
    }

    #[test]
    fn test_decode_without_terminator() {
        assert_eq!(decode_text(&[0xBB, 0xBC]), "AB");
    }

    #[test]
    fn test_decode_skips_control_argument() {
        assert_eq!(decode_text(&[0xFD, 0x01, 0xBB, 0xFF]), "A");
    }
}

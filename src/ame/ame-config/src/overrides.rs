use ame_core::RomConfig;

/// Replacement offsets for the four tables located through configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub map_names: Option<u32>,
    pub wild_pokemon: Option<u32>,
    pub map_banks: Option<u32>,
    pub map_layouts: Option<u32>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, config: &mut RomConfig) {
        if let Some(offset) = self.map_names {
            config.map_names = offset;
        }
        if let Some(offset) = self.wild_pokemon {
            config.wild_pokemon = offset;
        }
        if let Some(offset) = self.map_banks {
            config.map_banks = offset;
        }
        if let Some(offset) = self.map_layouts {
            config.map_layouts = offset;
        }
    }
}

/// Parses an offset given as `0x`-prefixed hex or plain decimal.
///
/// GBA pointers (0x08xxxxxx) are accepted and converted to file offsets.
pub fn parse_offset(text: &str) -> Option<u32> {
    let text = text.trim();
    let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => text.parse().ok()?,
    };
    if ame_core::utils::is_rom_pointer(value) {
        Some(ame_core::utils::pointer_to_offset(value))
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_decimal_and_pointers() {
        assert_eq!(parse_offset("0x3526A8"), Some(0x35_26A8));
        assert_eq!(parse_offset("0X3526a8"), Some(0x35_26A8));
        assert_eq!(parse_offset("1024"), Some(1024));
        assert_eq!(parse_offset("0x083526A8"), Some(0x35_26A8));
        assert_eq!(parse_offset("bank"), None);
        assert_eq!(parse_offset("0x"), None);
    }

    #[test]
    fn empty_overrides_change_nothing() {
        assert!(Overrides::default().is_empty());
        let set = Overrides {
            map_names: Some(4),
            ..Overrides::default()
        };
        assert!(!set.is_empty());
    }
}

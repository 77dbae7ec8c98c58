use core::fmt;
use thiserror::Error;

/// Failures of the byte-access layer
#[derive(Debug, Error)]
pub enum RomError {
    #[error("read of {len} bytes at 0x{offset:06X} is outside the {size}-byte image")]
    OutOfRange { offset: u32, len: usize, size: usize },
    #[error("0x{0:08X} is not a pointer into the image")]
    BadPointer(u32),
    #[error("image is larger than the 32 MiB ROM window ({0} bytes)")]
    TooLarge(usize),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while resolving the table offsets for a ROM
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration for game code {code:?}")]
    UnknownRom { code: String },
    #[error("cartridge header is unreadable: {0}")]
    Header(#[source] RomError),
    #[error("configuration for {code:?} is malformed: {reason}")]
    Malformed { code: String, reason: String },
}

/// Failures decoding one table region
#[derive(Debug, Error)]
pub enum TableReadError {
    #[error(transparent)]
    Rom(#[from] RomError),
    #[error("record count {count} exceeds limit {limit}")]
    BadCount { count: usize, limit: usize },
    #[error("malformed record {index}: {reason}")]
    Malformed { index: usize, reason: String },
}

/// Identifies which of the seven load steps a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    MapNames,
    WildPokemon,
    Pokemon,
    Items,
    Overworlds,
    MapBanks,
    MapLayouts,
}

impl TableKind {
    /// Every kind in load order
    pub const ALL: [TableKind; 7] = [
        TableKind::MapNames,
        TableKind::WildPokemon,
        TableKind::Pokemon,
        TableKind::Items,
        TableKind::Overworlds,
        TableKind::MapBanks,
        TableKind::MapLayouts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableKind::MapNames => "map name",
            TableKind::WildPokemon => "wild Pokémon",
            TableKind::Pokemon => "Pokémon",
            TableKind::Items => "item",
            TableKind::Overworlds => "overworld",
            TableKind::MapBanks => "map bank",
            TableKind::MapLayouts => "map layout",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned by the load orchestrator
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read the {table} table: {source}")]
    Table {
        table: TableKind,
        #[source]
        source: TableReadError,
    },
    /// A reader thread exited without reporting; the sequential loader never
    /// returns this
    #[error("the {0} table reader finished without a result")]
    Missing(TableKind),
}

impl LoadError {
    /// The step that failed, if it was a table read
    pub fn table(&self) -> Option<TableKind> {
        match self {
            LoadError::Table { table, .. } | LoadError::Missing(table) => Some(*table),
            LoadError::Config(_) => None,
        }
    }
}

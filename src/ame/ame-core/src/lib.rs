pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod loader;
pub mod rom;
pub mod tables;
pub mod tileset;
pub mod utils;

pub use config::{ConfigProvider, RomConfig};
pub use data::LoadedData;
pub use error::{ConfigError, LoadError, RomError, TableKind, TableReadError};
pub use rom::{RomAccess, RomHeader, RomImage};
pub use tileset::{TilesetCache, TilesetStore};

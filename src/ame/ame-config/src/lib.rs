pub mod overrides;
pub mod profiles;

pub use overrides::{parse_offset, Overrides};
pub use profiles::Profiles;

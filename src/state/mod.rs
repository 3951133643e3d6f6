pub mod filter_state;
pub mod segments;
pub mod theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

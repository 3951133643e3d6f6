pub mod palette;
pub mod registry;
pub mod schema;
pub mod series;
pub mod statistics;
pub mod style;

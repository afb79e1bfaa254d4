pub mod model;

pub use model::map::{CellView, Map, MapOrigin};

pub use terrastead_core::{BiomeResolver, DamageOutcome, GenerationError};
pub mod biome {
    pub use terrastead_core::biome::*;
}
pub mod config {
    pub use terrastead_core::config::*;
}
pub mod content {
    pub use terrastead_data::data::content::*;
}
pub mod creature {
    pub use terrastead_core::creature::*;
}
pub mod grid {
    pub use terrastead_core::grid::*;
}
pub mod noise {
    pub use terrastead_core::noise::*;
}
pub mod persistence {
    pub use terrastead_io::*;
}

pub mod map;
pub mod preview;

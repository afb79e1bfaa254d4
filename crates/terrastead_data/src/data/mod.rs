//! Core data structures for the Terrastead world.

pub mod content;
pub mod tile;

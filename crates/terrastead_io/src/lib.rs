//! # Terrastead IO
//!
//! Persistence layer for Terrastead maps.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - The binary save format: a zlib-compressed tile blob and a flat
//!   creature record file per map directory

/// Error types and result aliases for I/O operations
pub mod error;
/// Map save/load codec and save-directory layout
pub mod persistence;

pub use error::{IoError, Result};
pub use persistence::{DecompressPolicy, MapStore, SaveData};

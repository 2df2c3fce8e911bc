#![warn(missing_docs)]

//! Data core for a tile-based RPG level editor: a grid of map cells, each
//! holding an ordered stack of tile layers, a line-oriented text format for
//! loading/saving the grid, and a compositor that keeps a pixel image of the
//! whole map in lock-step with edits.
//!
//! GUI wiring lives outside this crate and drives it through [`RpgMap`]'s
//! editing operations and read accessors.

mod cell;
pub mod codec;
mod compose;
mod config;
mod error;
mod map;
mod tileset;

pub use cell::{Layer, MapCell};
pub use compose::{COLOUR_A, COLOUR_B};
pub use config::MapsConfig;
pub use error::MapError;
pub use map::RpgMap;
pub use tileset::{Tile, TileRegistry, TileSet};

/// Edge length of a tile in pixels (16 px art at the editor's 2x scale).
pub const TILE_SIZE: u32 = 32;

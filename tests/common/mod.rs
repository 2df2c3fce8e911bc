#![allow(dead_code)]

use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use rpgmap::{TileRegistry, TileSet};

pub const TILE: u32 = 4;

/// A tile set of solid-colour tiles laid out in one atlas row.
pub fn solid_set(name: &str, ids: &[&str], tile_size: u32) -> TileSet {
    let mut atlas = RgbaImage::new(tile_size * ids.len() as u32, tile_size);
    let mut positions = HashMap::new();
    for (i, id) in ids.iter().enumerate() {
        let colour = Rgba([(40 * (i + 1)) as u8, 100, 200, 255]);
        for x in 0..tile_size {
            for y in 0..tile_size {
                atlas.put_pixel(i as u32 * tile_size + x, y, colour);
            }
        }
        positions.insert(id.to_string(), (i as u32, 0));
    }
    TileSet::from_atlas(name, &atlas, &positions, tile_size)
}

/// Registry pre-seeded with the tile sets the test maps reference.
pub fn test_registry() -> TileRegistry {
    let mut registry = TileRegistry::new("tiles", TILE);
    registry.insert(solid_set("grass", &["n1", "l2", "dark"], TILE));
    registry.insert(solid_set("wood", &["c_supp", "lrs_supp"], TILE));
    registry
}

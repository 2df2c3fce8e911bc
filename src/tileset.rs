use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use image::RgbaImage;
use serde::Deserialize;

use crate::error::MapError;

/// Descriptor JSON that sits next to each atlas image, mapping tile ids to
/// `[col, row]` positions in the atlas grid.
#[derive(Deserialize)]
struct TileSetDef {
    tiles: HashMap<String, (u32, u32)>,
}

/// One tile: its owning set, its id within that set, and its image.
///
/// Tiles are immutable once loaded; the image is shared between the set,
/// the cells referencing the tile, and any picker UI.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Name of the tile set this tile was sliced from.
    pub set: String,
    /// Id unique within the set.
    pub id: String,
    /// The tile's pixels, shared with every cell referencing it.
    pub image: Rc<RgbaImage>,
}

impl Tile {
    /// Qualified name as written in map files, e.g. `grass:l2`.
    pub fn name(&self) -> String {
        format!("{}:{}", self.set, self.id)
    }
}

/// A named collection of tiles sliced out of one atlas image, addressable
/// both by id and by atlas `(col, row)` position.
#[derive(Debug)]
pub struct TileSet {
    name: String,
    tiles: HashMap<String, Rc<RgbaImage>>,
    by_point: HashMap<(u32, u32), String>,
}

impl TileSet {
    /// Slice `atlas` into per-tile images according to `positions`.
    /// Entries that fall outside the atlas are dropped.
    pub fn from_atlas(
        name: &str,
        atlas: &RgbaImage,
        positions: &HashMap<String, (u32, u32)>,
        tile_size: u32,
    ) -> Self {
        let mut tiles = HashMap::new();
        let mut by_point = HashMap::new();
        for (id, &(col, row)) in positions {
            let (px, py) = (col * tile_size, row * tile_size);
            if px + tile_size > atlas.width() || py + tile_size > atlas.height() {
                continue;
            }
            let img = image::imageops::crop_imm(atlas, px, py, tile_size, tile_size).to_image();
            tiles.insert(id.clone(), Rc::new(img));
            by_point.insert((col, row), id.clone());
        }
        TileSet {
            name: name.to_string(),
            tiles,
            by_point,
        }
    }

    /// The set's name, as referenced from map files.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve a tile by id. `None` for unknown ids; callers decide whether
    /// that is worth reporting (the map codec skips silently).
    pub fn tile(&self, id: &str) -> Option<Tile> {
        self.tiles.get(id).map(|image| Tile {
            set: self.name.clone(),
            id: id.to_string(),
            image: Rc::clone(image),
        })
    }

    /// Resolve a tile by atlas position, for pick-by-coordinate UIs.
    pub fn tile_at(&self, col: u32, row: u32) -> Option<Tile> {
        self.by_point.get(&(col, row)).and_then(|id| self.tile(id))
    }

    /// All tile ids in this set, sorted for stable picker layout.
    pub fn tile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tiles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of tiles in the set.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the set resolved zero tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Loads named tile sets from a directory (`<name>.png` + `<name>.json`)
/// and caches each set for its own lifetime. One registry per editing
/// session; nothing here is global.
pub struct TileRegistry {
    dir: PathBuf,
    tile_size: u32,
    cache: HashMap<String, Rc<TileSet>>,
}

impl TileRegistry {
    /// A registry loading sets from `dir`, slicing at `tile_size`.
    pub fn new(dir: impl Into<PathBuf>, tile_size: u32) -> Self {
        TileRegistry {
            dir: dir.into(),
            tile_size,
            cache: HashMap::new(),
        }
    }

    /// Edge length, in pixels, of the tiles this registry produces.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Load (or fetch from cache) the tile set called `name`.
    pub fn load(&mut self, name: &str) -> Result<Rc<TileSet>, MapError> {
        if let Some(set) = self.cache.get(name) {
            return Ok(Rc::clone(set));
        }
        let image_path = self.dir.join(format!("{}.png", name));
        let def_path = self.dir.join(format!("{}.json", name));
        if !image_path.is_file() || !def_path.is_file() {
            return Err(MapError::TileSetNotFound(name.to_string()));
        }
        let atlas = image::open(&image_path)?.to_rgba8();
        let def_text = std::fs::read_to_string(&def_path)?;
        let def: TileSetDef = serde_json::from_str(&def_text).map_err(MapError::Descriptor)?;
        let set = Rc::new(TileSet::from_atlas(name, &atlas, &def.tiles, self.tile_size));
        self.cache.insert(name.to_string(), Rc::clone(&set));
        Ok(set)
    }

    /// Register a pre-built set, replacing any cached set with the same
    /// name. Used by tests and by callers that build sets in memory.
    pub fn insert(&mut self, set: TileSet) -> Rc<TileSet> {
        let set = Rc::new(set);
        self.cache.insert(set.name().to_string(), Rc::clone(&set));
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn atlas_2x1(tile_size: u32) -> RgbaImage {
        let mut img = RgbaImage::new(tile_size * 2, tile_size);
        for px in img.enumerate_pixels_mut() {
            *px.2 = if px.0 < tile_size {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            };
        }
        img
    }

    #[test]
    fn resolves_by_id_and_by_point() {
        let mut positions = HashMap::new();
        positions.insert("red".to_string(), (0, 0));
        positions.insert("green".to_string(), (1, 0));
        let set = TileSet::from_atlas("demo", &atlas_2x1(4), &positions, 4);

        let red = set.tile("red").expect("red should resolve");
        assert_eq!(red.name(), "demo:red");
        assert_eq!(red.image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));

        let green = set.tile_at(1, 0).expect("green should resolve by point");
        assert_eq!(green.id, "green");

        assert!(set.tile("blue").is_none());
        assert!(set.tile_at(5, 5).is_none());
    }

    #[test]
    fn out_of_bounds_entries_are_dropped() {
        let mut positions = HashMap::new();
        positions.insert("ok".to_string(), (0, 0));
        positions.insert("oob".to_string(), (7, 0));
        let set = TileSet::from_atlas("demo", &atlas_2x1(4), &positions, 4);
        assert_eq!(set.len(), 1);
        assert!(set.tile("oob").is_none());
    }
}

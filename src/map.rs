use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;

use crate::cell::{Layer, MapCell};
use crate::compose;
use crate::error::MapError;
use crate::tileset::Tile;

/// The map grid: a fixed-size 2-D array of cells plus the composed pixel
/// image for the whole map.
///
/// The composed image is the authoritative visual representation; every
/// mutating operation recomposites the affected cell before returning, so
/// the image never observes a stale stack. Cells are only mutated through
/// the map's editing operations.
#[derive(Debug)]
pub struct RpgMap {
    width: u32,
    height: u32,
    tile_size: u32,
    cells: Vec<MapCell>,
    path: Option<PathBuf>,
    image: RgbaImage,
}

impl RpgMap {
    /// Create an empty map: every cell at depth 0, checkerboard background.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        let bases = compose::base_tiles(tile_size);
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let base = &bases[((x + y + 1) % 2) as usize];
                cells.push(MapCell::new(Rc::clone(base)));
            }
        }
        let mut map = RpgMap {
            width,
            height,
            tile_size,
            cells,
            path: None,
            image: RgbaImage::new(width * tile_size, height * tile_size),
        };
        for y in 0..height {
            for x in 0..width {
                map.recompose(x, y);
            }
        }
        map
    }

    /// Grid width in cells. Fixed at creation.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells. Fixed at creation.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of one cell in the composed image, in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Path the map was loaded from or last saved to; `None` for a new,
    /// unsaved map.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record where this map lives on disk.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// The composed image, sized `width*tile_size x height*tile_size`.
    /// Always current after any mutating call returns.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Read access to one cell. Panics if `(x, y)` is outside the grid.
    pub fn cell(&self, x: u32, y: u32) -> &MapCell {
        let idx = self.index(x, y);
        &self.cells[idx]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} map",
            x,
            y,
            self.width,
            self.height
        );
        (y * self.width + x) as usize
    }

    pub(crate) fn cell_mut(&mut self, x: u32, y: u32) -> &mut MapCell {
        let idx = self.index(x, y);
        &mut self.cells[idx]
    }

    /// Rebuild the composed-image region for one cell.
    pub(crate) fn recompose(&mut self, x: u32, y: u32) {
        let idx = self.index(x, y);
        compose::compose_cell(&mut self.image, &self.cells[idx], x, y, self.tile_size);
    }

    // ** cell editing operations **

    /// Paint a new layer on top of the cell's stack.
    pub fn add_tile(&mut self, x: u32, y: u32, tile: Tile) {
        self.add_layer(x, y, Layer::new(tile));
    }

    /// Like [`RpgMap::add_tile`], but with an explicit mask level.
    pub fn add_layer(&mut self, x: u32, y: u32, layer: Layer) {
        self.cell_mut(x, y).add_layer(layer);
        self.recompose(x, y);
    }

    /// Replace the cell's whole stack with a single base layer.
    pub fn insert_tile(&mut self, x: u32, y: u32, tile: Tile) {
        self.cell_mut(x, y).replace_layers(Layer::new(tile));
        self.recompose(x, y);
    }

    /// Move the cell's topmost layer to the bottom of its stack.
    pub fn send_to_back(&mut self, x: u32, y: u32) -> Result<(), MapError> {
        self.cell_mut(x, y).send_to_back()?;
        self.recompose(x, y);
        Ok(())
    }

    /// Collapse the cell's stack to its topmost layer.
    pub fn keep_top(&mut self, x: u32, y: u32) -> Result<(), MapError> {
        self.cell_mut(x, y).keep_top()?;
        self.recompose(x, y);
        Ok(())
    }

    /// Remove every layer from the cell, leaving background and levels.
    pub fn clear(&mut self, x: u32, y: u32) {
        self.cell_mut(x, y).clear_layers();
        self.recompose(x, y);
    }

    /// Replace the cell's level labels. Levels have no visual contribution,
    /// so no recomposition happens.
    pub fn set_levels(&mut self, x: u32, y: u32, levels: Vec<String>) {
        self.cell_mut(x, y).set_levels(levels);
    }
}

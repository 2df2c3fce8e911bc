use std::fmt;
use std::rc::Rc;

use image::RgbaImage;

use crate::error::MapError;
use crate::tileset::Tile;

/// One entry in a cell's layer stack: a tile plus an optional mask level
/// linking the layer to entries in the cell's level list.
#[derive(Debug, Clone)]
pub struct Layer {
    /// The tile painted by this layer.
    pub tile: Tile,
    /// Optional mask level, e.g. `3`, `V2`.
    pub mask_level: Option<String>,
}

impl Layer {
    /// A layer with no mask level.
    pub fn new(tile: Tile) -> Self {
        Layer {
            tile,
            mask_level: None,
        }
    }

    /// A layer carrying a mask level. Rejects levels that are not an
    /// integer with optional `V`/`S` prefix, so an unserializable mask can
    /// never enter a map through the API.
    pub fn with_mask(tile: Tile, mask_level: impl Into<String>) -> Result<Self, MapError> {
        let mask_level = mask_level.into();
        if !valid_mask_level(&mask_level) {
            return Err(MapError::InvalidMaskLevel(mask_level));
        }
        Ok(Layer {
            tile,
            mask_level: Some(mask_level),
        })
    }
}

/// Mask levels are an integer, optionally prefixed `V` (vertical mask) or
/// `S` (special level), e.g. `3`, `V2`, `S3`.
fn valid_mask_level(mask: &str) -> bool {
    let digits = mask
        .strip_prefix('V')
        .or_else(|| mask.strip_prefix('S'))
        .unwrap_or(mask);
    !digits.is_empty() && digits.parse::<i32>().is_ok()
}

/// One cell of the map grid: a checkerboard background tile (always
/// present), an ordered layer stack (paint order, last = topmost) and an
/// ordered list of level labels independent of the layers.
#[derive(Debug)]
pub struct MapCell {
    base: Rc<RgbaImage>,
    layers: Vec<Layer>,
    levels: Vec<String>,
}

impl MapCell {
    /// An empty cell over the given background tile.
    pub fn new(base: Rc<RgbaImage>) -> Self {
        MapCell {
            base,
            layers: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// The checkerboard background tile.
    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    /// The layer stack in paint order; the last layer is the topmost.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers. Zero means an empty stack, not a missing cell.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// The cell's level labels; empty when none were set.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Replace the level labels. Independent of the layer stack.
    pub fn set_levels(&mut self, levels: Vec<String>) {
        self.levels = levels;
    }

    /// Append a layer on top of the stack.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Discard the whole stack and replace it with a single layer.
    pub fn replace_layers(&mut self, layer: Layer) {
        self.layers = vec![layer];
    }

    /// Move the topmost layer to the bottom, shifting the rest up one
    /// position: `[a, b, c]` becomes `[c, a, b]`.
    pub fn send_to_back(&mut self) -> Result<(), MapError> {
        if self.layers.is_empty() {
            return Err(MapError::InvalidOperation("send-to-back on empty layer stack"));
        }
        self.layers.rotate_right(1);
        Ok(())
    }

    /// Collapse the stack to the single topmost layer.
    pub fn keep_top(&mut self) -> Result<(), MapError> {
        match self.layers.pop() {
            Some(top) => {
                self.layers = vec![top];
                Ok(())
            }
            None => Err(MapError::InvalidOperation("keep-top on empty layer stack")),
        }
    }

    /// Remove all layers. Background and levels are untouched.
    pub fn clear_layers(&mut self) {
        self.layers.clear();
    }

    /// Status-bar summary: depth, level labels, mask levels top-down.
    pub fn label(&self) -> String {
        let levels = self.levels.join(", ");
        let masks = self
            .layers
            .iter()
            .rev()
            .filter_map(|l| l.mask_level.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} [{}] [{}]", self.depth(), levels, masks)
    }
}

/// Writes the cell's map-file rendering: ` [levels]` then ` set:id[:mask]`
/// per layer, in paint order. Empty for a cell with nothing to record.
impl fmt::Display for MapCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.levels.is_empty() {
            write!(f, " [{}]", self.levels.join(","))?;
        }
        for layer in &self.layers {
            write!(f, " {}", layer.tile.name())?;
            if let Some(mask) = &layer.mask_level {
                write!(f, ":{}", mask)?;
            }
        }
        Ok(())
    }
}

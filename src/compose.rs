use std::rc::Rc;

use image::{imageops, Rgba, RgbaImage};

use crate::cell::MapCell;

/// First checkerboard background colour; cells alternate between the two
/// by `(x + y + 1) % 2`.
pub const COLOUR_A: Rgba<u8> = Rgba([204, 153, 204, 255]);
/// Second checkerboard background colour.
pub const COLOUR_B: Rgba<u8> = Rgba([153, 204, 204, 255]);

/// The two flat background tiles shared by every cell of a map.
pub(crate) fn base_tiles(tile_size: u32) -> [Rc<RgbaImage>; 2] {
    [
        Rc::new(RgbaImage::from_pixel(tile_size, tile_size, COLOUR_A)),
        Rc::new(RgbaImage::from_pixel(tile_size, tile_size, COLOUR_B)),
    ]
}

/// Rebuild the pixel region of one cell inside the map's composed image:
/// background first, then each layer bottom to top. Every draw is an opaque
/// overwrite of the whole region; later layers occlude earlier ones.
///
/// This is the single choke point that keeps the composed image in
/// lock-step with cell state; every mutating map operation calls it once
/// for the affected cell.
pub(crate) fn compose_cell(image: &mut RgbaImage, cell: &MapCell, x: u32, y: u32, tile_size: u32) {
    let px = i64::from(x * tile_size);
    let py = i64::from(y * tile_size);
    imageops::replace(image, cell.base(), px, py);
    for layer in cell.layers() {
        imageops::replace(image, layer.tile.image.as_ref(), px, py);
    }
}

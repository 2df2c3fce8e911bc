// tests/tileset_tests.rs

use std::fs;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use rpgmap::{MapError, TileRegistry};

const TILE: u32 = 4;

fn write_atlas(dir: &std::path::Path) {
    let mut atlas = RgbaImage::new(TILE * 2, TILE);
    for (x, _, px) in atlas.enumerate_pixels_mut() {
        *px = if x < TILE {
            Rgba([10, 20, 30, 255])
        } else {
            Rgba([200, 210, 220, 255])
        };
    }
    atlas.save(dir.join("cave.png")).unwrap();
}

#[test]
fn loads_and_caches_a_set_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_atlas(dir.path());
    fs::write(
        dir.path().join("cave.json"),
        r#"{"tiles": {"floor": [0, 0], "wall": [1, 0]}}"#,
    )
    .unwrap();

    let mut registry = TileRegistry::new(dir.path(), TILE);
    let set = registry.load("cave").unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.tile_names(), ["floor", "wall"]);
    assert!(format!("{:?}", set).contains("cave"));

    let wall = set.tile("wall").unwrap();
    assert_eq!(wall.name(), "cave:wall");
    assert_eq!(wall.image.get_pixel(0, 0), &Rgba([200, 210, 220, 255]));
    assert!(Rc::ptr_eq(&set.tile_at(1, 0).unwrap().image, &wall.image));

    // second load hits the cache
    let again = registry.load("cave").unwrap();
    assert!(Rc::ptr_eq(&set, &again));
}

#[test]
fn missing_backing_files_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = TileRegistry::new(dir.path(), TILE);
    let err = registry.load("nowhere").unwrap_err();
    assert!(matches!(err, MapError::TileSetNotFound(name) if name == "nowhere"));
}

#[test]
fn broken_descriptor_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_atlas(dir.path());
    fs::write(dir.path().join("cave.json"), "{ not json").unwrap();

    let mut registry = TileRegistry::new(dir.path(), TILE);
    let err = registry.load("cave").unwrap_err();
    assert!(matches!(err, MapError::Descriptor(_)));
}

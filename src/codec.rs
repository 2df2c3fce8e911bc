//! The map file codec.
//!
//! One physical line per populated cell:
//!
//! ```text
//! 10,4 [1,S3] water:dark grass:l2 wood:lrs_supp:3
//! ```
//!
//! i.e. an `x,y` coordinate, an optional bracketed level-label group, then
//! one `set:id[:mask]` token per layer in paint order. Reading is tolerant:
//! a token that does not resolve is skipped and recorded, never an error,
//! so maps written against older tile sets still load with the missing
//! tiles omitted. I/O failures are hard errors.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::cell::Layer;
use crate::error::MapError;
use crate::map::RpgMap;
use crate::tileset::{TileRegistry, TileSet};

/// Why a token (or a whole line) was dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The leading `x,y` coordinate did not parse; the line was dropped.
    MalformedCoord(String),
    /// A token matched neither the level-group nor the layer grammar.
    MalformedToken(String),
    /// The named tile set could not be loaded.
    UnknownTileSet(String),
    /// The tile set loaded but has no tile with this id.
    UnknownTile { set: String, id: String },
    /// The layer token carried a mask level that failed validation.
    MalformedMaskLevel(String),
}

/// A skipped token/line, with the 1-based line number it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// 1-based line number in the map file.
    pub line: usize,
    /// What was wrong with the token or line.
    pub reason: SkipReason,
}

/// Everything the parser dropped while loading a map.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Skipped tokens/lines in file order.
    pub skipped: Vec<Skipped>,
}

impl LoadReport {
    /// True when nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Outcome of resolving a single layer token.
pub enum TokenOutcome {
    /// The token resolved to a layer.
    Resolved(Layer),
    /// The token was dropped for the given reason.
    Skipped(SkipReason),
}

/// Load a map file. Fails hard on unreadable files; everything else is
/// recovered per-token and recorded in the report.
pub fn load(path: impl AsRef<Path>, registry: &mut TileRegistry) -> Result<(RpgMap, LoadReport), MapError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let (mut map, report) = parse(&text, registry);
    map.set_path(path);
    Ok((map, report))
}

/// Parse map text into a populated map. The map is sized to the maximum
/// coordinate seen across all lines, plus one, even for lines that carry
/// nothing beyond their coordinate.
pub fn parse(text: &str, registry: &mut TileRegistry) -> (RpgMap, LoadReport) {
    let mut report = LoadReport::default();

    // first pass: bounds plus raw token list per populated cell
    let mut cell_tokens: HashMap<(u32, u32), (usize, Vec<String>)> = HashMap::new();
    let (mut max_x, mut max_y) = (0u32, 0u32);
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let mut bits = line.split_whitespace();
        let coord = bits.next().unwrap_or_default();
        let Some((x, y)) = parse_coord(coord) else {
            report.skipped.push(Skipped {
                line: line_no,
                reason: SkipReason::MalformedCoord(coord.to_string()),
            });
            continue;
        };
        max_x = max_x.max(x);
        max_y = max_y.max(y);
        let tokens: Vec<String> = bits.map(str::to_string).collect();
        if !tokens.is_empty() {
            cell_tokens.insert((x, y), (line_no, tokens));
        }
    }

    // second pass: build the map and populate the recorded cells
    let mut map = RpgMap::new(max_x + 1, max_y + 1, registry.tile_size());
    let mut failed_sets: HashSet<String> = HashSet::new();
    for (&(x, y), (line_no, tokens)) in &cell_tokens {
        let mut tokens = tokens.iter();
        let mut pending = tokens.next();
        if let Some(first) = pending {
            if first.starts_with('[') {
                match parse_level_group(first) {
                    Some(levels) => map.set_levels(x, y, levels),
                    None => report.skipped.push(Skipped {
                        line: *line_no,
                        reason: SkipReason::MalformedToken(first.clone()),
                    }),
                }
                pending = tokens.next();
            }
        }
        while let Some(token) = pending {
            match resolve_layer_token(token, registry, &mut failed_sets) {
                TokenOutcome::Resolved(layer) => map.cell_mut(x, y).add_layer(layer),
                TokenOutcome::Skipped(reason) => report.skipped.push(Skipped {
                    line: *line_no,
                    reason,
                }),
            }
            pending = tokens.next();
        }
        map.recompose(x, y);
    }
    report.skipped.sort_by_key(|s| s.line);

    (map, report)
}

fn parse_coord(token: &str) -> Option<(u32, u32)> {
    let (x, y) = token.split_once(',')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}

/// `[a,b,c]` → the labels, or `None` when the brackets do not close.
fn parse_level_group(token: &str) -> Option<Vec<String>> {
    let inner = token.strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.split(',').map(str::to_string).collect())
}

/// Resolve one `set:id[:mask]` token against the registry. Set names that
/// fail to load are remembered so repeated references skip cheaply.
fn resolve_layer_token(
    token: &str,
    registry: &mut TileRegistry,
    failed_sets: &mut HashSet<String>,
) -> TokenOutcome {
    let mut bits = token.split(':');
    let (set_name, id) = match (bits.next(), bits.next()) {
        (Some(set), Some(id)) if !set.is_empty() && !id.is_empty() => (set, id),
        _ => return TokenOutcome::Skipped(SkipReason::MalformedToken(token.to_string())),
    };
    if failed_sets.contains(set_name) {
        return TokenOutcome::Skipped(SkipReason::UnknownTileSet(set_name.to_string()));
    }
    let set: Rc<TileSet> = match registry.load(set_name) {
        Ok(set) => set,
        Err(_) => {
            failed_sets.insert(set_name.to_string());
            return TokenOutcome::Skipped(SkipReason::UnknownTileSet(set_name.to_string()));
        }
    };
    let Some(tile) = set.tile(id) else {
        return TokenOutcome::Skipped(SkipReason::UnknownTile {
            set: set_name.to_string(),
            id: id.to_string(),
        });
    };
    match bits.next() {
        None => TokenOutcome::Resolved(Layer::new(tile)),
        Some(mask) => match Layer::with_mask(tile, mask) {
            Ok(layer) => TokenOutcome::Resolved(layer),
            // a bad mask drops this one token; the rest of the line goes on
            Err(_) => TokenOutcome::Skipped(SkipReason::MalformedMaskLevel(token.to_string())),
        },
    }
}

/// Serialize the map in row-major order, one line per cell (coordinate-only
/// for empty cells) and a blank separator line after each row.
pub fn serialize(map: &RpgMap) -> String {
    let mut out = String::new();
    for y in 0..map.height() {
        for x in 0..map.width() {
            out.push_str(&format!("{},{}{}\n", x, y, map.cell(x, y)));
        }
        out.push('\n');
    }
    out
}

/// Write the map to `path`. The in-memory map is untouched by a failed
/// save; its path is updated only once the write has succeeded.
pub fn save(map: &mut RpgMap, path: impl AsRef<Path>) -> Result<(), MapError> {
    let path = path.as_ref();
    fs::write(path, serialize(map))?;
    map.set_path(path);
    Ok(())
}

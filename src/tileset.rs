//! Tileset drawing adapter and the two raster layers it paints
//!
//! The generator only needs "draw this symbol at this tile with this
//! rotation"; `TileCanvas` is that seam. `TilesetCanvas` implements it over a
//! sprite sheet, writing into a ground layer and an overlay (tree top) layer.

use image::{imageops, DynamicImage, Rgba, RgbaImage};
use std::path::Path;

use crate::error::{GenerationError, Result};
use crate::terrain::{Rotation, TileSymbol};

/// Sheet layout, in tiles: five columns (the tree is two wide) by two rows.
pub const SHEET_COLS: u32 = 5;
pub const SHEET_ROWS: u32 = 2;

const GRASS_FILL: Rgba<u8> = Rgba([0x2b, 0x44, 0x32, 0xff]);
const WATER_FILL: Rgba<u8> = Rgba([0x37, 0x49, 0x52, 0xff]);
const SAND_FILL: Rgba<u8> = Rgba([0x9d, 0x7e, 0x6a, 0xff]);

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Where a symbol's pixels come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileSource {
    /// Flat colour over the whole tile
    Fill(Rgba<u8>),
    /// One tile of the sheet at (col, row)
    Sprite { col: u32, row: u32 },
    /// The two-tile-wide tree: trunk on the ground layer, canopy on the overlay
    Tree,
}

/// Which raster layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Ground,
    Overlay,
}

/// Destination for tile draw calls issued during generation.
pub trait TileCanvas {
    /// Tile edge length in pixels
    fn tile_size(&self) -> u32;

    /// False when there is nothing to draw into; generation refuses to run.
    fn has_surface(&self) -> bool;

    fn draw_tile(&mut self, symbol: TileSymbol, x: usize, y: usize, rotation: Rotation);
}

/// A sprite sheet cut into square tiles.
#[derive(Clone)]
pub struct Tileset {
    tile_size: u32,
    sheet: RgbaImage,
}

impl Tileset {
    /// Wrap a sheet whose cells are `tile_size` pixels square.
    pub fn new(tile_size: u32, sheet: DynamicImage) -> Result<Self> {
        if tile_size == 0 {
            return Err(GenerationError::InvalidTileSize);
        }
        let sheet = sheet.to_rgba8();
        let (need_w, need_h) = (SHEET_COLS * tile_size, SHEET_ROWS * tile_size);
        if sheet.width() < need_w || sheet.height() < need_h {
            return Err(GenerationError::InvalidConfig(format!(
                "tileset sheet is {}x{}px, needs at least {}x{}px for {}px tiles",
                sheet.width(),
                sheet.height(),
                need_w,
                need_h,
                tile_size
            )));
        }
        Ok(Self { tile_size, sheet })
    }

    /// Load a sheet from an image file.
    pub fn load(path: impl AsRef<Path>, tile_size: u32) -> Result<Self> {
        let img = image::open(path)?;
        Self::new(tile_size, img)
    }

    /// A procedurally painted sheet with the standard layout.
    pub fn placeholder(tile_size: u32) -> Result<Self> {
        if tile_size == 0 {
            return Err(GenerationError::InvalidTileSize);
        }
        Self::new(tile_size, DynamicImage::ImageRgba8(paint_placeholder_sheet(tile_size)))
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn sheet(&self) -> &RgbaImage {
        &self.sheet
    }

    /// Sheet location or fill colour for a symbol
    pub fn source(symbol: TileSymbol) -> TileSource {
        match symbol {
            TileSymbol::Grass => TileSource::Fill(GRASS_FILL),
            TileSymbol::Water => TileSource::Fill(WATER_FILL),
            TileSymbol::Sand => TileSource::Fill(SAND_FILL),
            TileSymbol::InnerCorner => TileSource::Sprite { col: 0, row: 0 },
            TileSymbol::OuterCorner => TileSource::Sprite { col: 1, row: 0 },
            TileSymbol::Border => TileSource::Sprite { col: 2, row: 0 },
            TileSymbol::Waves => TileSource::Sprite { col: 0, row: 1 },
            TileSymbol::Rocks => TileSource::Sprite { col: 1, row: 1 },
            TileSymbol::Flowers => TileSource::Sprite { col: 2, row: 1 },
            TileSymbol::Trees => TileSource::Tree,
        }
    }

    /// Copy of one sheet tile, rotated clockwise about its centre.
    pub fn sprite(&self, col: u32, row: u32, rotation: Rotation) -> RgbaImage {
        let ts = self.tile_size;
        let tile = imageops::crop_imm(&self.sheet, col * ts, row * ts, ts, ts).to_image();
        match rotation {
            Rotation::Deg0 => tile,
            Rotation::Deg90 => imageops::rotate90(&tile),
            Rotation::Deg180 => imageops::rotate180(&tile),
            Rotation::Deg270 => imageops::rotate270(&tile),
        }
    }

    /// Height of the canopy part of the tree sprite; the trunk is the rest.
    pub fn canopy_height(&self) -> u32 {
        self.tile_size * 19 / 16
    }

    fn tree_parts(&self) -> (RgbaImage, RgbaImage) {
        let ts = self.tile_size;
        let canopy_h = self.canopy_height();
        let canopy = imageops::crop_imm(&self.sheet, 3 * ts, 0, 2 * ts, canopy_h).to_image();
        let trunk = imageops::crop_imm(&self.sheet, 3 * ts, canopy_h, 2 * ts, 2 * ts - canopy_h).to_image();
        (canopy, trunk)
    }
}

// =============================================================================
// RASTER LAYERS
// =============================================================================

/// The ground layer and the overlay drawn above units (tree tops).
#[derive(Clone)]
pub struct MapLayers {
    ground: RgbaImage,
    overlay: RgbaImage,
}

impl MapLayers {
    /// Allocate both layers. `None` if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            ground: RgbaImage::from_pixel(width, height, TRANSPARENT),
            overlay: RgbaImage::from_pixel(width, height, TRANSPARENT),
        })
    }

    pub fn width(&self) -> u32 {
        self.ground.width()
    }

    pub fn height(&self) -> u32 {
        self.ground.height()
    }

    /// Full ground raster
    pub fn ground(&self) -> &RgbaImage {
        &self.ground
    }

    /// Full overlay raster
    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    pub fn layer(&self, layer: Layer) -> &RgbaImage {
        match layer {
            Layer::Ground => &self.ground,
            Layer::Overlay => &self.overlay,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut RgbaImage {
        match layer {
            Layer::Ground => &mut self.ground,
            Layer::Overlay => &mut self.overlay,
        }
    }

    /// A rectangle of the ground layer, clipped to the layer bounds.
    pub fn section(&self, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let width = width.min(self.width() - x);
        let height = height.min(self.height() - y);
        imageops::crop_imm(&self.ground, x, y, width, height).to_image()
    }

    /// Overlay composited over ground
    pub fn composite(&self) -> RgbaImage {
        let mut out = self.ground.clone();
        imageops::overlay(&mut out, &self.overlay, 0, 0);
        out
    }

    pub fn into_parts(self) -> (RgbaImage, RgbaImage) {
        (self.ground, self.overlay)
    }

    fn fill_rect(&mut self, layer: Layer, x: i64, y: i64, size: u32, color: Rgba<u8>) {
        let img = self.layer_mut(layer);
        let (w, h) = (img.width() as i64, img.height() as i64);
        for py in y.max(0)..(y + size as i64).min(h) {
            for px in x.max(0)..(x + size as i64).min(w) {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

// =============================================================================
// TILESET CANVAS
// =============================================================================

/// `TileCanvas` backed by a `Tileset` and a pair of `MapLayers`.
pub struct TilesetCanvas {
    tileset: Tileset,
    layers: Option<MapLayers>,
}

impl TilesetCanvas {
    /// Canvas for a world of `width` x `height` pixels.
    pub fn new(tileset: Tileset, width: u32, height: u32) -> Self {
        Self {
            tileset,
            layers: MapLayers::new(width, height),
        }
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn layers(&self) -> Option<&MapLayers> {
        self.layers.as_ref()
    }

    pub fn into_layers(self) -> Option<MapLayers> {
        self.layers
    }
}

impl TileCanvas for TilesetCanvas {
    fn tile_size(&self) -> u32 {
        self.tileset.tile_size()
    }

    fn has_surface(&self) -> bool {
        self.layers.is_some()
    }

    fn draw_tile(&mut self, symbol: TileSymbol, x: usize, y: usize, rotation: Rotation) {
        let Some(layers) = self.layers.as_mut() else {
            return;
        };
        let ts = self.tileset.tile_size() as i64;
        let (dest_x, dest_y) = (x as i64 * ts, y as i64 * ts);

        match Tileset::source(symbol) {
            TileSource::Fill(color) => {
                layers.fill_rect(Layer::Ground, dest_x, dest_y, ts as u32, color);
            }
            TileSource::Sprite { col, row } => {
                let sprite = self.tileset.sprite(col, row, rotation);
                imageops::overlay(layers.layer_mut(Layer::Ground), &sprite, dest_x, dest_y);
            }
            TileSource::Tree => {
                // Two tiles wide, centred on the cell, rising one tile above it.
                let (canopy, trunk) = self.tileset.tree_parts();
                let left = dest_x - ts + ts / 2;
                let top = dest_y - ts;
                let canopy_h = self.tileset.canopy_height() as i64;
                imageops::overlay(layers.layer_mut(Layer::Ground), &trunk, left, top + canopy_h);
                imageops::overlay(layers.layer_mut(Layer::Overlay), &canopy, left, top);
            }
        }
    }
}

// =============================================================================
// PLACEHOLDER SHEET
// =============================================================================

const PLACEHOLDER_SAND: Rgba<u8> = Rgba([0x9d, 0x7e, 0x6a, 0xff]);
const PLACEHOLDER_FOAM: Rgba<u8> = Rgba([0x6d, 0x8a, 0x96, 0xff]);
const PLACEHOLDER_ROCK: Rgba<u8> = Rgba([0x6b, 0x6b, 0x6b, 0xff]);
const PLACEHOLDER_PETAL_A: Rgba<u8> = Rgba([0xed, 0xc0, 0x6d, 0xff]);
const PLACEHOLDER_PETAL_B: Rgba<u8> = Rgba([0xdb, 0x61, 0x36, 0xff]);
const PLACEHOLDER_CANOPY: Rgba<u8> = Rgba([0x41, 0x77, 0x2f, 0xff]);
const PLACEHOLDER_TRUNK: Rgba<u8> = Rgba([0x5a, 0x3d, 0x2b, 0xff]);

/// Paint a sheet with the standard layout. Edge sprites are drawn for
/// rotation 0: sand along the west side, corners in the south-west.
fn paint_placeholder_sheet(ts: u32) -> RgbaImage {
    let mut sheet = RgbaImage::from_pixel(SHEET_COLS * ts, SHEET_ROWS * ts, TRANSPARENT);
    let edge = (ts / 4).max(1);

    let mut paint = |col: u32, row: u32, f: &dyn Fn(u32, u32) -> Option<Rgba<u8>>| {
        for py in 0..ts {
            for px in 0..ts {
                if let Some(color) = f(px, py) {
                    sheet.put_pixel(col * ts + px, row * ts + py, color);
                }
            }
        }
    };

    // inner corner: sand notch in the south-west
    paint(0, 0, &|px, py| (px < edge && py >= ts - edge).then_some(PLACEHOLDER_SAND));
    // outer corner: sand along west and south
    paint(1, 0, &|px, py| (px < edge || py >= ts - edge).then_some(PLACEHOLDER_SAND));
    // border: sand along west
    paint(2, 0, &|px, _| (px < edge).then_some(PLACEHOLDER_SAND));
    // waves: two short strokes
    paint(0, 1, &|px, py| {
        let upper = py == ts / 3 && (ts / 4..ts / 2).contains(&px);
        let lower = py == 2 * ts / 3 && (ts / 2..3 * ts / 4).contains(&px);
        (upper || lower).then_some(PLACEHOLDER_FOAM)
    });
    // rocks: a block in the middle
    paint(1, 1, &|px, py| {
        let span = 3 * ts / 8..5 * ts / 8 + 1;
        (span.contains(&px) && span.contains(&py)).then_some(PLACEHOLDER_ROCK)
    });
    // flowers: three dots
    paint(2, 1, &|px, py| match (px, py) {
        (x, y) if x == ts / 4 && y == ts / 4 => Some(PLACEHOLDER_PETAL_A),
        (x, y) if x == 3 * ts / 4 && y == ts / 2 => Some(PLACEHOLDER_PETAL_B),
        (x, y) if x == ts / 2 && y == 3 * ts / 4 => Some(PLACEHOLDER_PETAL_A),
        _ => None,
    });

    // tree: elliptical canopy over a trunk, spanning columns 3-4 and both rows
    let canopy_h = ts * 19 / 16;
    let (cx, cy) = (ts as f32, canopy_h as f32 / 2.0);
    let (rx, ry) = (ts as f32 * 0.9, canopy_h as f32 / 2.0);
    for py in 0..2 * ts {
        for px in 0..2 * ts {
            let color = if py < canopy_h {
                let nx = (px as f32 + 0.5 - cx) / rx;
                let ny = (py as f32 + 0.5 - cy) / ry;
                (nx * nx + ny * ny <= 1.0).then_some(PLACEHOLDER_CANOPY)
            } else {
                let half = (ts / 8).max(1);
                (px >= ts - half && px < ts + half).then_some(PLACEHOLDER_TRUNK)
            };
            if let Some(color) = color {
                sheet.put_pixel(3 * ts + px, py, color);
            }
        }
    }

    sheet
}

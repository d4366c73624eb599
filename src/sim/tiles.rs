//! Static tile grid with broad-phase collision
//!
//! Collision queries only report overlap with solid cells. There is no push-out
//! vector: a caller whose proposed rectangle collides should reject the move.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::error::RuntimeError;
use crate::renderer::Surface;

/// Tile id meaning "nothing here"
pub const EMPTY_TILE: i32 = 0;

/// Rectangular array of tile ids, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_w: f32,
    tile_h: f32,
    tiles: Vec<i32>,
}

/// Inclusive range of tile indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub col_start: usize,
    pub col_end: usize,
    pub row_start: usize,
    pub row_end: usize,
}

impl TileGrid {
    /// Empty grid filled with `EMPTY_TILE`
    pub fn new(width: usize, height: usize, tile_w: f32, tile_h: f32) -> Self {
        Self {
            width,
            height,
            tile_w: tile_w.max(1.0),
            tile_h: tile_h.max(1.0),
            tiles: vec![EMPTY_TILE; width * height],
        }
    }

    /// Build a grid from rows of tile ids; rows must be non-empty and equal length
    pub fn from_rows(rows: &[Vec<i32>], tile_w: f32, tile_h: f32) -> Result<Self, RuntimeError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(RuntimeError::EmptyTileMap);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(RuntimeError::RaggedTileMap {
                row,
                expected: width,
                actual: r.len(),
            });
        }

        let mut grid = Self::new(width, rows.len(), tile_w, tile_h);
        grid.tiles = rows.iter().flatten().copied().collect();
        log::debug!("Loaded {}x{} tile map", grid.width, grid.height);
        Ok(grid)
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_w, self.tile_h)
    }

    /// Total size in pixels
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_w,
            self.height as f32 * self.tile_h,
        )
    }

    #[inline]
    fn index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Tile id at a cell; `None` outside the grid
    pub fn get_tile(&self, col: i64, row: i64) -> Option<i32> {
        self.index(col, row).map(|i| self.tiles[i])
    }

    /// Overwrite a single cell; returns false (and changes nothing) outside the grid
    pub fn set_tile(&mut self, col: i64, row: i64, id: i32) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.tiles[i] = id;
                true
            }
            None => false,
        }
    }

    /// Tile id under a pixel position
    pub fn get_tile_at_position(&self, x: f32, y: f32) -> Option<i32> {
        let col = (x / self.tile_w).floor() as i64;
        let row = (y / self.tile_h).floor() as i64;
        self.get_tile(col, row)
    }

    /// True if any cell covered by `rect` holds an id from `solid_ids`
    ///
    /// Cells outside the grid are never solid.
    pub fn check_collision(&self, rect: &Rect, solid_ids: &[i32]) -> bool {
        let Some(range) = self.cell_range(
            rect.x,
            rect.y,
            rect.x + rect.w - 1.0,
            rect.y + rect.h - 1.0,
        ) else {
            return false;
        };
        (range.row_start..=range.row_end).any(|row| {
            (range.col_start..=range.col_end).any(|col| {
                solid_ids.contains(&self.tiles[row * self.width + col])
            })
        })
    }

    /// Cells intersecting a pixel-space view rectangle, clipped to the grid
    pub fn visible_range(&self, view: &Rect) -> Option<TileRange> {
        self.cell_range(view.x, view.y, view.x + view.w, view.y + view.h)
    }

    /// Cells from pixel (x0, y0) to pixel (x1, y1) inclusive, clipped to the grid
    fn cell_range(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<TileRange> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if [x0, y0, x1, y1].iter().any(|v| v.is_nan()) {
            return None;
        }
        let max_col = self.width as i64 - 1;
        let max_row = self.height as i64 - 1;
        let col_start = (x0 / self.tile_w).floor() as i64;
        let col_end = (x1 / self.tile_w).floor() as i64;
        let row_start = (y0 / self.tile_h).floor() as i64;
        let row_end = (y1 / self.tile_h).floor() as i64;

        if col_end < col_start || row_end < row_start {
            return None;
        }
        if col_end < 0 || row_end < 0 || col_start > max_col || row_start > max_row {
            return None;
        }
        Some(TileRange {
            col_start: col_start.clamp(0, max_col) as usize,
            col_end: col_end.clamp(0, max_col) as usize,
            row_start: row_start.clamp(0, max_row) as usize,
            row_end: row_end.clamp(0, max_row) as usize,
        })
    }

    /// Draw the cells visible through `view` (world space)
    ///
    /// `paint` receives each non-empty tile id and its screen-space rectangle.
    /// Returns the number of tiles painted.
    pub fn draw<F>(&self, surface: &mut dyn Surface, view: &Rect, mut paint: F) -> usize
    where
        F: FnMut(&mut dyn Surface, i32, Rect),
    {
        let Some(range) = self.visible_range(view) else {
            return 0;
        };
        let mut painted = 0;
        for row in range.row_start..=range.row_end {
            for col in range.col_start..=range.col_end {
                let id = self.tiles[row * self.width + col];
                if id == EMPTY_TILE {
                    continue;
                }
                let dest = Rect::new(
                    col as f32 * self.tile_w - view.x,
                    row as f32 * self.tile_h - view.y,
                    self.tile_w,
                    self.tile_h,
                );
                paint(&mut *surface, id, dest);
                painted += 1;
            }
        }
        painted
    }
}

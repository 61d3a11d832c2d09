//! Viewport transform between screen pixels, world pixels and tiles
//!
//! Three coordinate spaces are involved:
//! - **screen** pixels, origin at the window's top-left corner, y down
//! - **world** pixels, the map drawn at zoom 1 (`tile * base_tile_size`)
//! - **tile** indices into the grid
//!
//! Every conversion in the editor goes through this module. All functions are
//! pure: they read a [`Viewport`] and return a new value. A viewport whose
//! effective tile size is not positive is *degenerate*; conversions on it
//! return `None` or the unchanged viewport instead of dividing by zero.

use bevy::math::{Rect, Vec2};
use dungeon_map_core::Position;

/// Smallest allowed zoom factor
pub const MIN_ZOOM: f32 = 0.25;
/// Largest allowed zoom factor
pub const MAX_ZOOM: f32 = 4.0;
/// Fraction of the current zoom added per wheel step
pub const ZOOM_INCREMENT: f32 = 0.1;
/// Tile size in pixels at zoom 1
pub const DEFAULT_TILE_SIZE: u32 = 32;
/// Window size assumed until the first layout refresh
pub const DEFAULT_WINDOW_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

/// Screen-space placement of the scrollable work area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLayout {
    pub work_area: Rect,
}

impl Default for WindowLayout {
    fn default() -> Self {
        Self::from_window(DEFAULT_WINDOW_SIZE.x, DEFAULT_WINDOW_SIZE.y, 40.0)
    }
}

impl WindowLayout {
    pub fn new(work_area: Rect) -> Self {
        Self { work_area }
    }

    /// Work area covering the window below a toolbar strip
    pub fn from_window(width: f32, height: f32, toolbar_height: f32) -> Self {
        let toolbar_height = toolbar_height.clamp(0.0, height.max(0.0));
        Self {
            work_area: Rect::new(0.0, toolbar_height, width.max(0.0), height.max(0.0)),
        }
    }

    /// Top-left corner of the work area in screen pixels
    pub fn origin(&self) -> Vec2 {
        self.work_area.min
    }

    pub fn size(&self) -> Vec2 {
        self.work_area.size()
    }

    /// Half-open containment test: the right and bottom edges are outside
    pub fn contains(&self, pixel: Vec2) -> bool {
        let Rect { min, max } = self.work_area;
        pixel.x >= min.x && pixel.y >= min.y && pixel.x < max.x && pixel.y < max.y
    }
}

/// The visible window into the tile grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left visible tile
    pub offset: Position,
    pub zoom: f32,
    pub base_tile_size: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Position::new(0, 0),
            zoom: 1.0,
            base_tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl Viewport {
    pub fn new(base_tile_size: u32, zoom: f32) -> Self {
        Self {
            offset: Position::new(0, 0),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            base_tile_size,
        }
    }

    /// On-screen size of one tile in pixels
    pub fn effective_tile_size(&self) -> f32 {
        self.base_tile_size as f32 * self.zoom
    }

    /// Whether the effective tile size is unusable (zero, negative or NaN)
    pub fn is_degenerate(&self) -> bool {
        !(self.effective_tile_size() > 0.0)
    }

    /// Number of whole tiles that fit in the work area
    pub fn visible_tiles(&self, layout: &WindowLayout) -> (i32, i32) {
        if self.is_degenerate() {
            return (0, 0);
        }
        let tiles = (layout.size() / self.effective_tile_size()).floor();
        (tiles.x as i32, tiles.y as i32)
    }

    /// Clamp zoom to its limits and the offset so the view stays on the map
    pub fn clamped(&self, layout: &WindowLayout, grid_size: (u32, u32)) -> Self {
        let mut viewport = *self;
        if viewport.zoom.is_finite() {
            viewport.zoom = viewport.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }

        let (visible_x, visible_y) = viewport.visible_tiles(layout);
        let max_x = (grid_size.0 as i32).saturating_sub(visible_x).max(0);
        let max_y = (grid_size.1 as i32).saturating_sub(visible_y).max(0);
        viewport.offset = Position::new(
            viewport.offset.x.clamp(0, max_x),
            viewport.offset.y.clamp(0, max_y),
        );
        viewport
    }

    /// Screen pixel of a tile's top-left corner
    pub fn tile_to_screen(&self, tile: Position, layout: &WindowLayout) -> Option<Vec2> {
        if self.is_degenerate() {
            return None;
        }
        let relative = Vec2::new(
            (tile.x - self.offset.x) as f32,
            (tile.y - self.offset.y) as f32,
        );
        Some(layout.origin() + relative * self.effective_tile_size())
    }

    /// World pixel under a screen pixel, or `None` outside the work area
    pub fn screen_to_world(&self, pixel: Vec2, layout: &WindowLayout) -> Option<Vec2> {
        if self.is_degenerate() || !layout.contains(pixel) {
            return None;
        }
        Some(self.unchecked_screen_to_world(pixel, layout))
    }

    fn unchecked_screen_to_world(&self, pixel: Vec2, layout: &WindowLayout) -> Vec2 {
        let base = self.base_tile_size as f32;
        let offset = Vec2::new(self.offset.x as f32, self.offset.y as f32) * base;
        offset + (pixel - layout.origin()) / self.zoom
    }

    /// Tile containing a world pixel (not bounds-checked)
    pub fn world_to_tile(&self, world: Vec2) -> Option<Position> {
        if self.base_tile_size == 0 {
            return None;
        }
        let tile = (world / self.base_tile_size as f32).floor();
        Some(Position::new(tile.x as i32, tile.y as i32))
    }

    /// Tile under a screen pixel.
    ///
    /// Returns `None` if the pixel is outside the work area (over a toolbar,
    /// for example) or the tile is outside the grid.
    pub fn screen_to_tile(
        &self,
        pixel: Vec2,
        layout: &WindowLayout,
        grid_size: (u32, u32),
    ) -> Option<Position> {
        let tile = self.world_to_tile(self.screen_to_world(pixel, layout)?)?;
        let inside = tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < grid_size.0
            && (tile.y as u32) < grid_size.1;
        inside.then_some(tile)
    }

    /// Zoom by `delta` wheel steps, keeping the point under `pixel` in place.
    ///
    /// Zoom scales geometrically (`delta * ZOOM_INCREMENT * zoom`) so steps feel
    /// the same at every magnification. The offset shift is rounded to whole
    /// tiles, then clamped.
    pub fn zoomed_at(
        &self,
        pixel: Vec2,
        delta: f32,
        layout: &WindowLayout,
        grid_size: (u32, u32),
    ) -> Self {
        if self.is_degenerate() {
            return *self;
        }

        let new_zoom = (self.zoom + delta * ZOOM_INCREMENT * self.zoom).clamp(MIN_ZOOM, MAX_ZOOM);
        let mut zoomed = Self {
            zoom: new_zoom,
            ..*self
        };
        if zoomed.is_degenerate() {
            return *self;
        }

        let world_before = self.unchecked_screen_to_world(pixel, layout);
        let world_after = zoomed.unchecked_screen_to_world(pixel, layout);
        let shift = ((world_before - world_after) / self.base_tile_size as f32).round();
        zoomed.offset = Position::new(
            self.offset.x.saturating_add(shift.x as i32),
            self.offset.y.saturating_add(shift.y as i32),
        );
        zoomed.clamped(layout, grid_size)
    }

    /// Scroll by a pixel delta, rounded to whole tiles and clamped
    pub fn panned(&self, delta: Vec2, layout: &WindowLayout, grid_size: (u32, u32)) -> Self {
        if self.is_degenerate() {
            return *self;
        }
        let tiles = (delta / self.effective_tile_size()).round();
        let mut panned = *self;
        // Float-to-int casts saturate, so huge deltas pin to i32::MIN/MAX before clamping
        panned.offset = Position::new(
            self.offset.x.saturating_add(tiles.x as i32),
            self.offset.y.saturating_add(tiles.y as i32),
        );
        panned.clamped(layout, grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> WindowLayout {
        // 800x600 window with a 40px toolbar: work area 800x560
        WindowLayout::from_window(800.0, 600.0, 40.0)
    }

    #[test]
    fn test_tile_screen_round_trip() {
        let viewport = Viewport {
            offset: Position::new(3, 2),
            zoom: 2.0,
            base_tile_size: 16,
        };
        let screen = viewport.tile_to_screen(Position::new(5, 4), &layout()).unwrap();
        assert_eq!(screen, Vec2::new(64.0, 40.0 + 64.0));

        let center = screen + Vec2::splat(16.0);
        assert_eq!(
            viewport.screen_to_tile(center, &layout(), (100, 100)),
            Some(Position::new(5, 4))
        );
    }

    #[test]
    fn test_screen_to_tile_outside_work_area() {
        let viewport = Viewport::default();
        // Over the toolbar
        assert_eq!(viewport.screen_to_tile(Vec2::new(10.0, 10.0), &layout(), (100, 100)), None);
        // Right edge is exclusive
        assert_eq!(viewport.screen_to_tile(Vec2::new(800.0, 100.0), &layout(), (100, 100)), None);
    }

    #[test]
    fn test_screen_to_tile_outside_grid() {
        let viewport = Viewport::default();
        // Tile (5, 0) on a 4-wide grid
        let pixel = Vec2::new(5.0 * 32.0 + 1.0, 41.0);
        assert_eq!(viewport.screen_to_tile(pixel, &layout(), (4, 4)), None);
        assert_eq!(
            viewport.screen_to_tile(pixel, &layout(), (6, 4)),
            Some(Position::new(5, 0))
        );
    }

    #[test]
    fn test_degenerate_viewport() {
        let viewport = Viewport {
            offset: Position::new(1, 1),
            zoom: 1.0,
            base_tile_size: 0,
        };
        assert!(viewport.is_degenerate());
        assert_eq!(viewport.tile_to_screen(Position::new(2, 2), &layout()), None);
        assert_eq!(viewport.screen_to_tile(Vec2::new(100.0, 100.0), &layout(), (10, 10)), None);
        assert_eq!(viewport.zoomed_at(Vec2::new(100.0, 100.0), 3.0, &layout(), (10, 10)), viewport);
        assert_eq!(viewport.panned(Vec2::new(500.0, 0.0), &layout(), (10, 10)), viewport);

        let nan = Viewport {
            zoom: f32::NAN,
            ..Viewport::default()
        };
        assert!(nan.is_degenerate());
        assert_eq!(nan.screen_to_tile(Vec2::new(100.0, 100.0), &layout(), (10, 10)), None);
    }

    #[test]
    fn test_pan_rounds_to_tiles() {
        let viewport = Viewport::default();
        let panned = viewport.panned(Vec2::new(70.0, 20.0), &layout(), (100, 100));
        assert_eq!(panned.offset, Position::new(2, 1));
        let back = panned.panned(Vec2::new(-15.0, -64.0), &layout(), (100, 100));
        assert_eq!(back.offset, Position::new(2, 0));
    }

    #[test]
    fn test_pan_clamp_with_huge_deltas() {
        let viewport = Viewport::default();
        // 25x17 tiles visible at 32px
        let grid = (100, 60);
        for delta in [
            Vec2::new(1.0e12, 1.0e12),
            Vec2::new(-1.0e12, -1.0e12),
            Vec2::new(f32::MAX, -f32::MAX),
            Vec2::new(123456.0, -98765.0),
        ] {
            let panned = viewport.panned(delta, &layout(), grid);
            assert!((0..=75).contains(&panned.offset.x), "x = {}", panned.offset.x);
            assert!((0..=43).contains(&panned.offset.y), "y = {}", panned.offset.y);
        }
        let far = viewport.panned(Vec2::new(1.0e9, 1.0e9), &layout(), grid);
        assert_eq!(far.offset, Position::new(75, 43));
    }

    #[test]
    fn test_clamp_small_grid_pins_to_origin() {
        let viewport = Viewport {
            offset: Position::new(7, 7),
            ..Viewport::default()
        };
        let clamped = viewport.clamped(&layout(), (5, 5));
        assert_eq!(clamped.offset, Position::new(0, 0));
    }

    #[test]
    fn test_zoom_is_geometric_and_clamped() {
        let viewport = Viewport::default();
        let zoomed = viewport.zoomed_at(Vec2::new(400.0, 300.0), 1.0, &layout(), (100, 100));
        assert!((zoomed.zoom - 1.1).abs() < 1e-6);

        let zoomed = Viewport { zoom: 2.0, ..viewport }.zoomed_at(Vec2::new(400.0, 300.0), 1.0, &layout(), (100, 100));
        assert!((zoomed.zoom - 2.2).abs() < 1e-5);

        let max = viewport.zoomed_at(Vec2::new(400.0, 300.0), 1000.0, &layout(), (100, 100));
        assert_eq!(max.zoom, MAX_ZOOM);
        let min = viewport.zoomed_at(Vec2::new(400.0, 300.0), -1000.0, &layout(), (100, 100));
        assert_eq!(min.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_keeps_cursor_tile_exact() {
        let viewport = Viewport {
            offset: Position::new(20, 20),
            zoom: 1.0,
            base_tile_size: 32,
        };
        let pixel = Vec2::new(320.0, 40.0 + 320.0);
        let grid = (100, 100);
        let before = viewport.screen_to_tile(pixel, &layout(), grid);
        assert_eq!(before, Some(Position::new(30, 30)));

        // 1.0 -> 2.0
        let zoomed = viewport.zoomed_at(pixel, 10.0, &layout(), grid);
        assert_eq!(zoomed.zoom, 2.0);
        assert_eq!(zoomed.offset, Position::new(25, 25));
        assert_eq!(zoomed.screen_to_tile(pixel, &layout(), grid), before);
    }

    #[test]
    fn test_zoom_keeps_cursor_tile_within_rounding() {
        let grid = (200, 200);
        let pixels = [
            Vec2::new(100.0, 100.0),
            Vec2::new(400.0, 300.0),
            Vec2::new(799.0, 599.0),
            Vec2::new(0.0, 40.0),
        ];
        for pixel in pixels {
            let mut viewport = Viewport {
                offset: Position::new(80, 80),
                zoom: 1.0,
                base_tile_size: 32,
            };
            for delta in [1.0, 1.0, -1.0, 3.0, -2.0, -2.0, 0.5] {
                let before = viewport.screen_to_tile(pixel, &layout(), grid).unwrap();
                viewport = viewport.zoomed_at(pixel, delta, &layout(), grid);
                let after = viewport.screen_to_tile(pixel, &layout(), grid).unwrap();
                assert!(
                    (before.x - after.x).abs() <= 1 && (before.y - after.y).abs() <= 1,
                    "pixel {:?} delta {}: {:?} -> {:?}",
                    pixel,
                    delta,
                    before,
                    after
                );
            }
        }
    }
}

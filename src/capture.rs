//! Desktop snapshot: one capture of every attached display, composed into a
//! single RGBA buffer covering the union of their bounds.

use anyhow::{anyhow, Result};
use image::{imageops, Rgba, RgbaImage};
use log::{debug, info};
use screenshots::Screen;
use std::env;

/// Set to swap R/B of captured pixels on backends that hand back BGRA.
pub const FORCE_BGRA_ENV: &str = "REGION_SNIP_FORCE_BGRA";

/// Bounds of one display in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DisplayRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// Smallest axis-aligned rectangle covering every display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenUnionBounds {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Displays may have gaps, offsets or overlaps, so this is min/max over the
/// edges rather than a sum of sizes. `None` when no display is attached.
pub fn union_bounds(displays: &[DisplayRect]) -> Option<ScreenUnionBounds> {
    let left = displays.iter().map(|d| d.x).min()?;
    let top = displays.iter().map(|d| d.y).min()?;
    let right = displays.iter().map(DisplayRect::right).max()?;
    let bottom = displays.iter().map(DisplayRect::bottom).max()?;
    Some(ScreenUnionBounds {
        left,
        top,
        width: (right - left as i64).max(0) as u32,
        height: (bottom - top as i64).max(0) as u32,
    })
}

/// The session's only copy of the desktop. Owned by the overlay and freed
/// together with it.
pub struct Snapshot {
    bounds: ScreenUnionBounds,
    image: RgbaImage,
}

impl Snapshot {
    pub fn new(bounds: ScreenUnionBounds, image: RgbaImage) -> Self {
        Self { bounds, image }
    }

    pub fn bounds(&self) -> ScreenUnionBounds {
        self.bounds
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Capture all displays. Must be called before the overlay is made visible.
pub fn capture_all() -> Result<Snapshot> {
    let screens = Screen::all().map_err(|e| anyhow!("detect screens failed: {e}"))?;
    let displays: Vec<DisplayRect> = screens
        .iter()
        .map(|s| {
            let info = &s.display_info;
            DisplayRect::new(info.x, info.y, info.width, info.height)
        })
        .collect();
    let bounds = union_bounds(&displays).ok_or_else(|| anyhow!("no displays attached"))?;
    if bounds.width == 0 || bounds.height == 0 {
        return Err(anyhow!("displays cover an empty area"));
    }

    let mut canvas = RgbaImage::from_pixel(bounds.width, bounds.height, Rgba([0, 0, 0, 255]));
    for (screen, rect) in screens.iter().zip(&displays) {
        let id = screen.display_info.id;
        let shot = screen
            .capture()
            .map_err(|e| anyhow!("capture display {id} failed: {e}"))?;
        let (w, h) = (shot.width(), shot.height());
        let mut raw = shot.into_raw();
        if env::var(FORCE_BGRA_ENV).is_ok() {
            swap_red_blue(&mut raw);
        }
        let tile = RgbaImage::from_raw(w, h, raw)
            .ok_or_else(|| anyhow!("display {id} returned a short buffer"))?;
        debug!("display {id} at ({}, {}) captured as {w}x{h}", rect.x, rect.y);
        compose(&mut canvas, bounds, *rect, &tile);
    }
    info!(
        "captured desktop {}x{} at ({}, {}) from {} display(s)",
        bounds.width,
        bounds.height,
        bounds.left,
        bounds.top,
        displays.len()
    );
    Ok(Snapshot::new(bounds, canvas))
}

// Pixels of `tile` outside the union are clipped by `replace`.
fn compose(canvas: &mut RgbaImage, bounds: ScreenUnionBounds, rect: DisplayRect, tile: &RgbaImage) {
    let dx = rect.x as i64 - bounds.left as i64;
    let dy = rect.y as i64 - bounds.top as i64;
    imageops::replace(canvas, tile, dx, dy);
}

fn swap_red_blue(raw: &mut [u8]) {
    for px in raw.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

// renderer: turns the snapshot into softbuffer frames.
// Two full-size layers are prepared once per session with tiny-skia: the
// snapshot as is, and the snapshot under a translucent black fill. Each frame
// then copies the dimmed layer everywhere except the selection, which gets
// the bright layer.

use anyhow::{anyhow, Result};
use image::RgbaImage;
use tiny_skia::{IntSize, Paint, Pixmap, Rect, Transform};

/// Alpha of the black fill over the unselected area (~40%).
const DIM_ALPHA: u8 = 102;
/// Fill for parts of the window the snapshot does not cover.
const BACKDROP: u32 = 0xFF000000;

/// Integer rectangle in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    fn right(&self) -> i32 {
        self.x + self.w
    }

    fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = PixelRect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        );
        (!r.is_empty()).then_some(r)
    }

    /// `self` minus `hole` as up to four non-overlapping bands (above,
    /// below, left, right). `hole` must lie inside `self`.
    pub fn subtract(&self, hole: &PixelRect) -> Vec<PixelRect> {
        [
            PixelRect::new(self.x, self.y, self.w, hole.y - self.y),
            PixelRect::new(self.x, hole.bottom(), self.w, self.bottom() - hole.bottom()),
            PixelRect::new(self.x, hole.y, hole.x - self.x, hole.h),
            PixelRect::new(hole.right(), hole.y, self.right() - hole.right(), hole.h),
        ]
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect()
    }
}

pub struct Renderer {
    width: u32,
    height: u32,
    bright: Vec<u32>,
    dimmed: Vec<u32>,
}

impl Renderer {
    pub fn new(snapshot: &RgbaImage) -> Result<Self> {
        let (width, height) = snapshot.dimensions();
        let size = IntSize::from_wh(width, height).ok_or_else(|| anyhow!("empty snapshot"))?;
        // Opaque pixels are valid premultiplied data, whatever alpha the
        // capture backend reported.
        let mut data = snapshot.as_raw().clone();
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        let bright = pack_bgra(&data);

        let mut pixmap = Pixmap::from_vec(data, size).ok_or_else(|| anyhow!("create pixmap failed"))?;
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, DIM_ALPHA);
        paint.anti_alias = false;
        let full = Rect::from_xywh(0.0, 0.0, width as f32, height as f32)
            .ok_or_else(|| anyhow!("invalid snapshot rect"))?;
        pixmap.fill_rect(full, &paint, Transform::identity(), None);
        let dimmed = pack_bgra(pixmap.data());

        Ok(Self {
            width,
            height,
            bright,
            dimmed,
        })
    }

    /// Fill `frame` (`frame_w x frame_h`) with the dimmed snapshot and cut
    /// `selection` out of it at full brightness.
    pub fn compose(&self, frame: &mut [u32], frame_w: u32, frame_h: u32, selection: Option<PixelRect>) {
        if frame_w > self.width || frame_h > self.height {
            frame.fill(BACKDROP);
        }
        let surface = PixelRect::new(
            0,
            0,
            frame_w.min(self.width) as i32,
            frame_h.min(self.height) as i32,
        );
        if surface.is_empty() {
            return;
        }
        match selection.and_then(|s| s.intersect(&surface)) {
            Some(hole) => {
                for band in surface.subtract(&hole) {
                    self.blit(&self.dimmed, frame, frame_w, band);
                }
                self.blit(&self.bright, frame, frame_w, hole);
            }
            None => self.blit(&self.dimmed, frame, frame_w, surface),
        }
    }

    fn blit(&self, src: &[u32], frame: &mut [u32], frame_w: u32, r: PixelRect) {
        let len = r.w as usize;
        for y in r.y..r.bottom() {
            let s = y as usize * self.width as usize + r.x as usize;
            let d = y as usize * frame_w as usize + r.x as usize;
            frame[d..d + len].copy_from_slice(&src[s..s + len]);
        }
    }
}

// RGBA bytes -> little endian BGRA words as softbuffer expects.
fn pack_bgra(rgba: &[u8]) -> Vec<u32> {
    bytemuck::cast_slice::<u8, [u8; 4]>(rgba)
        .iter()
        .map(|&[r, g, b, a]| u32::from_le_bytes([b, g, r, a]))
        .collect()
}

use crate::overlay::font;
use crate::selection::Label;

pub const OUTLINE: u32 = 0xFFFFFFFF;
const LABEL_BG: u32 = 0xFF202020;
const LABEL_FG: u32 = 0xFFFFFFFF;
const LABEL_SCALE: i32 = 2;
const LABEL_PAD: i32 = 4;

/// Clipped pixel writes into a softbuffer frame (0xAARRGGBB per pixel).
pub struct Canvas<'a> {
    frame: &'a mut [u32],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u32], width: u32, height: u32) -> Self {
        debug_assert!(frame.len() >= (width * height) as usize);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn set_px(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.frame[(y as u32 * self.width + x as u32) as usize] = color;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let x1 = (x + w).min(self.width as i32);
        if x0 >= x1 {
            return;
        }
        for yy in y.max(0)..(y + h).min(self.height as i32) {
            let row = (yy as u32 * self.width) as usize;
            self.frame[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// 1px outline just inside `(x, y, w, h)`.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }

    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: i32, color: u32) {
        font::for_each_pixel(text, x, y, scale, |px, py| self.set_px(px, py, color));
    }

    /// Label on a dark box whose top-left sits at the label position, pushed
    /// back inside the canvas when it would overflow an edge.
    pub fn draw_label(&mut self, label: &Label) {
        let (box_x, box_y, box_w, box_h) = label_box(label, self.width, self.height);
        self.fill_rect(box_x, box_y, box_w, box_h, LABEL_BG);
        self.draw_text(
            box_x + LABEL_PAD,
            box_y + LABEL_PAD,
            &label.text,
            LABEL_SCALE,
            LABEL_FG,
        );
    }
}

fn label_box(label: &Label, width: u32, height: u32) -> (i32, i32, i32, i32) {
    let w = font::text_width(&label.text, LABEL_SCALE) + LABEL_PAD * 2;
    let h = font::text_height(LABEL_SCALE) + LABEL_PAD * 2;
    let max_x = (width as i32 - w).max(0);
    let max_y = (height as i32 - h).max(0);
    let x = (label.x as i32).clamp(0, max_x);
    let y = (label.y as i32).clamp(0, max_y);
    (x, y, w, h)
}

// filepath: src/draw.rs
//! Drawing utilities for simple-canvas
//!
//! This file contains the pixel surface the sequencer draws into
//! and the Canvas used to fill it with shapes and text.

use crate::text::Typeface;

/// Packed ARGB color, bit-compatible with a 32-bit Android color int
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0);

    /// Build a color from a config-style `[r, g, b, a]` array
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba;
        Color::from_channels(a, r, g, b)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Subtract `multiplier * inset` from the raw color value.
    ///
    /// This is integer arithmetic across all channels at once, so the
    /// result wraps and bleeds between channels as the inset grows.
    pub fn shifted(self, multiplier: u32, inset: u32) -> Self {
        Color(self.0.wrapping_sub(multiplier.wrapping_mul(inset)))
    }

    /// Bytes for a `wl_shm` ARGB8888 buffer (premultiplied, little-endian)
    pub fn premultiplied_le(self) -> [u8; 4] {
        let a = self.alpha() as u32;
        let scale = |c: u8| ((c as u32 * a + 127) / 255) as u8;
        [scale(self.blue()), scale(self.green()), scale(self.red()), a as u8]
    }

    fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(u32::from_be_bytes([a, r, g, b]))
    }
}

/// Owned pixel buffer the sequencer draws into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Surface {
    /// Allocate a fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Read a single pixel, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.pixels, self.width, self.height)
    }
}

/// How a string is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub underline: bool,
}

/// Canvas abstraction over a surface's pixels
pub struct Canvas<'a> {
    buffer: &'a mut [Color],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    /// Create a new canvas from a raw buffer
    pub fn new(buffer: &'a mut [Color], width: u32, height: u32) -> Self {
        Self {
            buffer,
            width,
            height,
        }
    }

    /// Paint the whole canvas with one color
    pub fn fill(&mut self, color: Color) {
        for pixel in self.buffer.iter_mut() {
            *pixel = blend(*pixel, color, 255);
        }
    }

    /// Draw a filled rectangle; `right` and `bottom` are exclusive
    pub fn fill_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32, color: Color) {
        // Clip to the canvas
        let x_start = left.max(0);
        let y_start = top.max(0);
        let x_end = right.min(self.width as i32);
        let y_end = bottom.min(self.height as i32);

        if x_end <= x_start || y_end <= y_start {
            return; // Nothing to draw
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.blend_pixel(x, y, color, 255);
            }
        }
    }

    /// Draw a filled circle covering every pixel whose center lies within `radius`
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius <= 0 {
            return;
        }
        let y_start = (cy - radius).max(0);
        let y_end = (cy + radius + 1).min(self.height as i32);
        let x_start = (cx - radius).max(0);
        let x_end = (cx + radius + 1).min(self.width as i32);

        // Compare doubled coordinates so pixel centers stay integral
        let limit = 4 * radius as i64 * radius as i64;
        for y in y_start..y_end {
            let dy = (2 * y + 1 - 2 * cy) as i64;
            for x in x_start..x_end {
                let dx = (2 * x + 1 - 2 * cx) as i64;
                if dx * dx + dy * dy <= limit {
                    self.blend_pixel(x, y, color, 255);
                }
            }
        }
    }

    /// Draw `text` with its baseline starting at `(x, y)`
    pub fn draw_text(
        &mut self,
        face: &dyn Typeface,
        x: i32,
        y: i32,
        text: &str,
        style: &TextStyle,
    ) {
        face.render(text, style.size, &mut |dx, dy, coverage| {
            self.blend_pixel(x + dx, y + dy, style.color, coverage);
        });

        if style.underline {
            let advance = face.advance(text, style.size);
            let offset = (style.size / 9.0).round() as i32;
            let thickness = ((style.size / 18.0).round() as i32).max(1);
            self.fill_rect(
                x,
                y + offset,
                x + advance,
                y + offset + thickness,
                style.color,
            );
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        if let Some(pixel) = self.buffer.get_mut(idx) {
            *pixel = blend(*pixel, color, coverage);
        }
    }
}

/// Source-over with straight alpha
fn blend(dst: Color, src: Color, coverage: u8) -> Color {
    let sa = src.alpha() as u32 * coverage as u32 / 255;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da = dst.alpha() as u32 * (255 - sa) / 255;
    let out_a = sa + da;
    if out_a == 0 {
        return Color::TRANSPARENT;
    }
    let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da + out_a / 2) / out_a) as u8;
    Color::from_channels(
        out_a as u8,
        mix(src.red(), dst.red()),
        mix(src.green(), dst.green()),
        mix(src.blue(), dst.blue()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_arrays_pack_as_argb() {
        assert_eq!(Color::from_rgba([0x12, 0x34, 0x56, 0xFF]), Color(0xFF12_3456));
        assert_eq!(Color::from_rgba([0, 0, 0, 0]), Color::TRANSPARENT);
    }

    #[test]
    fn shifted_wraps_instead_of_clamping() {
        let base = Color(0xFF8B_C34A);
        assert_eq!(base.shifted(100, 120), Color(0xFF8B_946A));

        let dark = Color(0x0000_0010);
        assert_eq!(dark.shifted(100, 120), Color(0x10u32.wrapping_sub(12_000)));
    }

    #[test]
    fn premultiplied_bytes_are_little_endian_bgra() {
        assert_eq!(Color(0xFF11_2233).premultiplied_le(), [0x33, 0x22, 0x11, 0xFF]);
        assert_eq!(Color(0x00FF_FFFF).premultiplied_le(), [0, 0, 0, 0]);
        assert_eq!(Color(0x80FF_0000).premultiplied_le(), [0, 0, 0x80, 0x80]);
    }

    #[test]
    fn rect_edges_are_half_open_and_clipped() {
        let mut surface = Surface::new(10, 10);
        let red = Color(0xFFFF_0000);
        surface.canvas().fill_rect(-5, 2, 3, 4, red);

        assert_eq!(surface.pixel(0, 2), Some(red));
        assert_eq!(surface.pixel(2, 3), Some(red));
        assert_eq!(surface.pixel(3, 3), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(0, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn inverted_rect_draws_nothing() {
        let mut surface = Surface::new(8, 8);
        surface.canvas().fill_rect(6, 6, 2, 2, Color(0xFFFF_FFFF));
        assert!(surface.pixels().iter().all(|p| *p == Color::TRANSPARENT));
    }

    #[test]
    fn circle_covers_center_and_stops_at_radius() {
        let mut surface = Surface::new(40, 40);
        let blue = Color(0xFF00_00FF);
        surface.canvas().fill_circle(20, 20, 10, blue);

        assert_eq!(surface.pixel(20, 20), Some(blue));
        assert_eq!(surface.pixel(20, 11), Some(blue));
        assert_eq!(surface.pixel(20, 9), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(28, 28), Some(Color::TRANSPARENT));
    }

    #[test]
    fn opaque_fill_replaces_and_translucent_fill_blends() {
        let mut surface = Surface::new(2, 1);
        surface.canvas().fill(Color(0xFF00_0000));
        assert_eq!(surface.pixel(1, 0), Some(Color(0xFF00_0000)));

        surface.canvas().fill(Color(0x80FF_FFFF));
        let p = surface.pixel(0, 0).unwrap_or_default();
        assert_eq!(p.alpha(), 0xFF);
        assert!(p.red() > 0x70 && p.red() < 0x90);
    }
}

// filepath: src/text.rs
//! Text rendering for simple-canvas
//!
//! Strings are drawn through a Typeface: either an outline font rasterized
//! with fontdue, or the built-in 5x7 bitmap font used when no font file
//! can be found.

use fontdue::{Font, FontSettings};
use log::{info, warn};
use std::{fs, path::Path};

/// Font files tried when the config does not name one
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

/// Rasterized coverage at or above this counts as ink
const INK_THRESHOLD: u8 = 128;

/// Ink bounds of a string, relative to the left end of its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn center_x(&self) -> i32 {
        (self.left + self.right) >> 1
    }

    pub fn center_y(&self) -> i32 {
        (self.top + self.bottom) >> 1
    }

    fn include(bounds: &mut Option<TextBounds>, left: i32, top: i32, right: i32, bottom: i32) {
        match bounds {
            Some(b) => {
                b.left = b.left.min(left);
                b.top = b.top.min(top);
                b.right = b.right.max(right);
                b.bottom = b.bottom.max(bottom);
            }
            None => {
                *bounds = Some(TextBounds {
                    left,
                    top,
                    right,
                    bottom,
                })
            }
        }
    }
}

/// A source of glyph shapes
pub trait Typeface {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Tight ink bounds of `text` at `size` pixels
    fn measure(&self, text: &str, size: f32) -> TextBounds;

    /// Horizontal distance the pen moves after drawing `text`
    fn advance(&self, text: &str, size: f32) -> i32;

    /// Emit `(dx, dy, coverage)` for every inked pixel, relative to the baseline origin
    fn render(&self, text: &str, size: f32, plot: &mut dyn FnMut(i32, i32, u8));
}

/// Pick a typeface: the configured font, a system font, or the bitmap fallback
pub fn load_typeface(font_path: Option<&Path>) -> Box<dyn Typeface> {
    if let Some(path) = font_path {
        match OutlineTypeface::from_path(path) {
            Ok(face) => {
                info!("Loaded font {}", path.display());
                return Box::new(face);
            }
            Err(e) => warn!("Failed to load font {}: {}", path.display(), e),
        }
    }

    for candidate in SYSTEM_FONT_CANDIDATES {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match OutlineTypeface::from_path(path) {
            Ok(face) => {
                info!("Using system font {}", path.display());
                return Box::new(face);
            }
            Err(e) => warn!("Skipping unusable font {}: {}", path.display(), e),
        }
    }

    warn!("No usable font found, falling back to the built-in bitmap font");
    Box::new(BitmapTypeface)
}

/// Outline font rasterized with fontdue
pub struct OutlineTypeface {
    name: String,
    font: Font,
}

impl OutlineTypeface {
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| format!("failed to parse font {name}: {e}"))?;
        Ok(Self {
            name: name.to_string(),
            font,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&path.display().to_string(), bytes)
    }

    /// Walk the string, yielding each glyph with its rounded pen position
    fn layout(&self, text: &str, size: f32, mut visit: impl FnMut(char, i32)) -> f32 {
        let mut pen = 0.0f32;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                pen += self.font.horizontal_kern(p, ch, size).unwrap_or(0.0);
            }
            visit(ch, pen.round() as i32);
            pen += self.font.metrics(ch, size).advance_width;
            prev = Some(ch);
        }
        pen
    }
}

impl Typeface for OutlineTypeface {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure(&self, text: &str, size: f32) -> TextBounds {
        let mut bounds = None;
        self.layout(text, size, |ch, pen| {
            let m = self.font.metrics(ch, size);
            if m.width == 0 || m.height == 0 {
                return;
            }
            let left = pen + m.xmin;
            let top = -(m.ymin + m.height as i32);
            TextBounds::include(&mut bounds, left, top, left + m.width as i32, -m.ymin);
        });
        bounds.unwrap_or_default()
    }

    fn advance(&self, text: &str, size: f32) -> i32 {
        self.layout(text, size, |_, _| {}).round() as i32
    }

    /// Glyphs are drawn aliased: a pixel is either fully inked or untouched,
    /// so drawing the same string twice leaves the pixels unchanged.
    fn render(&self, text: &str, size: f32, plot: &mut dyn FnMut(i32, i32, u8)) {
        self.layout(text, size, |ch, pen| {
            let (m, bitmap) = self.font.rasterize(ch, size);
            let left = pen + m.xmin;
            let top = -(m.ymin + m.height as i32);
            for (i, coverage) in bitmap.iter().enumerate() {
                if *coverage < INK_THRESHOLD {
                    continue;
                }
                let gx = (i % m.width) as i32;
                let gy = (i / m.width) as i32;
                plot(left + gx, top + gy, 255);
            }
        });
    }
}

/// Built-in 5x7 font, each cell scaled up to roughly match the text size
pub struct BitmapTypeface;

/// Glyph rows (bit 4 = leftmost) and how many rows it hangs below the baseline
struct Glyph {
    rows: [u8; 7],
    drop: i32,
}

impl BitmapTypeface {
    fn scale(size: f32) -> i32 {
        ((size / 10.0) as i32).max(1)
    }

    /// Visit every inked cell as a `scale x scale` block origin
    fn blocks(text: &str, size: f32, mut visit: impl FnMut(i32, i32, i32)) {
        let s = Self::scale(size);
        for (i, ch) in text.chars().enumerate() {
            let glyph = glyph5x7(ch);
            let pen = i as i32 * 6 * s;
            for (ry, &bits) in glyph.rows.iter().enumerate() {
                for rx in 0..5 {
                    if bits & (1u8 << (4 - rx)) != 0 {
                        let x = pen + rx * s;
                        let y = (ry as i32 - 7 + glyph.drop) * s;
                        visit(x, y, s);
                    }
                }
            }
        }
    }
}

impl Typeface for BitmapTypeface {
    fn name(&self) -> &str {
        "bitmap-5x7"
    }

    fn measure(&self, text: &str, size: f32) -> TextBounds {
        let mut bounds = None;
        Self::blocks(text, size, |x, y, s| {
            TextBounds::include(&mut bounds, x, y, x + s, y + s);
        });
        bounds.unwrap_or_default()
    }

    fn advance(&self, text: &str, size: f32) -> i32 {
        text.chars().count() as i32 * 6 * Self::scale(size)
    }

    fn render(&self, text: &str, size: f32, plot: &mut dyn FnMut(i32, i32, u8)) {
        Self::blocks(text, size, |x, y, s| {
            for dy in 0..s {
                for dx in 0..s {
                    plot(x + dx, y + dy, 255);
                }
            }
        });
    }
}

fn glyph5x7(ch: char) -> Glyph {
    macro_rules! g {
        (drop $a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
            Glyph { rows: [$a, $b, $c, $d, $e, $f, $g], drop: 2 }
        };
        ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
            Glyph { rows: [$a, $b, $c, $d, $e, $f, $g], drop: 0 }
        };
    }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        'a' => g!(0b00000,0b00000,0b01110,0b00001,0b01111,0b10001,0b01111),
        'b' => g!(0b10000,0b10000,0b10110,0b11001,0b10001,0b10001,0b11110),
        'c' => g!(0b00000,0b00000,0b01110,0b10000,0b10000,0b10001,0b01110),
        'd' => g!(0b00001,0b00001,0b01101,0b10011,0b10001,0b10001,0b01111),
        'e' => g!(0b00000,0b00000,0b01110,0b10001,0b11111,0b10000,0b01110),
        'f' => g!(0b00110,0b01001,0b01000,0b11100,0b01000,0b01000,0b01000),
        'g' => g!(drop 0b01111,0b10001,0b10001,0b01111,0b00001,0b00001,0b01110),
        'h' => g!(0b10000,0b10000,0b10110,0b11001,0b10001,0b10001,0b10001),
        'i' => g!(0b00100,0b00000,0b01100,0b00100,0b00100,0b00100,0b01110),
        'j' => g!(drop 0b00010,0b00000,0b00110,0b00010,0b00010,0b10010,0b01100),
        'k' => g!(0b10000,0b10000,0b10010,0b10100,0b11000,0b10100,0b10010),
        'l' => g!(0b01100,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'm' => g!(0b00000,0b00000,0b11010,0b10101,0b10101,0b10001,0b10001),
        'n' => g!(0b00000,0b00000,0b10110,0b11001,0b10001,0b10001,0b10001),
        'o' => g!(0b00000,0b00000,0b01110,0b10001,0b10001,0b10001,0b01110),
        'p' => g!(drop 0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'q' => g!(drop 0b01111,0b10001,0b10001,0b01111,0b00001,0b00001,0b00001),
        'r' => g!(0b00000,0b00000,0b10110,0b11001,0b10000,0b10000,0b10000),
        's' => g!(0b00000,0b00000,0b01111,0b10000,0b01110,0b00001,0b11110),
        't' => g!(0b01000,0b01000,0b11100,0b01000,0b01000,0b01001,0b00110),
        'u' => g!(0b00000,0b00000,0b10001,0b10001,0b10001,0b10011,0b01101),
        'v' => g!(0b00000,0b00000,0b10001,0b10001,0b10001,0b01010,0b00100),
        'w' => g!(0b00000,0b00000,0b10001,0b10001,0b10101,0b10101,0b01010),
        'x' => g!(0b00000,0b00000,0b10001,0b01010,0b00100,0b01010,0b10001),
        'y' => g!(drop 0b10001,0b10001,0b10001,0b01111,0b00001,0b00001,0b01110),
        'z' => g!(0b00000,0b00000,0b11111,0b00010,0b00100,0b01000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),

        // Hollow box for anything we have no shape for
        _ => g!(0b11111,0b10001,0b10001,0b10001,0b10001,0b10001,0b11111),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_scale_tracks_text_size() {
        assert_eq!(BitmapTypeface::scale(70.0), 7);
        assert_eq!(BitmapTypeface::scale(4.0), 1);
    }

    #[test]
    fn bitmap_bounds_sit_on_the_baseline() {
        let bounds = BitmapTypeface.measure("D", 70.0);
        assert_eq!(bounds, TextBounds { left: 0, top: -49, right: 35, bottom: 0 });
        assert_eq!(bounds.center_x(), 17);
        assert_eq!(bounds.center_y(), -25);
    }

    #[test]
    fn descenders_extend_below_the_baseline() {
        let bounds = BitmapTypeface.measure("g", 10.0);
        assert!(bounds.bottom > 0);
        assert_eq!(bounds.bottom, 2);
    }

    #[test]
    fn blank_text_has_empty_bounds() {
        assert_eq!(BitmapTypeface.measure("", 70.0), TextBounds::default());
        assert_eq!(BitmapTypeface.measure("   ", 70.0), TextBounds::default());
        assert_eq!(BitmapTypeface.advance("   ", 70.0), 3 * 42);
    }

    #[test]
    fn render_stays_inside_measured_bounds() {
        let text = "Done!";
        let bounds = BitmapTypeface.measure(text, 30.0);
        let mut count = 0;
        BitmapTypeface.render(text, 30.0, &mut |x, y, coverage| {
            assert_eq!(coverage, 255);
            assert!(x >= bounds.left && x < bounds.right);
            assert!(y >= bounds.top && y < bounds.bottom);
            count += 1;
        });
        assert!(count > 0);
    }

    #[test]
    fn unknown_glyphs_draw_a_box() {
        let bounds = BitmapTypeface.measure("\u{2603}", 10.0);
        assert_eq!(bounds, TextBounds { left: 0, top: -7, right: 5, bottom: 0 });
    }

    fn system_font() -> Option<OutlineTypeface> {
        SYSTEM_FONT_CANDIDATES
            .iter()
            .find_map(|path| OutlineTypeface::from_path(Path::new(path)).ok())
    }

    #[test]
    fn outline_glyphs_are_fully_inked_or_skipped() {
        let Some(face) = system_font() else {
            return;
        };
        let mut count = 0;
        face.render("Done!", 70.0, &mut |_, _, coverage| {
            assert_eq!(coverage, 255);
            count += 1;
        });
        assert!(count > 0);
    }

    #[test]
    fn outline_loading_reports_bad_fonts() {
        let face = OutlineTypeface::from_path(Path::new("/nonexistent/font.ttf"));
        assert!(face.is_err());
        let garbage = OutlineTypeface::from_bytes("garbage", vec![0, 1, 2, 3]);
        assert!(garbage.is_err());
    }
}

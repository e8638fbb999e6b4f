// filepath: src/resources.rs
//! Named colors and strings, resolved once at startup

use crate::config::CanvasConfig;
use crate::draw::{Color, TextStyle};

/// Initial inset, and the amount it grows by on every rectangle
pub const OFFSET: u32 = 120;
/// Scales the inset before it is subtracted from the rectangle color
pub const MULTIPLIER: u32 = 100;
pub const TEXT_SIZE: f32 = 70.0;
pub const PROMPT_ORIGIN: (i32, i32) = (100, 100);

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorName {
    Background,
    Rectangle,
    Accent,
    TextPrimary,
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringName {
    KeepTapping,
    Done,
}

impl ColorName {
    fn default_value(self) -> Color {
        match self {
            ColorName::Background => Color(0xFFFF_F3E0),
            ColorName::Rectangle => Color(0xFF8B_C34A),
            ColorName::Accent => Color(0xFFFF_4081),
            ColorName::TextPrimary => Color(0xFF30_3F9F),
            ColorName::Backdrop => Color(0xFFFA_FAFA),
        }
    }
}

impl StringName {
    fn default_value(self) -> &'static str {
        match self {
            StringName::KeepTapping => "Keep tapping!",
            StringName::Done => "Done!",
        }
    }
}

impl CanvasConfig {
    /// Resolve a named color, preferring the configured value
    pub fn color(&self, name: ColorName) -> Color {
        let configured = match name {
            ColorName::Background => self.palette.background,
            ColorName::Rectangle => self.palette.rectangle,
            ColorName::Accent => self.palette.accent,
            ColorName::TextPrimary => self.palette.text,
            ColorName::Backdrop => self.window.backdrop,
        };
        configured
            .map(Color::from_rgba)
            .unwrap_or_else(|| name.default_value())
    }

    /// Resolve a named string, preferring the configured value
    pub fn string(&self, name: StringName) -> String {
        let configured = match name {
            StringName::KeepTapping => self.strings.keep_tapping.as_deref(),
            StringName::Done => self.strings.done.as_deref(),
        };
        configured.unwrap_or(name.default_value()).to_string()
    }
}

/// Colors used by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub rectangle: Color,
    pub accent: Color,
    pub text: Color,
}

/// Everything the sequencer needs, fixed for the process lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    pub palette: Palette,
    pub keep_tapping: String,
    pub done: String,
    pub text_size: f32,
    pub underline: bool,
    pub prompt_origin: (i32, i32),
    pub offset: u32,
    pub multiplier: u32,
}

impl Resources {
    pub fn resolve(config: &CanvasConfig) -> Self {
        let offset = match config.sequence.offset {
            Some(0) => {
                log::warn!("sequence.offset must be positive, using {}", OFFSET);
                OFFSET
            }
            Some(offset) => offset,
            None => OFFSET,
        };

        Self {
            palette: Palette {
                background: config.color(ColorName::Background),
                rectangle: config.color(ColorName::Rectangle),
                accent: config.color(ColorName::Accent),
                text: config.color(ColorName::TextPrimary),
            },
            keep_tapping: config.string(StringName::KeepTapping),
            done: config.string(StringName::Done),
            text_size: config.text.size.unwrap_or(TEXT_SIZE),
            underline: config.text.underline.unwrap_or(true),
            prompt_origin: (
                config.text.prompt_x.unwrap_or(PROMPT_ORIGIN.0),
                config.text.prompt_y.unwrap_or(PROMPT_ORIGIN.1),
            ),
            offset,
            multiplier: config.sequence.multiplier.unwrap_or(MULTIPLIER),
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            color: self.palette.text,
            size: self.text_size,
            underline: self.underline,
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::resolve(&CanvasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_gap() {
        let res = Resources::default();
        assert_eq!(res.offset, 120);
        assert_eq!(res.multiplier, 100);
        assert_eq!(res.text_size, 70.0);
        assert_eq!(res.prompt_origin, (100, 100));
        assert_eq!(res.keep_tapping, "Keep tapping!");
        assert_eq!(res.done, "Done!");
        assert!(res.underline);
    }

    #[test]
    fn configured_values_win() {
        let mut config = CanvasConfig::default();
        config.palette.accent = Some([0x11, 0x22, 0x33, 0xFF]);
        config.strings.done = Some("Fin".to_string());
        config.sequence.multiplier = Some(7);

        assert_eq!(config.color(ColorName::Accent), Color(0xFF11_2233));
        assert_eq!(config.color(ColorName::Rectangle), Color(0xFF8B_C34A));
        assert_eq!(config.string(StringName::Done), "Fin");

        let res = Resources::resolve(&config);
        assert_eq!(res.palette.accent, Color(0xFF11_2233));
        assert_eq!(res.multiplier, 7);
        assert_eq!(res.offset, OFFSET);
    }

    #[test]
    fn zero_offset_is_replaced() {
        let mut config = CanvasConfig::default();
        config.sequence.offset = Some(0);
        assert_eq!(Resources::resolve(&config).offset, OFFSET);
    }
}

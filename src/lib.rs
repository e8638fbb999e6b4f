pub mod config;
pub mod draw;
pub mod resources;
pub mod sequencer;
pub mod text;

pub use crate::config::CanvasConfig;
pub use crate::draw::{Canvas, Color, Surface, TextStyle};
pub use crate::resources::Resources;
pub use crate::sequencer::{Phase, Sequencer, TapOutcome, View};
pub use crate::text::{BitmapTypeface, OutlineTypeface, TextBounds, Typeface};

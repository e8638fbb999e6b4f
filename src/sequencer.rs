// filepath: src/sequencer.rs
//! Tap-driven drawing sequencer
//!
//! Every tap advances the drawing by one step. The first tap prepares the
//! surface, later taps draw ever smaller rectangles, and once there is no
//! room left a circle and a label finish the picture.

use crate::draw::{Color, Surface};
use crate::resources::Resources;
use crate::text::Typeface;
use log::{debug, info};

/// The host view a tap lands on
pub trait View {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Ask the host to repaint the view
    fn invalidate(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Shrinking,
    Done,
}

/// What a single tap drew
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Initialized { width: u32, height: u32 },
    Rectangle { inset: u32, color: Color },
    Finished { radius: u32 },
}

pub struct Sequencer {
    resources: Resources,
    typeface: Box<dyn Typeface>,
    phase: Phase,
    inset: u32,
    surface: Option<Surface>,
}

impl Sequencer {
    pub fn new(resources: Resources, typeface: Box<dyn Typeface>) -> Self {
        info!(
            "Sequencer ready: offset {}, multiplier {}, typeface {}",
            resources.offset,
            resources.multiplier,
            typeface.name()
        );
        let inset = resources.offset;
        Self {
            resources,
            typeface,
            phase: Phase::Uninitialized,
            inset,
            surface: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn inset(&self) -> u32 {
        self.inset
    }

    /// The drawn pixels, once the first tap has created them
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Advance the drawing by one step
    pub fn on_tap(&mut self, view: &mut dyn View) -> TapOutcome {
        let width = view.width();
        let height = view.height();
        let half_w = width / 2;
        let half_h = height / 2;

        // Allocated once; later size changes of the view are not followed
        let surface = self
            .surface
            .get_or_insert_with(|| Surface::new(width, height));
        let mut canvas = surface.canvas();
        let res = &self.resources;

        let outcome = match self.phase {
            Phase::Uninitialized => {
                canvas.fill(res.palette.background);
                let (x, y) = res.prompt_origin;
                canvas.draw_text(
                    self.typeface.as_ref(),
                    x,
                    y,
                    &res.keep_tapping,
                    &res.text_style(),
                );
                // The first rectangle starts one step further in
                self.inset += res.offset;
                self.phase = Phase::Shrinking;
                TapOutcome::Initialized { width, height }
            }
            Phase::Shrinking if self.inset < half_w && self.inset < half_h => {
                let inset = self.inset;
                let color = res.palette.rectangle.shifted(res.multiplier, inset);
                canvas.fill_rect(
                    inset as i32,
                    inset as i32,
                    width as i32 - inset as i32,
                    height as i32 - inset as i32,
                    color,
                );
                self.inset += res.offset;
                TapOutcome::Rectangle { inset, color }
            }
            Phase::Shrinking | Phase::Done => {
                let radius = half_w / 3;
                canvas.fill_circle(
                    half_w as i32,
                    half_h as i32,
                    radius as i32,
                    res.palette.accent,
                );

                let style = res.text_style();
                let bounds = self.typeface.measure(&res.done, style.size);
                let x = half_w as i32 - bounds.center_x();
                let y = half_h as i32 - bounds.center_y();
                canvas.draw_text(self.typeface.as_ref(), x, y, &res.done, &style);

                if self.phase != Phase::Done {
                    info!("Sequence finished at inset {}", self.inset);
                    self.phase = Phase::Done;
                }
                TapOutcome::Finished { radius }
            }
        };

        debug!("Tap on {}x{} view: {:?}", width, height, outcome);
        view.invalidate();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::BitmapTypeface;

    struct FixedView {
        width: u32,
        height: u32,
        repaints: usize,
    }

    impl View for FixedView {
        fn width(&self) -> u32 {
            self.width
        }
        fn height(&self) -> u32 {
            self.height
        }
        fn invalidate(&mut self) {
            self.repaints += 1;
        }
    }

    fn sequencer() -> Sequencer {
        Sequencer::new(Resources::default(), Box::new(BitmapTypeface))
    }

    #[test]
    fn first_tap_only_prepares_the_surface() {
        let mut seq = sequencer();
        let mut view = FixedView { width: 800, height: 600, repaints: 0 };

        assert!(seq.surface().is_none());
        let outcome = seq.on_tap(&mut view);

        assert_eq!(outcome, TapOutcome::Initialized { width: 800, height: 600 });
        assert_eq!(seq.phase(), Phase::Shrinking);
        assert_eq!(seq.inset(), 240);
        assert_eq!(view.repaints, 1);

        let surface = seq.surface().expect("surface allocated");
        assert_eq!((surface.width(), surface.height()), (800, 600));
        let background = seq.resources().palette.background;
        assert_eq!(surface.pixel(400, 300), Some(background));
        assert_eq!(surface.pixel(799, 599), Some(background));
    }

    #[test]
    fn worked_example_800_by_600() {
        let mut seq = sequencer();
        let mut view = FixedView { width: 800, height: 600, repaints: 0 };
        let base = seq.resources().palette.rectangle;

        assert!(matches!(seq.on_tap(&mut view), TapOutcome::Initialized { .. }));
        assert_eq!(seq.inset(), 240);
        assert_eq!(
            seq.on_tap(&mut view),
            TapOutcome::Rectangle { inset: 240, color: Color(base.0.wrapping_sub(24_000)) }
        );
        assert_eq!(seq.inset(), 360);
        assert_eq!(seq.on_tap(&mut view), TapOutcome::Finished { radius: 133 });
        assert_eq!(seq.phase(), Phase::Done);
        assert_eq!(seq.inset(), 360);
        assert_eq!(view.repaints, 3);
    }

    #[test]
    fn surface_is_not_resized_with_the_view() {
        let mut seq = sequencer();
        let mut view = FixedView { width: 400, height: 400, repaints: 0 };
        seq.on_tap(&mut view);

        view.width = 1000;
        view.height = 1000;
        seq.on_tap(&mut view);

        let surface = seq.surface().expect("surface allocated");
        assert_eq!((surface.width(), surface.height()), (400, 400));
    }

    #[test]
    fn done_phase_never_moves_the_inset() {
        let mut seq = sequencer();
        let mut view = FixedView { width: 100, height: 100, repaints: 0 };
        seq.on_tap(&mut view);
        assert!(matches!(seq.on_tap(&mut view), TapOutcome::Finished { radius: 16 }));

        // A larger view would leave room for rectangles again, but the sequence is over
        view.width = 2000;
        view.height = 2000;
        assert!(matches!(seq.on_tap(&mut view), TapOutcome::Finished { .. }));
        assert_eq!(seq.inset(), 240);
    }
}

// filepath: src/app.rs
//! Main application logic for simple-canvas

use log::{debug, info, warn};
use simple_canvas::{CanvasConfig, Color, Sequencer, Surface, View};
use smithay_client_toolkit::{
    compositor::CompositorState,
    compositor::Region,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{
        wlr_layer::{KeyboardInteractivity, LayerSurface},
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm},
};
use wayland_client::protocol::{wl_pointer, wl_shm};
use wayland_client::Proxy;

/// Size of the layer surface, as seen by the sequencer
struct HostView {
    width: u32,
    height: u32,
    invalidated: bool,
}

impl View for HostView {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn invalidate(&mut self) {
        self.invalidated = true;
    }
}

pub struct AppData {
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,
    compositor_state: CompositorState,
    shm_state: Shm,
    layer_surface: Option<LayerSurface>,
    pool: SlotPool,
    pub(crate) width: u32,
    pub(crate) height: u32,
    configured: bool,
    pointer: Option<wl_pointer::WlPointer>,
    backdrop: Color,
    sequencer: Sequencer,
    input_region: Option<Region>,
    pub(crate) buffer_drawn: bool,
    exit: bool,
}

impl AppData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        seat_state: SeatState,
        compositor_state: CompositorState,
        shm_state: Shm,
        layer_surface: LayerSurface,
        pool: SlotPool,
        config: &CanvasConfig,
        sequencer: Sequencer,
        (width, height): (u32, u32),
    ) -> Self {
        info!("Configuring layer surface {}x{}", width, height);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.set_size(width, height);
        layer_surface.set_exclusive_zone(-1);
        layer_surface.set_margin(0, 0, 0, 0);
        info!("Committing layer surface configuration");
        layer_surface.wl_surface().commit();

        Self {
            registry_state,
            output_state,
            seat_state,
            compositor_state,
            shm_state,
            layer_surface: Some(layer_surface),
            pool,
            width,
            height,
            configured: false,
            pointer: None,
            backdrop: config.color(simple_canvas::resources::ColorName::Backdrop),
            sequencer,
            input_region: None,
            buffer_drawn: false,
            exit: false,
        }
    }

    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    pub fn update_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    /// Feed one tap to the sequencer and repaint if it asked for it
    pub fn tap(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut view = HostView {
            width: self.width,
            height: self.height,
            invalidated: false,
        };
        let outcome = self.sequencer.on_tap(&mut view);
        info!("Tap drew {:?}", outcome);

        if view.invalidated {
            self.draw()?;
        }
        Ok(())
    }

    /// Copy the sequencer's surface into a fresh shm buffer and commit it
    pub fn draw(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.configured {
            debug!("draw() called before surface is configured, skipping");
            return Ok(());
        }
        info!("Drawing surface {}x{}", self.width, self.height);

        let width = self.width;
        let height = self.height;
        let stride = width * 4;

        let (buffer, canvas) = self.pool.create_buffer(
            width as i32,
            height as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
        )?;

        present_surface(
            canvas,
            width,
            height,
            self.sequencer.surface(),
            self.backdrop,
        );

        if let Some(layer_surface) = &self.layer_surface {
            buffer.attach_to(layer_surface.wl_surface())?;
            layer_surface
                .wl_surface()
                .damage_buffer(0, 0, width as i32, height as i32);
            layer_surface.wl_surface().commit();
        }

        Ok(())
    }

    pub fn set_full_input_region(&mut self) {
        if let Some(layer_surface) = &self.layer_surface {
            let surface = layer_surface.wl_surface();
            match Region::new(&self.compositor_state) {
                Ok(region) => {
                    region.add(0, 0, self.width as i32, self.height as i32);
                    surface.set_input_region(Some(region.wl_region()));
                    self.input_region = Some(region);
                    info!(
                        "Set input region to (0, 0, {}, {}) for surface {:?}",
                        self.width,
                        self.height,
                        surface.id()
                    );
                }
                Err(e) => {
                    warn!("Failed to create input region for canvas surface: {e}");
                }
            }
        } else {
            warn!("set_full_input_region called but no layer_surface present");
        }
    }

    pub fn registry_state(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    pub fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    pub fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    pub fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }

    pub fn set_pointer(&mut self, pointer: Option<wl_pointer::WlPointer>) {
        self.pointer = pointer;
        info!("Pointer set: {:?}", self.pointer.is_some());
    }

    pub fn close_layer_surface(&mut self) {
        self.layer_surface = None;
        self.exit = true;
        info!("Layer surface closed");
    }
}

/// Bytes needed for one ARGB8888 buffer of the given size
pub fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Fill an ARGB8888 shm buffer from the drawn surface, backdrop where it has no pixels
fn present_surface(
    canvas: &mut [u8],
    width: u32,
    height: u32,
    surface: Option<&Surface>,
    backdrop: Color,
) {
    let backdrop = backdrop.premultiplied_le();
    for (i, pixel) in canvas.chunks_exact_mut(4).enumerate() {
        let x = i as u32 % width.max(1);
        let y = i as u32 / width.max(1);
        if y >= height {
            break;
        }
        let bytes = surface
            .and_then(|s| s.pixel(x, y))
            .map(Color::premultiplied_le)
            .unwrap_or(backdrop);
        pixel.copy_from_slice(&bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_len_does_not_overflow_u32() {
        assert_eq!(buffer_len(800, 600), 1_920_000);
        assert_eq!(buffer_len(70_000, 70_000), 19_600_000_000);
    }

    #[test]
    fn present_uses_backdrop_until_something_is_drawn() {
        let mut buffer = vec![0u8; 4 * 4 * 4];
        present_surface(&mut buffer, 4, 4, None, Color(0xFF10_2030));
        assert!(buffer.chunks_exact(4).all(|p| p == [0x30, 0x20, 0x10, 0xFF]));
    }

    #[test]
    fn present_copies_overlap_of_smaller_surface() {
        let mut surface = Surface::new(2, 2);
        surface.canvas().fill(Color(0xFFFF_0000));

        let mut buffer = vec![0u8; 3 * 3 * 4];
        present_surface(&mut buffer, 3, 3, Some(&surface), Color(0xFF00_00FF));

        assert_eq!(&buffer[0..4], &[0x00, 0x00, 0xFF, 0xFF]);
        // (2, 0) lies outside the surface
        assert_eq!(&buffer[8..12], &[0xFF, 0x00, 0x00, 0xFF]);
        // (1, 1)
        assert_eq!(&buffer[16..20], &[0x00, 0x00, 0xFF, 0xFF]);
    }
}

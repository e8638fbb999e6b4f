// filepath: src/pointer.rs
//! Pointer (mouse) event handling for simple-canvas

use crate::app::AppData;
use log::{debug, info, warn};
use smithay_client_toolkit::seat::pointer::{PointerEvent, PointerEventKind};

/// Linux input event code for the primary mouse button
const BTN_LEFT: u32 = 0x110;

pub fn handle_pointer_events(events: &[PointerEvent], app: &mut AppData) {
    debug!("handle_pointer_events: {} events", events.len());
    for event in events {
        match event.kind {
            PointerEventKind::Enter { .. } => {
                debug!(
                    "Pointer entered canvas at ({:.2}, {:.2})",
                    event.position.0, event.position.1
                );
            }
            PointerEventKind::Leave { .. } => {
                debug!("Pointer left canvas");
            }
            PointerEventKind::Press { button, .. } if button == BTN_LEFT => {
                info!(
                    "Tap at ({:.2}, {:.2})",
                    event.position.0, event.position.1
                );
                if let Err(e) = app.tap() {
                    warn!("Failed to present after tap: {e}");
                }
            }
            _ => {}
        }
    }
}

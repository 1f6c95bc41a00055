//! Backdrop shown behind a dialog
//!
//! An overlay dims everything behind its dialog and, when closable, dismisses
//! the dialog on a click outside of it.

use super::emitter::{Emits, Emitter};
use tracing::debug;

/// Overlay construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Whether a click on the backdrop (or Esc) dismisses the dialog
    pub closable: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self { closable: true }
    }
}

impl OverlayOptions {
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }
}

/// Events emitted by an overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    Show,
    Hide,
    /// The user dismissed the overlay by clicking it
    Dismiss,
}

#[derive(Debug, Default)]
pub struct Overlay {
    closable: bool,
    visible: bool,
    emitter: Emitter<OverlayEvent>,
}

impl Overlay {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            closable: options.closable,
            visible: false,
            emitter: Emitter::new(),
        }
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        if !self.visible {
            self.visible = true;
            self.emitter.emit(&OverlayEvent::Show);
        }
    }

    pub fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            self.emitter.emit(&OverlayEvent::Hide);
        }
    }

    /// Handle a click on the backdrop. Returns true if it dismissed.
    pub fn click(&mut self) -> bool {
        if !self.visible || !self.closable {
            debug!("overlay click ignored");
            return false;
        }
        self.emitter.emit(&OverlayEvent::Dismiss);
        true
    }
}

impl Emits<OverlayEvent> for Overlay {
    fn emitter(&mut self) -> &mut Emitter<OverlayEvent> {
        &mut self.emitter
    }
}

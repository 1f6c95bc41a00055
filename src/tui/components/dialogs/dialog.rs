//! The dialog component
//!
//! A `Dialog` wraps one element built from the dialog template and drives its
//! lifecycle: render → configure → show → hide → remove. Hiding may be
//! deferred (explicit delay, or a transition effect) through per-dialog
//! [`Timers`] which the owner fires with [`Dialog::run_due`].

use super::{
    element::{dialog_template, Element, Presentation, HIDE_CLASS},
    emitter::{Emits, Emitter},
    overlay::{Overlay, OverlayEvent, OverlayOptions},
    timers::{Deferred, Timers},
    types::*,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

pub const CLOSABLE_CLASS: &str = "closable";
pub const MODAL_CLASS: &str = "modal";

#[derive(Debug)]
pub struct Dialog {
    id: DialogId,
    element: Element,
    effect: Option<String>,
    modal: bool,
    overlay: Option<Overlay>,
    overlay_events: Option<mpsc::UnboundedReceiver<OverlayEvent>>,
    hiding: bool,
    removed: bool,
    escapable: bool,
    /// Escape handling installed by `show`, dropped by `hide`
    escape_armed: bool,
    hide_transition: Duration,
    emitter: Emitter<DialogEvent>,
    timers: Timers,
    /// Due time of the timer currently firing, used as "now" for rescheduling
    firing_at: Option<Instant>,
}

impl Dialog {
    /// Build and render a dialog
    pub fn new(id: impl Into<DialogId>, options: DialogOptions) -> Self {
        let mut dialog = Self {
            id: id.into(),
            element: dialog_template(),
            effect: None,
            modal: false,
            overlay: None,
            overlay_events: None,
            hiding: false,
            removed: false,
            escapable: true,
            escape_armed: false,
            hide_transition: HIDE_TRANSITION,
            emitter: Emitter::new(),
            timers: Timers::new(),
            firing_at: None,
        };
        dialog.render(options);
        debug!(dialog_id = %dialog.id, "dialog created");
        dialog
    }

    fn render(&mut self, options: DialogOptions) {
        let is_title = |el: &Element| el.has_class("title");
        match options.title.filter(|title| !title.is_empty()) {
            Some(title) => {
                if let Some(title_el) = self.element.find_mut(&is_title) {
                    title_el.set_text(title);
                }
            }
            None => {
                self.element.remove_where(&is_title);
            }
        }

        let is_paragraph = |el: &Element| el.tag() == "p";
        match options.message {
            Some(Message::Text(text)) => {
                if let Some(p) = self.element.find_mut(&is_paragraph) {
                    p.set_text(text);
                }
            }
            Some(Message::Element(element)) => {
                self.element.replace_where(&is_paragraph, element);
            }
            None => {}
        }
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Title text, `None` when the title region was omitted
    pub fn title(&self) -> Option<&str> {
        self.element
            .query_class("title")
            .map(|el| el.text().unwrap_or_default())
    }

    /// Text of the body region
    pub fn body_text(&self) -> String {
        self.element
            .query_class("body")
            .map(Element::text_content)
            .unwrap_or_default()
    }

    pub fn effect_name(&self) -> Option<&str> {
        self.effect.as_deref()
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub fn is_closable(&self) -> bool {
        self.element.has_class(CLOSABLE_CLASS)
    }

    pub fn is_hiding(&self) -> bool {
        self.hiding
    }

    pub fn is_escapable(&self) -> bool {
        self.escapable
    }

    pub fn is_attached(&self) -> bool {
        self.element.is_attached()
    }

    pub fn presentation(&self) -> Option<Presentation> {
        self.element.presentation()
    }

    pub fn overlay_handle(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Removed (or abandoned while hiding) with nothing left to fire
    pub fn is_spent(&self) -> bool {
        (self.removed || self.hiding) && !self.is_attached() && self.timers.is_empty()
    }

    /// Override how long an effect runs before the dialog is detached
    pub fn set_hide_transition(&mut self, duration: Duration) {
        self.hide_transition = duration;
    }

    /// Show the close affordance
    pub fn closable(&mut self) -> &mut Self {
        self.add_class(CLOSABLE_CLASS)
    }

    pub fn add_class(&mut self, name: impl Into<String>) -> &mut Self {
        self.element.add_class(name);
        self
    }

    /// Use a named transition effect. Call before `show`.
    pub fn effect(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.element.add_class(name.clone());
        self.effect = Some(name);
        self
    }

    /// Request exclusive presentation when shown
    pub fn modal(&mut self) -> &mut Self {
        self.modal = true;
        self
    }

    /// Attach a backdrop. A dismiss on the backdrop hides the dialog.
    pub fn overlay(&mut self, options: OverlayOptions) -> &mut Self {
        let mut overlay = Overlay::new(options);
        self.overlay_events = Some(overlay.subscribe());
        self.overlay = Some(overlay);
        self
    }

    /// Allow or prevent dismissal through Esc / the cancel gesture
    pub fn escapable(&mut self, enabled: bool) -> &mut Self {
        self.escapable = enabled;
        self
    }

    fn now(&self) -> Instant {
        self.firing_at.unwrap_or_else(Instant::now)
    }

    /// Attach and present the dialog. Emits [`DialogEvent::Show`].
    pub fn show(&mut self) -> &mut Self {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.show();
            self.element.add_class(MODAL_CLASS);
        }
        self.escape_armed = self
            .overlay
            .as_ref()
            .map_or(true, Overlay::is_closable);

        self.element.attach();
        if self.modal {
            self.element.show_modal();
        } else {
            self.element.show();
        }

        // The hidden marker must survive at least one tick so the opening
        // transition has a start state.
        let now = self.now();
        self.timers.schedule(now, Duration::ZERO, Deferred::Reveal);

        info!(dialog_id = %self.id, modal = self.modal, "dialog shown");
        self.emitter.emit(&DialogEvent::Show);
        self
    }

    /// Begin dismissal now
    pub fn hide(&mut self) -> &mut Self {
        self.hiding = true;
        self.escape_armed = false;
        self.detach_overlay();

        if self.effect.is_some() {
            self.element.add_class(HIDE_CLASS);
            let now = self.now();
            self.timers
                .schedule(now, self.hide_transition, Deferred::Remove);
            debug!(dialog_id = %self.id, "dialog hiding with transition");
        } else if self.element.close(None) {
            self.handle_signal(Signal::Close);
        } else {
            self.remove();
        }
        self
    }

    /// Hide after `delay`. A zero delay hides immediately. Does not mark the
    /// dialog as hiding until the timer fires.
    pub fn hide_after(&mut self, delay: Duration) -> &mut Self {
        if delay.is_zero() {
            return self.hide();
        }
        let now = self.now();
        self.timers.schedule(now, delay, Deferred::Hide);
        debug!(dialog_id = %self.id, delay_ms = delay.as_millis() as u64, "dialog hide scheduled");
        self
    }

    /// Close natively with a return value carried by the hide event
    pub fn close_with(&mut self, return_value: &str) -> &mut Self {
        self.hiding = true;
        self.escape_armed = false;
        self.detach_overlay();
        if self.element.close(Some(return_value)) {
            self.handle_signal(Signal::Close);
        }
        self
    }

    /// Detach from the document. Emits [`DialogEvent::Hide`] once.
    pub fn remove(&mut self) -> &mut Self {
        if !self.element.is_attached() {
            return self;
        }
        let return_value = Some(self.element.return_value())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        self.emitter.emit(&DialogEvent::Hide { return_value });
        self.element.close(None);
        self.element.detach();
        self.removed = true;
        info!(dialog_id = %self.id, "dialog removed");
        self
    }

    /// React to a signal raised by the surface. Returns false when the
    /// signal's default action was prevented.
    pub fn handle_signal(&mut self, signal: Signal) -> bool {
        match signal {
            Signal::Cancel => {
                if self.escapable && self.escape_armed {
                    self.hide();
                    true
                } else {
                    debug!(dialog_id = %self.id, "cancel prevented");
                    false
                }
            }
            Signal::Close => {
                self.remove();
                true
            }
            Signal::CloseControl => {
                self.hide();
                true
            }
        }
    }

    fn detach_overlay(&mut self) {
        self.overlay_events = None;
        if let Some(mut overlay) = self.overlay.take() {
            overlay.hide();
        }
    }

    /// Forward a click on the backdrop. Returns true when it dismissed.
    pub fn click_overlay(&mut self) -> bool {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.click();
        }
        self.handle_overlay_events()
    }

    /// Hide if the backdrop asked to be dismissed since the last call
    fn handle_overlay_events(&mut self) -> bool {
        let dismissed = self.overlay_events.as_mut().map_or(false, |events| {
            std::iter::from_fn(|| events.try_recv().ok())
                .fold(false, |seen, event| seen || event == OverlayEvent::Dismiss)
        });
        if dismissed {
            debug!(dialog_id = %self.id, "dismissed via overlay");
            self.hide();
        }
        dismissed
    }

    /// Fire every deferred action due at or before `now`, after acting on
    /// backdrop events
    pub fn run_due(&mut self, now: Instant) {
        self.handle_overlay_events();
        while let Some((due, action)) = self.timers.pop_due(now) {
            self.firing_at = Some(due);
            match action {
                Deferred::Hide => {
                    self.hide();
                }
                Deferred::Reveal => {
                    if !self.hiding {
                        self.element.remove_class(HIDE_CLASS);
                    }
                }
                Deferred::Remove => {
                    self.remove();
                }
            }
        }
        self.firing_at = None;
    }

    /// Earliest pending deferred action
    pub fn next_due(&self) -> Option<Instant> {
        self.timers.next_due()
    }
}

impl Emits<DialogEvent> for Dialog {
    fn emitter(&mut self) -> &mut Emitter<DialogEvent> {
        &mut self.emitter
    }
}

//! Dialog manager owning every live dialog
//!
//! The dialog manager is responsible for:
//! - Tracking the single active dialog and hiding the previous one on create
//! - Applying the default transition effect to new dialogs
//! - Firing deferred dialog timers on each tick and dropping spent dialogs
//! - Routing Esc and mouse clicks to the right dialog
//! - Rendering attached dialogs in creation order

use super::{
    dialog::Dialog,
    element::Presentation,
    emitter::Emits,
    layer::DialogLayout,
    types::*,
    view::DialogView,
};
use crate::config::Config;
use crate::tui::{components::Component, events::Event, Frame};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

pub struct DialogManager {
    /// Live dialogs in creation order (last = topmost)
    dialogs: Vec<Dialog>,

    /// The dialog considered in the foreground
    active: Option<DialogId>,

    /// Effect applied to every new dialog
    default_effect: Option<String>,

    /// Transition duration handed to new dialogs
    hide_transition: Duration,

    /// Layouts from the last render, for mouse routing
    layouts: HashMap<DialogId, DialogLayout>,

    /// Event sender for dialog lifecycle events
    event_sender: Option<mpsc::UnboundedSender<Event>>,

    next_id: u64,
}

impl DialogManager {
    /// Create a new dialog manager
    pub fn new() -> Self {
        Self {
            dialogs: Vec::new(),
            active: None,
            default_effect: None,
            hide_transition: HIDE_TRANSITION,
            layouts: HashMap::new(),
            event_sender: None,
            next_id: 0,
        }
    }

    /// Create a manager using the configured defaults
    pub fn from_config(config: &Config) -> Self {
        let mut manager = Self::new();
        manager.set_default_effect(config.default_effect.clone());
        manager.set_hide_transition(Duration::from_millis(config.hide_transition_ms));
        manager
    }

    /// Set the event sender for dialog events. Dialogs that already exist
    /// start forwarding too.
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<Event>) {
        for dialog in &mut self.dialogs {
            forward_events(dialog, sender.clone());
        }
        self.event_sender = Some(sender);
    }

    /// Effect applied to dialogs created from now on
    pub fn set_default_effect(&mut self, effect: Option<String>) {
        self.default_effect = effect.filter(|name| !name.is_empty());
    }

    pub fn default_effect(&self) -> Option<&str> {
        self.default_effect.as_deref()
    }

    pub fn set_hide_transition(&mut self, duration: Duration) {
        self.hide_transition = duration;
    }

    /// Create and render a dialog. It becomes the active dialog; the
    /// previous active dialog is hidden unless it is already hiding.
    pub fn create(&mut self, options: DialogOptions) -> DialogId {
        self.next_id += 1;
        let id = DialogId::new(format!("dialog-{}", self.next_id));

        let mut dialog = Dialog::new(id.clone(), options);
        dialog.set_hide_transition(self.hide_transition);

        if let Some(previous) = self.active_mut() {
            if !previous.is_hiding() {
                debug!(dialog_id = %previous.id(), "hiding previous active dialog");
                previous.hide();
            }
        }

        if let Some(effect) = &self.default_effect {
            dialog.effect(effect.clone());
        }

        if let Some(sender) = &self.event_sender {
            forward_events(&mut dialog, sender.clone());
        }

        self.dialogs.push(dialog);
        self.active = Some(id.clone());
        info!(dialog_id = %id, "dialog active");
        id
    }

    /// Create a dialog with only a message
    pub fn message(&mut self, message: impl Into<Message>) -> DialogId {
        self.create(DialogOptions::new().with_message(message))
    }

    /// Create a dialog with a title and a message
    pub fn titled(&mut self, title: impl Into<String>, message: impl Into<Message>) -> DialogId {
        self.create(DialogOptions::new().with_title(title).with_message(message))
    }

    /// Positional entry point: `[message]` or `[title, message]`. Nothing is
    /// created for an empty argument list.
    pub fn from_args(&mut self, args: &[String]) -> Option<DialogId> {
        match args {
            [] => None,
            [message] => Some(self.message(message.as_str())),
            [title, message, ..] => Some(self.titled(title.as_str(), message.as_str())),
        }
    }

    pub fn get(&self, id: &DialogId) -> Option<&Dialog> {
        self.dialogs.iter().find(|dialog| dialog.id() == id)
    }

    pub fn get_mut(&mut self, id: &DialogId) -> Option<&mut Dialog> {
        self.dialogs.iter_mut().find(|dialog| dialog.id() == id)
    }

    /// Like [`DialogManager::get_mut`] but reports a missing dialog as an error
    pub fn dialog_mut(&mut self, id: &DialogId) -> DialogResult<&mut Dialog> {
        self.get_mut(id)
            .ok_or_else(|| DialogError::NotFound(id.clone()))
    }

    pub fn active_id(&self) -> Option<&DialogId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&Dialog> {
        let id = self.active.as_ref()?;
        self.get(id)
    }

    pub fn active_mut(&mut self) -> Option<&mut Dialog> {
        let id = self.active.clone()?;
        self.get_mut(&id)
    }

    /// Number of dialogs still tracked, attached or not
    pub fn dialog_count(&self) -> usize {
        self.dialogs.len()
    }

    /// Check if any dialog is on screen
    pub fn has_attached(&self) -> bool {
        self.dialogs.iter().any(Dialog::is_attached)
    }

    /// Nothing attached and no timers pending
    pub fn is_idle(&self) -> bool {
        self.dialogs
            .iter()
            .all(|dialog| !dialog.is_attached() && dialog.pending_timers() == 0)
    }

    /// Earliest deferred action across all dialogs
    pub fn next_due(&self) -> Option<Instant> {
        self.dialogs.iter().filter_map(Dialog::next_due).min()
    }

    /// Fire due timers and drop dialogs that are done
    pub fn tick_at(&mut self, now: Instant) {
        for dialog in &mut self.dialogs {
            dialog.run_due(now);
        }

        let before = self.dialogs.len();
        self.dialogs.retain(|dialog| !dialog.is_spent());
        if self.dialogs.len() != before {
            let live: Vec<DialogId> = self.dialogs.iter().map(|d| d.id().clone()).collect();
            self.layouts.retain(|id, _| live.contains(id));
            if self.active.as_ref().map_or(false, |id| !live.contains(id)) {
                self.active = None;
            }
            debug!(dropped = before - self.dialogs.len(), "spent dialogs dropped");
        }
    }

    /// Whether anything attached wants the rest of the screen dimmed
    fn wants_backdrop(&self) -> bool {
        self.dialogs.iter().filter(|d| d.is_attached()).any(|dialog| {
            dialog.presentation() == Some(Presentation::Modal)
                || dialog.overlay_handle().map_or(false, |o| o.is_visible())
        })
    }

    /// Draw attached dialogs into a buffer
    pub fn render_to_buffer(&mut self, area: Rect, buf: &mut Buffer) {
        if self.wants_backdrop() {
            buf.set_style(area, Style::default().add_modifier(Modifier::DIM));
        }

        self.layouts.clear();
        for dialog in self.dialogs.iter().filter(|d| d.is_attached()) {
            let layout = DialogView::measure(dialog, area);
            DialogView::new(dialog, layout).render(area, buf);
            self.layouts.insert(dialog.id().clone(), layout);
        }
    }

    /// Layout of a dialog from the last render
    pub fn layout(&self, id: &DialogId) -> Option<&DialogLayout> {
        self.layouts.get(id)
    }
}

fn forward_events(dialog: &mut Dialog, sender: mpsc::UnboundedSender<Event>) {
    let dialog_id = dialog.id().clone();
    dialog.on_while(move |event: &DialogEvent| {
        sender
            .send(Event::Dialog(dialog_id.clone(), event.clone()))
            .is_ok()
    });
}

impl Component for DialogManager {
    fn handle_key_event(&mut self, event: KeyEvent) -> Result<bool> {
        if event.code != KeyCode::Esc || !event.modifiers.is_empty() {
            return Ok(false);
        }
        match self.active_mut() {
            Some(dialog) if dialog.is_attached() => {
                dialog.handle_signal(Signal::Cancel);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<bool> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(false);
        }

        // Only the topmost attached dialog takes clicks
        let Some(index) = self.dialogs.iter().rposition(Dialog::is_attached) else {
            return Ok(false);
        };
        let Some(layout) = self.layouts.get(self.dialogs[index].id()).copied() else {
            return Ok(false);
        };

        let dialog = &mut self.dialogs[index];
        if layout.contains_point(event.column, event.row) {
            if dialog.is_closable() && layout.is_on_close(event.column, event.row) {
                dialog.handle_signal(Signal::CloseControl);
            }
            return Ok(true);
        }
        Ok(dialog.click_overlay())
    }

    fn tick(&mut self) -> Result<()> {
        self.tick_at(Instant::now());
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.render_to_buffer(area, frame.buffer_mut());
    }
}

impl Default for DialogManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::overlay::OverlayOptions;
    use crossterm::event::KeyModifiers;

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_create_sets_active() {
        let mut manager = DialogManager::new();
        let first = manager.message("one");
        assert_eq!(manager.active_id(), Some(&first));
        let second = manager.titled("Two", "two");
        assert_eq!(manager.active_id(), Some(&second));
        assert_eq!(manager.active().unwrap().title(), Some("Two"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_dialog_hides_previous() {
        let mut manager = DialogManager::new();
        let first = manager.message("one");
        manager.get_mut(&first).unwrap().show();
        let mut rx = manager.get_mut(&first).unwrap().subscribe();

        manager.message("two");

        let first_dialog = manager.get(&first).unwrap();
        assert!(first_dialog.is_hiding());
        assert!(!first_dialog.is_attached());
        assert_eq!(
            rx.try_recv().unwrap(),
            DialogEvent::Hide { return_value: None }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hiding_previous_is_not_hidden_again() {
        let mut manager = DialogManager::new();
        let first = manager.message("one");
        {
            let dialog = manager.get_mut(&first).unwrap();
            dialog.effect("fade").show();
            dialog.hide();
            assert_eq!(dialog.pending_timers(), 2);
        }

        manager.message("two");

        // A second hide would have scheduled another removal
        assert_eq!(manager.get(&first).unwrap().pending_timers(), 2);
    }

    #[test]
    fn test_default_effect_applied() {
        let mut manager = DialogManager::new();
        manager.set_default_effect(Some("slide".to_string()));
        let id = manager.message("hello");
        let dialog = manager.get(&id).unwrap();
        assert_eq!(dialog.effect_name(), Some("slide"));
        assert!(dialog.element().has_class("slide"));

        manager.set_default_effect(None);
        let id = manager.message("plain");
        assert_eq!(manager.get(&id).unwrap().effect_name(), None);
    }

    #[test]
    fn test_from_args() {
        let mut manager = DialogManager::new();
        assert!(manager.from_args(&[]).is_none());
        assert_eq!(manager.dialog_count(), 0);

        let id = manager.from_args(&["only message".to_string()]).unwrap();
        let dialog = manager.get(&id).unwrap();
        assert_eq!(dialog.title(), None);
        assert_eq!(dialog.body_text(), "only message");

        let id = manager
            .from_args(&["Title".to_string(), "Body".to_string()])
            .unwrap();
        let dialog = manager.get(&id).unwrap();
        assert_eq!(dialog.title(), Some("Title"));
        assert_eq!(dialog.body_text(), "Body");
    }

    #[test]
    fn test_dialog_mut_not_found() {
        let mut manager = DialogManager::new();
        let err = manager.dialog_mut(&DialogId::from("missing")).unwrap_err();
        assert!(matches!(err, DialogError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_routes_to_active() {
        let mut manager = DialogManager::new();
        let id = manager.message("hello");
        manager.get_mut(&id).unwrap().show();

        assert!(manager.handle_key_event(esc()).unwrap());
        assert!(!manager.get(&id).unwrap().is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_prevented() {
        let mut manager = DialogManager::new();
        let id = manager.message("hello");
        manager.get_mut(&id).unwrap().escapable(false).show();

        manager.handle_key_event(esc()).unwrap();
        assert!(manager.get(&id).unwrap().is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_runs_timers_and_sweeps() {
        let mut manager = DialogManager::new();
        let id = manager.message("hello");
        manager
            .get_mut(&id)
            .unwrap()
            .show()
            .hide_after(Duration::from_millis(200));

        manager.tick().unwrap();
        assert!(manager.get(&id).unwrap().is_attached());

        tokio::time::advance(Duration::from_millis(200)).await;
        manager.tick().unwrap();
        assert!(manager.get(&id).is_none());
        assert!(manager.active_id().is_none());
        assert!(manager.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_transition() {
        let mut manager = DialogManager::new();
        manager.set_default_effect(Some("fade".to_string()));
        manager.set_hide_transition(Duration::from_millis(100));
        let id = manager.message("hello");
        manager.get_mut(&id).unwrap().show().hide();

        tokio::time::advance(Duration::from_millis(100)).await;
        manager.tick().unwrap();
        assert!(!manager.has_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut manager = DialogManager::new();
        manager.set_event_sender(tx);
        let id = manager.message("hello");
        manager.get_mut(&id).unwrap().show();

        match rx.try_recv().unwrap() {
            Event::Dialog(event_id, DialogEvent::Show) => assert_eq!(event_id, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_sender_covers_existing_dialogs() {
        let mut manager = DialogManager::new();
        let id = manager.message("hello");
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.set_event_sender(tx);
        manager.get_mut(&id).unwrap().show();

        assert!(matches!(rx.try_recv().unwrap(), Event::Dialog(_, DialogEvent::Show)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_event_channel_drops_forwarder() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut manager = DialogManager::new();
        manager.set_event_sender(tx);
        let id = manager.message("hello");
        drop(rx);

        let dialog = manager.get_mut(&id).unwrap();
        assert_eq!(dialog.emitter().listener_count(), 1);
        dialog.show();
        assert_eq!(dialog.emitter().listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mouse_close_affordance_and_overlay() {
        let area = Rect::new(0, 0, 80, 24);
        let mut manager = DialogManager::new();
        let id = manager.message("hello");
        manager
            .get_mut(&id)
            .unwrap()
            .closable()
            .overlay(OverlayOptions::default())
            .show();

        let mut buf = Buffer::empty(area);
        manager.render_to_buffer(area, &mut buf);
        let layout = *manager.layout(&id).unwrap();

        // Inside the box but not on the affordance: swallowed
        let inside = layout.content_area;
        assert!(manager.handle_mouse_event(click(inside.x, inside.y)).unwrap());
        assert!(manager.get(&id).unwrap().is_attached());

        // Outside: the overlay dismisses
        assert!(manager.handle_mouse_event(click(0, 0)).unwrap());
        assert!(!manager.get(&id).unwrap().is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mouse_close_affordance() {
        let area = Rect::new(0, 0, 80, 24);
        let mut manager = DialogManager::new();
        let id = manager.message("hello");
        manager.get_mut(&id).unwrap().closable().show();

        let mut buf = Buffer::empty(area);
        manager.render_to_buffer(area, &mut buf);
        let close = manager.layout(&id).unwrap().close_area;

        manager.handle_mouse_event(click(close.x, close.y)).unwrap();
        assert!(manager.get(&id).unwrap().is_hiding());
        assert!(!manager.get(&id).unwrap().is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_modal_dims_backdrop() {
        let area = Rect::new(0, 0, 40, 10);
        let mut manager = DialogManager::new();
        let id = manager.message("hi");
        manager.get_mut(&id).unwrap().modal().show();

        let mut buf = Buffer::empty(area);
        manager.render_to_buffer(area, &mut buf);
        assert!(buf.get(0, 0).modifier.contains(Modifier::DIM));
    }
}

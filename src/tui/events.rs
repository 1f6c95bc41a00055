use crate::tui::components::dialogs::{DialogEvent, DialogId};
use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Lifecycle event emitted by a dialog
    Dialog(DialogId, DialogEvent),
}

/// Event handler for managing input events
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,

    /// Tick interval for periodic events
    tick_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            tick_interval,
        }
    }

    /// Get the next event. Input is polled until the tick interval or
    /// `deadline` elapses, whichever comes first.
    pub async fn next(&mut self, deadline: Option<Instant>) -> Result<Event> {
        // Internal events first so dialog lifecycle is seen before new input
        if let Ok(event) = self.receiver.try_recv() {
            return Ok(event);
        }

        let tick = Self::poll_timeout(self.tick_interval, deadline, Instant::now());
        let polled = tokio::task::spawn_blocking(move || -> std::io::Result<Option<CrosstermEvent>> {
            if crossterm::event::poll(tick)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await??;

        Ok(polled
            .and_then(Self::convert_crossterm_event)
            .unwrap_or(Event::Tick))
    }

    fn poll_timeout(tick: Duration, deadline: Option<Instant>, now: Instant) -> Duration {
        deadline.map_or(tick, |due| tick.min(due.saturating_duration_since(now)))
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key_event) => Some(Event::Key(key_event)),
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => None,
        }
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[tokio::test]
    async fn test_internal_events_come_first() {
        let mut handler = EventHandler::new(Duration::from_millis(10));
        handler
            .sender()
            .send(Event::Dialog(DialogId::from("d"), DialogEvent::Show))
            .unwrap();

        match handler.next(None).await.unwrap() {
            Event::Dialog(id, DialogEvent::Show) => assert_eq!(id.as_str(), "d"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_poll_timeout_honours_deadline() {
        let tick = Duration::from_millis(50);
        let now = Instant::now();

        assert_eq!(EventHandler::poll_timeout(tick, None, now), tick);
        assert_eq!(
            EventHandler::poll_timeout(tick, Some(now + Duration::from_millis(20)), now),
            Duration::from_millis(20)
        );
        assert_eq!(
            EventHandler::poll_timeout(tick, Some(now + Duration::from_secs(5)), now),
            tick
        );
        assert_eq!(
            EventHandler::poll_timeout(tick, Some(now - Duration::from_millis(1)), now),
            Duration::ZERO
        );
    }

    #[test]
    fn test_convert_crossterm_event() {
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(
            EventHandler::convert_crossterm_event(CrosstermEvent::Key(key)),
            Some(Event::Key(_))
        ));
        assert!(EventHandler::convert_crossterm_event(CrosstermEvent::FocusLost).is_none());
        assert!(matches!(
            EventHandler::convert_crossterm_event(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        ));
    }
}

use crate::tui::{
    components::{dialogs::DialogManager, Component},
    events::Event,
    Frame,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::{debug, info};

const HELP: &str = "Esc dismiss  •  click [x] or outside to close  •  q quit";

/// Demo application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Current application dimensions
    pub size: Rect,

    /// Dialogs shown by the application
    pub dialogs: DialogManager,

    /// Last lifecycle event, shown in the status line
    pub status_message: Option<String>,
}

impl App {
    pub fn new(dialogs: DialogManager) -> Self {
        Self {
            should_quit: false,
            size: Rect::default(),
            dialogs,
            status_message: None,
        }
    }

    /// Handle an event. Returns true when the application should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        // Deferred dialog work must not wait for an idle poll
        self.dialogs.tick()?;

        match event {
            Event::Key(key) => {
                if self.dialogs.handle_key_event(key)? {
                    return Ok(self.should_quit);
                }
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);
                if key.code == KeyCode::Char('q') || ctrl_c {
                    info!("Quit requested");
                    self.should_quit = true;
                }
            }
            Event::Mouse(mouse) => {
                self.dialogs.handle_mouse_event(mouse)?;
            }
            Event::Resize(width, height) => {
                self.size = Rect::new(0, 0, width, height);
            }
            Event::Tick => {}
            Event::Dialog(id, event) => {
                debug!(dialog_id = %id, ?event, "dialog event");
                self.status_message = Some(format!("{}: {:?}", id, event));
            }
        }

        if self.dialogs.is_idle() {
            debug!("No dialog left, exiting");
            self.should_quit = true;
        }
        Ok(self.should_quit)
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        self.size = area;

        let status = self.status_message.as_deref().unwrap_or(HELP);
        let background = Paragraph::new(status)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(" dialogkit "));
        frame.render_widget(background, area);

        self.dialogs.render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
    use std::time::Duration;
    use ratatui::{backend::TestBackend, Terminal};

    #[tokio::test(start_paused = true)]
    async fn test_exits_once_dialog_is_gone() {
        let mut manager = DialogManager::new();
        let id = manager.message("bye");
        manager.get_mut(&id).unwrap().show();
        let mut app = App::new(manager);

        assert!(!app.handle_event(Event::Tick).unwrap());
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.handle_event(Event::Key(esc)).unwrap());
        assert!(app.handle_event(Event::Tick).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_under_continuous_input() {
        let mut manager = DialogManager::new();
        let id = manager.message("moving mouse");
        manager
            .get_mut(&id)
            .unwrap()
            .show()
            .hide_after(Duration::from_millis(200));
        let mut app = App::new(manager);

        tokio::time::advance(Duration::from_millis(1000)).await;
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        let mut quit = false;
        for _ in 0..50 {
            quit = app.handle_event(Event::Mouse(moved)).unwrap();
        }

        assert!(app.dialogs.get(&id).map_or(true, |d| !d.is_attached()));
        assert!(quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_q_quits() {
        let mut manager = DialogManager::new();
        let id = manager.message("stay");
        manager.get_mut(&id).unwrap().escapable(false).show();
        let mut app = App::new(manager);

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.handle_event(Event::Key(q)).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_draws_dialog() {
        let mut manager = DialogManager::new();
        let id = manager.titled("Title", "Body text");
        manager.get_mut(&id).unwrap().show();
        let mut app = App::new(manager);

        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Title"));
        assert!(text.contains("Body text"));
    }
}

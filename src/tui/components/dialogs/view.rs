//! Terminal rendering of a dialog element

use super::{
    dialog::Dialog,
    element::HIDE_CLASS,
    layer::DialogLayout,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

const CLOSE_LABEL: &str = "[x]";

/// Widget drawing one dialog at a precomputed layout
pub struct DialogView<'a> {
    dialog: &'a Dialog,
    layout: DialogLayout,
}

impl<'a> DialogView<'a> {
    pub fn new(dialog: &'a Dialog, layout: DialogLayout) -> Self {
        Self { dialog, layout }
    }

    /// Size the dialog box for its content within `area`
    pub fn measure(dialog: &Dialog, area: Rect) -> DialogLayout {
        let body = dialog.body_text();
        let body_width = body.width().min(u16::MAX as usize) as u16;
        let title_width = dialog
            .title()
            .map_or(0, |title| title.width().min(u16::MAX as usize - 4) as u16 + 4);

        let max_inner = DialogLayout::max_box_width(area).saturating_sub(4).max(1);
        let lines = (body_width.saturating_add(max_inner - 1) / max_inner).max(1);

        DialogLayout::calculate(area, body_width.max(title_width), lines)
    }
}

impl Widget for DialogView<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let area = self.layout.dialog_area;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut style = Style::default().fg(Color::White);
        // Transition start/end state
        if self.dialog.element().has_class(HIDE_CLASS) {
            style = style.add_modifier(Modifier::DIM);
        }

        Clear.render(area, buf);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1))
            .style(style);
        if let Some(title) = self.dialog.title() {
            block = block.title(format!(" {} ", title));
        }

        Paragraph::new(self.dialog.body_text())
            .wrap(Wrap { trim: true })
            .style(style)
            .block(block)
            .render(area, buf);

        if self.dialog.is_closable() {
            let close = self.layout.close_area;
            buf.set_string(close.x, close.y, CLOSE_LABEL, style.add_modifier(Modifier::BOLD));
        }
    }
}

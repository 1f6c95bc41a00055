//! Dialog placement and hit-testing
//!
//! Dialogs are centered in the available area. The layout remembers where
//! the box and its close affordance ended up so mouse events can be routed.

use ratatui::layout::Rect;

const MAX_WIDTH: u16 = 80;
/// Border, padding and the title row
const CHROME_HEIGHT: u16 = 4;
/// Width of the `[x]` close affordance
const CLOSE_WIDTH: u16 = 3;

/// Layout of a single rendered dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogLayout {
    /// Full area available to the manager
    pub area: Rect,
    /// The dialog box itself
    pub dialog_area: Rect,
    /// Inside of the border
    pub content_area: Rect,
    /// Close affordance on the top border
    pub close_area: Rect,
}

impl DialogLayout {
    /// Widest box allowed in `area`: three quarters of it, capped
    pub fn max_box_width(area: Rect) -> u16 {
        ((u32::from(area.width) * 3 / 4) as u16).min(MAX_WIDTH)
    }

    /// Center a box sized for `body_width` x `body_lines` in `area`
    pub fn calculate(area: Rect, body_width: u16, body_lines: u16) -> Self {
        let max_width = Self::max_box_width(area).max(CLOSE_WIDTH + 4);
        let width = body_width.saturating_add(4).clamp(CLOSE_WIDTH + 4, max_width).min(area.width);
        let height = body_lines.saturating_add(CHROME_HEIGHT).min(area.height);

        let x = area.width.saturating_sub(width) / 2;
        let y = area.height.saturating_sub(height) / 2;

        let dialog_area = Rect {
            x: area.x + x,
            y: area.y + y,
            width,
            height,
        };
        let content_area = Rect {
            x: dialog_area.x + 2,
            y: dialog_area.y + 1,
            width: dialog_area.width.saturating_sub(4),
            height: dialog_area.height.saturating_sub(2),
        };
        let close_area = Rect {
            x: (dialog_area.x + dialog_area.width).saturating_sub(CLOSE_WIDTH + 1),
            y: dialog_area.y,
            width: CLOSE_WIDTH.min(dialog_area.width),
            height: dialog_area.height.min(1),
        };

        Self {
            area,
            dialog_area,
            content_area,
            close_area,
        }
    }

    /// Check if a point is within the dialog box
    pub fn contains_point(&self, x: u16, y: u16) -> bool {
        contains(&self.dialog_area, x, y)
    }

    /// Check if a point hits the close affordance
    pub fn is_on_close(&self, x: u16, y: u16) -> bool {
        contains(&self.close_area, x, y)
    }
}

fn contains(area: &Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

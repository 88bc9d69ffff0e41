//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: a title row, the deck, a caption strip and the
/// status bar.
pub struct AppLayout {
    pub title_area: Rect,
    pub deck_area: Rect,
    pub caption_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // view title
                Constraint::Min(6),    // deck (takes all remaining space)
                Constraint::Length(2), // caption
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            title_area: chunks[0],
            deck_area: chunks[1],
            caption_area: chunks[2],
            status_area: chunks[3],
        }
    }
}

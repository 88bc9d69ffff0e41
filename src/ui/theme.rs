//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── deck ───────────────────────────────────────────────────
    /// Background the cards are blended against.
    pub fn canvas() -> (u8, u8, u8) {
        (18, 18, 24)
    }

    pub fn card_border() -> (u8, u8, u8) {
        (200, 200, 210)
    }

    pub fn front_border() -> (u8, u8, u8) {
        (120, 190, 255)
    }

    /// Interior of a card whose image has not decoded yet.
    pub fn placeholder_fill() -> (u8, u8, u8) {
        (48, 50, 62)
    }

    pub fn liked() -> (u8, u8, u8) {
        (255, 80, 110)
    }

    pub fn unliked() -> (u8, u8, u8) {
        (120, 120, 130)
    }

    pub fn caption() -> (u8, u8, u8) {
        (235, 235, 240)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn canvas_style() -> Style {
        let (r, g, b) = Self::canvas();
        Style::default().bg(Color::Rgb(r, g, b))
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

//! Swipe-stack widget and the caption strip under it.
//!
//! Geometry (`card_size`, `card_box`) is pure and shared between rendering
//! and the mouse handler's hit-testing, so what you click is exactly what
//! was drawn.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::core::{
    pulse::pulse_envelope,
    stack::{StackFrame, SwipeStack},
    transform::CardTransform,
};

use super::paint::{blend, paint_card, paint_text, CardBox, CardPaint};
use super::theme::Theme;

/// Reference units per terminal column / row.  Drags are converted with the
/// same factors so pointer and card stay glued together.
pub const UNITS_PER_COL: f32 = 4.0;
pub const UNITS_PER_ROW: f32 = 8.0;

const HEART_ART: [&str; 4] = [" ▄▄ ▄▄ ", "███████", " ▀███▀ ", "   ▀   "];

/// Resting size of the front card in cells: portrait 3:4, cells twice as
/// tall as wide.
pub fn card_size(area: Rect) -> (u16, u16) {
    let w = ((area.width as f32) * 0.4).clamp(8.0, 40.0);
    let mut h = w * 4.0 / 3.0 / 2.0;
    let max_h = area.height.saturating_sub(2).max(4) as f32;
    let mut w = w;
    if h > max_h {
        w *= max_h / h;
        h = max_h;
    }
    (w.round() as u16, h.round() as u16)
}

/// Where a card with transform `t` lands inside `area`.
pub fn card_box(area: Rect, t: &CardTransform) -> CardBox {
    let (w, h) = card_size(area);
    let cx = area.x as f32 + area.width as f32 / 2.0 + t.x / UNITS_PER_COL;
    let cy = area.y as f32 + area.height as f32 / 2.0 + t.y / UNITS_PER_ROW;
    let sw = ((w as f32) * t.scale).round().max(2.0) as u16;
    let sh = ((h as f32) * t.scale).round().max(2.0) as u16;
    CardBox::centered(cx, cy, sw, sh)
}

/// Convert a pointer displacement in cells to reference units.
pub fn cells_to_units(dcol: i32, drow: i32) -> (f32, f32) {
    (dcol as f32 * UNITS_PER_COL, drow as f32 * UNITS_PER_ROW)
}

pub struct StackWidget<'a> {
    pub stack: &'a SwipeStack,
    pub frame: &'a StackFrame,
    pub images: &'a HashMap<PathBuf, Arc<image::RgbaImage>>,
}

impl Widget for StackWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::canvas_style());

        for card in &self.frame.cards {
            let Some(item) = self.stack.item(card.id) else {
                continue;
            };
            let t = &card.transform;
            let bx = card_box(area, t);
            let border = if card.interactive {
                Theme::front_border()
            } else {
                Theme::card_border()
            };
            paint_card(
                buf,
                area,
                bx,
                &CardPaint {
                    image: self.images.get(&item.image).map(Arc::as_ref),
                    fill: Theme::placeholder_fill(),
                    border,
                    opacity: t.opacity,
                    rotate_z: t.rotate_z,
                },
            );

            // Like indicator in the top-right corner of every visible card.
            if t.opacity > 0.5 && bx.w >= 6 {
                let (glyph, colour) = if card.liked {
                    ("♥", Theme::liked())
                } else {
                    ("♡", Theme::unliked())
                };
                let x = bx.x + bx.w as i32 - 3;
                paint_text(buf, area, x, bx.y, glyph, blend(colour, Theme::canvas(), t.opacity));
            }
        }

        if let Some((id, progress)) = self.frame.pulse {
            if let Some(card) = self.frame.cards.iter().find(|c| c.id == id) {
                render_pulse(area, card_box(area, &card.transform), progress, buf);
            }
        }
    }
}

/// Heart overlay popping over the liked card.
fn render_pulse(area: Rect, card: CardBox, progress: f32, buf: &mut Buffer) {
    let (scale, alpha) = pulse_envelope(progress);
    if alpha <= 0.02 {
        return;
    }
    let colour = blend(Theme::liked(), Theme::canvas(), alpha);
    let (cx, cy) = card.center();
    if scale < 0.6 {
        paint_text(buf, area, cx, cy, "♥", colour);
        return;
    }
    let art_w = HEART_ART[0].chars().count() as i32;
    let top = cy - HEART_ART.len() as i32 / 2;
    for (i, line) in HEART_ART.iter().enumerate() {
        let x = cx - art_w / 2;
        // Leave the card's own pixels visible through the art's gaps.
        for (j, ch) in line.chars().enumerate() {
            if ch != ' ' {
                paint_text(buf, area, x + j as i32, top + i as i32, &ch.to_string(), colour);
            }
        }
    }
}

/// Caption of the front card, fading in whenever the front changes.
pub struct StackCaption<'a> {
    pub stack: &'a SwipeStack,
    pub frame: &'a StackFrame,
}

impl Widget for StackCaption<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::canvas_style());
        let Some((id, opacity)) = self.frame.caption else {
            return;
        };
        let Some(item) = self.stack.item(id) else {
            return;
        };
        let mut text = item.label();
        if self.stack.liked().contains(id) {
            text.push_str("  ♥");
        }
        let rank_hint = format!(
            "{} liked · {} cards",
            self.stack.liked().len(),
            self.stack.order().len()
        );
        let colour = blend(Theme::caption(), Theme::canvas(), opacity);
        let x = area.x as i32 + (area.width as i32 - text.chars().count() as i32).max(0) / 2;
        paint_text(buf, area, x, area.y as i32, &text, colour);
        let x = area.x as i32 + (area.width as i32 - rank_hint.chars().count() as i32).max(0) / 2;
        paint_text(buf, area, x, area.y as i32 + 1, &rank_hint, Theme::unliked());
    }
}

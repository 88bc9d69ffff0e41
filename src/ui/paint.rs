//! Low-level card painter.
//!
//! Cards are drawn cell by cell with Unicode `▀` half-blocks (2 pixels per
//! cell) so an image, a border, an opacity and a small tilt can all be
//! applied in one pass.  Geometry uses signed coordinates because cards are
//! routinely dragged partly off screen; anything outside `clip` is dropped.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};

use super::theme::Theme;

/// On-screen box of a card, in cells.  May extend past the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardBox {
    pub x: i32,
    pub y: i32,
    pub w: u16,
    pub h: u16,
}

impl CardBox {
    /// Box of size `w`×`h` centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, w: u16, h: u16) -> Self {
        Self {
            x: (cx - w as f32 / 2.0).round() as i32,
            y: (cy - h as f32 / 2.0).round() as i32,
            w,
            h,
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        let (c, r) = (col as i32, row as i32);
        c >= self.x && c < self.x + self.w as i32 && r >= self.y && r < self.y + self.h as i32
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w as i32 / 2, self.y + self.h as i32 / 2)
    }
}

/// What goes inside a card box.
pub struct CardPaint<'a> {
    pub image: Option<&'a image::RgbaImage>,
    /// Interior colour when there is no image (yet).
    pub fill: (u8, u8, u8),
    pub border: (u8, u8, u8),
    /// 0 = invisible, 1 = opaque.
    pub opacity: f32,
    /// Tilt in degrees, drawn as a horizontal shear of the rows.
    pub rotate_z: f32,
}

/// Horizontal shift of `row` (0-based) in a box of `h` rows tilted by
/// `rotate_z` degrees.  Positive tilt leans the top to the right.  Terminal
/// cells are about twice as tall as wide, hence the factor 2.
pub fn shear_shift(row: u16, h: u16, rotate_z: f32) -> i32 {
    let from_mid = (h.saturating_sub(1)) as f32 / 2.0 - row as f32;
    (from_mid * rotate_z.to_radians().tan() * 2.0).round() as i32
}

/// Linear blend of `fg` over `bg`.
pub fn blend(fg: (u8, u8, u8), bg: (u8, u8, u8), alpha: f32) -> (u8, u8, u8) {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f as f32 * a + b as f32 * (1.0 - a)).round() as u8;
    (mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}

fn rgb(c: (u8, u8, u8)) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Paint one card.  Cells outside `clip` are skipped.
pub fn paint_card(buf: &mut Buffer, clip: Rect, card: CardBox, paint: &CardPaint<'_>) {
    if card.w < 2 || card.h < 2 || paint.opacity <= 0.01 {
        return;
    }
    let canvas = Theme::canvas();
    let border = blend(paint.border, canvas, paint.opacity);
    let inner_w = card.w - 2;
    let inner_h = card.h - 2;
    let sampler = paint
        .image
        .filter(|img| img.width() > 0 && img.height() > 0)
        .map(|img| CoverSampler::new(img, inner_w as u32, inner_h as u32 * 2));

    for row in 0..card.h {
        let shift = shear_shift(row, card.h, paint.rotate_z);
        let y = card.y + row as i32;
        for col in 0..card.w {
            let x = card.x + col as i32 + shift;
            let Some(cell) = cell_in(buf, clip, x, y) else {
                continue;
            };
            let edge_top = row == 0;
            let edge_bottom = row == card.h - 1;
            let edge_left = col == 0;
            let edge_right = col == card.w - 1;
            if edge_top || edge_bottom || edge_left || edge_right {
                let ch = match (edge_top, edge_bottom, edge_left, edge_right) {
                    (true, _, true, _) => '╭',
                    (true, _, _, true) => '╮',
                    (_, true, true, _) => '╰',
                    (_, true, _, true) => '╯',
                    (true, _, _, _) | (_, true, _, _) => '─',
                    _ => '│',
                };
                cell.set_char(ch).set_fg(rgb(border)).set_bg(rgb(canvas));
                continue;
            }

            let (ix, iy) = ((col - 1) as u32, (row - 1) as u32 * 2);
            let (top, bottom) = match &sampler {
                Some(s) => (s.sample(ix, iy), s.sample(ix, iy + 1)),
                None => (paint.fill, paint.fill),
            };
            cell.set_char('▀')
                .set_fg(rgb(blend(top, canvas, paint.opacity)))
                .set_bg(rgb(blend(bottom, canvas, paint.opacity)));
        }
    }
}

/// Write `text` starting at `(x, y)`, clipped to `clip`.
pub fn paint_text(buf: &mut Buffer, clip: Rect, x: i32, y: i32, text: &str, fg: (u8, u8, u8)) {
    for (i, ch) in text.chars().enumerate() {
        if let Some(cell) = cell_in(buf, clip, x + i as i32, y) {
            cell.set_char(ch).set_fg(rgb(fg));
        }
    }
}

fn cell_in(buf: &mut Buffer, clip: Rect, x: i32, y: i32) -> Option<&mut ratatui::buffer::Cell> {
    if x < clip.x as i32
        || y < clip.y as i32
        || x >= clip.right() as i32
        || y >= clip.bottom() as i32
    {
        return None;
    }
    buf.cell_mut(Position::new(x as u16, y as u16))
}

/// Nearest-neighbour sampler that crops the source to fill a target box
/// ("cover"), so portrait photos are not squashed into landscape cards.
struct CoverSampler<'a> {
    img: &'a image::RgbaImage,
    src_x: f32,
    src_y: f32,
    step_x: f32,
    step_y: f32,
}

impl<'a> CoverSampler<'a> {
    fn new(img: &'a image::RgbaImage, target_w: u32, target_h: u32) -> Self {
        let (iw, ih) = (img.width() as f32, img.height() as f32);
        let (tw, th) = (target_w.max(1) as f32, target_h.max(1) as f32);
        let scale = (tw / iw).max(th / ih);
        let (crop_w, crop_h) = (tw / scale, th / scale);
        Self {
            img,
            src_x: (iw - crop_w) / 2.0,
            src_y: (ih - crop_h) / 2.0,
            step_x: crop_w / tw,
            step_y: crop_h / th,
        }
    }

    fn sample(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let sx = (self.src_x + (x as f32 + 0.5) * self.step_x) as u32;
        let sy = (self.src_y + (y as f32 + 0.5) * self.step_y) as u32;
        let px = self.img.get_pixel(
            sx.min(self.img.width() - 1),
            sy.min(self.img.height() - 1),
        );
        (px[0], px[1], px[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shear_leans_top_right_for_positive_tilt() {
        assert!(shear_shift(0, 9, 8.0) > 0);
        assert_eq!(shear_shift(4, 9, 8.0), 0);
        assert!(shear_shift(8, 9, 8.0) < 0);
        assert_eq!(shear_shift(0, 9, 0.0), 0);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend((200, 100, 0), (0, 0, 0), 1.0), (200, 100, 0));
        assert_eq!(blend((200, 100, 0), (10, 20, 30), 0.0), (10, 20, 30));
        assert_eq!(blend((200, 0, 0), (0, 0, 0), 0.5), (100, 0, 0));
    }

    #[test]
    fn painting_clips_off_screen_cards() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        let card = CardBox { x: -4, y: -1, w: 8, h: 4 };
        paint_card(
            &mut buf,
            area,
            card,
            &CardPaint {
                image: None,
                fill: (255, 0, 0),
                border: (255, 255, 255),
                opacity: 1.0,
                rotate_z: 0.0,
            },
        );
        // Bottom-right corner lands at (3, 2).
        assert_eq!(buf[(3, 2)].symbol(), "╯");
        assert_eq!(buf[(2, 1)].symbol(), "▀");
        assert_eq!(buf[(5, 1)].symbol(), " ");
    }

    #[test]
    fn card_box_hit_test() {
        let b = CardBox::centered(10.0, 5.0, 6, 4);
        assert_eq!((b.x, b.y), (7, 3));
        assert!(b.contains(7, 3));
        assert!(b.contains(12, 6));
        assert!(!b.contains(13, 6));
        assert!(!b.contains(6, 3));
    }
}

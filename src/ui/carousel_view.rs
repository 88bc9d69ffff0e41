//! Carousel widget — projects track-space cards onto the terminal.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::core::{
    carousel::{Carousel, CarouselCard, CarouselTransform},
    item::blur_variant,
};

use super::paint::{blend, paint_card, paint_text, CardBox, CardPaint};
use super::theme::Theme;

/// Card face in track units (3 wide, 4 tall).
const CARD_UNITS: (f32, f32) = (3.0, 4.0);
/// Distance from the viewer to the track origin, in track units.
const CAMERA_DEPTH: f32 = 40.0;
/// Horizontal track units visible across the full width at depth 0.
const UNITS_ACROSS: f32 = 24.0;
/// Cards at or past this depth are culled.  Perspective there is 2x, so a
/// card stays around a quarter of the width on long tracks.
const NEAR_CULL: f32 = CAMERA_DEPTH / 2.0;

/// Perspective factor for a card at depth `z` (larger z is nearer).
fn perspective(z: f32) -> f32 {
    CAMERA_DEPTH / (CAMERA_DEPTH - z).max(1.0)
}

/// Opacity multiplier that hides cards as they approach the wrap seam at
/// `±half_length`.  Fully visible further than one `spacing` from it.
pub fn edge_fade(z: f32, half_length: f32, spacing: f32) -> f32 {
    if spacing <= 0.0 {
        return 1.0;
    }
    ((half_length - z.abs()) / spacing).clamp(0.0, 1.0)
}

/// Combined opacity of a card at depth `z`: faded at the wrap seam and
/// again over the last `spacing` before the near cull depth.
pub fn visibility(z: f32, half_length: f32, spacing: f32) -> f32 {
    let near = if spacing > 0.0 {
        ((NEAR_CULL - z) / spacing).clamp(0.0, 1.0)
    } else if z < NEAR_CULL {
        1.0
    } else {
        0.0
    };
    edge_fade(z, half_length, spacing) * near
}

/// Where a card with transform `t` lands inside `area`.
pub fn card_box(area: Rect, t: &CarouselTransform) -> CardBox {
    let unit_cols = area.width as f32 / UNITS_ACROSS;
    let unit_rows = unit_cols / 2.0;
    let p = perspective(t.z);
    let cx = area.x as f32 + area.width as f32 / 2.0 + t.x * unit_cols * p;
    // Track y points up; terminal rows grow downward.
    let cy = area.y as f32 + area.height as f32 / 2.0 - t.y * unit_rows * p;
    let w = (CARD_UNITS.0 * unit_cols * p * t.scale).round().max(2.0) as u16;
    let h = (CARD_UNITS.1 * unit_rows * p * t.scale).round().max(2.0) as u16;
    CardBox::centered(cx, cy, w, h)
}

/// Slot of the nearest visible card under `(col, row)`.  `cards` must be
/// far to near, as produced by [`Carousel::frame`].  Cards faded out at the
/// seam or culled near the camera cannot be hovered.
pub fn hit_test(
    area: Rect,
    carousel: &Carousel,
    cards: &[CarouselCard],
    col: u16,
    row: u16,
) -> Option<usize> {
    let half = carousel.track_length() / 2.0;
    let spacing = carousel.config().spacing;
    cards
        .iter()
        .rev()
        .filter(|c| visibility(c.transform.z, half, spacing) > 0.1)
        .find(|c| card_box(area, &c.transform).contains(col, row))
        .map(|c| c.index)
}

/// Mean colour of an image, sampled on a sparse grid.
fn average_colour(img: &image::RgbaImage) -> Option<(u8, u8, u8)> {
    let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
    for y in (0..img.height()).step_by(8) {
        for x in (0..img.width()).step_by(8) {
            let px = img.get_pixel(x, y);
            r += px[0] as u64;
            g += px[1] as u64;
            b += px[2] as u64;
            n += 1;
        }
    }
    (n > 0).then(|| ((r / n) as u8, (g / n) as u8, (b / n) as u8))
}

pub struct CarouselWidget<'a> {
    pub carousel: &'a Carousel,
    pub cards: &'a [CarouselCard],
    pub images: &'a HashMap<PathBuf, Arc<image::RgbaImage>>,
}

impl Widget for CarouselWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::canvas_style());
        let half = self.carousel.track_length() / 2.0;
        let spacing = self.carousel.config().spacing;

        for card in self.cards {
            let Some(item) = self.carousel.slot(card.index) else {
                continue;
            };
            let t = &card.transform;
            let opacity = visibility(t.z, half, spacing);
            if opacity <= 0.0 {
                continue;
            }
            let sharp = self.images.get(&item.image).map(Arc::as_ref);
            // The blurred backdrop tints the card edge; fall back to the
            // sharp image, then to the plain border colour.
            let glow = self
                .images
                .get(&blur_variant(&item.image))
                .map(Arc::as_ref)
                .or(sharp)
                .and_then(average_colour)
                .unwrap_or_else(Theme::card_border);
            let border = if card.hovered {
                Theme::front_border()
            } else {
                glow
            };
            let bx = card_box(area, t);
            paint_card(
                buf,
                area,
                bx,
                &CardPaint {
                    image: sharp,
                    fill: Theme::placeholder_fill(),
                    border,
                    opacity,
                    rotate_z: 0.0,
                },
            );
            if card.hovered && bx.w > 4 {
                let label = item.label();
                let max = (bx.w as usize).saturating_sub(4);
                let label: String = label.chars().take(max).collect();
                paint_text(
                    buf,
                    area,
                    bx.x + 2,
                    bx.y + bx.h as i32,
                    &label,
                    blend(Theme::caption(), Theme::canvas(), opacity),
                );
            }
        }

        let hint = "SCROLL";
        paint_text(
            buf,
            area,
            area.right() as i32 - hint.len() as i32 - 2,
            area.bottom() as i32 - 1,
            hint,
            Theme::unliked(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::carousel::CarouselConfig;
    use crate::core::item::Item;

    #[test]
    fn seam_is_faded_out() {
        assert_eq!(edge_fade(0.0, 15.4, 2.2), 1.0);
        assert_eq!(edge_fade(15.4, 15.4, 2.2), 0.0);
        assert_eq!(edge_fade(-15.4, 15.4, 2.2), 0.0);
        let near_seam = edge_fade(14.3, 15.4, 2.2);
        assert!(near_seam > 0.0 && near_seam < 1.0);
    }

    #[test]
    fn nearer_cards_are_bigger() {
        let area = Rect::new(0, 0, 120, 40);
        let t = |z: f32| CarouselTransform {
            x: -z * 0.5,
            y: -z * 0.15,
            z,
            scale: 1.0,
            lift: 0.0,
        };
        let far = card_box(area, &t(-6.0));
        let near = card_box(area, &t(6.0));
        assert!(near.w > far.w);
        assert!(near.center().0 < far.center().0, "near cards drift left");
    }

    #[test]
    fn long_tracks_cull_cards_near_the_camera() {
        // 60 slots: the near end of the track reaches z = 66, far past the
        // camera plane.
        let base: Vec<Item> = (1..=30).map(|i| Item::new(i, format!("{i}.png"), None)).collect();
        let mut carousel = Carousel::new(&base, CarouselConfig::default());
        let area = Rect::new(0, 0, 120, 40);
        let half = carousel.track_length() / 2.0;
        let spacing = carousel.config().spacing;
        for _ in 0..6 {
            let cards = carousel.frame();
            let shown: Vec<_> = cards
                .iter()
                .filter(|c| visibility(c.transform.z, half, spacing) > 0.0)
                .collect();
            assert!(!shown.is_empty());
            assert!(shown.len() < cards.len());
            for c in shown {
                let b = card_box(area, &c.transform);
                assert!(b.w <= area.width, "slot {} z={} w={}", c.index, c.transform.z, b.w);
                assert!(b.h <= area.height, "slot {} z={} h={}", c.index, c.transform.z, b.h);
            }
            carousel.wheel(1000.0);
            carousel.tick(0.1);
        }
        // Nothing past the cull depth can be hovered either.
        let cards = carousel.frame();
        for c in cards.iter().filter(|c| c.transform.z >= NEAR_CULL) {
            let (cx, cy) = card_box(area, &c.transform).center();
            if (0..120).contains(&cx) && (0..40).contains(&cy) {
                assert_ne!(hit_test(area, &carousel, &cards, cx as u16, cy as u16), Some(c.index));
            }
        }
    }

    #[test]
    fn short_tracks_are_not_culled() {
        assert_eq!(visibility(0.0, 15.4, 2.2), 1.0);
        assert_eq!(visibility(12.0, 15.4, 2.2), 1.0);
        assert_eq!(visibility(NEAR_CULL, 66.0, 2.2), 0.0);
        assert_eq!(visibility(39.6, 66.0, 2.2), 0.0);
    }

    #[test]
    fn hit_test_prefers_nearest_card() {
        let base: Vec<Item> = (1..=7).map(|i| Item::new(i, format!("{i}.png"), None)).collect();
        let carousel = Carousel::new(&base, CarouselConfig::default());
        let cards = carousel.frame();
        let area = Rect::new(0, 0, 120, 40);
        // Slot 0 sits at the centre before any scrolling; slot 1 is nearer
        // and overlaps its left half.
        assert_eq!(hit_test(area, &carousel, &cards, 60, 20), Some(1));
        assert_eq!(hit_test(area, &carousel, &cards, 66, 20), Some(0));
        assert_eq!(hit_test(area, &carousel, &cards, 0, 0), None);
    }
}

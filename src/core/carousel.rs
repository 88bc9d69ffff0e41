//! Infinite scroll carousel — cards receding along a diagonal track.
//!
//! The base set is laid out twice end to end and every card's position is
//! wrapped into `[-L/2, L/2)` where `L` is the track length, so scrolling in
//! either direction loops forever without a visible seam.  The wheel moves a
//! target offset; the rendered offset chases it with exponential damping.

use super::damping::{damp, Damped};
use super::item::{Item, ItemId};

#[derive(Debug, Clone)]
pub struct CarouselConfig {
    /// Distance between neighbouring cards along the track.
    pub spacing: f32,
    /// Track units per unit of wheel delta.
    pub scroll_speed: f32,
    /// Damping rate of the scroll offset (1/s).
    pub scroll_damping: f32,
    /// Screen-space drift per unit of depth: `x = -z * dx`, `y = -z * dy`.
    pub diagonal: (f32, f32),
    /// Vertical lift of a hovered card.
    pub hover_lift: f32,
    /// Scale of a hovered card.
    pub hover_scale: f32,
    pub hover_lift_rate: f32,
    pub hover_scale_rate: f32,
    /// Target offset at mount; the deck drifts there from 0 on its own.
    pub initial_target: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            spacing: 2.2,
            scroll_speed: 0.002,
            scroll_damping: 3.0,
            diagonal: (0.5, 0.15),
            hover_lift: 0.6,
            hover_scale: 1.05,
            hover_lift_rate: 15.0,
            hover_scale_rate: 10.0,
            initial_target: 3.5,
        }
    }
}

// ───────────────────────────────────────── scroll ────────────

/// Smoothed scroll offset: `current` is drawn, `target` is where input put it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
}

impl ScrollState {
    pub fn new(initial_target: f32) -> Self {
        Self {
            current: 0.0,
            target: initial_target,
        }
    }

    /// Accumulate a wheel event.  Unbounded; wrapping makes any offset valid.
    pub fn wheel(&mut self, delta_y: f32, speed: f32) {
        self.target += delta_y * speed;
    }

    pub fn tick(&mut self, dt: f32, rate: f32) {
        self.current = damp(self.current, self.target, rate, dt);
    }
}

/// Position of card `index` on a looping track of `total` cards.
///
/// Result lies in `[-L/2, L/2)` with `L = total * spacing`, and is continuous
/// in `offset` everywhere except the hidden seam at the ends of that range.
pub fn wrap_position(index: usize, offset: f32, spacing: f32, total: usize) -> f32 {
    let length = total as f32 * spacing;
    if length <= 0.0 {
        return 0.0;
    }
    let half = length / 2.0;
    let raw = index as f32 * spacing + offset;
    let mut r = (raw + half).rem_euclid(length);
    // A tiny negative sum rounds up to exactly `length` in f32.
    if r >= length {
        r -= length;
    }
    r - half
}

// ───────────────────────────────────────── carousel ──────────

/// Pose of one carousel card in track space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselTransform {
    pub x: f32,
    pub y: f32,
    /// Depth along the track; larger is nearer the viewer.
    pub z: f32,
    pub scale: f32,
    /// Current hover lift, already included in `y`.
    pub lift: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselCard {
    /// Slot on the doubled track.  Payload ids repeat, slots do not.
    pub index: usize,
    pub id: ItemId,
    pub hovered: bool,
    pub transform: CarouselTransform,
}

#[derive(Debug, Clone)]
struct Hover {
    lift: Damped,
    scale: Damped,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    slots: Vec<Item>,
    scroll: ScrollState,
    hover: Vec<Hover>,
    hovered: Option<usize>,
    config: CarouselConfig,
}

impl Carousel {
    /// Build the track from `base`, laid out twice end to end.
    pub fn new(base: &[Item], config: CarouselConfig) -> Self {
        let slots: Vec<Item> = base.iter().chain(base.iter()).cloned().collect();
        let hover = slots
            .iter()
            .map(|_| Hover {
                lift: Damped::new(0.0, config.hover_lift_rate),
                scale: Damped::new(1.0, config.hover_scale_rate),
            })
            .collect();
        Self {
            slots,
            scroll: ScrollState::new(config.initial_target),
            hover,
            hovered: None,
            config,
        }
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Number of slots on the track (twice the base set).
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn track_length(&self) -> f32 {
        self.total() as f32 * self.config.spacing
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn slot(&self, index: usize) -> Option<&Item> {
        self.slots.get(index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.scroll.wheel(delta_y, self.config.scroll_speed);
    }

    /// Point the hover at slot `index` (or nothing).  Out-of-range slots
    /// count as nothing.
    pub fn set_hovered(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| i < self.slots.len());
        if index == self.hovered {
            return;
        }
        self.hovered = index;
        for (i, h) in self.hover.iter_mut().enumerate() {
            let on = Some(i) == index;
            h.lift.set_target(if on { self.config.hover_lift } else { 0.0 });
            h.scale.set_target(if on { self.config.hover_scale } else { 1.0 });
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.scroll.tick(dt, self.config.scroll_damping);
        for h in &mut self.hover {
            h.lift.tick(dt);
            h.scale.tick(dt);
        }
    }

    /// Pose of slot `index` at the current scroll offset.
    pub fn transform(&self, index: usize) -> Option<CarouselTransform> {
        let hover = self.hover.get(index)?;
        let z = wrap_position(index, self.scroll.current, self.config.spacing, self.total());
        let (dx, dy) = self.config.diagonal;
        let lift = hover.lift.value;
        Some(CarouselTransform {
            x: -z * dx,
            y: -z * dy + lift,
            z,
            scale: hover.scale.value,
            lift,
        })
    }

    /// All cards, far to near.
    pub fn frame(&self) -> Vec<CarouselCard> {
        let mut cards: Vec<CarouselCard> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                Some(CarouselCard {
                    index,
                    id: item.id,
                    hovered: self.hovered == Some(index),
                    transform: self.transform(index)?,
                })
            })
            .collect();
        cards.sort_by(|a, b| a.transform.z.total_cmp(&b.transform.z));
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn base() -> Vec<Item> {
        (1..=7).map(|i| Item::new(i, format!("{i}.webp"), None)).collect()
    }

    fn circular_gap(a: f32, b: f32, length: f32) -> f32 {
        let d = (a - b).abs() % length;
        d.min(length - d)
    }

    #[test]
    fn track_is_doubled() {
        let c = Carousel::new(&base(), CarouselConfig::default());
        assert_eq!(c.total(), 14);
        assert_eq!(c.slot(0).map(|i| i.id), c.slot(7).map(|i| i.id));
        assert!((c.track_length() - 30.8).abs() < 1e-4);
    }

    #[test]
    fn first_slot_at_rest_is_centered() {
        assert_eq!(wrap_position(0, 0.0, 2.2, 14), 0.0);
    }

    #[test]
    fn wrapped_positions_stay_in_range() {
        let length = 14.0 * 2.2;
        for offset in [-1000.0, -31.0, -0.5, 0.0, 3.5, 17.2, 999.9] {
            for index in 0..14 {
                let z = wrap_position(index, offset, 2.2, 14);
                assert!(z >= -length / 2.0 - 1e-3 && z < length / 2.0 + 1e-3);
            }
        }
    }

    #[test]
    fn sum_just_below_zero_stays_in_half_open_range() {
        // Track length 3.0, half 1.5.  The offset is the float just past
        // -1.5, so `raw + half` is one ulp below zero and `rem_euclid`
        // rounds up to exactly the track length.
        let offset = -f32::from_bits(1.5_f32.to_bits() + 1);
        let z = wrap_position(0, offset, 1.5, 2);
        assert!((-1.5..1.5).contains(&z), "z = {z}");
    }

    #[test]
    fn one_track_length_changes_nothing() {
        let length = 14.0 * 2.2;
        for offset in [0.37_f32, -5.1, 12.0] {
            for index in 0..14 {
                let a = wrap_position(index, offset, 2.2, 14);
                let b = wrap_position(index, offset + length, 2.2, 14);
                assert!(circular_gap(a, b, length) < 1e-3, "slot {index} at {offset}");
            }
        }
    }

    #[test]
    fn wrap_is_continuous_across_track_multiples() {
        let length = 14.0 * 2.2;
        let step = 0.01;
        let mut prev = wrap_position(3, length - 0.5, 2.2, 14);
        let mut offset = length - 0.5;
        while offset < length + 0.5 {
            offset += step;
            let z = wrap_position(3, offset, 2.2, 14);
            assert!((z - prev - step).abs() < 1e-3);
            prev = z;
        }
    }

    #[test]
    fn negative_offsets_wrap_correctly() {
        // Slot 1 scrolled back by three spacings sits two spacings behind.
        let z = wrap_position(1, -3.0 * 2.2, 2.2, 14);
        assert!((z + 4.4).abs() < 1e-4);
    }

    #[test]
    fn wheel_accumulates_without_clamping() {
        let mut s = ScrollState::new(0.0);
        for _ in 0..1_000 {
            s.wheel(100.0, 0.002);
        }
        assert!((s.target - 200.0).abs() < 0.05);
        s.wheel(-2_000_000.0, 0.002);
        assert!(s.target < -1000.0);
    }

    #[test]
    fn scroll_converges_without_overshoot() {
        let mut c = Carousel::new(&base(), CarouselConfig::default());
        let target = c.scroll().target;
        let mut gap = (target - c.scroll().current).abs();
        for _ in 0..120 {
            c.tick(DT);
            let s = c.scroll();
            assert!(s.current <= s.target);
            let next = (s.target - s.current).abs();
            assert!(next < gap);
            gap = next;
        }
    }

    #[test]
    fn diagonal_layout_follows_depth() {
        let c = Carousel::new(&base(), CarouselConfig::default());
        // Nothing has ticked, so current offset is 0.
        let t = c.transform(2).unwrap();
        assert!((t.z - 4.4).abs() < 1e-4);
        assert!((t.x + 2.2).abs() < 1e-4);
        assert!((t.y + 0.66).abs() < 1e-4);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn hover_is_per_card_and_faster_than_scroll() {
        let mut c = Carousel::new(&base(), CarouselConfig::default());
        c.set_hovered(Some(4));
        for _ in 0..20 {
            c.tick(DT);
        }
        let hovered = c.transform(4).unwrap();
        let neighbour = c.transform(5).unwrap();
        assert!(hovered.lift > 0.5 && hovered.lift <= 0.6);
        assert!(hovered.scale > 1.04);
        assert_eq!(neighbour.lift, 0.0);
        assert_eq!(neighbour.scale, 1.0);

        // Scroll has covered far less of its gap in the same time.
        let s = c.scroll();
        assert!(s.current / s.target < hovered.lift / 0.6);

        c.set_hovered(None);
        for _ in 0..60 {
            c.tick(DT);
        }
        assert!(c.transform(4).unwrap().lift < 0.01);
    }

    #[test]
    fn frame_is_sorted_far_to_near() {
        let mut c = Carousel::new(&base(), CarouselConfig::default());
        for _ in 0..30 {
            c.tick(DT);
        }
        let frame = c.frame();
        assert_eq!(frame.len(), 14);
        assert!(frame.windows(2).all(|w| w[0].transform.z <= w[1].transform.z));
    }
}

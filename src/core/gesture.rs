//! Pointer gestures on the front card: drag-and-release, double activation.
//!
//! ```text
//!   Idle ──begin(front)──▶ Dragging ──release──▶ SnapBack ─┐
//!    ▲                                  └──────▶ Rotate ───┤
//!    └─────────────────────────────────────────────────────┘
//! ```
//!
//! Every drag resolves to exactly one outcome on release; there is no cancel.

use std::time::{Duration, Instant};

use super::item::ItemId;

/// What a finished drag does to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Displacement stayed inside the threshold: animate back to rank 0.
    SnapBack,
    /// Displacement crossed the threshold: send the card to the back.
    Rotate,
}

/// Decide the outcome of a release at displacement `(dx, dy)`.
///
/// Axes are checked independently: crossing the threshold on either axis is
/// enough.
pub fn classify_release(dx: f32, dy: f32, threshold: f32) -> ReleaseOutcome {
    if dx.abs() > threshold || dy.abs() > threshold {
        ReleaseOutcome::Rotate
    } else {
        ReleaseOutcome::SnapBack
    }
}

/// Rubber-band mapping from raw pointer displacement to visual displacement.
///
/// Odd, continuous and strictly increasing; slope 1 at the origin and
/// saturating toward `±limit`, so small drags track the pointer 1:1 and long
/// drags meet resistance.  A non-positive `limit` disables the resistance.
pub fn elastic(d: f32, limit: f32) -> f32 {
    if limit <= 0.0 {
        return d;
    }
    limit * (d / limit).tanh()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        id: ItemId,
        /// Raw displacement from where the drag started.
        dx: f32,
        dy: f32,
    },
}

/// Drag tracker for the stack's front card.
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    state: DragState,
}

impl DragGesture {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Id of the card being dragged, if any.
    pub fn dragged(&self) -> Option<ItemId> {
        match self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Idle => None,
        }
    }

    /// Start dragging `id`.  The caller decides eligibility (front card only);
    /// a drag already in progress is replaced.
    pub fn begin(&mut self, id: ItemId) {
        self.state = DragState::Dragging { id, dx: 0.0, dy: 0.0 };
    }

    /// Update the displacement from the drag origin.  Ignored when idle.
    pub fn move_to(&mut self, dx: f32, dy: f32) {
        if let DragState::Dragging { id, .. } = self.state {
            self.state = DragState::Dragging { id, dx, dy };
        }
    }

    /// Finish the drag at `(dx, dy)`.  Returns the dragged id and its outcome,
    /// or `None` if nothing was being dragged.
    pub fn release(&mut self, dx: f32, dy: f32, threshold: f32) -> Option<(ItemId, ReleaseOutcome)> {
        let DragState::Dragging { id, .. } = self.state else {
            return None;
        };
        self.state = DragState::Idle;
        Some((id, classify_release(dx, dy, threshold)))
    }
}

/// Detects two activations on the same card within a time window.
#[derive(Debug, Clone)]
pub struct DoubleClick {
    window: Duration,
    last: Option<(ItemId, Instant)>,
}

impl DoubleClick {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Record an activation; returns `true` when it completes a double.
    /// A completed double resets the detector so a third click starts over.
    pub fn register(&mut self, id: ItemId, now: Instant) -> bool {
        let is_double = self
            .last
            .map(|(last_id, at)| last_id == id && now.saturating_duration_since(at) <= self.window)
            .unwrap_or(false);
        self.last = if is_double { None } else { Some((id, now)) };
        is_double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_uses_or_per_axis() {
        assert_eq!(classify_release(50.0, 0.0, 100.0), ReleaseOutcome::SnapBack);
        assert_eq!(classify_release(150.0, 0.0, 100.0), ReleaseOutcome::Rotate);
        assert_eq!(classify_release(0.0, -101.0, 100.0), ReleaseOutcome::Rotate);
        // 90 on both axes is ~127 diagonally but crosses neither axis.
        assert_eq!(classify_release(90.0, 90.0, 100.0), ReleaseOutcome::SnapBack);
        assert_eq!(classify_release(100.0, 0.0, 100.0), ReleaseOutcome::SnapBack);
    }

    #[test]
    fn elastic_is_continuous_odd_and_bounded() {
        let limit = 200.0;
        assert!((elastic(1.0, limit) - 1.0).abs() < 1e-3);
        assert_eq!(elastic(-80.0, limit), -elastic(80.0, limit));
        let mut prev = elastic(0.0, limit);
        for step in 1..100 {
            let v = elastic(step as f32 * 5.0, limit);
            assert!(v > prev);
            assert!(v < limit);
            assert!(v - prev < 5.0 + 1e-3);
            prev = v;
        }
        assert_eq!(elastic(42.0, 0.0), 42.0);
    }

    #[test]
    fn release_without_drag_is_none() {
        let mut g = DragGesture::default();
        assert_eq!(g.release(500.0, 0.0, 100.0), None);
    }

    #[test]
    fn drag_lifecycle() {
        let mut g = DragGesture::default();
        g.move_to(10.0, 10.0);
        assert_eq!(g.state(), DragState::Idle);

        g.begin(ItemId(1));
        g.move_to(40.0, -5.0);
        assert_eq!(
            g.state(),
            DragState::Dragging { id: ItemId(1), dx: 40.0, dy: -5.0 }
        );
        assert_eq!(
            g.release(120.0, 0.0, 100.0),
            Some((ItemId(1), ReleaseOutcome::Rotate))
        );
        assert!(!g.is_dragging());
    }

    #[test]
    fn double_click_window() {
        let t0 = Instant::now();
        let mut dc = DoubleClick::new(Duration::from_millis(250));
        assert!(!dc.register(ItemId(1), t0));
        assert!(dc.register(ItemId(1), t0 + Duration::from_millis(200)));
        // Third click starts a fresh pair.
        assert!(!dc.register(ItemId(1), t0 + Duration::from_millis(300)));

        // Too slow.
        assert!(!dc.register(ItemId(1), t0 + Duration::from_millis(900)));
        // Different card.
        assert!(!dc.register(ItemId(2), t0 + Duration::from_millis(950)));
    }
}

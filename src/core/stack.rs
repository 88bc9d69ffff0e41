//! Bounded swipe stack — a small pile of photos, front card on top.
//!
//! Order is the only state that matters: rank is recomputed from list
//! position every frame and mapped through a fixed transform table.  Dragging
//! the front card past the threshold sends it to the back; anything less and
//! it springs home.  Double-clicking the front card likes it.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use super::animator::Animator;
use super::caption::CaptionFade;
use super::gesture::{elastic, DoubleClick, DragGesture, DragState, ReleaseOutcome};
use super::item::{Item, ItemId};
use super::pulse::PulseTimer;
use super::transform::CardTransform;

/// Ranks `0..VISIBLE_DEPTH` have a distinct pose; deeper ranks are hidden.
pub const VISIBLE_DEPTH: usize = 4;

/// Hand-tuned "messy pile" poses for the visible ranks.
const RANK_POSES: [CardTransform; VISIBLE_DEPTH] = [
    CardTransform {
        x: 0.0,
        y: 0.0,
        rotate_z: 0.0,
        scale: 1.0,
        z_order: 4,
        opacity: 1.0,
    },
    CardTransform {
        x: 6.0,
        y: -4.0,
        rotate_z: 4.0,
        scale: 0.96,
        z_order: 3,
        opacity: 1.0,
    },
    CardTransform {
        x: -8.0,
        y: -7.0,
        rotate_z: -6.0,
        scale: 0.92,
        z_order: 2,
        opacity: 1.0,
    },
    CardTransform {
        x: 10.0,
        y: -10.0,
        rotate_z: 8.0,
        scale: 0.88,
        z_order: 1,
        opacity: 1.0,
    },
];

const HIDDEN_POSE: CardTransform = CardTransform {
    x: 0.0,
    y: 0.0,
    rotate_z: 0.0,
    scale: 0.8,
    z_order: 0,
    opacity: 0.0,
};

/// Resting pose for a card at `rank`.
pub fn stack_transform(rank: usize) -> CardTransform {
    RANK_POSES.get(rank).copied().unwrap_or(HIDDEN_POSE)
}

// ───────────────────────────────────────── order ─────────────

/// Card ids in stack order; index 0 is the front.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackOrder {
    ids: Vec<ItemId>,
}

impl StackOrder {
    pub fn new(ids: Vec<ItemId>) -> Self {
        Self { ids }
    }

    pub fn front(&self) -> Option<ItemId> {
        self.ids.first().copied()
    }

    pub fn rank_of(&self, id: ItemId) -> Option<usize> {
        self.ids.iter().position(|&i| i == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.iter().copied()
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Move the front card to the back, keeping everything else in order.
    /// Returns the new front when it differs from the old one.
    pub fn rotate_front_to_back(&mut self) -> Option<ItemId> {
        if self.ids.len() < 2 {
            return None;
        }
        self.ids.rotate_left(1);
        self.front()
    }
}

// ───────────────────────────────────────── likes ─────────────

/// Ids the user has liked.  Add-only: nothing removes an id once present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeSet {
    ids: BTreeSet<ItemId>,
}

impl LikeSet {
    /// Returns `true` if `id` was not liked before.
    pub fn like(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.iter().copied()
    }
}

// ───────────────────────────────────────── stack ─────────────

/// Tuning for [`SwipeStack`].
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Per-axis release distance that sends the front card to the back.
    pub swipe_threshold: f32,
    /// Visual drag displacement saturates toward this distance.
    pub elastic_limit: f32,
    /// Damping rate for cards gliding to a new pose (1/s).
    pub settle_rate: f32,
    pub double_click: Duration,
    pub like_pulse: Duration,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 100.0,
            elastic_limit: 240.0,
            settle_rate: 12.0,
            double_click: Duration::from_millis(250),
            like_pulse: Duration::from_millis(800),
        }
    }
}

/// One card as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StackCard {
    pub id: ItemId,
    pub rank: usize,
    pub transform: CardTransform,
    /// Only the front card takes pointer input.
    pub interactive: bool,
    pub liked: bool,
}

/// Everything the renderer needs for one frame of the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    /// Back to front (ascending `z_order`).
    pub cards: Vec<StackCard>,
    /// Caption owner and its fade-in opacity.
    pub caption: Option<(ItemId, f32)>,
    /// Card showing the like pulse, with progress in `[0, 1)`.
    pub pulse: Option<(ItemId, f32)>,
}

#[derive(Debug, Clone)]
pub struct SwipeStack {
    items: Vec<Item>,
    order: StackOrder,
    drag: DragGesture,
    likes: LikeSet,
    pulse: PulseTimer,
    pulse_owner: Option<ItemId>,
    clicks: DoubleClick,
    animator: Animator,
    caption: CaptionFade,
    front_changed: Option<ItemId>,
    config: StackConfig,
}

impl SwipeStack {
    /// Mount a stack with `items` in their given order (first = front).
    pub fn new(items: Vec<Item>, config: StackConfig) -> Self {
        let order = StackOrder::new(items.iter().map(|i| i.id).collect());
        let front = order.front();
        let mut stack = Self {
            items,
            order,
            drag: DragGesture::default(),
            likes: LikeSet::default(),
            pulse: PulseTimer::new(config.like_pulse),
            pulse_owner: None,
            clicks: DoubleClick::new(config.double_click),
            animator: Animator::default(),
            caption: CaptionFade::new(front),
            front_changed: None,
            config,
        };
        // Seed every card at rest so the first frame is not an animation.
        let targets = stack.targets();
        stack.animator.step(targets, stack.config.settle_rate, 0.0);
        stack
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn order(&self) -> &StackOrder {
        &self.order
    }

    pub fn front(&self) -> Option<ItemId> {
        self.order.front()
    }

    pub fn front_item(&self) -> Option<&Item> {
        self.front().and_then(|id| self.item(id))
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn liked(&self) -> &LikeSet {
        &self.likes
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Front-changed notification: the new front id since the last call.
    pub fn take_front_changed(&mut self) -> Option<ItemId> {
        self.front_changed.take()
    }

    /// Pose `id` should have right now, derived from its current rank and
    /// any drag in progress.  `None` for ids not in the stack.
    pub fn target_transform(&self, id: ItemId) -> Option<CardTransform> {
        let rank = self.order.rank_of(id)?;
        Some(self.target_for(id, rank))
    }

    /// Transform `id` was last drawn with.
    pub fn shown_transform(&self, id: ItemId) -> Option<CardTransform> {
        self.animator.get(id)
    }

    fn target_for(&self, id: ItemId, rank: usize) -> CardTransform {
        let rest = stack_transform(rank);
        match self.drag.state() {
            DragState::Dragging { id: dragged, dx, dy } if dragged == id => {
                let limit = self.config.elastic_limit;
                rest.translated(elastic(dx, limit), elastic(dy, limit))
            }
            _ => rest,
        }
    }

    fn targets(&self) -> Vec<(ItemId, CardTransform)> {
        self.order
            .iter()
            .enumerate()
            .map(|(rank, id)| (id, self.target_for(id, rank)))
            .collect()
    }

    // ── order ──────────────────────────────────────────────────

    /// Send the front card to the back.  No-op on stacks of fewer than two.
    pub fn rotate_front_to_back(&mut self) -> Option<ItemId> {
        let new_front = self.order.rotate_front_to_back()?;
        // Whatever was being dragged is no longer the front card.
        self.drag = DragGesture::default();
        self.clicks.reset();
        self.caption.show(Some(new_front));
        self.front_changed = Some(new_front);
        tracing::debug!(front = %new_front, "stack rotated");
        Some(new_front)
    }

    // ── drag ───────────────────────────────────────────────────

    /// Start dragging `id`.  Only the front card can be dragged.
    pub fn begin_drag(&mut self, id: ItemId) -> bool {
        if self.front() != Some(id) {
            return false;
        }
        self.drag.begin(id);
        true
    }

    /// Displacement from the drag origin, in reference units.
    pub fn drag_to(&mut self, dx: f32, dy: f32) {
        self.drag.move_to(dx, dy);
        self.track_pointer();
    }

    /// Let go at `(dx, dy)`.  Rotates or snaps back; `None` if no drag was
    /// in progress.
    pub fn release(&mut self, dx: f32, dy: f32) -> Option<ReleaseOutcome> {
        self.drag.move_to(dx, dy);
        self.track_pointer();
        let (id, outcome) = self.drag.release(dx, dy, self.config.swipe_threshold)?;
        tracing::debug!(card = %id, dx, dy, ?outcome, "drag released");
        if outcome == ReleaseOutcome::Rotate {
            self.rotate_front_to_back();
        }
        Some(outcome)
    }

    fn track_pointer(&mut self) {
        if let Some(id) = self.drag.dragged() {
            if let Some(t) = self.target_transform(id) {
                self.animator.snap(id, t);
            }
        }
    }

    // ── likes ──────────────────────────────────────────────────

    /// Register a click on `id`.  A second click on the front card within
    /// the double-click window likes it; returns `true` in that case.
    pub fn activate(&mut self, id: ItemId, now: Instant) -> bool {
        if self.front() != Some(id) {
            return false;
        }
        if self.clicks.register(id, now) {
            self.like_front(now);
            true
        } else {
            false
        }
    }

    /// Like the front card and play the pulse.  Liking an already liked
    /// card replays the pulse but leaves the set unchanged.
    pub fn like_front(&mut self, now: Instant) -> Option<ItemId> {
        let id = self.front()?;
        if self.likes.like(id) {
            tracing::info!(card = %id, "liked");
        }
        self.pulse.trigger(now);
        self.pulse_owner = Some(id);
        Some(id)
    }

    // ── frame ──────────────────────────────────────────────────

    /// Advance animations by `dt` seconds of wall-clock time.
    pub fn tick(&mut self, dt: f32, now: Instant) {
        self.pulse.tick(now);
        if !self.pulse.is_active() {
            self.pulse_owner = None;
        }
        self.caption.tick(dt);
        let targets = self.targets();
        self.animator.step(targets, self.config.settle_rate, dt);
        self.track_pointer();
    }

    pub fn frame(&self, now: Instant) -> StackFrame {
        let front = self.front();
        let mut cards: Vec<StackCard> = self
            .order
            .iter()
            .enumerate()
            .map(|(rank, id)| StackCard {
                id,
                rank,
                transform: self
                    .animator
                    .get(id)
                    .unwrap_or_else(|| self.target_for(id, rank)),
                interactive: Some(id) == front,
                liked: self.likes.contains(id),
            })
            .collect();
        cards.sort_by_key(|c| c.transform.z_order);

        let caption = self.caption.owner().map(|id| (id, self.caption.opacity()));
        let pulse = match (self.pulse_owner, self.pulse.progress(now)) {
            (Some(id), Some(p)) => Some((id, p)),
            _ => None,
        };
        StackFrame {
            cards,
            caption,
            pulse,
        }
    }

    /// Tear down view-scoped effects: pending pulse, half-finished gestures.
    pub fn unmount(&mut self) {
        self.pulse.cancel();
        self.pulse_owner = None;
        self.drag = DragGesture::default();
        self.clicks.reset();
    }
}

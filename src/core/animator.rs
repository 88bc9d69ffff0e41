//! Identity-keyed animation continuity.
//!
//! Targets are re-derived from rank every frame and never stored.  What *is*
//! stored is the transform each card was last drawn with, keyed by its id,
//! so that when a card's rank changes it glides from where it was to where
//! it now belongs instead of jumping.

use std::collections::HashMap;

use super::item::ItemId;
use super::transform::CardTransform;

#[derive(Debug, Clone, Default)]
pub struct Animator {
    shown: HashMap<ItemId, CardTransform>,
}

impl Animator {
    /// Last drawn transform for `id`.
    pub fn get(&self, id: ItemId) -> Option<CardTransform> {
        self.shown.get(&id).copied()
    }

    /// Pin `id` to `transform` immediately (pointer-tracked cards).
    pub fn snap(&mut self, id: ItemId, transform: CardTransform) {
        self.shown.insert(id, transform);
    }

    /// Damp each id toward its target.  Ids seen for the first time start at
    /// their target; ids absent from `targets` are dropped.
    pub fn step<I>(&mut self, targets: I, rate: f32, dt: f32)
    where
        I: IntoIterator<Item = (ItemId, CardTransform)>,
    {
        let mut next = HashMap::with_capacity(self.shown.len());
        for (id, target) in targets {
            let shown = match self.shown.get(&id) {
                Some(current) => current.damp_toward(&target, rate, dt),
                None => target,
            };
            next.insert(id, shown);
        }
        self.shown = next;
    }

}

//! Caption cross-fade keyed to the front card.

use super::damping::Damped;
use super::item::ItemId;

/// Fade rate of a freshly swapped caption, in 1/s.
const CAPTION_FADE_RATE: f32 = 8.0;

/// Which card's caption is shown, and how visible it is.
///
/// Runs independently of the stack motion: a new owner restarts the fade from
/// transparent no matter where the cards are.
#[derive(Debug, Clone)]
pub struct CaptionFade {
    owner: Option<ItemId>,
    opacity: Damped,
}

impl CaptionFade {
    pub fn new(owner: Option<ItemId>) -> Self {
        let mut opacity = Damped::new(0.0, CAPTION_FADE_RATE);
        opacity.set_target(1.0);
        Self { owner, opacity }
    }

    pub fn owner(&self) -> Option<ItemId> {
        self.owner
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.value
    }

    /// Hand the caption to `owner`.  A change of owner restarts the fade.
    pub fn show(&mut self, owner: Option<ItemId>) {
        if owner != self.owner {
            self.owner = owner;
            self.opacity.value = 0.0;
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.opacity.tick(dt);
    }
}

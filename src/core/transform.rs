//! Visual transform applied to a single card for one frame.

use super::damping::damp;

/// Where and how a card is drawn.
///
/// Units are the stack's reference space (roughly CSS pixels); the renderer
/// converts them to terminal cells.  `rotate_z` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub x: f32,
    pub y: f32,
    pub rotate_z: f32,
    pub scale: f32,
    /// Paint order — higher is drawn later (on top).
    pub z_order: i32,
    pub opacity: f32,
}

impl CardTransform {
    /// Centered, unscaled, fully opaque.  `z_order` is left at 0; callers that
    /// need a specific layer set it explicitly.
    pub const IDENTITY: CardTransform = CardTransform {
        x: 0.0,
        y: 0.0,
        rotate_z: 0.0,
        scale: 1.0,
        z_order: 0,
        opacity: 1.0,
    };

    /// Euclidean length of the translation.
    pub fn offset_magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Damp every continuous field toward `target`.  `z_order` is discrete and
    /// jumps straight to the target layer.
    pub fn damp_toward(&self, target: &CardTransform, rate: f32, dt: f32) -> Self {
        Self {
            x: damp(self.x, target.x, rate, dt),
            y: damp(self.y, target.y, rate, dt),
            rotate_z: damp(self.rotate_z, target.rotate_z, rate, dt),
            scale: damp(self.scale, target.scale, rate, dt),
            z_order: target.z_order,
            opacity: damp(self.opacity, target.opacity, rate, dt),
        }
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

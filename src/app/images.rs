//! Background image decoding so the frame loop never blocks on disk.
//!
//! Every decode runs on its own thread and reports back over a channel;
//! the main loop drops the result into `AppState::images`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tokio::sync::mpsc;

use crate::core::item::{blur_variant, DEMO_SCHEME};

/// Decoded images are shrunk to fit this box; terminals never need more.
const THUMB_MAX: u32 = 160;

pub enum ImageUpdate {
    Decoded {
        path: PathBuf,
        image: Arc<RgbaImage>,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

/// Decode `path` (and its blurred sibling, when present) in the background.
pub fn spawn_image_decode(tx: mpsc::UnboundedSender<ImageUpdate>, path: PathBuf) {
    std::thread::spawn(move || {
        let blur = blur_variant(&path);
        let want_blur = !is_demo(&path) && blur.is_file();
        for p in std::iter::once(path).chain(want_blur.then_some(blur)) {
            let update = match load(&p) {
                Ok(image) => ImageUpdate::Decoded {
                    path: p,
                    image: Arc::new(image),
                },
                Err(e) => ImageUpdate::Failed {
                    path: p,
                    error: format!("{e:#}"),
                },
            };
            if tx.send(update).is_err() {
                break;
            }
        }
    });
}

fn is_demo(path: &Path) -> bool {
    path.to_string_lossy().starts_with(DEMO_SCHEME)
}

fn load(path: &Path) -> anyhow::Result<RgbaImage> {
    let text = path.to_string_lossy();
    if let Some(stem) = text.strip_prefix(DEMO_SCHEME) {
        return Ok(demo_swatch(stem));
    }
    let img = image::open(path)?;
    Ok(img.thumbnail(THUMB_MAX, THUMB_MAX).to_rgba8())
}

/// Two-colour diagonal gradient seeded from `stem`, so each demo card
/// looks different but stays the same between runs.
pub fn demo_swatch(stem: &str) -> RgbaImage {
    let seed = stem
        .bytes()
        .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
    let hue = |shift: u32| -> [u8; 3] {
        let v = seed.rotate_left(shift);
        [
            64 + (v & 0x7f) as u8,
            64 + ((v >> 8) & 0x7f) as u8,
            64 + ((v >> 16) & 0x7f) as u8,
        ]
    };
    let (a, b) = (hue(0), hue(13));
    let (w, h) = (60u32, 80u32);
    RgbaImage::from_fn(w, h, |x, y| {
        let t = (x + y) as f32 / (w + h - 2) as f32;
        let mix = |i: usize| (a[i] as f32 * (1.0 - t) + b[i] as f32 * t) as u8;
        Rgba([mix(0), mix(1), mix(2), 255])
    })
}

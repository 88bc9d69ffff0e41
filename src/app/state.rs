//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    carousel::Carousel,
    damping::MAX_FRAME_DT,
    item::{Item, ItemSet},
    stack::SwipeStack,
};

/// Which deck is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Stack,
    Carousel,
}

impl ActiveView {
    pub fn title(self) -> &'static str {
        match self {
            ActiveView::Stack => "Stack",
            ActiveView::Carousel => "Carousel",
        }
    }
}

/// Top-level application state.
pub struct AppState {
    /// Everything that was loaded, in display order.
    pub items: ItemSet,
    pub stack: SwipeStack,
    pub carousel: Carousel,
    pub active_view: ActiveView,
    /// Controls popup on top of the active view.
    pub show_help: bool,
    /// User-configurable keybindings and tuning.
    pub config: AppConfig,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Decoded images by path.  Filled asynchronously.
    pub images: HashMap<PathBuf, Arc<image::RgbaImage>>,
    /// Paths already handed to a decoder (successful or not).
    pub requested_images: HashSet<PathBuf>,
    /// Last known terminal size, for mouse hit-testing outside of draw.
    pub terminal_area: Rect,
    /// Cell where the current drag started.
    pub drag_origin: Option<(u16, u16)>,
    last_frame: Option<Instant>,
}

impl AppState {
    pub fn new(items: ItemSet, config: AppConfig, view: ActiveView) -> Self {
        let stack = SwipeStack::new(items.take(config.stack_size), config.stack_config());
        let carousel = Carousel::new(items.items(), config.carousel_config());
        Self {
            items,
            stack,
            carousel,
            active_view: view,
            show_help: false,
            config,
            status_message: None,
            should_quit: false,
            images: HashMap::new(),
            requested_images: HashSet::new(),
            terminal_area: Rect::default(),
            drag_origin: None,
            last_frame: None,
        }
    }

    /// Advance the visible view's animations to `now`.  The first tick only
    /// records the clock; gaps are clamped so a stall does not teleport.
    pub fn tick(&mut self, now: Instant) {
        let dt = match self.last_frame {
            Some(prev) => now.duration_since(prev).as_secs_f32().min(MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_frame = Some(now);
        match self.active_view {
            ActiveView::Stack => self.stack.tick(dt, now),
            ActiveView::Carousel => self.carousel.tick(dt),
        }
    }

    /// Flip between the stack and the carousel.  The stack drops its pulse
    /// and any half-finished gesture on the way out.
    pub fn switch_view(&mut self) {
        self.active_view = match self.active_view {
            ActiveView::Stack => {
                self.stack.unmount();
                self.drag_origin = None;
                ActiveView::Carousel
            }
            ActiveView::Carousel => {
                self.carousel.set_hovered(None);
                ActiveView::Stack
            }
        };
        tracing::debug!(view = self.active_view.title(), "switched view");
    }

    /// Images that have not been sent to a decoder yet.  Marks them as
    /// requested.
    pub fn take_pending_images(&mut self) -> Vec<PathBuf> {
        let wanted: Vec<PathBuf> = self
            .items
            .items()
            .iter()
            .map(|i: &Item| i.image.clone())
            .filter(|p| !self.requested_images.contains(p))
            .collect();
        for p in &wanted {
            self.requested_images.insert(p.clone());
        }
        wanted
    }

    /// Image paths of liked cards, in stack id order.
    pub fn liked_images(&self) -> Vec<PathBuf> {
        self.stack
            .liked()
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(|i| i.image.clone())
            .collect()
    }
}

//! A deck of image cards for the terminal.
//!
//! Swipe through a small stack with the mouse, double-click to like, or
//! flip to an endless diagonal carousel.  The paths of liked images are
//! printed to stdout on exit so the tool composes with shell pipelines.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Alignment,
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    images::{spawn_image_decode, ImageUpdate},
    state::{ActiveView, AppState},
};
use crate::core::item::ItemSet;
use crate::ui::{
    carousel_view::CarouselWidget,
    layout::AppLayout,
    popup::HelpPopup,
    stack_view::{StackCaption, StackWidget},
    theme::Theme,
};

/// Most images read from a directory.  The carousel shows twice as many.
const MAX_DIR_ITEMS: usize = 64;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StartView {
    Stack,
    Carousel,
}

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Swipe and scroll through image cards")]
struct Cli {
    /// Directory of images.  Without one, a built-in demo deck is shown.
    dir: Option<PathBuf>,

    /// Number of cards in the swipe stack.
    #[arg(long)]
    stack_size: Option<usize>,

    /// Drag distance (in card units) that sends the front card to the back.
    #[arg(long)]
    threshold: Option<f32>,

    /// View to open with.
    #[arg(long, value_enum, default_value_t = StartView::Stack)]
    view: StartView,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the current settings to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    state.terminal_area = frame.area();
    let layout = AppLayout::from_area(frame.area());

    let title = Line::from(vec![
        Span::styled(format!(" {} ", state.active_view.title()), Theme::title_style()),
        Span::raw(format!(
            " {} cards · {} liked",
            state.items.len(),
            state.stack.liked().len()
        )),
    ]);
    frame.render_widget(Paragraph::new(title).style(Theme::canvas_style()), layout.title_area);

    match state.active_view {
        ActiveView::Stack => {
            let snapshot = state.stack.frame(Instant::now());
            frame.render_widget(
                StackWidget {
                    stack: &state.stack,
                    frame: &snapshot,
                    images: &state.images,
                },
                layout.deck_area,
            );
            frame.render_widget(
                StackCaption {
                    stack: &state.stack,
                    frame: &snapshot,
                },
                layout.caption_area,
            );
        }
        ActiveView::Carousel => {
            let cards = state.carousel.frame();
            frame.render_widget(
                CarouselWidget {
                    carousel: &state.carousel,
                    cards: &cards,
                    images: &state.images,
                },
                layout.deck_area,
            );
            let caption = state
                .carousel
                .hovered()
                .and_then(|i| state.carousel.slot(i))
                .map(|item| item.label())
                .unwrap_or_default();
            frame.render_widget(
                Paragraph::new(caption)
                    .alignment(Alignment::Center)
                    .style(Theme::canvas_style()),
                layout.caption_area,
            );
        }
    }

    let hint = state.config.status_bar_hint();
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.show_help {
        frame.render_widget(HelpPopup { config: &state.config }, frame.area());
    }
}

fn apply_image_update(state: &mut AppState, update: ImageUpdate) {
    match update {
        ImageUpdate::Decoded { path, image } => {
            tracing::debug!(path = %path.display(), w = image.width(), h = image.height(), "decoded");
            state.images.insert(path, image);
        }
        ImageUpdate::Failed { path, error } => {
            tracing::warn!(path = %path.display(), %error, "image failed to load");
            state.status_message = Some(format!("cannot load {}", path.display()));
        }
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut user_config = config::AppConfig::load();
    if let Some(n) = cli.stack_size {
        user_config.stack_size = n.max(1);
    }
    if let Some(t) = cli.threshold {
        user_config.swipe_threshold = t.max(1.0);
    }

    if cli.write_config {
        let path = user_config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    // ── build the deck ────────────────────────────────────────
    let items = match &cli.dir {
        Some(dir) => ItemSet::from_dir(dir, MAX_DIR_ITEMS)
            .with_context(|| format!("no usable images in {}", dir.display()))?,
        None => ItemSet::demo(),
    };
    tracing::info!(items = items.len(), "deck loaded");

    let view = match cli.view {
        StartView::Stack => ActiveView::Stack,
        StartView::Carousel => ActiveView::Carousel,
    };
    let frame_interval = user_config.frame_interval();
    let mut state = AppState::new(items, user_config, view);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (image_tx, mut image_rx) = tokio::sync::mpsc::unbounded_channel::<ImageUpdate>();
    for path in state.take_pending_images() {
        spawn_image_decode(image_tx.clone(), path);
    }

    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => {
                        state.terminal_area = ratatui::layout::Rect::new(0, 0, w, h);
                    }
                }
            }

            Some(update) = image_rx.recv() => {
                apply_image_update(&mut state, update);
                // Drain everything currently queued without blocking.
                while let Ok(update) = image_rx.try_recv() {
                    apply_image_update(&mut state, update);
                }
            }

            _ = frames.tick() => {
                state.tick(Instant::now());
                if let Some(id) = state.stack.take_front_changed() {
                    let label = state.items.get(id).map(|i| i.label()).unwrap_or_default();
                    execute!(terminal.backend_mut(), SetTitle(format!("card-deck · {label}")))?;
                }
                terminal.draw(|frame| draw(frame, &mut state))?;
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    for path in state.liked_images() {
        println!("{}", path.display());
    }

    Ok(())
}

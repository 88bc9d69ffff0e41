//! Input handling — maps key/mouse events to state mutations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::ui::{carousel_view, layout::AppLayout, stack_view};

use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let action = state.config.match_key(key);

    if state.show_help {
        // Any of these closes the popup rather than acting on the deck.
        if key.code == KeyCode::Esc || matches!(action, Some(Action::Help | Action::Quit)) {
            state.show_help = false;
        }
        return;
    }

    let Some(action) = action else {
        return;
    };
    state.status_message = None;
    let now = Instant::now();
    let notch = state.config.wheel_notch;

    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.show_help = true,
        Action::SwitchView => state.switch_view(),
        Action::Next => match state.active_view {
            ActiveView::Stack => {
                state.drag_origin = None;
                state.stack.rotate_front_to_back();
            }
            ActiveView::Carousel => state.carousel.wheel(notch),
        },
        Action::Like => match state.active_view {
            ActiveView::Stack => {
                state.stack.like_front(now);
            }
            ActiveView::Carousel => {
                state.status_message = Some("Likes live on the stack view".into());
            }
        },
        Action::ScrollForward => {
            if state.active_view == ActiveView::Carousel {
                state.carousel.wheel(notch);
            }
        }
        Action::ScrollBack => {
            if state.active_view == ActiveView::Carousel {
                state.carousel.wheel(-notch);
            }
        }
    }
}

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.show_help {
        return;
    }
    match state.active_view {
        ActiveView::Stack => handle_stack_mouse(state, mouse),
        ActiveView::Carousel => handle_carousel_mouse(state, mouse),
    }
}

// ── Stack view ──────────────────────────────────────────────────

fn handle_stack_mouse(state: &mut AppState, mouse: MouseEvent) {
    let deck = AppLayout::from_area(state.terminal_area).deck_area;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(front) = state.stack.front() else {
                return;
            };
            let Some(shown) = state.stack.shown_transform(front) else {
                return;
            };
            if !stack_view::card_box(deck, &shown).contains(mouse.column, mouse.row) {
                return;
            }
            // The press both counts toward a double-click and starts a
            // drag; a press released in place just snaps back.
            state.stack.activate(front, Instant::now());
            if state.stack.begin_drag(front) {
                state.drag_origin = Some((mouse.column, mouse.row));
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some((dx, dy)) = drag_delta(state, &mouse) {
                state.stack.drag_to(dx, dy);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some((dx, dy)) = drag_delta(state, &mouse) {
                state.stack.release(dx, dy);
            }
            state.drag_origin = None;
        }
        _ => {}
    }
}

/// Pointer displacement since the drag started, in reference units.
fn drag_delta(state: &AppState, mouse: &MouseEvent) -> Option<(f32, f32)> {
    let (ox, oy) = state.drag_origin?;
    Some(stack_view::cells_to_units(
        mouse.column as i32 - ox as i32,
        mouse.row as i32 - oy as i32,
    ))
}

// ── Carousel view ───────────────────────────────────────────────

fn handle_carousel_mouse(state: &mut AppState, mouse: MouseEvent) {
    let deck = AppLayout::from_area(state.terminal_area).deck_area;
    let notch = state.config.wheel_notch;

    match mouse.kind {
        MouseEventKind::ScrollDown => state.carousel.wheel(notch),
        MouseEventKind::ScrollUp => state.carousel.wheel(-notch),
        MouseEventKind::Moved => {
            let cards = state.carousel.frame();
            let hit = carousel_view::hit_test(deck, &state.carousel, &cards, mouse.column, mouse.row);
            state.carousel.set_hovered(hit);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::item::{ItemId, ItemSet};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::layout::Rect;

    fn state() -> AppState {
        let mut s = AppState::new(ItemSet::demo(), AppConfig::default(), ActiveView::Stack);
        s.terminal_area = Rect::new(0, 0, 120, 40);
        s
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn front_centre(s: &AppState) -> (u16, u16) {
        let deck = AppLayout::from_area(s.terminal_area).deck_area;
        let front = s.stack.front().unwrap();
        let t = s.stack.shown_transform(front).unwrap();
        let (x, y) = stack_view::card_box(deck, &t).center();
        (x as u16, y as u16)
    }

    #[test]
    fn long_drag_rotates_the_stack() {
        let mut s = state();
        let (x, y) = front_centre(&s);
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), x + 10, y));
        assert!(s.stack.is_dragging());
        // 30 columns is 120 units, past the threshold.
        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), x + 30, y));
        assert_eq!(s.stack.front(), Some(ItemId(2)));
        assert!(s.drag_origin.is_none());
    }

    #[test]
    fn short_drag_snaps_back() {
        let mut s = state();
        let (x, y) = front_centre(&s);
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), x + 5, y + 2));
        assert_eq!(s.stack.front(), Some(ItemId(1)));
        assert!(!s.stack.is_dragging());
    }

    #[test]
    fn press_outside_the_front_card_is_ignored() {
        let mut s = state();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 0, 1));
        assert!(!s.stack.is_dragging());
        assert!(s.drag_origin.is_none());
    }

    #[test]
    fn double_click_likes_front() {
        let mut s = state();
        let (x, y) = front_centre(&s);
        for _ in 0..2 {
            handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), x, y));
            handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), x, y));
        }
        assert!(s.stack.liked().contains(ItemId(1)));
    }

    #[test]
    fn keys_drive_both_views() {
        let mut s = state();
        handle_key(&mut s, key(KeyCode::Char('n')));
        assert_eq!(s.stack.front(), Some(ItemId(2)));
        handle_key(&mut s, key(KeyCode::Char('l')));
        assert!(s.stack.liked().contains(ItemId(2)));

        handle_key(&mut s, key(KeyCode::Tab));
        assert_eq!(s.active_view, ActiveView::Carousel);
        let before = s.carousel.scroll().target;
        handle_key(&mut s, key(KeyCode::Down));
        assert!(s.carousel.scroll().target > before);
        handle_key(&mut s, key(KeyCode::Char('l')));
        assert!(s.status_message.is_some());
    }

    #[test]
    fn wheel_moves_the_carousel_target() {
        let mut s = state();
        s.switch_view();
        let before = s.carousel.scroll().target;
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 60, 20));
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 60, 20));
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollUp, 60, 20));
        let delta = s.carousel.scroll().target - before;
        assert!((delta - 100.0 * 0.002).abs() < 1e-5);
    }

    #[test]
    fn hover_follows_the_pointer() {
        let mut s = state();
        s.switch_view();
        let deck = AppLayout::from_area(s.terminal_area).deck_area;
        let cards = s.carousel.frame();
        let (cx, cy) = carousel_view::card_box(deck, &cards[cards.len() / 2].transform).center();
        handle_mouse(&mut s, mouse(MouseEventKind::Moved, cx as u16, cy as u16));
        assert!(s.carousel.hovered().is_some());
        handle_mouse(&mut s, mouse(MouseEventKind::Moved, 0, 0));
        assert_eq!(s.carousel.hovered(), None);
    }

    #[test]
    fn help_swallows_deck_keys() {
        let mut s = state();
        handle_key(&mut s, key(KeyCode::Char('?')));
        assert!(s.show_help);
        handle_key(&mut s, key(KeyCode::Char('n')));
        assert_eq!(s.stack.front(), Some(ItemId(1)));
        handle_key(&mut s, key(KeyCode::Esc));
        assert!(!s.show_help);
        assert!(!s.should_quit);
    }
}

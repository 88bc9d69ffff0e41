//! User configuration — keybindings, gesture tuning and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/card-deck/config.toml` (default `~/.config/card-deck/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::core::{carousel::CarouselConfig, stack::StackConfig};

// ───────────────────────────────────────── actions ───────────

/// All configurable keyboard actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Send the front card to the back, as if swiped away.
    Next,
    Like,
    SwitchView,
    ScrollBack,
    ScrollForward,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::Next,
        Action::Like,
        Action::SwitchView,
        Action::ScrollBack,
        Action::ScrollForward,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::Next => "Next Card",
            Action::Like => "Like Front Card",
            Action::SwitchView => "Stack / Carousel",
            Action::ScrollBack => "Scroll Back",
            Action::ScrollForward => "Scroll Forward",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::Next => "next",
            Action::Like => "like",
            Action::SwitchView => "switch_view",
            Action::ScrollBack => "scroll_back",
            Action::ScrollForward => "scroll_forward",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => code_name(other),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&code_name(self.code));
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Single characters keep their case: `L` and `l` are different keys.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn code_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("line {line}: `{key}` expects {expected}, got `{value}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("cannot write config to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration — keybindings and gesture tuning.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Per-axis release distance (reference units) that swipes a card away.
    pub swipe_threshold: f32,
    /// Double-click detection window for liking the front card.
    pub double_click_ms: u64,
    /// Lifetime of the like pulse overlay.
    pub like_pulse_ms: u64,
    /// Frame interval of the animation loop.
    pub frame_ms: u64,
    /// Wheel delta reported per scroll notch.
    pub wheel_notch: f32,
    /// Number of photos in the swipe stack.
    pub stack_size: usize,
    /// Damping rate of cards gliding to a new pose (1/s).
    pub settle_rate: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            swipe_threshold: 100.0,
            double_click_ms: 250,
            like_pulse_ms: 800,
            frame_ms: 16,
            wheel_notch: 100.0,
            stack_size: 4,
            settle_rate: 12.0,
        }
    }
}

impl AppConfig {
    /// Built-in key bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Next, vec![KeyBind::new(Right, n), KeyBind::new(Char('n'), n)]);
        m.insert(Like, vec![KeyBind::new(Char('l'), n), KeyBind::new(Enter, n)]);
        m.insert(SwitchView, vec![KeyBind::new(Tab, n)]);
        m.insert(ScrollBack, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollForward, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"→/n"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "drag: swipe | dbl-click/{}: like | {}: next | {}: switch view | {}: help",
            self.short_binding(Action::Like),
            self.short_binding(Action::Next),
            self.short_binding(Action::SwitchView),
            self.short_binding(Action::Help),
        )
    }

    pub fn stack_config(&self) -> StackConfig {
        StackConfig {
            swipe_threshold: self.swipe_threshold,
            settle_rate: self.settle_rate,
            double_click: Duration::from_millis(self.double_click_ms),
            like_pulse: Duration::from_millis(self.like_pulse_ms),
            ..StackConfig::default()
        }
    }

    pub fn carousel_config(&self) -> CarouselConfig {
        CarouselConfig::default()
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.  Bad lines are
    /// logged and skipped.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let (config, errors) = Self::parse_config(&contents);
                for err in errors {
                    tracing::warn!("{}: {err}", path.display());
                }
                config
            }
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to disk.  Returns the path written.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path();
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, self.serialise())
        };
        write().map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn parse_config(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();

        for (idx, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if let Err(e) = config.apply(idx + 1, key, value) {
                errors.push(e);
            }
        }

        (config, errors)
    }

    /// Apply one `key = value` line.  Numeric values are clamped to a sane
    /// range; unknown keys are ignored.
    fn apply(&mut self, line: usize, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |expected| ConfigError::InvalidValue {
            line,
            key: key.to_string(),
            value: value.to_string(),
            expected,
        };
        match key {
            "swipe_threshold" => {
                let v = parse_finite(value).ok_or_else(|| invalid("a number"))?;
                self.swipe_threshold = v.clamp(10.0, 1000.0);
            }
            "double_click_ms" => {
                let v: u64 = value.parse().map_err(|_| invalid("milliseconds"))?;
                self.double_click_ms = v.clamp(100, 2000);
            }
            "like_pulse_ms" => {
                let v: u64 = value.parse().map_err(|_| invalid("milliseconds"))?;
                self.like_pulse_ms = v.clamp(100, 5000);
            }
            "frame_ms" => {
                let v: u64 = value.parse().map_err(|_| invalid("milliseconds"))?;
                self.frame_ms = v.clamp(5, 100);
            }
            "wheel_notch" => {
                let v = parse_finite(value).ok_or_else(|| invalid("a number"))?;
                self.wheel_notch = v.clamp(1.0, 1000.0);
            }
            "stack_size" => {
                let v: usize = value.parse().map_err(|_| invalid("a card count"))?;
                self.stack_size = v.clamp(1, 16);
            }
            "settle_rate" => {
                let v = parse_finite(value).ok_or_else(|| invalid("a number"))?;
                self.settle_rate = v.clamp(1.0, 60.0);
            }
            _ => {
                let Some(action) = Action::from_config_key(key) else {
                    return Ok(());
                };
                let parsed: Vec<KeyBind> = value
                    .split(',')
                    .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                    .collect();
                if parsed.is_empty() {
                    return Err(invalid("a comma-separated key list"));
                }
                self.bindings.insert(action, parsed);
            }
        }
        Ok(())
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# card-deck configuration".to_string(),
            String::new(),
            "# Gestures".to_string(),
            format!("swipe_threshold = {}", self.swipe_threshold),
            format!("double_click_ms = {}", self.double_click_ms),
            format!("like_pulse_ms = {}", self.like_pulse_ms),
            format!("wheel_notch = {}", self.wheel_notch),
            String::new(),
            "# Animation".to_string(),
            format!("frame_ms = {}", self.frame_ms),
            format!("settle_rate = {}", self.settle_rate),
            format!("stack_size = {}", self.stack_size),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `value` as a finite float.  `NaN` and `inf` parse as `f32` but would
/// slip through `clamp`.
fn parse_finite(value: &str) -> Option<f32> {
    value.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Return the config file path (`$XDG_CONFIG_HOME/card-deck/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("card-deck").join("config.toml")
}

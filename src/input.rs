/// Keyboard state as the simulation sees it.
///
/// The game only ever asks one question: "is this key held right now?".
/// `InputState` is that question; `HeldKeys` answers it from a stream of
/// press / repeat / release events.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Char(char),
}

/// Quits the game; never available as a binding.
pub const QUIT_KEY: Key = Key::Char('q');

impl Key {
    /// The key a terminal reports for the character `c`.  Letters are
    /// case-folded so shift does not change which key is held.
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => Key::Space,
            c => Key::Char(c.to_ascii_lowercase()),
        }
    }

    /// The form `from_char` would produce for this key.
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::from_char(c),
            key => key,
        }
    }
}

/// The three actions the player can take, each bound to one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Key,
    pub move_right: Key,
    pub fire: Key,
}

impl KeyBindings {
    pub fn normalized(self) -> Self {
        Self {
            move_left: self.move_left.normalized(),
            move_right: self.move_right.normalized(),
            fire: self.fire.normalized(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Key)> {
        [
            ("move_left", self.move_left),
            ("move_right", self.move_right),
            ("fire", self.fire),
        ]
        .into_iter()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: Key::Left,
            move_right: Key::Right,
            fire: Key::Space,
        }
    }
}

/// Held-state query, sampled once per tick.
pub trait InputState {
    fn is_held(&self, key: Key) -> bool;
}

impl InputState for HashSet<Key> {
    fn is_held(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

/// Nothing held.  Handy for ticking the world without a keyboard.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputState for NoInput {
    fn is_held(&self, _key: Key) -> bool {
        false
    }
}

// ── Event-driven held-key tracking ───────────────────────────────────────────

/// Seconds a key stays "held" after its last press/repeat event when the
/// terminal never reports a release.  OS key-repeat runs at ≥ 15 Hz, so this
/// is refreshed well before it expires while the key is down.
pub const DEFAULT_HOLD_WINDOW: f64 = 0.15;

/// Tracks which keys are held from press / repeat / release events.
///
/// Terminals with keyboard-enhancement support report releases and keys are
/// dropped immediately.  Classic terminals only send repeated presses, so a
/// key also expires once it has been silent for longer than the hold window.
#[derive(Clone, Debug)]
pub struct HeldKeys {
    last_seen: HashMap<Key, f64>,
    hold_window: f64,
    now: f64,
}

impl Default for HeldKeys {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_WINDOW)
    }
}

impl HeldKeys {
    pub fn new(hold_window: f64) -> Self {
        Self {
            last_seen: HashMap::new(),
            hold_window,
            now: 0.0,
        }
    }

    /// Move the tracker's notion of "now" forward (seconds).
    pub fn set_time(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// A press or an auto-repeat of `key`.
    pub fn press(&mut self, key: Key) {
        self.last_seen.insert(key, self.now);
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

impl InputState for HeldKeys {
    fn is_held(&self, key: Key) -> bool {
        self.last_seen
            .get(&key)
            .map(|&last| self.now - last <= self.hold_window)
            .unwrap_or(false)
    }
}

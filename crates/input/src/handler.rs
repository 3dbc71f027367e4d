//! DAS/ARR repeat for held movement keys.
//!
//! The first press of a movement key acts immediately. Holding left or right
//! past the delayed auto shift (DAS) repeats the move every auto repeat rate
//! (ARR) interval. Holding down only reports [`InputHandler::is_soft_dropping`];
//! the faster fall comes from the game's soft-drop interval. Terminals that never send key releases are handled by treating a
//! key as released once no movement key press arrived for a while.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::{held_key, HeldKey};
use crate::types::{GameAction, DEFAULT_ARR_MS, DEFAULT_DAS_MS};

/// Most repeats a single update can emit
pub const MAX_REPEATS_PER_UPDATE: usize = 32;

const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// DAS/ARR timer for one held key
#[derive(Debug, Clone, Copy)]
struct Repeater {
    delay_ms: u32,
    rate_ms: u32,
    held_ms: u32,
    accum_ms: u32,
}

impl Repeater {
    fn new(delay_ms: u32, rate_ms: u32) -> Self {
        Self {
            delay_ms,
            rate_ms: rate_ms.max(1),
            held_ms: 0,
            accum_ms: 0,
        }
    }

    fn restart(&mut self) {
        self.held_ms = 0;
        self.accum_ms = 0;
    }

    /// Count repeats due after `elapsed_ms` more of holding
    fn advance(&mut self, elapsed_ms: u32) -> u32 {
        let before = self.held_ms;
        self.held_ms = self.held_ms.saturating_add(elapsed_ms);
        if self.held_ms < self.delay_ms {
            return 0;
        }
        // Only time past the delay counts toward repeats.
        self.accum_ms += if before < self.delay_ms {
            self.held_ms - self.delay_ms
        } else {
            elapsed_ms
        };
        let repeats = self.accum_ms / self.rate_ms;
        self.accum_ms %= self.rate_ms;
        repeats
    }
}

/// Tracks held movement keys and turns them into repeated actions.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Held horizontal key, if any (only `Left` or `Right`)
    horizontal: Option<HeldKey>,
    down_held: bool,
    horizontal_repeat: Repeater,
    /// Time since the last movement key press
    idle_ms: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    /// Horizontal DAS and ARR
    pub fn with_config(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            horizontal: None,
            down_held: false,
            horizontal_repeat: Repeater::new(das_ms, arr_ms),
            idle_ms: 0,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.down_held
    }

    /// Returns the immediate action for a newly pressed movement key.
    ///
    /// Terminal auto-repeat of an already held key only refreshes it.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        let key = held_key(code)?;
        self.idle_ms = 0;
        match key {
            HeldKey::Down => {
                if self.down_held {
                    return None;
                }
                self.down_held = true;
            }
            HeldKey::Left | HeldKey::Right => {
                if self.horizontal == Some(key) {
                    return None;
                }
                self.horizontal = Some(key);
                self.horizontal_repeat.restart();
            }
        }
        Some(key.action())
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        match held_key(code) {
            Some(HeldKey::Down) => self.release_down(),
            Some(key) if self.horizontal == Some(key) => self.release_horizontal(),
            _ => {}
        }
    }

    fn release_horizontal(&mut self) {
        self.horizontal = None;
        self.horizontal_repeat.restart();
    }

    fn release_down(&mut self) {
        self.down_held = false;
    }

    /// Advance the repeat timer and collect due horizontal repeats
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, MAX_REPEATS_PER_UPDATE> {
        let mut actions = ArrayVec::new();

        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > self.key_release_timeout_ms {
            self.release_horizontal();
            self.release_down();
        }

        if let Some(key) = self.horizontal {
            for _ in 0..self.horizontal_repeat.advance(elapsed_ms) {
                let _ = actions.try_push(key.action());
            }
        }
        actions
    }

    pub fn reset(&mut self) {
        self.release_horizontal();
        self.release_down();
        self.idle_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

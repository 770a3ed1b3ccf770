//! Per-frame key sampler for terminal environments.
//!
//! Collects key events between frames and produces one [`InputFrame`] per
//! frame. When the terminal never reports releases, a held key is released
//! once no press or repeat for it has arrived within the release timeout.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::map_key;
use crate::types::{InputFrame, Key};

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers repeats.
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

/// Tracks held keys and press edges between frames.
#[derive(Debug, Clone)]
pub struct KeySampler {
    /// Last press/repeat time of each held key, indexed by [`Key::index`]
    held: [Option<u64>; Key::ALL.len()],
    pressed: InputFrame,
    key_release_timeout_ms: u64,
    /// Set once the terminal reports a release; timeouts are no longer needed
    release_events: bool,
}

impl KeySampler {
    pub fn new() -> Self {
        Self {
            held: [None; Key::ALL.len()],
            pressed: InputFrame::new(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            release_events: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u64 {
        self.key_release_timeout_ms
    }

    /// Whether this terminal has been seen to report key releases
    pub fn reports_releases(&self) -> bool {
        self.release_events
    }

    /// Feed one terminal key event received at `now_ms`.
    ///
    /// Returns the logical key, if the event maps to one.
    pub fn handle_key(&mut self, event: KeyEvent, now_ms: u64) -> Option<Key> {
        let key = map_key(event)?;
        let slot = &mut self.held[key.index()];

        match event.kind {
            KeyEventKind::Press => {
                // Auto-repeat arrives as fresh presses without key-release support.
                if !(key.repeats() && slot.is_some()) {
                    self.pressed.press(key);
                }
                *slot = Some(now_ms);
            }
            KeyEventKind::Repeat => {
                *slot = Some(now_ms);
            }
            KeyEventKind::Release => {
                if !self.release_events {
                    tracing::debug!("terminal reports key releases");
                }
                self.release_events = true;
                *slot = None;
            }
        }

        Some(key)
    }

    /// Produce the input frame for `now_ms` and start collecting the next one.
    pub fn sample(&mut self, now_ms: u64) -> InputFrame {
        let mut frame = self.pressed;
        self.pressed = InputFrame::new();

        for key in Key::ALL {
            let slot = &mut self.held[key.index()];
            let Some(last) = *slot else {
                continue;
            };
            if !self.release_events && now_ms.saturating_sub(last) > self.key_release_timeout_ms {
                *slot = None;
                continue;
            }
            frame.hold(key);
        }

        frame
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()].is_some()
    }

    /// Forget every held key and pending press.
    pub fn reset(&mut self) {
        self.held = [None; Key::ALL.len()];
        self.pressed = InputFrame::new();
    }
}

impl Default for KeySampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_press_is_reported_once() {
        let mut sampler = KeySampler::new();
        sampler.handle_key(event(KeyCode::Up, KeyEventKind::Press), 0);

        let frame = sampler.sample(5);
        assert!(frame.just_pressed(Key::Up));

        let frame = sampler.sample(20);
        assert!(!frame.just_pressed(Key::Up));
    }

    #[test]
    fn test_auto_release_triggers_after_timeout_without_key_release_events() {
        let mut sampler = KeySampler::new().with_key_release_timeout_ms(50);
        sampler.handle_key(event(KeyCode::Left, KeyEventKind::Press), 0);

        assert!(sampler.sample(50).is_down(Key::Left));
        assert!(!sampler.sample(51).is_down(Key::Left));
        assert!(!sampler.is_held(Key::Left));
    }

    #[test]
    fn test_repeated_press_on_held_movement_key_is_not_a_new_press() {
        let mut sampler = KeySampler::new();
        sampler.handle_key(event(KeyCode::Left, KeyEventKind::Press), 0);
        assert!(sampler.sample(1).just_pressed(Key::Left));

        sampler.handle_key(event(KeyCode::Left, KeyEventKind::Press), 100);
        let frame = sampler.sample(101);
        assert!(!frame.just_pressed(Key::Left));
        assert!(frame.is_down(Key::Left));
    }

    #[test]
    fn test_repeated_press_on_rotate_is_a_new_press() {
        let mut sampler = KeySampler::new();
        sampler.handle_key(event(KeyCode::Up, KeyEventKind::Press), 0);
        sampler.sample(1);
        sampler.handle_key(event(KeyCode::Up, KeyEventKind::Press), 30);
        assert!(sampler.sample(31).just_pressed(Key::Up));
    }

    #[test]
    fn test_release_events_disable_timeout() {
        let mut sampler = KeySampler::new().with_key_release_timeout_ms(50);
        sampler.handle_key(event(KeyCode::Down, KeyEventKind::Press), 0);
        sampler.handle_key(event(KeyCode::Down, KeyEventKind::Release), 10);
        assert!(sampler.reports_releases());

        sampler.handle_key(event(KeyCode::Down, KeyEventKind::Press), 20);
        assert!(sampler.sample(1_000).is_down(Key::Down));

        sampler.handle_key(event(KeyCode::Down, KeyEventKind::Release), 1_010);
        assert!(!sampler.sample(1_011).is_down(Key::Down));
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let mut sampler = KeySampler::new();
        assert_eq!(sampler.handle_key(event(KeyCode::Char('x'), KeyEventKind::Press), 0), None);
        assert!(sampler.sample(1).is_empty());
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut sampler = KeySampler::new().with_key_release_timeout_ms(10_000);
        sampler.handle_key(event(KeyCode::Right, KeyEventKind::Press), 0);
        sampler.reset();
        assert!(sampler.sample(1).is_empty());
    }
}

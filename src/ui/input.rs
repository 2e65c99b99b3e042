/// Keyboard input.
///
/// Presses are collected every frame and folded into the pending
/// `SpriteInput` until the next tick consumes it:
///   - Movement: the latest direction pressed wins
///   - Action / drop / travel: sticky until the tick that applies them
///
/// Only Press and Repeat events count. Release events are ignored, so
/// terminals without keyboard enhancement behave the same.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::sprite::MoveDir;
use crate::sim::step::SpriteInput;

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_ACTION: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_DROP: &[KeyCode] = &[KeyCode::Char('g'), KeyCode::Char('G')];
const KEYS_TRAVEL: &[KeyCode] = &[KeyCode::Char('t'), KeyCode::Char('T')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Keys pressed (or auto-repeated) during the most recent drain.
    pressed: Vec<KeyCode>,
    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            pressed: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame.
    pub fn drain_events(&mut self) {
        self.pressed.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.pressed.push(key.code);
                    self.raw_events.push(key);
                }
            }
        }
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.pressed.contains(c))
    }

    pub fn quit_pressed(&self) -> bool {
        let ctrl_c = self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        });
        ctrl_c || self.any_pressed(KEYS_QUIT)
    }

    fn movement(&self) -> Option<MoveDir> {
        self.pressed.iter().rev().find_map(|code| {
            if KEYS_LEFT.contains(code) {
                Some(MoveDir::Left)
            } else if KEYS_RIGHT.contains(code) {
                Some(MoveDir::Right)
            } else if KEYS_UP.contains(code) {
                Some(MoveDir::Up)
            } else if KEYS_DOWN.contains(code) {
                Some(MoveDir::Down)
            } else {
                None
            }
        })
    }

    /// Fold this frame's presses into the input waiting for the next tick.
    /// `other_map` is where the travel key sends the sprite.
    pub fn fold_into(&self, pending: &mut SpriteInput, other_map: &str) {
        if let Some(dir) = self.movement() {
            pending.movement = Some(dir);
        }
        if self.any_pressed(KEYS_ACTION) {
            pending.action = true;
        }
        if self.any_pressed(KEYS_DROP) {
            pending.drop = true;
        }
        if self.any_pressed(KEYS_TRAVEL) {
            pending.travel_to = Some(other_map.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sprite::SpriteId;

    fn with_keys(keys: &[KeyCode]) -> InputState {
        let mut kb = InputState::new();
        kb.pressed.extend_from_slice(keys);
        kb
    }

    #[test]
    fn latest_direction_wins() {
        let kb = with_keys(&[KeyCode::Left, KeyCode::Char('s')]);
        assert_eq!(kb.movement(), Some(MoveDir::Down));
    }

    #[test]
    fn presses_stay_pending_until_consumed() {
        let mut pending = SpriteInput::idle(SpriteId(0));
        with_keys(&[KeyCode::Char(' ')]).fold_into(&mut pending, "start");
        with_keys(&[KeyCode::Right]).fold_into(&mut pending, "start");
        with_keys(&[]).fold_into(&mut pending, "start");
        assert!(pending.action);
        assert_eq!(pending.movement, Some(MoveDir::Right));
        assert!(!pending.drop);
        assert!(pending.travel_to.is_none());
    }

    #[test]
    fn travel_targets_the_other_map() {
        let mut pending = SpriteInput::idle(SpriteId(0));
        with_keys(&[KeyCode::Char('t')]).fold_into(&mut pending, "start");
        assert_eq!(pending.travel_to.as_deref(), Some("start"));
    }

    #[test]
    fn escape_quits() {
        assert!(with_keys(&[KeyCode::Esc]).quit_pressed());
        assert!(!with_keys(&[KeyCode::Char('x')]).quit_pressed());
    }
}

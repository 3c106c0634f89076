// Redex - Abstract Machine Debugger
// Copyright (C) 2025 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Keyboard dispatch.
//!
//! Input handling is split into a pure key-to-action mapping and the
//! stateful dispatch in [`crate::App`], so the bindings are testable
//! without a terminal and the listener lifecycle stays out of the control
//! flow. Exactly one action fires per key press.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Frames skipped by a Shift-accelerated step
const STRIDE: usize = 50;

/// Everything a key press can ask the debugger to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Step forward by `stride` frames (source view ignores the stride)
    Next {
        /// Number of frames to advance in term view
        stride: usize,
    },
    /// Step backward by `stride` frames
    Previous {
        /// Number of frames to retreat in term view
        stride: usize,
    },
    /// Tear the session down and leave
    Quit,
    /// Cycle to the next trace (ignored when only one exists)
    NextTrace,
    /// Toggle between term and source view (ignored without a location)
    ToggleSource,
    /// Clear a fatal error and restart trace creation from scratch
    Retry,
    /// Close the return-value modal without moving
    DismissModal,
    /// Move pane focus (Term -> Context -> Env)
    FocusNext,
    /// Scroll the focused pane up one line
    ScrollUp,
    /// Scroll the focused pane down one line
    ScrollDown,
}

/// Map a key press to an action.
///
/// The caller has already filtered on `KeyEventKind::Press`; key release
/// and repeat events never reach this function.
pub fn key_to_action(key: &KeyEvent) -> Option<Action> {
    let stride = if key.modifiers.contains(KeyModifiers::SHIFT) { STRIDE } else { 1 };
    match key.code {
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => Some(Action::Next { stride }),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Left => {
            Some(Action::Previous { stride })
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Action::NextTrace),
        KeyCode::Char('v') | KeyCode::Char('V') => Some(Action::ToggleSource),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Retry),
        KeyCode::Esc => Some(Action::DismissModal),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::Down => Some(Action::ScrollDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_to_action(&press(KeyCode::Char('n'))), Some(Action::Next { stride: 1 }));
        assert_eq!(key_to_action(&press(KeyCode::Char('p'))), Some(Action::Previous { stride: 1 }));
        assert_eq!(key_to_action(&press(KeyCode::Right)), Some(Action::Next { stride: 1 }));
        assert_eq!(key_to_action(&press(KeyCode::Left)), Some(Action::Previous { stride: 1 }));
    }

    #[test]
    fn test_shift_strides() {
        let key = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(&key), Some(Action::Next { stride: 50 }));
        let key = KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT);
        assert_eq!(key_to_action(&key), Some(Action::Previous { stride: 50 }));
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(key_to_action(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(key_to_action(&press(KeyCode::Char('t'))), Some(Action::NextTrace));
        assert_eq!(key_to_action(&press(KeyCode::Char('v'))), Some(Action::ToggleSource));
        assert_eq!(key_to_action(&press(KeyCode::Char('r'))), Some(Action::Retry));
        assert_eq!(key_to_action(&press(KeyCode::Esc)), Some(Action::DismissModal));
    }

    #[test]
    fn test_unbound_keys_do_nothing() {
        assert_eq!(key_to_action(&press(KeyCode::Char('x'))), None);
        assert_eq!(key_to_action(&press(KeyCode::Enter)), None);
        assert_eq!(key_to_action(&press(KeyCode::F(1))), None);
    }
}

//=========================================================================
// Key Mapper
//=========================================================================
//
// Converts Winit keyboard events into watch button transitions.
//
// Architecture:
//   Winit KeyEvent → KeyMapper → ButtonInput → ButtonInjector → SimHost
//
// Layout:
//   Up      ← ArrowUp, W
//   Select  ← Enter, Space, ArrowRight
//   Down    ← ArrowDown, S
//   Back    ← Escape, Backspace, ArrowLeft
//
// OS key repeats are filtered: a held key is one press, as on the watch.
// Keys outside the layout are dropped (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::ButtonId;
use crate::platform::sim::ButtonInput;

//=== KeyMapper ===========================================================

/// Stateless keyboard → button translation.
pub(crate) struct KeyMapper;

impl KeyMapper {
    /// Converts a Winit key event (filters repeats and unmapped keys).
    pub(crate) fn process_key_event(key_event: &KeyEvent) -> Option<ButtonInput> {
        Self::translate(key_event.physical_key, key_event.state, key_event.repeat)
    }

    //--- Internal Helpers -------------------------------------------------

    fn translate(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<ButtonInput> {
        if repeat {
            return None;
        }

        let button = match key {
            PhysicalKey::Code(code) => button_for(code)?,
            PhysicalKey::Unidentified(_) => return None,
        };

        Some(match state {
            ElementState::Pressed => ButtonInput::down(button),
            ElementState::Released => ButtonInput::up(button),
        })
    }
}

/// Maps a physical key to the watch button it stands for.
pub(crate) fn button_for(code: KeyCode) -> Option<ButtonId> {
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(ButtonId::Up),
        KeyCode::Enter | KeyCode::Space | KeyCode::ArrowRight => Some(ButtonId::Select),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(ButtonId::Down),
        KeyCode::Escape | KeyCode::Backspace | KeyCode::ArrowLeft => Some(ButtonId::Back),
        _ => None,
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn layout_covers_every_button() {
        assert_eq!(button_for(KeyCode::ArrowUp), Some(ButtonId::Up));
        assert_eq!(button_for(KeyCode::KeyW), Some(ButtonId::Up));
        assert_eq!(button_for(KeyCode::Enter), Some(ButtonId::Select));
        assert_eq!(button_for(KeyCode::Space), Some(ButtonId::Select));
        assert_eq!(button_for(KeyCode::ArrowRight), Some(ButtonId::Select));
        assert_eq!(button_for(KeyCode::ArrowDown), Some(ButtonId::Down));
        assert_eq!(button_for(KeyCode::KeyS), Some(ButtonId::Down));
        assert_eq!(button_for(KeyCode::Escape), Some(ButtonId::Back));
        assert_eq!(button_for(KeyCode::Backspace), Some(ButtonId::Back));
        assert_eq!(button_for(KeyCode::ArrowLeft), Some(ButtonId::Back));
    }

    #[test]
    fn other_keys_are_unmapped() {
        assert_eq!(button_for(KeyCode::KeyA), None);
        assert_eq!(button_for(KeyCode::F13), None);
    }

    #[test]
    fn press_and_release_translate() {
        let down = KeyMapper::translate(PhysicalKey::Code(KeyCode::Enter), ElementState::Pressed, false);
        assert_eq!(down, Some(ButtonInput::down(ButtonId::Select)));

        let up = KeyMapper::translate(PhysicalKey::Code(KeyCode::Enter), ElementState::Released, false);
        assert_eq!(up, Some(ButtonInput::up(ButtonId::Select)));
    }

    #[test]
    fn repeats_are_filtered() {
        let repeat = KeyMapper::translate(PhysicalKey::Code(KeyCode::ArrowUp), ElementState::Pressed, true);
        assert_eq!(repeat, None);
    }

    #[test]
    fn unidentified_keys_are_filtered() {
        let key = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);
        assert_eq!(KeyMapper::translate(key, ElementState::Pressed, false), None);
    }
}

//=========================================================================
// Button State Tracker
//=========================================================================
//
// Level-triggered state for the three tracked watch buttons.
//
// Architecture:
//   ButtonEvent (raw) → apply() → [bool; 3] → is_pressed()
//
// Raw press sets a slot, raw release clears it. There is no debounce and
// no click-type distinction; clicks pass through untouched.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{ButtonEvent, ButtonId};

//=== ButtonStates ========================================================

/// Pressed/released state for Up, Select and Down.
///
/// Every slot starts released. Each button is independent of the other two.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonStates {
    pressed: [bool; 3],
}

impl ButtonStates {
    /// Creates a tracker with all buttons released.
    pub const fn new() -> Self {
        Self { pressed: [false; 3] }
    }

    //--- Mutation ---------------------------------------------------------

    /// Marks a button as pressed. Untracked ids are ignored.
    pub fn press(&mut self, button: ButtonId) {
        self.set(button, true);
    }

    /// Marks a button as released. Untracked ids are ignored.
    pub fn release(&mut self, button: ButtonId) {
        self.set(button, false);
    }

    /// Applies a host button event.
    ///
    /// Returns `true` if the event was a raw transition on a tracked button.
    pub fn apply(&mut self, event: ButtonEvent) -> bool {
        match event {
            ButtonEvent::Pressed(id) => self.set(id, true),
            ButtonEvent::Released(id) => self.set(id, false),
            ButtonEvent::Clicked(_) => false,
        }
    }

    /// Releases every button.
    pub fn clear(&mut self) {
        self.pressed = [false; 3];
    }

    fn set(&mut self, button: ButtonId, pressed: bool) -> bool {
        match button.slot() {
            Some(slot) => {
                trace!(target: "pge::input", "{:?} -> {}", button, pressed);
                self.pressed[slot] = pressed;
                true
            }
            None => false,
        }
    }

    //--- Query API --------------------------------------------------------

    /// Returns the current state of `button`; `false` for untracked ids.
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        button.slot().is_some_and(|slot| self.pressed[slot])
    }

    /// Returns an iterator over the tracked buttons currently held.
    pub fn pressed(&self) -> impl Iterator<Item = ButtonId> + '_ {
        ButtonId::TRACKED
            .into_iter()
            .filter(|button| self.is_pressed(*button))
    }
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Debug for ButtonStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pressed: Vec<_> = self.pressed().collect();
        f.debug_struct("ButtonStates")
            .field("pressed", &pressed)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

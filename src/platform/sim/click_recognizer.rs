//=========================================================================
// Click Recognizer
//=========================================================================
//
// Turns physical button transitions into raw events plus recognized
// single clicks.
//
// Architecture:
//   ButtonInput (down/up + timestamp) → ClickRecognizer → ButtonEvent*
//
// A release that follows its press within the click window yields
// `Released` then `Clicked`. Repeated presses without a release and
// releases without a press are filtered.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::input::{ButtonEvent, ButtonId};

//=== ButtonInput =========================================================

/// A physical button transition as reported by the hardware (or keyboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonInput {
    pub button: ButtonId,
    pub pressed: bool,
}

impl ButtonInput {
    pub const fn down(button: ButtonId) -> Self {
        Self { button, pressed: true }
    }

    pub const fn up(button: ButtonId) -> Self {
        Self { button, pressed: false }
    }
}

//=== ClickRecognizer =====================================================

pub(crate) struct ClickRecognizer {
    click_window: Duration,
    pressed_at: HashMap<ButtonId, Duration>,
}

impl ClickRecognizer {
    pub(crate) fn new(click_window: Duration) -> Self {
        Self {
            click_window,
            pressed_at: HashMap::with_capacity(4),
        }
    }

    /// Processes one transition observed at virtual time `now`.
    pub(crate) fn process(&mut self, input: ButtonInput, now: Duration) -> Vec<ButtonEvent> {
        let ButtonInput { button, pressed } = input;

        if pressed {
            if self.pressed_at.contains_key(&button) {
                trace!(target: "platform::input", "Ignoring repeated press of {:?}", button);
                return Vec::new();
            }
            self.pressed_at.insert(button, now);
            return vec![ButtonEvent::Pressed(button)];
        }

        match self.pressed_at.remove(&button) {
            Some(since) if now.saturating_sub(since) <= self.click_window => {
                vec![ButtonEvent::Released(button), ButtonEvent::Clicked(button)]
            }
            Some(_) => vec![ButtonEvent::Released(button)],
            None => {
                trace!(target: "platform::input", "Ignoring stray release of {:?}", button);
                Vec::new()
            }
        }
    }

    /// Returns `true` while `button` is physically held.
    pub(crate) fn is_held(&self, button: ButtonId) -> bool {
        self.pressed_at.contains_key(&button)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Input
//=========================================================================
//
// Button identifiers, host button events and the level-triggered
// button state tracker used by engines.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{ButtonEvent, ButtonId};
pub use state_tracker::ButtonStates;

//=========================================================================
// Core Systems
//=========================================================================
//
// Host-independent building blocks of the game loop.
//
// Architecture:
//   Runtime<H>
//     ├─ Engine<H>      (crate::engine)
//     │    ├─ FrameScheduler
//     │    └─ ButtonStates
//     └─ TitleScreen    (crate::title)
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod input;
pub mod runtime;
pub mod scheduler;

//=== Public API ==========================================================

pub use error::EngineError;
pub use input::{ButtonEvent, ButtonId, ButtonStates};
pub use runtime::{Component, ComponentId, Dispatch, Runtime};
pub use scheduler::FrameScheduler;

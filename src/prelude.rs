//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use pge_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{
    CycleOutcome, Engine, EngineBuilder, EngineState, Frame, DEFAULT_FRAME_PERIOD,
};

// Runtime and errors
pub use crate::core::error::EngineError;
pub use crate::core::runtime::{Component, ComponentId, Dispatch, Runtime};

// Input
pub use crate::core::input::{ButtonEvent, ButtonId, ButtonStates};

// Title screen
pub use crate::title::{TitleScreen, TITLE_LENGTH_MAX};

// Host contract
pub use crate::platform::geometry::{GColor, GPoint, GRect, GSize, SCREEN_BOUNDS};
pub use crate::platform::{
    ClickConfig, Host, HostEvent, LayerId, LayerService, PlatformError, ResourceId, SystemFont,
    TextAlignment, TimerHandle, TimerService, WindowId, WindowService,
};

// Hosts
pub use crate::platform::desktop::{run_desktop, DesktopApp, DesktopConfig};
pub use crate::platform::sim::{Canvas, DrawCommand, SimHost};

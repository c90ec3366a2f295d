//=========================================================================
// Platform Subsystem
//
// The contract between engines and the watch host they run on.
//
// Architecture:
// ```text
//  Host (watch OS / SimHost)            Components
//  ┌──────────────────────────┐        ┌──────────────────┐
//  │  TimerService            │◀───────│  FrameScheduler  │
//  │  LayerService            │◀───────│  Engine          │
//  │  WindowService           │◀───────│  TitleScreen     │
//  │   ↓                      │        │                  │
//  │  poll_event()            │        │  handle_event()  │
//  │   ├─ TimerFired          │        │                  │
//  │   ├─ Redraw(layer)       │───────▶│                  │
//  │   ├─ Button { .. }       │        │                  │
//  │   └─ WindowLoad/Unload   │        │                  │
//  └──────────────────────────┘        └──────────────────┘
// ```
//
// Key Design Decisions:
// - **Handles, not pointers**: events carry the timer, layer or window
//   handle they concern; each component matches them against its own
//   handles. No component state is stored inside host objects.
// - **Deferred drawing**: timers only mark layers dirty. The host decides
//   when to run the redraw pass and hands out the draw context.
// - **Single thread**: every call happens on the host's event thread.
//
// Backends:
// - `sim`: deterministic in-memory host with a virtual clock
// - `desktop`: winit window that drives `SimHost` in real time
//
//=========================================================================

//=== Submodules ==========================================================

pub mod desktop;
pub mod geometry;
pub mod sim;

//=== External Dependencies ===============================================

use std::collections::BTreeSet;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::input::{ButtonEvent, ButtonId};
use geometry::{GColor, GRect};

//=== Handles =============================================================

/// Identifies a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// Identifies a host layer (drawable region inside a window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

/// Identifies one scheduled timer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u32);

/// Identifies a bundled image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

//=== HostEvent ===========================================================

/// Events produced by the host and routed to components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A timer registered with [`TimerService::register_timer`] elapsed.
    TimerFired(TimerHandle),

    /// The redraw pass reached a dirty layer.
    Redraw(LayerId),

    /// Button input for a subscribed window (always the top window).
    Button { window: WindowId, event: ButtonEvent },

    /// A window was pushed and should create its layers.
    WindowLoad(WindowId),

    /// A window was popped and should release its layers.
    WindowUnload(WindowId),
}

//=== Click Subscriptions =================================================

/// Which button signals a window wants to receive.
///
/// Raw subscriptions deliver `Pressed`/`Released`; single-click
/// subscriptions deliver `Clicked`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickConfig {
    raw: BTreeSet<ButtonId>,
    single: BTreeSet<ButtonId>,
}

impl ClickConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes raw press/release for `button`.
    pub fn raw(mut self, button: ButtonId) -> Self {
        self.raw.insert(button);
        self
    }

    /// Subscribes single clicks for `button`.
    pub fn single(mut self, button: ButtonId) -> Self {
        self.single.insert(button);
        self
    }

    pub fn wants_raw(&self, button: ButtonId) -> bool {
        self.raw.contains(&button)
    }

    pub fn wants_single(&self, button: ButtonId) -> bool {
        self.single.contains(&button)
    }

    /// Returns `true` if `event` matches one of the subscriptions.
    pub fn accepts(&self, event: ButtonEvent) -> bool {
        match event {
            ButtonEvent::Pressed(id) | ButtonEvent::Released(id) => self.wants_raw(id),
            ButtonEvent::Clicked(id) => self.wants_single(id),
        }
    }

    /// Returns `true` if any signal of `button` is subscribed.
    pub fn covers(&self, button: ButtonId) -> bool {
        self.wants_raw(button) || self.wants_single(button)
    }
}

//=== Text Layers =========================================================

/// Built-in system fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemFont {
    Gothic18Bold,
    Gothic24Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextOverflow {
    #[default]
    TrailingEllipsis,
    WordWrap,
    Fill,
}

/// Description of a host-drawn text layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayer {
    pub frame: GRect,
    pub text: String,
    pub color: GColor,
    pub background: GColor,
    pub alignment: TextAlignment,
    pub overflow: TextOverflow,
    pub font: SystemFont,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create the desktop event loop (OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Desktop event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),

    /// The requested image resource is not bundled with the app.
    ResourceNotFound(ResourceId),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
            Self::ResourceNotFound(id) => write!(f, "Resource {} not found", id.0),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== Host Services =======================================================

/// Deferred, cancellable one-shot callbacks.
///
/// A registered timer is delivered exactly once as
/// [`HostEvent::TimerFired`] unless cancelled first.
pub trait TimerService {
    /// Schedules a callback `after` from now.
    fn register_timer(&mut self, after: Duration) -> TimerHandle;

    /// Cancels a pending timer. Returns `false` if it already fired or
    /// was never registered.
    fn cancel_timer(&mut self, handle: TimerHandle) -> bool;
}

/// Drawable regions and the redraw pass.
pub trait LayerService {
    /// Draw context handed to custom layers during the redraw pass.
    type Context;

    /// Returns the bounds of a window's root layer.
    fn window_bounds(&self, window: WindowId) -> GRect;

    /// Creates a custom-drawn layer on `window`.
    fn create_layer(&mut self, window: WindowId, frame: GRect) -> LayerId;

    /// Creates a host-drawn text layer on `window`.
    fn create_text_layer(&mut self, window: WindowId, text: TextLayer) -> LayerId;

    /// Creates a host-drawn bitmap layer showing `resource`.
    fn create_bitmap_layer(
        &mut self,
        window: WindowId,
        frame: GRect,
        resource: ResourceId,
    ) -> Result<LayerId, PlatformError>;

    /// Removes a layer from its window and releases it.
    fn destroy_layer(&mut self, layer: LayerId);

    /// Requests that `layer` be redrawn at the next redraw pass.
    fn mark_dirty(&mut self, layer: LayerId);

    /// Hands out a fresh draw context for `layer`.
    fn begin_draw(&mut self, layer: LayerId) -> Self::Context;

    /// Returns the draw context once the layer's drawing is done.
    fn end_draw(&mut self, layer: LayerId, context: Self::Context);
}

/// Window stack, click routing and the backlight.
pub trait WindowService {
    fn create_window(&mut self, fullscreen: bool) -> WindowId;

    /// Releases a window. Destroying a window still on the stack removes it.
    fn destroy_window(&mut self, window: WindowId);

    /// Pushes `window`; the host emits [`HostEvent::WindowLoad`] if it is not loaded.
    fn push_window(&mut self, window: WindowId, animated: bool);

    /// Pops the top window; the host emits [`HostEvent::WindowUnload`].
    fn pop_window(&mut self, animated: bool) -> Option<WindowId>;

    fn top_window(&self) -> Option<WindowId>;

    /// Replaces the click subscriptions of `window`.
    fn subscribe_clicks(&mut self, window: WindowId, config: ClickConfig);

    fn unsubscribe_clicks(&mut self, window: WindowId);

    fn set_backlight(&mut self, on: bool);
}

/// A complete host: all services plus an event source.
pub trait Host: TimerService + LayerService + WindowService {
    /// Returns the next pending event, or `None` when the host is idle.
    fn poll_event(&mut self) -> Option<HostEvent>;
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// PGE Engine
//
// Fixed-rate render/logic loop bound to one drawable surface.
//
// Architecture:
// ```text
//     EngineBuilder ──begin()──▶ Engine ──────────────────────────┐
//         │                        │                              │
//         ├─ with_frame_period()   ├─ FrameScheduler (one timer)  │
//         ├─ on_render()           ├─ ButtonStates                │
//         ├─ on_logic()            └─ surface (owned layer)       │
//         └─ on_click()                                           │
//                                                                 ▼
//   TimerFired ─▶ mark_dirty ─▶ Redraw ─▶ cycle(): render → logic → decide
//                                                   │
//                               running ──▶ schedule_next()
//                               stopped ──▶ teardown → Destroyed
// ```
//
// State machine: Running → Stopping → Destroyed. `finish()` clears the
// running flag and marks the surface dirty; the next cycle performs the
// teardown.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;
use std::time::Duration;

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::input::{ButtonEvent, ButtonId, ButtonStates};
use crate::core::runtime::{Component, Dispatch};
use crate::core::scheduler::FrameScheduler;
use crate::platform::geometry::{GRect, SCREEN_BOUNDS};
use crate::platform::{ClickConfig, Host, HostEvent, LayerId, LayerService, WindowId};

//=== Constants & Handler Types ===========================================

/// Engine-wide default interval between frames (~30 FPS).
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(33);

/// Advances game state once per frame.
pub type LogicHandler = Box<dyn FnMut(&mut Frame<'_>)>;

/// Draws the current game state into the host draw context.
pub type RenderHandler<C> = Box<dyn FnMut(&mut C)>;

/// Receives recognized single clicks.
pub type ClickHandler = Box<dyn FnMut(ButtonId)>;

//=== EngineState =========================================================

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Frames are being scheduled.
    Running,
    /// Stop requested; the next cycle tears down.
    Stopping,
    /// Surface released. Every further event is ignored.
    Destroyed,
}

//=== CycleOutcome ========================================================

/// What a single cycle invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Rendered, stepped logic and scheduled the next frame.
    Continued,
    /// Configuration error; nothing ran and nothing was scheduled.
    Halted(EngineError),
    /// The engine tore itself down during this cycle.
    Destroyed,
    /// The engine was already destroyed.
    Ignored,
}

//=== Frame ===============================================================

/// Per-frame view handed to the logic handler.
pub struct Frame<'a> {
    buttons: &'a ButtonStates,
    index: u64,
    finish_requested: bool,
}

impl<'a> Frame<'a> {
    fn new(buttons: &'a ButtonStates, index: u64) -> Self {
        Self {
            buttons,
            index,
            finish_requested: false,
        }
    }

    /// Current state of `button`; `false` for untracked ids.
    pub fn button_state(&self, button: ButtonId) -> bool {
        self.buttons.is_pressed(button)
    }

    /// All tracked button states at the start of this frame.
    pub fn buttons(&self) -> &ButtonStates {
        self.buttons
    }

    /// Zero-based index of this frame.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Stops the loop. This frame is the last; the engine tears down
    /// once the cycle completes.
    pub fn finish(&mut self) {
        self.finish_requested = true;
    }

    /// Whether [`finish`](Self::finish) was called during this frame.
    pub fn is_finishing(&self) -> bool {
        self.finish_requested
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and starting an [`Engine`].
///
/// # Default Values
///
/// - **Frame period**: 33 ms
/// - **Surface frame**: full screen (144×168)
/// - **Handlers**: none
///
/// # Examples
///
/// ```
/// use pge_engine::prelude::*;
///
/// let mut host = SimHost::new();
/// let window = host.create_window(true);
/// host.push_window(window, false);
///
/// let engine = EngineBuilder::<SimHost>::new()
///     .on_render(|canvas: &mut Canvas| canvas.fill_rect(canvas.bounds()))
///     .on_logic(|frame| {
///         if frame.button_state(ButtonId::Select) {
///             frame.finish();
///         }
///     })
///     .begin(&mut host, window);
///
/// assert_eq!(engine.state(), EngineState::Running);
/// ```
pub struct EngineBuilder<H: LayerService> {
    period: Duration,
    frame: GRect,
    logic: Option<LogicHandler>,
    render: Option<RenderHandler<H::Context>>,
    click: Option<ClickHandler>,
}

impl<H: Host> EngineBuilder<H> {
    /// Creates a builder with default settings and no handlers.
    pub fn new() -> Self {
        Self {
            period: DEFAULT_FRAME_PERIOD,
            frame: SCREEN_BOUNDS,
            logic: None,
            render: None,
            click: None,
        }
    }

    /// Sets the interval between frames.
    ///
    /// Default: 33 ms
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn with_frame_period(mut self, period: Duration) -> Self {
        assert!(!period.is_zero(), "Frame period must be positive");
        self.period = period;
        self
    }

    /// Sets the surface frame inside the parent window.
    ///
    /// Default: full screen
    ///
    /// # Panics
    ///
    /// Panics if `frame` has no area.
    pub fn with_frame(mut self, frame: GRect) -> Self {
        assert!(!frame.is_empty(), "Surface frame must have a positive size");
        self.frame = frame;
        self
    }

    pub fn on_logic<F>(mut self, logic: F) -> Self
    where
        F: FnMut(&mut Frame<'_>) + 'static,
    {
        self.logic = Some(Box::new(logic));
        self
    }

    pub fn on_render<F>(mut self, render: F) -> Self
    where
        F: FnMut(&mut H::Context) + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    /// Sets the click handler. Only engines with a click handler subscribe
    /// to button input, so button state stays released without one.
    pub fn on_click<F>(mut self, click: F) -> Self
    where
        F: FnMut(ButtonId) + 'static,
    {
        self.click = Some(Box::new(click));
        self
    }

    /// Creates the surface on `parent`, wires input and starts the loop.
    ///
    /// The first frame runs one period after this returns.
    pub fn begin(self, host: &mut H, parent: WindowId) -> Engine<H> {
        let surface = host.create_layer(parent, self.frame);

        if self.click.is_some() {
            let config = ButtonId::TRACKED
                .into_iter()
                .fold(ClickConfig::new(), |config, button| config.raw(button).single(button));
            host.subscribe_clicks(parent, config);
        }

        let mut engine = Engine {
            parent,
            surface,
            scheduler: FrameScheduler::new(self.period, surface),
            logic: self.logic,
            render: self.render,
            click: self.click,
            buttons: ButtonStates::new(),
            frame_count: 0,
            destroyed: false,
        };
        engine.scheduler.start(host);

        info!(
            target: "pge::engine",
            "Engine started on {:?} (surface {:?}, period {:?})",
            parent,
            surface,
            self.period
        );
        engine
    }
}

impl<H: Host> Default for EngineBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// A running game loop.
///
/// Owns its surface and its frame timer. Drive it by forwarding host
/// events to [`Engine::handle_event`] (or let a
/// [`Runtime`](crate::core::runtime::Runtime) do it).
pub struct Engine<H: Host> {
    parent: WindowId,
    surface: LayerId,
    scheduler: FrameScheduler,
    logic: Option<LogicHandler>,
    render: Option<RenderHandler<H::Context>>,
    click: Option<ClickHandler>,
    buttons: ButtonStates,
    frame_count: u64,
    destroyed: bool,
}

impl<H: Host> Engine<H> {
    //--- Lifecycle --------------------------------------------------------

    /// Starts an engine on `parent` with the default frame period.
    pub fn begin(
        host: &mut H,
        parent: WindowId,
        logic: Option<LogicHandler>,
        render: Option<RenderHandler<H::Context>>,
        click: Option<ClickHandler>,
    ) -> Self {
        EngineBuilder {
            logic,
            render,
            click,
            ..EngineBuilder::new()
        }
        .begin(host, parent)
    }

    /// Requests an orderly shutdown.
    ///
    /// Cancels the pending frame, clears the running flag and marks the
    /// surface dirty. Nothing is released here: the redraw that follows
    /// tears the engine down instead of running render or logic.
    pub fn finish(&mut self, host: &mut H) {
        if self.destroyed {
            debug!(target: "pge::engine", "finish() on destroyed engine ignored");
            return;
        }
        self.scheduler.stop(host);
        host.mark_dirty(self.surface);
        debug!(target: "pge::engine", "Stop requested after {} frames", self.frame_count);
    }

    //--- Frame Cycle ------------------------------------------------------

    /// Runs one render/logic cycle. Called for each redraw of the surface.
    ///
    /// 1. `Destroyed` → ignored
    /// 2. Missing handlers → error logged, loop halted, nothing scheduled
    /// 3. `Stopping` → teardown without a frame
    /// 4. render, then logic
    /// 5. Still running → schedule one more frame, otherwise teardown
    pub fn cycle(&mut self, host: &mut H) -> CycleOutcome {
        if self.destroyed {
            warn!(target: "pge::engine", "Cycle on destroyed engine ignored");
            return CycleOutcome::Ignored;
        }

        if self.render.is_none() || self.logic.is_none() {
            error!(target: "pge::engine", "{}", EngineError::MissingHandlers);
            if self.state() == EngineState::Stopping {
                self.teardown(host);
                return CycleOutcome::Destroyed;
            }
            self.scheduler.stop(host);
            return CycleOutcome::Halted(EngineError::MissingHandlers);
        }

        if self.state() == EngineState::Stopping {
            self.teardown(host);
            return CycleOutcome::Destroyed;
        }

        let surface = self.surface;
        let finish_requested = match (self.render.as_mut(), self.logic.as_mut()) {
            (Some(render), Some(logic)) => {
                let mut context = host.begin_draw(surface);
                render(&mut context);
                host.end_draw(surface, context);

                let mut frame = Frame::new(&self.buttons, self.frame_count);
                logic(&mut frame);
                frame.finish_requested
            }
            _ => return CycleOutcome::Ignored,
        };

        self.frame_count += 1;
        if finish_requested {
            self.scheduler.stop(host);
        }

        if self.scheduler.is_running() {
            self.scheduler.schedule_next(host);
            CycleOutcome::Continued
        } else {
            self.teardown(host);
            CycleOutcome::Destroyed
        }
    }

    //--- Event Routing ----------------------------------------------------

    /// Handles a host event if it belongs to this engine.
    ///
    /// Returns `true` if the event was consumed.
    pub fn handle_event(&mut self, host: &mut H, event: &HostEvent) -> bool {
        if self.destroyed {
            return false;
        }

        match *event {
            HostEvent::TimerFired(handle) => self.scheduler.on_fire(host, handle),
            HostEvent::Redraw(layer) if layer == self.surface => {
                self.cycle(host);
                true
            }
            HostEvent::Button { window, event } if window == self.parent && self.click.is_some() => {
                self.on_button(event);
                true
            }
            _ => false,
        }
    }

    fn on_button(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::Pressed(_) | ButtonEvent::Released(_) => {
                self.buttons.apply(event);
            }
            ButtonEvent::Clicked(button) => {
                if let Some(click) = self.click.as_mut() {
                    click(button);
                }
            }
        }
    }

    fn teardown(&mut self, host: &mut H) {
        self.scheduler.stop(host);
        if self.click.is_some() {
            host.unsubscribe_clicks(self.parent);
        }
        host.destroy_layer(self.surface);
        self.buttons.clear();
        self.destroyed = true;

        info!(
            target: "pge::engine",
            "Engine on {:?} destroyed after {} frames",
            self.parent,
            self.frame_count
        );
    }

    //--- Queries ----------------------------------------------------------

    /// Current state of `button`; `false` for untracked ids.
    pub fn button_state(&self, button: ButtonId) -> bool {
        self.buttons.is_pressed(button)
    }

    pub fn state(&self) -> EngineState {
        if self.destroyed {
            EngineState::Destroyed
        } else if self.scheduler.is_running() {
            EngineState::Running
        } else {
            EngineState::Stopping
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Number of frames whose render and logic both ran.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn surface(&self) -> LayerId {
        self.surface
    }

    pub fn parent(&self) -> WindowId {
        self.parent
    }

    pub fn frame_period(&self) -> Duration {
        self.scheduler.period()
    }
}

//--- Trait Implementations -----------------------------------------------

impl<H: Host + 'static> Component<H> for Engine<H> {
    fn handle_event(&mut self, host: &mut H, event: &HostEvent) -> Dispatch {
        Engine::handle_event(self, host, event).into()
    }

    fn is_finished(&self) -> bool {
        self.destroyed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<H: Host> fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .field("parent", &self.parent)
            .field("surface", &self.surface)
            .field("frame_count", &self.frame_count)
            .field("buttons", &self.buttons)
            .field("pending", &self.scheduler.pending())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

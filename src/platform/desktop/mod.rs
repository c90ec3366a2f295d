//=========================================================================
// Desktop Front End
//
// Runs a simulated watch in a desktop window through Winit.
//
// Architecture:
// ```text
//  Main Thread (Winit event loop)
//  ┌──────────────────────────────────────────────────────────┐
//  │  KeyboardInput ─▶ KeyMapper ─▶ ButtonInjector ──┐        │
//  │                                                 ▼        │
//  │  about_to_wait:                         Runtime<SimHost> │
//  │    1. run_until(wall-clock elapsed)  ───────────▲        │
//  │    2. per-iteration hook                        │        │
//  │    3. pump                                      │        │
//  │    4. WaitUntil(next timer deadline)            │        │
//  └──────────────────────────────────────────────────────────┘
// ```
//
// The virtual clock of the SimHost follows wall-clock time, so engines
// see real frame pacing. The loop exits once the watch window stack is
// empty or the desktop window is closed.
//
// Drawing is recorded by the SimHost and traced under "platform"; the
// desktop window itself is not painted.
//
//=========================================================================

//=== Submodules ==========================================================

mod key_mapper;

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Dependencies ===============================================

use super::geometry::{SCREEN_HEIGHT, SCREEN_WIDTH};
use super::sim::{ButtonInjector, SimHost};
use super::PlatformError;
use crate::core::runtime::Runtime;
use key_mapper::KeyMapper;

//=== DesktopConfig =======================================================

/// Desktop window settings.
///
/// # Default Values
///
/// - **Title**: "PGE Simulator"
/// - **Scale**: 3 (432×504 logical pixels)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    pub title: String,
    pub scale: u32,
}

impl DesktopConfig {
    /// Logical window size for the watch screen at this scale.
    pub fn window_size(&self) -> LogicalSize<u32> {
        let scale = self.scale.max(1);
        LogicalSize::new(SCREEN_WIDTH as u32 * scale, SCREEN_HEIGHT as u32 * scale)
    }
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            title: "PGE Simulator".to_owned(),
            scale: 3,
        }
    }
}

//=== DesktopApp ==========================================================

/// Called once per loop iteration, after due frames ran.
pub type IterationHook = Box<dyn FnMut(&mut Runtime<SimHost>)>;

/// Winit application driving a [`Runtime<SimHost>`] in real time.
///
/// # Lifecycle
///
/// 1. **Construction**: `DesktopApp::new(runtime, config)`
/// 2. **Execution**: [`run_desktop`] starts the event loop
/// 3. **Shutdown**: last watch window popped, or desktop window closed
///
/// This type is NOT Send. It must stay on the main thread.
pub struct DesktopApp {
    config: DesktopConfig,
    runtime: Runtime<SimHost>,
    injector: ButtonInjector,
    hook: Option<IterationHook>,

    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Wall-clock instant matching virtual time zero.
    epoch: Option<Instant>,
}

impl DesktopApp {
    //--- Construction -----------------------------------------------------

    pub fn new(runtime: Runtime<SimHost>, config: DesktopConfig) -> Self {
        let injector = runtime.host().injector();
        info!(target: "platform", "Desktop front end initialized");
        Self {
            config,
            runtime,
            injector,
            hook: None,
            window: None,
            epoch: None,
        }
    }

    /// Installs a hook run after every iteration's frames.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Runtime<SimHost>) + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn runtime(&self) -> &Runtime<SimHost> {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime<SimHost> {
        &mut self.runtime
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    //--- Internal Helpers -------------------------------------------------

    /// Brings the runtime up to `elapsed` virtual time.
    ///
    /// Returns `false` once the watch window stack is empty.
    fn step(&mut self, elapsed: Duration) -> bool {
        self.runtime.run_until(elapsed);

        if let Some(hook) = self.hook.as_mut() {
            hook(&mut self.runtime);
            self.runtime.pump();
        }

        !self.runtime.host().window_stack().is_empty()
    }

    fn next_wake(&self) -> ControlFlow {
        match (self.epoch, self.runtime.host().next_deadline()) {
            (Some(epoch), Some(deadline)) => ControlFlow::WaitUntil(epoch + deadline),
            _ => ControlFlow::Wait,
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Execution ===========================================================

/// Runs `app` on a new Winit event loop until the watch shuts down.
///
/// # Errors
///
/// Returns [`PlatformError`] if the event loop cannot be created or fails
/// while running.
///
/// # Panics
///
/// Panics if called off the main thread (macOS/iOS Winit requirement).
pub fn run_desktop(mut app: DesktopApp) -> Result<(), PlatformError> {
    debug!(target: "platform", "Starting Winit event loop");

    let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
    event_loop
        .run_app(&mut app)
        .map_err(PlatformError::EventLoopExecution)
}

//=== Winit Integration ===================================================

impl ApplicationHandler for DesktopApp {
    /// Creates the window on first activation and starts the clock.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.window_size())
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(window);
                self.epoch.get_or_insert_with(Instant::now);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match KeyMapper::process_key_event(key_event) {
                    Some(input) if input.pressed => {
                        self.injector.press(input.button);
                    }
                    Some(input) => {
                        self.injector.release(input.button);
                    }
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            _ => {}
        }
    }

    /// Runs due frames, then sleeps until the next timer deadline.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(epoch) = self.epoch else {
            return;
        };

        if !self.step(epoch.elapsed()) {
            info!(target: "platform", "Window stack empty, exiting");
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(self.next_wake());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

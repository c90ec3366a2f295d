//=========================================================================
// Simulated Host
//=========================================================================
//
// Deterministic in-memory watch host with a virtual clock.
//
// Architecture:
// ```text
//   press()/release()/ButtonInjector ──▶ input queue
//                                            │
//   poll_event():                            ▼
//     1. drain input → ClickRecognizer → Button events (top window only)
//     2. queued events (TimerFired, WindowLoad/Unload, Button)
//     3. redraw pass: first dirty custom layer on the top window
//
//   advance()/advance_to() ──▶ due timers (deadline order) → TimerFired
// ```
//
// Nothing happens on its own: time moves only through `advance*`, and
// events are produced only when polled. This makes every frame of an
// engine reproducible in tests.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod canvas;
mod click_recognizer;

//=== External Dependencies ===============================================

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::geometry::{GRect, SCREEN_BOUNDS, SCREEN_HEIGHT, SCREEN_WIDTH};
use super::{
    ClickConfig, Host, HostEvent, LayerId, LayerService, PlatformError, ResourceId, TextLayer,
    TimerHandle, TimerService, WindowId, WindowService,
};
use crate::core::input::{ButtonEvent, ButtonId};
use crate::core::runtime::Runtime;
use click_recognizer::ClickRecognizer;

//=== Public API ==========================================================

pub use canvas::{Canvas, DrawCommand};
pub use click_recognizer::ButtonInput;

/// Default press-to-release limit for a single click.
pub const DEFAULT_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Height of the status bar shown above non-fullscreen windows.
const STATUS_BAR_HEIGHT: i16 = 16;

//=== Records =============================================================

#[derive(Debug)]
enum LayerKind {
    Custom,
    Text(TextLayer),
    Bitmap(ResourceId),
}

#[derive(Debug)]
struct LayerRecord {
    window: WindowId,
    frame: GRect,
    kind: LayerKind,
}

#[derive(Debug, Default)]
struct WindowRecord {
    fullscreen: bool,
    loaded: bool,
    clicks: Option<ClickConfig>,
    layers: Vec<LayerId>,
}

//=== ButtonInjector ======================================================

/// Thread-safe handle for feeding button transitions into a [`SimHost`].
///
/// Transitions are timestamped when the host next polls, not when sent.
#[derive(Debug, Clone)]
pub struct ButtonInjector {
    sender: Sender<ButtonInput>,
}

impl ButtonInjector {
    /// Queues a press. Returns `false` if the host is gone.
    pub fn press(&self, button: ButtonId) -> bool {
        self.sender.send(ButtonInput::down(button)).is_ok()
    }

    /// Queues a release. Returns `false` if the host is gone.
    pub fn release(&self, button: ButtonId) -> bool {
        self.sender.send(ButtonInput::up(button)).is_ok()
    }

    /// Queues a press immediately followed by a release.
    pub fn click(&self, button: ButtonId) -> bool {
        self.press(button) && self.release(button)
    }
}

//=== SimHost =============================================================

/// In-memory host implementing every platform service.
pub struct SimHost {
    //--- Clock & Timers ---------------------------------------------------
    now: Duration,
    timers: BTreeSet<(Duration, TimerHandle)>,
    deadlines: HashMap<TimerHandle, Duration>,
    timers_registered: u64,

    //--- Windows & Layers -------------------------------------------------
    next_id: u32,
    windows: HashMap<WindowId, WindowRecord>,
    stack: Vec<WindowId>,
    layers: HashMap<LayerId, LayerRecord>,
    dirty: Vec<LayerId>,
    frames: HashMap<LayerId, Vec<DrawCommand>>,
    redraws: HashMap<LayerId, u64>,
    resources: HashSet<ResourceId>,
    backlight: bool,

    //--- Queues -----------------------------------------------------------
    recognizer: ClickRecognizer,
    event_tx: Sender<HostEvent>,
    event_rx: Receiver<HostEvent>,
    input_tx: Sender<ButtonInput>,
    input_rx: Receiver<ButtonInput>,
}

impl SimHost {
    //--- Construction -----------------------------------------------------

    /// Creates an empty host at virtual time zero.
    pub fn new() -> Self {
        let (event_tx, event_rx) = unbounded();
        let (input_tx, input_rx) = unbounded();

        Self {
            now: Duration::ZERO,
            timers: BTreeSet::new(),
            deadlines: HashMap::new(),
            timers_registered: 0,
            next_id: 1,
            windows: HashMap::new(),
            stack: Vec::new(),
            layers: HashMap::new(),
            dirty: Vec::new(),
            frames: HashMap::new(),
            redraws: HashMap::new(),
            resources: HashSet::new(),
            backlight: false,
            recognizer: ClickRecognizer::new(DEFAULT_CLICK_WINDOW),
            event_tx,
            event_rx,
            input_tx,
            input_rx,
        }
    }

    /// Sets the longest press that still counts as a click.
    ///
    /// Default: 500 ms
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    pub fn with_click_window(mut self, window: Duration) -> Self {
        assert!(!window.is_zero(), "Click window must be positive");
        self.recognizer = ClickRecognizer::new(window);
        self
    }

    /// Makes `resource` available to bitmap layers.
    pub fn register_resource(&mut self, resource: ResourceId) {
        self.resources.insert(resource);
    }

    //--- Clock ------------------------------------------------------------

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock forward by `delta`, firing due timers.
    pub fn advance(&mut self, delta: Duration) {
        self.advance_to(self.now + delta);
    }

    /// Moves the clock to `target` (never backwards), firing due timers.
    pub fn advance_to(&mut self, target: Duration) {
        if target > self.now {
            self.now = target;
        }
        self.fire_due_timers();
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.first().map(|(deadline, _)| *deadline)
    }

    //--- Input ------------------------------------------------------------

    pub fn press(&mut self, button: ButtonId) {
        let _ = self.input_tx.send(ButtonInput::down(button));
    }

    pub fn release(&mut self, button: ButtonId) {
        let _ = self.input_tx.send(ButtonInput::up(button));
    }

    /// Presses and releases `button` at the current instant.
    pub fn click(&mut self, button: ButtonId) {
        self.press(button);
        self.release(button);
    }

    /// Returns a cloneable handle that can inject input from other threads.
    pub fn injector(&self) -> ButtonInjector {
        ButtonInjector {
            sender: self.input_tx.clone(),
        }
    }

    //--- Introspection ----------------------------------------------------

    /// Total number of `register_timer` calls so far.
    pub fn timers_registered(&self) -> u64 {
        self.timers_registered
    }

    /// Number of timers registered and neither fired nor cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of `Redraw` events emitted for `layer`.
    pub fn redraw_count(&self, layer: LayerId) -> u64 {
        self.redraws.get(&layer).copied().unwrap_or(0)
    }

    /// Commands drawn into `layer` during its last completed redraw.
    pub fn last_frame(&self, layer: LayerId) -> Option<&[DrawCommand]> {
        self.frames.get(&layer).map(Vec::as_slice)
    }

    pub fn layer_exists(&self, layer: LayerId) -> bool {
        self.layers.contains_key(&layer)
    }

    pub fn layer_frame(&self, layer: LayerId) -> Option<GRect> {
        self.layers.get(&layer).map(|record| record.frame)
    }

    pub fn is_dirty(&self, layer: LayerId) -> bool {
        self.dirty.contains(&layer)
    }

    /// Returns the description of a text layer.
    pub fn text_layer(&self, layer: LayerId) -> Option<&TextLayer> {
        match self.layers.get(&layer).map(|record| &record.kind) {
            Some(LayerKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the resource shown by a bitmap layer.
    pub fn bitmap_resource(&self, layer: LayerId) -> Option<ResourceId> {
        match self.layers.get(&layer).map(|record| &record.kind) {
            Some(LayerKind::Bitmap(resource)) => Some(*resource),
            _ => None,
        }
    }

    /// Layers currently attached to `window`, in creation order.
    pub fn layers_on(&self, window: WindowId) -> &[LayerId] {
        self.windows
            .get(&window)
            .map(|record| record.layers.as_slice())
            .unwrap_or(&[])
    }

    pub fn window_exists(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    /// Window stack, bottom first.
    pub fn window_stack(&self) -> &[WindowId] {
        &self.stack
    }

    pub fn click_config(&self, window: WindowId) -> Option<&ClickConfig> {
        self.windows.get(&window).and_then(|record| record.clicks.as_ref())
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Returns `true` while `button` is physically held.
    pub fn is_held(&self, button: ButtonId) -> bool {
        self.recognizer.is_held(button)
    }

    //--- Internal Helpers -------------------------------------------------

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn emit(&self, event: HostEvent) {
        trace!(target: "platform", "Queued {:?}", event);
        // We hold the receiver, so the channel cannot be disconnected.
        let _ = self.event_tx.send(event);
    }

    fn fire_due_timers(&mut self) {
        while let Some(&(deadline, handle)) = self.timers.first() {
            if deadline > self.now {
                break;
            }
            self.timers.remove(&(deadline, handle));
            self.deadlines.remove(&handle);
            self.emit(HostEvent::TimerFired(handle));
        }
    }

    fn drain_input(&mut self) {
        while let Ok(input) = self.input_rx.try_recv() {
            for event in self.recognizer.process(input, self.now) {
                self.route_button(event);
            }
        }
    }

    /// Delivers a button event to the top window, applying the default
    /// Back behavior when the window does not handle Back itself.
    fn route_button(&mut self, event: ButtonEvent) {
        let Some(&top) = self.stack.last() else {
            trace!(target: "platform::input", "No window for {:?}", event);
            return;
        };

        let clicks = self.windows.get(&top).and_then(|record| record.clicks.as_ref());
        let accepted = clicks.is_some_and(|config| config.accepts(event));
        let back_handled = clicks.is_some_and(|config| config.covers(ButtonId::Back));

        if accepted {
            self.emit(HostEvent::Button { window: top, event });
        } else if event == ButtonEvent::Clicked(ButtonId::Back) && !back_handled {
            debug!(target: "platform::input", "Back pressed, popping {:?}", top);
            self.pop_window(true);
        }
    }

    fn next_redraw(&mut self) -> Option<LayerId> {
        let top = *self.stack.last()?;

        // Host-drawn layers are refreshed silently.
        let layers = &self.layers;
        self.dirty.retain(|layer| match layers.get(layer) {
            Some(record) => record.window != top || matches!(record.kind, LayerKind::Custom),
            None => false,
        });

        let index = self
            .dirty
            .iter()
            .position(|layer| self.layers.get(layer).is_some_and(|r| r.window == top))?;
        let layer = self.dirty.remove(index);
        *self.redraws.entry(layer).or_insert(0) += 1;
        Some(layer)
    }

    fn mark_window_dirty(&mut self, window: WindowId) {
        let custom: Vec<LayerId> = self
            .layers_on(window)
            .iter()
            .copied()
            .filter(|layer| {
                self.layers
                    .get(layer)
                    .is_some_and(|record| matches!(record.kind, LayerKind::Custom))
            })
            .collect();

        for layer in custom {
            self.mark_dirty(layer);
        }
    }

    fn insert_layer(&mut self, window: WindowId, frame: GRect, kind: LayerKind) -> LayerId {
        let layer = LayerId(self.allocate_id());
        match self.windows.get_mut(&window) {
            Some(record) => record.layers.push(layer),
            None => warn!(target: "platform", "Layer {:?} attached to unknown {:?}", layer, window),
        }
        self.layers.insert(layer, LayerRecord { window, frame, kind });
        layer
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

//=== Service Implementations =============================================

impl TimerService for SimHost {
    fn register_timer(&mut self, after: Duration) -> TimerHandle {
        let handle = TimerHandle(self.allocate_id());
        let deadline = self.now + after;

        self.timers.insert((deadline, handle));
        self.deadlines.insert(handle, deadline);
        self.timers_registered += 1;

        trace!(target: "platform", "Timer {:?} due at {:?}", handle, deadline);
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => {
                self.timers.remove(&(deadline, handle));
                trace!(target: "platform", "Timer {:?} cancelled", handle);
                true
            }
            None => false,
        }
    }
}

impl LayerService for SimHost {
    type Context = Canvas;

    fn window_bounds(&self, window: WindowId) -> GRect {
        match self.windows.get(&window) {
            Some(record) if !record.fullscreen => {
                GRect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT - STATUS_BAR_HEIGHT)
            }
            _ => SCREEN_BOUNDS,
        }
    }

    fn create_layer(&mut self, window: WindowId, frame: GRect) -> LayerId {
        self.insert_layer(window, frame, LayerKind::Custom)
    }

    fn create_text_layer(&mut self, window: WindowId, text: TextLayer) -> LayerId {
        let frame = text.frame;
        self.insert_layer(window, frame, LayerKind::Text(text))
    }

    fn create_bitmap_layer(
        &mut self,
        window: WindowId,
        frame: GRect,
        resource: ResourceId,
    ) -> Result<LayerId, PlatformError> {
        if !self.resources.contains(&resource) {
            return Err(PlatformError::ResourceNotFound(resource));
        }
        Ok(self.insert_layer(window, frame, LayerKind::Bitmap(resource)))
    }

    fn destroy_layer(&mut self, layer: LayerId) {
        let Some(record) = self.layers.remove(&layer) else {
            warn!(target: "platform", "Destroying unknown {:?}", layer);
            return;
        };
        if let Some(window) = self.windows.get_mut(&record.window) {
            window.layers.retain(|l| *l != layer);
        }
        self.dirty.retain(|l| *l != layer);
    }

    fn mark_dirty(&mut self, layer: LayerId) {
        if !self.layers.contains_key(&layer) {
            trace!(target: "platform", "Ignoring dirty mark on unknown {:?}", layer);
            return;
        }
        if !self.dirty.contains(&layer) {
            self.dirty.push(layer);
        }
    }

    fn begin_draw(&mut self, layer: LayerId) -> Canvas {
        let frame = self.layer_frame(layer).unwrap_or(SCREEN_BOUNDS);
        Canvas::new(frame)
    }

    fn end_draw(&mut self, layer: LayerId, context: Canvas) {
        if self.layers.contains_key(&layer) {
            let commands = context.into_commands();
            trace!(target: "platform", "{:?} drew {} commands", layer, commands.len());
            self.frames.insert(layer, commands);
        } else {
            trace!(target: "platform", "Discarding drawing for destroyed {:?}", layer);
        }
    }
}

impl WindowService for SimHost {
    fn create_window(&mut self, fullscreen: bool) -> WindowId {
        let window = WindowId(self.allocate_id());
        self.windows.insert(
            window,
            WindowRecord {
                fullscreen,
                ..WindowRecord::default()
            },
        );
        window
    }

    fn destroy_window(&mut self, window: WindowId) {
        let Some(record) = self.windows.remove(&window) else {
            warn!(target: "platform", "Destroying unknown {:?}", window);
            return;
        };

        let was_top = self.stack.last() == Some(&window);
        self.stack.retain(|w| *w != window);

        for layer in record.layers {
            self.layers.remove(&layer);
            self.dirty.retain(|l| *l != layer);
        }

        if was_top {
            if let Some(&top) = self.stack.last() {
                self.mark_window_dirty(top);
            }
        }
    }

    fn push_window(&mut self, window: WindowId, _animated: bool) {
        if self.stack.contains(&window) {
            warn!(target: "platform", "{:?} is already on the stack", window);
            return;
        }
        let Some(record) = self.windows.get_mut(&window) else {
            warn!(target: "platform", "Pushing unknown {:?}", window);
            return;
        };

        let needs_load = !record.loaded;
        record.loaded = true;
        self.stack.push(window);

        debug!(target: "platform", "Pushed {:?} (depth {})", window, self.stack.len());
        if needs_load {
            self.emit(HostEvent::WindowLoad(window));
        }
    }

    fn pop_window(&mut self, _animated: bool) -> Option<WindowId> {
        let window = self.stack.pop()?;
        debug!(target: "platform", "Popped {:?} (depth {})", window, self.stack.len());

        let was_loaded = self
            .windows
            .get_mut(&window)
            .is_some_and(|record| std::mem::replace(&mut record.loaded, false));
        if was_loaded {
            self.emit(HostEvent::WindowUnload(window));
        }

        // The revealed window is redrawn in full.
        if let Some(&top) = self.stack.last() {
            self.mark_window_dirty(top);
        }
        Some(window)
    }

    fn top_window(&self) -> Option<WindowId> {
        self.stack.last().copied()
    }

    fn subscribe_clicks(&mut self, window: WindowId, config: ClickConfig) {
        match self.windows.get_mut(&window) {
            Some(record) => record.clicks = Some(config),
            None => warn!(target: "platform", "Subscribing clicks on unknown {:?}", window),
        }
    }

    fn unsubscribe_clicks(&mut self, window: WindowId) {
        if let Some(record) = self.windows.get_mut(&window) {
            record.clicks = None;
        }
    }

    fn set_backlight(&mut self, on: bool) {
        debug!(target: "platform", "Backlight {}", if on { "on" } else { "off" });
        self.backlight = on;
    }
}

impl Host for SimHost {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.drain_input();

        if let Ok(event) = self.event_rx.try_recv() {
            return Some(event);
        }

        self.next_redraw().map(HostEvent::Redraw)
    }
}

//=== Runtime Helpers =====================================================

impl Runtime<SimHost> {
    /// Runs the virtual clock up to `target`, stopping at every timer
    /// deadline on the way so each fired frame can schedule the next one.
    ///
    /// Returns the number of events handled.
    pub fn run_until(&mut self, target: Duration) -> usize {
        let mut handled = self.pump();

        while let Some(deadline) = self.host().next_deadline() {
            if deadline > target {
                break;
            }
            self.host_mut().advance_to(deadline);
            handled += self.pump();
        }

        self.host_mut().advance_to(target);
        handled + self.pump()
    }

    /// Runs the virtual clock forward by `duration`.
    pub fn run_for(&mut self, duration: Duration) -> usize {
        let target = self.host().now() + duration;
        self.run_until(target)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::geometry::GColor;
    use crate::platform::{SystemFont, TextAlignment, TextOverflow};

    //--- Test Helpers -----------------------------------------------------

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn drain(host: &mut SimHost) -> Vec<HostEvent> {
        std::iter::from_fn(|| host.poll_event()).collect()
    }

    fn host_with_window() -> (SimHost, WindowId) {
        let mut host = SimHost::new();
        let window = host.create_window(true);
        host.push_window(window, false);
        assert_eq!(drain(&mut host), vec![HostEvent::WindowLoad(window)]);
        (host, window)
    }

    //=====================================================================
    // Timer Tests
    //=====================================================================

    #[test]
    fn timer_fires_only_after_deadline() {
        let mut host = SimHost::new();
        let handle = host.register_timer(ms(33));

        host.advance(ms(32));
        assert!(drain(&mut host).is_empty());

        host.advance(ms(1));
        assert_eq!(drain(&mut host), vec![HostEvent::TimerFired(handle)]);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut host = SimHost::new();
        let late = host.register_timer(ms(50));
        let early = host.register_timer(ms(10));

        host.advance(ms(100));
        assert_eq!(
            drain(&mut host),
            vec![HostEvent::TimerFired(early), HostEvent::TimerFired(late)]
        );
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut host = SimHost::new();
        let handle = host.register_timer(ms(10));

        assert!(host.cancel_timer(handle));
        assert!(!host.cancel_timer(handle), "Second cancel reports nothing to cancel");

        host.advance(ms(20));
        assert!(drain(&mut host).is_empty());
        assert_eq!(host.timers_registered(), 1);
    }

    #[test]
    fn next_deadline_tracks_earliest_timer() {
        let mut host = SimHost::new();
        assert_eq!(host.next_deadline(), None);

        host.advance(ms(5));
        host.register_timer(ms(30));
        host.register_timer(ms(10));
        assert_eq!(host.next_deadline(), Some(ms(15)));
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut host = SimHost::new();
        host.advance(ms(100));
        host.advance_to(ms(50));
        assert_eq!(host.now(), ms(100));
    }

    //=====================================================================
    // Redraw Pass Tests
    //=====================================================================

    #[test]
    fn dirty_layer_is_redrawn_once() {
        let (mut host, window) = host_with_window();
        let layer = host.create_layer(window, SCREEN_BOUNDS);

        host.mark_dirty(layer);
        host.mark_dirty(layer);

        assert_eq!(drain(&mut host), vec![HostEvent::Redraw(layer)]);
        assert_eq!(host.redraw_count(layer), 1);
    }

    #[test]
    fn new_layers_are_not_dirty() {
        let (mut host, window) = host_with_window();
        let layer = host.create_layer(window, SCREEN_BOUNDS);
        assert!(!host.is_dirty(layer));
        assert!(drain(&mut host).is_empty());
    }

    #[test]
    fn queued_events_come_before_redraws() {
        let (mut host, window) = host_with_window();
        let layer = host.create_layer(window, SCREEN_BOUNDS);
        let timer = host.register_timer(ms(1));

        host.mark_dirty(layer);
        host.advance(ms(1));

        assert_eq!(
            drain(&mut host),
            vec![HostEvent::TimerFired(timer), HostEvent::Redraw(layer)]
        );
    }

    #[test]
    fn destroyed_layer_is_not_redrawn() {
        let (mut host, window) = host_with_window();
        let layer = host.create_layer(window, SCREEN_BOUNDS);

        host.mark_dirty(layer);
        host.destroy_layer(layer);

        assert!(drain(&mut host).is_empty());
        assert!(!host.layer_exists(layer));
        assert!(host.layers_on(window).is_empty());
    }

    #[test]
    fn hidden_window_waits_for_redraw() {
        let (mut host, bottom) = host_with_window();
        let layer = host.create_layer(bottom, SCREEN_BOUNDS);

        let top = host.create_window(true);
        host.push_window(top, false);
        host.mark_dirty(layer);
        assert_eq!(drain(&mut host), vec![HostEvent::WindowLoad(top)]);

        host.pop_window(false);
        assert_eq!(
            drain(&mut host),
            vec![HostEvent::WindowUnload(top), HostEvent::Redraw(layer)]
        );
    }

    #[test]
    fn draw_commands_are_kept_per_layer() {
        let (mut host, window) = host_with_window();
        let layer = host.create_layer(window, SCREEN_BOUNDS);

        let mut canvas = host.begin_draw(layer);
        canvas.set_fill_color(GColor::White);
        canvas.fill_rect(GRect::new(0, 0, 4, 4));
        host.end_draw(layer, canvas);

        assert_eq!(host.last_frame(layer).map(<[DrawCommand]>::len), Some(1));
    }

    #[test]
    fn drawing_for_destroyed_layer_is_discarded() {
        let (mut host, window) = host_with_window();
        let layer = host.create_layer(window, SCREEN_BOUNDS);

        let canvas = host.begin_draw(layer);
        host.destroy_layer(layer);
        host.end_draw(layer, canvas);

        assert!(host.last_frame(layer).is_none());
    }

    //=====================================================================
    // Window Tests
    //=====================================================================

    #[test]
    fn status_bar_shrinks_non_fullscreen_windows() {
        let mut host = SimHost::new();
        let full = host.create_window(true);
        let framed = host.create_window(false);

        assert_eq!(host.window_bounds(full), SCREEN_BOUNDS);
        assert_eq!(host.window_bounds(framed), GRect::new(0, 0, 144, 152));
    }

    #[test]
    fn push_twice_is_ignored() {
        let (mut host, window) = host_with_window();
        host.push_window(window, false);
        assert_eq!(host.window_stack(), &[window]);
        assert!(drain(&mut host).is_empty());
    }

    #[test]
    fn pop_emits_unload_and_reload_on_push() {
        let (mut host, window) = host_with_window();

        assert_eq!(host.pop_window(false), Some(window));
        assert_eq!(drain(&mut host), vec![HostEvent::WindowUnload(window)]);

        host.push_window(window, false);
        assert_eq!(drain(&mut host), vec![HostEvent::WindowLoad(window)]);
    }

    #[test]
    fn destroy_window_releases_its_layers() {
        let (mut host, window) = host_with_window();
        let layer = host.create_layer(window, SCREEN_BOUNDS);

        host.destroy_window(window);

        assert!(!host.window_exists(window));
        assert!(!host.layer_exists(layer));
        assert!(host.window_stack().is_empty());
    }

    #[test]
    fn bitmap_layer_requires_resource() {
        let (mut host, window) = host_with_window();

        match host.create_bitmap_layer(window, SCREEN_BOUNDS, ResourceId(3)) {
            Err(PlatformError::ResourceNotFound(ResourceId(3))) => {}
            other => panic!("Expected ResourceNotFound, got {:?}", other),
        }

        host.register_resource(ResourceId(3));
        let layer = host
            .create_bitmap_layer(window, SCREEN_BOUNDS, ResourceId(3))
            .expect("resource is registered");
        assert_eq!(host.bitmap_resource(layer), Some(ResourceId(3)));
    }

    #[test]
    fn text_layers_are_inspectable_and_never_redrawn() {
        let (mut host, window) = host_with_window();
        let layer = host.create_text_layer(
            window,
            TextLayer {
                frame: GRect::new(0, 0, 144, 30),
                text: "Hello".to_owned(),
                color: GColor::Black,
                background: GColor::Clear,
                alignment: TextAlignment::Center,
                overflow: TextOverflow::WordWrap,
                font: SystemFont::Gothic18Bold,
            },
        );

        assert_eq!(host.text_layer(layer).map(|t| t.text.as_str()), Some("Hello"));

        host.mark_dirty(layer);
        assert!(drain(&mut host).is_empty());
        assert!(!host.is_dirty(layer));
    }

    //=====================================================================
    // Button Routing Tests
    //=====================================================================

    #[test]
    fn unsubscribed_window_receives_nothing() {
        let (mut host, _window) = host_with_window();
        host.click(ButtonId::Up);
        assert!(drain(&mut host).is_empty());
    }

    #[test]
    fn raw_and_click_events_follow_subscriptions() {
        let (mut host, window) = host_with_window();
        host.subscribe_clicks(
            window,
            ClickConfig::new().raw(ButtonId::Up).single(ButtonId::Up),
        );

        host.press(ButtonId::Up);
        let mut events = drain(&mut host);
        host.advance(ms(100));
        host.release(ButtonId::Up);
        events.extend(drain(&mut host));

        assert_eq!(
            events,
            vec![
                HostEvent::Button { window, event: ButtonEvent::Pressed(ButtonId::Up) },
                HostEvent::Button { window, event: ButtonEvent::Released(ButtonId::Up) },
                HostEvent::Button { window, event: ButtonEvent::Clicked(ButtonId::Up) },
            ]
        );
    }

    #[test]
    fn clicks_go_to_top_window_only() {
        let (mut host, bottom) = host_with_window();
        host.subscribe_clicks(bottom, ClickConfig::new().single(ButtonId::Select));

        let top = host.create_window(true);
        host.subscribe_clicks(top, ClickConfig::new().single(ButtonId::Select));
        host.push_window(top, false);
        drain(&mut host);

        host.click(ButtonId::Select);
        assert_eq!(
            drain(&mut host),
            vec![HostEvent::Button {
                window: top,
                event: ButtonEvent::Clicked(ButtonId::Select)
            }]
        );
    }

    #[test]
    fn back_pops_window_by_default() {
        let (mut host, window) = host_with_window();
        host.click(ButtonId::Back);

        assert_eq!(drain(&mut host), vec![HostEvent::WindowUnload(window)]);
        assert!(host.window_stack().is_empty());
    }

    #[test]
    fn back_subscription_overrides_default() {
        let (mut host, window) = host_with_window();
        host.subscribe_clicks(window, ClickConfig::new().single(ButtonId::Back));

        host.click(ButtonId::Back);
        assert_eq!(
            drain(&mut host),
            vec![HostEvent::Button {
                window,
                event: ButtonEvent::Clicked(ButtonId::Back)
            }]
        );
        assert_eq!(host.window_stack(), &[window]);
    }

    #[test]
    fn injector_feeds_input_from_another_thread() {
        let (mut host, window) = host_with_window();
        host.subscribe_clicks(window, ClickConfig::new().raw(ButtonId::Down));

        let injector = host.injector();
        std::thread::spawn(move || {
            assert!(injector.press(ButtonId::Down));
        })
        .join()
        .expect("injector thread panicked");

        assert_eq!(
            drain(&mut host),
            vec![HostEvent::Button {
                window,
                event: ButtonEvent::Pressed(ButtonId::Down)
            }]
        );
    }

    #[test]
    fn backlight_is_recorded() {
        let mut host = SimHost::new();
        assert!(!host.backlight());
        host.set_backlight(true);
        assert!(host.backlight());
    }

    #[test]
    #[should_panic(expected = "Click window must be positive")]
    fn zero_click_window_panics() {
        let _ = SimHost::new().with_click_window(Duration::ZERO);
    }
}

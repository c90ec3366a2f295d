//=========================================================================
// Runtime
//=========================================================================
//
// Owns a host and every live component, and routes host events to them.
//
// Architecture:
//   Runtime
//     ├─ host: H
//     └─ components: Vec<(ComponentId, Box<dyn Component<H>>)>
//
// Flow:
//   pump() → poll_event() → first component that handles it
//          → drop components reporting is_finished()
//
// Components are stored type-erased and recovered with `get_mut::<T>()`
// through `as_any_mut`, in the same way typed message queues are kept.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::input::ButtonId;
use crate::engine::{Engine, EngineBuilder};
use crate::platform::{Host, HostEvent, WindowId};
use crate::title::TitleScreen;

//=== Dispatch ============================================================

/// Result of offering an event to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Not for this component; try the next one.
    Ignored,
    /// Consumed. No other component sees the event.
    Handled,
}

impl From<bool> for Dispatch {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Handled
        } else {
            Self::Ignored
        }
    }
}

//=== Component Trait =====================================================

/// Anything that reacts to host events on behalf of an app.
///
/// # Minimal Implementation
///
/// ```rust
/// # use pge_engine::prelude::*;
/// # use std::any::Any;
/// struct Blinker;
///
/// impl<H: Host> Component<H> for Blinker {
///     fn handle_event(&mut self, _host: &mut H, _event: &HostEvent) -> Dispatch {
///         Dispatch::Ignored
///     }
///
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
/// ```
pub trait Component<H: Host>: Any {
    /// Offers `event` to the component.
    fn handle_event(&mut self, host: &mut H, event: &HostEvent) -> Dispatch;

    /// Finished components are dropped by the runtime.
    ///
    /// Default implementation never finishes.
    fn is_finished(&self) -> bool {
        false
    }

    /// Downcasts to `&dyn Any` for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Downcasts to `&mut dyn Any` for typed access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== ComponentId =========================================================

/// Handle to a component owned by a [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

//=== Runtime =============================================================

/// Event loop glue between one host and its components.
pub struct Runtime<H: Host> {
    host: H,
    components: Vec<(ComponentId, Box<dyn Component<H>>)>,
    next_id: u64,
}

impl<H: Host + 'static> Runtime<H> {
    //--- Construction -----------------------------------------------------

    pub fn new(host: H) -> Self {
        Self {
            host,
            components: Vec::new(),
            next_id: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    //--- Components -------------------------------------------------------

    /// Takes ownership of `component`. It receives events from the next
    /// [`pump`](Self::pump) on.
    pub fn spawn<C: Component<H>>(&mut self, component: C) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.components.push((id, Box::new(component)));
        debug!(target: "pge::runtime", "Spawned {:?}", id);
        id
    }

    /// Returns the component with `id` if it is still alive and of type `T`.
    pub fn get<T: Component<H>>(&self, id: ComponentId) -> Option<&T> {
        self.components
            .iter()
            .find(|(cid, _)| *cid == id)
            .and_then(|(_, component)| component.as_any().downcast_ref::<T>())
    }

    /// Returns the component with `id` if it is still alive and of type `T`.
    pub fn get_mut<T: Component<H>>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.split_mut::<T>(id).map(|(component, _)| component)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.iter().any(|(cid, _)| *cid == id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    //--- Engines ----------------------------------------------------------

    /// Starts an engine on `parent` and takes ownership of it.
    pub fn begin(&mut self, builder: EngineBuilder<H>, parent: WindowId) -> ComponentId {
        let engine = builder.begin(&mut self.host, parent);
        self.spawn(engine)
    }

    /// Requests shutdown of the engine `id`.
    ///
    /// Returns `false` if no such engine is alive.
    pub fn finish(&mut self, id: ComponentId) -> bool {
        match self.split_mut::<Engine<H>>(id) {
            Some((engine, host)) => {
                engine.finish(host);
                true
            }
            None => false,
        }
    }

    /// Button state as seen by engine `id`; `false` if it is gone.
    pub fn button_state(&self, id: ComponentId, button: ButtonId) -> bool {
        self.get::<Engine<H>>(id)
            .is_some_and(|engine| engine.button_state(button))
    }

    //--- Title Screens ----------------------------------------------------

    /// Pushes `title` and takes ownership of it.
    pub fn push_title(&mut self, mut title: TitleScreen, animated: bool) -> ComponentId {
        title.push(&mut self.host, animated);
        self.spawn(title)
    }

    /// Pops title screen `id` if it is on top.
    ///
    /// Returns `false` if no such title screen is alive or it is not on top.
    pub fn pop_title(&mut self, id: ComponentId, animated: bool) -> bool {
        self.split_mut::<TitleScreen>(id)
            .is_some_and(|(title, host)| title.pop(host, animated))
    }

    //--- Event Loop -------------------------------------------------------

    /// Drains every pending host event.
    ///
    /// Returns the number of events processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.host.poll_event() {
            self.dispatch(&event);
            processed += 1;
        }
        processed
    }

    fn dispatch(&mut self, event: &HostEvent) {
        let mut consumer = None;
        for (id, component) in self.components.iter_mut() {
            if component.handle_event(&mut self.host, event) == Dispatch::Handled {
                consumer = Some(*id);
                break;
            }
        }

        match consumer {
            Some(id) => trace!(target: "pge::runtime", "{:?} handled by {:?}", event, id),
            None => trace!(target: "pge::runtime", "{:?} unhandled", event),
        }

        self.components.retain(|(id, component)| {
            let finished = component.is_finished();
            if finished {
                debug!(target: "pge::runtime", "Dropping finished {:?}", id);
            }
            !finished
        });
    }

    //--- Internal Helpers -------------------------------------------------

    fn split_mut<T: Component<H>>(&mut self, id: ComponentId) -> Option<(&mut T, &mut H)> {
        let component = self
            .components
            .iter_mut()
            .find(|(cid, _)| *cid == id)
            .and_then(|(_, component)| component.as_any_mut().downcast_mut::<T>())?;
        Some((component, &mut self.host))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

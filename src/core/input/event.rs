//=========================================================================
// Button Event Types
//
// Defines the engine-side representation of watch button input.
// Hosts translate their own button signals into these types before
// handing them to engines and title screens.
//
// Responsibilities:
// - Name the physical buttons in a portable way
// - Separate raw transitions (press / release) from recognized clicks
//
//=========================================================================

//=== ButtonId Enum =======================================================
// Represents a physical watch button.
//
// Only `Up`, `Select` and `Down` are tracked by the engine. `Back` is
// owned by the host (it pops the top window unless a window subscribes
// to it) and always reads as released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonId {
    Back,
    Up,
    Select,
    Down,
}

impl ButtonId {
    /// The three buttons whose state the engine tracks, in slot order.
    pub const TRACKED: [ButtonId; 3] = [ButtonId::Up, ButtonId::Select, ButtonId::Down];

    /// Returns the tracker slot for this button, or `None` for untracked ids.
    pub(crate) const fn slot(self) -> Option<usize> {
        match self {
            Self::Up => Some(0),
            Self::Select => Some(1),
            Self::Down => Some(2),
            Self::Back => None,
        }
    }
}

//=== ButtonEvent Enum ====================================================
// A single button signal as delivered by the host.
//
// `Pressed` / `Released` are raw transitions. `Clicked` is emitted by the
// host's click recognizer after a short press + release and is orthogonal
// to the raw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    Pressed(ButtonId),
    Released(ButtonId),
    Clicked(ButtonId),
}

impl ButtonEvent {
    /// Returns the button this event refers to.
    pub const fn button(self) -> ButtonId {
        match self {
            Self::Pressed(id) | Self::Released(id) | Self::Clicked(id) => id,
        }
    }

    /// Returns `true` for raw press/release transitions.
    pub const fn is_raw(self) -> bool {
        matches!(self, Self::Pressed(_) | Self::Released(_))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//! Protocol-agnostic events and actions.
//!
//! [`CoreEvent`] represents what the backend tells core.
//! [`CoreAction`] represents what core tells the backend to do.

use bitflags::bitflags;

use crate::input::{Keysym, Modifiers};
use crate::state::{Geometry, RegionId, ScreenId};
use crate::window::{WindowId, WindowInfo};

bitflags! {
    /// Fields present in a configure request. Bit values follow the X11
    /// `ConfigWindow` mask so backends can convert with `from_bits_truncate`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ConfigureMask: u16 {
        const X            = 1 << 0;
        const Y            = 1 << 1;
        const WIDTH        = 1 << 2;
        const HEIGHT       = 1 << 3;
        const BORDER_WIDTH = 1 << 4;
        const SIBLING      = 1 << 5;
        const STACK_MODE   = 1 << 6;
    }
}

/// Requested stacking position in a configure request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackPosition {
    #[default]
    Above,
    Below,
    TopIf,
    BottomIf,
    Opposite,
}

/// A client's request to change its own geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigureRequest {
    pub geometry: Geometry,
    pub border_width: u32,
    pub sibling: Option<WindowId>,
    pub stack_mode: StackPosition,
    pub mask: ConfigureMask,
}

/// Events that a backend sends to the core engine.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    /// A client window asks to be shown.
    MapRequest {
        window: WindowInfo,
        screen: ScreenId,
        pointer: Option<(i32, i32)>,
    },

    /// A window was destroyed.
    DestroyNotify { id: WindowId },

    /// A window asks for a new geometry.
    ConfigureRequest {
        id: WindowId,
        request: ConfigureRequest,
    },

    /// The pointer entered a window.
    EnterNotify { id: WindowId },

    /// A grabbed key was pressed.
    KeyPress {
        keysym: Keysym,
        modifiers: Modifiers,
        screen: ScreenId,
        pointer: Option<(i32, i32)>,
    },

    /// A button was pressed on the root window of `screen`.
    RootButtonPress { screen: ScreenId },

    /// Time to redraw the status bars. `clock` is the formatted local time.
    StatusTick { clock: String },
}

/// Border palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderColor {
    Focused,
    Unfocused,
}

/// ICCCM `WM_STATE` values the engine writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WmState {
    Normal,
}

impl WmState {
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Normal => 1,
        }
    }
}

/// Actions that core returns to the backend for execution, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreAction {
    /// Place a tiled window.
    Configure {
        id: WindowId,
        geometry: Geometry,
        border_width: u32,
    },

    /// Move and resize a floating window without touching its border.
    MoveResize { id: WindowId, geometry: Geometry },

    /// Raise a window to the top and map it.
    MapRaised { id: WindowId },

    /// Hide a window.
    Unmap { id: WindowId },

    SetBorderColor { id: WindowId, color: BorderColor },

    /// Give keyboard focus to a window.
    SetInputFocus { id: WindowId },

    /// Tell a client its geometry without changing it.
    SendConfigureNotify {
        id: WindowId,
        geometry: Geometry,
        border_width: u32,
    },

    /// Apply a configure request from an unmanaged window as-is.
    ForwardConfigure {
        id: WindowId,
        request: ConfigureRequest,
    },

    /// Start listening for enter, focus, property and structure events.
    SubscribeEvents { id: WindowId },

    SetWmState { id: WindowId, state: WmState },

    /// Show or hide every status bar.
    SetBarVisible { visible: bool },

    /// Draw `text` on the status bar of `region`.
    DrawStatus { region: RegionId, text: String },

    /// Status text is stale; the backend should send a `StatusTick`.
    RefreshStatus,

    /// Launch a program.
    Spawn { argv: Vec<String> },

    /// Re-execute the window manager.
    Restart,

    /// Leave the event loop.
    Exit,
}

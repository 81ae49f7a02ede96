//! Workspace management - virtual desktops.

use crate::layout::{LayoutKind, MasterSettings};
use crate::state::{RegionId, ScreenId};
use crate::window::WindowId;

/// Number of workspaces on every screen.
pub const WORKSPACE_COUNT: usize = 10;

/// Identifies a workspace slot: screen plus zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId {
    pub screen: ScreenId,
    pub index: usize,
}

impl WorkspaceId {
    pub const fn new(screen: ScreenId, index: usize) -> Self {
        Self { screen, index }
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ws:{}.{}", self.screen.0, self.index + 1)
    }
}

/// Direction for reordering a window inside its workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapTarget {
    Prev,
    Next,
    Main,
}

/// A virtual workspace/desktop.
///
/// The window list order is the tiling order: the head is the first master
/// window and stacking follows the list.
#[derive(Debug)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub windows: Vec<WindowId>,
    /// Region this workspace is shown on, if any.
    pub region: Option<RegionId>,
    /// Last focused window of this workspace.
    pub focus: Option<WindowId>,
    /// Geometry must be recomputed on the next relayout.
    pub dirty: bool,
    pub layout: LayoutKind,
    pub master: MasterSettings,
}

impl Workspace {
    pub fn new(id: WorkspaceId) -> Self {
        Self {
            id,
            windows: Vec::new(),
            region: None,
            focus: None,
            dirty: false,
            layout: LayoutKind::default(),
            master: MasterSettings::default(),
        }
    }

    pub fn contains(&self, window_id: WindowId) -> bool {
        self.windows.contains(&window_id)
    }

    pub fn position(&self, window_id: WindowId) -> Option<usize> {
        self.windows.iter().position(|&id| id == window_id)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn head(&self) -> Option<WindowId> {
        self.windows.first().copied()
    }

    /// Append to the tail. Returns `false` if already present.
    pub fn push(&mut self, window_id: WindowId) -> bool {
        if self.contains(window_id) {
            return false;
        }
        self.windows.push(window_id);
        true
    }

    /// Remove a window, clearing the retained focus if it pointed there.
    pub fn remove(&mut self, window_id: WindowId) -> bool {
        let Some(pos) = self.position(window_id) else {
            return false;
        };
        self.windows.remove(pos);
        if self.focus == Some(window_id) {
            self.focus = None;
        }
        true
    }

    /// Successor of `window_id`, wrapping to the head.
    pub fn next_of(&self, window_id: WindowId) -> Option<WindowId> {
        let pos = self.position(window_id)?;
        self.windows.get((pos + 1) % self.windows.len()).copied()
    }

    /// Predecessor of `window_id`, wrapping to the tail.
    pub fn prev_of(&self, window_id: WindowId) -> Option<WindowId> {
        let pos = self.position(window_id)?;
        let len = self.windows.len();
        self.windows.get((pos + len - 1) % len).copied()
    }

    /// Focus to fall back on when `leaving` departs: its predecessor, or
    /// else the first other window.
    pub fn replacement_for(&self, leaving: WindowId) -> Option<WindowId> {
        match self.position(leaving) {
            Some(pos) if pos > 0 => Some(self.windows[pos - 1]),
            _ => self.windows.iter().copied().find(|&id| id != leaving),
        }
    }

    /// Reorder `window_id` within the list. Returns `true` if the order changed.
    pub fn swap(&mut self, window_id: WindowId, target: SwapTarget) -> bool {
        let Some(pos) = self.position(window_id) else {
            return false;
        };
        let len = self.windows.len();
        if len < 2 {
            return false;
        }

        match target {
            SwapTarget::Prev => {
                self.windows.remove(pos);
                if pos == 0 {
                    self.windows.push(window_id);
                } else {
                    self.windows.insert(pos - 1, window_id);
                }
            }
            SwapTarget::Next => {
                self.windows.remove(pos);
                if pos == len - 1 {
                    self.windows.insert(0, window_id);
                } else {
                    self.windows.insert(pos + 1, window_id);
                }
            }
            SwapTarget::Main => {
                if pos == 0 {
                    return false;
                }
                self.windows.swap(0, pos);
            }
        }
        true
    }
}

//! Focus manager.
//!
//! `State::focus.current` is the single global focus cell. It is written
//! only here; every other component goes through these operations.

use tracing::debug;

use crate::event::{BorderColor, CoreAction};
use crate::input::FocusTarget;
use crate::state::State;
use crate::window::{WindowId, WindowState};

impl State {
    /// Focus `id`.
    ///
    /// If its workspace is hidden only the workspace-local focus moves;
    /// otherwise the previous global focus is unfocused, the border is
    /// recolored and input focus is requested.
    pub fn focus_window(&mut self, id: WindowId) {
        if self.focus.current == Some(id) {
            return;
        }
        let Some(ws_id) = self.windows.get(&id).map(|w| w.workspace) else {
            return;
        };
        self.root_click = None;

        if !self.is_visible(ws_id) {
            if let Some(ws) = self.workspace_mut(ws_id) {
                ws.focus = Some(id);
            }
            return;
        }

        if let Some(prev) = self.focus.current {
            self.unfocus_window(prev);
        }

        let exclusive = match self.workspace_mut(ws_id) {
            Some(ws) => {
                ws.focus = Some(id);
                ws.layout.is_exclusive()
            }
            None => false,
        };
        if exclusive {
            // Max layout shows only the focused window
            self.mark_dirty(ws_id);
        }

        self.focus.current = Some(id);
        let recolor = match self.windows.get_mut(&id) {
            Some(window) => {
                let was_focused = window.is_focused();
                window.state.insert(WindowState::FOCUSED);
                !was_focused
            }
            None => false,
        };
        if recolor {
            self.emit(CoreAction::SetBorderColor {
                id,
                color: BorderColor::Focused,
            });
        }
        self.emit(CoreAction::SetInputFocus { id });
        debug!("Focused {}", id);
    }

    /// Drop focus from `id`, clearing its workspace's retained focus too.
    pub fn unfocus_window(&mut self, id: WindowId) {
        let Some(ws_id) = self.windows.get(&id).map(|w| w.workspace) else {
            return;
        };
        if let Some(ws) = self.workspace_mut(ws_id) {
            if ws.focus == Some(id) {
                ws.focus = None;
            }
        }
        self.clear_focus_flag(id);
    }

    /// Drop the global focus from `id` but keep it as its workspace's
    /// retained focus. Used when the workspace is about to be hidden.
    pub(crate) fn release_focus(&mut self, id: WindowId) {
        self.clear_focus_flag(id);
    }

    fn clear_focus_flag(&mut self, id: WindowId) {
        let visible = self
            .windows
            .get(&id)
            .is_some_and(|w| self.is_visible(w.workspace));
        let recolor = match self.windows.get_mut(&id) {
            Some(window) if window.is_focused() => {
                window.state.remove(WindowState::FOCUSED);
                visible
            }
            _ => false,
        };
        if recolor {
            self.emit(CoreAction::SetBorderColor {
                id,
                color: BorderColor::Unfocused,
            });
        }
        if self.focus.current == Some(id) {
            self.focus.current = None;
        }
    }

    /// Move focus within the focused window's workspace, wrapping around.
    pub fn focus_relative(&mut self, target: FocusTarget) {
        let Some(current) = self.focus.current else {
            return;
        };
        let Some(ws) = self.focused_workspace().and_then(|ws| self.workspace(ws)) else {
            return;
        };
        let next = match target {
            FocusTarget::Next => ws.next_of(current),
            FocusTarget::Prev => ws.prev_of(current),
            FocusTarget::Main => ws.head(),
        };
        match next {
            Some(next) if next != current => self.focus_window(next),
            _ => {}
        }
    }

    /// Handle the pointer crossing into `id`.
    pub fn pointer_enter(&mut self, id: WindowId) {
        if self.focus.ignore_enter > 0 {
            self.focus.ignore_enter -= 1;
            debug!("Ignoring enter on {} ({} left)", id, self.focus.ignore_enter);
            return;
        }
        if !self.config.general.focus_follows_mouse {
            return;
        }
        if self.windows.contains_key(&id) {
            self.focus_window(id);
        }
    }

    /// Expect `count` synthetic pointer crossings from the next restack.
    pub(crate) fn suppress_enter(&mut self, count: u32) {
        self.focus.ignore_enter = self.focus.ignore_enter.saturating_add(count);
    }
}

//! Invariant validation for the core state.
//!
//! Called after every `handle_event` / `exec` / `relayout` in debug builds.

use std::collections::HashMap;

use crate::state::State;
use crate::window::WindowId;
use crate::workspace::WorkspaceId;

/// Error indicating which invariant was violated.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("Region {region} shows {workspace} but the workspace is bound to {bound:?}")]
    RegionBinding {
        region: usize,
        workspace: WorkspaceId,
        bound: Option<usize>,
    },

    #[error("{workspace} claims region {region} which shows another workspace")]
    WorkspaceBinding { workspace: WorkspaceId, region: usize },

    #[error("{0} appears in more than one workspace list")]
    DuplicateMembership(WindowId),

    #[error("{0} is managed but in no workspace list")]
    Orphaned(WindowId),

    #[error("{window} is listed on {listed} but records {recorded}")]
    WorkspaceMismatch {
        window: WindowId,
        listed: WorkspaceId,
        recorded: WorkspaceId,
    },

    #[error("{0} is listed but not managed")]
    UnknownWindow(WindowId),

    #[error("Focused window {0} is not its workspace's focus")]
    FocusMismatch(WindowId),

    #[error("Focused window {0} is on a hidden workspace")]
    FocusHidden(WindowId),

    #[error("Focused window {0} does not exist")]
    FocusedWindowMissing(WindowId),

    #[error("{workspace} retains focus on {window} which it does not contain")]
    StaleRetainedFocus {
        workspace: WorkspaceId,
        window: WindowId,
    },

    #[error("{0} moved to another screen")]
    ScreenChanged(WindowId),
}

/// Validate all core invariants. Returns the first violation found.
pub fn validate(state: &State) -> Result<(), InvariantError> {
    // 1. Region and workspace bindings are mutual inverses
    for region in &state.regions {
        let bound = state.workspace(region.workspace).and_then(|ws| ws.region);
        if bound != Some(region.id) {
            return Err(InvariantError::RegionBinding {
                region: region.id.0,
                workspace: region.workspace,
                bound: bound.map(|r| r.0),
            });
        }
    }
    for ws in state.workspaces() {
        if let Some(r) = ws.region {
            if state.region(r).map(|r| r.workspace) != Some(ws.id) {
                return Err(InvariantError::WorkspaceBinding {
                    workspace: ws.id,
                    region: r.0,
                });
            }
        }
    }

    // 2. Every window is in exactly one list, the one it records
    let mut seen: HashMap<WindowId, WorkspaceId> = HashMap::with_capacity(state.windows.len());
    for ws in state.workspaces() {
        for &id in &ws.windows {
            if seen.insert(id, ws.id).is_some() {
                return Err(InvariantError::DuplicateMembership(id));
            }
            let Some(window) = state.windows.get(&id) else {
                return Err(InvariantError::UnknownWindow(id));
            };
            if window.workspace != ws.id {
                return Err(InvariantError::WorkspaceMismatch {
                    window: id,
                    listed: ws.id,
                    recorded: window.workspace,
                });
            }
        }
        if let Some(f) = ws.focus {
            if !ws.contains(f) {
                return Err(InvariantError::StaleRetainedFocus {
                    workspace: ws.id,
                    window: f,
                });
            }
        }
    }
    if let Some(&id) = state.windows.keys().find(|id| !seen.contains_key(id)) {
        return Err(InvariantError::Orphaned(id));
    }

    // 3. Global focus is its workspace's focus, on a visible workspace
    if let Some(fid) = state.focus.current {
        let Some(window) = state.windows.get(&fid) else {
            return Err(InvariantError::FocusedWindowMissing(fid));
        };
        let Some(ws) = state.workspace(window.workspace) else {
            return Err(InvariantError::FocusedWindowMissing(fid));
        };
        if ws.focus != Some(fid) {
            return Err(InvariantError::FocusMismatch(fid));
        }
        if ws.region.is_none() {
            return Err(InvariantError::FocusHidden(fid));
        }
    }

    // 4. Windows stay on the screen they were admitted on
    for window in state.windows.values() {
        if window.workspace.screen != window.screen {
            return Err(InvariantError::ScreenChanged(window.id));
        }
    }

    Ok(())
}

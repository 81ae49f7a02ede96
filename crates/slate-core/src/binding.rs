//! Region/workspace binding and workspace-level commands.

use tracing::{debug, info};

use crate::event::CoreAction;
use crate::layout::MasterOp;
use crate::state::{RegionId, State};
use crate::window::WindowId;
use crate::workspace::{SwapTarget, WorkspaceId, WORKSPACE_COUNT};

impl State {
    /// Show workspace `index` on `region`.
    ///
    /// A hidden target replaces the region's current workspace; a target
    /// shown on another region trades places with it.
    pub fn switch_workspace(&mut self, region: RegionId, index: usize) {
        if index >= WORKSPACE_COUNT {
            return;
        }
        let Some((screen, old_id)) = self.region(region).map(|r| (r.screen, r.workspace)) else {
            return;
        };
        let new_id = WorkspaceId::new(screen, index);
        if new_id == old_id {
            return;
        }
        let Some(other_region) = self.workspace(new_id).map(|ws| ws.region) else {
            return;
        };

        match other_region {
            Some(other) => {
                if let Some(r) = self.regions.get_mut(other.0) {
                    r.workspace = old_id;
                }
                if let Some(ws) = self.workspace_mut(old_id) {
                    ws.region = Some(other);
                }
            }
            None => {
                // Show the new windows before hiding the old ones
                let shown = self.workspace(new_id).map(|ws| ws.windows.clone()).unwrap_or_default();
                for id in shown {
                    self.emit(CoreAction::MapRaised { id });
                }
                let hidden = self.workspace(old_id).map(|ws| ws.windows.clone()).unwrap_or_default();
                for id in hidden {
                    self.emit(CoreAction::Unmap { id });
                }
                if let Some(ws) = self.workspace_mut(old_id) {
                    ws.region = None;
                }
                if let Some(current) = self.focus.current {
                    if self.windows.get(&current).map(|w| w.workspace) == Some(old_id) {
                        self.release_focus(current);
                    }
                }
            }
        }

        if let Some(r) = self.regions.get_mut(region.0) {
            r.workspace = new_id;
        }
        let retained = match self.workspace_mut(new_id) {
            Some(ws) => {
                ws.region = Some(region);
                ws.focus
            }
            None => None,
        };
        self.mark_dirty(old_id);
        self.mark_dirty(new_id);
        self.suppress_enter(1);

        if let Some(id) = retained {
            self.focus_window(id);
        }
        self.emit(CoreAction::RefreshStatus);
        info!("{} now shows {}", region, new_id);
    }

    /// Move `id` to workspace `index` of its screen, appending it to the tail.
    pub fn send_to_workspace(&mut self, id: WindowId, index: usize) {
        if index >= WORKSPACE_COUNT {
            return;
        }
        let Some((old_id, screen)) = self.windows.get(&id).map(|w| (w.workspace, w.screen)) else {
            return;
        };
        let new_id = WorkspaceId::new(screen, index);
        if new_id == old_id {
            return;
        }

        let replacement = match self.workspace_mut(old_id) {
            Some(ws) if ws.focus == Some(id) => {
                ws.focus = ws.replacement_for(id);
                ws.focus
            }
            Some(ws) => ws.focus,
            None => None,
        };
        if self.focus.current == Some(id) {
            self.release_focus(id);
            if let Some(next) = replacement {
                self.focus_window(next);
            }
        }

        self.emit(CoreAction::Unmap { id });

        if let Some(ws) = self.workspace_mut(old_id) {
            ws.remove(id);
        }
        if let Some(ws) = self.workspace_mut(new_id) {
            ws.push(id);
            if ws.window_count() == 1 {
                ws.focus = Some(id);
            }
        }
        if let Some(window) = self.windows.get_mut(&id) {
            window.workspace = new_id;
        }

        self.mark_dirty(old_id);
        self.mark_dirty(new_id);
        debug!("Sent {} from {} to {}", id, old_id, new_id);
    }

    /// Reorder `id` within its workspace.
    pub fn swap_window(&mut self, id: WindowId, target: SwapTarget) {
        let Some(ws_id) = self.windows.get(&id).map(|w| w.workspace) else {
            return;
        };
        let changed = self
            .workspace_mut(ws_id)
            .is_some_and(|ws| ws.swap(id, target));
        if changed {
            self.suppress_enter(2);
            self.mark_dirty(ws_id);
        }
    }

    /// Switch the workspace on `region` to the next tiling algorithm.
    pub fn cycle_layout(&mut self, region: RegionId) {
        let Some(ws_id) = self.region(region).map(|r| r.workspace) else {
            return;
        };
        if let Some(ws) = self.workspace_mut(ws_id) {
            ws.layout = ws.layout.cycle();
            ws.dirty = true;
            debug!("{} layout is now {}", ws_id, ws.layout);
        }
        self.suppress_enter(1);
    }

    /// Adjust the master area of the workspace on `region`.
    ///
    /// Always relayouts afterwards, except for `Init`.
    pub fn adjust_master(&mut self, region: RegionId, op: MasterOp) {
        let Some(ws_id) = self.region(region).map(|r| r.workspace) else {
            return;
        };
        if let Some(ws) = self.workspace_mut(ws_id) {
            let kind = ws.layout;
            if let Some(master) = ws.master.get_mut(kind) {
                master.apply(op);
            }
            if op.needs_relayout() {
                ws.dirty = true;
            }
        }
    }

    /// Show or hide the status bars.
    pub fn toggle_bar(&mut self) {
        self.bar.enabled = !self.bar.enabled;
        self.emit(CoreAction::SetBarVisible {
            visible: self.bar.enabled,
        });
        self.mark_all_dirty();
        self.emit(CoreAction::RefreshStatus);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::event::CoreAction;
    use crate::layout::{LayoutKind, MasterConfig, MasterOp};
    use crate::state::{Geometry, RegionId, ScreenId, State, Topology};
    use crate::window::{WindowId, WindowInfo};
    use crate::workspace::{SwapTarget, WorkspaceId};
    use pretty_assertions::assert_eq;

    fn ws(index: usize) -> WorkspaceId {
        WorkspaceId::new(ScreenId(0), index)
    }

    fn state(regions: usize) -> State {
        let rects = (0..regions)
            .map(|n| Geometry::new(n as i32 * 1000, 0, 1000, 800))
            .collect();
        State::new(
            Config::default(),
            &Topology {
                screens: vec![rects],
                bar_height: 0,
            },
        )
        .unwrap()
    }

    fn admit(state: &mut State, id: u64) {
        let info = WindowInfo {
            id: WindowId(id),
            geometry: Geometry::new(0, 0, 100, 100),
            ..Default::default()
        };
        state.admit(&info, ScreenId(0), None);
    }

    #[test]
    fn test_switch_to_hidden_workspace() {
        let mut state = state(1);
        admit(&mut state, 1);
        state.take_actions();

        state.switch_workspace(RegionId(0), 3);
        assert_eq!(state.regions[0].workspace, ws(3));
        assert_eq!(state.workspace(ws(3)).unwrap().region, Some(RegionId(0)));
        assert_eq!(state.workspace(ws(0)).unwrap().region, None);
        assert_eq!(state.focus.current, None);
        assert_eq!(state.workspace(ws(0)).unwrap().focus, Some(WindowId(1)));
        assert!(state.take_actions().contains(&CoreAction::Unmap { id: WindowId(1) }));

        // Switching back restores the retained focus
        state.switch_workspace(RegionId(0), 0);
        assert_eq!(state.focus.current, Some(WindowId(1)));
        assert_eq!(state.focus.ignore_enter, 2);
    }

    #[test]
    fn test_switch_maps_before_unmapping() {
        let mut state = state(1);
        admit(&mut state, 1);
        state.send_to_workspace(WindowId(1), 2);
        admit(&mut state, 2);
        state.take_actions();

        state.switch_workspace(RegionId(0), 2);
        let actions = state.take_actions();
        let map = actions
            .iter()
            .position(|a| *a == CoreAction::MapRaised { id: WindowId(1) })
            .unwrap();
        let unmap = actions
            .iter()
            .position(|a| *a == CoreAction::Unmap { id: WindowId(2) })
            .unwrap();
        assert!(map < unmap, "expected map before unmap: {actions:?}");
    }

    #[test]
    fn test_switch_same_workspace_is_noop() {
        let mut state = state(1);
        state.switch_workspace(RegionId(0), 0);
        assert!(state.take_actions().is_empty());
        assert_eq!(state.focus.ignore_enter, 0);
    }

    #[test]
    fn test_swap_regions() {
        let mut state = state(2);
        state.switch_workspace(RegionId(0), 1);
        assert_eq!(state.regions[0].workspace, ws(1));
        assert_eq!(state.regions[1].workspace, ws(0));
        assert_eq!(state.workspace(ws(0)).unwrap().region, Some(RegionId(1)));
        assert_eq!(state.workspace(ws(1)).unwrap().region, Some(RegionId(0)));
    }

    #[test]
    fn test_send_to_workspace() {
        let mut state = state(1);
        admit(&mut state, 1);
        admit(&mut state, 2);
        state.send_to_workspace(WindowId(2), 1);

        assert_eq!(state.workspace(ws(0)).unwrap().windows, vec![WindowId(1)]);
        assert_eq!(state.workspace(ws(0)).unwrap().focus, Some(WindowId(1)));
        assert_eq!(state.workspace(ws(1)).unwrap().windows, vec![WindowId(2)]);
        assert_eq!(state.workspace(ws(1)).unwrap().focus, Some(WindowId(2)));
        assert_eq!(state.windows[&WindowId(2)].workspace, ws(1));
        assert_eq!(state.focus.current, Some(WindowId(1)));
        assert!(state.workspace(ws(1)).unwrap().dirty);
    }

    #[test]
    fn test_send_to_nonempty_keeps_target_focus() {
        let mut state = state(1);
        admit(&mut state, 1);
        state.send_to_workspace(WindowId(1), 1);
        admit(&mut state, 2);
        state.send_to_workspace(WindowId(2), 1);
        assert_eq!(state.workspace(ws(1)).unwrap().focus, Some(WindowId(1)));
        assert_eq!(state.focus.current, None);
    }

    #[test]
    fn test_swap_marks_dirty_and_suppresses() {
        let mut state = state(1);
        admit(&mut state, 1);
        admit(&mut state, 2);
        state.workspace_mut(ws(0)).unwrap().dirty = false;

        state.swap_window(WindowId(2), SwapTarget::Main);
        assert_eq!(
            state.workspace(ws(0)).unwrap().windows,
            vec![WindowId(2), WindowId(1)]
        );
        assert!(state.workspace(ws(0)).unwrap().dirty);
        assert_eq!(state.focus.ignore_enter, 2);
    }

    #[test]
    fn test_master_adjustments_per_layout() {
        let mut state = state(1);
        state.adjust_master(RegionId(0), MasterOp::Grow);
        state.adjust_master(RegionId(0), MasterOp::Add);
        let w = state.workspace(ws(0)).unwrap();
        assert_eq!(w.master.vertical, MasterConfig { size: 17, count: 2 });
        assert_eq!(w.master.horizontal, MasterConfig::default());
        assert!(w.dirty);

        state.cycle_layout(RegionId(0));
        state.cycle_layout(RegionId(0));
        assert_eq!(state.workspace(ws(0)).unwrap().layout, LayoutKind::Max);
        state.adjust_master(RegionId(0), MasterOp::Shrink);
        assert_eq!(
            state.workspace(ws(0)).unwrap().master.vertical,
            MasterConfig { size: 17, count: 2 }
        );
    }

    #[test]
    fn test_master_init_does_not_dirty() {
        let mut state = state(1);
        state.adjust_master(RegionId(0), MasterOp::Init);
        assert!(!state.workspace(ws(0)).unwrap().dirty);
    }

    #[test]
    fn test_toggle_bar() {
        let mut state = state(2);
        assert!(state.bar.enabled);
        state.toggle_bar();
        assert!(!state.bar.enabled);
        assert!(state.workspaces().all(|w| w.dirty));
        assert_eq!(
            state.take_actions(),
            vec![
                CoreAction::SetBarVisible { visible: false },
                CoreAction::RefreshStatus
            ]
        );
    }
}

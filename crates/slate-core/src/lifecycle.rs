//! Window lifecycle: admission, withdrawal and configure requests.

use tracing::{debug, info};

use crate::event::{ConfigureMask, ConfigureRequest, CoreAction, WmState};
use crate::layout::BORDER_WIDTH;
use crate::state::ScreenId;
use crate::window::{Window, WindowId, WindowInfo, WindowState};

impl crate::state::State {
    /// Start managing a window.
    ///
    /// Override-redirect windows are ignored and already managed windows
    /// are left alone. New windows go to the tail of the workspace shown
    /// on the region picked by [`region_for`](Self::region_for) and get
    /// focus immediately.
    pub fn admit(&mut self, info: &WindowInfo, screen: ScreenId, pointer: Option<(i32, i32)>) {
        if info.override_redirect {
            debug!("Not managing override-redirect window {}", info.id);
            return;
        }
        if self.windows.contains_key(&info.id) {
            debug!("{} is already managed", info.id);
            return;
        }
        let Some(ws_id) = self
            .region_for(screen, pointer)
            .and_then(|r| self.region(r))
            .map(|r| r.workspace)
        else {
            return;
        };

        let mut window = Window::new(info, ws_id);
        if self.float_policy.should_float(info) {
            window.state.insert(WindowState::FLOATING);
        }
        info!(
            "Managing {} on {} (class {:?}, floating {}, transient {})",
            info.id,
            ws_id,
            info.class,
            window.is_floating(),
            window.is_transient()
        );

        self.windows.insert(info.id, window);
        if let Some(ws) = self.workspace_mut(ws_id) {
            ws.push(info.id);
            ws.dirty = true;
        }

        self.emit(CoreAction::SubscribeEvents { id: info.id });
        self.emit(CoreAction::SetWmState {
            id: info.id,
            state: WmState::Normal,
        });
        self.focus_window(info.id);
    }

    /// Stop managing a destroyed window.
    ///
    /// Focus is handed to a replacement (predecessor, else the first
    /// remaining window) before the window leaves the list.
    pub fn withdraw(&mut self, id: WindowId) {
        let Some(ws_id) = self.windows.get(&id).map(|w| w.workspace) else {
            return;
        };

        let replacement = match self.workspace_mut(ws_id) {
            Some(ws) => {
                if ws.focus == Some(id) || ws.focus.is_none() {
                    ws.focus = ws.replacement_for(id);
                }
                ws.focus
            }
            None => None,
        };

        if self.focus.current == Some(id) {
            match replacement {
                Some(next) => self.focus_window(next),
                None => self.unfocus_window(id),
            }
        }

        if let Some(ws) = self.workspace_mut(ws_id) {
            ws.remove(id);
            ws.dirty = true;
        }
        self.windows.shift_remove(&id);
        info!("Withdrew {} from {}", id, ws_id);
    }

    /// Answer a client's configure request.
    ///
    /// Unmanaged windows get exactly what they asked for. Floating
    /// windows get the requested fields. Tiled windows are told their
    /// current geometry.
    pub fn configure_request(&mut self, id: WindowId, request: &ConfigureRequest) {
        let Some(window) = self.windows.get(&id) else {
            self.emit(CoreAction::ForwardConfigure { id, request: *request });
            return;
        };

        if !window.is_floating() {
            let geometry = window.geometry;
            self.emit(CoreAction::SendConfigureNotify {
                id,
                geometry,
                border_width: BORDER_WIDTH,
            });
            return;
        }

        let region_geometry = self
            .workspace(window.workspace)
            .and_then(|ws| ws.region)
            .and_then(|r| self.region(r))
            .map(|r| r.geometry);

        let mask = request.mask;
        let mut g = window.geometry;
        if mask.contains(ConfigureMask::X) {
            g.x = request.geometry.x;
        }
        if mask.contains(ConfigureMask::Y) {
            g.y = request.geometry.y;
        }
        if mask.contains(ConfigureMask::WIDTH) {
            g.width = request.geometry.width.max(1);
        }
        if mask.contains(ConfigureMask::HEIGHT) {
            g.height = request.geometry.height.max(1);
        }

        // Full-screen requests: push the border off the region edge.
        if let Some(r) = region_geometry {
            if g.width > r.width {
                g.x -= BORDER_WIDTH as i32;
                g.width += BORDER_WIDTH;
            }
            if g.height > r.height {
                g.y -= BORDER_WIDTH as i32;
                g.height += BORDER_WIDTH;
            }
        }

        if let Some(window) = self.windows.get_mut(&id) {
            window.geometry = g;
        }

        let moved_only = mask.intersects(ConfigureMask::X | ConfigureMask::Y)
            && !mask.intersects(ConfigureMask::WIDTH | ConfigureMask::HEIGHT);
        if moved_only {
            self.emit(CoreAction::SendConfigureNotify {
                id,
                geometry: g,
                border_width: BORDER_WIDTH,
            });
        }
        self.emit(CoreAction::MoveResize { id, geometry: g });
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::event::{ConfigureMask, ConfigureRequest, CoreAction, WmState};
    use crate::state::{Geometry, ScreenId, State, Topology};
    use crate::window::{WindowId, WindowInfo};
    use crate::workspace::WorkspaceId;
    use pretty_assertions::assert_eq;

    fn state() -> State {
        State::new(
            Config::default(),
            &Topology::single(Geometry::new(0, 0, 1024, 768), 0),
        )
        .unwrap()
    }

    fn info(id: u64) -> WindowInfo {
        WindowInfo {
            id: WindowId(id),
            geometry: Geometry::new(10, 10, 300, 200),
            ..Default::default()
        }
    }

    fn ws0() -> WorkspaceId {
        WorkspaceId::new(ScreenId(0), 0)
    }

    #[test]
    fn test_admit_appends_and_focuses() {
        let mut state = state();
        state.admit(&info(1), ScreenId(0), None);
        state.admit(&info(2), ScreenId(0), None);

        let ws = state.workspace(ws0()).unwrap();
        assert_eq!(ws.windows, vec![WindowId(1), WindowId(2)]);
        assert_eq!(ws.focus, Some(WindowId(2)));
        assert!(ws.dirty);
        assert_eq!(state.focus.current, Some(WindowId(2)));

        let actions = state.take_actions();
        assert!(actions.contains(&CoreAction::SetWmState {
            id: WindowId(1),
            state: WmState::Normal
        }));
        assert!(actions.contains(&CoreAction::SubscribeEvents { id: WindowId(2) }));
    }

    #[test]
    fn test_admit_is_idempotent() {
        let mut state = state();
        state.admit(&info(1), ScreenId(0), None);
        state.take_actions();
        state.admit(&info(1), ScreenId(0), None);
        assert_eq!(state.workspace(ws0()).unwrap().window_count(), 1);
        assert!(state.take_actions().is_empty());
    }

    #[test]
    fn test_override_redirect_ignored() {
        let mut state = state();
        let popup = WindowInfo {
            override_redirect: true,
            ..info(1)
        };
        state.admit(&popup, ScreenId(0), None);
        assert!(state.windows.is_empty());
    }

    #[test]
    fn test_classification() {
        let mut state = state();
        let video = WindowInfo {
            class: Some("MPlayer".into()),
            instance: Some("xv".into()),
            ..info(1)
        };
        state.admit(&video, ScreenId(0), None);
        assert!(state.windows[&WindowId(1)].is_floating());
    }

    #[test]
    fn test_withdraw_hands_focus_to_predecessor() {
        let mut state = state();
        for id in 1..=3 {
            state.admit(&info(id), ScreenId(0), None);
        }
        state.withdraw(WindowId(3));
        assert_eq!(state.focus.current, Some(WindowId(2)));
        assert_eq!(state.workspace(ws0()).unwrap().focus, Some(WindowId(2)));
        assert!(!state.windows.contains_key(&WindowId(3)));
    }

    #[test]
    fn test_withdraw_head_falls_back_to_next() {
        let mut state = state();
        state.admit(&info(1), ScreenId(0), None);
        state.admit(&info(2), ScreenId(0), None);
        state.focus_window(WindowId(1));
        state.withdraw(WindowId(1));
        assert_eq!(state.focus.current, Some(WindowId(2)));
    }

    #[test]
    fn test_withdraw_unknown_is_noop() {
        let mut state = state();
        state.withdraw(WindowId(42));
        assert!(state.take_actions().is_empty());
    }

    #[test]
    fn test_configure_unmanaged_forwarded() {
        let mut state = state();
        let request = ConfigureRequest {
            geometry: Geometry::new(1, 2, 3, 4),
            mask: ConfigureMask::all(),
            ..Default::default()
        };
        state.configure_request(WindowId(9), &request);
        assert_eq!(
            state.take_actions(),
            vec![CoreAction::ForwardConfigure {
                id: WindowId(9),
                request
            }]
        );
    }

    #[test]
    fn test_configure_tiled_is_acknowledged_only() {
        let mut state = state();
        state.admit(&info(1), ScreenId(0), None);
        state.take_actions();
        let request = ConfigureRequest {
            geometry: Geometry::new(0, 0, 50, 50),
            mask: ConfigureMask::WIDTH | ConfigureMask::HEIGHT,
            ..Default::default()
        };
        state.configure_request(WindowId(1), &request);
        assert_eq!(
            state.take_actions(),
            vec![CoreAction::SendConfigureNotify {
                id: WindowId(1),
                geometry: Geometry::new(10, 10, 300, 200),
                border_width: 1,
            }]
        );
    }

    #[test]
    fn test_configure_floating_applies_mask() {
        let mut state = state();
        let video = WindowInfo {
            class: Some("MPlayer".into()),
            instance: Some("xv".into()),
            ..info(1)
        };
        state.admit(&video, ScreenId(0), None);
        state.take_actions();

        let move_only = ConfigureRequest {
            geometry: Geometry::new(100, 50, 1, 1),
            mask: ConfigureMask::X | ConfigureMask::Y,
            ..Default::default()
        };
        state.configure_request(WindowId(1), &move_only);
        let moved = Geometry::new(100, 50, 300, 200);
        assert_eq!(
            state.take_actions(),
            vec![
                CoreAction::SendConfigureNotify {
                    id: WindowId(1),
                    geometry: moved,
                    border_width: 1,
                },
                CoreAction::MoveResize {
                    id: WindowId(1),
                    geometry: moved
                },
            ]
        );

        let fullscreen = ConfigureRequest {
            geometry: Geometry::new(0, 0, 1025, 768),
            mask: ConfigureMask::all(),
            ..Default::default()
        };
        state.configure_request(WindowId(1), &fullscreen);
        assert_eq!(
            state.take_actions(),
            vec![CoreAction::MoveResize {
                id: WindowId(1),
                geometry: Geometry::new(-1, 0, 1026, 768)
            }]
        );
    }
}

//! The stacking pass.
//!
//! Turns dirty workspaces into configure/map/unmap operations. Runs once
//! per batch of events.

use tracing::trace;

use crate::event::CoreAction;
use crate::layout::{arrange, center_floating, BORDER_WIDTH};
use crate::state::{RegionId, State};
use crate::window::WindowId;

impl State {
    /// Recompute geometry for every dirty workspace, then clear the flags.
    ///
    /// Hidden workspaces only lose their flag; their windows were unmapped
    /// when they were hidden.
    pub fn restack(&mut self) {
        let regions: Vec<RegionId> = self.regions.iter().map(|r| r.id).collect();
        for region in regions {
            self.restack_region(region);
        }

        for screen in &mut self.screens {
            for ws in &mut screen.workspaces {
                ws.dirty = false;
            }
        }
    }

    fn restack_region(&mut self, region: RegionId) {
        let Some(ws_id) = self.region(region).map(|r| r.workspace) else {
            return;
        };
        let Some(area) = self.layout_area(region) else {
            return;
        };
        // Floaters center on the whole region, bar included
        let Some(bounds) = self.region(region).map(|r| r.geometry) else {
            return;
        };
        let dialog_ratio = self.dialog_ratio;

        let (kind, master, order, focus) = match self.workspace_mut(ws_id) {
            Some(ws) if ws.dirty && !ws.is_empty() => {
                if ws.focus.is_none() {
                    ws.focus = ws.head();
                }
                (ws.layout, ws.master, ws.windows.clone(), ws.focus)
            }
            _ => return,
        };
        trace!("Restacking {} on {} ({})", ws_id, region, kind);

        let tiled: Vec<WindowId> = order
            .iter()
            .copied()
            .filter(|id| self.windows.get(id).is_some_and(|w| w.is_tiled()))
            .collect();
        let mut cells = arrange(kind, &master, tiled.len(), area).into_iter();

        for id in order {
            let Some(window) = self.windows.get_mut(&id) else {
                continue;
            };
            let shown = !kind.is_exclusive() || focus == Some(id);

            if window.is_tiled() {
                let Some(cell) = cells.next() else {
                    continue;
                };
                window.geometry = cell;
                self.emit(CoreAction::Configure {
                    id,
                    geometry: cell,
                    border_width: BORDER_WIDTH,
                });
            } else {
                let placed = center_floating(window.geometry, bounds, window.is_transient(), dialog_ratio);
                window.geometry = placed;
                self.emit(CoreAction::Configure {
                    id,
                    geometry: placed,
                    border_width: BORDER_WIDTH,
                });
            }

            if shown {
                self.emit(CoreAction::MapRaised { id });
            } else {
                self.emit(CoreAction::Unmap { id });
            }
        }

        if self.focus.current.is_none() {
            if let Some(id) = focus {
                self.focus_window(id);
            }
        }
    }

    /// Queue status bar text for every region.
    ///
    /// Regions are numbered from 1 per screen, as are workspaces.
    pub fn status_actions(&mut self, clock: &str) {
        if !self.bar.enabled {
            return;
        }
        let lines: Vec<(RegionId, String)> = self
            .screens
            .iter()
            .flat_map(|screen| screen.regions.iter().enumerate())
            .filter_map(|(n, &region)| {
                let r = self.region(region)?;
                Some((region, format!("{clock}     {}:{}", n + 1, r.workspace.index + 1)))
            })
            .collect();

        for (region, text) in lines {
            self.emit(CoreAction::DrawStatus { region, text });
        }
    }
}

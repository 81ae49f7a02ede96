//! Core window-manager state.
//!
//! Screens own their regions (by index into [`State::regions`]) and a fixed
//! array of workspaces. Windows live in a single arena keyed by
//! [`WindowId`]; workspaces refer to them by handle only.

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::Config;
use crate::event::CoreAction;
use crate::window::{FloatPolicy, FloatRules, Window, WindowId};
use crate::workspace::{Workspace, WorkspaceId, WORKSPACE_COUNT};

/// Geometry of a rectangular region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x + self.width as i32
            && y >= self.y
            && y < self.y + self.height as i32
    }

    #[allow(clippy::cast_possible_wrap)]
    pub const fn intersects(self, other: Self) -> bool {
        self.x < other.x + other.width as i32
            && self.x + self.width as i32 > other.x
            && self.y < other.y + other.height as i32
            && self.y + self.height as i32 > other.y
    }

    /// Swap the axes. Used to derive the horizontal split from the vertical one.
    pub const fn transpose(self) -> Self {
        Self::new(self.y, self.x, self.height, self.width)
    }

    /// Content geometry of a window whose outer cell is `self`.
    ///
    /// The origin stays put (X places the border outside the content);
    /// width and height never drop below one pixel.
    pub fn inset(self, border: u32) -> Self {
        Self::new(
            self.x,
            self.y,
            self.width.saturating_sub(2 * border).max(1),
            self.height.saturating_sub(2 * border).max(1),
        )
    }

    /// Outer cell of a window with this content geometry.
    pub const fn outset(self, border: u32) -> Self {
        Self::new(
            self.x,
            self.y,
            self.width + 2 * border,
            self.height + 2 * border,
        )
    }

    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Index of a screen (one X root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub usize);

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "screen:{}", self.0)
    }
}

/// Index of a region in [`State::regions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "region:{}", self.0)
    }
}

/// A viewport on a screen, usually one monitor.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: RegionId,
    pub screen: ScreenId,
    pub geometry: Geometry,
    /// The workspace currently shown here. Always bound.
    pub workspace: WorkspaceId,
}

/// A display adapter with its regions and workspace slots.
#[derive(Debug)]
pub struct Screen {
    pub id: ScreenId,
    pub regions: Vec<RegionId>,
    pub workspaces: Vec<Workspace>,
}

/// Monitor layout handed to the engine at startup.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// One entry per screen; each lists its region rectangles.
    pub screens: Vec<Vec<Geometry>>,
    /// Height of the status bar in pixels.
    pub bar_height: u32,
}

impl Topology {
    /// A single screen with a single region.
    pub fn single(geometry: Geometry, bar_height: u32) -> Self {
        Self {
            screens: vec![vec![geometry]],
            bar_height,
        }
    }
}

/// Errors building the state from a topology.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No screens in topology")]
    NoScreens,

    #[error("Screen {0} has no regions")]
    NoRegions(usize),

    #[error("Screen {screen} has {count} regions but only {max} workspaces")]
    TooManyRegions {
        screen: usize,
        count: usize,
        max: usize,
    },
}

/// Focus tracking.
///
/// `current` is the one window that has input focus process-wide. It is
/// only changed through the focus operations in [`crate::focus`].
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    pub current: Option<WindowId>,
    /// Pending synthetic pointer crossings to ignore.
    pub ignore_enter: u32,
}

/// Status bar state.
#[derive(Debug, Clone, Copy)]
pub struct BarState {
    pub enabled: bool,
    pub height: u32,
}

/// All window-manager state.
#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub screens: Vec<Screen>,
    pub regions: Vec<Region>,
    pub windows: IndexMap<WindowId, Window>,
    pub focus: FocusState,
    pub bar: BarState,
    /// Screen whose root window was clicked last; cleared on any focus change.
    pub root_click: Option<ScreenId>,
    pub(crate) float_policy: Box<dyn FloatPolicy>,
    pub(crate) dialog_ratio: f64,
    actions: Vec<CoreAction>,
}

impl State {
    pub fn new(config: Config, topology: &Topology) -> Result<Self, CoreError> {
        if topology.screens.is_empty() {
            return Err(CoreError::NoScreens);
        }

        let mut screens = Vec::with_capacity(topology.screens.len());
        let mut regions = Vec::new();

        for (screen_idx, rects) in topology.screens.iter().enumerate() {
            if rects.is_empty() {
                return Err(CoreError::NoRegions(screen_idx));
            }
            if rects.len() > WORKSPACE_COUNT {
                return Err(CoreError::TooManyRegions {
                    screen: screen_idx,
                    count: rects.len(),
                    max: WORKSPACE_COUNT,
                });
            }

            let screen_id = ScreenId(screen_idx);
            let mut workspaces: Vec<Workspace> = (0..WORKSPACE_COUNT)
                .map(|index| Workspace::new(WorkspaceId::new(screen_id, index)))
                .collect();
            let mut region_ids = Vec::with_capacity(rects.len());

            for (n, rect) in rects.iter().enumerate() {
                let id = RegionId(regions.len());
                let workspace = WorkspaceId::new(screen_id, n);
                workspaces[n].region = Some(id);
                regions.push(Region {
                    id,
                    screen: screen_id,
                    geometry: *rect,
                    workspace,
                });
                region_ids.push(id);
            }

            screens.push(Screen {
                id: screen_id,
                regions: region_ids,
                workspaces,
            });
        }

        let float_policy = Box::new(FloatRules::from_criteria(&config.rules));
        let dialog_ratio = config.general.dialog_ratio();
        let bar = BarState {
            enabled: config.bar.enabled,
            height: topology.bar_height,
        };

        Ok(Self {
            config,
            screens,
            regions,
            windows: IndexMap::new(),
            focus: FocusState::default(),
            bar,
            root_click: None,
            float_policy,
            dialog_ratio,
            actions: Vec::new(),
        })
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(id.0)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.screens.get(id.screen.0)?.workspaces.get(id.index)
    }

    pub fn workspace_mut(&mut self, id: WorkspaceId) -> Option<&mut Workspace> {
        self.screens.get_mut(id.screen.0)?.workspaces.get_mut(id.index)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    /// All workspaces of all screens.
    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.screens.iter().flat_map(|s| s.workspaces.iter())
    }

    /// Workspace of the globally focused window.
    pub fn focused_workspace(&self) -> Option<WorkspaceId> {
        self.focus
            .current
            .and_then(|id| self.windows.get(&id))
            .map(|w| w.workspace)
    }

    /// Whether `id` is currently shown on a region.
    pub fn is_visible(&self, id: WorkspaceId) -> bool {
        self.workspace(id).is_some_and(|ws| ws.region.is_some())
    }

    /// Area available for tiling in `region`: the region minus the bar.
    pub fn layout_area(&self, region: RegionId) -> Option<Geometry> {
        let mut area = self.region(region)?.geometry;
        if self.bar.enabled {
            let bar = self.bar.height.min(area.height.saturating_sub(1));
            area.y += bar as i32;
            area.height -= bar;
        }
        Some(area)
    }

    /// Pick the region an event on `screen` applies to.
    ///
    /// Prefers the region of the focused window, unless the root window
    /// of this screen was clicked last; then the region under the pointer;
    /// then the first region of the screen.
    pub fn region_for(&self, screen: ScreenId, pointer: Option<(i32, i32)>) -> Option<RegionId> {
        let screen_ref = self.screen(screen)?;

        if self.root_click != Some(screen) {
            let focused_region = self
                .focus
                .current
                .and_then(|id| self.windows.get(&id))
                .filter(|w| w.screen == screen)
                .and_then(|w| self.workspace(w.workspace))
                .and_then(|ws| ws.region);
            if focused_region.is_some() {
                return focused_region;
            }
        }

        if let Some((x, y)) = pointer {
            let hit = screen_ref
                .regions
                .iter()
                .copied()
                .find(|&r| self.region(r).is_some_and(|r| r.geometry.contains(x, y)));
            if hit.is_some() {
                return hit;
            }
        }

        screen_ref.regions.first().copied()
    }

    // ── Mutation helpers ─────────────────────────────────────────────

    pub(crate) fn emit(&mut self, action: CoreAction) {
        self.actions.push(action);
    }

    pub(crate) fn take_actions(&mut self) -> Vec<CoreAction> {
        std::mem::take(&mut self.actions)
    }

    pub(crate) fn mark_dirty(&mut self, id: WorkspaceId) {
        if let Some(ws) = self.workspace_mut(id) {
            ws.dirty = true;
        }
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        for screen in &mut self.screens {
            for ws in &mut screen.workspaces {
                ws.dirty = true;
            }
        }
    }

    /// Replace the floating classification rule.
    pub fn set_float_policy(&mut self, policy: Box<dyn FloatPolicy>) {
        self.float_policy = policy;
    }

    /// Check invariants (debug helper).
    pub fn validate_invariants(&self) -> Result<(), crate::invariants::InvariantError> {
        crate::invariants::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_monitors() -> Topology {
        Topology {
            screens: vec![vec![
                Geometry::new(0, 0, 1920, 1080),
                Geometry::new(1920, 0, 1280, 1024),
            ]],
            bar_height: 14,
        }
    }

    #[test]
    fn test_geometry_contains() {
        let g = Geometry::new(10, 10, 100, 100);
        assert!(g.contains(10, 10));
        assert!(g.contains(109, 109));
        assert!(!g.contains(110, 50));
    }

    #[test]
    fn test_inset_outset() {
        let cell = Geometry::new(5, 5, 100, 50);
        assert_eq!(cell.inset(1), Geometry::new(5, 5, 98, 48));
        assert_eq!(cell.inset(1).outset(1), cell);
        assert_eq!(Geometry::new(0, 0, 1, 1).inset(1), Geometry::new(0, 0, 1, 1));
    }

    #[test]
    fn test_regions_bound_to_matching_workspaces() {
        let state = State::new(Config::default(), &two_monitors()).unwrap();
        assert_eq!(state.regions.len(), 2);
        assert_eq!(state.screens[0].workspaces.len(), WORKSPACE_COUNT);
        for region in &state.regions {
            assert_eq!(region.workspace.index, region.id.0);
            let ws = state.workspace(region.workspace).unwrap();
            assert_eq!(ws.region, Some(region.id));
        }
        assert!(!state.is_visible(WorkspaceId::new(ScreenId(0), 2)));
    }

    #[test]
    fn test_topology_errors() {
        assert!(matches!(
            State::new(Config::default(), &Topology::default()),
            Err(CoreError::NoScreens)
        ));

        let empty = Topology {
            screens: vec![vec![]],
            bar_height: 0,
        };
        assert!(matches!(
            State::new(Config::default(), &empty),
            Err(CoreError::NoRegions(0))
        ));

        let crowded = Topology {
            screens: vec![vec![Geometry::new(0, 0, 10, 10); 11]],
            bar_height: 0,
        };
        assert!(matches!(
            State::new(Config::default(), &crowded),
            Err(CoreError::TooManyRegions { count: 11, .. })
        ));
    }

    #[test]
    fn test_layout_area_subtracts_bar() {
        let mut state = State::new(Config::default(), &two_monitors()).unwrap();
        assert_eq!(
            state.layout_area(RegionId(1)),
            Some(Geometry::new(1920, 14, 1280, 1010))
        );
        state.bar.enabled = false;
        assert_eq!(
            state.layout_area(RegionId(1)),
            Some(Geometry::new(1920, 0, 1280, 1024))
        );
    }

    #[test]
    fn test_region_for_pointer() {
        let state = State::new(Config::default(), &two_monitors()).unwrap();
        assert_eq!(state.region_for(ScreenId(0), Some((2000, 10))), Some(RegionId(1)));
        assert_eq!(state.region_for(ScreenId(0), Some((5, 10))), Some(RegionId(0)));
        assert_eq!(state.region_for(ScreenId(0), None), Some(RegionId(0)));
        assert_eq!(state.region_for(ScreenId(3), None), None);
    }
}

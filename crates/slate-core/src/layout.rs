//! Tiling algorithms.
//!
//! Pure functions from (window count, area, parameters) to a list of
//! content geometries. Every algorithm works on *outer* cells that tile
//! the area exactly; the returned geometry is the cell inset by the
//! window border, which is what the display server wants in a configure.

use serde::{Deserialize, Serialize};

use crate::state::Geometry;

/// Border drawn around every managed window, in pixels.
pub const BORDER_WIDTH: u32 = 1;

/// The master area is sized in 1/`MASTER_SLICES` steps of the area.
pub const MASTER_SLICES: u32 = 32;

/// Default master size: half the area.
pub const DEFAULT_MASTER_SIZE: u32 = 16;

/// Default number of windows in the master area.
pub const DEFAULT_MASTER_COUNT: u32 = 1;

/// Fallback ratio for transient windows when the configured one is out of range.
pub const DEFAULT_DIALOG_RATIO: f64 = 0.6;

/// Tiling algorithm of a workspace.
///
/// `cycle` walks the ring Vertical → Horizontal → Max → Vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Vertical,
    Horizontal,
    Max,
}

impl LayoutKind {
    pub const fn cycle(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Max,
            Self::Max => Self::Vertical,
        }
    }

    /// Max has no master area, so master adjustments are ignored there.
    pub const fn has_master(self) -> bool {
        !matches!(self, Self::Max)
    }

    /// Whether only the focused window is shown.
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Max)
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// Adjustment applied to a [`MasterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterOp {
    Shrink,
    Grow,
    Add,
    Remove,
    Reset,
    Init,
}

impl MasterOp {
    /// Operations that change placement and therefore require a relayout.
    pub const fn needs_relayout(self) -> bool {
        !matches!(self, Self::Init)
    }
}

/// Master-area parameters of one algorithm on one workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterConfig {
    /// Master width (or height) in slices of [`MASTER_SLICES`].
    pub size: u32,
    /// Number of windows placed in the master area.
    pub count: u32,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_MASTER_SIZE,
            count: DEFAULT_MASTER_COUNT,
        }
    }
}

impl MasterConfig {
    /// Apply `op`. Returns `true` if anything changed.
    pub fn apply(&mut self, op: MasterOp) -> bool {
        let before = *self;
        match op {
            MasterOp::Shrink => {
                if self.size > 1 {
                    self.size -= 1;
                }
            }
            MasterOp::Grow => {
                if self.size < MASTER_SLICES - 1 {
                    self.size += 1;
                }
            }
            MasterOp::Add => self.count = self.count.saturating_add(1),
            MasterOp::Remove => self.count = self.count.saturating_sub(1),
            MasterOp::Reset | MasterOp::Init => *self = Self::default(),
        }
        *self != before
    }
}

/// Per-workspace master parameters, one set per algorithm that has a master area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MasterSettings {
    pub vertical: MasterConfig,
    pub horizontal: MasterConfig,
}

impl MasterSettings {
    pub const fn get(&self, kind: LayoutKind) -> Option<MasterConfig> {
        match kind {
            LayoutKind::Vertical => Some(self.vertical),
            LayoutKind::Horizontal => Some(self.horizontal),
            LayoutKind::Max => None,
        }
    }

    pub fn get_mut(&mut self, kind: LayoutKind) -> Option<&mut MasterConfig> {
        match kind {
            LayoutKind::Vertical => Some(&mut self.vertical),
            LayoutKind::Horizontal => Some(&mut self.horizontal),
            LayoutKind::Max => None,
        }
    }
}

/// Compute content geometries for `count` tiled windows in `area`.
///
/// Returns an empty list for `count == 0`. Each result is the matching
/// [`cells`] entry inset by [`BORDER_WIDTH`]; a cell too small to hold a
/// border still yields a 1x1 window at its origin.
pub fn arrange(kind: LayoutKind, master: &MasterSettings, count: usize, area: Geometry) -> Vec<Geometry> {
    cells(kind, master, count, area)
        .into_iter()
        .map(|cell| cell.inset(BORDER_WIDTH))
        .collect()
}

/// Outer cells for `count` tiled windows.
///
/// Tiling layouts cover `area` exactly with pairwise disjoint cells. When
/// a band has more rows than pixels, the extra rows get zero height.
pub fn cells(kind: LayoutKind, master: &MasterSettings, count: usize, area: Geometry) -> Vec<Geometry> {
    if count == 0 {
        return Vec::new();
    }

    match kind {
        LayoutKind::Vertical => columns(count, area, master.vertical),
        LayoutKind::Horizontal => columns(count, area.transpose(), master.horizontal)
            .into_iter()
            .map(Geometry::transpose)
            .collect(),
        LayoutKind::Max => vec![area; count],
    }
}

/// Outer cells for the vertical split: master column on the left, stack on the right.
fn columns(count: usize, area: Geometry, master: MasterConfig) -> Vec<Geometry> {
    let master_count = master.count as usize;
    let mut cells = Vec::with_capacity(count);

    // Both columns need at least one pixel
    if master_count > 0 && count > master_count && area.width >= 2 {
        let master_width = ((area.width / MASTER_SLICES) * master.size).clamp(1, area.width - 1);
        split_rows(
            &mut cells,
            Geometry::new(area.x, area.y, master_width, area.height),
            master_count,
        );
        split_rows(
            &mut cells,
            Geometry::new(
                area.x + master_width as i32,
                area.y,
                area.width - master_width,
                area.height,
            ),
            count - master_count,
        );
    } else {
        split_rows(&mut cells, area, count);
    }

    cells
}

/// Split `column` into `rows` stacked cells; the last one absorbs the remainder.
fn split_rows(cells: &mut Vec<Geometry>, column: Geometry, rows: usize) {
    let rows_u32 = rows as u32;
    if rows_u32 > column.height {
        // One pixel each while they last, then empty rows on the bottom edge
        let bottom = column.y + column.height as i32;
        for row in 0..rows_u32 {
            let cell = if row < column.height {
                Geometry::new(column.x, column.y + row as i32, column.width, 1)
            } else {
                Geometry::new(column.x, bottom, column.width, 0)
            };
            cells.push(cell);
        }
        return;
    }

    let row_height = column.height / rows_u32;
    let remainder = column.height - rows_u32 * row_height;

    for row in 0..rows_u32 {
        let height = if row + 1 == rows_u32 {
            row_height + remainder
        } else {
            row_height
        };
        cells.push(Geometry::new(
            column.x,
            column.y + (row * row_height) as i32,
            column.width,
            height,
        ));
    }
}

/// Place a floating or transient window centered in `area`.
///
/// Transient windows are resized to `dialog_ratio` of the area; floating
/// windows keep their `natural` size.
pub fn center_floating(natural: Geometry, area: Geometry, transient: bool, dialog_ratio: f64) -> Geometry {
    let (width, height) = if transient {
        (
            (f64::from(area.width) * dialog_ratio) as u32,
            (f64::from(area.height) * dialog_ratio) as u32,
        )
    } else {
        (natural.width, natural.height)
    };

    let x = area.x + (area.width as i32 - width as i32) / 2;
    let y = area.y + (area.height as i32 - height as i32) / 2;
    Geometry::new(x, y, width.max(1), height.max(1))
}

/// Validate a configured dialog ratio, falling back to the default when it
/// lies outside (0.3, 1.0].
pub fn sanitize_dialog_ratio(ratio: f64) -> f64 {
    if ratio > 1.0 || ratio <= 0.3 || ratio.is_nan() {
        DEFAULT_DIALOG_RATIO
    } else {
        ratio
    }
}

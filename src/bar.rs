//! Status bars: one thin window along the top of every region, drawn
//! with a core X font.

use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask, Font, Gcontext, Window,
    WindowClass,
};

use slate_core::state::{Geometry, RegionId};

use crate::backend::BackendError;

/// Longest status line drawn, in bytes.
const BAR_MAX: usize = 128;
/// Horizontal text offset inside the bar.
const TEXT_X: i16 = 4;

/// Pixel values used by the bars.
#[derive(Debug, Clone, Copy)]
pub struct BarColors {
    pub border: u32,
    pub background: u32,
    pub foreground: u32,
}

/// The first loadable font from the configured list.
#[derive(Debug, Clone, Copy)]
pub struct BarFont {
    pub id: Font,
    pub ascent: i16,
    pub descent: i16,
}

impl BarFont {
    pub fn load<C: Connection>(conn: &C, candidates: &[String]) -> Result<Self, BackendError> {
        for name in candidates {
            let id = conn.generate_id()?;
            if let Err(e) = conn.open_font(id, name.as_bytes())?.check() {
                debug!("Font {:?} unavailable: {}", name, e);
                continue;
            }
            let info = conn.query_font(id)?.reply()?;
            info!("Bar font {:?}", name);
            return Ok(Self {
                id,
                ascent: info.font_ascent,
                descent: info.font_descent,
            });
        }
        Err(BackendError::NoFont(candidates.to_vec()))
    }

    /// Outer height of a bar, border included.
    pub fn bar_height(&self) -> u32 {
        (i32::from(self.ascent) + i32::from(self.descent) + 3).max(3) as u32
    }
}

#[derive(Debug)]
struct StatusBar {
    region: RegionId,
    window: Window,
    gc: Gcontext,
    text: String,
}

/// All status bars.
#[derive(Debug)]
pub struct Bars {
    bars: Vec<StatusBar>,
    font: BarFont,
}

impl Bars {
    pub fn new(font: BarFont) -> Self {
        Self {
            bars: Vec::new(),
            font,
        }
    }

    /// Create the bar for `region` on `root`.
    pub fn create<C: Connection>(
        &mut self,
        conn: &C,
        root: Window,
        region: RegionId,
        geometry: Geometry,
        colors: BarColors,
        visible: bool,
    ) -> Result<(), BackendError> {
        let height = self.font.bar_height();
        let window = conn.generate_id()?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            window,
            root,
            geometry.x as i16,
            geometry.y as i16,
            geometry.width.saturating_sub(2).max(1) as u16,
            height.saturating_sub(2).max(1) as u16,
            1,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .background_pixel(colors.background)
                .border_pixel(colors.border)
                .override_redirect(1)
                .event_mask(EventMask::EXPOSURE),
        )?;

        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            window,
            &CreateGCAux::new()
                .foreground(colors.foreground)
                .background(colors.background)
                .font(self.font.id),
        )?;

        if visible {
            conn.map_window(window)?;
        }
        debug!("Bar {:#x} for {}", window, region);
        self.bars.push(StatusBar {
            region,
            window,
            gc,
            text: String::new(),
        });
        Ok(())
    }

    pub fn owns(&self, window: Window) -> bool {
        self.bars.iter().any(|b| b.window == window)
    }

    pub fn set_visible<C: Connection>(&self, conn: &C, visible: bool) -> Result<(), BackendError> {
        for bar in &self.bars {
            if visible {
                conn.map_window(bar.window)?;
            } else {
                conn.unmap_window(bar.window)?;
            }
        }
        Ok(())
    }

    /// Replace the text of `region`'s bar.
    pub fn draw<C: Connection>(&mut self, conn: &C, region: RegionId, text: &str) -> Result<(), BackendError> {
        let ascent = self.font.ascent;
        let Some(bar) = self.bars.iter_mut().find(|b| b.region == region) else {
            warn!("No bar for {}", region);
            return Ok(());
        };
        bar.text = truncate(text, BAR_MAX).to_string();
        Self::paint(conn, bar, ascent)
    }

    /// Repaint the bar window after an expose.
    pub fn redraw<C: Connection>(&self, conn: &C, window: Window) -> Result<(), BackendError> {
        match self.bars.iter().find(|b| b.window == window) {
            Some(bar) => Self::paint(conn, bar, self.font.ascent),
            None => Ok(()),
        }
    }

    fn paint<C: Connection>(conn: &C, bar: &StatusBar, ascent: i16) -> Result<(), BackendError> {
        conn.clear_area(false, bar.window, 0, 0, 0, 0)?;
        conn.image_text8(bar.window, bar.gc, TEXT_X, ascent, bar.text.as_bytes())?;
        Ok(())
    }

    pub fn destroy<C: Connection>(&mut self, conn: &C) -> Result<(), BackendError> {
        for bar in self.bars.drain(..) {
            conn.free_gc(bar.gc)?;
            conn.destroy_window(bar.window)?;
        }
        conn.close_font(self.font.id)?;
        Ok(())
    }
}

/// Cut `text` to at most `max` bytes on a character boundary.
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 128), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("aé", 2), "a");
    }

    #[test]
    fn test_bar_height() {
        let font = BarFont {
            id: 0,
            ascent: 11,
            descent: 2,
        };
        assert_eq!(font.bar_height(), 16);
    }
}

//! X11 backend.
//!
//! Owns the server connection and the calloop event loop. X events are
//! translated to [`CoreEvent`]s; the [`CoreAction`]s the engine returns
//! are turned back into requests. Geometry is recomputed once per batch
//! of events, after the queue has been drained.

use std::os::fd::AsFd;
use std::time::Duration;

use calloop::generic::Generic;
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, Interest, LoopSignal, Mode, PostAction};
use tracing::{debug, error, info, trace, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{
    AtomEnum, ChangeWindowAttributesAux, ConfigureNotifyEvent, ConfigureRequestEvent,
    ConfigureWindowAux, ConnectionExt as _, EventMask, Grab, GrabMode, InputFocus, MapState,
    Mapping, ModMask, NotifyDetail, NotifyMode, PropMode, Screen, StackMode, Window,
    CONFIGURE_NOTIFY_EVENT,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use slate_core::config::{ColorConfig, Config};
use slate_core::event::{BorderColor, ConfigureMask, ConfigureRequest, StackPosition, WmState};
use slate_core::state::{Geometry, ScreenId, Topology};
use slate_core::window::{WindowInfo, WindowType};
use slate_core::workspace::WORKSPACE_COUNT;
use slate_core::{Core, CoreAction, CoreEvent, WindowId};

use crate::backend::{BackendError, DisplayBackend};
use crate::bar::{BarColors, BarFont, Bars};
use crate::color::ColorSpec;
use crate::keymap::Keymap;
use crate::process;

/// Status bar clock format.
const CLOCK_FORMAT: &str = "%a %b %d %R %Z %Y";

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        WM_STATE,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DIALOG,
        _NET_WM_WINDOW_TYPE_UTILITY,
        _NET_WM_WINDOW_TYPE_TOOLBAR,
        _NET_WM_WINDOW_TYPE_SPLASH,
        _NET_WM_WINDOW_TYPE_MENU,
    }
}

/// Pixels resolved for one screen's colormap.
#[derive(Debug, Clone, Copy)]
struct Palette {
    focus: u32,
    unfocus: u32,
    bar: BarColors,
}

/// The X11 window manager backend.
pub struct X11Backend {
    conn: RustConnection,
    roots: Vec<Window>,
    atoms: Atoms,
    core: Core,
    keymap: Keymap,
    palettes: Vec<Palette>,
    bars: Bars,
    status_interval: Duration,
    status_due: bool,
    signal: Option<LoopSignal>,
    failure: Option<BackendError>,
}

impl X11Backend {
    /// Connect to `display`, take over as window manager and build the
    /// engine for the monitor layout found there.
    pub fn connect(display: Option<&str>, config: Config) -> Result<Self, BackendError> {
        let (conn, default_screen) = RustConnection::connect(display)
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;
        let roots: Vec<Window> = conn.setup().roots.iter().map(|s| s.root).collect();
        info!(
            "Connected to X11: {} screen(s), default screen {}",
            roots.len(),
            default_screen
        );

        become_wm(&conn, &roots)?;

        let atoms = Atoms::new(&conn)?.reply()?;
        let keymap = load_keymap(&conn)?;
        let font = BarFont::load(&conn, &config.bar.fonts)?;

        let mut palettes = Vec::with_capacity(roots.len());
        let mut screens = Vec::with_capacity(roots.len());
        for screen in &conn.setup().roots {
            palettes.push(resolve_palette(&conn, screen, &config.colors));
            screens.push(screen_regions(&conn, screen));
        }
        let topology = Topology {
            screens,
            bar_height: font.bar_height(),
        };

        let status_interval = Duration::from_secs(config.general.status_interval.max(1));
        let core = Core::new(config, &topology)?;

        Ok(Self {
            conn,
            roots,
            atoms,
            core,
            keymap,
            palettes,
            bars: Bars::new(font),
            status_interval,
            status_due: true,
            signal: None,
            failure: None,
        })
    }

    // ── Startup ──────────────────────────────────────────────────────

    /// Adopt windows that were mapped before we started. Transients go
    /// second so their parents are already managed.
    fn scan_existing_windows(&mut self) -> Result<(), BackendError> {
        for (n, &root) in self.roots.clone().iter().enumerate() {
            let tree = self.conn.query_tree(root)?.reply()?;
            let mut normal = Vec::new();
            let mut transient = Vec::new();

            for &window in &tree.children {
                if self.bars.owns(window) {
                    continue;
                }
                let Ok(attrs) = self.conn.get_window_attributes(window)?.reply() else {
                    continue;
                };
                if attrs.override_redirect {
                    continue;
                }
                if attrs.map_state != MapState::VIEWABLE && !self.in_normal_state(window)? {
                    continue;
                }
                let Some(info) = self.window_info(window)? else {
                    continue;
                };
                if info.transient_for.is_some() {
                    transient.push(info);
                } else {
                    normal.push(info);
                }
            }

            for info in normal.into_iter().chain(transient) {
                debug!("Adopting existing window {:#x}", info.id.0);
                let actions = self.core.admit(&info, ScreenId(n));
                self.apply(actions)?;
            }
        }
        Ok(())
    }

    /// Whether `window` carries `WM_STATE` Normal, as left behind by a
    /// previous manager instance.
    fn in_normal_state(&self, window: Window) -> Result<bool, BackendError> {
        let state = self
            .conn
            .get_property(false, window, self.atoms.WM_STATE, self.atoms.WM_STATE, 0, 2)?
            .reply()
            .ok()
            .and_then(|reply| reply.value32().and_then(|mut v| v.next()));
        Ok(state == Some(WmState::Normal.as_u32()))
    }

    fn create_bars(&mut self) -> Result<(), BackendError> {
        let visible = self.core.state.bar.enabled;
        for region in &self.core.state.regions {
            let root = self.roots[region.screen.0];
            let palette = self.palettes[region.screen.0];
            self.bars
                .create(&self.conn, root, region.id, region.geometry, palette.bar, visible)?;
        }
        Ok(())
    }

    fn grab_keys(&self) -> Result<(), BackendError> {
        for &root in &self.roots {
            self.conn.ungrab_key(Grab::ANY, root, ModMask::ANY)?;
            for binding in self.core.bindings() {
                let Some(keycode) = self.keymap.keycode(binding.keysym) else {
                    warn!("No keycode for keysym {:#x}", binding.keysym.0);
                    continue;
                };
                for mask in self.keymap.grab_masks(binding.modifiers) {
                    self.conn.grab_key(
                        true,
                        root,
                        ModMask::from(mask),
                        keycode,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?;
                }
            }
        }
        debug!("Grabbed {} bindings", self.core.input_manager.len());
        Ok(())
    }

    // ── Event translation (X → core) ─────────────────────────────────

    fn window_info(&self, window: Window) -> Result<Option<WindowInfo>, BackendError> {
        let attrs = match self.conn.get_window_attributes(window)?.reply() {
            Ok(attrs) => attrs,
            Err(e) => {
                debug!("Window {:#x} vanished: {}", window, e);
                return Ok(None);
            }
        };
        let Ok(geometry) = self.conn.get_geometry(window)?.reply() else {
            return Ok(None);
        };

        let transient_for = self
            .conn
            .get_property(false, window, AtomEnum::WM_TRANSIENT_FOR, AtomEnum::WINDOW, 0, 1)?
            .reply()
            .ok()
            .and_then(|reply| reply.value32().and_then(|mut v| v.next()))
            .filter(|&parent| parent != x11rb::NONE)
            .map(|parent| WindowId(u64::from(parent)));

        let (instance, class) = self
            .conn
            .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 256)?
            .reply()
            .map(|reply| parse_wm_class(&reply.value))
            .unwrap_or_default();

        let window_type = self
            .conn
            .get_property(
                false,
                window,
                self.atoms._NET_WM_WINDOW_TYPE,
                AtomEnum::ATOM,
                0,
                32,
            )?
            .reply()
            .ok()
            .and_then(|reply| {
                reply
                    .value32()
                    .and_then(|mut types| types.find_map(|atom| self.window_type(atom)))
            })
            .unwrap_or_default();

        Ok(Some(WindowInfo {
            id: WindowId(u64::from(window)),
            geometry: Geometry::new(
                geometry.x.into(),
                geometry.y.into(),
                geometry.width.into(),
                geometry.height.into(),
            ),
            override_redirect: attrs.override_redirect,
            transient_for,
            class,
            instance,
            window_type,
        }))
    }

    fn window_type(&self, atom: u32) -> Option<WindowType> {
        let a = &self.atoms;
        [
            (a._NET_WM_WINDOW_TYPE_DIALOG, WindowType::Dialog),
            (a._NET_WM_WINDOW_TYPE_UTILITY, WindowType::Utility),
            (a._NET_WM_WINDOW_TYPE_TOOLBAR, WindowType::Toolbar),
            (a._NET_WM_WINDOW_TYPE_SPLASH, WindowType::Splash),
            (a._NET_WM_WINDOW_TYPE_MENU, WindowType::Menu),
        ]
        .into_iter()
        .find_map(|(known, kind)| (known == atom).then_some(kind))
    }

    fn screen_of(&self, root: Window) -> ScreenId {
        ScreenId(self.roots.iter().position(|&r| r == root).unwrap_or(0))
    }

    fn pointer(&self, root: Window) -> Result<Option<(i32, i32)>, BackendError> {
        Ok(self
            .conn
            .query_pointer(root)?
            .reply()
            .ok()
            .filter(|reply| reply.same_screen)
            .map(|reply| (i32::from(reply.root_x), i32::from(reply.root_y))))
    }

    fn translate(&mut self, event: Event) -> Result<Option<CoreEvent>, BackendError> {
        let translated = match event {
            Event::MapRequest(e) => {
                trace!("MapRequest {:#x}", e.window);
                match self.window_info(e.window)? {
                    Some(window) => Some(CoreEvent::MapRequest {
                        window,
                        screen: self.screen_of(e.parent),
                        pointer: self.pointer(e.parent)?,
                    }),
                    None => None,
                }
            }

            Event::DestroyNotify(e) => Some(CoreEvent::DestroyNotify {
                id: WindowId(u64::from(e.window)),
            }),

            Event::ConfigureRequest(e) => Some(CoreEvent::ConfigureRequest {
                id: WindowId(u64::from(e.window)),
                request: configure_request(&e),
            }),

            Event::EnterNotify(e) => (e.mode == NotifyMode::NORMAL
                && e.detail != NotifyDetail::INFERIOR)
                .then(|| CoreEvent::EnterNotify {
                    id: WindowId(u64::from(e.event)),
                }),

            Event::KeyPress(e) => Some(CoreEvent::KeyPress {
                keysym: self.keymap.keysym(e.detail),
                modifiers: self.keymap.modifiers(u16::from(e.state)),
                screen: self.screen_of(e.root),
                pointer: Some((i32::from(e.root_x), i32::from(e.root_y))),
            }),

            Event::ButtonPress(e) if self.roots.contains(&e.event) => {
                Some(CoreEvent::RootButtonPress {
                    screen: self.screen_of(e.event),
                })
            }

            Event::Expose(e) if e.count == 0 => {
                self.bars.redraw(&self.conn, e.window)?;
                None
            }

            Event::MappingNotify(e) if e.request != Mapping::POINTER => {
                info!("Keyboard mapping changed, re-grabbing keys");
                self.keymap = load_keymap(&self.conn)?;
                self.grab_keys()?;
                None
            }

            Event::Error(e) => {
                debug!("X error: {:?}", e);
                None
            }

            _ => None,
        };
        Ok(translated)
    }

    // ── Action application (core → X) ────────────────────────────────

    fn apply(&mut self, actions: Vec<CoreAction>) -> Result<(), BackendError> {
        for action in actions {
            trace!("Applying {:?}", action);
            match action {
                CoreAction::Configure {
                    id,
                    geometry,
                    border_width,
                } => {
                    self.conn.configure_window(
                        xid(id),
                        &geometry_aux(geometry).border_width(border_width),
                    )?;
                }
                CoreAction::MoveResize { id, geometry } => {
                    self.conn.configure_window(xid(id), &geometry_aux(geometry))?;
                }
                CoreAction::MapRaised { id } => {
                    self.conn.configure_window(
                        xid(id),
                        &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
                    )?;
                    self.conn.map_window(xid(id))?;
                }
                CoreAction::Unmap { id } => {
                    self.conn.unmap_window(xid(id))?;
                }
                CoreAction::SetBorderColor { id, color } => {
                    let screen = self.core.state.window(id).map_or(0, |w| w.screen.0);
                    let Some(palette) = self.palettes.get(screen) else {
                        continue;
                    };
                    let pixel = match color {
                        BorderColor::Focused => palette.focus,
                        BorderColor::Unfocused => palette.unfocus,
                    };
                    self.conn.change_window_attributes(
                        xid(id),
                        &ChangeWindowAttributesAux::new().border_pixel(pixel),
                    )?;
                }
                CoreAction::SetInputFocus { id } => {
                    self.conn
                        .set_input_focus(InputFocus::POINTER_ROOT, xid(id), x11rb::CURRENT_TIME)?;
                }
                CoreAction::SendConfigureNotify {
                    id,
                    geometry,
                    border_width,
                } => {
                    let event = ConfigureNotifyEvent {
                        response_type: CONFIGURE_NOTIFY_EVENT,
                        sequence: 0,
                        event: xid(id),
                        window: xid(id),
                        above_sibling: x11rb::NONE,
                        x: geometry.x as i16,
                        y: geometry.y as i16,
                        width: geometry.width as u16,
                        height: geometry.height as u16,
                        border_width: border_width as u16,
                        override_redirect: false,
                    };
                    self.conn
                        .send_event(false, xid(id), EventMask::STRUCTURE_NOTIFY, event)?;
                }
                CoreAction::ForwardConfigure { id, request } => {
                    self.conn.configure_window(xid(id), &forward_aux(&request))?;
                }
                CoreAction::SubscribeEvents { id } => {
                    let mask = EventMask::ENTER_WINDOW
                        | EventMask::FOCUS_CHANGE
                        | EventMask::PROPERTY_CHANGE
                        | EventMask::STRUCTURE_NOTIFY;
                    self.conn.change_window_attributes(
                        xid(id),
                        &ChangeWindowAttributesAux::new().event_mask(mask),
                    )?;
                }
                CoreAction::SetWmState { id, state } => {
                    self.conn.change_property32(
                        PropMode::REPLACE,
                        xid(id),
                        self.atoms.WM_STATE,
                        self.atoms.WM_STATE,
                        &[state.as_u32(), x11rb::NONE],
                    )?;
                }
                CoreAction::SetBarVisible { visible } => {
                    self.bars.set_visible(&self.conn, visible)?;
                }
                CoreAction::DrawStatus { region, text } => {
                    self.bars.draw(&self.conn, region, &text)?;
                }
                CoreAction::RefreshStatus => self.status_due = true,
                CoreAction::Spawn { argv } => process::spawn(&argv),
                CoreAction::Restart => {
                    self.conn.flush()?;
                    process::restart();
                }
                CoreAction::Exit => {
                    if let Some(signal) = &self.signal {
                        signal.stop();
                    }
                }
            }
        }
        Ok(())
    }

    // ── Event loop ───────────────────────────────────────────────────

    /// Drain every queued X event, then relayout and redraw once.
    ///
    /// Replies read while translating may queue more events without the
    /// socket becoming readable again, so keep going until a pass finds
    /// nothing.
    fn process_pending(&mut self) -> Result<(), BackendError> {
        loop {
            let mut handled = 0usize;
            while let Some(event) = self.conn.poll_for_event()? {
                handled += 1;
                if let Some(core_event) = self.translate(event)? {
                    let actions = self.core.handle_event(core_event);
                    self.apply(actions)?;
                }
            }

            let actions = self.core.relayout();
            self.apply(actions)?;

            if self.status_due {
                self.status_due = false;
                let clock = chrono::Local::now().format(CLOCK_FORMAT).to_string();
                let actions = self.core.handle_event(CoreEvent::StatusTick { clock });
                self.apply(actions)?;
            }

            self.conn.flush()?;
            if handled == 0 {
                return Ok(());
            }
        }
    }

    fn step(&mut self) {
        if let Err(e) = self.process_pending() {
            error!("Fatal backend error: {}", e);
            self.failure = Some(e);
            if let Some(signal) = &self.signal {
                signal.stop();
            }
        }
    }
}

impl DisplayBackend for X11Backend {
    fn init(&mut self) -> Result<(), BackendError> {
        info!("Initializing X11 backend");
        process::reap_children_automatically();
        self.create_bars()?;
        self.scan_existing_windows()?;
        self.grab_keys()?;
        self.process_pending()
    }

    fn run(&mut self) -> Result<(), BackendError> {
        let mut event_loop: EventLoop<'_, Self> =
            EventLoop::try_new().map_err(|e| BackendError::EventLoop(e.to_string()))?;
        self.signal = Some(event_loop.get_signal());
        let handle = event_loop.handle();

        let fd = self.conn.stream().as_fd().try_clone_to_owned()?;
        handle
            .insert_source(
                Generic::new(fd, Interest::READ, Mode::Level),
                |_, _, backend: &mut Self| {
                    backend.step();
                    Ok(PostAction::Continue)
                },
            )
            .map_err(|e| BackendError::EventLoop(e.error.to_string()))?;

        let interval = self.status_interval;
        handle
            .insert_source(Timer::from_duration(interval), move |_, _, backend: &mut Self| {
                backend.status_due = true;
                TimeoutAction::ToDuration(interval)
            })
            .map_err(|e| BackendError::EventLoop(e.error.to_string()))?;

        info!("Entering event loop");
        event_loop
            .run(None, self, |backend| {
                if backend.failure.is_none() && !backend.core.should_exit {
                    backend.step();
                }
            })
            .map_err(|e| BackendError::EventLoop(e.to_string()))?;

        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn shutdown(&mut self) -> Result<(), BackendError> {
        info!("Shutting down X11 backend");
        self.bars.destroy(&self.conn)?;
        for &root in &self.roots {
            self.conn.ungrab_key(Grab::ANY, root, ModMask::ANY)?;
        }
        self.conn.flush()?;
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn xid(id: WindowId) -> Window {
    id.0 as Window
}

/// Select substructure redirection on every root. Fails if another
/// client already holds it.
fn become_wm(conn: &RustConnection, roots: &[Window]) -> Result<(), BackendError> {
    let mask = EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::ENTER_WINDOW
        | EventMask::BUTTON_PRESS;
    for &root in roots {
        conn.change_window_attributes(root, &ChangeWindowAttributesAux::new().event_mask(mask))?
            .check()
            .map_err(|_| BackendError::OtherWmRunning)?;
    }
    info!("Became the window manager");
    Ok(())
}

fn load_keymap(conn: &RustConnection) -> Result<Keymap, BackendError> {
    let setup = conn.setup();
    let min = setup.min_keycode;
    let count = setup.max_keycode - min + 1;
    let mapping = conn.get_keyboard_mapping(min, count)?.reply()?;
    let modmap = conn.get_modifier_mapping()?.reply()?;
    Ok(Keymap::new(
        min,
        mapping.keysyms_per_keycode,
        mapping.keysyms,
        &modmap.keycodes,
    ))
}

/// Regions of one screen: the active RandR CRTCs, or the whole screen.
fn screen_regions(conn: &RustConnection, screen: &Screen) -> Vec<Geometry> {
    let full = Geometry::new(
        0,
        0,
        u32::from(screen.width_in_pixels),
        u32::from(screen.height_in_pixels),
    );

    let mut regions = match crtc_regions(conn, screen.root) {
        Ok(regions) => regions,
        Err(e) => {
            debug!("RandR unavailable: {}", e);
            Vec::new()
        }
    };
    if regions.is_empty() {
        regions.push(full);
    }
    if regions.len() > WORKSPACE_COUNT {
        warn!(
            "{} monitors on screen {:#x}; using the first {}",
            regions.len(),
            screen.root,
            WORKSPACE_COUNT
        );
        regions.truncate(WORKSPACE_COUNT);
    }
    info!("Screen {:#x}: {} region(s)", screen.root, regions.len());
    regions
}

fn crtc_regions(conn: &RustConnection, root: Window) -> Result<Vec<Geometry>, BackendError> {
    if conn
        .extension_information(x11rb::protocol::randr::X11_EXTENSION_NAME)?
        .is_none()
    {
        return Ok(Vec::new());
    }
    conn.randr_query_version(1, 3)?.reply()?;
    let resources = conn.randr_get_screen_resources_current(root)?.reply()?;

    let mut regions = Vec::new();
    for crtc in resources.crtcs {
        let info = conn
            .randr_get_crtc_info(crtc, resources.config_timestamp)?
            .reply()?;
        if info.outputs.is_empty() || info.width == 0 || info.height == 0 {
            continue;
        }
        let g = Geometry::new(
            info.x.into(),
            info.y.into(),
            info.width.into(),
            info.height.into(),
        );
        // Mirrored outputs share one region
        if !regions.contains(&g) {
            regions.push(g);
        }
    }
    Ok(regions)
}

fn resolve_palette(conn: &RustConnection, screen: &Screen, colors: &ColorConfig) -> Palette {
    let pixel = |spec: &str| resolve_color(conn, screen, spec);
    Palette {
        focus: pixel(&colors.focus),
        unfocus: pixel(&colors.unfocus),
        bar: BarColors {
            border: pixel(&colors.bar_border),
            background: pixel(&colors.bar_background),
            foreground: pixel(&colors.bar_foreground),
        },
    }
}

/// Allocate `spec` in the screen's default colormap. Unknown colors fall
/// back to pixel 0.
fn resolve_color(conn: &RustConnection, screen: &Screen, spec: &str) -> u32 {
    let cmap = screen.default_colormap;
    let pixel = match ColorSpec::parse(spec) {
        ColorSpec::Rgb(r, g, b) => conn
            .alloc_color(cmap, r, g, b)
            .map_err(BackendError::from)
            .and_then(|cookie| cookie.reply().map_err(BackendError::from))
            .map(|reply| reply.pixel),
        ColorSpec::Named(name) => conn
            .alloc_named_color(cmap, name.as_bytes())
            .map_err(BackendError::from)
            .and_then(|cookie| cookie.reply().map_err(BackendError::from))
            .map(|reply| reply.pixel),
    };
    pixel.unwrap_or_else(|e| {
        warn!("Could not allocate color {:?}: {}", spec, e);
        0
    })
}

/// Split a `WM_CLASS` value into (instance, class).
fn parse_wm_class(value: &[u8]) -> (Option<String>, Option<String>) {
    let mut parts = value
        .split(|&b| b == 0)
        .map(|part| String::from_utf8_lossy(part).into_owned());
    let instance = parts.next().filter(|s| !s.is_empty());
    let class = parts.next().filter(|s| !s.is_empty());
    (instance, class)
}

fn configure_request(e: &ConfigureRequestEvent) -> ConfigureRequest {
    let stack_mode = match e.stack_mode {
        StackMode::BELOW => StackPosition::Below,
        StackMode::TOP_IF => StackPosition::TopIf,
        StackMode::BOTTOM_IF => StackPosition::BottomIf,
        StackMode::OPPOSITE => StackPosition::Opposite,
        _ => StackPosition::Above,
    };
    ConfigureRequest {
        geometry: Geometry::new(
            e.x.into(),
            e.y.into(),
            e.width.into(),
            e.height.into(),
        ),
        border_width: e.border_width.into(),
        sibling: (e.sibling != x11rb::NONE).then(|| WindowId(u64::from(e.sibling))),
        stack_mode,
        mask: ConfigureMask::from_bits_truncate(u16::from(e.value_mask)),
    }
}

fn geometry_aux(g: Geometry) -> ConfigureWindowAux {
    ConfigureWindowAux::new()
        .x(g.x)
        .y(g.y)
        .width(g.width)
        .height(g.height)
}

/// Configure an unmanaged window exactly as it asked.
fn forward_aux(request: &ConfigureRequest) -> ConfigureWindowAux {
    let mask = request.mask;
    let g = request.geometry;
    let mut aux = ConfigureWindowAux::new();
    if mask.contains(ConfigureMask::X) {
        aux = aux.x(g.x);
    }
    if mask.contains(ConfigureMask::Y) {
        aux = aux.y(g.y);
    }
    if mask.contains(ConfigureMask::WIDTH) {
        aux = aux.width(g.width);
    }
    if mask.contains(ConfigureMask::HEIGHT) {
        aux = aux.height(g.height);
    }
    if mask.contains(ConfigureMask::BORDER_WIDTH) {
        aux = aux.border_width(request.border_width);
    }
    if mask.contains(ConfigureMask::SIBLING) {
        aux = aux.sibling(request.sibling.map_or(x11rb::NONE, xid));
    }
    if mask.contains(ConfigureMask::STACK_MODE) {
        aux = aux.stack_mode(match request.stack_mode {
            StackPosition::Above => StackMode::ABOVE,
            StackPosition::Below => StackMode::BELOW,
            StackPosition::TopIf => StackMode::TOP_IF,
            StackPosition::BottomIf => StackMode::BOTTOM_IF,
            StackPosition::Opposite => StackMode::OPPOSITE,
        });
    }
    aux
}

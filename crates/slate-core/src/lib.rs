//! Slate Core - protocol-agnostic tiling window manager engine
//!
//! This crate contains all window manager logic (screens, regions,
//! workspaces, focus, tiling layouts, key commands) with zero dependencies
//! on the display protocol.
//!
//! The X11 backend translates protocol events into [`CoreEvent`]s, feeds
//! them to [`Core`], and applies the returned [`CoreAction`]s back to the
//! display server. After each batch of events it calls
//! [`relayout`](Core::relayout) once.
//!
//! # Quick Start
//! ```
//! use slate_core::{Core, CoreAction, CoreEvent, Command, Geometry, WindowId};
//! use slate_core::config::Config;
//! use slate_core::state::{ScreenId, Topology};
//! use slate_core::window::WindowInfo;
//!
//! let topology = Topology::single(Geometry::new(0, 0, 1920, 1080), 0);
//! let mut core = Core::new(Config::default(), &topology).unwrap();
//!
//! // Backend tells core a client wants to be mapped
//! core.handle_event(CoreEvent::MapRequest {
//!     window: WindowInfo {
//!         id: WindowId(0x40_0001),
//!         ..Default::default()
//!     },
//!     screen: ScreenId(0),
//!     pointer: None,
//! });
//!
//! // One relayout per batch of events
//! let actions = core.relayout();
//! assert!(actions.contains(&CoreAction::MapRaised { id: WindowId(0x40_0001) }));
//!
//! // A key binding resolved to a command
//! core.exec_focused(Command::Workspace(1));
//! ```

pub mod binding;
pub mod config;
pub mod event;
pub mod focus;
pub mod input;
pub mod invariants;
pub mod layout;
pub mod lifecycle;
pub mod stack;
pub mod state;
pub mod window;
pub mod workspace;

// Re-export primary API types at crate root
pub use event::{CoreAction, CoreEvent};
pub use input::Command;
pub use state::Geometry;
pub use window::WindowId;
pub use workspace::WorkspaceId;

use tracing::{debug, info, warn};

use config::Config;
use event::ConfigureRequest;
use input::{InputManager, KeyBinding, Keysym, Modifiers, ProgramSlot};
use state::{CoreError, RegionId, ScreenId, State, Topology};
use window::{FloatPolicy, WindowInfo};

/// The protocol-agnostic window manager engine.
///
/// Owns all WM state. Backends drive it via [`handle_event`](Core::handle_event)
/// and [`exec`](Core::exec), then apply the returned [`CoreAction`]s.
#[derive(Debug)]
pub struct Core {
    /// All window-manager state
    pub state: State,
    /// Key binding table
    pub input_manager: InputManager,
    /// Exit requested
    pub should_exit: bool,
}

impl Core {
    /// Create a new core engine for the given monitor layout.
    pub fn new(config: Config, topology: &Topology) -> Result<Self, CoreError> {
        let mut input_manager = InputManager::new();
        input_manager.load_bindings(&config.bindings);
        info!("Loaded {} key bindings", input_manager.len());

        let state = State::new(config, topology)?;
        info!(
            "Core ready: {} screen(s), {} region(s)",
            state.screens.len(),
            state.regions.len()
        );

        Ok(Self {
            state,
            input_manager,
            should_exit: false,
        })
    }

    // ── Event handling (backend → core) ──────────────────────────────

    /// Process a backend event. Returns actions the backend must apply.
    ///
    /// Geometry is not recomputed here; call [`relayout`](Self::relayout)
    /// once the current batch of events is drained.
    pub fn handle_event(&mut self, event: CoreEvent) -> Vec<CoreAction> {
        match event {
            CoreEvent::MapRequest {
                window,
                screen,
                pointer,
            } => self.on_map_request(&window, screen, pointer),

            CoreEvent::DestroyNotify { id } => self.on_destroy_notify(id),

            CoreEvent::ConfigureRequest { id, request } => {
                self.on_configure_request(id, &request);
            }

            CoreEvent::EnterNotify { id } => self.on_enter_notify(id),

            CoreEvent::KeyPress {
                keysym,
                modifiers,
                screen,
                pointer,
            } => self.on_key_press(keysym, modifiers, screen, pointer),

            CoreEvent::RootButtonPress { screen } => {
                debug!("Root window of {} clicked", screen);
                self.state.root_click = Some(screen);
            }

            CoreEvent::StatusTick { clock } => self.state.status_actions(&clock),
        }

        #[cfg(debug_assertions)]
        if let Err(e) = self.state.validate_invariants() {
            warn!("Invariant violation after handle_event: {}", e);
        }

        self.state.take_actions()
    }

    /// Execute a command against `region`. Returns actions.
    pub fn exec(&mut self, region: RegionId, command: Command) -> Vec<CoreAction> {
        debug!("exec on {}: {:?}", region, command);
        self.execute_command(region, command);

        #[cfg(debug_assertions)]
        if let Err(e) = self.state.validate_invariants() {
            warn!("Invariant violation after exec: {}", e);
        }

        self.state.take_actions()
    }

    /// Execute a command against the region of the focused window, or the
    /// first region of the first screen.
    pub fn exec_focused(&mut self, command: Command) -> Vec<CoreAction> {
        match self.state.region_for(ScreenId(0), None) {
            Some(region) => self.exec(region, command),
            None => Vec::new(),
        }
    }

    /// Recompute geometry for everything marked dirty since the last call.
    pub fn relayout(&mut self) -> Vec<CoreAction> {
        self.state.restack();

        #[cfg(debug_assertions)]
        if let Err(e) = self.state.validate_invariants() {
            warn!("Invariant violation after relayout: {}", e);
        }

        self.state.take_actions()
    }

    // ── Event handlers ───────────────────────────────────────────────

    fn on_map_request(&mut self, info: &WindowInfo, screen: ScreenId, pointer: Option<(i32, i32)>) {
        self.state.admit(info, screen, pointer);
    }

    fn on_destroy_notify(&mut self, id: WindowId) {
        self.state.withdraw(id);
    }

    fn on_configure_request(&mut self, id: WindowId, request: &ConfigureRequest) {
        self.state.configure_request(id, request);
    }

    fn on_enter_notify(&mut self, id: WindowId) {
        self.state.pointer_enter(id);
    }

    fn on_key_press(
        &mut self,
        keysym: Keysym,
        modifiers: Modifiers,
        screen: ScreenId,
        pointer: Option<(i32, i32)>,
    ) {
        let Some(command) = self.input_manager.lookup(keysym, modifiers).cloned() else {
            debug!("No binding for {:#x} with {:?}", keysym.0, modifiers);
            return;
        };
        let Some(region) = self.state.region_for(screen, pointer) else {
            return;
        };
        self.execute_command(region, command);
    }

    // ── Command execution ────────────────────────────────────────────

    fn execute_command(&mut self, region: RegionId, command: Command) {
        match command {
            Command::CycleLayout => self.state.cycle_layout(region),
            Command::Master(op) => self.state.adjust_master(region, op),
            Command::Swap(target) => {
                if let Some(id) = self.state.focus.current {
                    self.state.swap_window(id, target);
                }
            }
            Command::Focus(target) => self.state.focus_relative(target),
            Command::Workspace(index) => self.state.switch_workspace(region, index),
            Command::MoveToWorkspace(index) => {
                if let Some(id) = self.state.focus.current {
                    self.state.send_to_workspace(id, index);
                }
            }
            Command::ToggleBar => self.state.toggle_bar(),
            Command::Spawn(slot) => {
                let programs = &self.state.config.programs;
                let argv = match slot {
                    ProgramSlot::Terminal => programs.terminal.clone(),
                    ProgramSlot::Menu => programs.menu.clone(),
                };
                if argv.is_empty() {
                    warn!("No program configured for {:?}", slot);
                } else {
                    self.state.emit(CoreAction::Spawn { argv });
                }
            }
            Command::Exec(argv) => self.state.emit(CoreAction::Spawn { argv }),
            Command::Quit => {
                info!("Quit requested");
                self.should_exit = true;
                self.state.emit(CoreAction::Exit);
            }
            Command::Restart => {
                info!("Restart requested");
                self.state.emit(CoreAction::Restart);
            }
            Command::Unknown(cmd) => {
                warn!("Unknown command: {}", cmd);
            }
        }
    }

    // ── Direct entry points ──────────────────────────────────────────

    /// Adopt a window that already existed before the manager started.
    pub fn admit(&mut self, info: &WindowInfo, screen: ScreenId) -> Vec<CoreAction> {
        self.state.admit(info, screen, None);
        self.state.take_actions()
    }

    /// Forget a window.
    pub fn withdraw(&mut self, id: WindowId) -> Vec<CoreAction> {
        self.state.withdraw(id);
        self.state.take_actions()
    }

    /// Run the command bound to `keysym` + `modifiers` on the first
    /// region of the first screen. Unbound keys do nothing.
    pub fn dispatch_key(&mut self, keysym: Keysym, modifiers: Modifiers) -> Vec<CoreAction> {
        self.on_key_press(keysym, modifiers, ScreenId(0), None);
        self.state.take_actions()
    }

    /// The pointer entered `id`.
    pub fn dispatch_pointer_enter(&mut self, id: WindowId) -> Vec<CoreAction> {
        self.on_enter_notify(id);
        self.state.take_actions()
    }

    /// `id` asked for a new geometry. Tiled windows are told where they
    /// are; floating and unmanaged ones get what they asked for.
    pub fn dispatch_configure_request(
        &mut self,
        id: WindowId,
        request: &ConfigureRequest,
    ) -> Vec<CoreAction> {
        self.on_configure_request(id, request);
        self.state.take_actions()
    }

    /// Replace the floating classification rule.
    pub fn set_float_policy(&mut self, policy: Box<dyn FloatPolicy>) {
        self.state.set_float_policy(policy);
    }

    /// Access the focused window ID.
    pub fn focused_window(&self) -> Option<WindowId> {
        self.state.focus.current
    }

    /// Whether `id` is managed.
    pub fn is_managed(&self, id: WindowId) -> bool {
        self.state.windows.contains_key(&id)
    }

    /// Key combinations the backend must grab.
    pub fn bindings(&self) -> impl Iterator<Item = &KeyBinding> {
        self.input_manager.bindings()
    }
}

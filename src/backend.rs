//! Display backend abstraction.
//!
//! The engine in `slate-core` is protocol-agnostic; a backend owns the
//! display connection and the event loop, feeds events to the core and
//! applies the actions it returns.

/// Display server backend trait
pub trait DisplayBackend {
    /// Take over the display: become the window manager, adopt existing
    /// windows, grab keys and create the status bars.
    fn init(&mut self) -> Result<(), BackendError>;
    /// Run the event loop until the core asks to exit.
    fn run(&mut self) -> Result<(), BackendError>;
    fn shutdown(&mut self) -> Result<(), BackendError>;
}

/// Backend error type
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Another window manager is already running")]
    OtherWmRunning,

    #[error("X11 error: {0}")]
    X11Error(String),

    #[error("Could not load any bar font (tried {0:?})")]
    NoFont(Vec<String>),

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error(transparent)]
    Core(#[from] slate_core::state::CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<x11rb::errors::ConnectionError> for BackendError {
    fn from(e: x11rb::errors::ConnectionError) -> Self {
        Self::X11Error(e.to_string())
    }
}

impl From<x11rb::errors::ReplyError> for BackendError {
    fn from(e: x11rb::errors::ReplyError) -> Self {
        Self::X11Error(e.to_string())
    }
}

impl From<x11rb::errors::ReplyOrIdError> for BackendError {
    fn from(e: x11rb::errors::ReplyOrIdError) -> Self {
        Self::X11Error(e.to_string())
    }
}

/// Check if running under X11
pub fn is_x11_session() -> bool {
    std::env::var_os("DISPLAY").is_some_and(|d| !d.is_empty())
}

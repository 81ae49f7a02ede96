//! Input handling
//!
//! Key binding table: parses `Mod1+Shift+Return`-style key strings and
//! command strings, and resolves key presses to [`Command`]s.

use std::collections::HashMap;

use bitflags::bitflags;
use thiserror::Error;
use tracing::warn;

use crate::config::BindingConfig;
use crate::layout::MasterOp;
use crate::workspace::{SwapTarget, WORKSPACE_COUNT};

/// Input handling errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid key: {0}")]
    Key(String),
    #[error("Invalid binding: {0}")]
    Binding(String),
}

bitflags! {
    /// Keyboard modifiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT     = 0b0000_0001;
        const CTRL      = 0b0000_0010;
        const ALT       = 0b0000_0100;
        const SUPER     = 0b0000_1000;
        const CAPS_LOCK = 0b0001_0000;
        const NUM_LOCK  = 0b0010_0000;
        const MOD3      = 0b0100_0000;
        const MOD5      = 0b1000_0000;
    }
}

impl Modifiers {
    /// Lock modifiers never take part in binding lookup.
    pub const LOCKS: Self = Self::CAPS_LOCK.union(Self::NUM_LOCK);

    /// Parse modifiers from a string like "Mod4+Shift"
    pub fn from_str_list(s: &str) -> Self {
        s.split('+')
            .filter_map(Self::parse_name)
            .fold(Self::empty(), |acc, m| acc | m)
    }

    fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "shift" => Some(Self::SHIFT),
            "ctrl" | "control" => Some(Self::CTRL),
            "alt" | "mod1" => Some(Self::ALT),
            "mod3" => Some(Self::MOD3),
            "super" | "mod4" | "logo" | "win" => Some(Self::SUPER),
            "mod5" => Some(Self::MOD5),
            _ => None,
        }
    }

    /// Drop Caps Lock and Num Lock.
    #[must_use]
    pub const fn without_locks(self) -> Self {
        self.difference(Self::LOCKS)
    }
}

/// An X keysym value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keysym(pub u32);

impl Keysym {
    pub const RETURN: Self = Self(0xff0d);
    pub const TAB: Self = Self(0xff09);
    pub const ESCAPE: Self = Self(0xff1b);
    pub const BACKSPACE: Self = Self(0xff08);
    pub const DELETE: Self = Self(0xffff);
    pub const HOME: Self = Self(0xff50);
    pub const LEFT: Self = Self(0xff51);
    pub const UP: Self = Self(0xff52);
    pub const RIGHT: Self = Self(0xff53);
    pub const DOWN: Self = Self(0xff54);
    pub const PAGE_UP: Self = Self(0xff55);
    pub const PAGE_DOWN: Self = Self(0xff56);
    pub const END: Self = Self(0xff57);
    pub const F1: Self = Self(0xffbe);
    pub const NUM_LOCK: Self = Self(0xff7f);

    /// Parse a key name to its keysym.
    ///
    /// Letters are case-insensitive and map to the lowercase keysym, as the
    /// unshifted column of the keyboard map does.
    pub fn from_name(name: &str) -> Result<Self, InputError> {
        let lower = name.to_lowercase();

        if let [c] = lower.as_bytes() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                return Ok(Self(u32::from(*c)));
            }
        }

        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u32>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(Self(Self::F1.0 + n - 1));
            }
        }

        let key = match lower.as_str() {
            "return" | "enter" => Self::RETURN,
            "tab" => Self::TAB,
            "escape" | "esc" => Self::ESCAPE,
            "backspace" => Self::BACKSPACE,
            "delete" => Self::DELETE,
            "home" => Self::HOME,
            "end" => Self::END,
            "page_up" | "prior" => Self::PAGE_UP,
            "page_down" | "next" => Self::PAGE_DOWN,
            "left" => Self::LEFT,
            "right" => Self::RIGHT,
            "up" => Self::UP,
            "down" => Self::DOWN,
            "space" => Self(0x20),
            "comma" => Self(0x2c),
            "minus" => Self(0x2d),
            "period" => Self(0x2e),
            "slash" => Self(0x2f),
            "semicolon" => Self(0x3b),
            "equal" => Self(0x3d),
            "bracketleft" => Self(0x5b),
            "backslash" => Self(0x5c),
            "bracketright" => Self(0x5d),
            "grave" => Self(0x60),
            "apostrophe" => Self(0x27),
            _ => return Err(InputError::Key(name.to_string())),
        };
        Ok(key)
    }
}

/// A key binding (modifiers + key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub modifiers: Modifiers,
    pub keysym: Keysym,
}

impl KeyBinding {
    pub const fn new(modifiers: Modifiers, keysym: Keysym) -> Self {
        Self { modifiers, keysym }
    }

    /// Parse a binding string like "Mod1+Shift+Return"
    pub fn parse(s: &str) -> Result<Self, InputError> {
        let mut modifiers = Modifiers::empty();
        let mut key_part: Option<&str> = None;

        for part in s.split('+').map(str::trim) {
            if let Some(m) = Modifiers::parse_name(part) {
                modifiers.insert(m);
            } else if key_part.replace(part).is_some() {
                // Two non-modifier parts
                return Err(InputError::Binding(s.to_string()));
            }
        }

        let keysym = match key_part {
            Some(k) if !k.is_empty() => Keysym::from_name(k)?,
            _ => return Err(InputError::Binding(s.to_string())),
        };

        Ok(Self { modifiers, keysym })
    }
}

/// Which window to focus relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Next,
    Prev,
    Main,
}

/// Which program slot to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramSlot {
    Terminal,
    Menu,
}

/// A window-manager command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CycleLayout,
    Master(MasterOp),
    Swap(SwapTarget),
    Focus(FocusTarget),
    /// Zero-based workspace index.
    Workspace(usize),
    /// Zero-based workspace index.
    MoveToWorkspace(usize),
    ToggleBar,
    Quit,
    Restart,
    Spawn(ProgramSlot),
    Exec(Vec<String>),
    Unknown(String),
}

impl Command {
    /// Parse a command string
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let (cmd, args) = s.split_once(' ').unwrap_or((s, ""));
        let args = args.trim();
        let unknown = || Self::Unknown(s.to_string());

        match cmd.to_lowercase().as_str() {
            "layout" => match args.to_lowercase().as_str() {
                "cycle" | "next" => Self::CycleLayout,
                _ => unknown(),
            },

            "master" => match args.to_lowercase().as_str() {
                "shrink" => Self::Master(MasterOp::Shrink),
                "grow" => Self::Master(MasterOp::Grow),
                "add" => Self::Master(MasterOp::Add),
                "remove" | "del" => Self::Master(MasterOp::Remove),
                "reset" => Self::Master(MasterOp::Reset),
                _ => unknown(),
            },

            "swap" => match args.to_lowercase().as_str() {
                "next" => Self::Swap(SwapTarget::Next),
                "prev" | "previous" => Self::Swap(SwapTarget::Prev),
                "main" | "master" => Self::Swap(SwapTarget::Main),
                _ => unknown(),
            },

            "focus" => match args.to_lowercase().as_str() {
                "next" => Self::Focus(FocusTarget::Next),
                "prev" | "previous" => Self::Focus(FocusTarget::Prev),
                "main" | "master" => Self::Focus(FocusTarget::Main),
                _ => unknown(),
            },

            "workspace" => parse_workspace_number(args).map_or_else(unknown, Self::Workspace),

            "move" => {
                let parts: Vec<&str> = args.split_whitespace().collect();
                match parts.as_slice() {
                    ["to", "workspace", n] | ["window", "to", "workspace", n] => {
                        parse_workspace_number(n).map_or_else(unknown, Self::MoveToWorkspace)
                    }
                    _ => unknown(),
                }
            }

            "bar" => match args.to_lowercase().as_str() {
                "toggle" | "" => Self::ToggleBar,
                _ => unknown(),
            },

            "spawn" => match args.to_lowercase().as_str() {
                "terminal" | "term" => Self::Spawn(ProgramSlot::Terminal),
                "menu" => Self::Spawn(ProgramSlot::Menu),
                _ => unknown(),
            },

            "exec" => {
                let argv: Vec<String> = args.split_whitespace().map(String::from).collect();
                if argv.is_empty() {
                    unknown()
                } else {
                    Self::Exec(argv)
                }
            }

            "quit" | "exit" => Self::Quit,
            "restart" => Self::Restart,

            _ => unknown(),
        }
    }
}

/// Parse a 1-based workspace number ("10" is the tenth) to an index.
fn parse_workspace_number(s: &str) -> Option<usize> {
    s.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=WORKSPACE_COUNT).contains(n))
        .map(|n| n - 1)
}

/// Key binding table.
#[derive(Debug, Default)]
pub struct InputManager {
    bindings: HashMap<KeyBinding, Command>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load bindings from configuration. Unparseable keys are skipped.
    pub fn load_bindings(&mut self, bindings: &[BindingConfig]) {
        for binding_config in bindings {
            match KeyBinding::parse(&binding_config.keys) {
                Ok(key_binding) => {
                    let command = Command::parse(&binding_config.command);
                    if let Command::Unknown(ref c) = command {
                        warn!("Binding {} has unknown command: {}", binding_config.keys, c);
                    }
                    self.bindings.insert(key_binding, command);
                }
                Err(e) => warn!("Skipping binding: {}", e),
            }
        }
    }

    /// Resolve a key press. Lock modifiers are ignored.
    pub fn lookup(&self, keysym: Keysym, modifiers: Modifiers) -> Option<&Command> {
        self.bindings
            .get(&KeyBinding::new(modifiers.without_locks(), keysym))
    }

    /// Every bound key, for grabbing.
    pub fn bindings(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.keys()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_binding_parse() {
        let binding = KeyBinding::parse("Mod1+Return").unwrap();
        assert!(binding.modifiers.contains(Modifiers::ALT));
        assert_eq!(binding.keysym, Keysym::RETURN);

        let binding = KeyBinding::parse("Mod1+Shift+Q").unwrap();
        assert_eq!(binding.modifiers, Modifiers::ALT | Modifiers::SHIFT);
        assert_eq!(binding.keysym, Keysym(u32::from(b'q')));

        assert_eq!(KeyBinding::parse("Mod1+0").unwrap().keysym, Keysym(0x30));
        assert_eq!(KeyBinding::parse("Mod1+F3").unwrap().keysym, Keysym(0xffc0));
        assert_eq!(KeyBinding::parse("Mod1+comma").unwrap().keysym, Keysym(0x2c));
    }

    #[test]
    fn test_key_binding_errors() {
        assert_eq!(
            KeyBinding::parse("Mod1+Shift"),
            Err(InputError::Binding("Mod1+Shift".into()))
        );
        assert_eq!(
            KeyBinding::parse("Mod1+nosuchkey"),
            Err(InputError::Key("nosuchkey".into()))
        );
        assert!(KeyBinding::parse("Mod1+a+b").is_err());
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("layout cycle"), Command::CycleLayout);
        assert_eq!(Command::parse("master grow"), Command::Master(MasterOp::Grow));
        assert_eq!(Command::parse("swap main"), Command::Swap(SwapTarget::Main));
        assert_eq!(Command::parse("focus prev"), Command::Focus(FocusTarget::Prev));
        assert_eq!(Command::parse("workspace 1"), Command::Workspace(0));
        assert_eq!(Command::parse("workspace 10"), Command::Workspace(9));
        assert_eq!(
            Command::parse("move to workspace 3"),
            Command::MoveToWorkspace(2)
        );
        assert_eq!(
            Command::parse("exec xterm -e top"),
            Command::Exec(vec!["xterm".into(), "-e".into(), "top".into()])
        );
        assert_eq!(Command::parse("spawn terminal"), Command::Spawn(ProgramSlot::Terminal));
        assert_eq!(Command::parse("bar toggle"), Command::ToggleBar);
        assert_eq!(Command::parse("quit"), Command::Quit);
    }

    #[test]
    fn test_command_parse_unknown() {
        assert!(matches!(Command::parse("workspace 11"), Command::Unknown(_)));
        assert!(matches!(Command::parse("workspace 0"), Command::Unknown(_)));
        assert!(matches!(Command::parse("exec"), Command::Unknown(_)));
        assert!(matches!(Command::parse("frobnicate"), Command::Unknown(_)));
    }

    #[test]
    fn test_modifiers() {
        let mods = Modifiers::from_str_list("Mod4+Shift");
        assert!(mods.contains(Modifiers::SUPER));
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::CTRL));

        let locked = Modifiers::ALT | Modifiers::NUM_LOCK | Modifiers::CAPS_LOCK;
        assert_eq!(locked.without_locks(), Modifiers::ALT);
    }

    #[test]
    fn test_lookup_ignores_locks() {
        let mut input = InputManager::new();
        input.load_bindings(&[
            BindingConfig::new("Mod1+j", "focus next"),
            BindingConfig::new("Mod1+bogus", "focus next"),
        ]);
        assert_eq!(input.len(), 1);

        let j = Keysym(u32::from(b'j'));
        let found = input.lookup(j, Modifiers::ALT | Modifiers::NUM_LOCK);
        assert_eq!(found, Some(&Command::Focus(FocusTarget::Next)));
        assert_eq!(input.lookup(j, Modifiers::SUPER), None);
    }
}

//! Window management types.
//!
//! Protocol-agnostic window representation. No display-server handles leak here.

use bitflags::bitflags;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::{Geometry, ScreenId};
use crate::workspace::WorkspaceId;

/// Unique, opaque identifier for a managed window.
///
/// Backends map their protocol handle onto this ID (for X11 the window
/// XID itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "win:{:#x}", self.0)
    }
}

bitflags! {
    /// Window state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowState: u8 {
        const FOCUSED   = 0b0000_0001;
        const FLOATING  = 0b0000_0010;
        const TRANSIENT = 0b0000_0100;
    }
}

/// Window type hints (`_NET_WM_WINDOW_TYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    #[default]
    Normal,
    Dialog,
    Utility,
    Toolbar,
    Splash,
    Menu,
}

/// Everything the backend knows about a window when it asks to be managed.
#[derive(Debug, Clone, Default)]
pub struct WindowInfo {
    pub id: WindowId,
    pub geometry: Geometry,
    pub override_redirect: bool,
    pub transient_for: Option<WindowId>,
    /// `WM_CLASS` class part.
    pub class: Option<String>,
    /// `WM_CLASS` instance part.
    pub instance: Option<String>,
    pub window_type: WindowType,
}

/// A managed window.
#[derive(Debug, Clone)]
pub struct Window {
    pub id: WindowId,
    pub geometry: Geometry,
    pub state: WindowState,
    pub transient_for: Option<WindowId>,
    pub workspace: WorkspaceId,
    /// Fixed at admission.
    pub screen: ScreenId,
    pub class: Option<String>,
    pub instance: Option<String>,
}

impl Window {
    pub fn new(info: &WindowInfo, workspace: WorkspaceId) -> Self {
        let mut state = WindowState::empty();
        if info.transient_for.is_some() {
            state.insert(WindowState::TRANSIENT);
        }
        Self {
            id: info.id,
            geometry: info.geometry,
            state,
            transient_for: info.transient_for,
            workspace,
            screen: workspace.screen,
            class: info.class.clone(),
            instance: info.instance.clone(),
        }
    }

    pub const fn is_focused(&self) -> bool {
        self.state.contains(WindowState::FOCUSED)
    }

    pub const fn is_floating(&self) -> bool {
        self.state.contains(WindowState::FLOATING)
    }

    pub const fn is_transient(&self) -> bool {
        self.state.contains(WindowState::TRANSIENT)
    }

    /// Tiled windows take part in the layout; floaters are centered instead.
    pub const fn is_tiled(&self) -> bool {
        !self.is_floating() && !self.is_transient()
    }
}

/// Decides whether a new window starts out floating.
pub trait FloatPolicy: std::fmt::Debug {
    fn should_float(&self, info: &WindowInfo) -> bool;
}

/// Window matching criteria (for float rules).
///
/// All given fields must match. `class` and `instance` compare exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_type: Option<WindowType>,
}

impl WindowCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = Some(window_type);
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.class.is_none()
            && self.instance.is_none()
            && self.class_regex.is_none()
            && self.window_type.is_none()
    }
}

/// A compiled [`WindowCriteria`].
#[derive(Debug, Clone)]
struct FloatRule {
    criteria: WindowCriteria,
    class_regex: Option<Regex>,
}

impl FloatRule {
    fn matches(&self, info: &WindowInfo) -> bool {
        if let Some(ref class) = self.criteria.class {
            if info.class.as_deref() != Some(class.as_str()) {
                return false;
            }
        }
        if let Some(ref instance) = self.criteria.instance {
            if info.instance.as_deref() != Some(instance.as_str()) {
                return false;
            }
        }
        if let Some(ref re) = self.class_regex {
            if !info.class.as_deref().is_some_and(|c| re.is_match(c)) {
                return false;
            }
        }
        if let Some(window_type) = self.criteria.window_type {
            if info.window_type != window_type {
                return false;
            }
        }
        true
    }
}

/// The default float policy: a table of [`WindowCriteria`].
#[derive(Debug, Clone, Default)]
pub struct FloatRules {
    rules: Vec<FloatRule>,
}

impl FloatRules {
    /// Compile `criteria`. Empty entries and bad regexes are skipped.
    pub fn from_criteria(criteria: &[WindowCriteria]) -> Self {
        let mut rules = Vec::with_capacity(criteria.len());

        for c in criteria {
            if c.is_empty() {
                warn!("Ignoring float rule without any criteria");
                continue;
            }
            let class_regex = match c.class_regex.as_deref().map(Regex::new) {
                Some(Ok(re)) => Some(re),
                Some(Err(e)) => {
                    warn!("Ignoring float rule with invalid class_regex: {}", e);
                    continue;
                }
                None => None,
            };
            rules.push(FloatRule {
                criteria: c.clone(),
                class_regex,
            });
        }

        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FloatPolicy for FloatRules {
    fn should_float(&self, info: &WindowInfo) -> bool {
        self.rules.iter().any(|rule| rule.matches(info))
    }
}

/// Rules applied when the configuration does not name any.
pub fn default_float_rules() -> Vec<WindowCriteria> {
    vec![WindowCriteria::new().class("MPlayer").instance("xv")]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(class: &str, instance: &str) -> WindowInfo {
        WindowInfo {
            id: WindowId(1),
            class: Some(class.into()),
            instance: Some(instance.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_window_state_flags() {
        let ws = WorkspaceId::new(ScreenId(0), 0);
        let mut window = Window::new(&info("XTerm", "xterm"), ws);
        assert!(window.is_tiled());
        assert!(!window.is_focused());
        window.state.insert(WindowState::FLOATING);
        assert!(!window.is_tiled());

        let dialog = WindowInfo {
            transient_for: Some(WindowId(7)),
            ..info("Gimp", "gimp")
        };
        let window = Window::new(&dialog, ws);
        assert!(window.is_transient());
        assert!(!window.is_tiled());
        assert_eq!(window.screen, ScreenId(0));
    }

    #[test]
    fn test_default_rules_match_exactly() {
        let rules = FloatRules::from_criteria(&default_float_rules());
        assert!(rules.should_float(&info("MPlayer", "xv")));
        assert!(!rules.should_float(&info("MPlayer", "gl")));
        assert!(!rules.should_float(&info("mplayer", "xv")));
        assert!(!rules.should_float(&WindowInfo::default()));
    }

    #[test]
    fn test_unusable_rules_are_skipped() {
        let rules = FloatRules::from_criteria(&[
            WindowCriteria::new(),
            WindowCriteria {
                class_regex: Some("(".into()),
                ..Default::default()
            },
        ]);
        assert!(rules.is_empty());
        assert!(!rules.should_float(&info("anything", "at all")));
    }

    #[test]
    fn test_regex_and_type_rules() {
        let rules = FloatRules::from_criteria(&[
            WindowCriteria {
                class_regex: Some("^Pinentry".into()),
                ..Default::default()
            },
            WindowCriteria::new().window_type(WindowType::Splash),
        ]);
        assert_eq!(rules.len(), 2);
        assert!(rules.should_float(&info("Pinentry-gtk", "pinentry")));

        let splash = WindowInfo {
            window_type: WindowType::Splash,
            ..info("Gimp", "gimp")
        };
        assert!(rules.should_float(&splash));
        assert!(!rules.should_float(&info("Gimp", "gimp")));
    }
}

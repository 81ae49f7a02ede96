//! Keycode/keysym and modifier translation.
//!
//! Works on the raw keyboard and modifier mappings so it can be tested
//! without a server.

use slate_core::input::{Keysym, Modifiers};

/// X modifier bits, in `ModMask` order.
const SHIFT: u16 = 1 << 0;
const LOCK: u16 = 1 << 1;
const CONTROL: u16 = 1 << 2;
const MOD1: u16 = 1 << 3;
const MOD3: u16 = 1 << 5;
const MOD4: u16 = 1 << 6;
const MOD5: u16 = 1 << 7;

/// Snapshot of the server's keyboard mapping.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    min_keycode: u8,
    per_keycode: usize,
    keysyms: Vec<u32>,
    /// Modifier bit that NumLock is attached to, or 0.
    numlock: u16,
}

impl Keymap {
    /// Build from a `GetKeyboardMapping` reply and a `GetModifierMapping`
    /// reply (`keycodes_per_modifier` keycodes for each of the 8 modifiers).
    pub fn new(min_keycode: u8, per_keycode: u8, keysyms: Vec<u32>, modmap: &[u8]) -> Self {
        let mut keymap = Self {
            min_keycode,
            per_keycode: usize::from(per_keycode),
            keysyms,
            numlock: 0,
        };
        keymap.numlock = keymap.find_numlock(modmap);
        keymap
    }

    fn find_numlock(&self, modmap: &[u8]) -> u16 {
        let Some(numlock_code) = self.keycode(Keysym::NUM_LOCK) else {
            return 0;
        };
        let per_mod = modmap.len() / 8;
        if per_mod == 0 {
            return 0;
        }
        modmap
            .chunks(per_mod)
            .position(|codes| codes.contains(&numlock_code))
            .map_or(0, |bit| 1 << bit)
    }

    /// First keycode producing `keysym` in any column.
    pub fn keycode(&self, keysym: Keysym) -> Option<u8> {
        if self.per_keycode == 0 {
            return None;
        }
        self.keysyms
            .chunks(self.per_keycode)
            .position(|syms| syms.contains(&keysym.0))
            .and_then(|i| u8::try_from(i).ok())
            .map(|i| self.min_keycode.saturating_add(i))
    }

    /// Unshifted keysym of `keycode`.
    pub fn keysym(&self, keycode: u8) -> Keysym {
        let index = usize::from(keycode.saturating_sub(self.min_keycode)) * self.per_keycode;
        Keysym(self.keysyms.get(index).copied().unwrap_or(0))
    }

    /// Translate an event `state` field. The NumLock bit maps only to
    /// [`Modifiers::NUM_LOCK`], whichever ModN it sits on.
    pub fn modifiers(&self, state: u16) -> Modifiers {
        let mut mods = Modifiers::empty();
        let plain = state & !self.numlock;
        for (bit, flag) in [
            (SHIFT, Modifiers::SHIFT),
            (LOCK, Modifiers::CAPS_LOCK),
            (CONTROL, Modifiers::CTRL),
            (MOD1, Modifiers::ALT),
            (MOD3, Modifiers::MOD3),
            (MOD4, Modifiers::SUPER),
            (MOD5, Modifiers::MOD5),
        ] {
            if plain & bit != 0 {
                mods |= flag;
            }
        }
        if self.numlock != 0 && state & self.numlock != 0 {
            mods |= Modifiers::NUM_LOCK;
        }
        mods
    }

    /// Modifier mask for a binding, without lock keys.
    pub fn mask(modifiers: Modifiers) -> u16 {
        [
            (Modifiers::SHIFT, SHIFT),
            (Modifiers::CTRL, CONTROL),
            (Modifiers::ALT, MOD1),
            (Modifiers::MOD3, MOD3),
            (Modifiers::SUPER, MOD4),
            (Modifiers::MOD5, MOD5),
        ]
        .into_iter()
        .filter(|(flag, _)| modifiers.contains(*flag))
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Every mask a binding must be grabbed with so Caps Lock and
    /// Num Lock do not interfere.
    pub fn grab_masks(&self, modifiers: Modifiers) -> [u16; 4] {
        let base = Self::mask(modifiers);
        [base, base | LOCK, base | self.numlock, base | LOCK | self.numlock]
    }
}

//! Key identity and display metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one addressable key on the virtual keyboard.
///
/// The set is closed: every key the application can ever show is a variant
/// here, so a free-form string can never sneak into a binding or selection.
/// Which of these keys a given keyboard actually offers is decided by
/// [`KeyRegistry`](crate::keyboard::KeyRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyId {
    /// Letter A
    A,
    /// Letter B
    B,
    /// Letter C
    C,
    /// Letter D
    D,
    /// Letter E
    E,
    /// Letter F
    F,
    /// Letter G
    G,
    /// Letter H
    H,
    /// Letter I
    I,
    /// Letter J
    J,
    /// Letter K
    K,
    /// Letter L
    L,
    /// Letter M
    M,
    /// Letter N
    N,
    /// Letter O
    O,
    /// Letter P
    P,
    /// Letter Q
    Q,
    /// Letter R
    R,
    /// Letter S
    S,
    /// Letter T
    T,
    /// Letter U
    U,
    /// Letter V
    V,
    /// Letter W
    W,
    /// Letter X
    X,
    /// Letter Y
    Y,
    /// Letter Z
    Z,
    /// Shift modifier
    Shift,
    /// Control modifier
    Ctrl,
    /// Space bar
    Space,
    /// Enter / Return
    Enter,
}

impl KeyId {
    /// Every key identifier, letters first.
    pub const ALL: [Self; 30] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
        Self::U,
        Self::V,
        Self::W,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Shift,
        Self::Ctrl,
        Self::Space,
        Self::Enter,
    ];

    /// Label printed on the key cap; also the identifier used in template records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
            Self::K => "K",
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
            Self::S => "S",
            Self::T => "T",
            Self::U => "U",
            Self::V => "V",
            Self::W => "W",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::Shift => "Shift",
            Self::Ctrl => "Ctrl",
            Self::Space => "Space",
            Self::Enter => "Enter",
        }
    }

    /// Physical width class of the key cap.
    pub const fn width(self) -> KeyWidth {
        match self {
            Self::Shift | Self::Ctrl => KeyWidth::Modifier,
            Self::Space | Self::Enter => KeyWidth::Wide,
            _ => KeyWidth::Standard,
        }
    }

    /// True for the modifier keys.
    pub const fn is_modifier(self) -> bool {
        matches!(self, Self::Shift | Self::Ctrl)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strings that name no known key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for KeyId {
    type Err = UnknownKey;

    /// Parses a key label, ignoring case (`"a"`, `"SHIFT"`, `"ctrl"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Key cap width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyWidth {
    /// Letter keys (1u)
    Standard,
    /// Shift / Ctrl
    Modifier,
    /// Space / Enter
    Wide,
}

impl KeyWidth {
    /// Width in keyboard units.
    pub const fn units(self) -> f32 {
        match self {
            Self::Standard => 1.0,
            Self::Modifier => 1.5,
            Self::Wide => 2.25,
        }
    }

    /// Width in text cells when rendering the keyboard as plain text.
    pub const fn cells(self) -> usize {
        match self {
            Self::Standard => 5,
            Self::Modifier => 8,
            Self::Wide => 11,
        }
    }
}

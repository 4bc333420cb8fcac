//! Platform-independent key and mouse button identifiers

use serde::{Deserialize, Serialize};

/// Keyboard keys tracked by the input latch
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    K0,
    K1,
    K2,
    K3,
    K4,
    K5,
    K6,
    K7,
    K8,
    K9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Up,
    Down,
    Left,
    Right,
    Space,
    Tab,
    Shift,
    Ctrl,
    Ins,
    Del,
    Home,
    End,
    PgUp,
    PgDn,
    Back,
    Escape,
    Return,
    Enter,
    Pause,
    Scroll,
    Np0,
    Np1,
    Np2,
    Np3,
    Np4,
    Np5,
    Np6,
    Np7,
    Np8,
    Np9,
    NpMul,
    NpDiv,
    NpAdd,
    NpSub,
    NpDecimal,
    Period,
    Equals,
    Comma,
    Minus,
    Oem1,
    Oem2,
    Oem3,
    Oem4,
    Oem5,
    Oem6,
    Oem7,
    Oem8,
    CapsLock,
}

impl Key {
    /// Number of tracked keys
    pub const COUNT: usize = Key::CapsLock as usize + 1;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Letter key for an ASCII letter, either case
    pub fn from_letter(c: char) -> Option<Self> {
        const LETTERS: [Key; 26] = [
            Key::A,
            Key::B,
            Key::C,
            Key::D,
            Key::E,
            Key::F,
            Key::G,
            Key::H,
            Key::I,
            Key::J,
            Key::K,
            Key::L,
            Key::M,
            Key::N,
            Key::O,
            Key::P,
            Key::Q,
            Key::R,
            Key::S,
            Key::T,
            Key::U,
            Key::V,
            Key::W,
            Key::X,
            Key::Y,
            Key::Z,
        ];
        let c = c.to_ascii_uppercase();
        c.is_ascii_uppercase()
            .then(|| LETTERS[(c as u8 - b'A') as usize])
    }

    /// Top-row digit key
    pub fn from_digit(d: u32) -> Option<Self> {
        const DIGITS: [Key; 10] = [
            Key::K0,
            Key::K1,
            Key::K2,
            Key::K3,
            Key::K4,
            Key::K5,
            Key::K6,
            Key::K7,
            Key::K8,
            Key::K9,
        ];
        DIGITS.get(d as usize).copied()
    }
}

/// Mouse buttons tracked by the input latch
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

impl MouseButton {
    pub const COUNT: usize = 5;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        assert_eq!(Key::COUNT, 96);
        assert_eq!(MouseButton::X2.index() + 1, MouseButton::COUNT);
    }

    #[test]
    fn test_letter_and_digit_lookup() {
        assert_eq!(Key::from_letter('q'), Some(Key::Q));
        assert_eq!(Key::from_letter('Z'), Some(Key::Z));
        assert_eq!(Key::from_letter('1'), None);
        assert_eq!(Key::from_digit(7), Some(Key::K7));
        assert_eq!(Key::from_digit(10), None);
    }
}

/// Per-frame state of one key or mouse button
///
/// `pressed` and `released` are true for exactly one frame per transition.
/// `held` is true from the pressed frame up to, not including, the released
/// frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonState {
    pub pressed: bool,
    pub released: bool,
    pub held: bool,
}

impl ButtonState {
    pub const IDLE: Self = Self {
        pressed: false,
        released: false,
        held: false,
    };

    /// Reduce this frame's level against last frame's
    #[inline]
    pub const fn from_levels(new: bool, old: bool) -> Self {
        Self {
            pressed: new && !old,
            released: !new && old,
            held: new,
        }
    }

    #[inline]
    pub const fn is_idle(self) -> bool {
        !self.pressed && !self.released && !self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_truth_table() {
        assert_eq!(ButtonState::from_levels(false, false), ButtonState::IDLE);
        assert_eq!(
            ButtonState::from_levels(true, false),
            ButtonState {
                pressed: true,
                released: false,
                held: true
            }
        );
        assert_eq!(
            ButtonState::from_levels(true, true),
            ButtonState {
                pressed: false,
                released: false,
                held: true
            }
        );
        assert_eq!(
            ButtonState::from_levels(false, true),
            ButtonState {
                pressed: false,
                released: true,
                held: false
            }
        );
    }
}

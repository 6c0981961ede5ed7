use bitflags::bitflags;
use web_sys::{KeyboardEvent, MouseEvent};

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

impl MouseButtons {
    /// Converts `MouseEvent.button`, which numbers buttons differently from `MouseEvent.buttons`.
    pub(crate) fn from_button(button: i16) -> Self {
        match button {
            0 => Self::LEFT,
            1 => Self::MIDDLE,
            2 => Self::RIGHT,
            3 => Self::BACK,
            4 => Self::FORWARD,
            _ => Self::empty(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PointerAction {
    Reveal,
    Flag,
}

impl PointerAction {
    /// Plain primary clicks reveal; any other button, or a modifier held down, flags.
    pub(crate) fn new(button: MouseButtons, with_modifier: bool) -> Self {
        if button == MouseButtons::LEFT && !with_modifier {
            Self::Reveal
        } else {
            Self::Flag
        }
    }

    pub(crate) fn from_event(event: &MouseEvent) -> Self {
        let with_modifier = event.alt_key() || event.ctrl_key() || event.meta_key();
        Self::new(MouseButtons::from_button(event.button()), with_modifier)
    }
}

pub(crate) const RESTART_KEY: &str = "r";
pub(crate) const SUBMIT_KEY: &str = "Enter";

pub(crate) fn is_key(event: &KeyboardEvent, key: &str) -> bool {
    event.key() == key
}

use crate::key::Key;

/// Input events delivered by a [`Driver`](crate::Driver), already stripped of
/// backend-specific detail.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Event {
    Quit,
    /// `repeat` is set for auto-repeat events generated while a key is held.
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    MouseDown,
    FocusLost,
    FocusGained,
}

/// Keys the game reacts to. Everything else maps to `Key::None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Space,
    Up,
    P,
    Escape,
    None,
}

impl Key {
    /// Keys that make the bird flap.
    pub fn is_jump(self) -> bool {
        matches!(self, Key::Space | Key::Up)
    }
}

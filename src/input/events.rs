//! Host-independent pointer event types.

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button, pen tip or primary touch
    Primary,
    /// Middle mouse button
    Auxiliary,
    /// Right mouse button or pen barrel button
    Secondary,
}

impl PointerButton {
    /// Maps a DOM `MouseEvent.button` code.
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Auxiliary),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}
